use orderpool::application::engine::OrderEngine;
use orderpool::application::sink::{MessageKind, ResultMessage};
use orderpool::config::EngineConfig;
use orderpool::domain::order::OrderId;
use orderpool::domain::product::Category;
use orderpool::error::OrderError;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

mod common;

fn completions(messages: &[ResultMessage]) -> HashMap<OrderId, usize> {
    let mut counts = HashMap::new();
    for message in messages.iter().filter(|m| m.kind == MessageKind::Completed) {
        *counts.entry(message.order_id).or_insert(0) += 1;
    }
    counts
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_competing_orders_only_one_reserves() {
    let (engine, _results) = common::engine_with_stock(5, EngineConfig::default()).await;
    let engine = Arc::new(engine);

    let a = tokio::spawn({
        let engine = engine.clone();
        async move { engine.submit(1, 3).await }
    });
    let b = tokio::spawn({
        let engine = engine.clone();
        async move { engine.submit(1, 3).await }
    });
    let results = [a.await.unwrap(), b.await.unwrap()];

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let refused = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(OrderError::InsufficientStock {
                    id: 1,
                    available: 2,
                    requested: 3
                })
            )
        })
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(refused, 1);
    assert_eq!(engine.product(1).await.unwrap().stock, 2);

    let engine = Arc::try_unwrap(engine).ok().unwrap();
    let products = engine.shutdown().await.unwrap();
    assert_eq!(products[0].stock, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_oversell_under_load() {
    const STOCK: u32 = 100;
    let (engine, results) = common::engine_with_stock(STOCK, EngineConfig::default()).await;
    let engine = Arc::new(engine);
    let messages = common::collect_results(results);

    let mut handles = Vec::new();
    for _ in 0..60 {
        let quantity = rand::thread_rng().gen_range(1..=5);
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.submit(1, quantity).await.map(|order| (order.id, order.quantity))
        }));
    }

    let mut accepted = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(order) => accepted.push(order),
            Err(OrderError::InsufficientStock { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let reserved: u32 = accepted.iter().map(|(_, quantity)| quantity).sum();
    assert!(reserved <= STOCK);

    let engine = Arc::try_unwrap(engine).ok().unwrap();
    let products = engine.shutdown().await.unwrap();
    assert_eq!(products[0].stock, STOCK - reserved);

    // Every accepted order completes exactly once.
    let counts = completions(&messages.await.unwrap());
    assert_eq!(counts.len(), accepted.len());
    for (order_id, _) in &accepted {
        assert_eq!(counts.get(order_id), Some(&1));
    }
}

#[tokio::test]
async fn test_zero_quantity_order_reports_out_of_stock() {
    let (engine, results) = common::engine_with_stock(5, EngineConfig::default()).await;
    let messages = common::collect_results(results);

    let order = engine.submit(1, 0).await.unwrap();
    assert_eq!(engine.product(1).await.unwrap().stock, 5);

    engine.shutdown().await.unwrap();
    let emitted: Vec<ResultMessage> = messages
        .await
        .unwrap()
        .into_iter()
        .filter(|m| m.order_id == order.id)
        .collect();

    assert_eq!(emitted.len(), 4);
    assert_eq!(emitted[0].kind, MessageKind::Processing);
    assert_eq!(emitted[1].kind, MessageKind::Stock);
    assert_eq!(emitted[1].text, "Product is out of stock! Restocking soon.");
    assert_eq!(emitted[2].kind, MessageKind::Advisory);
    assert_eq!(emitted[3].kind, MessageKind::Completed);
}

#[tokio::test]
async fn test_advisory_follows_category() {
    let catalog = common::catalog_with(vec![
        common::product(1, Category::Grocery, 5),
        common::product(2, Category::Electronics, 5),
        common::product(3, Category::Fashion, 5),
        common::product(4, Category::Unknown, 5),
    ])
    .await;
    let (engine, results) =
        OrderEngine::start(Box::new(catalog), EngineConfig::default()).unwrap();
    let messages = common::collect_results(results);

    let mut orders = HashMap::new();
    for id in 1..=4 {
        orders.insert(engine.submit(id, 1).await.unwrap().id, id);
    }
    engine.shutdown().await.unwrap();

    let advisories: HashMap<u32, String> = messages
        .await
        .unwrap()
        .into_iter()
        .filter(|m| m.kind == MessageKind::Advisory)
        .map(|m| (orders[&m.order_id], m.text))
        .collect();

    assert!(advisories[&1].contains("Perishable"));
    assert!(advisories[&2].contains("safe packaging"));
    assert!(advisories[&3].contains("presentation"));
    assert!(advisories[&4].contains("Classify properly"));
}

#[tokio::test]
async fn test_full_queue_refuses_without_reserving() {
    let config = EngineConfig::default().with_queue_capacity(2);
    let (engine, _results) = common::engine_with_stock(10, config).await;

    // Nothing yields to the worker tasks between these submissions, so the
    // queue fills up.
    engine.submit(1, 1).await.unwrap();
    engine.submit(1, 1).await.unwrap();
    assert!(matches!(
        engine.submit(1, 1).await,
        Err(OrderError::QueueFull)
    ));
    assert_eq!(engine.product(1).await.unwrap().stock, 8);

    let products = engine.shutdown().await.unwrap();
    assert_eq!(products[0].stock, 8);
}

#[tokio::test]
async fn test_rejected_requests_leave_catalog_untouched() {
    let (engine, _results) = common::engine_with_stock(2, EngineConfig::default()).await;

    assert!(matches!(
        engine.submit(1, -1).await,
        Err(OrderError::InvalidQuantity(-1))
    ));
    assert!(matches!(
        engine.submit(99, 1).await,
        Err(OrderError::NotFound(99))
    ));
    assert!(matches!(
        engine.submit(1, 3).await,
        Err(OrderError::InsufficientStock { .. })
    ));

    let products = engine.shutdown().await.unwrap();
    assert_eq!(products[0].stock, 2);
}

#[tokio::test(start_paused = true)]
async fn test_pool_never_drops_below_floor() {
    let config = EngineConfig::default()
        .with_worker_count(4)
        .with_worker_floor(2)
        .with_idle_timeout(Duration::from_secs(1))
        .with_monitor_tick(Duration::from_millis(500));
    let (engine, mut messages) = common::engine_with_stock(10, config).await;

    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(engine.active_workers() >= 2);
    }
    assert_eq!(engine.active_workers(), 2);
    assert_eq!(engine.pool_stats().active_workers, 2);

    // Replacement workers still pick up new orders.
    let order = engine.submit(1, 1).await.unwrap();
    loop {
        let message = messages.recv().await.unwrap();
        if message.order_id == order.id && message.kind == MessageKind::Completed {
            break;
        }
    }

    engine.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_default_sink_delivers_every_completion() {
    let (engine, results) = common::engine_with_stock(10_000, EngineConfig::default()).await;
    let engine = Arc::new(engine);
    let messages = common::collect_results(results);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move { engine.submit(1, 250).await }));
    }
    let mut accepted = Vec::new();
    for handle in handles {
        accepted.push(handle.await.unwrap().unwrap().id);
    }

    let engine = Arc::try_unwrap(engine).ok().unwrap();
    let products = engine.shutdown().await.unwrap();
    assert_eq!(products[0].stock, 5_000);

    let messages = messages.await.unwrap();
    let counts = completions(&messages);
    assert_eq!(counts.len(), 20);
    for order_id in &accepted {
        assert_eq!(counts.get(order_id), Some(&1));
    }
    let packed = messages
        .iter()
        .filter(|m| m.kind == MessageKind::Packing)
        .count();
    assert_eq!(packed, 20 * 250);
}
