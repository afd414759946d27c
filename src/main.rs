use clap::Parser;
use miette::{IntoDiagnostic, Result};
use orderpool::application::engine::OrderEngine;
use orderpool::config::EngineConfig;
use orderpool::domain::ports::CatalogStoreBox;
use orderpool::infrastructure::in_memory::InMemoryCatalog;
use orderpool::interfaces::csv::catalog_writer::CatalogWriter;
use orderpool::interfaces::csv::order_reader::OrderReader;
use orderpool::interfaces::json::catalog_loader::CatalogLoader;
use orderpool::telemetry;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Product catalog JSON file
    catalog: PathBuf,

    /// Orders CSV file (`product_id, quantity`)
    orders: PathBuf,

    /// Workers started with the pool
    #[arg(long, default_value_t = orderpool::config::DEFAULT_WORKER_COUNT)]
    workers: usize,

    /// Minimum number of active workers
    #[arg(long, default_value_t = orderpool::config::DEFAULT_WORKER_FLOOR)]
    floor: usize,

    /// Orders that may wait for a worker before submissions are refused
    #[arg(long, default_value_t = orderpool::config::DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Seconds an idle worker waits before asking to retire
    #[arg(long, default_value_t = 30)]
    idle_timeout_secs: u64,

    /// Seconds between pool status samples
    #[arg(long, default_value_t = 5)]
    monitor_tick_secs: u64,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_worker_count(self.workers)
            .with_worker_floor(self.floor)
            .with_queue_capacity(self.queue_capacity)
            .with_idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .with_monitor_tick(Duration::from_secs(self.monitor_tick_secs))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let catalog: CatalogStoreBox = Box::new(InMemoryCatalog::new());
    let products = CatalogLoader::read_path(&cli.catalog).into_diagnostic()?;
    CatalogLoader::seed(catalog.as_ref(), products)
        .await
        .into_diagnostic()?;

    let (engine, mut messages) =
        OrderEngine::start(catalog, cli.engine_config()).into_diagnostic()?;

    // One long-lived consumer prints every worker message.
    let printer = tokio::spawn(async move {
        while let Some(message) = messages.recv().await {
            println!("{message}");
        }
    });

    let file = File::open(&cli.orders).into_diagnostic()?;
    let reader = OrderReader::new(file);
    for request in reader.requests() {
        match request {
            Ok(request) => match engine.submit_request(request).await {
                Ok(order) => eprintln!(
                    "Order {} accepted: {} x {} (total {:.2})",
                    order.id,
                    order.quantity,
                    order.product.name,
                    order.total()
                ),
                Err(e) => eprintln!("Error submitting order: {}", e),
            },
            Err(e) => eprintln!("Error reading order: {}", e),
        }
    }

    // Drain every accepted order before reporting the final catalog.
    let products = engine.shutdown().await.into_diagnostic()?;
    printer.await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = CatalogWriter::new(stdout.lock());
    writer.write_products(products).into_diagnostic()?;

    Ok(())
}
