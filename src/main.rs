use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use upipay::application::UpiService;
use upipay::config::{DEFAULT_BANK_SUFFIX, UpiConfig};
use upipay::domain::ports::CollectStore;
use upipay::infrastructure::in_memory::{
    InMemoryCollectStore, InMemoryMandateStore, InMemoryTransactionStore, InMemoryVpaStore,
};
use upipay::infrastructure::retention::spawn_collect_retention;
use upipay::interfaces::batch::handler::handle;
use upipay::interfaces::batch::request_reader::RequestReader;
use upipay::interfaces::batch::response_writer::{Response, ResponseWriter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file with one JSON request per line
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Bank handle appended to VPA prefixes
    #[arg(long, default_value = DEFAULT_BANK_SUFFIX)]
    bank_suffix: String,

    /// Seconds between sweeps of expired collect requests
    #[arg(long, default_value_t = 60)]
    retention_interval_secs: u64,
}

fn in_memory() -> (UpiService, Arc<dyn CollectStore>) {
    let collects = InMemoryCollectStore::new();
    let service = UpiService::new(
        Box::new(InMemoryVpaStore::new()),
        Box::new(InMemoryTransactionStore::new()),
        Box::new(InMemoryMandateStore::new()),
        Box::new(collects.clone()),
    );
    (service, Arc::new(collects))
}

#[cfg(feature = "storage-rocksdb")]
fn persistent(path: &std::path::Path) -> Result<(UpiService, Arc<dyn CollectStore>)> {
    use upipay::infrastructure::rocksdb::RocksDBStore;

    let store = RocksDBStore::open(path).into_diagnostic()?;
    let service = UpiService::new(
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store.clone()),
    );
    Ok((service, Arc::new(store)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("upipay=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (service, collect_store) = match cli.db_path.as_deref() {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            tracing::info!(path = %path.display(), "using RocksDB storage");
            persistent(path)?
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            in_memory()
        }
        None => in_memory(),
    };

    let config = UpiConfig {
        retention_interval: std::time::Duration::from_secs(cli.retention_interval_secs.max(1)),
        ..UpiConfig::default()
    }
    .with_bank_suffix(cli.bank_suffix);
    let retention = spawn_collect_retention(collect_store, config.retention_interval);
    let service = service.with_config(config);

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = RequestReader::new(BufReader::new(file));
    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());

    for request in reader.requests() {
        let response = match request {
            Ok(request) => handle(&service, request).await,
            Err(e) => {
                warn!("Error reading request: {}", e);
                Response::failed(&e)
            }
        };
        writer.write_response(&response).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    retention.abort();
    Ok(())
}
