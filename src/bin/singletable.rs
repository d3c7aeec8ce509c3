//! singletable: JSON-lines front end for the resolver
//!
//! Reads one operation per line on stdin and writes one response per line
//! to stdout. Logs go to stderr.
//!
//! ## Usage
//! ```text
//! $ echo '{"op":"getParentWithChildren","PK":"p1"}' | singletable [config.yaml]
//! {"ok":[]}
//! ```
//!
//! ## Configuration
//! - SINGLETABLE_CONFIG: Path to a YAML config file (optional)
//! - SINGLETABLE__STORAGE__TYPE: memory | sqlite | dynamo
//! - SINGLETABLE_LOG: Log filter (default: info)

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use singletable::api::handle_line;
use singletable::config::Config;
use singletable::resolver::Resolver;
use singletable::storage::init_storage;
use singletable::utils::bootstrap::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let path = std::env::args().nth(1);
    let config = Config::load(path.as_deref())?;

    let store = init_storage(&config.storage, &config.retry).await?;
    let resolver = Resolver::from_config(store, &config.resolver);

    info!(
        storage = ?config.storage.storage_type,
        type_policy = ?resolver.type_policy(),
        retry = config.retry.enabled,
        "singletable started"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&resolver, &line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        handled += 1;
    }

    info!(handled, "stdin closed, exiting");
    Ok(())
}
