use std::sync::Arc;

use owo_colors::OwoColorize;

use crate::config::{Config, ServerConfig};
use crate::error::Result;
use crate::server;
use crate::store::IssueStore;

/// Run the reference issue API over a freshly seeded store
pub async fn cmd_serve(bind: Option<String>) -> Result<()> {
    let server_config = match bind {
        Some(bind) => ServerConfig { bind },
        None => Config::load()?.server,
    };
    let addr = server_config.bind_addr()?;
    let store = Arc::new(IssueStore::seeded());

    eprintln!(
        "Serving {} issues on {} (Ctrl-C to stop)",
        store.len(),
        format!("http://{addr}").cyan()
    );
    server::serve(addr, store).await
}
