use std::net::{SocketAddr, ToSocketAddrs};

use anyhow::Context;
use colored::Colorize;
use stockroom_server::{InventoryServer, ServerConfig};

use crate::cli::Cli;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;

    println!(
        "{} stockroom on {} (cache: {})",
        "✓".green().bold(),
        format!("http://{}", config.bind_addr).bold(),
        config.cache_dir.display().to_string().cyan(),
    );

    InventoryServer::new(config).serve().await?;
    Ok(())
}

/// Merge the optional config file with command-line flags. Flags win.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let base = match &cli.config {
        Some(path) => Some(ServerConfig::load(path)?),
        None => None,
    };

    let bind_addr = match (&cli.host, cli.port, &base) {
        (Some(host), Some(port), _) => resolve_addr(host, port)?,
        (Some(host), None, Some(b)) => resolve_addr(host, b.bind_addr.port())?,
        (None, Some(port), Some(b)) => SocketAddr::new(b.bind_addr.ip(), port),
        (None, None, Some(b)) => b.bind_addr,
        _ => anyhow::bail!("--host and --port are required"),
    };

    let cache_dir = match (&cli.cache, &base) {
        (Some(dir), _) => dir.clone(),
        (None, Some(b)) => b.cache_dir.clone(),
        (None, None) => anyhow::bail!("--cache is required"),
    };

    let mut config = match base {
        Some(b) => ServerConfig { bind_addr, cache_dir, ..b },
        None => ServerConfig::new(bind_addr, cache_dir),
    };
    if let Some(mb) = cli.max_upload_mb {
        config.max_upload_bytes = mb.saturating_mul(1024 * 1024);
    }
    config.validate()?;
    Ok(config)
}

fn resolve_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("cannot resolve {host}:{port}"))?
        .next()
        .with_context(|| format!("{host}:{port} resolved to no addresses"))
}
