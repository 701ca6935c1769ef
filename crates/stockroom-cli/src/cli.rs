use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "stockroom",
    about = "Inventory server: register, search, update and delete items with photos",
    version,
)]
pub struct Cli {
    /// Address to bind, e.g. 127.0.0.1 or localhost
    #[arg(long, required_unless_present = "config")]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long, required_unless_present = "config")]
    pub port: Option<u16>,

    /// Directory holding the inventory document and uploaded photos
    #[arg(short, long, required_unless_present = "config")]
    pub cache: Option<PathBuf>,

    /// TOML file with bind_addr, cache_dir, store_file and max_upload_bytes.
    /// Flags given alongside it take precedence.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Largest accepted upload, in MiB
    #[arg(long)]
    pub max_upload_mb: Option<usize>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}
