use clap::{Parser, ValueEnum};
use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One JSON file per record under an owner-named directory
    File,
    /// Embedded SQLite database
    Sqlite,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Per-user collectible record service over HTTP",
    long_about = "Stores, retrieves, updates and deletes Funko records grouped per owner, \
                  served over a query-parameter HTTP interface with interchangeable \
                  file and SQLite backends."
)]
pub struct Cli {
    #[arg(
        long = "listen",
        env = "FUNKODEX_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:3000",
        help = "HTTP listen address (host:port)"
    )]
    pub listen: std::net::SocketAddr,

    #[arg(
        long,
        env = "FUNKODEX_DATA_DIR",
        default_value = ".funkodex/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long,
        env = "FUNKODEX_BACKEND",
        value_enum,
        default_value_t = Backend::File,
        value_name = "BACKEND",
        help = "Storage backend"
    )]
    pub backend: Backend,

    #[arg(
        long = "log-file",
        env = "FUNKODEX_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted records before starting"
    )]
    pub reset: bool,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
