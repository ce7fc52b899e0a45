use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::Backend;

#[derive(Clone)]
pub struct Configuration {
    pub listen: SocketAddr,
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub log_file: Option<PathBuf>,
    pub reset: bool,
}
