use std::ops::Deref;
use std::path::PathBuf;

use crate::configuration::Configuration;

pub struct Context {
    pub config: Configuration,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        let config = Configuration {
            listen: cli.listen,
            data_dir: PathBuf::from(&cli.data_dir),
            backend: cli.backend,
            log_file: cli.log_file.clone().map(PathBuf::from),
            reset: cli.reset,
        };
        Self { config }
    }
}

impl Deref for Context {
    type Target = Configuration;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}
