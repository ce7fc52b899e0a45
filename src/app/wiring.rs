use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::Backend;
use crate::context;
use crate::storage::{self, FileStorage, SqliteStorage};

pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    std::fs::create_dir_all(&ctx.data_dir)?;
    Ok(())
}

pub fn init_storage(
    ctx: &context::Context,
) -> Result<Arc<dyn storage::Storage + Send + Sync>> {
    match ctx.backend {
        Backend::Sqlite => {
            let db_path = ctx
                .data_dir
                .join("funkodex.sqlite")
                .to_string_lossy()
                .into_owned();
            let sqlite = SqliteStorage::new(&db_path);
            if ctx.reset {
                sqlite.reset_all().context("resetting storage")?;
            }
            sqlite.init().context("initializing storage")?;
            Ok(Arc::new(sqlite))
        }
        Backend::File => {
            let root = ctx.data_dir.join("funkos");
            if ctx.reset {
                match std::fs::remove_dir_all(&root) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).context("resetting storage"),
                }
            }
            let file = FileStorage::open(&root).context("initializing storage")?;
            Ok(Arc::new(file))
        }
    }
}
