pub mod file;
pub mod sqlite;
pub mod traits;

pub use file::FileStorage;
pub use sqlite::SqliteStorage;
pub use traits::Storage;
