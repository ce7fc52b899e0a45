mod error;
mod funko;

pub use error::StoreError;
pub use funko::Funko;
