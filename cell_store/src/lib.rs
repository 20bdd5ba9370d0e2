mod config;
mod error;
mod store;
mod types;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use store::EntityStore;
pub use types::{CellId, CellRecord, ExprEntry, GeneId, MetaPair, StringId, INVALID_STRING};
