//! Data module - CSV loading, record entry and summaries

mod loader;
mod processor;
mod record;

pub use loader::{LoaderError, Record, Table, TableError};
pub use processor::DataProcessor;
pub use record::RecordDraft;
