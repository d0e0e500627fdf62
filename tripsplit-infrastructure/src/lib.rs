#![warn(clippy::uninlined_format_args)]

pub mod csv_store;
pub mod error;
mod fs;
pub mod json_registry;

pub use csv_store::CsvEntryStore;
pub use error::FileError;
pub use json_registry::JsonMemberRegistry;
