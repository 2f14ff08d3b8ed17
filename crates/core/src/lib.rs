//! Domain types shared between the storage layer and the HTTP application.
pub mod types;

pub use types::ExampleRecord;
