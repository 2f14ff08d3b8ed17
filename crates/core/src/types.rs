use serde::Deserialize;
use uuid::Uuid;

/// Single-row result produced by the example query.
///
/// The `id` is generated by the database on every query and is never
/// persisted. It holds the hyphenated textual form of a version 4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExampleRecord {
    pub id: String,
}

impl ExampleRecord {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into() }
    }

    /// Parses the textual id into a [`Uuid`].
    pub fn uuid(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.id)
    }
}
