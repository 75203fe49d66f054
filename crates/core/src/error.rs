#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Schema mismatch in {record}: {message}")]
    Schema {
        record: &'static str,
        message: String,
    },

    #[error("Shoot '{shoot}' has no usable universe: {reason}")]
    MissingUniverse { shoot: String, reason: String },
}

impl CoreError {
    /// Wrap a `serde_json` decoding failure for the named record kind.
    pub fn schema(record: &'static str, err: serde_json::Error) -> Self {
        Self::Schema {
            record,
            message: err.to_string(),
        }
    }
}
