//! Custom error types for decp-budget
//!
//! Every failure in a pipeline run is fatal. Errors raised deep inside a
//! filter, join or calculation are wrapped with the name of the stage that
//! was executing so the final message points at both the stage and the
//! offending column or value.

use thiserror::Error;

/// The main error type for decp-budget operations
#[derive(Error, Debug)]
pub enum DecpError {
    /// An expected column or join key is absent from a table
    #[error("Schema error: column '{column}' not found in {table}")]
    Schema { table: String, column: String },

    /// A value could not be parsed or coerced to the expected type
    #[error("Type error in column '{column}': {message}")]
    Type { column: String, message: String },

    /// A value is outside its domain (negative duration, bad shape, ...)
    #[error("Value error: {0}")]
    Value(String),

    /// A payment was computed over a zero-month duration
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors (missing source, unwritable destination, bad CSV)
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// An error annotated with the pipeline stage that produced it
    #[error("stage '{stage}' failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: Box<DecpError>,
    },
}

impl DecpError {
    /// Create a schema error for a missing column
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Schema {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a type error for a column
    pub fn type_error(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Type {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap this error with the name of the failing stage
    pub fn in_stage(self, stage: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with any stage annotations removed
    pub fn root(&self) -> &DecpError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this is a schema error
    pub fn is_schema(&self) -> bool {
        matches!(self.root(), Self::Schema { .. })
    }

    /// Check if this is a type error
    pub fn is_type(&self) -> bool {
        matches!(self.root(), Self::Type { .. })
    }

    /// Check if this is a value error
    pub fn is_value(&self) -> bool {
        matches!(self.root(), Self::Value(_))
    }

    /// Check if this is a division-by-zero error
    pub fn is_division_by_zero(&self) -> bool {
        matches!(self.root(), Self::DivisionByZero(_))
    }
}

/// Attach a stage name to the error side of a result
pub trait StageContext<T> {
    fn stage(self, stage: &str) -> DecpResult<T>;
}

impl<T> StageContext<T> for DecpResult<T> {
    fn stage(self, stage: &str) -> DecpResult<T> {
        self.map_err(|e| e.in_stage(stage))
    }
}

impl From<std::io::Error> for DecpError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DecpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for DecpError {
    fn from(err: csv::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for decp-budget operations
pub type DecpResult<T> = Result<T, DecpError>;
