//! Error types for Spark

use thiserror::Error;

/// The main error type for Spark operations
#[derive(Debug, Error)]
pub enum SparkError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Sprite sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Animation not found: {name} in sheet {sheet}")]
    MissingAnimation { sheet: String, name: String },

    #[error("Unknown emitter: {0}")]
    UnknownEmitter(u64),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Spark operations
pub type Result<T> = std::result::Result<T, SparkError>;

impl From<toml::de::Error> for SparkError {
    fn from(err: toml::de::Error) -> Self {
        SparkError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_convert() {
        let err: SparkError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert!(matches!(err, SparkError::TomlParseError(_)));
    }

    #[test]
    fn display_names_the_missing_animation() {
        let err = SparkError::MissingAnimation {
            sheet: "fx".into(),
            name: "spark".into(),
        };
        assert_eq!(err.to_string(), "Animation not found: spark in sheet fx");
    }
}
