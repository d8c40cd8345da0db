use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefsError {
    #[error("no definitions resource for option `{option}`")]
    NotFound { option: String },

    #[error("cannot read definitions for `{option}` from {}: {source}", path.display())]
    Io {
        option: String,
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{option}` line {line}: expected `key: value`, found {text:?}")]
    MalformedLine {
        option: String,
        line:   usize,
        text:   String,
    },

    #[error("`{option}` line {line}: missing trailing newline")]
    MissingNewline { option: String, line: usize },

    #[error("`{option}` line {line}: key `{key}` defined twice")]
    DuplicateKey {
        option: String,
        line:   usize,
        key:    String,
    },

    #[error("`{option}`: missing definition `{key}`")]
    MissingKey { option: String, key: String },

    #[error("`{option}`: cannot parse `{key}` from {value:?}: {reason}")]
    InvalidValue {
        option: String,
        key:    String,
        value:  String,
        reason: String,
    },
}

pub type DefsResult<T> = Result<T, DefsError>;
