use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodePathError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid deck: {0}")]
    InvalidDeck(String),
    #[error("relevance score needs at least one statement")]
    EmptyStatements,
    #[error("unknown block: {0}")]
    UnknownBlock(String),
}
