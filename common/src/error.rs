use thiserror::Error;

/// Semantic error categories shared by the core crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid field name: {0:?}")]
    InvalidField(String),
    #[error("invalid dimension: {0}")]
    InvalidDim(usize),
    #[error("invalid point id: {0}")]
    InvalidPointId(usize),
    #[error("not enough correspondence pairs")]
    NotEnoughPairs,
    #[error("evaluator does not provide a gradient")]
    NeedGradient,
    #[error("empty point sequence")]
    EmptyRange,
}
