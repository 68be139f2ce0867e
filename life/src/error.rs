use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifeError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("unexpected character {found:?} at line {line}, column {column}")]
    InvalidPattern {
        found: char,
        line: usize,
        column: usize,
    },

    #[error("pattern line {line} has {found} cells, expected {expected}")]
    RaggedPattern {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("pattern is empty")]
    EmptyPattern,
}

pub type LifeResult<T> = Result<T, LifeError>;
