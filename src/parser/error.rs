use crate::{
    component::ValidationError,
    parser::{ContentLineError, LineError},
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("component has no end")]
    NotComplete,
    #[error("Line {0}: trailing data after the end of the component")]
    TrailingData(usize),
    #[error("Line {line}: END:{name} without matching BEGIN")]
    UnmatchedEnd { line: usize, name: String },
    #[error("Line {line}: malformed nesting, expected END:{expected} but found END:{found}")]
    MalformedNesting {
        line: usize,
        expected: String,
        found: String,
    },
    #[error("Line {0}: property outside of a component")]
    PropertyOutsideComponent(usize),
    #[error("Line {0}: missing component name")]
    MissingComponentName(usize),
    #[error("Line {0}: BEGIN and END must not have parameters")]
    DelimiterParameters(usize),
    #[error("content line error: {0}")]
    ContentLineError(#[from] ContentLineError),
    #[error(transparent)]
    LineError(#[from] LineError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}
