mod error;
pub use error::ParserError;

/// Error for any input that cannot be turned into a component tree.
pub type DeserializationError = ParserError;

mod line;
pub use line::{BytesLines, Line, LineError, LineReader};

mod content_line;
pub use content_line::{ContentLineError, ContentLineParser, TokenizerState, parse_content_line};

mod component;
pub use component::ComponentParser;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Reject physical lines that end with a bare LF instead of CRLF.
    pub strict_line_endings: bool,
    /// Validate the parsed component tree with [`crate::Component::validate`].
    pub validate: bool,
}
