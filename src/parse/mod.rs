//! Facilities for parsing bus transaction scripts.

use std::fmt;

mod lex;
mod script;

pub use lex::{Token, TokenValue, lex};
pub use script::{ScriptCommand, parse_script};

//===========================================================================//

/// A location within a script source file.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SrcLoc {
    /// The line number within the file.  The file starts on line 1.
    pub line: u32,
    /// The column number within the line.  Each line starts at column 0.
    pub column: usize,
}

impl fmt::Display for SrcLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

//===========================================================================//

/// An error encountered while parsing a script source file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    /// The location in the file where the error occurred.
    pub location: SrcLoc,
    /// The error message to report to the user.
    pub message: String,
}

impl ParseError {
    /// Constructs a parse error with the given location and message.
    pub fn new(location: SrcLoc, message: String) -> ParseError {
        ParseError { location, message }
    }
}

//===========================================================================//

/// A specialized `Result` type for parsing operations.
pub type ParseResult<V> = Result<V, Vec<ParseError>>;

//===========================================================================//
