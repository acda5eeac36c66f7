use crate::addr::Addr;
use crate::bus::AccessSize;
use crate::parse::{ParseError, ParseResult, SrcLoc, Token, TokenValue, lex};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

//===========================================================================//

/// The number of trace entries listed by a `trace` command with no count.
const DEFAULT_TRACE_COUNT: usize = 10;

//===========================================================================//

/// One command in a transaction script.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScriptCommand {
    /// Issues a read transaction.
    Read {
        /// The address to read from.
        addr: Addr,
        /// The access size.
        size: AccessSize,
    },
    /// Issues a write transaction.
    Write {
        /// The address to write to.
        addr: Addr,
        /// The access size.
        size: AccessSize,
        /// The value to write.
        data: u32,
    },
    /// Issues an atomic read-modify-write transaction.
    Atomic {
        /// The address to access.
        addr: Addr,
        /// The access size.
        size: AccessSize,
        /// The value to write.
        data: u32,
    },
    /// Issues a hidden read transaction (excluded from trace and sniffers).
    Peek {
        /// The address to read from.
        addr: Addr,
        /// The access size.
        size: AccessSize,
    },
    /// Pulses the bus reset line, clearing the trace history.
    Reset,
    /// Lists the most recent trace entries.
    Trace {
        /// The maximum number of entries to list.
        count: usize,
    },
    /// Prints the bus memory map.
    Map,
}

//===========================================================================//

/// Parses a transaction script into a sequence of commands, accumulating an
/// error for each malformed line.
pub fn parse_script(source: &str) -> ParseResult<Vec<ScriptCommand>> {
    let tokens = lex(source).map_err(|error| vec![error])?;
    let mut commands = Vec::new();
    let mut errors = Vec::new();
    for line in tokens.split(|token| token.value == TokenValue::Linebreak) {
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(command) => commands.push(command),
            Err(error) => errors.push(error),
        }
    }
    if errors.is_empty() { Ok(commands) } else { Err(errors) }
}

fn parse_line(line: &[Token]) -> Result<ScriptCommand, ParseError> {
    let mut cursor = LineCursor::new(line);
    let (keyword, location) = cursor.identifier()?;
    let command = match keyword.as_str() {
        "read" => {
            let addr = cursor.addr()?;
            let size = cursor.opt_access_size()?;
            ScriptCommand::Read { addr, size }
        }
        "write" => {
            let addr = cursor.addr()?;
            let data = cursor.value()?;
            let size = cursor.opt_access_size()?;
            ScriptCommand::Write { addr, size, data }
        }
        "atomic" => {
            let addr = cursor.addr()?;
            let data = cursor.value()?;
            let size = cursor.opt_access_size()?;
            ScriptCommand::Atomic { addr, size, data }
        }
        "peek" => {
            let addr = cursor.addr()?;
            let size = cursor.opt_access_size()?;
            ScriptCommand::Peek { addr, size }
        }
        "reset" => ScriptCommand::Reset,
        "trace" => {
            let count = cursor.opt_count()?.unwrap_or(DEFAULT_TRACE_COUNT);
            ScriptCommand::Trace { count }
        }
        "map" => ScriptCommand::Map,
        _ => {
            let message = format!("unknown command: {keyword}");
            return Err(ParseError::new(location, message));
        }
    };
    cursor.end_of_line()?;
    Ok(command)
}

//===========================================================================//

struct LineCursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> LineCursor<'a> {
    fn new(tokens: &'a [Token]) -> LineCursor<'a> {
        LineCursor { tokens, position: 0 }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn end_location(&self) -> SrcLoc {
        // The line is never empty; point just past its last token.
        let last = &self.tokens[self.tokens.len() - 1];
        SrcLoc { line: last.location.line, column: last.location.column + 1 }
    }

    fn identifier(&mut self) -> Result<(&'a String, SrcLoc), ParseError> {
        match self.next() {
            Some(Token {
                value: TokenValue::Identifier(name),
                location,
            }) => Ok((name, *location)),
            Some(token) => Err(ParseError::new(
                token.location,
                "expected a command keyword".to_string(),
            )),
            None => Err(ParseError::new(
                self.end_location(),
                "expected a command keyword".to_string(),
            )),
        }
    }

    fn int_literal(
        &mut self,
        what: &str,
    ) -> Result<(&'a BigInt, SrcLoc), ParseError> {
        match self.next() {
            Some(Token {
                value: TokenValue::IntLiteral(value),
                location,
            }) => Ok((value, *location)),
            Some(token) => Err(ParseError::new(
                token.location,
                format!("expected {what}"),
            )),
            None => Err(ParseError::new(
                self.end_location(),
                format!("expected {what}"),
            )),
        }
    }

    fn addr(&mut self) -> Result<Addr, ParseError> {
        let (value, _) = self.int_literal("an address")?;
        Ok(Addr::wrap_bigint(value))
    }

    fn value(&mut self) -> Result<u32, ParseError> {
        let (value, _) = self.int_literal("a data value")?;
        Ok(Addr::wrap_bigint(value).as_u32())
    }

    fn opt_access_size(&mut self) -> Result<AccessSize, ParseError> {
        match self.peek() {
            Some(Token {
                value: TokenValue::Identifier(name),
                location,
            }) => {
                let size = match name.as_str() {
                    "byte" => AccessSize::Byte,
                    "half" => AccessSize::Half,
                    "word" => AccessSize::Word,
                    _ => {
                        let message =
                            format!("unknown access size: {name}");
                        return Err(ParseError::new(*location, message));
                    }
                };
                self.position += 1;
                Ok(size)
            }
            _ => Ok(AccessSize::Word),
        }
    }

    fn opt_count(&mut self) -> Result<Option<usize>, ParseError> {
        if self.peek().is_none() {
            return Ok(None);
        }
        let (value, location) = self.int_literal("an entry count")?;
        match value.to_usize() {
            Some(count) => Ok(Some(count)),
            None => Err(ParseError::new(
                location,
                "entry count out of range".to_string(),
            )),
        }
    }

    fn end_of_line(&mut self) -> Result<(), ParseError> {
        match self.next() {
            None => Ok(()),
            Some(token) => Err(ParseError::new(
                token.location,
                "unexpected token at end of command".to_string(),
            )),
        }
    }
}

//===========================================================================//


//===========================================================================//
