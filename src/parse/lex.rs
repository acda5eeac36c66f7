use crate::parse::{ParseError, SrcLoc};
use logos::Logos;
use num_bigint::BigInt;

//===========================================================================//

fn identifier_callback(lex: &mut logos::Lexer<TokenValue>) -> String {
    lex.slice().to_string()
}

fn binary_literal_callback(lex: &mut logos::Lexer<TokenValue>) -> BigInt {
    BigInt::parse_bytes(lex.slice()[1..].as_bytes(), 2).unwrap()
}

fn decimal_literal_callback(lex: &mut logos::Lexer<TokenValue>) -> BigInt {
    BigInt::parse_bytes(lex.slice().as_bytes(), 10).unwrap()
}

fn hex_literal_callback(lex: &mut logos::Lexer<TokenValue>) -> BigInt {
    BigInt::parse_bytes(lex.slice()[1..].as_bytes(), 16).unwrap()
}

/// The value of one token in a transaction script.
#[derive(Clone, Debug, Eq, Logos, PartialEq)]
#[logos(skip r"[ \t\r]+")] // whitespace
#[logos(skip r";[^\n]*")] // comments
pub enum TokenValue {
    /// A command or operand keyword.
    #[regex(r"[_A-Za-z][_A-Za-z0-9]*", identifier_callback)]
    Identifier(String),
    /// An integer literal (`$` hexadecimal, `%` binary, or decimal).
    #[regex(r"\$[0-9a-fA-F]+", hex_literal_callback)]
    #[regex(r"%[01]+", binary_literal_callback)]
    #[regex(r"[0-9]+", decimal_literal_callback)]
    IntLiteral(BigInt),
    /// The end of a script line.
    #[token("\n")]
    Linebreak,
}

//===========================================================================//

/// One token in a transaction script, together with its source location.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    /// The value of the token.
    pub value: TokenValue,
    /// The location in the file where the token starts.
    pub location: SrcLoc,
}

//===========================================================================//

/// Tokenizes a transaction script, or fails on the first lexical error.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = TokenValue::lexer(source);
    let mut line: u32 = 1;
    let mut start_of_line: usize = 0;
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let location = SrcLoc { line, column: span.start - start_of_line };
        match result {
            Ok(value) => {
                if let TokenValue::Linebreak = value {
                    line += 1;
                    start_of_line = span.end;
                }
                tokens.push(Token { value, location });
            }
            Err(()) => {
                let message =
                    format!("invalid token: {:?}", lexer.slice());
                return Err(ParseError::new(location, message));
            }
        }
    }
    Ok(tokens)
}

//===========================================================================//


//===========================================================================//
