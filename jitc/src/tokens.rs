//! Tokens
use std::fmt;

use crate::{lex::LexError, map::HashTable, map::Map};

/// Lexeme recognised by the lexer, positioned at the start of its text.
///
/// Tokens are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    line: usize,
    column: usize,
    kind: TokenKind,
    text: String,
}

impl Token {
    pub fn new(line: usize, column: usize, kind: TokenKind, text: impl Into<String>) -> Self {
        debug_assert!(line >= 1 && column >= 1, "positions are 1-based");
        Self {
            line,
            column,
            kind,
            text: text.into(),
        }
    }

    /// Build an error token whose text is the error's message.
    pub fn error(line: usize, column: usize, err: &LexError) -> Self {
        Self::new(line, column, TokenKind::Error, err.to_string())
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

/// Pretty printed as `kind (line:column) text`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}:{}) {}",
            self.kind, self.line, self.column, self.text
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    /// Identifier in the set of reserved words.
    Keyword(Keyword),
    /// Arithmetic or assignment operator.
    Operator,
    /// Number literal
    Number,
    /// Character literal
    Char,
    /// String literal
    Str,
    /// End-of-file
    EOF,
    /// Malformed input, the token text holds the message.
    Error,
}

impl fmt::Display for TokenKind {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenKind as TK;
        match self {
            TK::Ident      => write!(f, "identifier"),
            TK::Keyword(_) => write!(f, "keyword"),
            TK::Operator   => write!(f, "operator"),
            TK::Number     => write!(f, "number"),
            TK::Char       => write!(f, "character"),
            TK::Str        => write!(f, "string"),
            TK::EOF        => write!(f, "end of file"),
            TK::Error      => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `var b int = 4`
    Var,
    /// `func main()`
    Func,
    /// `const a = 2`
    Const,
}

impl Keyword {
    pub const ALL: [Keyword; 3] = [Keyword::Var, Keyword::Func, Keyword::Const];

    /// Lookup table from keyword text to keyword.
    pub fn table() -> HashTable<Keyword> {
        let mut table = HashTable::new();
        for keyword in Self::ALL {
            table.store(keyword.as_str(), keyword);
        }
        table
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Var => "var",
            Keyword::Func => "func",
            Keyword::Const => "const",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pretty_print() {
        let token = Token::new(1, 5, TokenKind::Ident, "x");
        assert_eq!(token.to_string(), "identifier (1:5) x");

        let token = Token::new(2, 1, TokenKind::Keyword(Keyword::Var), "var");
        assert_eq!(token.to_string(), "keyword (2:1) var");

        let token = Token::new(3, 7, TokenKind::EOF, "");
        assert_eq!(token.to_string(), "end of file (3:7) ");
    }

    #[test]
    fn test_keyword_table() {
        let table = Keyword::table();
        assert_eq!(table.retrieve("var"), Some(&Keyword::Var));
        assert_eq!(table.retrieve("func"), Some(&Keyword::Func));
        assert_eq!(table.retrieve("const"), Some(&Keyword::Const));
        assert_eq!(table.retrieve("let"), None);
    }
}
