//! Lexical analysis
//!
//! The lexer is a state machine. Each [`State`] consumes zero or more
//! characters through the [`Cursor`], may emit a token from the pending
//! lexeme, and names the state to run next. Lexing ends when a state
//! returns `None`.
//!
//! Malformed input is reported inline as [`TokenKind::Error`] tokens and
//! lexing resumes at [`State::Start`]. Only an unknown keyword ends the pass
//! early. Every pass ends with a single [`TokenKind::EOF`] token placed
//! where lexing stopped.
mod cursor;
mod token_stream;

use std::fmt;

use log::{trace, warn};

use crate::{
    map::{HashTable, Map},
    seq::{Sequence, Storage},
    tokens::{Keyword, Token, TokenKind},
};

pub use self::{
    cursor::{Cursor, SourcePos, EOF_CHAR},
    token_stream::TokenStream,
};

/// Lexer configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexConf {
    /// Storage strategy of the emitted token sequence.
    pub storage: Storage,
}

/// States of the lexer.
///
/// The `Var*` states lex a variable declaration:
///
/// ```text
/// var name type = expression
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    Keyword,
    VarName,
    VarType,
    VarValue,
    VarExpression,
    VarInfixExpression,
}

impl State {
    /// State that follows the given keyword.
    ///
    /// Only `var` declarations are lexed so far, the other keywords end
    /// the pass.
    pub fn after_keyword(keyword: Keyword) -> Option<State> {
        match keyword {
            Keyword::Var => Some(State::VarName),
            Keyword::Func | Keyword::Const => None,
        }
    }
}

/// Lexical analyzer.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    keywords: HashTable<Keyword>,
    tokens: Box<dyn Sequence<Token>>,
    storage: Storage,
}

impl<'a> Lexer<'a> {
    pub fn new(source_code: &'a str) -> Self {
        Self::with_conf(source_code, LexConf::default())
    }

    pub fn with_conf(source_code: &'a str, conf: LexConf) -> Self {
        Self {
            cursor: Cursor::new(source_code),
            keywords: Keyword::table(),
            tokens: conf.storage.build(),
            storage: conf.storage,
        }
    }

    /// Original source code that was passed in during construction.
    pub fn source_code(&self) -> &'a str {
        self.cursor.source()
    }

    /// Run the state machine over the whole source.
    pub fn run(mut self) -> TokenStream {
        let mut state = Some(State::Start);
        while let Some(current) = state {
            state = self.step(current);
            trace!("{:?} -> {:?}", current, state);
        }

        if !self.cursor.at_end() {
            let pos = self.cursor.pos();
            warn!(
                "lexing stopped early at {}:{}, {} bytes left",
                pos.line,
                pos.column,
                self.source_code().len() - pos.offset
            );
        }

        let pos = self.cursor.pos();
        self.tokens.push(Token::new(pos.line, pos.column, TokenKind::EOF, ""));

        TokenStream::new(self.tokens, self.storage)
    }

    /// Transition function of the state machine.
    pub fn step(&mut self, state: State) -> Option<State> {
        match state {
            State::Start => self.start(),
            State::Keyword => self.keyword(),
            State::VarName => self.var_name(),
            State::VarType => self.var_type(),
            State::VarValue => self.var_value(),
            State::VarExpression => self.var_expression(),
            State::VarInfixExpression => self.var_infix_expression(),
        }
    }

    /// Emit the pending lexeme as a token.
    fn emit(&mut self, kind: TokenKind) {
        let (start, text) = self.cursor.flush();
        let token = Token::new(start.line, start.column, kind, text);
        trace!("{token}");
        self.tokens.push(token);
    }

    /// Emit an error token positioned at the pending lexeme, dropping
    /// the lexeme.
    fn error(&mut self, err: LexError) {
        let start = self.cursor.lexeme_start();
        self.cursor.discard();
        let token = Token::error(start.line, start.column, &err);
        trace!("{token}");
        self.tokens.push(token);
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(is_whitespace);
        self.cursor.discard();
    }
}

/// States
impl<'a> Lexer<'a> {
    fn start(&mut self) -> Option<State> {
        if self.cursor.at_end() {
            return None;
        }

        match self.cursor.bump() {
            c if is_letter(c) => Some(State::Keyword),
            c if is_whitespace(c) => {
                self.skip_whitespace();
                Some(State::Start)
            }
            c => {
                self.error(LexError::UnexpectedChar(c));
                Some(State::Start)
            }
        }
    }

    fn keyword(&mut self) -> Option<State> {
        self.cursor.eat_while(is_letter);

        match self.keywords.retrieve(self.cursor.lexeme()).copied() {
            Some(keyword) => {
                self.emit(TokenKind::Keyword(keyword));
                let next = State::after_keyword(keyword);
                if next.is_none() {
                    warn!("'{keyword}' declarations are not supported yet");
                }
                next
            }
            None => {
                let word = self.cursor.lexeme().to_owned();
                self.error(LexError::UnknownKeyword(word));
                None
            }
        }
    }

    fn var_name(&mut self) -> Option<State> {
        self.skip_whitespace();

        if is_letter(self.cursor.peek()) {
            self.cursor.eat_while(is_letter);
            self.emit(TokenKind::Ident);
            self.skip_whitespace();
            Some(State::VarType)
        } else {
            self.error(LexError::MissingIdentifier);
            Some(State::Start)
        }
    }

    fn var_type(&mut self) -> Option<State> {
        if is_letter(self.cursor.peek()) {
            self.cursor.eat_while(is_letter);
            self.emit(TokenKind::Ident);
            self.skip_whitespace();
            Some(State::VarValue)
        } else {
            self.error(LexError::MissingType);
            Some(State::Start)
        }
    }

    /// The value is optional, a declaration without one is
    /// default initialised.
    fn var_value(&mut self) -> Option<State> {
        if self.cursor.peek() == '=' {
            self.cursor.bump();
            self.emit(TokenKind::Operator);
            self.skip_whitespace();
            Some(State::VarExpression)
        } else {
            Some(State::Start)
        }
    }

    fn var_expression(&mut self) -> Option<State> {
        if self.cursor.at_end() {
            self.error(LexError::MissingExpression);
            return Some(State::Start);
        }

        match self.cursor.bump() {
            c if is_digit(c) || is_sign(c) => {
                if is_sign(c) && !is_digit(self.cursor.peek()) {
                    // Unary operator applied to the operand that follows.
                    self.emit(TokenKind::Operator);
                    self.skip_whitespace();
                    return Some(State::VarExpression);
                }
                self.cursor.eat_while(is_digit);
                self.emit(TokenKind::Number);
                Some(self.after_operand())
            }
            c if is_letter(c) => {
                // Variable reference or function call.
                self.cursor.eat_while(is_letter);
                self.emit(TokenKind::Ident);
                Some(self.after_operand())
            }
            _ => {
                let text = self.cursor.lexeme().to_owned();
                self.error(LexError::UnknownCharacter(text));
                Some(State::Start)
            }
        }
    }

    fn var_infix_expression(&mut self) -> Option<State> {
        self.cursor.eat_while(is_operator);
        self.emit(TokenKind::Operator);
        self.skip_whitespace();
        Some(State::VarExpression)
    }

    /// An operator continues the expression, anything else ends
    /// the statement.
    fn after_operand(&mut self) -> State {
        self.skip_whitespace();
        if is_operator(self.cursor.peek()) {
            State::VarInfixExpression
        } else {
            State::Start
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_sign(c: char) -> bool {
    matches!(c, '+' | '-')
}

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/')
}

/// Malformed input, reported as the text of an error token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A statement must start with a keyword.
    UnexpectedChar(char),
    UnknownKeyword(String),
    MissingIdentifier,
    MissingType,
    MissingExpression,
    /// Text that can't start an expression.
    UnknownCharacter(String),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use LexError as E;
        match self {
            E::UnexpectedChar(c) => write!(f, "unexpected char '{c}', expected alphabetic"),
            E::UnknownKeyword(word) => write!(f, "unknown keyword '{word}'"),
            E::MissingIdentifier => write!(f, "var declaration requires identifier"),
            E::MissingType => write!(f, "declarations require types"),
            E::MissingExpression => write!(f, "expected expression after '='"),
            E::UnknownCharacter(text) => write!(f, "unknown character encountered '{text}'"),
        }
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).run().iter().map(Token::kind).collect()
    }

    #[test]
    fn test_step_start() {
        let mut lexer = Lexer::new(" \t\nv");
        assert_eq!(lexer.step(State::Start), Some(State::Start));
        assert_eq!(lexer.step(State::Start), Some(State::Keyword));

        let mut lexer = Lexer::new("");
        assert_eq!(lexer.step(State::Start), None);
    }

    #[test]
    fn test_after_keyword() {
        assert_eq!(State::after_keyword(Keyword::Var), Some(State::VarName));
        assert_eq!(State::after_keyword(Keyword::Func), None);
        assert_eq!(State::after_keyword(Keyword::Const), None);
    }

    #[test]
    fn test_value_is_optional() {
        use TokenKind as TK;
        assert_eq!(
            kinds("var x int\nvar y int"),
            vec![
                TK::Keyword(Keyword::Var),
                TK::Ident,
                TK::Ident,
                TK::Keyword(Keyword::Var),
                TK::Ident,
                TK::Ident,
                TK::EOF,
            ]
        );
    }

    #[test]
    fn test_func_ends_pass() {
        use TokenKind as TK;
        assert_eq!(kinds("func main"), vec![TK::Keyword(Keyword::Func), TK::EOF]);
    }

    #[test]
    fn test_missing_expression() {
        let stream = Lexer::new("var x int =").run();
        let errors = stream.errors().collect::<Vec<_>>();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text(), LexError::MissingExpression.to_string());
    }
}
