//! Character scanner.
use std::str::Chars;

/// Returned when the cursor is at the end of the source.
///
/// Source text can contain `'\0'` characters, so use
/// [`Cursor::at_end`] to tell them apart.
pub const EOF_CHAR: char = '\0';

/// Position within the source, 1-based for line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    /// Byte offset in the source.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SourcePos {
    const START: SourcePos = SourcePos {
        offset: 0,
        line: 1,
        column: 1,
    };
}

/// Reads the source one character at a time while tracking the
/// pending lexeme.
///
/// The pending lexeme is the text between the last emission boundary and
/// the current position. Consuming characters extends it; flushing or
/// discarding it moves the boundary up to the current position.
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    /// Position of the next character to be consumed.
    pos: SourcePos,
    /// Position where the pending lexeme starts.
    lexeme_start: SourcePos,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars(),
            pos: SourcePos::START,
            lexeme_start: SourcePos::START,
        }
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Position of the next character to be consumed.
    #[inline]
    pub fn pos(&self) -> SourcePos {
        self.pos
    }

    /// Position where the pending lexeme starts.
    #[inline]
    pub fn lexeme_start(&self) -> SourcePos {
        self.lexeme_start
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos.offset >= self.source.len()
    }

    /// Next character without consuming it.
    #[inline]
    pub fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    /// Consume the next character.
    ///
    /// At the end of the source nothing is consumed and
    /// [`EOF_CHAR`] is returned.
    pub fn bump(&mut self) -> char {
        match self.chars.next() {
            Some(c) => {
                self.pos.offset += c.len_utf8();
                if c == '\n' {
                    self.pos.line += 1;
                    self.pos.column = 1;
                } else {
                    self.pos.column += 1;
                }
                c
            }
            None => EOF_CHAR,
        }
    }

    /// Consume characters while they match the predicate.
    ///
    /// Returns the number of characters consumed.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while !self.at_end() && predicate(self.peek()) {
            self.bump();
            count += 1;
        }
        count
    }

    /// Text of the pending lexeme.
    #[inline]
    pub fn lexeme(&self) -> &'a str {
        &self.source[self.lexeme_start.offset..self.pos.offset]
    }

    /// Take the pending lexeme, moving the boundary to the current position.
    pub fn flush(&mut self) -> (SourcePos, &'a str) {
        let start = self.lexeme_start;
        let text = self.lexeme();
        self.lexeme_start = self.pos;
        (start, text)
    }

    /// Drop the pending lexeme.
    #[inline]
    pub fn discard(&mut self) {
        self.lexeme_start = self.pos;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_line_column() {
        let mut cursor = Cursor::new("ab\ncd");
        assert_eq!(cursor.bump(), 'a');
        assert_eq!(cursor.bump(), 'b');
        assert_eq!((cursor.pos().line, cursor.pos().column), (1, 3));

        assert_eq!(cursor.bump(), '\n');
        assert_eq!((cursor.pos().line, cursor.pos().column), (2, 1));

        assert_eq!(cursor.bump(), 'c');
        assert_eq!((cursor.pos().line, cursor.pos().column), (2, 2));
    }

    #[test]
    fn test_bump_at_end() {
        let mut cursor = Cursor::new("a");
        cursor.bump();
        assert!(cursor.at_end());
        assert_eq!(cursor.bump(), EOF_CHAR);
        assert_eq!(cursor.pos().offset, 1);
        assert_eq!(cursor.pos().column, 2);
    }

    #[test]
    fn test_flush_lexeme() {
        let mut cursor = Cursor::new("var  x");
        cursor.eat_while(|c| c.is_ascii_alphabetic());
        let (start, text) = cursor.flush();
        assert_eq!(text, "var");
        assert_eq!(start.column, 1);

        cursor.eat_while(|c| c == ' ');
        cursor.discard();
        cursor.bump();
        let (start, text) = cursor.flush();
        assert_eq!(text, "x");
        assert_eq!(start.column, 6);
        assert_eq!(cursor.lexeme(), "");
    }

    #[test]
    fn test_multibyte_offsets() {
        let mut cursor = Cursor::new("é#");
        assert_eq!(cursor.bump(), 'é');
        assert_eq!(cursor.pos().offset, 2);
        assert_eq!(cursor.pos().column, 2);
        assert_eq!(cursor.lexeme(), "é");
    }
}
