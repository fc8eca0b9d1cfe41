//! Formula lexer
//!
//! Turns raw formula text into a finite token stream ending in `EndOfInput`.

use crate::error::{ParseError, ParseResult};

/// A single lexed token with its byte offset in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tag: TokenTag,
    pub offset: usize,
}

impl Token {
    fn new(tag: TokenTag, offset: usize) -> Self {
        Self { tag, offset }
    }

    /// The payload-free kind of this token, for error reporting.
    pub fn kind(&self) -> TokenKind {
        self.tag.kind()
    }
}

/// Token tag plus literal payload where one exists.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenTag {
    // Punctuation and operators
    Equals,
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    LessEqual,
    GreaterEqual,
    NotEqual,
    LessThan,
    GreaterThan,

    // Keywords
    Mod,
    Div,
    Inc,
    Dec,

    // Literals
    /// Numeric literal, e.g. `42` or `3.14`
    Number(f64),
    /// Cell reference, e.g. `A1` (uppercase letters then digits)
    CellRef(String),

    /// End of input
    EndOfInput,
}

impl TokenTag {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenTag::Equals => TokenKind::Equals,
            TokenTag::LeftParen => TokenKind::LeftParen,
            TokenTag::RightParen => TokenKind::RightParen,
            TokenTag::Plus => TokenKind::Plus,
            TokenTag::Minus => TokenKind::Minus,
            TokenTag::Star => TokenKind::Star,
            TokenTag::Slash => TokenKind::Slash,
            TokenTag::LessEqual => TokenKind::LessEqual,
            TokenTag::GreaterEqual => TokenKind::GreaterEqual,
            TokenTag::NotEqual => TokenKind::NotEqual,
            TokenTag::LessThan => TokenKind::LessThan,
            TokenTag::GreaterThan => TokenKind::GreaterThan,
            TokenTag::Mod => TokenKind::Mod,
            TokenTag::Div => TokenKind::Div,
            TokenTag::Inc => TokenKind::Inc,
            TokenTag::Dec => TokenKind::Dec,
            TokenTag::Number(_) => TokenKind::Number,
            TokenTag::CellRef(_) => TokenKind::CellRef,
            TokenTag::EndOfInput => TokenKind::EndOfInput,
        }
    }
}

/// Payload-free token kind, used in syntax errors for expected/found sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Equals,
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    LessEqual,
    GreaterEqual,
    NotEqual,
    LessThan,
    GreaterThan,
    Mod,
    Div,
    Inc,
    Dec,
    Number,
    CellRef,
    EndOfInput,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenKind::Equals => "'='",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::LessEqual => "'<='",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::NotEqual => "'<>'",
            TokenKind::LessThan => "'<'",
            TokenKind::GreaterThan => "'>'",
            TokenKind::Mod => "'mod'",
            TokenKind::Div => "'div'",
            TokenKind::Inc => "'inc'",
            TokenKind::Dec => "'dec'",
            TokenKind::Number => "a number",
            TokenKind::CellRef => "a cell reference",
            TokenKind::EndOfInput => "end of input",
        };
        f.write_str(s)
    }
}

/// Tokenize a formula string.
///
/// The returned stream is finite and always ends with a single
/// [`TokenTag::EndOfInput`]. Whitespace separates tokens but is otherwise
/// insignificant.
///
/// # Example
/// ```rust
/// use table_formula::lexer::{tokenize, TokenTag};
///
/// let tokens = tokenize("=(A1+2)").unwrap();
/// assert_eq!(tokens[2].tag, TokenTag::CellRef("A1".into()));
/// ```
pub fn tokenize(input: &str) -> ParseResult<Vec<Token>> {
    let mut lexer = Lexer { input, pos: 0 };
    let mut tokens = Vec::new();

    loop {
        let token = lexer.scan_token()?;
        let done = token.tag == TokenTag::EndOfInput;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// The lexer holds nothing beyond a cursor into the input.
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn scan_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();

        let start = self.pos;
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::new(TokenTag::EndOfInput, start)),
        };

        // Single-character tokens
        let single = match c {
            '=' => Some(TokenTag::Equals),
            '(' => Some(TokenTag::LeftParen),
            ')' => Some(TokenTag::RightParen),
            '+' => Some(TokenTag::Plus),
            '-' => Some(TokenTag::Minus),
            '*' => Some(TokenTag::Star),
            '/' => Some(TokenTag::Slash),
            _ => None,
        };
        if let Some(tag) = single {
            self.advance();
            return Ok(Token::new(tag, start));
        }

        // Two-character operators, greedy: '<=' is never split into '<' '='
        if c == '<' {
            self.advance();
            let tag = match self.peek_char() {
                Some('=') => {
                    self.advance();
                    TokenTag::LessEqual
                }
                Some('>') => {
                    self.advance();
                    TokenTag::NotEqual
                }
                _ => TokenTag::LessThan,
            };
            return Ok(Token::new(tag, start));
        }
        if c == '>' {
            self.advance();
            let tag = if self.peek_char() == Some('=') {
                self.advance();
                TokenTag::GreaterEqual
            } else {
                TokenTag::GreaterThan
            };
            return Ok(Token::new(tag, start));
        }

        if c.is_ascii_digit() {
            return Ok(self.scan_number(start));
        }

        if c.is_ascii_uppercase() {
            return self.scan_cell_ref(start);
        }

        if c.is_ascii_lowercase() {
            return self.scan_keyword(start);
        }

        Err(ParseError::UnexpectedChar {
            position: start,
            ch: c,
        })
    }

    fn scan_number(&mut self, start: usize) -> Token {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Consume the decimal point only when digits follow it
        if self.peek_char() == Some('.')
            && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit())
        {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Digits and at most one dot always parse as f64
        let value: f64 = self.input[start..self.pos].parse().unwrap_or(0.0);
        Token::new(TokenTag::Number(value), start)
    }

    /// Cell references are one or more uppercase letters followed by one or
    /// more digits, e.g. `A1` or `AB12`. A letter run without digits is a
    /// lex error.
    fn scan_cell_ref(&mut self, start: usize) -> ParseResult<Token> {
        while self.peek_char().map_or(false, |c| c.is_ascii_uppercase()) {
            self.advance();
        }

        let digits_start = self.pos;
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        if digits_start == self.pos {
            let first = self.input[start..].chars().next().unwrap_or('?');
            return Err(ParseError::UnexpectedChar {
                position: start,
                ch: first,
            });
        }

        let identifier = self.input[start..self.pos].to_string();
        Ok(Token::new(TokenTag::CellRef(identifier), start))
    }

    /// Keywords are matched as whole lowercase words, never as substrings
    /// of a longer identifier.
    fn scan_keyword(&mut self, start: usize) -> ParseResult<Token> {
        while self.peek_char().map_or(false, |c| c.is_ascii_lowercase()) {
            self.advance();
        }

        let tag = match &self.input[start..self.pos] {
            "mod" => TokenTag::Mod,
            "div" => TokenTag::Div,
            "inc" => TokenTag::Inc,
            "dec" => TokenTag::Dec,
            word => {
                let first = word.chars().next().unwrap_or('?');
                return Err(ParseError::UnexpectedChar {
                    position: start,
                    ch: first,
                });
            }
        };
        Ok(Token::new(tag, start))
    }

    // === Cursor helpers ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(input: &str) -> Vec<TokenTag> {
        tokenize(input).unwrap().into_iter().map(|t| t.tag).collect()
    }

    #[test]
    fn test_tokenize_simple_formula() {
        assert_eq!(
            tags("=(A1+B2)"),
            vec![
                TokenTag::Equals,
                TokenTag::LeftParen,
                TokenTag::CellRef("A1".into()),
                TokenTag::Plus,
                TokenTag::CellRef("B2".into()),
                TokenTag::RightParen,
                TokenTag::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            tags("42 3.14"),
            vec![
                TokenTag::Number(42.0),
                TokenTag::Number(3.14),
                TokenTag::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_dot_without_digits_is_not_part_of_number() {
        // "1." lexes the number, then fails on the bare dot
        let err = tokenize("1.").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedChar {
                position: 1,
                ch: '.'
            }
        );
    }

    #[test]
    fn test_two_char_operators_are_greedy() {
        assert_eq!(
            tags("<= >= <> < >"),
            vec![
                TokenTag::LessEqual,
                TokenTag::GreaterEqual,
                TokenTag::NotEqual,
                TokenTag::LessThan,
                TokenTag::GreaterThan,
                TokenTag::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            tags("1 mod 2 div inc dec"),
            vec![
                TokenTag::Number(1.0),
                TokenTag::Mod,
                TokenTag::Number(2.0),
                TokenTag::Div,
                TokenTag::Inc,
                TokenTag::Dec,
                TokenTag::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_unknown_word_is_rejected_whole() {
        // "modulo" must not lex as the keyword "mod" plus leftovers
        let err = tokenize("1 modulo 2").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedChar {
                position: 2,
                ch: 'm'
            }
        );
    }

    #[test]
    fn test_cell_ref_requires_digits() {
        let err = tokenize("=(A+1)").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedChar {
                position: 2,
                ch: 'A'
            }
        );
    }

    #[test]
    fn test_multi_letter_cell_ref() {
        assert_eq!(
            tags("AB12"),
            vec![TokenTag::CellRef("AB12".into()), TokenTag::EndOfInput]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("=(1 % 2)").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedChar {
                position: 4,
                ch: '%'
            }
        );
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize("= (A1)").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 2, 3, 5, 6]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tags("   "), vec![TokenTag::EndOfInput]);
    }
}
