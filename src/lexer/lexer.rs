use crate::error::BnfError;
use crate::token::{Token, TokenKind};

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Turns source text into a token stream ending in `EOF`.
///
/// All-or-nothing: the first lexical error aborts the scan and no partial
/// token list is returned, per §4.1/§7.
pub struct Lexer<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, start: 0, current: 0, line: 1, tokens: Vec::new() }
    }

    pub fn scan_tokens(mut self) -> Result<Vec<Token>, BnfError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(TokenKind::Eof, "", None, self.line));
        Ok(self.tokens)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += c.len_utf8();
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn add_token(&mut self, kind: TokenKind, literal: Option<String>) {
        let lexeme = self.lexeme().to_string();
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn scan_token(&mut self) -> Result<(), BnfError> {
        let c = self.advance();

        match c {
            '|' => self.add_token(TokenKind::Pipe, None),
            '(' => self.add_token(TokenKind::LeftParen, None),
            ')' => self.add_token(TokenKind::RightParen, None),
            '\r' | '\t' | ' ' => {}
            '\n' => {
                self.add_token(TokenKind::Eol, None);
                self.line += 1;
            }
            ';' => self.scan_line_comment(),
            '<' => self.scan_identifier()?,
            ':' => self.scan_assign()?,
            '"' | '\'' => self.scan_string(c)?,
            other => return Err(BnfError::lexer(self.line, format!("Unexpected character '{other}'"))),
        }

        Ok(())
    }

    fn scan_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn scan_assign(&mut self) -> Result<(), BnfError> {
        if self.match_char(':') && self.match_char('=') {
            self.add_token(TokenKind::Assign, None);
            Ok(())
        } else {
            Err(BnfError::lexer(self.line, "Expected '::=' after ':'"))
        }
    }

    fn scan_identifier(&mut self) -> Result<(), BnfError> {
        loop {
            if self.is_at_end() {
                return Err(BnfError::lexer(self.line, "Unterminated identifier"));
            }

            let c = self.peek();

            if c == '>' {
                self.advance();
                break;
            }

            if is_identifier_char(c) {
                self.advance();
            } else {
                return Err(BnfError::lexer(self.line, format!("Invalid identifier character '{c}'")));
            }
        }

        if self.lexeme() == "<EOL>" {
            self.add_token(TokenKind::EolVar, Some("\n".to_string()));
        } else {
            self.add_token(TokenKind::Identifier, None);
        }

        Ok(())
    }

    /// Consumes a quoted string. A closing quote immediately followed by
    /// another quote of the same kind is an escaped literal quote, so that
    /// `"""x"""` yields the single string whose literal is `"x"` — the
    /// terminator is the first closing quote that is *not* doubled.
    fn scan_string(&mut self, quote: char) -> Result<(), BnfError> {
        let mut literal = String::new();

        loop {
            if self.is_at_end() {
                return Err(BnfError::lexer(self.line, "Unterminated string"));
            }

            let c = self.peek();

            if c == '\n' {
                return Err(BnfError::lexer(self.line, "Multiline string is not allowed"));
            }

            if c == quote {
                self.advance();

                if self.peek() == quote {
                    self.advance();
                    literal.push(quote);
                    continue;
                }

                break;
            }

            literal.push(c);
            self.advance();
        }

        self.add_token(TokenKind::String, Some(literal));

        Ok(())
    }
}
