use thiserror::Error;

use crate::token::{Token, TokenKind};

/// The five error kinds of §7: lexer and parser and resolver errors abort the
/// `parse` pipeline outright; generator errors never escape `Grammar::generate`
/// (a missing binding becomes an empty string); core errors are raised directly
/// by `Grammar::set_start` when the requested rule is unknown.
#[derive(Debug, Error)]
pub enum BnfError {
    #[error("[line {line}] LexerError: {message}")]
    Lexer { line: usize, message: String },

    #[error("[line {line}] ParserError: {message}")]
    Parser { line: usize, message: String },

    #[error("[line {line}] ResolverError: {message}")]
    Resolver { line: usize, message: String },

    #[error("GeneratorError: {message}")]
    Generator { message: String },

    #[error("CoreError: {message}")]
    Core { message: String },
}

impl BnfError {
    pub fn lexer(line: usize, message: impl Into<String>) -> Self {
        BnfError::Lexer { line, message: message.into() }
    }

    pub fn parser_token(token: &Token, message: impl Into<String>) -> Self {
        let message = message.into();
        let where_ = if token.kind == TokenKind::Eof {
            "at end".to_string()
        } else {
            format!("at '{}'", token.lexeme)
        };
        BnfError::Parser { line: token.line, message: format!("{where_}: {message}") }
    }

    pub fn resolver(line: usize, message: impl Into<String>) -> Self {
        BnfError::Resolver { line, message: message.into() }
    }

    pub fn core(message: impl Into<String>) -> Self {
        BnfError::Core { message: message.into() }
    }
}
