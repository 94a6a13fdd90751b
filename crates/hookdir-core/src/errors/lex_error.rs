//! Lexer errors. Never surfaced past the lexer: they only mark where a
//! best-effort token stream was cut short.

use super::error_code::{self, HookDirErrorCode};

/// Irrecoverable lexical errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("Unterminated string literal starting on line {line}")]
    UnterminatedString { line: u32 },

    #[error("Unterminated block comment starting on line {line}")]
    UnterminatedComment { line: u32 },

    #[error("Unterminated heredoc <<<{label} starting on line {line}")]
    UnterminatedHeredoc { label: String, line: u32 },
}

impl HookDirErrorCode for LexError {
    fn error_code(&self) -> &'static str {
        error_code::LEX_ERROR
    }
}
