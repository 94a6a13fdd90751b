//! Lexer — flat token stream over PHP-style source, best effort.

pub mod escape;
pub mod lexer;
pub mod token;

pub use lexer::{tokenize, LexOutput, Lexer};
pub use token::{Token, TokenKind};
