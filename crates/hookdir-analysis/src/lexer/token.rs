//! Token types.

use super::escape;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Markup outside `<?php ... ?>`.
    InlineHtml,
    /// `<?php` or `<?=`, including one trailing whitespace character.
    OpenTag,
    /// `?>`, including one trailing newline.
    CloseTag,
    Whitespace,
    /// `// ...`, `# ...` or `/* ... */`.
    Comment,
    /// `/** ... */`.
    DocComment,
    Identifier,
    /// `$name`.
    Variable,
    Number,
    /// A quoted string with no interpolation. Its value is fully known.
    StringLiteral,
    /// A double-quoted or backtick string that interpolates variables.
    InterpolatedString,
    /// Heredoc or nowdoc, opaque.
    Heredoc,
    /// Any other single character.
    Punct,
}

impl TokenKind {
    /// Tokens the extractor steps over transparently.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
        )
    }
}

/// One token, borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// Raw source text, quotes and delimiters included.
    pub text: &'src str,
    /// 1-based line the token starts on.
    pub line: u32,
}

impl<'src> Token<'src> {
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct && self.text.len() == ch.len_utf8() && self.text.starts_with(ch)
    }

    /// Decoded value of a literal string token, `None` for every other kind.
    pub fn literal_value(&self) -> Option<String> {
        if self.kind != TokenKind::StringLiteral || self.text.len() < 2 {
            return None;
        }
        let body = &self.text[1..self.text.len() - 1];
        match self.text.as_bytes()[0] {
            b'\'' => Some(escape::unescape_single(body)),
            b'"' => Some(escape::unescape_double(body)),
            _ => None,
        }
    }
}
