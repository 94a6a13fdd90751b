//! Hand-written lexer.
//!
//! Only the structure the extractor needs is recognised: identifiers, quoted
//! strings, trivia, and single-character punctuation. Everything between
//! `?>` and the next open tag is one inline-markup token.

use hookdir_core::errors::LexError;

use super::token::{Token, TokenKind};

/// Result of lexing one source file.
///
/// `error` is set when an unterminated construct cut the stream short; the
/// tokens before it are still valid.
#[derive(Debug, Clone, Default)]
pub struct LexOutput<'src> {
    pub tokens: Vec<Token<'src>>,
    pub error: Option<LexError>,
}

/// Lex `source` in one pass.
pub fn tokenize(source: &str) -> LexOutput<'_> {
    Lexer::new(source).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Markup,
    Code,
}

/// Byte-oriented lexer over a UTF-8 source.
///
/// Token boundaries always fall on ASCII bytes, so every slice taken from
/// the source is valid UTF-8.
pub struct Lexer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: u32,
    mode: Mode,
    tokens: Vec<Token<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            mode: Mode::Markup,
            tokens: Vec::new(),
        }
    }

    /// Consume the lexer and produce the token stream.
    pub fn run(mut self) -> LexOutput<'src> {
        let mut error = None;
        while self.pos < self.bytes.len() {
            let step = match self.mode {
                Mode::Markup => {
                    self.lex_markup();
                    Ok(())
                }
                Mode::Code => self.lex_code(),
            };
            if let Err(e) = step {
                error = Some(e);
                break;
            }
        }
        LexOutput {
            tokens: self.tokens,
            error,
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        let text = &self.src[start..end];
        self.tokens.push(Token {
            kind,
            text,
            line: self.line,
        });
        self.line += count_newlines(text);
        self.pos = end;
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn lex_markup(&mut self) {
        let start = self.pos;
        match find_open_tag(self.bytes, start) {
            Some((tag_start, tag_end)) => {
                if tag_start > start {
                    self.push(TokenKind::InlineHtml, start, tag_start);
                }
                self.push(TokenKind::OpenTag, tag_start, tag_end);
                self.mode = Mode::Code;
            }
            None => self.push(TokenKind::InlineHtml, start, self.bytes.len()),
        }
    }

    fn lex_code(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let b = self.bytes[start];
        match b {
            b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c => {
                let end = scan_while(self.bytes, start, is_space);
                self.push(TokenKind::Whitespace, start, end);
            }
            b'?' if self.peek(1) == Some(b'>') => {
                let mut end = start + 2;
                if self.bytes.get(end) == Some(&b'\r') && self.bytes.get(end + 1) == Some(&b'\n') {
                    end += 2;
                } else if self.bytes.get(end) == Some(&b'\n') {
                    end += 1;
                }
                self.push(TokenKind::CloseTag, start, end);
                self.mode = Mode::Markup;
            }
            b'#' if self.peek(1) == Some(b'[') => {
                self.push(TokenKind::Punct, start, start + 2);
            }
            b'#' => self.lex_line_comment(start, 1),
            b'/' if self.peek(1) == Some(b'/') => self.lex_line_comment(start, 2),
            b'/' if self.peek(1) == Some(b'*') => self.lex_block_comment(start)?,
            b'\'' => self.lex_single_quoted(start)?,
            b'"' => self.lex_double_quoted(start, b'"')?,
            b'`' => self.lex_double_quoted(start, b'`')?,
            b'<' if self.bytes[start..].starts_with(b"<<<") => self.lex_heredoc(start)?,
            b'$' if self.peek(1).is_some_and(is_ident_start) => {
                let end = scan_while(self.bytes, start + 1, is_ident_continue);
                self.push(TokenKind::Variable, start, end);
            }
            b'0'..=b'9' => {
                let end = scan_while(self.bytes, start, |c| c.is_ascii_alphanumeric() || c == b'_' || c == b'.');
                self.push(TokenKind::Number, start, end);
            }
            c if is_ident_start(c) => {
                let end = scan_while(self.bytes, start, is_ident_continue);
                self.push(TokenKind::Identifier, start, end);
            }
            _ => self.push(TokenKind::Punct, start, start + 1),
        }
        Ok(())
    }

    /// Line comments stop before the newline or before a `?>`.
    fn lex_line_comment(&mut self, start: usize, marker_len: usize) {
        let mut end = start + marker_len;
        while end < self.bytes.len() {
            match self.bytes[end] {
                b'\n' | b'\r' => break,
                b'?' if self.bytes.get(end + 1) == Some(&b'>') => break,
                _ => end += 1,
            }
        }
        self.push(TokenKind::Comment, start, end);
    }

    fn lex_block_comment(&mut self, start: usize) -> Result<(), LexError> {
        let kind = if self.bytes[start..].starts_with(b"/**")
            && !self.bytes[start..].starts_with(b"/**/")
        {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        };
        match find(self.bytes, start + 2, b"*/") {
            Some(close) => {
                self.push(kind, start, close + 2);
                Ok(())
            }
            None => Err(LexError::UnterminatedComment { line: self.line }),
        }
    }

    fn lex_single_quoted(&mut self, start: usize) -> Result<(), LexError> {
        let mut i = start + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\'' => {
                    self.push(TokenKind::StringLiteral, start, i + 1);
                    return Ok(());
                }
                _ => i += 1,
            }
        }
        Err(LexError::UnterminatedString { line: self.line })
    }

    /// Double-quoted and backtick strings. Any `$name`, `${` or `{$` makes
    /// the token interpolated; backtick strings are never literal.
    fn lex_double_quoted(&mut self, start: usize, quote: u8) -> Result<(), LexError> {
        let mut interpolated = quote == b'`';
        let mut i = start + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                c if c == quote => {
                    let kind = if interpolated {
                        TokenKind::InterpolatedString
                    } else {
                        TokenKind::StringLiteral
                    };
                    self.push(kind, start, i + 1);
                    return Ok(());
                }
                b'$' => {
                    if self
                        .bytes
                        .get(i + 1)
                        .is_some_and(|&c| c == b'{' || is_ident_start(c))
                    {
                        interpolated = true;
                    }
                    i += 1;
                }
                b'{' => {
                    if self.bytes.get(i + 1) == Some(&b'$') {
                        interpolated = true;
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        Err(LexError::UnterminatedString { line: self.line })
    }

    /// `<<<LABEL`, `<<<"LABEL"` or `<<<'LABEL'`, through the closing label.
    /// The closing label may be indented and may be followed by any
    /// non-identifier character.
    fn lex_heredoc(&mut self, start: usize) -> Result<(), LexError> {
        let mut i = scan_while(self.bytes, start + 3, |c| c == b' ' || c == b'\t');
        let quote = match self.bytes.get(i) {
            Some(&q) if q == b'\'' || q == b'"' => {
                i += 1;
                Some(q)
            }
            _ => None,
        };
        let label_start = i;
        if !self.bytes.get(i).copied().is_some_and(is_ident_start) {
            // `<<<` not followed by a label: plain punctuation.
            self.push(TokenKind::Punct, start, start + 1);
            return Ok(());
        }
        let label_end = scan_while(self.bytes, label_start, is_ident_continue);
        let label = &self.bytes[label_start..label_end];
        i = label_end;
        if let Some(q) = quote {
            if self.bytes.get(i) != Some(&q) {
                self.push(TokenKind::Punct, start, start + 1);
                return Ok(());
            }
            i += 1;
        }
        let label_text = String::from_utf8_lossy(label).into_owned();

        let Some(newline) = self.bytes[i..].iter().position(|&c| c == b'\n') else {
            return Err(LexError::UnterminatedHeredoc {
                label: label_text,
                line: self.line,
            });
        };
        let mut line_start = i + newline + 1;
        while line_start <= self.bytes.len() {
            let content = scan_while(self.bytes, line_start, |c| c == b' ' || c == b'\t');
            if self.bytes[content..].starts_with(label) {
                let after = content + label.len();
                if !self.bytes.get(after).copied().is_some_and(is_ident_continue) {
                    self.push(TokenKind::Heredoc, start, after);
                    return Ok(());
                }
            }
            match self.bytes[line_start..].iter().position(|&c| c == b'\n') {
                Some(off) => line_start += off + 1,
                None => break,
            }
        }
        Err(LexError::UnterminatedHeredoc {
            label: label_text,
            line: self.line,
        })
    }
}

/// Locate `<?php` (followed by whitespace or end of input) or `<?=`.
/// Returns the tag span including one trailing whitespace character.
fn find_open_tag(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut i = from;
    while let Some(at) = find(bytes, i, b"<?") {
        let rest = &bytes[at + 2..];
        if rest.first() == Some(&b'=') {
            return Some((at, at + 3));
        }
        if rest.len() >= 3 && rest[..3].eq_ignore_ascii_case(b"php") {
            let end = at + 5;
            match bytes.get(end) {
                None => return Some((at, end)),
                Some(b'\r') if bytes.get(end + 1) == Some(&b'\n') => return Some((at, end + 2)),
                Some(&c) if is_space(c) => return Some((at, end + 1)),
                _ => {}
            }
        }
        i = at + 2;
    }
    None
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn scan_while(bytes: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = from;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}

fn count_newlines(text: &str) -> u32 {
    text.bytes().filter(|&b| b == b'\n').count() as u32
}

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c)
}

/// Bytes >= 0x80 count as identifier characters, so multi-byte UTF-8
/// sequences are never split.
fn is_ident_start(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphabetic() || c >= 0x80
}

fn is_ident_continue(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
