//! Finds `callee('literal', ...)` in a token stream.
//!
//! A call only yields a record when its first argument is exactly one plain
//! string literal. Variables, concatenations, interpolated strings, nested calls
//! and empty argument lists are skipped silently: computed hook names are
//! not guessed.

use hookdir_core::HookRecord;

use super::callees::CalleeTable;
use crate::lexer::{tokenize, Token, TokenKind};

#[derive(Debug, Clone, Default)]
pub struct CallSiteExtractor {
    callees: CalleeTable,
}

impl CallSiteExtractor {
    pub fn new(callees: CalleeTable) -> Self {
        Self { callees }
    }

    pub fn callees(&self) -> &CalleeTable {
        &self.callees
    }

    /// Extract records from an already lexed stream. Records carry the hook
    /// name, type and the line of the callee; file and source are left for
    /// the caller to fill.
    pub fn extract(&self, tokens: &[Token<'_>]) -> Vec<HookRecord> {
        let mut records = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Identifier {
                continue;
            }
            let Some(hook_type) = self.callees.lookup(token.text) else {
                continue;
            };
            if let Some(name) = first_literal_argument(tokens, i + 1) {
                records.push(HookRecord::static_call(name, hook_type, token.line));
            }
        }
        records
    }

    /// Lex and extract in one step. A truncated stream still yields the
    /// records found before the lexical error.
    pub fn extract_source(&self, source: &str) -> Vec<HookRecord> {
        let output = tokenize(source);
        if let Some(err) = &output.error {
            tracing::debug!(error = %err, "token stream truncated");
        }
        self.extract(&output.tokens)
    }
}

fn next_significant<'a, 's>(tokens: &'a [Token<'s>], from: usize) -> Option<(usize, &'a Token<'s>)> {
    tokens
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, t)| !t.kind.is_trivia())
}

/// The decoded first argument when the call is `( 'literal' ,` or
/// `( 'literal' )`. A literal that starts a longer expression is not a name.
fn first_literal_argument(tokens: &[Token<'_>], after_callee: usize) -> Option<String> {
    let (paren, open) = next_significant(tokens, after_callee)?;
    if !open.is_punct('(') {
        return None;
    }
    let (arg_at, arg) = next_significant(tokens, paren + 1)?;
    let value = arg.literal_value()?;
    let (_, end) = next_significant(tokens, arg_at + 1)?;
    if end.is_punct(',') || end.is_punct(')') {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookdir_core::HookType;

    fn names(src: &str) -> Vec<(String, HookType, Option<u32>)> {
        CallSiteExtractor::default()
            .extract_source(src)
            .into_iter()
            .map(|r| (r.hook_name, r.hook_type, r.line))
            .collect()
    }

    #[test]
    fn literal_action_and_filter() {
        let found = names("<?php\ndo_action('init');\n$v = apply_filters(\"the_title\", $t);\n");
        assert_eq!(
            found,
            vec![
                ("init".to_string(), HookType::Action, Some(2)),
                ("the_title".to_string(), HookType::Filter, Some(3)),
            ]
        );
    }

    #[test]
    fn trivia_between_tokens_is_skipped() {
        let found = names("<?php do_action /* c */ ( // why\n  'spaced' );");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "spaced");
        assert_eq!(found[0].2, Some(1));
    }

    #[test]
    fn dynamic_names_are_not_recorded() {
        assert!(names("<?php apply_filters($name, 1);").is_empty());
        assert!(names("<?php do_action('a_' . $x);").is_empty());
        assert!(names("<?php do_action(\"save_{$type}\");").is_empty());
        assert!(names("<?php do_action(get_name());").is_empty());
        assert!(names("<?php do_action();").is_empty());
        assert!(names("<?php $f = 'do_action'; do_action;").is_empty());
    }

    #[test]
    fn ref_array_variants() {
        let found = names("<?php do_action_ref_array('a', [$x]); apply_filters_ref_array('b', []);");
        assert_eq!(found[0].1, HookType::Action);
        assert_eq!(found[1].1, HookType::Filter);
    }

    #[test]
    fn calls_in_markup_are_ignored() {
        assert!(names("do_action('x') <?php ?> apply_filters('y')").is_empty());
    }

    #[test]
    fn escapes_follow_quote_style() {
        let found = names(r#"<?php do_action('a\nb'); do_action("c\td");"#);
        assert_eq!(found[0].0, "a\\nb");
        assert_eq!(found[1].0, "c\td");
    }

    #[test]
    fn custom_callee_table() {
        let extractor = CallSiteExtractor::new(CalleeTable::new(["fire"], ["refine"]));
        let records = extractor.extract_source("<?php fire('x'); refine('y'); do_action('z');");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].hook_type, HookType::Filter);
    }
}
