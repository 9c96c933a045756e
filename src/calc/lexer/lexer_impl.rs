//! Implementation of the calculator lexer
//!
//! Scans left to right. At each position every rule in [`RULES`] is tried, and the rule
//! consuming the most characters wins; ties go to the rule declared first. Whitespace is
//! skipped, comments are consumed silently, and a position no rule matches is a fatal
//! [`ParseError::TokenizationFailed`].

use std::sync::Arc;

use crate::calc::error::{Location, ParseError, ParseResult};
use crate::calc::lexer::tokens::{Rule, Source, Token, RULES};

/// Characters skipped between tokens
fn is_skipped_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// The longest match at the start of `rest`, as (rule, matched text, length in chars)
fn longest_match(rest: &str) -> Option<(&'static Rule, &str, usize)> {
    let mut best: Option<(&'static Rule, &str, usize)> = None;
    for rule in RULES.iter() {
        if let Some(m) = rule.pattern.find(rest) {
            let text = m.as_str();
            if text.is_empty() {
                continue;
            }
            let length = text.chars().count();
            // Strictly longer only, so the earliest rule keeps a tie
            if best.map_or(true, |(_, _, best_length)| length > best_length) {
                best = Some((rule, text, length));
            }
        }
    }
    best
}

/// Tokenize a shared source; every token keeps a handle to it
pub fn tokenize_source(source: Arc<Source>) -> ParseResult<Vec<Token>> {
    let code = source.code.as_str();
    let mut tokens = Vec::new();
    let mut byte_pos = 0;
    let mut offset = 0;

    while byte_pos < code.len() {
        let rest = &code[byte_pos..];
        let Some(first) = rest.chars().next() else {
            break;
        };

        if is_skipped_whitespace(first) {
            byte_pos += first.len_utf8();
            offset += 1;
            continue;
        }

        let Some((rule, text, length)) = longest_match(rest) else {
            log::debug!("no lexical rule matches at offset {}", offset);
            return Err(ParseError::TokenizationFailed(Location::new(
                offset,
                Arc::clone(&source),
            )));
        };

        if !rule.kind.is_discarded() {
            log::trace!("token {} {:?} at offset {}", rule.kind, text, offset);
            tokens.push(Token {
                kind: rule.kind,
                text: rule.replacement.unwrap_or(text).to_string(),
                offset,
                index: tokens.len(),
                source: Arc::clone(&source),
            });
        }

        byte_pos += text.len();
        offset += length;
    }

    Ok(tokens)
}

/// Convenience function to tokenize a string with an optional source name
pub fn tokenize(code: &str, name: Option<&str>) -> ParseResult<Vec<Token>> {
    let source = Arc::new(Source::new(code, name.map(str::to_string)));
    tokenize_source(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::lexer::TokenKind;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, None)
            .expect("input should tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input, None)
            .expect("input should tokenize")
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_simple_tokenization() {
        assert_eq!(
            kinds("2+3*4"),
            vec![
                TokenKind::Number,
                TokenKind::AddOp,
                TokenKind::Number,
                TokenKind::MulOp,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn test_offsets_skip_whitespace() {
        let tokens = tokenize(" 1 \t+\n 22", None).unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![1, 4, 7]);
        let indices: Vec<usize> = tokens.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(kinds("->"), vec![TokenKind::Arrow]);
        assert_eq!(kinds("~>"), vec![TokenKind::Arrow]);
        assert_eq!(kinds("<="), vec![TokenKind::CompOp]);
        assert_eq!(kinds("=="), vec![TokenKind::CompOp]);
        assert_eq!(kinds("!="), vec![TokenKind::CompOp]);
        assert_eq!(kinds("="), vec![TokenKind::Assignment]);
        assert_eq!(kinds("!"), vec![TokenKind::Bang]);
    }

    #[test]
    fn test_die_marker_versus_identifiers() {
        assert_eq!(
            kinds("2d6"),
            vec![TokenKind::Number, TokenKind::DieOp, TokenKind::Number]
        );
        assert_eq!(kinds("d20"), vec![TokenKind::DieOp, TokenKind::Number]);
        assert_eq!(kinds("dist"), vec![TokenKind::Word]);
        assert_eq!(kinds("d"), vec![TokenKind::DieOp]);
        assert_eq!(kinds("abc_1"), vec![TokenKind::Word]);
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(texts("1.5 .5 2e10 3E-2 4i"), vec!["1.5", ".5", "2e10", "3E-2", "4i"]);
        assert!(kinds("1.5 .5 2e10 3E-2 4i")
            .iter()
            .all(|k| *k == TokenKind::Number));
    }

    #[test]
    fn test_minus_after_number_is_an_operator() {
        assert_eq!(
            kinds("1-2"),
            vec![TokenKind::Number, TokenKind::AddOp, TokenKind::Number]
        );
    }

    #[test]
    fn test_replacements_normalise_operators() {
        assert_eq!(texts("6÷2×3"), vec!["6", "/", "2", "*", "3"]);
    }

    #[test]
    fn test_superscript_run() {
        let tokens = tokenize("2³⁴", None).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Superscript);
        assert_eq!(tokens[1].text, "³⁴");
        assert_eq!(tokens[1].offset, 1);
    }

    #[test]
    fn test_offsets_are_characters() {
        let tokens = tokenize("π² + 1", None).unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 1, 3, 5]);
        assert_eq!(tokens[0].kind, TokenKind::Word);
    }

    #[test]
    fn test_comments_are_discarded() {
        assert_eq!(
            kinds("1 # the rest is ignored\n+ 2"),
            vec![TokenKind::Number, TokenKind::AddOp, TokenKind::Number]
        );
    }

    #[test]
    fn test_parens_and_punctuation() {
        assert_eq!(
            kinds("(a.),=&|%^"),
            vec![
                TokenKind::ParenOpen,
                TokenKind::Word,
                TokenKind::Period,
                TokenKind::ParenClose,
                TokenKind::Comma,
                TokenKind::Assignment,
                TokenKind::LandOp,
                TokenKind::LorOp,
                TokenKind::ModOp,
                TokenKind::PowOp
            ]
        );
    }

    #[test]
    fn test_unknown_character_fails_at_its_offset() {
        let err = tokenize("@", None).unwrap_err();
        assert!(matches!(err, ParseError::TokenizationFailed(_)));
        assert_eq!(err.offset(), 0);

        let err = tokenize("1 + $", None).unwrap_err();
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn test_tokens_share_the_source() {
        let tokens = tokenize("a + b", Some("script.c5")).unwrap();
        assert_eq!(tokens[0].source.name.as_deref(), Some("script.c5"));
        assert!(Arc::ptr_eq(&tokens[0].source, &tokens[2].source));
    }

    #[test]
    fn test_numbers_accept_any_decimal_digit() {
        let tokens = tokenize("٣ + ３.٥", None).unwrap();
        let summary: Vec<_> = tokens
            .iter()
            .map(|t| (t.kind, t.text.as_str(), t.offset))
            .collect();
        assert_eq!(
            summary,
            vec![
                (TokenKind::Number, "٣", 0),
                (TokenKind::AddOp, "+", 2),
                (TokenKind::Number, "３.٥", 4),
            ]
        );

        // superscript digits are not decimal digits
        let tokens = tokenize("2²", None).unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Superscript);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("", None).unwrap().is_empty());
        assert!(tokenize("  \n\t ", None).unwrap().is_empty());
    }
}
