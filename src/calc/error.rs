//! Error types for lexing and parsing
//!
//! Every error carries a [`Location`]: a character offset into the original text plus the
//! text itself, which is enough to point a caret at the failure.
//!
//! Tokenization and grouping errors report their own exact offset. The remaining parse
//! errors cannot know where the real mistake is (the grammar backtracks freely), so they
//! report the furthest token any rule managed to consume.

use crate::calc::lexer::Source;
use std::sync::Arc;

/// A position in a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Character offset into `source.code`
    pub offset: usize,
    pub source: Arc<Source>,
}

impl Location {
    pub fn new(offset: usize, source: Arc<Source>) -> Self {
        Self { offset, source }
    }

    /// One-based line and zero-based column of the offset
    pub fn line_col(&self) -> (usize, usize) {
        let mut line = 1;
        let mut column = 0;
        for c in self.source.code.chars().take(self.offset) {
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    /// The offending line followed by a caret under the failing column
    pub fn caret(&self) -> String {
        let (line, column) = self.line_col();
        let text = self.source.code.lines().nth(line - 1).unwrap_or("");
        // Tabs are kept so the caret lines up with the echoed text
        let padding: String = text
            .chars()
            .take(column)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        format!("{}\n{}^", text, padding)
    }
}

/// Errors produced while turning text into an AST
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No lexical rule matches at this offset
    #[error("no token matches the input at offset {}", .0.offset)]
    TokenizationFailed(Location),

    /// A close paren without an open one, or an open paren that is never closed
    #[error("imbalanced parentheses at offset {}", .0.offset)]
    ImbalancedGrouping(Location),

    /// A delimited list that requires an item found none
    #[error("expected an expression at offset {}", .0.offset)]
    ListEmpty(Location),

    /// A rule returned without consuming all of its group
    #[error("unable to finish parsing at offset {}", .0.offset)]
    ParseIncomplete(Location),

    /// A rule required a specific token and found something else, or nothing
    #[error("failed to parse token at offset {}", .0.offset)]
    ParseFailed(Location),

    /// Groups, prefix operators or an operator chain went past the depth limit
    #[error("expression nested too deeply at offset {}", .0.offset)]
    NestingTooDeep(Location),
}

impl ParseError {
    pub fn location(&self) -> &Location {
        match self {
            ParseError::TokenizationFailed(location)
            | ParseError::ImbalancedGrouping(location)
            | ParseError::ListEmpty(location)
            | ParseError::ParseIncomplete(location)
            | ParseError::ParseFailed(location)
            | ParseError::NestingTooDeep(location) => location,
        }
    }

    pub fn offset(&self) -> usize {
        self.location().offset
    }

    pub fn source_text(&self) -> &Source {
        &self.location().source
    }

    /// Multi-line diagnostic: source name, message, the line and a caret
    pub fn report(&self) -> String {
        let location = self.location();
        let (line, column) = location.line_col();
        format!(
            "{}:{}:{}: {}\n{}",
            location.source.display_name(),
            line,
            column + 1,
            self,
            location.caret()
        )
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn location(code: &str, offset: usize) -> Location {
        Location::new(offset, Arc::new(Source::new(code, None)))
    }

    #[test]
    fn test_line_col_single_line() {
        assert_eq!(location("1 + @", 4).line_col(), (1, 4));
    }

    #[test]
    fn test_line_col_multi_line() {
        assert_eq!(location("x = 1,\ny = @", 11).line_col(), (2, 4));
    }

    #[test]
    fn test_caret_points_at_offset() {
        assert_eq!(location("1 + @", 4).caret(), "1 + @\n    ^");
    }

    #[test]
    fn test_caret_on_second_line() {
        assert_eq!(location("x = 1,\ny = @", 11).caret(), "y = @\n    ^");
    }

    #[test]
    fn test_caret_counts_characters_not_bytes() {
        assert_eq!(location("2³ @", 3).caret(), "2³ @\n   ^");
    }

    #[test]
    fn test_report_includes_name_and_message() {
        let source = Arc::new(Source::new("(1", Some("roll.c5".to_string())));
        let error = ParseError::ImbalancedGrouping(Location::new(0, source));
        assert_eq!(
            error.report(),
            "roll.c5:1:1: imbalanced parentheses at offset 0\n(1\n^"
        );
    }

    #[test]
    fn test_offset_accessor() {
        let error = ParseError::ParseFailed(location("1 +", 2));
        assert_eq!(error.offset(), 2);
        assert_eq!(error.source_text().code, "1 +");
    }

    #[test]
    fn test_nesting_message() {
        let error = ParseError::NestingTooDeep(location("((1))", 1));
        assert_eq!(error.to_string(), "expression nested too deeply at offset 1");
    }
}
