//! Token definitions for the calculator language
//!
//! Tokens are produced from a fixed, ordered rule table (see [`RULES`]). Each rule pairs a
//! token kind with an anchored regex and, optionally, a replacement text that normalises
//! alternative spellings of the same operator (`÷` becomes `/`, `×` becomes `*`).
//!
//! Order in the table matters: when two rules match the same number of characters, the
//! earlier rule wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The text being tokenized, shared by every token cut from it.
///
/// The name is only used for diagnostics (usually a script path).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    pub name: Option<String>,
    pub code: String,
}

impl Source {
    pub fn new(code: impl Into<String>, name: Option<String>) -> Self {
        Self {
            name,
            code: code.into(),
        }
    }

    /// Name to show in diagnostics
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<input>")
    }
}

/// All possible token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// `# ...` up to the end of the line; consumed but never emitted
    Comment,
    Number,
    Word,
    /// The bare `d` of a die roll
    DieOp,
    PowOp,
    /// A run of unicode superscript digits, such as `²³`
    Superscript,
    ModOp,
    MulOp,
    AddOp,
    CompOp,
    ParenOpen,
    ParenClose,
    /// `->` or `~>`
    Arrow,
    Comma,
    Assignment,
    LandOp,
    LorOp,
    /// `!`, used both as prefix not and postfix factorial
    Bang,
    Period,
}

impl TokenKind {
    /// Kinds that consume input without producing a token
    pub fn is_discarded(&self) -> bool {
        matches!(self, TokenKind::Comment)
    }

    pub fn is_paren(&self) -> bool {
        matches!(self, TokenKind::ParenOpen | TokenKind::ParenClose)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Number => "number",
            TokenKind::Word => "word",
            TokenKind::DieOp => "die_op",
            TokenKind::PowOp => "pow_op",
            TokenKind::Superscript => "superscript",
            TokenKind::ModOp => "mod_op",
            TokenKind::MulOp => "mul_op",
            TokenKind::AddOp => "add_op",
            TokenKind::CompOp => "comp_op",
            TokenKind::ParenOpen => "paren_open",
            TokenKind::ParenClose => "paren_close",
            TokenKind::Arrow => "arrow",
            TokenKind::Comma => "comma",
            TokenKind::Assignment => "assignment",
            TokenKind::LandOp => "land_op",
            TokenKind::LorOp => "lor_op",
            TokenKind::Bang => "bang",
            TokenKind::Period => "period",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lexical unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Matched text, or the rule's replacement text when it has one
    pub text: String,
    /// Character offset of the first character of the match
    pub offset: usize,
    /// Position of this token in the flat token sequence
    pub index: usize,
    #[serde(skip)]
    pub source: Arc<Source>,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whether this token is of `kind` and reads exactly `text`
    pub fn is_symbol(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.kind, self.text)
    }
}

/// One entry of the lexical rule table
pub struct Rule {
    pub kind: TokenKind,
    pub pattern: Regex,
    pub replacement: Option<&'static str>,
}

impl Rule {
    fn new(kind: TokenKind, pattern: &str, replacement: Option<&'static str>) -> Self {
        // Patterns are anchored so a match can only start at the current position
        let anchored = format!("^(?:{})", pattern);
        Self {
            kind,
            pattern: Regex::new(&anchored).expect("lexical rule patterns are valid regexes"),
            replacement,
        }
    }
}

/// Rule definitions in declaration order: (kind, pattern, replacement)
const RULE_DEFINITIONS: &[(TokenKind, &str, Option<&str>)] = &[
    (TokenKind::Comment, r"#.*", None),
    // `\d` is any unicode decimal digit, so `٣` and `３` are numbers too
    (TokenKind::Number, r"\d*\.?\d+([eE]-?\d+)?i?", None),
    // A lone `d` is the die marker, but `dx`, `dist` and so on are identifiers
    (
        TokenKind::Word,
        r"π|d[a-zA-Z_][a-zA-Z0-9_]*|[abce-zA-Z_][a-zA-Z0-9_]*",
        None,
    ),
    (TokenKind::DieOp, r"d", None),
    (TokenKind::PowOp, r"\^", None),
    (TokenKind::Superscript, r"[⁰¹²³⁴⁵⁶⁷⁸⁹]+", None),
    (TokenKind::ModOp, r"%", None),
    (TokenKind::MulOp, r"[/÷]", Some("/")),
    (TokenKind::MulOp, r"[*×]", Some("*")),
    (TokenKind::AddOp, r"[+-]", None),
    (TokenKind::CompOp, r"<=|>=|<|>|!=|==", None),
    (TokenKind::ParenOpen, r"\(", None),
    (TokenKind::ParenClose, r"\)", None),
    (TokenKind::Arrow, r"~>|->", None),
    (TokenKind::Comma, r",", None),
    (TokenKind::Assignment, r"=", None),
    (TokenKind::LandOp, r"&", None),
    (TokenKind::LorOp, r"\|", None),
    (TokenKind::Bang, r"!", None),
    (TokenKind::Period, r"\.", None),
];

/// The compiled rule table, built once per process
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    RULE_DEFINITIONS
        .iter()
        .map(|(kind, pattern, replacement)| Rule::new(*kind, pattern, *replacement))
        .collect()
});

/// Translate a run of superscript digits into ordinary digits
pub fn superscript_to_digits(run: &str) -> String {
    run.chars()
        .map(|c| match c {
            '⁰' => '0',
            '¹' => '1',
            '²' => '2',
            '³' => '3',
            '⁴' => '4',
            '⁵' => '5',
            '⁶' => '6',
            '⁷' => '7',
            '⁸' => '8',
            '⁹' => '9',
            other => other,
        })
        .collect()
}
