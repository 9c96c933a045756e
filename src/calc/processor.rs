//! Processing API for calculator scripts
//!
//! This module runs source text through one stage of the pipeline (tokens, nested token
//! tree, or AST) and renders the result in one of several formats. Formats are named
//! `<stage>-<format>`, for example `token-simple` or `ast-treeviz`.
//!
//! # Sample Sources
//!
//! The `calc_sources` module provides access to the curated sample scripts under
//! `docs/samples/`. Tests that need more than a one-line expression should load one of
//! these instead of inlining script text.
//!
//! ## Example Usage
//!
//! ```rust
//! use dicecalc::calc::processor::calc_sources::CalcSources;
//!
//! // Get raw string content
//! let content = CalcSources::get_string("010-dice.c5").unwrap();
//!
//! // Get processed content
//! let sexp = CalcSources::get_processed("020-functions.c5", "ast-sexp").unwrap();
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::calc::error::ParseError;
use crate::calc::formats::{serialize_sexp, to_treeviz_str};
use crate::calc::lexer::{lex_with_limit, tokenize, Token, TokenNode};
use crate::calc::parser::{parse_with_limit, parse_with_source, Node, DEFAULT_MAX_DEPTH};

/// Represents the processing stage (what data to extract)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    /// Tokens nested by parentheses
    Tree,
    Ast,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
    Sexp,
    Treeviz,
}

/// Represents a complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingStage {
    fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Token => "token",
            ProcessingStage::Tree => "tree",
            ProcessingStage::Ast => "ast",
        }
    }
}

impl OutputFormat {
    fn name(&self) -> &'static str {
        match self {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Sexp => "sexp",
            OutputFormat::Treeviz => "treeviz",
        }
    }
}

impl ProcessingSpec {
    /// Parse a format string like "token-simple" or "ast-sexp"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let Some((stage, format)) = format_str.split_once('-') else {
            return Err(ProcessingError::InvalidFormat(format_str.to_string()));
        };

        let stage = match stage {
            "token" => ProcessingStage::Token,
            "tree" => ProcessingStage::Tree,
            "ast" => ProcessingStage::Ast,
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            "sexp" => OutputFormat::Sexp,
            "treeviz" => OutputFormat::Treeviz,
            _ => return Err(ProcessingError::InvalidFormatType(format.to_string())),
        };

        let spec = ProcessingSpec { stage, format };
        if !Self::available_specs().contains(&spec) {
            return Err(unsupported(stage, format));
        }
        Ok(spec)
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        [
            (ProcessingStage::Token, OutputFormat::Simple),
            (ProcessingStage::Token, OutputFormat::Json),
            (ProcessingStage::Tree, OutputFormat::Simple),
            (ProcessingStage::Ast, OutputFormat::Sexp),
            (ProcessingStage::Ast, OutputFormat::Treeviz),
            (ProcessingStage::Ast, OutputFormat::Json),
            (ProcessingStage::Ast, OutputFormat::Yaml),
        ]
        .into_iter()
        .map(|(stage, format)| ProcessingSpec { stage, format })
        .collect()
    }
}

impl std::fmt::Display for ProcessingSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.stage.name(), self.format.name())
    }
}

/// Bounds applied to input before and while it is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingLimits {
    /// Files larger than this are refused before they are read
    pub max_bytes: Option<u64>,
    /// Deepest nesting of groups, prefix operators and operator chains
    pub max_depth: usize,
}

impl Default for ProcessingLimits {
    fn default() -> Self {
        Self {
            max_bytes: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Errors that can occur during processing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stage: {0}")]
    InvalidStage(String),
    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Input is {size} bytes, over the limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Read a script, refusing anything larger than `max_bytes` before reading it
pub fn read_source<P: AsRef<Path>>(
    file_path: P,
    max_bytes: Option<u64>,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    let metadata = fs::metadata(file_path)
        .map_err(|_| ProcessingError::FileNotFound(file_path.display().to_string()))?;

    if let Some(limit) = max_bytes {
        if metadata.len() > limit {
            return Err(ProcessingError::InputTooLarge {
                size: metadata.len(),
                limit,
            });
        }
    }

    fs::read_to_string(file_path).map_err(|e| ProcessingError::IoError(e.to_string()))
}

/// Process a script file according to the given specification
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
    limits: &ProcessingLimits,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    let content = read_source(file_path, limits.max_bytes)?;
    let name = file_path.display().to_string();
    process_source_with_limits(&content, Some(&name), spec, limits)
}

/// Process source text according to the given specification
pub fn process_source(
    source: &str,
    name: Option<&str>,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    process_source_with_limits(source, name, spec, &ProcessingLimits::default())
}

/// Process source text, refusing nesting deeper than `limits.max_depth`
pub fn process_source_with_limits(
    source: &str,
    name: Option<&str>,
    spec: &ProcessingSpec,
    limits: &ProcessingLimits,
) -> Result<String, ProcessingError> {
    log::debug!("processing {} as {}", name.unwrap_or("<input>"), spec);
    let depth = limits.max_depth;
    match spec.stage {
        ProcessingStage::Token => format_tokens(&tokenize(source, name)?, spec.format),
        ProcessingStage::Tree => {
            format_tree(&lex_with_limit(source, name, depth)?.tree, spec.format)
        }
        ProcessingStage::Ast => format_ast(&parse_with_limit(source, name, depth)?, spec.format),
    }
}

/// Format tokens according to the specified format
fn format_tokens(tokens: &[Token], format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => Ok(tokens
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(" ")),
        OutputFormat::Json => to_json(&tokens),
        other => Err(unsupported(ProcessingStage::Token, other)),
    }
}

fn format_tree(tree: &[TokenNode], format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => Ok(tree
            .iter()
            .map(TokenNode::to_string)
            .collect::<Vec<_>>()
            .join(" ")),
        other => Err(unsupported(ProcessingStage::Tree, other)),
    }
}

fn format_ast(node: &Node, format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Sexp => Ok(serialize_sexp(node)),
        OutputFormat::Treeviz => Ok(to_treeviz_str(node)),
        OutputFormat::Json => to_json(node),
        OutputFormat::Yaml => {
            serde_yaml::to_string(node).map_err(|e| ProcessingError::Serialization(e.to_string()))
        }
        other => Err(unsupported(ProcessingStage::Ast, other)),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ProcessingError> {
    serde_json::to_string_pretty(value).map_err(|e| ProcessingError::Serialization(e.to_string()))
}

fn unsupported(stage: ProcessingStage, format: OutputFormat) -> ProcessingError {
    ProcessingError::InvalidFormatType(format!(
        "Format '{}' not supported for {} stage",
        format.name(),
        stage.name()
    ))
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(ProcessingSpec::to_string)
        .collect()
}

/// Sample sources module for accessing curated calculator scripts
pub mod calc_sources {
    use super::*;

    /// Available sample files (canonical sources)
    pub const AVAILABLE_SAMPLES: &[&str] = &[
        "000-arithmetic.c5",
        "010-dice.c5",
        "020-functions.c5",
        "030-comparisons.c5",
        "040-unicode.c5",
        "050-script.c5",
    ];

    /// Format options for sample content
    #[derive(Debug, Clone, PartialEq)]
    pub enum SampleFormat {
        /// Raw string content
        String,
        /// Processed content using the specified format string
        Processed(String),
    }

    /// Main interface for accessing sample scripts
    pub struct CalcSources;

    impl CalcSources {
        /// Get the path to the samples directory
        fn samples_dir() -> &'static str {
            concat!(env!("CARGO_MANIFEST_DIR"), "/docs/samples")
        }

        /// Get the full path to a sample file
        pub fn sample_path(filename: &str) -> String {
            format!("{}/{}", Self::samples_dir(), filename)
        }

        /// Validate that a sample file exists and is available
        fn validate_sample(filename: &str) -> Result<(), ProcessingError> {
            if !AVAILABLE_SAMPLES.contains(&filename) {
                return Err(ProcessingError::FileNotFound(format!(
                    "Sample '{}' is not available. Available samples: {:?}",
                    filename, AVAILABLE_SAMPLES
                )));
            }
            Ok(())
        }

        /// Get sample content in the specified format
        pub fn get_sample(filename: &str, format: SampleFormat) -> Result<String, ProcessingError> {
            Self::validate_sample(filename)?;

            let path = Self::sample_path(filename);
            let content = fs::read_to_string(&path)
                .map_err(|e| ProcessingError::IoError(format!("Failed to read {}: {}", path, e)))?;

            match format {
                SampleFormat::String => Ok(content),
                SampleFormat::Processed(format_str) => {
                    let spec = ProcessingSpec::from_string(&format_str)?;
                    process_source(&content, Some(filename), &spec)
                }
            }
        }

        /// Get sample content as raw string
        pub fn get_string(filename: &str) -> Result<String, ProcessingError> {
            Self::get_sample(filename, SampleFormat::String)
        }

        /// Get sample content processed with the specified format
        pub fn get_processed(filename: &str, format: &str) -> Result<String, ProcessingError> {
            Self::get_sample(filename, SampleFormat::Processed(format.to_string()))
        }

        /// Parse a sample into its AST
        pub fn get_ast(filename: &str) -> Result<Node, ProcessingError> {
            let content = Self::get_string(filename)?;
            Ok(parse_with_source(&content, Some(filename))?)
        }

        /// List all available sample files
        pub fn list_samples() -> Vec<&'static str> {
            AVAILABLE_SAMPLES.to_vec()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_get_string_sample() {
            let content = CalcSources::get_string("010-dice.c5").unwrap();
            assert!(content.contains("2d6"));
        }

        #[test]
        fn test_get_processed_sample() {
            let processed = CalcSources::get_processed("000-arithmetic.c5", "ast-sexp").unwrap();
            assert!(processed.starts_with("(+ 2 (* 3 4))"));
        }

        #[test]
        fn test_validate_sample() {
            assert!(CalcSources::validate_sample("000-arithmetic.c5").is_ok());
            assert!(CalcSources::validate_sample("invalid-sample.c5").is_err());
        }

        #[test]
        fn test_all_samples_parse() {
            for sample in CalcSources::list_samples() {
                let ast = CalcSources::get_ast(sample)
                    .unwrap_or_else(|e| panic!("Sample {} should parse: {}", sample, e));
                assert!(
                    !ast.statements().is_empty(),
                    "Sample {} should have statements",
                    sample
                );
            }
        }
    }
}
