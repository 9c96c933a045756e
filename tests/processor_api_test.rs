//! Tests for the processor API used by the dicecalc binary

use dicecalc::calc::processor::calc_sources::CalcSources;
use dicecalc::calc::processor::{
    available_formats, process_file, process_source, process_source_with_limits, read_source,
    OutputFormat, ProcessingError, ProcessingLimits, ProcessingSpec, ProcessingStage,
};
use dicecalc::calc::ParseError;
use std::fs;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_spec_round_trips_through_display() {
        for format in available_formats() {
            let spec = ProcessingSpec::from_string(&format).unwrap();
            assert_eq!(spec.to_string(), format);
        }
    }

    #[test]
    fn test_processing_spec_components() {
        let spec = ProcessingSpec::from_string("tree-simple").unwrap();
        assert_eq!(spec.stage, ProcessingStage::Tree);
        assert_eq!(spec.format, OutputFormat::Simple);

        let spec = ProcessingSpec::from_string("ast-yaml").unwrap();
        assert_eq!(spec.stage, ProcessingStage::Ast);
        assert_eq!(spec.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_unsupported_combinations() {
        let err = ProcessingSpec::from_string("token-sexp").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid format type: Format 'sexp' not supported for token stage"
        );
    }

    #[test]
    fn test_process_file_token_simple() {
        let spec = ProcessingSpec::from_string("token-simple").unwrap();
        let path = CalcSources::sample_path("010-dice.c5");
        let output = process_file(&path, &spec, &ProcessingLimits::default()).unwrap();
        assert!(output.starts_with("<number:2> <die_op:d> <number:6> <comma:,>"));
    }

    #[test]
    fn test_process_file_ast_json() {
        let spec = ProcessingSpec::from_string("ast-json").unwrap();
        let path = CalcSources::sample_path("020-functions.c5");
        let output = process_file(&path, &spec, &ProcessingLimits::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let statements = value["statements"].as_array().unwrap();
        assert_eq!(statements.len(), 9);
        assert_eq!(statements[0]["#"], "assignment");
        assert_eq!(statements[0]["name"], "square");
        assert_eq!(statements[0]["value"]["#"], "function_definition");
    }

    #[test]
    fn test_process_source_tree_keeps_groups() {
        let spec = ProcessingSpec::from_string("tree-simple").unwrap();
        let output = process_source("(1 + 1)d(3!)", None, &spec).unwrap();
        assert_eq!(output, "(1 + 1) d (3 !)");
    }

    #[test]
    fn test_parse_error_carries_source_name() {
        let spec = ProcessingSpec::from_string("ast-sexp").unwrap();
        let err = process_source("1 +", Some("inline.c5"), &spec).unwrap_err();
        let ProcessingError::Parse(parse_error) = err else {
            panic!("expected a parse error, got {:?}", err);
        };
        assert!(matches!(parse_error, ParseError::ParseFailed(_)));
        assert_eq!(parse_error.offset(), 2);
        assert!(parse_error.report().starts_with("inline.c5:1:3: "));
    }

    #[test]
    fn test_read_source_rejects_large_files() {
        let path = CalcSources::sample_path("000-arithmetic.c5");
        let err = read_source(&path, Some(1)).unwrap_err();
        assert!(err.to_string().contains("over the limit of 1 bytes"));
    }

    fn assert_too_deep(result: Result<String, ProcessingError>) {
        match result {
            Err(ProcessingError::Parse(ParseError::NestingTooDeep(_))) => {}
            other => panic!("expected NestingTooDeep, got {:?}", other),
        }
    }

    #[test]
    fn test_deeply_nested_files_are_refused() {
        let dir = std::env::temp_dir().join(format!("dicecalc-depth-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let limits = ProcessingLimits {
            max_bytes: Some(1024 * 1024),
            ..ProcessingLimits::default()
        };

        let parens = dir.join("parens.c5");
        fs::write(&parens, format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000))).unwrap();
        let minus = dir.join("minus.c5");
        fs::write(&minus, format!("{}1", "-".repeat(200_000))).unwrap();

        for format in ["ast-sexp", "ast-treeviz", "tree-simple"] {
            let spec = ProcessingSpec::from_string(format).unwrap();
            assert_too_deep(process_file(&parens, &spec, &limits));
        }
        let spec = ProcessingSpec::from_string("ast-json").unwrap();
        assert_too_deep(process_file(&minus, &spec, &limits));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_depth_limit_is_adjustable() {
        let spec = ProcessingSpec::from_string("ast-sexp").unwrap();
        let input = format!("{}1{}", "(".repeat(80), ")".repeat(80));
        assert_too_deep(process_source(&input, None, &spec));

        let limits = ProcessingLimits {
            max_bytes: None,
            max_depth: 80,
        };
        let output = process_source_with_limits(&input, None, &spec, &limits).unwrap();
        assert_eq!(output, "1");
    }

    #[test]
    fn test_every_sample_renders_in_every_ast_format() {
        for sample in CalcSources::list_samples() {
            for format in ["ast-sexp", "ast-treeviz", "ast-json", "ast-yaml"] {
                let output = CalcSources::get_processed(sample, format)
                    .unwrap_or_else(|e| panic!("{} as {} failed: {}", sample, format, e));
                assert!(!output.is_empty());
            }
        }
    }
}
