//! Serde roundtrip and JsonSchema validation tests for entity and response types.

use chrono::Utc;
use lec_core::entities::*;
use lec_core::enums::*;
use lec_core::responses::*;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn undeclared_identifier() -> Diagnostic {
    Diagnostic {
        severity: Severity::Error,
        code: Some("7576".into()),
        message: "Undeclared identifier.".into(),
        file: Some("src/Counter.sol".into()),
        line: Some(7),
        column: Some(9),
        source: Some("DeclarationError".into()),
    }
}

roundtrip_and_validate!(
    progress_roundtrip,
    StudentProgress,
    StudentProgress {
        id: "prg-a3f8b2c1".into(),
        student_id: "stu-1".into(),
        course_id: "solidity-101".into(),
        lesson_id: "lesson-2".into(),
        completed: true,
        completed_at: Some(Utc::now()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    source_file_roundtrip,
    SourceFile,
    SourceFile {
        id: "sfl-c4e2d1f0".into(),
        progress_id: "prg-a3f8b2c1".into(),
        file_name: "Counter.sol".into(),
        file_path: "src/Counter.sol".into(),
        content: "contract Counter { uint256 public number; }".into(),
        file_type: FileType::Contract,
        is_main: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    compilation_roundtrip,
    CompilationResult,
    CompilationResult {
        id: "cmp-b7a3f9e2".into(),
        progress_id: "prg-a3f8b2c1".into(),
        success: false,
        errors: vec![undeclared_identifier()],
        warnings: vec![Diagnostic::new(Severity::Warning, "Unused function parameter.")],
        error_count: 1,
        warning_count: 1,
        exit_code: Some(1),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    test_result_roundtrip,
    TestResult,
    TestResult {
        id: "tst-e1c4b2d3".into(),
        progress_id: "prg-a3f8b2c1".into(),
        success: false,
        status: TestRunStatus::Completed,
        test_file_name: "Counter.t.sol".into(),
        contract_name: Some("Counter".into()),
        tests: vec![
            TestCase::passed("test_Increment()"),
            TestCase::failed("test_Decrement()", Some("arithmetic underflow".into())),
        ],
        summary: TestSummary {
            total: 2,
            passed: 1,
            failed: 1,
        },
        errors: vec![],
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    compile_response_roundtrip,
    CompileResponse,
    CompileResponse {
        success: false,
        errors: vec![undeclared_identifier()],
        warnings: vec![],
        output: Some("Error (7576): Undeclared identifier.".into()),
        raw: None,
    }
);

roundtrip_and_validate!(
    test_run_response_roundtrip,
    TestRunResponse,
    TestRunResponse::stopped(TestRunStatus::NoContractName, "Counter.t.sol", None)
);
