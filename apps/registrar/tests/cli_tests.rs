//! Integration tests for Registrar CLI commands.
//!
//! Uses tempfile for record files on disk.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use registrar::cli::{
    cmd_courses, cmd_roster, cmd_run, cmd_shell, cmd_summary, dispatch, load_config, load_engine,
    Cli, CliError, Commands, DataSource, FormatArg,
};
use registrar::script::ScriptReport;
use registrar_core::{CourseCode, RecordFormat, StudentId, StudentStore};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write the standard CSV fixture: two undergraduates, two postgraduates
/// (one without an advisor) and two courses.
fn create_csv_records(dir: &TempDir) -> DataSource {
    std::fs::write(
        dir.path().join("students.csv"),
        "student_id,student_name,student_type\n\
         S1,Ann Lee,undergraduate\n\
         S2,Ben Ito,Undergraduate\n\
         S3,Cat Roy,postgraduate\n\
         S4,Dan Fox,postgraduate\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("courses.csv"),
        "course_code,course_name,max_capacity\n\
         CS101,Algorithms,1\n\
         CS102,Data Structures,3\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("advisors.csv"),
        "advisor_name,student1,student2,student3\n\
         Dr. Grey,S3,,\n",
    )
    .unwrap();
    DataSource::new(dir.path(), RecordFormat::Csv)
}

/// Write the same fixture as JSON.
fn create_json_records(dir: &TempDir) -> DataSource {
    std::fs::write(
        dir.path().join("students.json"),
        r#"[
            {"id": "S1", "name": "Ann Lee", "student_type": "undergraduate"},
            {"id": "S3", "name": "Cat Roy", "student_type": "postgraduate"}
        ]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("courses.json"),
        r#"[{"code": "CS101", "name": "Algorithms", "max_capacity": 1}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("advisors.json"),
        r#"[{"name": "Dr. Grey", "assigned_students": ["S3"]}]"#,
    )
    .unwrap();
    DataSource::new(dir.path(), RecordFormat::Json)
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn output_of(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

// =============================================================================
// LOADING TESTS
// =============================================================================

#[test]
fn test_load_csv_records() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);

    let (engine, report) = load_engine(&source).unwrap();
    assert_eq!(report.students, 4);
    assert_eq!(report.courses, 2);
    assert_eq!(report.advisors, 1);
    assert!(report.warnings.is_empty());
    assert!(engine.students().get(&StudentId::new("S3")).is_some());
}

#[test]
fn test_load_json_records() {
    let temp = create_temp_dir();
    let source = create_json_records(&temp);

    let (_, report) = load_engine(&source).unwrap();
    assert_eq!(
        report.summary(),
        "Initialised 2 students, 1 advisors including 1 courses."
    );
}

#[test]
fn test_missing_advisors_file_is_allowed() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);
    std::fs::remove_file(temp.path().join("advisors.csv")).unwrap();

    let (mut engine, report) = load_engine(&source).unwrap();
    assert_eq!(report.advisors, 0);
    assert!(
        engine
            .enroll(&StudentId::new("S3"), &CourseCode::new("CS101"))
            .is_err()
    );
}

#[test]
fn test_missing_students_file_fails() {
    let temp = create_temp_dir();
    let source = DataSource::new(temp.path(), RecordFormat::Csv);

    let result = load_engine(&source);
    assert!(matches!(result, Err(CliError::Read { .. })));
}

#[test]
fn test_bad_capacity_reports_file() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);
    write_file(&temp, "courses.csv", "code,name,cap\nCS101,Algorithms,zero\n");

    let err = load_engine(&source).err().unwrap();
    assert!(matches!(err, CliError::Format { .. }));
    assert!(err.to_string().contains("courses.csv"));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_unknown_advisor_student_is_warning() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);
    write_file(&temp, "advisors.csv", "name,s1\nDr. Grey,S3,S9\n");

    let (_, report) = load_engine(&source).unwrap();
    assert_eq!(report.warnings.len(), 1);
}

// =============================================================================
// CONFIG TESTS
// =============================================================================

#[test]
fn test_config_defaults_without_file() {
    let config = load_config(None).unwrap();
    assert_eq!(config.max_courses_per_student, 4);
    assert_eq!(config.advisor_capacity, 3);
}

#[test]
fn test_config_file_lowers_limit() {
    let temp = create_temp_dir();
    let config = write_file(&temp, "limits.json", r#"{"max_courses_per_student": 1}"#);
    let source = create_csv_records(&temp).with_config(&config);

    let (mut engine, _) = load_engine(&source).unwrap();
    let ann = StudentId::new("S1");
    assert!(engine.enroll(&ann, &CourseCode::new("CS101")).is_ok());
    assert!(engine.enroll(&ann, &CourseCode::new("CS102")).is_err());
}

#[test]
fn test_config_zero_limit_rejected() {
    let temp = create_temp_dir();
    let config = write_file(&temp, "limits.json", r#"{"advisor_capacity": 0}"#);

    let result = load_config(Some(config.as_path()));
    assert!(matches!(result, Err(CliError::Config { .. })));
}

// =============================================================================
// SUMMARY / COURSES / ROSTER COMMAND TESTS
// =============================================================================

#[test]
fn test_summary_text() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);

    let mut out = Vec::new();
    cmd_summary(&source, false, &mut out).unwrap();
    assert_eq!(
        output_of(out),
        "Initialised 4 students, 1 advisors including 2 courses.\n"
    );
}

#[test]
fn test_summary_json() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);

    let mut out = Vec::new();
    cmd_summary(&source, true, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["students"], 4);
    assert_eq!(value["courses"], 2);
}

#[test]
fn test_courses_table() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);

    let mut out = Vec::new();
    cmd_courses(&source, false, &mut out).unwrap();
    let text = output_of(out);
    assert!(text.contains("Course Code"));
    assert!(text.contains("Data Structures"));
    assert!(text.contains("None"));
}

#[test]
fn test_courses_json() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);

    let mut out = Vec::new();
    cmd_courses(&source, true, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(2));
    assert_eq!(value[0]["code"], "CS101");
    assert_eq!(value[0]["enrolled_count"], 0);
}

#[test]
fn test_roster_empty_course() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);

    let mut out = Vec::new();
    cmd_roster(&source, "algorithms", false, &mut out).unwrap();
    assert_eq!(
        output_of(out),
        "Algorithms (Code: CS101, Enrolled: 0/1)\n  None\n"
    );
}

#[test]
fn test_roster_unknown_course() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);

    let mut out = Vec::new();
    let result = cmd_roster(&source, "Astronomy", false, &mut out);
    assert!(matches!(result, Err(CliError::CourseNotFound(_))));
}

// =============================================================================
// RUN COMMAND TESTS
// =============================================================================

#[test]
fn test_run_script_full_flow() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);
    let script = write_file(
        &temp,
        "ops.txt",
        "# direct path\n\
         enroll Ann Lee | Algorithms\n\
         enroll Ben Ito | Algorithms\n\
         \n\
         # routed path\n\
         enroll Cat Roy | Data Structures\n\
         pending Dr. Grey\n\
         approve Dr. Grey | 1\n\
         roster Data Structures\n\
         enroll Dan Fox | Algorithms\n",
    );

    let mut out = Vec::new();
    let report = cmd_run(&source, &script, &mut out).unwrap();
    let text = output_of(out);

    assert_eq!(
        report,
        ScriptReport {
            executed: 7,
            failed: 2,
        }
    );
    assert!(text.contains("Success! Student \"Ann Lee\" enrolled in course \"Algorithms\"."));
    assert!(text.contains("Course \"Algorithms\" is full."));
    assert!(text.contains("Request sent to advisor Dr. Grey for approval."));
    assert!(text.contains("1. Student Cat Roy requests to enroll in Data Structures."));
    assert!(text.contains("Request approved. Cat Roy is now enrolled in Data Structures."));
    assert!(text.contains("Data Structures (Code: CS102, Enrolled: 1/3)\n  Cat Roy (ID: S3, Type: postgraduate)\n"));
    assert!(text.contains("No advisor found for Dan Fox."));
}

#[test]
fn test_run_script_reports_bad_lines_and_continues() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);
    let script = write_file(
        &temp,
        "ops.txt",
        "register Ann Lee | Algorithms\n\
         deny Dr. Grey | one\n\
         drop Ann Lee | Algorithms\n\
         enroll Ann Lee | Algorithms\n",
    );

    let mut out = Vec::new();
    let report = cmd_run(&source, &script, &mut out).unwrap();
    let text = output_of(out);

    assert_eq!(report.executed, 2);
    assert_eq!(report.failed, 3);
    assert!(text.contains("line 1: unknown command `register`"));
    assert!(text.contains("line 2: invalid request number `one`"));
    assert!(text.contains("Failure! Student \"Ann Lee\" NOT enrolled in \"Algorithms\"."));
    assert!(text.contains("Success! Student \"Ann Lee\" enrolled in course \"Algorithms\"."));
}

#[test]
fn test_run_missing_script_fails() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);

    let mut out = Vec::new();
    let result = cmd_run(&source, &temp.path().join("missing.txt"), &mut out);
    assert!(matches!(result, Err(CliError::Read { .. })));
}

// =============================================================================
// SHELL TESTS
// =============================================================================

#[test]
fn test_shell_prints_summary_and_quits() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);

    let mut out = Vec::new();
    cmd_shell(&source, "0\n".as_bytes(), &mut out).unwrap();
    let text = output_of(out);
    assert!(text.starts_with("Initialised 4 students, 1 advisors including 2 courses.\n"));
    assert!(text.contains("6. Advisor Login."));
}

#[test]
fn test_shell_advisor_session() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);
    let input = "1\nData Structures\nCat Roy\n\
                 1\nAlgorithms\nCat Roy\n\
                 6\nnobody\n\
                 6\ndr. grey\n\
                 x\n\
                 a\n7\n\
                 d\n2\n\
                 a\n1\n\
                 4\nData Structures\n\
                 0\n";

    let mut out = Vec::new();
    cmd_shell(&source, input.as_bytes(), &mut out).unwrap();
    let text = output_of(out);

    assert!(text.contains("No advisor found with the name nobody."));
    assert!(text.contains("Welcome, Dr. Grey. Here are your pending requests:"));
    assert!(text.contains("2. Student Cat Roy requests to enroll in Algorithms."));
    assert!(text.contains("Invalid option. Please enter 'a' to approve, 'd' to deny, or 'q' to quit."));
    assert!(text.contains("Invalid request number."));
    assert!(text.contains("Request denied for Cat Roy."));
    assert!(text.contains("Request approved. Cat Roy is now enrolled in Data Structures."));
    assert!(text.contains("Data Structures (Code: CS102, Enrolled: 1/3)"));
}

#[test]
fn test_shell_drop_and_reenroll() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);
    let input = "1\nAlgorithms\nAnn Lee\n\
                 2\nAlgorithms\nBen Ito\n\
                 2\nAlgorithms\nAnn Lee\n\
                 3\nAlgorithms\nBen Ito\n\
                 0\n";

    let mut out = Vec::new();
    cmd_shell(&source, input.as_bytes(), &mut out).unwrap();
    let text = output_of(out);

    assert!(text.contains("Failure! Student \"Ben Ito\" NOT enrolled in \"Algorithms\"."));
    assert!(text.contains("Success! Student \"Ann Lee\" dropped from course \"Algorithms\"."));
    assert!(text.contains("Success! Student \"Ben Ito\" enrolled in course \"Algorithms\"."));
}

#[test]
fn test_shell_warns_on_shared_name() {
    let temp = create_temp_dir();
    let source = create_csv_records(&temp);
    write_file(
        &temp,
        "students.csv",
        "id,name,type\nS1,Sam,undergraduate\nS2,Sam,undergraduate\n",
    );

    let mut out = Vec::new();
    cmd_shell(&source, "1\nAlgorithms\nsam\n0\n".as_bytes(), &mut out).unwrap();
    let text = output_of(out);
    assert!(text.contains("Note: 2 students are named \"sam\", using ID S1."));
}

// =============================================================================
// ARGUMENT PARSING TESTS
// =============================================================================

#[test]
fn test_cli_defaults_to_shell() {
    let cli = Cli::try_parse_from(["registrar"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.format, FormatArg::Csv);
    assert_eq!(cli.data_dir, PathBuf::from("."));
}

#[test]
fn test_cli_parses_roster() {
    let cli = Cli::try_parse_from([
        "registrar",
        "--format",
        "json",
        "--json",
        "roster",
        "Data Structures",
    ])
    .unwrap();
    assert!(cli.json);
    assert_eq!(cli.format, FormatArg::Json);
    assert!(matches!(
        cli.command,
        Some(Commands::Roster { ref course }) if course == "Data Structures"
    ));
}

#[test]
fn test_cli_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["registrar", "--format", "xml"]).is_err());
}

#[test]
fn test_dispatch_courses_json() {
    let temp = create_temp_dir();
    create_json_records(&temp);
    let dir = temp.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["registrar", "-d", dir, "-f", "json", "--json", "courses"])
        .unwrap();

    let mut out = Vec::new();
    dispatch(&cli, "".as_bytes(), &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value[0]["name"], "Algorithms");
}

#[test]
fn test_dispatch_rejects_json_for_shell_and_run() {
    let temp = create_temp_dir();
    create_csv_records(&temp);
    let script = write_file(&temp, "ops.txt", "enroll Ann Lee | Algorithms\n");
    let dir = temp.path().to_str().unwrap();

    let shell = Cli::try_parse_from(["registrar", "-d", dir, "--json", "shell"]).unwrap();
    let mut out = Vec::new();
    let result = dispatch(&shell, "0\n".as_bytes(), &mut out);
    assert!(matches!(result, Err(CliError::JsonUnsupported("shell"))));
    assert!(out.is_empty());

    let bare = Cli::try_parse_from(["registrar", "-d", dir, "--json"]).unwrap();
    let result = dispatch(&bare, "0\n".as_bytes(), Vec::new());
    assert!(matches!(result, Err(CliError::JsonUnsupported("shell"))));

    let run = Cli::try_parse_from([
        "registrar",
        "-d",
        dir,
        "--json",
        "run",
        script.to_str().unwrap(),
    ])
    .unwrap();
    let mut out = Vec::new();
    let result = dispatch(&run, "".as_bytes(), &mut out);
    assert!(matches!(result, Err(CliError::JsonUnsupported("run"))));
    assert!(out.is_empty());
}
