//! # CLI
//!
//! Argument parsing, record loading, and the command implementations behind
//! the `registrar` binary.
//!
//! Every command loads a fresh engine from the data directory, so state
//! lives only for the duration of one invocation. Command output goes to the
//! writer handed in by the caller; logs go through `tracing`.

use crate::script::{self, ScriptReport};
use crate::shell::Shell;
use clap::{Parser, Subcommand, ValueEnum};
use registrar_core::{
    assemble, report, ConfigParseError, CourseStore, EngineConfig, EnrollmentEngine, FormatError,
    LoadError, LoadReport, RecordFormat,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Registrar - course enrollment console with advisor approval.
#[derive(Debug, Parser)]
#[command(name = "registrar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the student, course and advisor files.
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Record file format.
    #[arg(short, long, value_enum, default_value_t = FormatArg::Csv)]
    pub format: FormatArg,

    /// Engine limits as a JSON file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of text (summary, courses and roster only).
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print how many records were loaded.
    Summary,

    /// List every course with its enrolled students.
    Courses,

    /// Show the roster of one course.
    Roster {
        /// Course name (case-insensitive).
        course: String,
    },

    /// Interactive menu (default).
    Shell,

    /// Execute a command file non-interactively.
    Run {
        /// Path to the script.
        script: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for RecordFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Json => Self::Json,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("{}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigParseError,
    },

    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error("--json is not supported by `{0}`")]
    JsonUnsupported(&'static str),

    #[error("course \"{0}\" not found")]
    CourseNotFound(String),

    #[error("output: {0}")]
    Output(#[from] io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// LOADING
// =============================================================================

/// Where and how to read the record files.
#[derive(Debug, Clone)]
pub struct DataSource {
    pub dir: PathBuf,
    pub format: RecordFormat,
    pub config: Option<PathBuf>,
}

impl DataSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, format: RecordFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
            config: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    /// Path of one record file, e.g. `students.csv`.
    #[must_use]
    pub fn file(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{}", self.format.extension()))
    }
}

impl From<&Cli> for DataSource {
    fn from(cli: &Cli) -> Self {
        Self {
            dir: cli.data_dir.clone(),
            format: cli.format.into(),
            config: cli.config.clone(),
        }
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_with<T>(
    path: &Path,
    text: &str,
    parse: impl FnOnce(&str) -> Result<T, FormatError>,
) -> Result<T, CliError> {
    parse(text).map_err(|source| CliError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the engine limits, falling back to defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = read_file(path)?;
    let config = EngineConfig::from_json(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        max_courses = config.max_courses_per_student,
        advisor_capacity = config.advisor_capacity,
        "Loaded config from {}",
        path.display()
    );
    Ok(config)
}

/// Read every record file and assemble an engine.
///
/// The advisors file is optional; without it every postgraduate request
/// fails with no advisor assigned.
pub fn load_engine(source: &DataSource) -> Result<(EnrollmentEngine, LoadReport), CliError> {
    let config = load_config(source.config.as_deref())?;
    let format = source.format;

    let students_path = source.file("students");
    let students = parse_with(&students_path, &read_file(&students_path)?, |t| {
        format.parse_students(t)
    })?;

    let courses_path = source.file("courses");
    let courses = parse_with(&courses_path, &read_file(&courses_path)?, |t| {
        format.parse_courses(t)
    })?;

    let advisors_path = source.file("advisors");
    let advisors = if advisors_path.exists() {
        parse_with(&advisors_path, &read_file(&advisors_path)?, |t| {
            format.parse_advisors(t)
        })?
    } else {
        warn!("No advisors file at {}", advisors_path.display());
        Vec::new()
    };

    let (engine, report) = assemble(config, students, courses, advisors)?;
    for warning in &report.warnings {
        warn!("{warning}");
    }
    info!(
        students = report.students,
        courses = report.courses,
        advisors = report.advisors,
        "Loaded records from {}",
        source.dir.display()
    );
    Ok((engine, report))
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Print the load summary line.
pub fn cmd_summary(source: &DataSource, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    let (_, report) = load_engine(source)?;
    if json {
        let value = serde_json::json!({
            "students": report.students,
            "courses": report.courses,
            "advisors": report.advisors,
            "warnings": report.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(out, "{}", report.summary())?;
    }
    Ok(())
}

/// Print every course with its roster.
pub fn cmd_courses(source: &DataSource, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    let (engine, _) = load_engine(source)?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&engine.rosters())?)?;
    } else {
        write!(out, "{}", report::course_table(&engine))?;
    }
    Ok(())
}

/// Print the roster of the course with the given name.
pub fn cmd_roster(
    source: &DataSource,
    course_name: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let (engine, _) = load_engine(source)?;
    let code = engine
        .courses()
        .find_by_name(course_name)
        .map(|c| c.code().clone())
        .ok_or_else(|| CliError::CourseNotFound(course_name.to_string()))?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&engine.roster(&code))?)?;
    } else if let Some(listing) = report::roster_listing(&engine, &code) {
        write!(out, "{listing}")?;
    }
    Ok(())
}

/// Execute a script file against a freshly loaded engine.
pub fn cmd_run(
    source: &DataSource,
    script_path: &Path,
    out: &mut impl Write,
) -> Result<ScriptReport, CliError> {
    let (mut engine, _) = load_engine(source)?;
    let text = read_file(script_path)?;
    let report = script::run_script(&mut engine, &text, out)?;
    info!(
        executed = report.executed,
        failed = report.failed,
        "Ran {}",
        script_path.display()
    );
    Ok(report)
}

/// Run the interactive menu until the operator quits or input ends.
pub fn cmd_shell<R: BufRead, W: Write>(
    source: &DataSource,
    input: R,
    mut out: W,
) -> Result<(), CliError> {
    let (engine, report) = load_engine(source)?;
    writeln!(out, "{}", report.summary())?;
    let mut shell = Shell::new(engine, input, out);
    shell.run()?;
    Ok(())
}

/// Dispatch a parsed command line.
pub fn dispatch<R: BufRead, W: Write>(cli: &Cli, input: R, mut out: W) -> Result<(), CliError> {
    let source = DataSource::from(cli);
    match &cli.command {
        Some(Commands::Summary) => cmd_summary(&source, cli.json, &mut out),
        Some(Commands::Courses) => cmd_courses(&source, cli.json, &mut out),
        Some(Commands::Roster { course }) => cmd_roster(&source, course, cli.json, &mut out),
        Some(Commands::Run { .. }) if cli.json => Err(CliError::JsonUnsupported("run")),
        Some(Commands::Shell) | None if cli.json => Err(CliError::JsonUnsupported("shell")),
        Some(Commands::Run { script }) => cmd_run(&source, script, &mut out).map(|_| ()),
        Some(Commands::Shell) | None => cmd_shell(&source, input, out),
    }
}
