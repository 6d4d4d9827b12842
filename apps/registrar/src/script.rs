//! # Script Runner
//!
//! Executes enrollment commands from text, one per line:
//!
//! ```text
//! # comments and blank lines are skipped
//! enroll Ann Lee | Algorithms
//! drop Ann Lee | Algorithms
//! pending Dr. Grey
//! approve Dr. Grey | 1
//! deny Dr. Grey | 2
//! roster Algorithms
//! courses
//! ```
//!
//! Names may contain spaces, so multi-argument commands separate their
//! arguments with `|`. A failing line is reported and the run continues.

use registrar_core::{
    report, AdvisorStore, CourseStore, Decision, EnrollmentEngine, EnrollmentError, StudentStore,
};
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, error, warn};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Enroll { student: String, course: String },
    Drop { student: String, course: String },
    Decide {
        advisor: String,
        index: usize,
        decision: Decision,
    },
    Pending { advisor: String },
    Roster { course: String },
    Courses,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("`{command}` expects: {usage}")]
    Usage {
        command: &'static str,
        usage: &'static str,
    },

    #[error("invalid request number `{0}`")]
    InvalidIndex(String),
}

/// Counts from one script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Lines that parsed and were dispatched.
    pub executed: usize,
    /// Lines that failed to parse or whose operation failed.
    pub failed: usize,
}

impl fmt::Display for ScriptReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} commands run, {} failed", self.executed, self.failed)
    }
}

fn split_pair(
    rest: &str,
    command: &'static str,
    usage: &'static str,
) -> Result<(String, String), ParseError> {
    let usage_error = ParseError::Usage { command, usage };
    let (left, right) = rest.split_once('|').ok_or(usage_error.clone())?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        return Err(usage_error);
    }
    Ok((left.to_string(), right.to_string()))
}

fn single(rest: &str, command: &'static str, usage: &'static str) -> Result<String, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::Usage { command, usage });
    }
    Ok(rest.to_string())
}

fn parse_decision(
    rest: &str,
    command: &'static str,
    decision: Decision,
) -> Result<ScriptCommand, ParseError> {
    let (advisor, index) = split_pair(rest, command, "<advisor> | <request number>")?;
    let index = index
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidIndex(index.clone()))?;
    Ok(ScriptCommand::Decide {
        advisor,
        index,
        decision,
    })
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb.to_lowercase().as_str() {
        "enroll" => {
            let (student, course) = split_pair(rest, "enroll", "<student> | <course>")?;
            ScriptCommand::Enroll { student, course }
        }
        "drop" => {
            let (student, course) = split_pair(rest, "drop", "<student> | <course>")?;
            ScriptCommand::Drop { student, course }
        }
        "approve" => parse_decision(rest, "approve", Decision::Approve)?,
        "deny" => parse_decision(rest, "deny", Decision::Deny)?,
        "pending" => ScriptCommand::Pending {
            advisor: single(rest, "pending", "<advisor>")?,
        },
        "roster" => ScriptCommand::Roster {
            course: single(rest, "roster", "<course>")?,
        },
        "courses" => ScriptCommand::Courses,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Apply one command, writing its outcome. Returns whether it succeeded.
pub fn execute(
    engine: &mut EnrollmentEngine,
    command: &ScriptCommand,
    out: &mut impl Write,
) -> io::Result<bool> {
    match command {
        ScriptCommand::Enroll { student, course } => {
            warn_if_ambiguous(engine, student);
            let result = engine.enroll_by_name(student, course);
            writeln!(out, "{}", report::enroll_message(engine, &result))?;
            log_failure(result.as_ref().err());
            Ok(result.is_ok())
        }
        ScriptCommand::Drop { student, course } => {
            warn_if_ambiguous(engine, student);
            let result = engine.drop_course_by_name(student, course);
            writeln!(out, "{}", report::drop_message(engine, &result))?;
            log_failure(result.as_ref().err());
            Ok(result.is_ok())
        }
        ScriptCommand::Decide {
            advisor,
            index,
            decision,
        } => {
            let result = engine.decide_by_name(advisor, *index, *decision);
            writeln!(out, "{}", report::decision_message(engine, &result))?;
            log_failure(result.as_ref().err());
            Ok(result.is_ok())
        }
        ScriptCommand::Pending { advisor } => {
            let Some(id) = engine.advisors().find_by_name(advisor) else {
                writeln!(out, "No advisor found with the name {advisor}.")?;
                return Ok(false);
            };
            let views = engine.pending_requests(id);
            if views.is_empty() {
                writeln!(out, "No pending requests.")?;
            } else {
                write!(out, "{}", report::pending_listing(&views))?;
            }
            Ok(true)
        }
        ScriptCommand::Roster { course } => {
            let code = engine.courses().find_by_name(course).map(|c| c.code().clone());
            match code.and_then(|code| report::roster_listing(engine, &code)) {
                Some(listing) => {
                    write!(out, "{listing}")?;
                    Ok(true)
                }
                None => {
                    writeln!(out, "\"{course}\" not found.")?;
                    Ok(false)
                }
            }
        }
        ScriptCommand::Courses => {
            write!(out, "{}", report::course_table(engine))?;
            Ok(true)
        }
    }
}

/// Run every line of `text`, continuing past failures.
pub fn run_script(
    engine: &mut EnrollmentEngine,
    text: &str,
    out: &mut impl Write,
) -> io::Result<ScriptReport> {
    let mut report = ScriptReport::default();

    for (number, line) in text.lines().enumerate() {
        let number = number + 1;
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                warn!(line = number, "Skipping script line: {err}");
                writeln!(out, "line {number}: {err}")?;
                report.failed += 1;
                continue;
            }
        };

        debug!(line = number, ?command, "Executing");
        report.executed += 1;
        if !execute(engine, &command, out)? {
            report.failed += 1;
        }
    }

    Ok(report)
}

fn warn_if_ambiguous(engine: &EnrollmentEngine, name: &str) {
    let matches = engine.students().find_all_by_name(name);
    if let [first, _, ..] = matches.as_slice() {
        warn!(
            name,
            count = matches.len(),
            "Student name is ambiguous, using {}",
            first.id()
        );
    }
}

/// Errors for defects, debug lines for ordinary rejections.
pub(crate) fn log_failure(err: Option<&EnrollmentError>) {
    match err {
        Some(err) if err.is_defect() => error!("Engine invariant breached: {err}"),
        Some(err) => debug!("Operation rejected: {err}"),
        None => {}
    }
}

// =============================================================================
// TESTS
// =============================================================================
