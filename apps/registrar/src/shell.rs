//! # Shell
//!
//! The interactive enrollment menu.
//!
//! Generic over its input and output so tests can drive it with in-memory
//! buffers. End of input at any prompt ends the session cleanly.

use crate::script::log_failure;
use registrar_core::{
    report, AdvisorId, AdvisorStore, CourseCode, CourseStore, Decision, EnrollmentEngine,
    StudentId, StudentStore,
};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

const RULE: &str = "===============================";

const MENU: &str = "Enter your choice:
1. Enroll Student.
2. Drop a Course.
3. Re-enroll in a Course.
4. List Enrolled Students.
5. List All Courses and Enrolled Students.
6. Advisor Login.
0. Quit.";

/// Interactive session over one engine.
pub struct Shell<R, W> {
    engine: EnrollmentEngine,
    input: R,
    output: W,
}

/// Whether the session should keep going after a menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(engine: EnrollmentEngine, input: R, output: W) -> Self {
        Self {
            engine,
            input,
            output,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &EnrollmentEngine {
        &self.engine
    }

    /// Give back the engine and the output sink.
    pub fn into_parts(self) -> (EnrollmentEngine, W) {
        (self.engine, self.output)
    }

    /// Show the menu and dispatch choices until quit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{RULE}\n{MENU}\n{RULE}")?;
            let Some(choice) = self.read_line()? else {
                break;
            };

            let flow = match choice.as_str() {
                "1" | "3" => self.enroll()?,
                "2" => self.drop_course()?,
                "4" => self.list_enrolled()?,
                "5" => {
                    write!(self.output, "{}", report::course_table(&self.engine))?;
                    Flow::Continue
                }
                "6" => self.advisor_session()?,
                "0" => Flow::Exit,
                _ => {
                    writeln!(self.output, "Invalid choice. Try again.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }
        debug!("Shell session ended");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Menu actions
    // -------------------------------------------------------------------------

    fn enroll(&mut self) -> io::Result<Flow> {
        let Some(course) = self.prompt_course("Enter the name of the course: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(student) = self.prompt_student()? else {
            return Ok(Flow::Exit);
        };

        let result = self.engine.enroll(&student, &course);
        info!(%student, %course, ok = result.is_ok(), "enroll");
        log_failure(result.as_ref().err());
        writeln!(
            self.output,
            "{}",
            report::enroll_message(&self.engine, &result)
        )?;
        Ok(Flow::Continue)
    }

    fn drop_course(&mut self) -> io::Result<Flow> {
        let Some(course) = self.prompt_course("Enter the name of the course to drop: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(student) = self.prompt_student()? else {
            return Ok(Flow::Exit);
        };

        let result = self.engine.drop_course(&student, &course);
        info!(%student, %course, ok = result.is_ok(), "drop");
        log_failure(result.as_ref().err());
        writeln!(self.output, "{}", report::drop_message(&self.engine, &result))?;
        Ok(Flow::Continue)
    }

    fn list_enrolled(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Enter the name of the course: ")? else {
            return Ok(Flow::Exit);
        };
        let listing = self
            .engine
            .courses()
            .find_by_name(&name)
            .and_then(|course| report::roster_listing(&self.engine, course.code()));
        match listing {
            Some(listing) => write!(self.output, "{listing}")?,
            None => writeln!(self.output, "\"{name}\" not found.")?,
        }
        Ok(Flow::Continue)
    }

    fn advisor_session(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Enter your name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(advisor) = self.engine.advisors().find_by_name(&name) else {
            writeln!(self.output, "No advisor found with the name {name}.")?;
            return Ok(Flow::Continue);
        };

        let views = self.engine.pending_requests(advisor);
        if views.is_empty() {
            writeln!(self.output, "No pending requests.")?;
            return Ok(Flow::Continue);
        }
        let display_name = self.advisor_name(advisor);
        writeln!(
            self.output,
            "Welcome, {display_name}. Here are your pending requests:"
        )?;
        write!(self.output, "{}", report::pending_listing(&views))?;

        while !self.engine.advisors().pending(advisor).is_empty() {
            let Some(action) = self.prompt(
                "Would you like to approve or deny a request? (a = approve, d = deny, q = quit): ",
            )?
            else {
                return Ok(Flow::Exit);
            };
            let decision = match action.to_lowercase().as_str() {
                "a" => Decision::Approve,
                "d" => Decision::Deny,
                "q" => {
                    writeln!(self.output, "Exiting advisor menu.")?;
                    break;
                }
                _ => {
                    writeln!(
                        self.output,
                        "Invalid option. Please enter 'a' to approve, 'd' to deny, or 'q' to quit."
                    )?;
                    continue;
                }
            };

            let Some(number) = self.prompt("Enter the number of the request to approve/deny: ")?
            else {
                return Ok(Flow::Exit);
            };
            let Ok(index) = number.parse::<usize>() else {
                writeln!(self.output, "Invalid request number.")?;
                continue;
            };

            let result = self.engine.decide(advisor, index, decision);
            info!(advisor = %display_name, index, ?decision, ok = result.is_ok(), "decide");
            log_failure(result.as_ref().err());
            writeln!(
                self.output,
                "{}",
                report::decision_message(&self.engine, &result)
            )?;
        }
        Ok(Flow::Continue)
    }

    // -------------------------------------------------------------------------
    // Prompts
    // -------------------------------------------------------------------------

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Ask for a course name until one matches.
    fn prompt_course(&mut self, text: &str) -> io::Result<Option<CourseCode>> {
        loop {
            let Some(name) = self.prompt(text)? else {
                return Ok(None);
            };
            let found = self
                .engine
                .courses()
                .find_by_name(&name)
                .map(|c| c.code().clone());
            if found.is_some() {
                return Ok(found);
            }
            writeln!(self.output, "\"{name}\" not found. Try again.")?;
        }
    }

    /// Ask for a student name until one matches. With several students of
    /// the same name the first loaded one is used and the operator is told.
    fn prompt_student(&mut self) -> io::Result<Option<StudentId>> {
        loop {
            let Some(name) = self.prompt("Enter the name of the student: ")? else {
                return Ok(None);
            };
            let matches: Vec<StudentId> = self
                .engine
                .students()
                .find_all_by_name(&name)
                .into_iter()
                .map(|s| s.id().clone())
                .collect();

            let Some(first) = matches.first().cloned() else {
                writeln!(self.output, "\"{name}\" not found. Try again.")?;
                continue;
            };
            if matches.len() > 1 {
                warn!(name, count = matches.len(), "Student name is ambiguous");
                writeln!(
                    self.output,
                    "Note: {} students are named \"{name}\", using ID {first}.",
                    matches.len()
                )?;
            }
            return Ok(Some(first));
        }
    }

    fn advisor_name(&self, id: AdvisorId) -> String {
        self.engine
            .advisors()
            .get(id)
            .map(|a| a.name().to_string())
            .unwrap_or_default()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_core::{assemble, AdvisorRecord, CourseRecord, EngineConfig, StudentRecord};

    fn engine() -> Option<EnrollmentEngine> {
        let students = vec![
            StudentRecord {
                id: "S1".into(),
                name: "Ann".into(),
                student_type: "undergraduate".into(),
            },
            StudentRecord {
                id: "S2".into(),
                name: "Ben".into(),
                student_type: "postgraduate".into(),
            },
        ];
        let courses = vec![CourseRecord {
            code: "CS101".into(),
            name: "Algorithms".into(),
            max_capacity: 2,
        }];
        let advisors = vec![AdvisorRecord {
            name: "Dr. Grey".into(),
            assigned_students: vec!["S2".into()],
        }];
        assemble(EngineConfig::default(), students, courses, advisors)
            .ok()
            .map(|(engine, _)| engine)
    }

    fn run(input: &str) -> Option<(EnrollmentEngine, String)> {
        let mut shell = Shell::new(engine()?, input.as_bytes(), Vec::new());
        shell.run().ok()?;
        let (engine, output) = shell.into_parts();
        Some((engine, String::from_utf8(output).ok()?))
    }

    #[test]
    fn quits_on_zero() {
        let Some((_, output)) = run("0\n") else {
            unreachable!("shell should run");
        };
        assert!(output.contains("1. Enroll Student."));
        assert_eq!(output.matches("Enter your choice:").count(), 1);
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        assert!(run("").is_some());
        assert!(run("1\nAlgor").is_some());
    }

    #[test]
    fn enroll_reprompts_unknown_names() {
        let Some((engine, output)) = run("1\nAlgo\nalgorithms\nZed\nann\n0\n") else {
            unreachable!("shell should run");
        };
        assert!(output.contains("\"Algo\" not found. Try again."));
        assert!(output.contains("\"Zed\" not found. Try again."));
        assert!(output.contains("Success! Student \"Ann\" enrolled in course \"Algorithms\"."));
        assert_eq!(
            engine
                .roster(&CourseCode::new("CS101"))
                .map(|r| r.enrolled_count),
            Some(1)
        );
    }

    #[test]
    fn invalid_menu_choice() {
        let Some((_, output)) = run("9\n0\n") else {
            unreachable!("shell should run");
        };
        assert!(output.contains("Invalid choice. Try again."));
    }
}
