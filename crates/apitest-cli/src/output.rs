//! Console output for test results
//!
//! Test logs are produced as plain text by the runner; coloring happens only
//! here, line by line, when the log is printed.

use apitest_runner::executor::API_FAILURE_MARKER;
use apitest_runner::{SuiteReport, SuiteSpec, TestResult, Verbosity};
use std::env;
use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Colored writer for stdout
pub struct Output {
    stdout: StandardStream,
}

impl Output {
    pub fn new(no_color: bool) -> Self {
        let choice = color_choice(
            no_color,
            env::var_os("NO_COLOR"),
            io::stdout().is_terminal(),
        );

        Self {
            stdout: StandardStream::stdout(choice),
        }
    }

    pub fn suite_header(&mut self, suite: &SuiteSpec, verbosity: Verbosity) -> io::Result<()> {
        if verbosity.shows_header() {
            writeln!(self.stdout, "Running Test Suite: {}", suite.name)?;
            if verbosity.shows_description() {
                if let Some(description) = suite.description() {
                    writeln!(self.stdout, "Description: {}", description)?;
                }
            }
        }
        Ok(())
    }

    /// Print a test log, coloring diff and verdict lines
    pub fn test_log(&mut self, result: &TestResult) -> io::Result<()> {
        for line in result.log.lines() {
            match line_color(line) {
                Some(spec) => {
                    self.stdout.set_color(&spec)?;
                    write!(self.stdout, "{}", line)?;
                    self.stdout.reset()?;
                    writeln!(self.stdout)?;
                }
                None => writeln!(self.stdout, "{}", line)?,
            }
        }
        Ok(())
    }

    pub fn summary(&mut self, report: &SuiteReport) -> io::Result<()> {
        writeln!(self.stdout)?;
        write!(self.stdout, "Passed: ")?;
        self.stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(self.stdout, "{}", report.passed)?;
        self.stdout.reset()?;
        write!(self.stdout, " | Failed: ")?;
        if report.failed > 0 {
            self.stdout
                .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        }
        write!(self.stdout, "{}", report.failed)?;
        self.stdout.reset()?;
        writeln!(self.stdout)?;
        self.stdout.flush()
    }
}

/// Colors are used only on a terminal, without `--no-color` and without a
/// non-empty `NO_COLOR`
fn color_choice(no_color: bool, no_color_env: Option<OsString>, is_terminal: bool) -> ColorChoice {
    let env_disabled = no_color_env.is_some_and(|value| !value.is_empty());

    if no_color || env_disabled || !is_terminal {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

/// Color for a log line, if it gets one
fn line_color(line: &str) -> Option<ColorSpec> {
    let trimmed = line.trim_start();
    let mut spec = ColorSpec::new();

    if trimmed.starts_with("- ") || trimmed.starts_with("-\"") {
        spec.set_fg(Some(Color::Red));
    } else if trimmed.starts_with("+ ") || trimmed.starts_with("+\"") {
        spec.set_fg(Some(Color::Green));
    } else if trimmed.starts_with("* ") || trimmed.starts_with("*\"") {
        spec.set_fg(Some(Color::Yellow));
    } else if trimmed.starts_with("Test \"") && trimmed.ends_with("\" Failed") {
        spec.set_fg(Some(Color::Red)).set_bold(true);
    } else if trimmed.starts_with("Test \"") && trimmed.ends_with("\" Successful") {
        spec.set_fg(Some(Color::Green)).set_bold(true);
    } else if trimmed.starts_with(API_FAILURE_MARKER)
        || trimmed.starts_with("Failed to load")
        || trimmed.starts_with("Test did not complete")
    {
        spec.set_fg(Some(Color::Red));
    } else if trimmed.starts_with("API Time:") || trimmed.starts_with("Total Test Time:") {
        spec.set_fg(Some(Color::Blue));
    } else {
        return None;
    }

    Some(spec)
}
