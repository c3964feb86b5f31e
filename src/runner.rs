//! Run controller: feeds every line of every source through one session.
//!
//! Sources are processed strictly in order and share the session and the
//! counters. The first fatal error stops the run; its message carries the
//! `source:line` location.

use crate::dialect::Dialect;
use crate::engine::DecimalEngine;
use crate::error::{HarnessError, Result};
use crate::evaluator::Evaluator;
use crate::format::Report;
use crate::model::{FailureRecord, Outcome, RunCounters};
use crate::script::{self, Line};
use crate::session::Session;
use crate::util::progress::SourceProgress;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// A harness run in progress.
#[derive(Debug)]
pub struct Harness<E> {
    evaluator: Evaluator<E>,
    session: Session,
    counters: RunCounters,
    failures: Vec<FailureRecord>,
}

impl<E: DecimalEngine> Harness<E> {
    #[must_use]
    pub fn new(engine: E, dialect: Dialect, internal_precision: u32) -> Self {
        Self {
            evaluator: Evaluator::new(engine, dialect, internal_precision),
            session: Session::default(),
            counters: RunCounters::default(),
            failures: Vec::new(),
        }
    }

    /// Start from `session` instead of the default one.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn counters(&self) -> &RunCounters {
        &self.counters
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    pub const fn engine(&self) -> &E {
        self.evaluator.engine()
    }

    /// Interpret one raw line: normalize, classify, then either update the
    /// session or evaluate a test.
    ///
    /// # Errors
    ///
    /// Returns any fatal script error raised by the line.
    pub fn process_line(&mut self, raw: &str) -> Result<()> {
        let line = raw.trim().to_lowercase();
        match script::classify(&line) {
            Line::Blank | Line::Comment => {}
            Line::Ignored(keyword) => trace!(keyword, "Ignoring directive"),
            Line::Precision(text) => {
                let precision = script::parse_precision(text)?;
                info!(precision, "Precision changed");
                self.session.set_precision(precision);
            }
            Line::Rounding(text) => {
                let (token, directive) = script::parse_rounding(text, self.evaluator.dialect())?;
                info!(rounding = token, ?directive, "Rounding mode changed");
                self.session.set_rounding(token, directive);
            }
            Line::Test(text) => {
                let outcome = self
                    .evaluator
                    .evaluate(text, &self.session, &mut self.counters)?;
                if let Outcome::Failed(record) = outcome {
                    info!(
                        name = %record.name,
                        computed = %record.computed,
                        expected = %record.expected,
                        "Test failed"
                    );
                    self.failures.push(record);
                }
            }
        }
        Ok(())
    }

    /// Run every line of `reader`, naming it `source` in error locations.
    ///
    /// # Errors
    ///
    /// Returns the first read failure or fatal script error, wrapped with
    /// its `source:line` location.
    pub fn run_reader<R: BufRead>(&mut self, source: &str, reader: R) -> Result<()> {
        for (index, line) in reader.lines().enumerate() {
            let location = || format!("{source}:{}", index + 1);
            let line = line.map_err(|e| HarnessError::Io(e).context(location()))?;
            self.process_line(&line).map_err(|e| e.context(location()))?;
        }
        Ok(())
    }

    /// Open and run one test file.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnreadable` if the file cannot be opened, otherwise
    /// whatever [`Self::run_reader`] returns.
    pub fn run_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|source| HarnessError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Running test file");
        let before = self.counters;
        self.run_reader(&path.display().to_string(), BufReader::new(file))?;
        debug!(
            path = %path.display(),
            tests = self.counters.total - before.total,
            failed = self.counters.failed - before.failed,
            "Finished test file"
        );
        Ok(())
    }

    /// Run `paths` in order, advancing `progress` after each file.
    ///
    /// # Errors
    ///
    /// Stops at the first file that fails fatally.
    pub fn run_files(&mut self, paths: &[PathBuf], progress: &SourceProgress) -> Result<()> {
        for path in paths {
            progress.start(&path.display().to_string());
            self.run_file(path)?;
            progress.finish_source();
        }
        progress.finish();
        Ok(())
    }

    /// Consume the harness and produce the final report.
    #[must_use]
    pub fn into_report(self) -> Report {
        Report::new(self.counters, self.failures)
    }
}
