//! Line-oriented session scripts
//!
//! A session feeds an [`Engine`] one line at a time:
//!
//! ```text
//! % family tree
//! parent(john, mary).
//! parent(mary, ann).
//! grandparent(X, Z) :- parent(X, Y), parent(Y, Z).
//! ?- grandparent(john, Who).
//! ```
//!
//! Blank lines and `%` comments are skipped, `?-` lines are queries and
//! everything else is knowledge. A bad line is reported and the session
//! carries on with the next one.

use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::OutputFormat;
use crate::engine::Engine;
use crate::error::{ErrorResponse, HornetError, HornetResult};
use crate::parser::QUERY_PREFIX;

/// Marks a comment line
pub const COMMENT_PREFIX: char = '%';

/// Notice emitted after a knowledge line is accepted
pub const KNOWLEDGE_ADDED: &str = "Knowledge added successfully!";

/// What a script line is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment,
    /// Query text with the `?-` prefix removed
    Query(&'a str),
    Knowledge(&'a str),
}

impl<'a> Line<'a> {
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            Line::Blank
        } else if line.starts_with(COMMENT_PREFIX) {
            Line::Comment
        } else if let Some(query) = line.strip_prefix(QUERY_PREFIX) {
            Line::Query(query.trim())
        } else {
            Line::Knowledge(line)
        }
    }
}

/// Counters for one session run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Clauses added to the knowledge base
    pub statements: usize,
    pub queries: usize,
    /// Solutions over all queries
    pub solutions: usize,
    pub errors: usize,
}

/// Drives an engine from script lines, writing results to an output sink
#[derive(Debug)]
pub struct Session {
    engine: Engine,
    format: OutputFormat,
    trace: bool,
    interactive: bool,
    summary: SessionSummary,
}

impl Session {
    pub fn new(engine: Engine) -> Self {
        Session {
            engine,
            format: OutputFormat::Text,
            trace: false,
            interactive: false,
            summary: SessionSummary::default(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Print derivation traces after query results
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Echo ingest notices to the output as well as the log
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Run every line of `input`, returning the counters for this run
    ///
    /// Only I/O failures end the run early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> HornetResult<SessionSummary> {
        let before = self.summary;
        for line in input.lines() {
            self.execute_line(&line?, out)?;
        }
        out.flush()?;

        Ok(SessionSummary {
            statements: self.summary.statements - before.statements,
            queries: self.summary.queries - before.queries,
            solutions: self.summary.solutions - before.solutions,
            errors: self.summary.errors - before.errors,
        })
    }

    /// Execute one script line
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> HornetResult<()> {
        match Line::classify(line) {
            Line::Blank | Line::Comment => Ok(()),
            Line::Query(query) => self.query(query, out).map(|_| ()),
            Line::Knowledge(text) => self.ingest(text, out).map(|_| ()),
        }
    }

    /// Add `text` to the knowledge base, reporting a rejection to `out`
    ///
    /// Returns whether the text was accepted.
    pub fn ingest<W: Write>(&mut self, text: &str, out: &mut W) -> HornetResult<bool> {
        match self.engine.add_knowledge(text) {
            Ok(added) => {
                self.summary.statements += added;
                info!("{}", KNOWLEDGE_ADDED);
                if self.interactive {
                    writeln!(out, "{}", KNOWLEDGE_ADDED)?;
                }
                Ok(true)
            }
            Err(e) => self.report(e, out).map(|_| false),
        }
    }

    /// Answer `text` (with or without `?-`), writing results or the error to `out`
    ///
    /// Returns whether the query parsed.
    pub fn query<W: Write>(&mut self, text: &str, out: &mut W) -> HornetResult<bool> {
        self.summary.queries += 1;
        let resolution = match self.engine.resolve_query(text) {
            Ok(resolution) => resolution,
            Err(e) => return self.report(e, out).map(|_| false),
        };
        self.summary.solutions += resolution.solutions.len();

        match self.format {
            OutputFormat::Text => write!(out, "{}", resolution.to_text(self.trace))?,
            OutputFormat::Json => writeln!(out, "{}", resolution.to_json()?)?,
        }
        Ok(true)
    }

    /// Errors go to the same sink as results: `Error: <message>` in text
    /// mode, an [`ErrorResponse`] line in JSON mode.
    fn report<W: Write>(&mut self, err: HornetError, out: &mut W) -> HornetResult<()> {
        self.summary.errors += 1;
        if err.is_parse_error() {
            warn!(code = err.code.code(), kind = err.code.description(), "{}", err.message);
        } else {
            error!(code = err.code.code(), kind = err.code.description(), "{}", err.message);
        }
        match self.format {
            OutputFormat::Text => writeln!(out, "Error: {}", err.message)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&ErrorResponse::from(&err))?)?,
        }
        Ok(())
    }
}
