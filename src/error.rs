//! Errors surfaced by the engine and sessions
//!
//! Every failure carries an [`ErrorCode`]:
//!
//! - 1xxx: a statement or query that does not match the grammar
//! - 9xxx: I/O or serialization failures while writing results
//!
//! A query with no solution is not an error, and neither is a failed
//! unification. Configuration problems stay [`ConfigError`](crate::config::ConfigError)s.
//!
//! ```
//! use hornet::{Engine, ErrorCode};
//!
//! let err = Engine::new().add_knowledge("parent john, mary)").unwrap_err();
//! assert_eq!(err.code, ErrorCode::InvalidPredicate);
//! assert_eq!(err.message, "line 1: invalid predicate format: parent john, mary)");
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::ParseError;

/// Stable numeric error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Parse failure not tied to a statement shape
    ParseError = 1000,
    /// Malformed `name(args)` predicate
    InvalidPredicate = 1001,
    /// Malformed `head :- body` rule
    InvalidRule = 1002,
    /// Blank statement or query
    EmptyStatement = 1003,

    /// Results could not be serialized
    InternalError = 9000,
    /// Reading input or writing output failed
    IoError = 9001,
}

impl ErrorCode {
    pub fn code(&self) -> u32 {
        *self as u32
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidPredicate => "Invalid predicate format",
            ErrorCode::InvalidRule => "Invalid rule",
            ErrorCode::EmptyStatement => "Empty statement",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::IoError => "I/O error",
        }
    }

    pub fn is_parse_error(&self) -> bool {
        (1000..2000).contains(&self.code())
    }
}

/// Where an error came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// `line`, `text` and `position` for parse errors
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    /// `file:line` of the check that failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Error type returned by [`Engine`](crate::Engine) and [`Session`](crate::Session)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HornetError {
    pub code: ErrorCode,
    /// What a user sees after `Error: `
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl HornetError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        HornetError {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context
            .get_or_insert_with(ErrorContext::default)
            .fields
            .insert(key.into(), value.into());
        self
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.context.get_or_insert_with(ErrorContext::default).location = Some(location.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_parse_error(&self) -> bool {
        self.code.is_parse_error()
    }
}

impl fmt::Display for HornetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        if let Some(location) = self.context.as_ref().and_then(|c| c.location.as_ref()) {
            write!(f, " at {}", location)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\nHint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for HornetError {}

impl From<ParseError> for HornetError {
    fn from(err: ParseError) -> Self {
        let code = match err.root() {
            ParseError::InvalidPredicate { .. } => ErrorCode::InvalidPredicate,
            ParseError::InvalidRule { .. } => ErrorCode::InvalidRule,
            ParseError::Empty => ErrorCode::EmptyStatement,
            ParseError::AtLine { .. } => ErrorCode::ParseError,
        };
        let mut error = HornetError::new(code, err.to_string());
        if let Some(line) = err.line() {
            error = error.with_context("line", line.to_string());
        }
        if let Some(text) = err.offending_text() {
            error = error.with_context("text", text);
        }
        if let ParseError::InvalidPredicate { position, .. } = err.root() {
            error = error.with_context("position", position.to_string());
        }
        error.with_hint("expected `name(arg, ...)` or `head(args) :- goal(args), ...`")
    }
}

impl From<std::io::Error> for HornetError {
    fn from(err: std::io::Error) -> Self {
        HornetError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for HornetError {
    fn from(err: serde_json::Error) -> Self {
        HornetError::new(ErrorCode::InternalError, err.to_string()).with_context("format", "JSON")
    }
}

pub type HornetResult<T> = Result<T, HornetError>;

/// One error as written in JSON output mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `true`, so results and errors can share a stream
    pub error: bool,
    /// `INVALID_PREDICATE` and so on
    pub code: ErrorCode,
    pub code_num: u32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl From<&HornetError> for ErrorResponse {
    fn from(err: &HornetError) -> Self {
        ErrorResponse {
            error: true,
            code: err.code,
            code_num: err.code.code(),
            message: err.message.clone(),
            details: err
                .context
                .as_ref()
                .map(|c| c.fields.clone())
                .filter(|fields| !fields.is_empty()),
            hint: err.hint.clone(),
        }
    }
}

/// Build a [`HornetError`] tagged with the calling file and line
#[macro_export]
macro_rules! hornet_error {
    ($code:expr, $msg:expr) => {
        $crate::error::HornetError::new($code, $msg).at(format!("{}:{}", file!(), line!()))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::HornetError::new($code, format!($fmt, $($arg)*))
            .at(format!("{}:{}", file!(), line!()))
    };
}

/// Return early with a [`hornet_error!`]
#[macro_export]
macro_rules! hornet_bail {
    ($code:expr, $msg:expr) => {
        return Err($crate::hornet_error!($code, $msg))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::hornet_error!($code, $fmt, $($arg)*))
    };
}

/// Bail unless `$cond` holds
#[macro_export]
macro_rules! hornet_ensure {
    ($cond:expr, $code:expr, $msg:expr) => {
        if !$cond {
            $crate::hornet_bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::hornet_bail!($code, $fmt, $($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(err: &'a HornetError, key: &str) -> Option<&'a str> {
        err.context.as_ref()?.fields.get(key).map(String::as_str)
    }

    #[test]
    fn test_from_parse_error() {
        let parse_err = ParseError::InvalidPredicate {
            text: "parent john, mary)".to_string(),
            position: 7,
        }
        .at_line(3);

        let err = HornetError::from(parse_err);
        assert_eq!(err.code, ErrorCode::InvalidPredicate);
        assert!(err.is_parse_error());
        assert_eq!(err.message, "line 3: invalid predicate format: parent john, mary)");
        assert_eq!(field(&err, "line"), Some("3"));
        assert_eq!(field(&err, "text"), Some("parent john, mary)"));
        assert_eq!(field(&err, "position"), Some("7"));
        assert!(err.hint.is_some());
    }

    #[test]
    fn test_from_rule_and_empty_parse_errors() {
        let rule = HornetError::from(ParseError::InvalidRule {
            text: ":- b(X)".to_string(),
            message: "missing rule head".to_string(),
        });
        assert_eq!(rule.code, ErrorCode::InvalidRule);
        assert_eq!(field(&rule, "position"), None);

        let empty = HornetError::from(ParseError::Empty);
        assert_eq!(empty.code, ErrorCode::EmptyStatement);
        assert!(empty.is_parse_error());
    }

    #[test]
    fn test_io_and_json_errors_are_not_parse_errors() {
        let io = HornetError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(io.code, ErrorCode::IoError);
        assert!(!io.is_parse_error());

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = HornetError::from(json);
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(field(&err, "format"), Some("JSON"));
    }

    #[test]
    fn test_error_display() {
        let err = HornetError::new(ErrorCode::InvalidRule, "empty rule body")
            .at("facts.pl:42")
            .with_hint("add a goal after `:-`");

        assert_eq!(
            err.to_string(),
            "[1002] empty rule body at facts.pl:42\nHint: add a goal after `:-`"
        );
    }

    #[test]
    fn test_error_response_uses_serialized_code_names() {
        let err = HornetError::from(ParseError::InvalidPredicate {
            text: "p(".to_string(),
            position: 2,
        });
        let resp = ErrorResponse::from(&err);
        assert_eq!(resp.code_num, 1001);

        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"], true);
        assert_eq!(json["code"], "INVALID_PREDICATE");
        assert_eq!(json["details"]["text"], "p(");
    }

    #[test]
    fn test_error_response_without_context_has_no_details() {
        let resp = ErrorResponse::from(&HornetError::new(ErrorCode::IoError, "closed"));
        assert_eq!(resp.details, None);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("details"));
        assert!(json.contains("\"IO_ERROR\""));
    }

    fn non_blank(text: &str) -> HornetResult<&str> {
        crate::hornet_ensure!(!text.trim().is_empty(), ErrorCode::EmptyStatement, "got {:?}", text);
        Ok(text)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(non_blank("a(b)"), Ok("a(b)"));
        let err = non_blank("  ").unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyStatement);
        assert_eq!(err.message, "got \"  \"");
        assert!(err.context.unwrap().location.unwrap().contains("error.rs"));
    }
}
