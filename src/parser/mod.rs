//! Statement parser
//!
//! Turns the textual surface syntax into clauses:
//!
//! ```text
//! parent(john, mary).
//! grandparent(X, Z) :- parent(X, Y), parent(Y, Z).
//! ?- grandparent(john, Who).
//! ```
//!
//! A statement is a rule when it contains the `:-` separator and a fact
//! otherwise. Predicate names and arguments are ASCII word characters; whitespace
//! around tokens is insignificant and a trailing `.` is optional. Knowledge
//! text holds one statement per line; blank lines are ignored.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, opt, value},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::term::{Clause, Predicate, Term};

/// Token separating a rule head from its body
pub const RULE_SEPARATOR: &str = ":-";

/// Prefix marking a query in scripts
pub const QUERY_PREFIX: &str = "?-";

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid predicate format: {text}")]
    InvalidPredicate { text: String, position: usize },

    #[error("invalid rule `{text}`: {message}")]
    InvalidRule { text: String, message: String },

    #[error("empty statement")]
    Empty,

    #[error("line {line}: {source}")]
    AtLine { line: usize, source: Box<ParseError> },
}

impl ParseError {
    /// Attach a 1-based line number, replacing any previous one
    pub fn at_line(self, line: usize) -> Self {
        let source = match self {
            ParseError::AtLine { source, .. } => source,
            other => Box::new(other),
        };
        ParseError::AtLine { line, source }
    }

    /// The line number, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The underlying error without line information
    pub fn root(&self) -> &ParseError {
        match self {
            ParseError::AtLine { source, .. } => source.root(),
            other => other,
        }
    }

    /// The text that failed to parse
    pub fn offending_text(&self) -> Option<&str> {
        match self.root() {
            ParseError::InvalidPredicate { text, .. } | ParseError::InvalidRule { text, .. } => {
                Some(text)
            }
            _ => None,
        }
    }

    fn invalid_predicate(text: &str, err: nom::Err<nom::error::Error<&str>>) -> Self {
        let position = match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => text.len() - e.input.len(),
            nom::Err::Incomplete(_) => text.len(),
        };
        ParseError::InvalidPredicate { text: text.to_string(), position }
    }
}

/// Skip whitespace
fn ws(input: &str) -> IResult<&str, ()> {
    value((), multispace0)(input)
}

/// A name or argument token (ASCII `\w+`)
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn term(input: &str) -> IResult<&str, Term> {
    map(preceded(ws, identifier), Term::from_token)(input)
}

/// Parse a parenthesized, comma separated argument list
fn argument_list(input: &str) -> IResult<&str, Vec<Term>> {
    delimited(
        preceded(ws, char('(')),
        separated_list0(preceded(ws, char(',')), term),
        preceded(ws, char(')')),
    )(input)
}

/// Parse `name(arg, ...)`
fn predicate(input: &str) -> IResult<&str, Predicate> {
    let (input, name) = preceded(ws, identifier)(input)?;
    let (input, args) = argument_list(input)?;
    Ok((input, Predicate::new(name, args)))
}

/// Optional terminating `.` with surrounding whitespace
fn end_of_statement(input: &str) -> IResult<&str, ()> {
    value((), tuple((ws, opt(char('.')), ws)))(input)
}

/// Parse exactly one predicate with nothing else around it
fn exact_predicate(text: &str) -> Result<Predicate, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    all_consuming(terminated(predicate, ws))(text)
        .map(|(_, p)| p)
        .map_err(|e| ParseError::invalid_predicate(text, e))
}

/// Parse a single predicate, allowing a trailing `.`
pub fn parse_predicate(text: &str) -> Result<Predicate, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    all_consuming(terminated(predicate, end_of_statement))(text)
        .map(|(_, p)| p)
        .map_err(|e| ParseError::invalid_predicate(text, e))
}

/// Parse a query, allowing an optional leading `?-`
pub fn parse_query(text: &str) -> Result<Predicate, ParseError> {
    let text = text.trim();
    parse_predicate(text.strip_prefix(QUERY_PREFIX).unwrap_or(text))
}

/// `head :-`
fn rule_head(input: &str) -> IResult<&str, Predicate> {
    terminated(predicate, preceded(ws, tag(RULE_SEPARATOR)))(input)
}

/// Comma separated body goals
fn body_goals(input: &str) -> IResult<&str, Vec<Predicate>> {
    separated_list1(preceded(ws, char(',')), predicate)(input)
}

fn rule(input: &str) -> IResult<&str, Clause> {
    map(pair(rule_head, body_goals), |(head, body)| Clause::rule(head, body))(input)
}

fn fact(input: &str) -> IResult<&str, Clause> {
    map(predicate, Clause::fact)(input)
}

/// A rule or a fact, with an optional terminating `.`
fn statement(input: &str) -> IResult<&str, Clause> {
    terminated(alt((rule, fact)), end_of_statement)(input)
}

/// Explain why `statement` failed to parse
fn statement_error(text: &str, err: nom::Err<nom::error::Error<&str>>) -> ParseError {
    let invalid_rule = |message: &str| ParseError::InvalidRule {
        text: text.to_string(),
        message: message.to_string(),
    };

    if preceded(ws, tag(RULE_SEPARATOR))(text).is_ok() {
        return invalid_rule("missing rule head");
    }
    let Ok((body, _)) = rule_head(text) else {
        return ParseError::invalid_predicate(text, err);
    };

    // Skip the goals that parsed and report the first one that did not
    let (rest, parsed_any) = match body_goals(body) {
        Ok((rest, _)) => (rest.trim_start(), true),
        Err(_) => (body.trim_start(), false),
    };
    let goal = if parsed_any {
        match rest.strip_prefix(',') {
            Some(goal) => goal.trim(),
            None => return invalid_rule("expected `,` between body goals"),
        }
    } else {
        rest
    };
    let goal = goal.strip_suffix('.').unwrap_or(goal).trim();

    if goal.is_empty() && !parsed_any {
        return invalid_rule("empty rule body");
    }
    if goal.is_empty() || goal.starts_with(',') {
        return invalid_rule("empty goal in rule body");
    }
    match exact_predicate(goal) {
        Err(e) => e,
        Ok(_) => invalid_rule("malformed rule body"),
    }
}

/// Parse a single fact or rule
pub fn parse_statement(text: &str) -> Result<Clause, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    all_consuming(statement)(text)
        .map(|(_, clause)| clause)
        .map_err(|e| statement_error(text, e))
}

/// Lazily parse knowledge text, one statement per non-blank line
///
/// Errors carry the 1-based line number of the offending line.
pub fn statements(text: &str) -> impl Iterator<Item = Result<Clause, ParseError>> + '_ {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_statement(line).map_err(|e| e.at_line(i + 1)))
}

/// Parse a whole knowledge submission, failing on the first bad line
pub fn parse_knowledge_text(text: &str) -> Result<Vec<Clause>, ParseError> {
    statements(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fact() {
        let clause = parse_statement("parent(john, mary).").unwrap();
        assert_eq!(
            clause,
            Clause::fact(Predicate::from_tokens("parent", ["john", "mary"]))
        );
    }

    #[test]
    fn test_parse_fact_without_period() {
        let clause = parse_statement("  parent( john ,mary )  ").unwrap();
        assert_eq!(clause.to_string(), "parent(john, mary).");
    }

    #[test]
    fn test_parse_rule() {
        let clause =
            parse_statement("grandparent(X, Z) :- parent(X, Y), parent(Y, Z).").unwrap();
        match clause {
            Clause::Rule(rule) => {
                assert_eq!(rule.head.to_string(), "grandparent(X, Z)");
                assert_eq!(rule.body.len(), 2);
                assert_eq!(rule.body[0].to_string(), "parent(X, Y)");
                assert_eq!(rule.body[1].to_string(), "parent(Y, Z)");
                assert!(rule.body[1].args[1].is_variable());
            }
            other => panic!("expected rule, got {:?}", other),
        }
    }

    #[test]
    fn test_variables_classified_at_parse_time() {
        let p = parse_predicate("likes(Someone, pizza, _x, Z9)").unwrap();
        assert!(p.args[0].is_variable());
        assert!(p.args[1].is_constant());
        assert!(p.args[2].is_constant());
        assert!(p.args[3].is_variable());
    }

    #[test]
    fn test_zero_arity_predicate() {
        let p = parse_predicate("halt()").unwrap();
        assert_eq!(p.arity(), 0);
    }

    #[test]
    fn test_invalid_predicate() {
        let err = parse_statement("parent john, mary)").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPredicate { .. }));
        assert_eq!(err.to_string(), "invalid predicate format: parent john, mary)");
        assert_eq!(err.offending_text(), Some("parent john, mary)"));
    }

    #[test]
    fn test_missing_parentheses() {
        assert!(matches!(
            parse_predicate("parent"),
            Err(ParseError::InvalidPredicate { .. })
        ));
        assert!(matches!(
            parse_predicate("parent(john, mary"),
            Err(ParseError::InvalidPredicate { .. })
        ));
        assert!(matches!(
            parse_predicate("parent(john,)"),
            Err(ParseError::InvalidPredicate { .. })
        ));
    }

    #[test]
    fn test_error_position() {
        match parse_predicate("parent(john mary)") {
            Err(ParseError::InvalidPredicate { position, .. }) => assert_eq!(position, 12),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_body_goal() {
        let err = parse_statement("a(X) :- b(X), c X").unwrap_err();
        assert_eq!(err.offending_text(), Some("c X"));
    }

    #[test]
    fn test_empty_rule_body() {
        let err = parse_statement("a(X) :- .").unwrap_err();
        assert!(matches!(err, ParseError::InvalidRule { .. }));
        let err = parse_statement("a(X) :- b(X), , c(X)").unwrap_err();
        assert!(matches!(err, ParseError::InvalidRule { .. }));
    }

    #[test]
    fn test_missing_rule_head() {
        let err = parse_statement(":- b(X)").unwrap_err();
        assert!(matches!(err, ParseError::InvalidRule { .. }));
    }

    #[test]
    fn test_empty_statement() {
        assert_eq!(parse_statement("   "), Err(ParseError::Empty));
        assert_eq!(parse_query(""), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_query_prefix() {
        let q = parse_query("?- parent(john, X).").unwrap();
        assert_eq!(q.to_string(), "parent(john, X)");
        assert_eq!(parse_query("parent(john, X)").unwrap(), q);
    }

    #[test]
    fn test_parse_knowledge_text_skips_blank_lines() {
        let text = "parent(john, mary).\n\n   \nparent(mary, ann).\n\
                    grandparent(X, Z) :- parent(X, Y), parent(Y, Z).\n";
        let clauses = parse_knowledge_text(text).unwrap();
        assert_eq!(clauses.len(), 3);
        assert!(clauses[2].is_rule());
    }

    #[test]
    fn test_parse_knowledge_text_reports_line() {
        let text = "parent(john, mary).\n\nparent john, mary)\nparent(mary, ann).";
        let err = parse_knowledge_text(text).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(err.root(), ParseError::InvalidPredicate { .. }));
        assert_eq!(err.to_string(), "line 3: invalid predicate format: parent john, mary)");
    }

    #[test]
    fn test_at_line_does_not_nest() {
        let err = ParseError::Empty.at_line(2).at_line(5);
        assert_eq!(err.line(), Some(5));
        assert_eq!(err.root(), &ParseError::Empty);
    }

    #[test]
    fn test_statements_is_lazy_per_line() {
        let results: Vec<_> = statements("a(b).\nbad\nc(d).").collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_rule_with_nested_arguments_and_spacing() {
        let clause = parse_statement("  path( X , Y ):-edge(X,Z) ,path( Z, Y ) . ").unwrap();
        assert_eq!(clause.to_string(), "path(X, Y) :- edge(X, Z), path(Z, Y).");
    }

    #[test]
    fn test_rule_missing_comma_between_goals() {
        let err = parse_statement("a(X) :- b(X) c(X)").unwrap_err();
        match err {
            ParseError::InvalidRule { message, .. } => {
                assert_eq!(message, "expected `,` between body goals")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_first_body_goal_invalid() {
        let err = parse_statement("a(X) :- b X").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPredicate { .. }));
        assert_eq!(err.offending_text(), Some("b X"));
    }

    #[test]
    fn test_identifiers_are_ascii() {
        assert!(matches!(
            parse_predicate("p(\u{e4}, X)"),
            Err(ParseError::InvalidPredicate { .. })
        ));
        assert!(parse_predicate("p(a_1, X_2)").is_ok());
    }
}
