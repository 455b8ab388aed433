//! Selector expressions.
//!
//! Text form, comma separated:
//!
//! ```text
//! IfcDoor, IfcWindow, material=Holz, Pset_DoorCommon.FireRating != "EI30", @#42
//! ```
//!
//! Bare identifiers are type tags (disjunctive), `path op value` clauses are
//! predicates (conjunctive) and `@id` scopes the selection to a container.

use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;
use crate::model::{EntityId, Value};

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    NotEq,
    Contains,
    NotContains,
    Greater,
    GreaterEq,
    Less,
    LessEq,
}

// Longest operators first so `!*=` wins over `*=` and `>=` over `>`.
const OPERATORS: &[(&str, Comparator)] = &[
    ("!*=", Comparator::NotContains),
    ("*=", Comparator::Contains),
    ("!=", Comparator::NotEq),
    (">=", Comparator::GreaterEq),
    ("<=", Comparator::LessEq),
    ("=", Comparator::Eq),
    (">", Comparator::Greater),
    ("<", Comparator::Less),
];

impl Comparator {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(_, c)| *c == self)
            .map_or("=", |(s, _)| *s)
    }

    /// Negated comparators match when no resolved value satisfies their
    /// positive form.
    #[must_use]
    pub fn is_negated(self) -> bool {
        matches!(self, Comparator::NotEq | Comparator::NotContains)
    }

    fn positive(self) -> Self {
        match self {
            Comparator::NotEq => Comparator::Eq,
            Comparator::NotContains => Comparator::Contains,
            other => other,
        }
    }

    /// Compare one resolved value against the expected operand.
    ///
    /// Numbers compare as `f64` when both sides parse as numbers, anything
    /// else compares as exact, case-sensitive text.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn holds(self, actual: &Value, expected: &str) -> bool {
        let Some(text) = actual.scalar_text() else {
            return false;
        };
        let numbers = actual
            .as_f64()
            .or_else(|| text.trim().parse::<f64>().ok())
            .zip(expected.trim().parse::<f64>().ok())
            .filter(|(a, b)| a.is_finite() && b.is_finite());

        match self.positive() {
            Comparator::Eq => match numbers {
                Some((a, b)) => a == b,
                None => text == expected,
            },
            Comparator::Contains => text.contains(expected),
            Comparator::Greater => numbers.is_some_and(|(a, b)| a > b),
            Comparator::GreaterEq => numbers.is_some_and(|(a, b)| a >= b),
            Comparator::Less => numbers.is_some_and(|(a, b)| a < b),
            Comparator::LessEq => numbers.is_some_and(|(a, b)| a <= b),
            Comparator::NotEq | Comparator::NotContains => false,
        }
    }

    /// Evaluate against every value a path resolved to. An empty slice
    /// (path absent) never matches.
    #[must_use]
    pub fn matches(self, resolved: &[Value], expected: &str) -> bool {
        if resolved.is_empty() {
            return false;
        }
        let any = resolved
            .iter()
            .any(|value| self.positive().holds(value, expected));
        any != self.is_negated()
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `attribute-path comparator value`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub path: Vec<String>,
    pub comparator: Comparator,
    pub value: String,
}

impl Predicate {
    /// Build a predicate from a dotted path such as `type.Name`.
    pub fn new(path: &str, comparator: Comparator, value: impl Into<String>) -> Self {
        Self {
            path: path.split('.').map(|s| s.trim().to_string()).collect(),
            comparator,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\"{}\"", self.dotted_path(), self.comparator, self.value)
    }
}

/// A structured selector: type tags, predicates and an optional container
/// scope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub types: Vec<String>,
    pub predicates: Vec<Predicate>,
    pub scope: Option<EntityId>,
    pub type_fallback: bool,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the comma separated text form.
    pub fn parse(expression: &str) -> Result<Self, QueryError> {
        let mut query = Query::new();
        for clause in split_clauses(expression)? {
            let clause = clause.trim();
            if clause.is_empty() {
                return Err(QueryError::malformed(expression, "empty clause"));
            }
            if let Some(scope) = clause.strip_prefix('@') {
                if query.scope.is_some() {
                    return Err(QueryError::malformed(expression, "more than one scope"));
                }
                query.scope = Some(parse_scope(expression, scope)?);
            } else if let Some((at, symbol, comparator)) = find_operator(clause) {
                let path = &clause[..at];
                let value = parse_value(expression, &clause[at + symbol.len()..])?;
                query
                    .predicates
                    .push(Predicate::new(path, comparator, value));
            } else {
                query.types.push(clause.to_string());
            }
        }
        query.validate_for(expression)?;
        Ok(query)
    }

    #[must_use]
    pub fn of_type(mut self, class: impl Into<String>) -> Self {
        self.types.push(class.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, path: &str, comparator: Comparator, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::new(path, comparator, value));
        self
    }

    #[must_use]
    pub fn within(mut self, container: EntityId) -> Self {
        self.scope = Some(container);
        self
    }

    /// Resolve missing attributes and properties on the entity's type object.
    #[must_use]
    pub fn with_type_fallback(mut self, enabled: bool) -> Self {
        self.type_fallback = enabled;
        self
    }

    /// Check a query built programmatically.
    pub fn validate(&self) -> Result<(), QueryError> {
        self.validate_for(&self.to_string())
    }

    fn validate_for(&self, expression: &str) -> Result<(), QueryError> {
        if self.types.is_empty() {
            return Err(QueryError::malformed(expression, "no type tag given"));
        }
        if let Some(tag) = self.types.iter().find(|t| !is_identifier(t)) {
            return Err(QueryError::malformed(
                expression,
                format!("'{tag}' is not a type tag"),
            ));
        }
        for predicate in &self.predicates {
            if predicate.path.iter().any(String::is_empty) {
                return Err(QueryError::malformed(
                    expression,
                    format!("empty path segment in '{}'", predicate.dotted_path()),
                ));
            }
            // Values are written quoted and quotes are not escaped.
            if predicate.value.contains('"') {
                return Err(QueryError::malformed(
                    expression,
                    format!("quote in value of '{}'", predicate.dotted_path()),
                ));
            }
        }
        Ok(())
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::parse(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut clauses: Vec<String> = self.types.clone();
        clauses.extend(self.predicates.iter().map(ToString::to_string));
        if let Some(scope) = self.scope {
            clauses.push(format!("@{scope}"));
        }
        f.write_str(&clauses.join(", "))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split on commas outside double quotes.
fn split_clauses(expression: &str) -> Result<Vec<&str>, QueryError> {
    let mut clauses = Vec::new();
    let mut start = 0;
    let mut in_string = false;

    for (i, ch) in expression.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            ',' if !in_string => {
                clauses.push(&expression[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if in_string {
        return Err(QueryError::malformed(expression, "unterminated quote"));
    }
    clauses.push(&expression[start..]);
    Ok(clauses)
}

/// Position and kind of the first operator outside quotes.
fn find_operator(clause: &str) -> Option<(usize, &'static str, Comparator)> {
    let mut in_string = false;
    for (i, ch) in clause.char_indices() {
        if ch == '"' {
            in_string = !in_string;
            continue;
        }
        if in_string || !matches!(ch, '=' | '!' | '*' | '>' | '<') {
            continue;
        }
        let rest = &clause[i..];
        if let Some((symbol, comparator)) = OPERATORS.iter().find(|(s, _)| rest.starts_with(s)) {
            return Some((i, *symbol, *comparator));
        }
    }
    None
}

fn parse_value(expression: &str, raw: &str) -> Result<String, QueryError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(QueryError::malformed(expression, "missing value"));
    }
    if let Some(inner) = raw.strip_prefix('"') {
        return match inner.strip_suffix('"') {
            Some(text) if !text.contains('"') => Ok(text.to_string()),
            _ => Err(QueryError::malformed(expression, "unterminated quote")),
        };
    }
    if raw.contains('"') {
        return Err(QueryError::malformed(expression, "unexpected quote in value"));
    }
    Ok(raw.to_string())
}

fn parse_scope(expression: &str, raw: &str) -> Result<EntityId, QueryError> {
    let digits = raw.trim().trim_start_matches('#');
    digits
        .parse::<u64>()
        .map(EntityId)
        .map_err(|_| QueryError::malformed(expression, format!("invalid scope '{raw}'")))
}
