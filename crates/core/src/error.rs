use crate::schema::Range;
use std::fmt;
use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("config error: {0}")]
    Config(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = DashError> = std::result::Result<T, E>;

/// The rule a single field broke.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// The value at this path must be a key-value object.
    NotAnObject,
    /// The key is not declared by the schema it was checked against.
    UnknownKey,
    /// Widget type identifier not present in the registry.
    UnknownKind,
    WrongType { expected: &'static str },
    /// Color and shadow tuples have a fixed element count.
    WrongArity { expected: usize, found: usize },
    OutOfRange(Range),
    NotInSet(&'static [&'static str]),
    /// URL templates must carry exactly one `%s` placeholder.
    Placeholder { found: usize },
    Empty,
    /// Widget ids must be unique across the dashboard.
    Duplicate,
    /// `id`, `base` and `kind` belong to the definition, not to a widget type.
    ReservedKey,
    /// A typed value could not be turned into its plain key-value form.
    Encoding(String),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::NotAnObject => f.write_str("expected an object"),
            Rule::UnknownKey => f.write_str("unknown key"),
            Rule::UnknownKind => f.write_str("unknown widget kind"),
            Rule::WrongType { expected } => write!(f, "expected {expected}"),
            Rule::WrongArity { expected, found } => {
                write!(f, "expected {expected} elements, found {found}")
            }
            Rule::OutOfRange(range) => write!(f, "out of range, must be {range}"),
            Rule::NotInSet(allowed) => write!(f, "must be one of {}", allowed.join(", ")),
            Rule::Placeholder { found } => {
                write!(f, "must contain exactly one %s placeholder, found {found}")
            }
            Rule::Empty => f.write_str("must not be empty"),
            Rule::Duplicate => f.write_str("duplicate value"),
            Rule::ReservedKey => f.write_str("reserved key, cannot be a widget field"),
            Rule::Encoding(msg) => write!(f, "cannot encode value: {msg}"),
        }
    }
}

/// One failed rule at one field path, e.g. `base.ts` or `links[2].url`.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: String,
    pub rule: Rule,
}

impl Violation {
    pub fn new(field: impl Into<String>, rule: Rule) -> Self {
        Self {
            field: field.into(),
            rule,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.rule)
        } else {
            write!(f, "{}: {}", self.field, self.rule)
        }
    }
}

/// Validation failure carrying every violation found in a single pass.
///
/// Never empty: use [`SchemaError::check`] to turn a collected list into a
/// `Result`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", summarize(.violations))]
pub struct SchemaError {
    violations: Vec<Violation>,
}

impl SchemaError {
    pub fn single(field: impl Into<String>, rule: Rule) -> Self {
        Self {
            violations: vec![Violation::new(field, rule)],
        }
    }

    /// `Ok(())` when nothing was collected, otherwise an error holding all of it.
    pub fn check(violations: Vec<Violation>) -> std::result::Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self { violations })
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Whether any violation was reported for exactly `field`.
    pub fn cites(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// The rules reported for `field`, in discovery order.
    pub fn rules_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.field == field)
            .map(|v| &v.rule)
    }
}

fn summarize(violations: &[Violation]) -> String {
    let list = violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    match violations.len() {
        1 => format!("1 violation: {list}"),
        n => format!("{n} violations: {list}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_empty_is_ok() {
        assert!(SchemaError::check(Vec::new()).is_ok());
    }

    #[test]
    fn message_lists_every_violation() {
        let err = SchemaError::check(vec![
            Violation::new("base.ts", Rule::WrongArity { expected: 8, found: 7 }),
            Violation::new("engine", Rule::NotInSet(&["google", "bing"])),
        ])
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "2 violations: base.ts: expected 8 elements, found 7; engine: must be one of google, bing"
        );
        assert!(err.cites("base.ts"));
        assert!(!err.cites("base"));
    }

    #[test]
    fn schema_error_converts_into_dash_error() {
        let err: DashError = SchemaError::single("", Rule::NotAnObject).into();
        assert!(matches!(err, DashError::Schema(_)));
        assert_eq!(err.to_string(), "schema error: 1 violation: expected an object");
    }
}
