//! Property tables: one `(key, label, kind)` row per field.
//!
//! A [`Schema`] checks the plain key-value form of a configuration (what the
//! storage layer and the settings forms see) and collects every violation
//! rather than stopping at the first.

use crate::error::{Rule, SchemaError, Violation};
use serde_json::{Map, Value};
use std::fmt;

/// Inclusive numeric bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    /// Signed, unbounded (positions, offsets, letter spacing).
    pub const ANY: Self = Self { min: None, max: None };
    /// Sizes, paddings, radii, blur.
    pub const NON_NEGATIVE: Self = Self { min: Some(0.0), max: None };
    pub const HUE: Self = Self::between(0.0, 360.0);
    pub const PERCENT: Self = Self::between(0.0, 100.0);
    pub const UNIT: Self = Self::between(0.0, 1.0);

    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, n: f64) -> bool {
        self.min.map_or(true, |min| n >= min) && self.max.map_or(true, |max| n <= max)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "between {min} and {max}"),
            (Some(min), None) => write!(f, "at least {min}"),
            (None, Some(max)) => write!(f, "at most {max}"),
            (None, None) => f.write_str("unbounded"),
        }
    }
}

/// `[hue, saturation, lightness, alpha]`
pub const COLOR_ELEMENTS: &[Kind] = &[
    Kind::Number(Range::HUE),
    Kind::Number(Range::PERCENT),
    Kind::Number(Range::PERCENT),
    Kind::Number(Range::UNIT),
];

/// `[enabled, offset x, offset y, blur, spread, hue, saturation, alpha]`
pub const SHADOW_ELEMENTS: &[Kind] = &[
    Kind::Bool,
    Kind::Number(Range::ANY),
    Kind::Number(Range::ANY),
    Kind::Number(Range::NON_NEGATIVE),
    Kind::Number(Range::ANY),
    Kind::Number(Range::HUE),
    Kind::Number(Range::PERCENT),
    Kind::Number(Range::UNIT),
];

/// Semantic type of a property together with its allowed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    Bool,
    Number(Range),
    Text,
    /// String restricted to a fixed set of values.
    Choice(&'static [&'static str]),
    /// Fixed-arity tuple, see [`COLOR_ELEMENTS`].
    Color,
    /// Fixed-arity tuple, see [`SHADOW_ELEMENTS`].
    Shadow,
    /// Array of records, each checked against the nested table.
    List(&'static [PropertySpec]),
}

impl Kind {
    /// Short type name used in "expected ..." messages and form descriptors.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "boolean",
            Kind::Number(_) => "number",
            Kind::Text | Kind::Choice(_) => "string",
            Kind::Color => "color",
            Kind::Shadow => "shadow",
            Kind::List(_) => "list",
        }
    }

    /// Element kinds of the fixed-arity tuple kinds.
    pub fn elements(&self) -> Option<&'static [Kind]> {
        match self {
            Kind::Color => Some(COLOR_ELEMENTS),
            Kind::Shadow => Some(SHADOW_ELEMENTS),
            _ => None,
        }
    }

    /// Check `value` against this kind, pushing one violation per failed rule.
    pub fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        let wrong_type = |out: &mut Vec<Violation>| {
            out.push(Violation::new(path, Rule::WrongType { expected: self.name() }));
        };

        match self {
            Kind::Bool => {
                if !value.is_boolean() {
                    wrong_type(out);
                }
            }
            Kind::Number(range) => match value.as_f64() {
                Some(n) if range.contains(n) => {}
                Some(_) => out.push(Violation::new(path, Rule::OutOfRange(*range))),
                None => wrong_type(out),
            },
            Kind::Text => {
                if !value.is_string() {
                    wrong_type(out);
                }
            }
            Kind::Choice(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => {}
                Some(_) => out.push(Violation::new(path, Rule::NotInSet(*allowed))),
                None => wrong_type(out),
            },
            Kind::Color | Kind::Shadow => {
                let elements = self.elements().unwrap_or_default();
                let Some(items) = value.as_array() else {
                    return wrong_type(out);
                };
                if items.len() != elements.len() {
                    out.push(Violation::new(
                        path,
                        Rule::WrongArity {
                            expected: elements.len(),
                            found: items.len(),
                        },
                    ));
                    return;
                }
                for (i, (kind, item)) in elements.iter().zip(items).enumerate() {
                    kind.check(item, &format!("{path}[{i}]"), out);
                }
            }
            Kind::List(fields) => {
                let Some(items) = value.as_array() else {
                    return wrong_type(out);
                };
                let record = Schema::new("item", *fields);
                for (i, item) in items.iter().enumerate() {
                    record.check(item, &format!("{path}[{i}]"), out);
                }
            }
        }
    }
}

/// One row of a property table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySpec {
    /// Stable storage key.
    pub key: &'static str,
    /// Human-readable meaning, shown next to the form control.
    pub label: &'static str,
    pub kind: Kind,
}

impl PropertySpec {
    pub const fn new(key: &'static str, label: &'static str, kind: Kind) -> Self {
        Self { key, label, kind }
    }
}

/// A named property table.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub properties: &'static [PropertySpec],
}

impl Schema {
    pub const fn new(name: &'static str, properties: &'static [PropertySpec]) -> Self {
        Self { name, properties }
    }

    pub fn get(&self, key: &str) -> Option<&'static PropertySpec> {
        self.properties.iter().find(|p| p.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.properties.iter().map(|p| p.key)
    }

    /// Validate a whole candidate object against this table.
    ///
    /// Keys the table does not declare are violations; keys the candidate
    /// leaves out are not (decoding fills them from the defaults).
    pub fn validate(&self, candidate: &Value) -> Result<(), SchemaError> {
        let mut violations = Vec::new();
        self.check(candidate, "", &mut violations);
        SchemaError::check(violations)
    }

    /// Like [`Schema::validate`], but reports paths under `prefix` into `out`.
    pub fn check(&self, candidate: &Value, prefix: &str, out: &mut Vec<Violation>) {
        let Some(map) = candidate.as_object() else {
            out.push(Violation::new(prefix, Rule::NotAnObject));
            return;
        };
        self.check_map(map, prefix, out);
    }

    pub fn check_map(&self, map: &Map<String, Value>, prefix: &str, out: &mut Vec<Violation>) {
        for (key, value) in map {
            self.check_entry(key, value, prefix, out);
        }
    }

    /// Check a single `key = value` pair.
    pub fn check_entry(&self, key: &str, value: &Value, prefix: &str, out: &mut Vec<Violation>) {
        let path = join(prefix, key);
        match self.get(key) {
            Some(spec) => spec.kind.check(value, &path, out),
            None => out.push(Violation::new(path, Rule::UnknownKey)),
        }
    }
}

/// `base` + `fs` → `base.fs`; an empty prefix yields the bare key.
pub fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
