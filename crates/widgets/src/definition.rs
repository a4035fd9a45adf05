use dash_core::{Kind, Rule, Schema, SchemaError, Violation};
use dash_style::{BaseStyle, BaseStyleSchema, BASE_STYLE};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Top-level keys owned by the definition itself (and the dashboard layout).
/// No widget type may declare a field with one of these names.
pub const RESERVED_KEYS: &[&str] = &["id", "base", "kind"];

/// A configurable widget type: its own fields with their defaults, the
/// property table describing them, and any cross-field rules.
pub trait WidgetType:
    Default + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + std::fmt::Debug + 'static
{
    /// Registry identifier, e.g. `"search-bar"`.
    const KIND: &'static str;

    /// Property table for the widget's own fields.
    fn schema() -> &'static Schema;

    /// Rules spanning several fields.  Runs on the whole top-level record
    /// after the per-field checks; absent fields take their default value.
    fn check_rules(_record: &Map<String, Value>, _out: &mut Vec<Violation>) {}
}

/// One placed widget: identity, the type's own fields, and an owned copy of
/// the shared base style.
///
/// Serialized flat, except that the style lives under the single `base` key:
///
/// ```json
/// { "id": "…", "engine": "google", …, "base": { "w": 600, … } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDefinition<T> {
    /// Empty until the widget is placed on the dashboard.
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub fields: T,
    #[serde(default = "BaseStyleSchema::create")]
    pub base: BaseStyle,
}

impl<T: WidgetType> WidgetDefinition<T> {
    /// The type's documented defaults with a fresh base style and no id.
    pub fn create_default() -> Self {
        Self {
            id: String::new(),
            fields: T::default(),
            base: BaseStyleSchema::create(),
        }
    }

    pub fn kind(&self) -> &'static str {
        T::KIND
    }

    /// Plain key-value form handed to storage and settings forms.
    pub fn to_record(&self) -> Result<Map<String, Value>, SchemaError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(SchemaError::single("", Rule::NotAnObject)),
            Err(e) => Err(SchemaError::single("", Rule::Encoding(e.to_string()))),
        }
    }

    /// Validate a plain record and decode it; missing fields take defaults.
    pub fn from_record(record: &Map<String, Value>) -> Result<Self, SchemaError> {
        validate_fields::<T>(record)?;
        serde_json::from_value(Value::Object(record.clone()))
            .map_err(|e| SchemaError::single("", Rule::Encoding(e.to_string())))
    }

    /// Run every field, base style and cross-field check on this instance.
    pub fn validate(&self) -> Result<(), SchemaError> {
        validate_fields::<T>(&self.to_record()?)
    }
}

/// Validate the plain form of a `T` widget, reporting every violation.
///
/// Style violations are reported under `base.` so they never collide with
/// the widget's own field names.
pub fn validate_record<T: WidgetType>(candidate: &Value) -> Result<(), SchemaError> {
    match candidate.as_object() {
        Some(record) => validate_fields::<T>(record),
        None => Err(SchemaError::single("", Rule::NotAnObject)),
    }
}

/// [`validate_record`] for a record that is already known to be an object.
pub fn validate_fields<T: WidgetType>(record: &Map<String, Value>) -> Result<(), SchemaError> {
    let mut violations = Vec::new();
    for (key, value) in record {
        match key.as_str() {
            "id" => Kind::Text.check(value, "id", &mut violations),
            "base" => BASE_STYLE.check(value, "base", &mut violations),
            _ => T::schema().check_entry(key, value, "", &mut violations),
        }
    }
    T::check_rules(record, &mut violations);

    debug!(kind = T::KIND, violations = violations.len(), "validated widget record");
    SchemaError::check(violations)
}
