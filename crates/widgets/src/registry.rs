use crate::definition::{validate_fields, WidgetDefinition, WidgetType, RESERVED_KEYS};
use crate::{QuickLinks, SearchBar};
use dash_core::{schema::join, Kind, Rule, Schema, SchemaError, Violation};
use dash_style::BASE_STYLE;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use tracing::warn;

/// Everything a settings form needs to bind one field generically.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Path into the record, e.g. `engine` or `base.fs`.
    pub path: String,
    pub label: &'static str,
    pub kind: Kind,
    pub default: Value,
}

/// Type-erased entry point for one widget type.
pub trait WidgetFactory: Send + Sync + fmt::Debug {
    fn kind(&self) -> &'static str;

    /// Property table of the type's own fields.
    fn schema(&self) -> &'static Schema;

    /// Default record: type defaults, empty `id`, fresh `base`.
    fn create_default(&self) -> Result<Map<String, Value>, SchemaError>;

    fn validate(&self, record: &Map<String, Value>) -> Result<(), SchemaError>;

    /// One descriptor per field, then one per `base` property.
    fn describe(&self) -> Result<Vec<Descriptor>, SchemaError> {
        let record = self.create_default()?;
        let default_of = |map: &Map<String, Value>, key: &str| map.get(key).cloned().unwrap_or(Value::Null);

        let mut out = vec![Descriptor {
            path: "id".to_string(),
            label: "Widget id",
            kind: Kind::Text,
            default: default_of(&record, "id"),
        }];
        out.extend(self.schema().properties.iter().map(|p| Descriptor {
            path: p.key.to_string(),
            label: p.label,
            kind: p.kind,
            default: default_of(&record, p.key),
        }));

        let base = record.get("base").and_then(Value::as_object).cloned().unwrap_or_default();
        out.extend(BASE_STYLE.properties.iter().map(|p| Descriptor {
            path: join("base", p.key),
            label: p.label,
            kind: p.kind,
            default: default_of(&base, p.key),
        }));
        Ok(out)
    }
}

/// [`WidgetFactory`] for any statically known [`WidgetType`].
pub struct TypedFactory<T>(PhantomData<fn() -> T>);

impl<T> TypedFactory<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypedFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WidgetType> fmt::Debug for TypedFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedFactory").field(&T::KIND).finish()
    }
}

impl<T: WidgetType> WidgetFactory for TypedFactory<T> {
    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn schema(&self) -> &'static Schema {
        T::schema()
    }

    fn create_default(&self) -> Result<Map<String, Value>, SchemaError> {
        WidgetDefinition::<T>::create_default().to_record()
    }

    fn validate(&self, record: &Map<String, Value>) -> Result<(), SchemaError> {
        validate_fields::<T>(record)
    }
}

/// Maps widget kind identifiers to their factories.
#[derive(Debug, Default)]
pub struct Registry {
    factories: BTreeMap<&'static str, Box<dyn WidgetFactory>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every widget type shipped with the dashboard.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for result in [
            registry.register(TypedFactory::<SearchBar>::new()),
            registry.register(TypedFactory::<QuickLinks>::new()),
        ] {
            if let Err(e) = result {
                warn!("Skipping built-in widget: {e}");
            }
        }
        registry
    }

    /// Add a widget type.  A second factory for the same kind replaces the first.
    ///
    /// Fails, leaving the registry untouched, when the type declares one of
    /// [`RESERVED_KEYS`] as its own field.
    pub fn register(&mut self, factory: impl WidgetFactory + 'static) -> Result<(), SchemaError> {
        let kind = factory.kind();
        let reserved: Vec<Violation> = factory
            .schema()
            .keys()
            .filter(|k| RESERVED_KEYS.contains(k))
            .map(|k| Violation::new(k, Rule::ReservedKey))
            .collect();
        if !reserved.is_empty() {
            warn!("Refusing widget kind '{kind}': it declares reserved keys.");
            return SchemaError::check(reserved);
        }

        if self.factories.insert(kind, Box::new(factory)).is_some() {
            warn!("Widget kind '{kind}' registered twice; keeping the newer factory.");
        }
        Ok(())
    }

    pub fn get(&self, kind: &str) -> Option<&dyn WidgetFactory> {
        self.factories.get(kind).map(|f| f.as_ref())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn create_default(&self, kind: &str) -> Result<Map<String, Value>, SchemaError> {
        self.factory(kind)?.create_default()
    }

    pub fn validate(&self, kind: &str, record: &Map<String, Value>) -> Result<(), SchemaError> {
        self.factory(kind)?.validate(record)
    }

    pub fn describe(&self, kind: &str) -> Result<Vec<Descriptor>, SchemaError> {
        self.factory(kind)?.describe()
    }

    fn factory(&self, kind: &str) -> Result<&dyn WidgetFactory, SchemaError> {
        self.get(kind)
            .ok_or_else(|| SchemaError::single("kind", Rule::UnknownKind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_style::BaseStyleSchema;
    use serde_json::json;

    #[test]
    fn builtin_kinds() {
        let registry = Registry::builtin();
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["quick-links", "search-bar"]);
    }

    #[test]
    fn every_default_validates() {
        let registry = Registry::builtin();
        for kind in registry.kinds() {
            let record = registry.create_default(kind).unwrap();
            assert!(
                registry.validate(kind, &record).is_ok(),
                "default '{kind}' should validate"
            );
        }
    }

    #[test]
    fn every_default_embeds_base_template() {
        let registry = Registry::builtin();
        let template = serde_json::to_value(BaseStyleSchema::create()).unwrap();
        for kind in registry.kinds() {
            let record = registry.create_default(kind).unwrap();
            assert_eq!(record["base"], template, "'{kind}' base differs from the template");
            assert_eq!(record["id"], json!(""));
        }
    }

    #[test]
    fn mutating_one_record_leaves_others_alone() {
        let registry = Registry::builtin();
        let mut first = registry.create_default("search-bar").unwrap();
        let second = registry.create_default("search-bar").unwrap();

        first["base"]["fs"] = json!(64.0);

        assert_eq!(second["base"]["fs"], json!(20.0));
        assert_eq!(registry.create_default("search-bar").unwrap()["base"]["fs"], json!(20.0));
    }

    #[test]
    fn typed_instances_are_independent() {
        let mut first = WidgetDefinition::<SearchBar>::create_default();
        let second = WidgetDefinition::<SearchBar>::create_default();
        first.base.font_size = 36.0;

        assert_eq!(second.base.font_size, 20.0);
        assert_eq!(second.base, BaseStyleSchema::create());
    }

    #[test]
    fn unknown_kind_is_a_schema_error() {
        let registry = Registry::builtin();
        let err = registry.create_default("weather").unwrap_err();
        assert_eq!(err.rules_for("kind").collect::<Vec<_>>(), vec![&Rule::UnknownKind]);
        assert!(registry.validate("weather", &Map::new()).is_err());
    }

    #[test]
    fn builtin_schemas_avoid_reserved_keys() {
        let registry = Registry::builtin();
        for kind in registry.kinds() {
            let schema = registry.get(kind).unwrap().schema();
            for key in schema.keys() {
                assert!(!RESERVED_KEYS.contains(&key), "'{kind}' declares '{key}'");
            }
        }
    }

    #[test]
    fn descriptors_cover_every_key_with_defaults() {
        let registry = Registry::builtin();
        let descriptors = registry.describe("search-bar").unwrap();

        let engine = descriptors.iter().find(|d| d.path == "engine").unwrap();
        assert_eq!(engine.default, json!("google"));

        let font_size = descriptors.iter().find(|d| d.path == "base.fs").unwrap();
        assert_eq!(font_size.label, "Font size");
        assert_eq!(font_size.default, json!(20.0));

        assert!(descriptors.iter().all(|d| !d.default.is_null()));
        assert_eq!(
            descriptors.len(),
            1 + SearchBar::schema().properties.len() + BASE_STYLE.properties.len()
        );
    }

    #[test]
    fn typed_record_keys_match_schema() {
        let record = WidgetDefinition::<QuickLinks>::create_default().to_record().unwrap();
        let mut keys: Vec<&str> = record
            .keys()
            .map(String::as_str)
            .filter(|k| !RESERVED_KEYS.contains(k))
            .collect();
        let mut table: Vec<&str> = QuickLinks::schema().keys().collect();
        keys.sort_unstable();
        table.sort_unstable();
        assert_eq!(keys, table);

        let record = WidgetDefinition::<SearchBar>::create_default().to_record().unwrap();
        let mut keys: Vec<&str> = record
            .keys()
            .map(String::as_str)
            .filter(|k| !RESERVED_KEYS.contains(k))
            .collect();
        let mut table: Vec<&str> = SearchBar::schema().keys().collect();
        keys.sort_unstable();
        table.sort_unstable();
        assert_eq!(keys, table);
    }

    #[test]
    fn registering_twice_replaces() {
        let mut registry = Registry::builtin();
        registry.register(TypedFactory::<SearchBar>::new()).unwrap();
        assert_eq!(registry.kinds().count(), 2);
    }

    #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Clashing {
        base: bool,
        title: String,
    }

    static CLASHING: Schema = Schema::new(
        "clashing",
        &[
            dash_core::PropertySpec::new("base", "Shadows the style", Kind::Bool),
            dash_core::PropertySpec::new("title", "Title", Kind::Text),
        ],
    );

    impl WidgetType for Clashing {
        const KIND: &'static str = "clashing";

        fn schema() -> &'static Schema {
            &CLASHING
        }
    }

    #[test]
    fn reserved_keys_are_refused() {
        let mut registry = Registry::builtin();
        let err = registry.register(TypedFactory::<Clashing>::new()).unwrap_err();

        assert_eq!(err.rules_for("base").collect::<Vec<_>>(), vec![&Rule::ReservedKey]);
        assert!(!err.cites("title"));
        assert!(!registry.contains("clashing"));
        assert_eq!(registry.kinds().count(), 2);
    }
}
