use dash_core::{DashError, Result, Rule, SchemaError, Violation};
use dash_style::Hsla;
use dash_widgets::{Registry, WidgetDefinition, WidgetType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, info};

/// Root configuration structure parsed from `dashboard.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page-wide settings widgets fall back to.
    pub global: GlobalConfig,
    /// Placed widgets, in stacking order.
    pub widgets: Vec<PlacedWidget>,
}

/// Page-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Font family used unless a widget sets `base.orf`.
    pub font: String,
    pub font_size: f64,
    pub text_color: Hsla,
    pub background: Hsla,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            font:       "Source Sans Pro".to_string(),
            font_size:  20.0,
            text_color: Hsla::MIST,
            background: Hsla::new(220.0, 15.0, 12.0, 1.0),
        }
    }
}

/// One widget on the page: its kind plus the widget's own record.
///
/// In `dashboard.toml`:
///
/// ```toml
/// [[widgets]]
/// kind = "search-bar"
/// id = "5f0c…"
/// engine = "duckduckgo"
///
/// [widgets.base]
/// fs = 24
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWidget {
    /// Registry identifier, e.g. `"search-bar"`.
    pub kind: String,
    /// `id`, the kind's own fields and `base`, exactly as stored.
    #[serde(flatten)]
    pub record: Map<String, Value>,
}

impl PlacedWidget {
    pub fn from_definition<T: WidgetType>(definition: &WidgetDefinition<T>) -> Result<Self> {
        Ok(Self {
            kind: T::KIND.to_string(),
            record: definition.to_record()?,
        })
    }

    /// Validate and decode into the typed definition for `T`.
    pub fn decode<T: WidgetType>(&self) -> Result<WidgetDefinition<T>> {
        if self.kind != T::KIND {
            return Err(DashError::Config(format!(
                "widget '{}' is a '{}', not a '{}'",
                self.id(),
                self.kind,
                T::KIND
            )));
        }
        Ok(WidgetDefinition::from_record(&self.record)?)
    }

    pub fn id(&self) -> &str {
        self.record.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    /// No `id` key, or an empty string.  A malformed id is left for
    /// [`DashboardConfig::validate`] to report.
    fn needs_id(&self) -> bool {
        match self.record.get("id") {
            None => true,
            Some(Value::String(id)) => id.is_empty(),
            Some(_) => false,
        }
    }

    fn set_id(&mut self, id: String) {
        self.record.insert("id".to_string(), Value::String(id));
    }
}

impl DashboardConfig {
    /// Place a new widget of `kind` with its defaults and a fresh id.
    ///
    /// Returns the generated id.
    pub fn add(&mut self, registry: &Registry, kind: &str) -> Result<String> {
        let record = registry.create_default(kind)?;
        let mut widget = PlacedWidget {
            kind: kind.to_string(),
            record,
        };
        let id = new_id();
        widget.set_id(id.clone());
        self.widgets.push(widget);
        info!("Added '{kind}' widget {id}");
        Ok(id)
    }

    /// Place an already-configured typed widget, assigning an id if it has none.
    pub fn insert<T: WidgetType>(&mut self, mut definition: WidgetDefinition<T>) -> Result<String> {
        if definition.id.is_empty() {
            definition.id = new_id();
        }
        let id = definition.id.clone();
        self.widgets.push(PlacedWidget::from_definition(&definition)?);
        Ok(id)
    }

    /// Remove the widget with `id`, returning it.
    pub fn remove(&mut self, id: &str) -> Option<PlacedWidget> {
        let index = self.widgets.iter().position(|w| w.id() == id)?;
        let removed = self.widgets.remove(index);
        info!("Removed '{}' widget {id}", removed.kind);
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&PlacedWidget> {
        self.widgets.iter().find(|w| w.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PlacedWidget> {
        self.widgets.iter_mut().find(|w| w.id() == id)
    }

    /// Give every widget without an id a generated one.
    ///
    /// Hand-written layout files usually omit ids.  Returns how many were
    /// assigned.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        for widget in self.widgets.iter_mut().filter(|w| w.needs_id()) {
            widget.set_id(new_id());
            assigned += 1;
        }
        if assigned > 0 {
            debug!("Assigned ids to {assigned} widget(s)");
        }
        assigned
    }

    /// Validate every widget, reporting paths as `widgets[i].<field>`.
    pub fn validate(&self, registry: &Registry) -> std::result::Result<(), SchemaError> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for (i, widget) in self.widgets.iter().enumerate() {
            let prefix = format!("widgets[{i}]");

            if let Err(e) = registry.validate(&widget.kind, &widget.record) {
                violations.extend(e.into_violations().into_iter().map(|v| {
                    let field = if v.field.is_empty() {
                        prefix.clone()
                    } else {
                        format!("{prefix}.{}", v.field)
                    };
                    Violation::new(field, v.rule)
                }));
            }

            let id = widget.id();
            if !id.is_empty() && !seen.insert(id) {
                violations.push(Violation::new(format!("{prefix}.id"), Rule::Duplicate));
            }
        }

        SchemaError::check(violations)
    }

    /// Serialize for the browser storage layer.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DashError::Config(format!("JSON encode error: {e}")))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| DashError::Config(format!("JSON parse error: {e}")))
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_widgets::{QuickLink, QuickLinks, SearchBar, SearchEngine};
    use serde_json::json;

    fn sample() -> (Registry, DashboardConfig) {
        let registry = Registry::builtin();
        let mut config = DashboardConfig::default();
        config.add(&registry, "search-bar").unwrap();
        config.add(&registry, "quick-links").unwrap();
        (registry, config)
    }

    #[test]
    fn added_widgets_get_unique_ids_and_validate() {
        let (registry, config) = sample();
        let first = config.widgets[0].id();
        let second = config.widgets[1].id();

        assert!(!first.is_empty());
        assert_ne!(first, second);
        assert!(config.validate(&registry).is_ok());
    }

    #[test]
    fn add_unknown_kind_fails() {
        let registry = Registry::builtin();
        let mut config = DashboardConfig::default();
        let err = config.add(&registry, "weather").unwrap_err();
        assert!(matches!(err, DashError::Schema(_)));
        assert!(config.widgets.is_empty());
    }

    #[test]
    fn remove_by_id() {
        let (_, mut config) = sample();
        let id = config.widgets[0].id().to_string();

        let removed = config.remove(&id).unwrap();
        assert_eq!(removed.kind, "search-bar");
        assert_eq!(config.widgets.len(), 1);
        assert!(config.get(&id).is_none());
        assert!(config.remove(&id).is_none());
    }

    #[test]
    fn violations_are_prefixed_per_widget() {
        let (registry, mut config) = sample();
        let id = config.widgets[0].id().to_string();
        let widget = config.get_mut(&id).unwrap();
        widget.record.insert("customEngine".into(), json!(true));
        widget.record.insert("customEngineUrl".into(), json!("https://example.com/s?query=term"));
        config.widgets[1].record["base"]["ts"] = json!([false, 1, 1, 5, 0, 0, 0]);

        let err = config.validate(&registry).unwrap_err();
        assert!(err.cites("widgets[0].customEngineUrl"));
        assert!(err.cites("widgets[1].base.ts"));
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let (registry, mut config) = sample();
        let id = config.widgets[0].id().to_string();
        config.widgets[1].set_id(id);

        let err = config.validate(&registry).unwrap_err();
        assert_eq!(
            err.rules_for("widgets[1].id").collect::<Vec<_>>(),
            vec![&Rule::Duplicate]
        );
    }

    #[test]
    fn unknown_kind_is_reported_on_validate() {
        let registry = Registry::builtin();
        let mut config = DashboardConfig::default();
        config.widgets.push(PlacedWidget {
            kind: "weather".into(),
            record: Map::new(),
        });
        let err = config.validate(&registry).unwrap_err();
        assert!(err.cites("widgets[0].kind"));
    }

    #[test]
    fn typed_round_trip_through_record() {
        let mut definition = WidgetDefinition::<SearchBar>::create_default();
        definition.fields.engine = SearchEngine::DuckDuckGo;
        definition.base.font_size = 30.0;

        let mut config = DashboardConfig::default();
        let id = config.insert(definition.clone()).unwrap();
        definition.id = id.clone();

        let decoded: WidgetDefinition<SearchBar> = config.get(&id).unwrap().decode().unwrap();
        assert_eq!(decoded, definition);
        assert!(config.get(&id).unwrap().decode::<QuickLinks>().is_err());
    }

    #[test]
    fn json_storage_round_trip() {
        let (_, mut config) = sample();
        let id = config.widgets[1].id().to_string();
        let mut links: WidgetDefinition<QuickLinks> = config.get(&id).unwrap().decode().unwrap();
        links.fields.links.push(QuickLink::new("Docs", "https://docs.rs"));
        *config.get_mut(&id).unwrap() = PlacedWidget::from_definition(&links).unwrap();

        let raw = config.to_json().unwrap();
        let restored = DashboardConfig::from_json(&raw).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn toml_round_trip() {
        let (registry, config) = sample();
        let raw = toml::to_string(&config).unwrap();
        let restored: DashboardConfig = toml::from_str(&raw).unwrap();

        assert_eq!(restored, config);
        assert!(restored.validate(&registry).is_ok());
    }

    #[test]
    fn hand_written_layout_gets_ids() {
        let raw = r#"
            [[widgets]]
            kind = "search-bar"
            engine = "bing"

            [widgets.base]
            fs = 24
            a = "l"

            [[widgets]]
            kind = "quick-links"
            links = [{ name = "Docs", url = "https://docs.rs" }]
        "#;
        let registry = Registry::builtin();
        let mut config: DashboardConfig = toml::from_str(raw).unwrap();

        assert_eq!(config.assign_missing_ids(), 2);
        assert_eq!(config.assign_missing_ids(), 0);
        assert!(config.validate(&registry).is_ok());

        let bar: WidgetDefinition<SearchBar> = config.widgets[0].decode().unwrap();
        assert_eq!(bar.fields.engine, SearchEngine::Bing);
        assert_eq!(bar.base.font_size, 24.0);
    }

    #[test]
    fn malformed_id_is_reported_not_replaced() {
        let raw = r#"
            [[widgets]]
            kind = "search-bar"
            id = 5

            [[widgets]]
            kind = "search-bar"
            id = ""
        "#;
        let registry = Registry::builtin();
        let mut config: DashboardConfig = toml::from_str(raw).unwrap();

        assert_eq!(config.assign_missing_ids(), 1);
        assert_eq!(config.widgets[0].record["id"], json!(5));
        assert!(!config.widgets[1].id().is_empty());

        let err = config.validate(&registry).unwrap_err();
        assert_eq!(
            err.rules_for("widgets[0].id").collect::<Vec<_>>(),
            vec![&Rule::WrongType { expected: "string" }]
        );
        assert!(!err.cites("widgets[1].id"));
    }
}
