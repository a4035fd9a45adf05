use crate::definition::WidgetType;
use dash_core::{Kind, PropertySpec, Range, Rule, Schema, Violation};
use dash_style::{Hsla, Shadow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query placeholder in engine URL templates.
pub const PLACEHOLDER: &str = "%s";

/// Built-in search engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    DuckDuckGo,
    Yahoo,
    Ecosia,
    Brave,
    Startpage,
    Qwant,
}

impl SearchEngine {
    pub const ALL: &'static [Self] = &[
        Self::Google,
        Self::Bing,
        Self::DuckDuckGo,
        Self::Yahoo,
        Self::Ecosia,
        Self::Brave,
        Self::Startpage,
        Self::Qwant,
    ];

    pub const KEYS: &'static [&'static str] = &[
        "google", "bing", "duckduckgo", "yahoo", "ecosia", "brave", "startpage", "qwant",
    ];

    /// Query URL template with a single `%s`.
    pub fn template(self) -> &'static str {
        match self {
            Self::Google     => "https://www.google.com/search?q=%s",
            Self::Bing       => "https://www.bing.com/search?q=%s",
            Self::DuckDuckGo => "https://duckduckgo.com/?q=%s",
            Self::Yahoo      => "https://search.yahoo.com/search?p=%s",
            Self::Ecosia     => "https://www.ecosia.org/search?q=%s",
            Self::Brave      => "https://search.brave.com/search?q=%s",
            Self::Startpage  => "https://www.startpage.com/do/search?q=%s",
            Self::Qwant      => "https://www.qwant.com/?q=%s",
        }
    }
}

/// The search box widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchBar {
    pub engine: SearchEngine,
    /// Use `custom_engine_url` instead of the engine's own template.
    pub custom_engine: bool,
    pub custom_engine_url: String,
    pub autocomplete: bool,
    pub icon: bool,
    /// Show the engine name next to the input.
    pub engine_label: bool,
    /// Engine picker dropdown.
    pub dropdown: bool,
    pub padding: f64,
    pub size: f64,
    pub border_size: f64,
    /// Draw only the bottom border.
    pub border_bottom: bool,
    pub radius: f64,
    /// Use the colors below instead of the theme's.
    pub override_colors: bool,
    pub background: Hsla,
    pub border_color: Hsla,
    pub box_shadow: Shadow,
    /// Placeholder text.
    pub label: String,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            engine:            SearchEngine::Google,
            custom_engine:     false,
            custom_engine_url: SearchEngine::Google.template().to_string(),
            autocomplete:      true,
            icon:              true,
            engine_label:      false,
            dropdown:          false,
            padding:           10.0,
            size:              500.0,
            border_size:       1.0,
            border_bottom:     true,
            radius:            6.0,
            override_colors:   false,
            background:        Hsla::CLEAR_WHITE,
            border_color:      Hsla::WHITE,
            box_shadow:        Shadow::SOFT,
            label:             "Search the web...".to_string(),
        }
    }
}

static SEARCH_BAR: Schema = Schema::new(
    "search bar",
    &[
        PropertySpec::new("engine",          "Search engine",          Kind::Choice(SearchEngine::KEYS)),
        PropertySpec::new("customEngine",    "Use a custom engine",    Kind::Bool),
        PropertySpec::new("customEngineUrl", "Custom engine URL",      Kind::Text),
        PropertySpec::new("autocomplete",    "Autocomplete",           Kind::Bool),
        PropertySpec::new("icon",            "Show search icon",       Kind::Bool),
        PropertySpec::new("engineLabel",     "Show engine name",       Kind::Bool),
        PropertySpec::new("dropdown",        "Engine dropdown",        Kind::Bool),
        PropertySpec::new("padding",         "Padding",                Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("size",            "Width",                  Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("borderSize",      "Border size",            Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("borderBottom",    "Bottom border only",     Kind::Bool),
        PropertySpec::new("radius",          "Corner radius",          Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("overrideColors",  "Override colors",        Kind::Bool),
        PropertySpec::new("background",      "Background color",       Kind::Color),
        PropertySpec::new("borderColor",     "Border color",           Kind::Color),
        PropertySpec::new("boxShadow",       "Shadow",                 Kind::Shadow),
        PropertySpec::new("label",           "Placeholder text",       Kind::Text),
    ],
);

impl SearchBar {
    /// The template queries are sent to.
    pub fn active_template(&self) -> &str {
        if self.custom_engine {
            &self.custom_engine_url
        } else {
            self.engine.template()
        }
    }

    /// Build the results URL for `query`.
    pub fn search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query.trim());
        self.active_template().replacen(PLACEHOLDER, &encoded, 1)
    }
}

impl WidgetType for SearchBar {
    const KIND: &'static str = "search-bar";

    fn schema() -> &'static Schema {
        &SEARCH_BAR
    }

    fn check_rules(record: &Map<String, Value>, out: &mut Vec<Violation>) {
        let defaults = Self::default();
        let custom = record
            .get("customEngine")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.custom_engine);
        if !custom {
            return;
        }

        // Non-string values were already reported by the table check.
        let url = match record.get("customEngineUrl") {
            Some(Value::String(url)) => url.as_str(),
            Some(_) => return,
            None => defaults.custom_engine_url.as_str(),
        };
        let found = url.matches(PLACEHOLDER).count();
        if found != 1 {
            out.push(Violation::new("customEngineUrl", Rule::Placeholder { found }));
        }
    }
}
