use crate::definition::WidgetType;
use dash_core::{Kind, PropertySpec, Range, Rule, Schema, Violation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Layout direction of the link row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    #[serde(rename = "h")]
    Horizontal,
    #[serde(rename = "v")]
    Vertical,
}

impl Direction {
    pub const KEYS: &'static [&'static str] = &["h", "v"];
}

/// One bookmarked site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuickLink {
    pub name: String,
    pub url: String,
    /// Show the site's favicon.
    pub icon: bool,
}

impl QuickLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            icon: true,
        }
    }
}

/// A row of bookmarked sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuickLinks {
    pub links: Vec<QuickLink>,
    /// Open links in a new tab.
    pub new_tab: bool,
    /// Show link names under the icons.
    pub labels: bool,
    pub icon_size: f64,
    pub gap: f64,
    pub direction: Direction,
}

impl Default for QuickLinks {
    fn default() -> Self {
        Self {
            links:     Vec::new(),
            new_tab:   false,
            labels:    true,
            icon_size: 24.0,
            gap:       12.0,
            direction: Direction::Horizontal,
        }
    }
}

static QUICK_LINKS: Schema = Schema::new(
    "quick links",
    &[
        PropertySpec::new(
            "links",
            "Links",
            Kind::List(&[
                PropertySpec::new("name", "Name", Kind::Text),
                PropertySpec::new("url",  "Address", Kind::Text),
                PropertySpec::new("icon", "Show icon", Kind::Bool),
            ]),
        ),
        PropertySpec::new("newTab",    "Open in new tab", Kind::Bool),
        PropertySpec::new("labels",    "Show labels",     Kind::Bool),
        PropertySpec::new("iconSize",  "Icon size",       Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("gap",       "Gap",             Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("direction", "Direction",       Kind::Choice(Direction::KEYS)),
    ],
);

impl WidgetType for QuickLinks {
    const KIND: &'static str = "quick-links";

    fn schema() -> &'static Schema {
        &QUICK_LINKS
    }

    fn check_rules(record: &Map<String, Value>, out: &mut Vec<Violation>) {
        let Some(links) = record.get("links").and_then(Value::as_array) else {
            return;
        };
        for (i, link) in links.iter().enumerate() {
            // A missing url decodes to an empty string.
            let blank = match link.get("url") {
                Some(Value::String(url)) => url.trim().is_empty(),
                Some(_) => false,
                None => link.is_object(),
            };
            if blank {
                out.push(Violation::new(format!("links[{i}].url"), Rule::Empty));
            }
        }
    }
}
