use crate::colors::{Hsla, Shadow};
use dash_core::{Kind, PropertySpec, Range, Schema, SchemaError};
use serde::{Deserialize, Serialize};

/// Horizontal alignment, stored as `"l"`, `"c"` or `"r"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Alignment {
    #[serde(rename = "l")]
    Left,
    #[default]
    #[serde(rename = "c")]
    Center,
    #[serde(rename = "r")]
    Right,
}

impl Alignment {
    pub const KEYS: &'static [&'static str] = &["l", "c", "r"];
}

/// CSS `text-transform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

impl TextTransform {
    pub const KEYS: &'static [&'static str] = &["none", "uppercase", "lowercase", "capitalize"];
}

/// Generic container, typography and box settings every widget carries
/// under its `base` key.
///
/// Field names are descriptive; the serialized keys are the short ones the
/// dashboard has always stored (`w`, `fs`, `csh`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStyle {
    // ── Layout ────────────────────────────────────────────────────────────────
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "h")]
    pub height: f64,
    #[serde(rename = "as")]
    pub auto_size: bool,
    #[serde(rename = "a")]
    pub align: Alignment,
    /// Alignment of the content inside the widget container.
    #[serde(rename = "ca")]
    pub content_align: Alignment,
    pub x: f64,
    pub y: f64,

    // ── Typography ────────────────────────────────────────────────────────────
    /// Use the settings below instead of the dashboard-wide font.
    #[serde(rename = "orf")]
    pub override_font: bool,
    #[serde(rename = "cl")]
    pub color: Hsla,
    #[serde(rename = "ff")]
    pub font_family: String,
    #[serde(rename = "fs")]
    pub font_size: f64,
    /// CSS weight, `100–900`.
    #[serde(rename = "fb")]
    pub font_weight: f64,
    #[serde(rename = "fi")]
    pub italic: bool,
    #[serde(rename = "fu")]
    pub underline: bool,
    #[serde(rename = "ls")]
    pub letter_spacing: f64,
    #[serde(rename = "ts")]
    pub text_shadow: Shadow,
    #[serde(rename = "tt")]
    pub text_transform: TextTransform,

    // ── Container box ─────────────────────────────────────────────────────────
    #[serde(rename = "cor")]
    pub override_container: bool,
    #[serde(rename = "crd")]
    pub radius: f64,
    #[serde(rename = "cbs")]
    pub border_size: f64,
    #[serde(rename = "cbc")]
    pub border_color: Hsla,
    #[serde(rename = "cbg")]
    pub background: Hsla,
    #[serde(rename = "csh")]
    pub box_shadow: Shadow,
    #[serde(rename = "cpd")]
    pub padding: f64,
}

impl Default for BaseStyle {
    fn default() -> Self {
        Self {
            width:          600.0,
            height:         400.0,
            auto_size:      true,
            align:          Alignment::Center,
            content_align:  Alignment::Center,
            x:              0.0,
            y:              0.0,
            override_font:  false,
            color:          Hsla::MIST,
            font_family:    "Source Sans Pro".to_string(),
            font_size:      20.0,
            font_weight:    400.0,
            italic:         false,
            underline:      false,
            letter_spacing: 0.0,
            text_shadow:    Shadow::SOFT,
            text_transform: TextTransform::None,
            override_container: false,
            radius:         0.0,
            border_size:    0.0,
            border_color:   Hsla::WHITE,
            background:     Hsla::CLEAR_DARK,
            box_shadow:     Shadow::SOFT,
            padding:        0.0,
        }
    }
}

/// Property table for [`BaseStyle`], keyed by the serialized names.
pub static BASE_STYLE: Schema = Schema::new(
    "base style",
    &[
        PropertySpec::new("w",   "Container width",              Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("h",   "Container height",             Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("as",  "Auto size",                    Kind::Bool),
        PropertySpec::new("a",   "Alignment",                    Kind::Choice(Alignment::KEYS)),
        PropertySpec::new("ca",  "Alignment within container",   Kind::Choice(Alignment::KEYS)),
        PropertySpec::new("x",   "Position X",                   Kind::Number(Range::ANY)),
        PropertySpec::new("y",   "Position Y",                   Kind::Number(Range::ANY)),
        PropertySpec::new("orf", "Override global font styles",  Kind::Bool),
        PropertySpec::new("cl",  "Color",                        Kind::Color),
        PropertySpec::new("ff",  "Font family",                  Kind::Text),
        PropertySpec::new("fs",  "Font size",                    Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("fb",  "Font weight",                  Kind::Number(Range::between(100.0, 900.0))),
        PropertySpec::new("fi",  "Italic",                       Kind::Bool),
        PropertySpec::new("fu",  "Underline",                    Kind::Bool),
        PropertySpec::new("ls",  "Letter spacing",               Kind::Number(Range::ANY)),
        PropertySpec::new("ts",  "Text shadow",                  Kind::Shadow),
        PropertySpec::new("tt",  "Text case",                    Kind::Choice(TextTransform::KEYS)),
        PropertySpec::new("cor", "Container override",           Kind::Bool),
        PropertySpec::new("crd", "Container rounded radius",     Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("cbs", "Container border size",        Kind::Number(Range::NON_NEGATIVE)),
        PropertySpec::new("cbc", "Container border color",       Kind::Color),
        PropertySpec::new("cbg", "Container background color",   Kind::Color),
        PropertySpec::new("csh", "Container shadow",             Kind::Shadow),
        PropertySpec::new("cpd", "Container padding",            Kind::Number(Range::NON_NEGATIVE)),
    ],
);

/// Entry points for the shared style template.
pub struct BaseStyleSchema;

impl BaseStyleSchema {
    /// A fresh copy of every default.  Each call returns an independent value.
    pub fn create() -> BaseStyle {
        BaseStyle::default()
    }

    /// Check the plain key-value form of a base style.
    pub fn validate(candidate: &serde_json::Value) -> Result<(), SchemaError> {
        BASE_STYLE.validate(candidate)
    }

    pub fn schema() -> &'static Schema {
        &BASE_STYLE
    }
}
