use serde::{Deserialize, Serialize};

/// HSLA colour, stored as the 4-tuple `[hue, saturation, lightness, alpha]`.
///
/// Hue is in degrees (`0–360`), saturation and lightness in percent
/// (`0–100`), alpha in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    pub const WHITE:       Self = Self::new(0.0, 0.0, 100.0, 1.0);
    pub const CLEAR_WHITE: Self = Self::new(0.0, 0.0, 100.0, 0.0);
    pub const CLEAR_DARK:  Self = Self::new(0.0, 0.0, 10.0, 0.0);
    pub const MIST:        Self = Self::new(200.0, 10.0, 90.0, 1.0);

    pub const fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self { h, s, l, a }
    }

    /// Format as a CSS `hsla()` value.
    pub fn to_css(self) -> String {
        format!("hsla({}, {}%, {}%, {})", self.h, self.s, self.l, self.a)
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }
}

impl From<[f64; 4]> for Hsla {
    fn from([h, s, l, a]: [f64; 4]) -> Self {
        Self { h, s, l, a }
    }
}

impl From<Hsla> for [f64; 4] {
    fn from(c: Hsla) -> Self {
        [c.h, c.s, c.l, c.a]
    }
}

type ShadowTuple = (bool, f64, f64, f64, f64, f64, f64, f64);

/// Text or box shadow, stored as the 8-tuple
/// `[enabled, offset x, offset y, blur, spread, hue, saturation, alpha]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ShadowTuple", into = "ShadowTuple")]
pub struct Shadow {
    pub enabled: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub hue: f64,
    pub saturation: f64,
    pub alpha: f64,
}

impl Shadow {
    /// Disabled 1/1 px shadow with a 5 px blur, black at 80 %.
    pub const SOFT: Self = Self {
        enabled: false,
        offset_x: 1.0,
        offset_y: 1.0,
        blur: 5.0,
        spread: 0.0,
        hue: 0.0,
        saturation: 0.0,
        alpha: 0.8,
    };
}

impl Default for Shadow {
    fn default() -> Self {
        Self::SOFT
    }
}

impl From<ShadowTuple> for Shadow {
    fn from((enabled, offset_x, offset_y, blur, spread, hue, saturation, alpha): ShadowTuple) -> Self {
        Self { enabled, offset_x, offset_y, blur, spread, hue, saturation, alpha }
    }
}

impl From<Shadow> for ShadowTuple {
    fn from(s: Shadow) -> Self {
        (s.enabled, s.offset_x, s.offset_y, s.blur, s.spread, s.hue, s.saturation, s.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn color_is_a_four_tuple() {
        assert_eq!(serde_json::to_value(Hsla::MIST).unwrap(), json!([200.0, 10.0, 90.0, 1.0]));
    }

    #[test]
    fn shadow_is_an_eight_tuple() {
        let value = serde_json::to_value(Shadow::SOFT).unwrap();
        assert_eq!(value, json!([false, 1.0, 1.0, 5.0, 0.0, 0.0, 0.0, 0.8]));
        assert_eq!(serde_json::from_value::<Shadow>(value).unwrap(), Shadow::SOFT);
    }

    #[test]
    fn shadow_rejects_short_tuple() {
        assert!(serde_json::from_value::<Shadow>(json!([false, 1, 1, 5, 0, 0, 0])).is_err());
    }

    #[test]
    fn css_output() {
        assert_eq!(Hsla::MIST.to_css(), "hsla(200, 10%, 90%, 1)");
        assert_eq!(Hsla::WHITE.with_alpha(2.0).a, 1.0);
    }
}
