pub mod colors;
pub mod style;

pub use colors::{Hsla, Shadow};
pub use style::{Alignment, BaseStyle, BaseStyleSchema, TextTransform, BASE_STYLE};
