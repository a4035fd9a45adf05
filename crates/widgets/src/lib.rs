pub mod definition;
pub mod quick_links;
pub mod registry;
pub mod search_bar;

pub use definition::{validate_fields, validate_record, WidgetDefinition, WidgetType, RESERVED_KEYS};
pub use quick_links::{Direction, QuickLink, QuickLinks};
pub use registry::{Descriptor, Registry, TypedFactory, WidgetFactory};
pub use search_bar::{SearchBar, SearchEngine};
