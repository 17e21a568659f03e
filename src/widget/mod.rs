//! Widget facade, widget trait and built-in widgets

mod facade;
pub mod gallery;
mod image;
pub mod registry;
pub mod text_block;
pub mod traits;

pub use facade::WidgetBase;
pub use gallery::{BaseGallery, Gallery};
pub use image::{ImageSource, SrcSetCandidate};
pub use registry::{DynWidgetFactory, WidgetInstance, WidgetRegistry};
pub use text_block::TextBlock;
pub use traits::{escape_html, Widget, WidgetIdentity};
