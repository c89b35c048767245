//! Widget capability layer: the adapter seam, the injected registry, and
//! the built-in widget set.

pub mod adapter;
pub mod builtin;
pub mod registry;

pub use adapter::{merge_props, PropMap, TransformContext, WidgetAdapter};
pub use builtin::{register_builtins, WidgetKind};
pub use registry::WidgetRegistry;
