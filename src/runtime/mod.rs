//! Render-time engine: state store, action dispatch, layout translation
//! and the template walker.

pub mod actions;
pub mod layout;
pub mod renderer;
pub mod state;
pub mod tree;

pub use actions::{ActionDispatcher, ActionHandler, HostCallbacks};
pub use layout::LayoutHints;
pub use renderer::{render_page, PageRenderer};
pub use state::PageState;
pub use tree::{RenderedNode, RenderedPage};
