//! # Pageflow: a declarative page-template engine
//!
//! `pageflow` turns JSON or YAML page documents into rendered widget trees.
//! Templates describe *what* a page contains (widgets, bindings, conditions,
//! loops, fragments, actions) and the engine renders them against live state
//! and host data:
//!
//! - **Schema**: typed template/fragment documents with serde round-tripping.
//! - **Validation**: total, path-keyed diagnostics (`widgets.2.children.0.type`)
//!   that never panic, whatever the input.
//! - **Parsing**: JSON and YAML with format sniffing; parse results are plain
//!   result objects, never exceptions.
//! - **Widget registry**: an injected adapter table deciding which widget
//!   types exist and how their props are shaped; no global state.
//! - **Rendering**: condition gating, loop expansion, data binding, fragment
//!   splicing and layout translation, with every soft failure logged and
//!   degraded instead of raised.
//! - **Actions & state**: a shallow-merge state store plus a synchronous
//!   action dispatcher with host callback hooks.
//!
//! # Quick start
//!
//! ```rust
//! use pageflow::{parse_template, render_page, WidgetRegistry};
//!
//! let doc = r#"{
//!     "id": "welcome",
//!     "name": "Welcome",
//!     "widgets": [
//!         {"type": "text", "props": {"text": "Hello"}, "bindings": {"text": "user.name"}}
//!     ]
//! }"#;
//!
//! let registry = WidgetRegistry::with_builtins();
//! let outcome = parse_template(doc, None, &registry);
//! let template = outcome.data.expect("document is valid");
//!
//! let data = serde_json::json!({"user": {"name": "Ada"}});
//! let page = render_page(&template, &registry, data.as_object().cloned().unwrap());
//! assert_eq!(page.widgets[0].props["text"], "Ada");
//! ```

pub mod dsl;
pub mod error;
pub mod evaluator;
pub mod runtime;
pub mod widgets;

pub use crate::dsl::{
    assert_valid_fragment, assert_valid_template, detect_format, format_for_path,
    is_valid_fragment, is_valid_template, load_template_file,
    merge_fragments_into_template, parse_fragment, parse_fragment_file, parse_template,
    parse_template_file, parse_templates, serialize_fragment_to_json, serialize_fragment_to_yaml,
    serialize_template_to_json, serialize_template_to_yaml, validate_fragment, validate_template,
    ActionConfig, ActionKind, Diagnostic, DiagnosticLevel, FlexDirection, FragmentParseOutcome,
    FragmentPropSpec, LayoutConfig, LayoutType, LoaderConfig, LoopSpec, PageTemplate, ParseOutcome,
    StateConfig, TemplateFormat, TemplateFragment, TemplateParseOutcome, ValidationReport,
    WidgetNode,
};
pub use crate::error::{TemplateError, TemplateResult};
pub use crate::evaluator::{evaluate_condition, parse_condition, Scope};
pub use crate::runtime::{
    render_page, ActionDispatcher, ActionHandler, HostCallbacks, LayoutHints, PageRenderer,
    PageState, RenderedNode, RenderedPage,
};
pub use crate::widgets::{PropMap, TransformContext, WidgetAdapter, WidgetKind, WidgetRegistry};
