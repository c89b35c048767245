use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::dsl::schema::{LoopSpec, PageTemplate, TemplateFragment, WidgetNode};
use crate::evaluator::condition::{evaluate_condition, evaluate_value};
use crate::evaluator::path::Scope;
use crate::evaluator::type_coercion::value_to_string;
use crate::runtime::actions::{ActionDispatcher, HostCallbacks};
use crate::runtime::layout::LayoutHints;
use crate::runtime::state::PageState;
use crate::runtime::tree::{RenderedNode, RenderedPage};
use crate::widgets::adapter::TransformContext;
use crate::widgets::registry::WidgetRegistry;

/// Upper bound on nested fragment splices before the walk assumes a cycle.
const MAX_FRAGMENT_DEPTH: usize = 32;

/// Walks one template against live state and host data, producing
/// [`RenderedPage`] trees. The template, registry and fragment library are
/// borrowed and never mutated; state and data are the only moving parts
/// between renders.
pub struct PageRenderer<'a> {
    template: &'a PageTemplate,
    registry: &'a WidgetRegistry,
    fragments: &'a HashMap<String, TemplateFragment>,
    data: Map<String, Value>,
    state: Arc<PageState>,
    dispatcher: ActionDispatcher,
}

impl<'a> PageRenderer<'a> {
    pub fn new(
        template: &'a PageTemplate,
        registry: &'a WidgetRegistry,
        fragments: &'a HashMap<String, TemplateFragment>,
        data: Map<String, Value>,
        callbacks: HostCallbacks,
    ) -> Self {
        let initial = template
            .state
            .as_ref()
            .map(|state| state.initial.clone())
            .unwrap_or_default();
        let state = Arc::new(PageState::new(initial));
        let dispatcher = ActionDispatcher::new(&template.actions, Arc::clone(&state), callbacks);
        Self {
            template,
            registry,
            fragments,
            data,
            state,
            dispatcher,
        }
    }

    /// Shared state store; the host reads and the dispatcher writes it
    /// between renders.
    pub fn state(&self) -> &Arc<PageState> {
        &self.state
    }

    /// Dispatcher handle for host-driven action triggering.
    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// Replace the host data object for subsequent renders.
    pub fn set_data(&mut self, data: Map<String, Value>) {
        self.data = data;
    }

    pub fn render(&self) -> RenderedPage {
        let base = self.build_scope_base();
        let mut scope = Scope::new(&base);
        let widgets = self.render_list(&self.template.widgets, &mut scope, 0);
        RenderedPage {
            layout: LayoutHints::from_config(self.template.layout.as_ref()),
            widgets,
        }
    }

    /// Scope base for one pass: state snapshot, computed entries, then
    /// host data, later wins.
    fn build_scope_base(&self) -> Map<String, Value> {
        let mut base = self.state.snapshot();
        if let Some(state_cfg) = &self.template.state {
            if !state_cfg.computed.is_empty() {
                // Computed entries see state and data, never each other,
                // and are recomputed from scratch on every render.
                let mut seed = base.clone();
                for (key, value) in &self.data {
                    seed.insert(key.clone(), value.clone());
                }
                let scope = Scope::new(&seed);
                for (key, expr) in &state_cfg.computed {
                    match evaluate_value(expr, &scope) {
                        Ok(Some(value)) => {
                            base.insert(key.clone(), value);
                        }
                        Ok(None) => {}
                        Err(err) => {
                            tracing::warn!(key = %key, error = %err, "computed state entry skipped");
                        }
                    }
                }
            }
        }
        for (key, value) in &self.data {
            base.insert(key.clone(), value.clone());
        }
        base
    }

    fn render_list(
        &self,
        nodes: &[WidgetNode],
        scope: &mut Scope<'_>,
        depth: usize,
    ) -> Vec<RenderedNode> {
        let mut out = Vec::new();
        for (position, node) in nodes.iter().enumerate() {
            self.render_node(node, scope, depth, position, &mut out);
        }
        dedupe_sibling_keys(&mut out);
        out
    }

    /// One declarative node → zero or more rendered nodes.
    fn render_node(
        &self,
        node: &WidgetNode,
        scope: &mut Scope<'_>,
        depth: usize,
        position: usize,
        out: &mut Vec<RenderedNode>,
    ) {
        match &node.loop_spec {
            Some(loop_spec) => self.render_loop(node, loop_spec, scope, depth, out),
            None => {
                if !self.passes_condition(node, scope) {
                    return;
                }
                self.emit_instance(node, scope, depth, node_key(node, position), out);
            }
        }
    }

    /// Expand a loop node. The condition gate runs per instance, with the
    /// loop variables in scope, so `item.x` conditions behave.
    fn render_loop(
        &self,
        node: &WidgetNode,
        loop_spec: &LoopSpec,
        scope: &mut Scope<'_>,
        depth: usize,
        out: &mut Vec<RenderedNode>,
    ) {
        let items: Vec<Value> = match scope.resolve(&loop_spec.items) {
            Some(Value::Array(items)) => items.clone(),
            Some(_) => {
                tracing::warn!(path = %loop_spec.items, "loop items path is not an array, skipping");
                return;
            }
            None => {
                tracing::warn!(path = %loop_spec.items, "loop items path is undefined, skipping");
                return;
            }
        };
        for (index, item) in items.into_iter().enumerate() {
            scope.push_var(loop_spec.item_var(), item);
            scope.push_var(loop_spec.index_var(), Value::from(index));
            if self.passes_condition(node, scope) {
                let key = self.loop_key(node, loop_spec, scope, index);
                self.emit_instance(node, scope, depth, key, out);
            }
            scope.pop_var();
            scope.pop_var();
        }
    }

    fn passes_condition(&self, node: &WidgetNode, scope: &Scope<'_>) -> bool {
        match &node.condition {
            Some(condition) => evaluate_condition(condition, scope),
            None => true,
        }
    }

    fn emit_instance(
        &self,
        node: &WidgetNode,
        scope: &mut Scope<'_>,
        depth: usize,
        key: String,
        out: &mut Vec<RenderedNode>,
    ) {
        if node.is_fragment_reference() {
            self.splice_fragment(node, scope, depth, &key, out);
        } else if let Some(rendered) = self.render_widget(node, scope, depth, key) {
            out.push(rendered);
        }
    }

    fn render_widget(
        &self,
        node: &WidgetNode,
        scope: &mut Scope<'_>,
        depth: usize,
        key: String,
    ) -> Option<RenderedNode> {
        let Some(adapter) = self.registry.get(&node.widget_type) else {
            tracing::warn!(widget_type = %node.widget_type, "unknown widget type, skipping");
            return None;
        };
        let children = match &node.children {
            Some(kids) if adapter.has_children() => self.render_list(kids, scope, depth),
            _ => Vec::new(),
        };
        let bindings = self.resolve_bindings(node, scope);
        let ctx = TransformContext {
            bindings: &bindings,
            children: &children,
            actions: &node.actions,
            dispatcher: Some(&self.dispatcher),
        };
        let props = adapter.transform_props(node.props.clone(), &ctx);
        Some(RenderedNode {
            key,
            widget_type: node.widget_type.clone(),
            props,
            actions: node.actions.clone(),
            children,
        })
    }

    /// Binding paths resolve leniently; a path that resolves to nothing is
    /// dropped so the literal prop underneath survives.
    fn resolve_bindings(&self, node: &WidgetNode, scope: &Scope<'_>) -> Map<String, Value> {
        let mut resolved = Map::new();
        for (prop, path) in &node.bindings {
            match scope.resolve(path) {
                Some(value) => {
                    resolved.insert(prop.clone(), value.clone());
                }
                None => {
                    tracing::debug!(prop = %prop, path = %path, "binding path is undefined, keeping literal prop");
                }
            }
        }
        resolved
    }

    /// Splice a fragment's widgets in place of the reference node. The
    /// passed props live under the reserved `props` name for the duration
    /// of the fragment subtree.
    fn splice_fragment(
        &self,
        node: &WidgetNode,
        scope: &mut Scope<'_>,
        depth: usize,
        ref_key: &str,
        out: &mut Vec<RenderedNode>,
    ) {
        let Some(fragment_id) = node.fragment_id.as_deref() else {
            tracing::warn!("fragment reference without a fragmentId, skipping");
            return;
        };
        let Some(fragment) = self.fragments.get(fragment_id) else {
            tracing::warn!(fragment_id = %fragment_id, "unknown fragment, skipping");
            return;
        };
        if depth >= MAX_FRAGMENT_DEPTH {
            tracing::warn!(fragment_id = %fragment_id, depth, "fragment nesting too deep, skipping");
            return;
        }
        let props = self.fragment_props(node, fragment, scope);
        scope.push_var("props", Value::Object(props));
        let spliced = self.render_list(&fragment.widgets, scope, depth + 1);
        scope.pop_var();
        // Prefix keys of the spliced roots so repeated splices of the same
        // fragment stay unique among their siblings.
        for mut child in spliced {
            child.key = format!("{}-{}", ref_key, child.key);
            out.push(child);
        }
    }

    /// Parameter payload for one fragment splice: literal props, bindings
    /// resolved over them, declared defaults filling the gaps. A required
    /// prop still missing after all that is logged, but the fragment
    /// renders regardless.
    fn fragment_props(
        &self,
        node: &WidgetNode,
        fragment: &TemplateFragment,
        scope: &Scope<'_>,
    ) -> Map<String, Value> {
        let mut props = node.props.clone();
        for (prop, path) in &node.bindings {
            if let Some(value) = scope.resolve(path) {
                props.insert(prop.clone(), value.clone());
            }
        }
        for (name, spec) in &fragment.props {
            if props.contains_key(name) {
                continue;
            }
            if let Some(default) = &spec.default {
                props.insert(name.clone(), default.clone());
            } else if spec.required.unwrap_or(false) {
                tracing::warn!(
                    fragment_id = %fragment.id,
                    prop = %name,
                    "required fragment prop is missing"
                );
            }
        }
        props
    }

    /// Loop instance key: the declared `keyExpr` evaluated with the loop
    /// variables in scope, or `{id-or-type}-{index}`.
    fn loop_key(
        &self,
        node: &WidgetNode,
        loop_spec: &LoopSpec,
        scope: &Scope<'_>,
        index: usize,
    ) -> String {
        if let Some(key_expr) = &loop_spec.key_expr {
            match evaluate_value(key_expr, scope) {
                Ok(Some(value)) => {
                    let key = value_to_string(&value);
                    if !key.is_empty() {
                        return key;
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(key_expr = %key_expr, error = %err, "loop key expression failed, using positional key");
                }
            }
        }
        format!("{}-{}", key_base(node), index)
    }
}

fn key_base(node: &WidgetNode) -> &str {
    node.id.as_deref().unwrap_or(&node.widget_type)
}

fn node_key(node: &WidgetNode, position: usize) -> String {
    match &node.id {
        Some(id) => id.clone(),
        None => format!("{}-{}", node.widget_type, position),
    }
}

/// Keys must stay unique within a sibling list for host-side
/// reconciliation. Positional fallbacks can collide across nodes (an
/// anonymous widget next to an anonymous loop of the same type), as can
/// repeated `keyExpr` values; later duplicates get a numeric suffix.
fn dedupe_sibling_keys(nodes: &mut [RenderedNode]) {
    let mut seen: HashSet<String> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if seen.insert(node.key.clone()) {
            continue;
        }
        let mut suffix = 1;
        let mut candidate = format!("{}-{}", node.key, suffix);
        while seen.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}-{}", node.key, suffix);
        }
        tracing::warn!(key = %node.key, reassigned = %candidate, "duplicate sibling render key");
        seen.insert(candidate.clone());
        node.key = candidate;
    }
}

/// One-shot render with the built-in action handling and no fragments.
pub fn render_page(
    template: &PageTemplate,
    registry: &WidgetRegistry,
    data: Map<String, Value>,
) -> RenderedPage {
    let fragments = HashMap::new();
    PageRenderer::new(template, registry, &fragments, data, HostCallbacks::default()).render()
}
