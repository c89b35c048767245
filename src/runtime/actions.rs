use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::dsl::schema::{ActionConfig, ActionKind};
use crate::runtime::state::PageState;

/// Fires after a `setState` merge with the raw updates object.
pub type StateChangeFn = Arc<dyn Fn(&Map<String, Value>) + Send + Sync>;
/// Receives every triggered action id and payload in place of the
/// built-in handling.
pub type ActionFn = Arc<dyn Fn(&str, Option<&Value>) + Send + Sync>;
/// Receives the target path of a `navigate` action.
pub type NavigateFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Optional host integration points. Each hook is independent; an empty
/// set leaves only the built-in `setState` behavior active.
#[derive(Clone, Default)]
pub struct HostCallbacks {
    pub on_state_change: Option<StateChangeFn>,
    pub on_action: Option<ActionFn>,
    pub on_navigate: Option<NavigateFn>,
}

/// Resolves declared action ids and runs the built-in behaviors. Cheap to
/// clone; all clones share the same state store and callbacks.
#[derive(Clone)]
pub struct ActionDispatcher {
    actions: Arc<HashMap<String, ActionConfig>>,
    state: Arc<PageState>,
    callbacks: HostCallbacks,
}

impl ActionDispatcher {
    pub fn new(actions: &[ActionConfig], state: Arc<PageState>, callbacks: HostCallbacks) -> Self {
        let actions = actions
            .iter()
            .map(|action| (action.id.clone(), action.clone()))
            .collect();
        Self {
            actions: Arc::new(actions),
            state,
            callbacks,
        }
    }

    /// Cloneable handle bound to one action id.
    pub fn handler(&self, action_id: &str) -> ActionHandler {
        ActionHandler {
            dispatcher: self.clone(),
            action_id: action_id.to_string(),
        }
    }

    pub fn contains(&self, action_id: &str) -> bool {
        self.actions.contains_key(action_id)
    }

    /// Trigger an action by id. The host `on_action` hook, when present,
    /// receives every trigger, declared or not, instead of the built-in
    /// behaviors. Without it, undeclared ids are logged and dropped;
    /// nothing here ever panics or blocks.
    pub fn trigger(&self, action_id: &str, payload: Option<&Value>) {
        if let Some(on_action) = &self.callbacks.on_action {
            on_action(action_id, payload);
            return;
        }
        let Some(config) = self.actions.get(action_id) else {
            tracing::warn!(action_id = %action_id, "triggered action is not declared in the template");
            return;
        };
        match ActionKind::parse(&config.action_type) {
            Some(ActionKind::SetState) => self.run_set_state(config),
            Some(ActionKind::Navigate) => self.run_navigate(config),
            Some(ActionKind::Api) | Some(ActionKind::Reload) => {
                tracing::warn!(
                    action_id = %config.id,
                    action_type = %config.action_type,
                    "action execution is delegated to the host"
                );
            }
            Some(ActionKind::Custom) => {
                tracing::warn!(action_id = %config.id, "custom action requires a host handler");
            }
            None => {
                tracing::warn!(
                    action_id = %config.id,
                    action_type = %config.action_type,
                    "unrecognized action type"
                );
            }
        }
    }

    fn run_set_state(&self, config: &ActionConfig) {
        let Some(updates) = &config.state_updates else {
            tracing::warn!(action_id = %config.id, "setState action has no stateUpdates");
            return;
        };
        self.state.apply_updates(updates);
        if let Some(on_state_change) = &self.callbacks.on_state_change {
            on_state_change(updates);
        }
    }

    fn run_navigate(&self, config: &ActionConfig) {
        let Some(path) = &config.path else {
            tracing::warn!(action_id = %config.id, "navigate action has no path");
            return;
        };
        match &self.callbacks.on_navigate {
            Some(on_navigate) => on_navigate(path),
            None => {
                tracing::warn!(action_id = %config.id, path = %path, "no navigation callback installed")
            }
        }
    }
}

/// Handle bound to one action id, handed to widget adapters and hosts.
#[derive(Clone)]
pub struct ActionHandler {
    dispatcher: ActionDispatcher,
    action_id: String,
}

impl ActionHandler {
    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn call(&self, payload: Option<&Value>) {
        self.dispatcher.trigger(&self.action_id, payload);
    }
}
