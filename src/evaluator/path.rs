use serde_json::{Map, Value};
use thiserror::Error;

/// Raised by the strict walker when a dotted path steps through a value
/// that cannot be stepped into (an undefined intermediate or `null`).
#[derive(Debug, Clone, Error, PartialEq)]
#[error("cannot read \"{segment}\" in path \"{path}\"")]
pub struct PathError {
    pub path: String,
    pub segment: String,
}

impl PathError {
    fn new(path: &str, segment: &str) -> Self {
        Self {
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }
}

/// Lookup scope for one render pass: a base object (state merged with
/// request data) plus a stack of named overlays for loop variables and
/// fragment props. Later overlays shadow earlier ones, and every overlay
/// shadows the base.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    base: &'a Map<String, Value>,
    overlays: Vec<(String, Value)>,
}

impl<'a> Scope<'a> {
    pub fn new(base: &'a Map<String, Value>) -> Self {
        Self {
            base,
            overlays: Vec::new(),
        }
    }

    /// Push a named variable for the duration of a subtree walk.
    pub fn push_var(&mut self, name: impl Into<String>, value: Value) {
        self.overlays.push((name.into(), value));
    }

    /// Pop the most recent variable. Pushes and pops must pair up around
    /// each subtree.
    pub fn pop_var(&mut self) {
        self.overlays.pop();
    }

    fn lookup_root(&self, segment: &str) -> Option<&Value> {
        for (name, value) in self.overlays.iter().rev() {
            if name == segment {
                return Some(value);
            }
        }
        self.base.get(segment)
    }

    /// Lenient dotted-path resolution, used by prop bindings. Any miss
    /// along the way, including stepping into a scalar, yields `None`.
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.lookup_root(segments.next()?)?;
        for segment in segments {
            current = step(current, segment)?;
        }
        Some(current)
    }

    /// Strict dotted-path resolution, used by condition expressions.
    /// Mirrors property access in a dynamic language: reading a key off
    /// an undefined intermediate or off `null` is an error, reading a
    /// key off a scalar yields undefined, and a missing final key is
    /// undefined rather than an error.
    pub fn resolve_strict(&self, path: &str) -> Result<Option<&Value>, PathError> {
        let mut current: Option<&Value> = None;
        for (i, segment) in path.split('.').enumerate() {
            current = if i == 0 {
                self.lookup_root(segment)
            } else {
                match current {
                    None => return Err(PathError::new(path, segment)),
                    Some(Value::Null) => return Err(PathError::new(path, segment)),
                    Some(container) => step(container, segment),
                }
            };
        }
        Ok(current)
    }
}

/// One step of a path walk. Objects step by key, arrays step by numeric
/// index, everything else dead-ends.
fn step<'v>(current: &'v Value, segment: &str) -> Option<&'v Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
