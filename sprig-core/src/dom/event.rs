use super::node::DomNode;

/// An event delivered to in-memory listeners.
#[derive(Debug, Clone)]
pub struct DomEvent {
    kind: String,
    target: DomNode,
    value: Option<String>,
}

impl DomEvent {
    pub fn new(kind: impl Into<String>, target: DomNode) -> Self {
        Self {
            kind: kind.into(),
            target,
            value: None,
        }
    }

    /// Attach the current value of an input-like target.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Event name, such as `click`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The node the event was dispatched at.
    pub fn target(&self) -> &DomNode {
        &self.target
    }

    /// The target's value, for `input` and `change` events.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
