//! Prop Values
//!
//! Props are the string-keyed mapping attached to every descriptor. The
//! binder interprets a handful of keys (`className`, `style`, `ref`, `on*`)
//! and stringifies the rest; components read whatever keys they like.
//!
//! Values are a closed enum rather than an open `dyn Any` so the binder can
//! decide, per value, whether it has a string form. Application data that
//! has no attribute meaning rides along as [`PropValue::Data`].

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::node::Child;
use crate::error::CallbackError;
use crate::render::Host;

/// A native event listener.
///
/// Cloning is cheap; clones share the same closure.
pub struct EventHandler<E> {
    callback: Rc<dyn Fn(&E)>,
}

impl<E> EventHandler<E> {
    /// Wrap a closure as an event handler.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&E) + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invoke the handler with an event.
    pub fn call(&self, event: &E) {
        (self.callback)(event);
    }

    /// Whether two handlers share the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<E> Clone for EventHandler<E> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<E> fmt::Debug for EventHandler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("ptr", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// A reference callback, invoked once with the finished native node.
pub struct NodeRef<N> {
    callback: Rc<dyn Fn(&N) -> Result<(), CallbackError>>,
}

impl<N> NodeRef<N> {
    /// Wrap a fallible callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&N) -> Result<(), CallbackError> + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invoke the callback.
    pub fn call(&self, node: &N) -> Result<(), CallbackError> {
        (self.callback)(node)
    }
}

impl<N> Clone for NodeRef<N> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<N> fmt::Debug for NodeRef<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("ptr", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Inline style declarations, kept in insertion order.
///
/// Property names are written in camelCase (`backgroundColor`); the binder
/// converts them to kebab-case when it serializes the attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    declarations: IndexMap<String, String>,
}

impl Style {
    /// Create an empty style mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, builder style.
    pub fn set(mut self, property: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(property, value);
        self
    }

    /// Add or replace a declaration.
    pub fn insert(&mut self, property: impl Into<String>, value: impl fmt::Display) {
        self.declarations.insert(property.into(), value.to_string());
    }

    /// Iterate declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Style
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Style::new();
        for (property, value) in iter {
            style.insert(property, value);
        }
        style
    }
}

/// The value stored under one prop key.
pub enum PropValue<H: Host> {
    /// Plain text.
    Text(String),
    /// A number, stringified the way a browser would.
    Number(f64),
    /// Presence flag; `false` removes the attribute.
    Bool(bool),
    /// Structured inline style.
    Style(Style),
    /// Event listener, bound when the key starts with `on`.
    Handler(EventHandler<H::Event>),
    /// Reference callback, consumed under the `ref` key.
    Ref(NodeRef<H::Node>),
    /// Opaque application data for components. Never written to the host.
    Data(Rc<dyn Any>),
    /// Children forwarded to a component under the `children` key.
    Children(Vec<Child<H>>),
}

impl<H: Host> PropValue<H> {
    /// Wrap arbitrary application data.
    pub fn data<T: 'static>(value: T) -> Self {
        PropValue::Data(Rc::new(value))
    }

    fn variant_name(&self) -> &'static str {
        match self {
            PropValue::Text(_) => "Text",
            PropValue::Number(_) => "Number",
            PropValue::Bool(_) => "Bool",
            PropValue::Style(_) => "Style",
            PropValue::Handler(_) => "Handler",
            PropValue::Ref(_) => "Ref",
            PropValue::Data(_) => "Data",
            PropValue::Children(_) => "Children",
        }
    }
}

impl<H: Host> Clone for PropValue<H> {
    fn clone(&self) -> Self {
        match self {
            PropValue::Text(s) => PropValue::Text(s.clone()),
            PropValue::Number(n) => PropValue::Number(*n),
            PropValue::Bool(b) => PropValue::Bool(*b),
            PropValue::Style(s) => PropValue::Style(s.clone()),
            PropValue::Handler(h) => PropValue::Handler(h.clone()),
            PropValue::Ref(r) => PropValue::Ref(r.clone()),
            PropValue::Data(d) => PropValue::Data(Rc::clone(d)),
            PropValue::Children(c) => PropValue::Children(c.clone()),
        }
    }
}

impl<H: Host> fmt::Debug for PropValue<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            PropValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            PropValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            PropValue::Style(s) => f.debug_tuple("Style").field(s).finish(),
            PropValue::Children(c) => f.debug_tuple("Children").field(&c.len()).finish(),
            other => f.write_str(other.variant_name()),
        }
    }
}

impl<H: Host> From<&str> for PropValue<H> {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_owned())
    }
}

impl<H: Host> From<String> for PropValue<H> {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl<H: Host> From<bool> for PropValue<H> {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl<H: Host> From<Style> for PropValue<H> {
    fn from(value: Style) -> Self {
        PropValue::Style(value)
    }
}

// Same f64 storage as numeric children: i64/u64 above 2^53 lose precision.
macro_rules! number_prop {
    ($($ty:ty),*) => {
        $(
            impl<H: Host> From<$ty> for PropValue<H> {
                fn from(value: $ty) -> Self {
                    PropValue::Number(value as f64)
                }
            }
        )*
    };
}

number_prop!(i32, i64, u32, u64, usize, f32, f64);

/// Build an event handler prop.
pub fn on<H, F>(handler: F) -> PropValue<H>
where
    H: Host,
    F: Fn(&H::Event) + 'static,
{
    PropValue::Handler(EventHandler::new(handler))
}

/// Build an infallible reference callback prop.
pub fn node_ref<H, F>(callback: F) -> PropValue<H>
where
    H: Host,
    F: Fn(&H::Node) + 'static,
{
    PropValue::Ref(NodeRef::new(move |node| {
        callback(node);
        Ok(())
    }))
}

/// Build a fallible reference callback prop. Errors are logged, not raised.
pub fn try_node_ref<H, F>(callback: F) -> PropValue<H>
where
    H: Host,
    F: Fn(&H::Node) -> Result<(), CallbackError> + 'static,
{
    PropValue::Ref(NodeRef::new(callback))
}

/// The prop mapping of one descriptor.
pub struct Props<H: Host> {
    entries: IndexMap<String, PropValue<H>>,
}

impl<H: Host> Props<H> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropValue<H>>,
    ) -> Option<PropValue<H>> {
        self.entries.insert(key.into(), value.into())
    }

    /// Insert a value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue<H>>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropValue<H>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue<H>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Text value under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(PropValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Numeric value under `key`.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.entries.get(key) {
            Some(PropValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value under `key`.
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(PropValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Event handler under `key`.
    pub fn handler(&self, key: &str) -> Option<&EventHandler<H::Event>> {
        match self.entries.get(key) {
            Some(PropValue::Handler(h)) => Some(h),
            _ => None,
        }
    }

    /// Reference callback under `ref`, if it is one.
    pub fn node_ref(&self) -> Option<&NodeRef<H::Node>> {
        match self.entries.get("ref") {
            Some(PropValue::Ref(r)) => Some(r),
            _ => None,
        }
    }

    /// Application data under `key`, downcast to `T`.
    pub fn data<T: 'static>(&self, key: &str) -> Option<&T> {
        match self.entries.get(key) {
            Some(PropValue::Data(d)) => d.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Children forwarded by the materializer. Empty outside components.
    pub fn children(&self) -> &[Child<H>] {
        match self.entries.get("children") {
            Some(PropValue::Children(c)) => c,
            _ => &[],
        }
    }

    /// Copy of these props with `children` set, as handed to a component.
    pub(crate) fn with_children(&self, children: &[Child<H>]) -> Self {
        let mut props = self.clone();
        props.insert("children", PropValue::Children(children.to_vec()));
        props
    }
}

impl<H: Host> Default for Props<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> Clone for Props<H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<H: Host> fmt::Debug for Props<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Build a [`Props`] mapping.
///
/// ```rust
/// use sprig_core::{props, dom::MemoryHost, Props};
///
/// let props: Props<MemoryHost> = props! { "className" => "card", "tabindex" => 0 };
/// assert_eq!(props.text("className"), Some("card"));
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::Props::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::Props::new();
        $( props.insert($key, $value); )+
        props
    }};
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomEvent, MemoryHost};
    use std::cell::Cell;

    #[test]
    fn typed_accessors() {
        let props: Props<MemoryHost> = props! {
            "label" => "Save",
            "count" => 3,
            "disabled" => true,
        };

        assert_eq!(props.text("label"), Some("Save"));
        assert_eq!(props.number("count"), Some(3.0));
        assert_eq!(props.bool("disabled"), Some(true));
        assert_eq!(props.text("count"), None);
        assert!(props.children().is_empty());
    }

    #[test]
    fn data_downcasts_to_original_type() {
        #[derive(Debug, PartialEq)]
        struct Todo {
            id: u32,
        }

        let props: Props<MemoryHost> = Props::new().with("todo", PropValue::data(Todo { id: 7 }));

        assert_eq!(props.data::<Todo>("todo"), Some(&Todo { id: 7 }));
        assert!(props.data::<String>("todo").is_none());
    }

    #[test]
    fn handler_clones_share_closure() {
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let handler: EventHandler<DomEvent> = EventHandler::new(move |_| {
            hits_clone.set(hits_clone.get() + 1);
        });

        let copy = handler.clone();
        assert!(copy.ptr_eq(&handler));

        let host = MemoryHost::new();
        let target = crate::render::Host::create_element(&host, "button");
        copy.call(&DomEvent::new("click", target));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn insert_replaces_previous_value() {
        let mut props: Props<MemoryHost> = Props::new();
        assert!(props.insert("title", "a").is_none());
        let old = props.insert("title", "b");

        assert!(matches!(old, Some(PropValue::Text(ref s)) if s == "a"));
        assert_eq!(props.len(), 1);
        assert_eq!(props.text("title"), Some("b"));
    }

    #[test]
    fn style_keeps_insertion_order() {
        let style = Style::new().set("fontSize", "2px").set("color", "red");
        let keys: Vec<_> = style.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["fontSize", "color"]);

        let collected: Style = [("margin", 0)].into_iter().collect();
        assert_eq!(collected.iter().next(), Some(("margin", "0")));
    }
}
