//! Element Factory
//!
//! `create_element` is the one construction call component authors use.
//! Children arrive as a list of [`Children`] inputs, each of which may be a
//! single child, an arbitrarily nested list (the result of mapping over
//! data), or nothing at all (an `Option` that was `None`). The factory
//! flattens every level and drops the empty entries, so the descriptor's
//! child list is always flat and in source order.

use super::node::{Child, ElementKind, Node};
use super::props::Props;
use crate::render::Host;

/// Child input accepted by [`create_element`].
pub enum Children<H: Host> {
    /// Exactly one child.
    One(Child<H>),
    /// A nested list, flattened at construction.
    Many(Vec<Children<H>>),
    /// Nothing; removed at construction.
    Empty,
}

impl<H: Host> Children<H> {
    /// Append every non-empty leaf of this input to `out`, in order.
    pub fn flatten_into(self, out: &mut Vec<Child<H>>) {
        match self {
            Children::One(child) => out.push(child),
            Children::Many(list) => {
                for entry in list {
                    entry.flatten_into(out);
                }
            }
            Children::Empty => {}
        }
    }
}

impl<H: Host> From<Child<H>> for Children<H> {
    fn from(child: Child<H>) -> Self {
        Children::One(child)
    }
}

impl<H: Host> From<Node<H>> for Children<H> {
    fn from(node: Node<H>) -> Self {
        Children::One(Child::Element(node))
    }
}

impl<H: Host> From<&str> for Children<H> {
    fn from(text: &str) -> Self {
        Children::One(Child::Text(text.to_owned()))
    }
}

impl<H: Host> From<String> for Children<H> {
    fn from(text: String) -> Self {
        Children::One(Child::Text(text))
    }
}

impl<H: Host> From<&String> for Children<H> {
    fn from(text: &String) -> Self {
        Children::One(Child::Text(text.clone()))
    }
}

impl<H: Host> From<&[Child<H>]> for Children<H> {
    fn from(list: &[Child<H>]) -> Self {
        Children::Many(list.iter().cloned().map(Children::One).collect())
    }
}

impl<H: Host, T: Into<Children<H>>> From<Option<T>> for Children<H> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Children::Empty, Into::into)
    }
}

impl<H: Host, T: Into<Children<H>>> From<Vec<T>> for Children<H> {
    fn from(list: Vec<T>) -> Self {
        Children::Many(list.into_iter().map(Into::into).collect())
    }
}

// Numeric leaves are f64, so i64/u64 values beyond 2^53 round to the
// nearest representable value.
macro_rules! number_child {
    ($($ty:ty),*) => {
        $(
            impl<H: Host> From<$ty> for Children<H> {
                fn from(value: $ty) -> Self {
                    Children::One(Child::Number(value as f64))
                }
            }
        )*
    };
}

number_child!(i32, i64, u32, u64, usize, f32, f64);

/// Build a descriptor.
///
/// `props` defaults to an empty mapping. Prop keys are not validated here;
/// the binder decides what each one means when the node is materialized.
pub fn create_element<H, K, C>(kind: K, props: Option<Props<H>>, children: C) -> Node<H>
where
    H: Host,
    K: Into<ElementKind<H>>,
    C: IntoIterator<Item = Children<H>>,
{
    let mut flat = Vec::new();
    for entry in children {
        entry.flatten_into(&mut flat);
    }
    Node::new(kind.into(), props.unwrap_or_default(), flat)
}

/// Build a fragment descriptor, which groups children without a native node.
pub fn create_fragment<H, C>(props: Option<Props<H>>, children: C) -> Node<H>
where
    H: Host,
    C: IntoIterator<Item = Children<H>>,
{
    create_element(ElementKind::Fragment, props, children)
}

/// Build a child list for [`create_element`].
///
/// Every entry goes through `Children::from`, so nodes, strings, numbers,
/// `Option`s and `Vec`s can be mixed freely.
#[macro_export]
macro_rules! children {
    ($($child:expr),* $(,)?) => {
        ::std::vec![$($crate::Children::from($child)),*]
    };
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryHost;
    use crate::props;

    type Html = Node<MemoryHost>;

    fn leaf_texts(node: &Html) -> Vec<String> {
        node.children()
            .iter()
            .map(|child| match child {
                Child::Text(t) => t.clone(),
                Child::Number(n) => format!("#{n}"),
                Child::Element(e) => format!("<{}>", e.tag().unwrap_or("?")),
            })
            .collect()
    }

    #[test]
    fn nested_children_are_flattened_in_order() {
        let span: Html = create_element("span", None, children![]);
        let node: Html = create_element(
            "ul",
            None,
            children![
                "a",
                vec![vec!["b", "c"], vec![], vec!["d"]],
                span,
                Some("e"),
                None::<&str>,
                vec![Some("f"), None, Some("g")],
            ],
        );

        assert_eq!(leaf_texts(&node), ["a", "b", "c", "d", "<span>", "e", "f", "g"]);
    }

    #[test]
    fn missing_props_default_to_empty() {
        let node: Html = create_element("div", None, children![]);
        assert!(node.props().is_empty());
        assert!(node.children().is_empty());
    }

    #[test]
    fn unknown_keys_pass_through() {
        let node: Html = create_element(
            "div",
            Some(props! { "data-anything" => "x", "weird" => 1.5 }),
            children![],
        );

        assert_eq!(node.props().text("data-anything"), Some("x"));
        assert_eq!(node.props().number("weird"), Some(1.5));
    }

    #[test]
    fn numbers_stay_numeric_leaves() {
        let node: Html = create_element("p", None, children!["Count: ", 3]);
        assert_eq!(leaf_texts(&node), ["Count: ", "#3"]);
    }

    #[test]
    fn wide_integers_round_to_f64() {
        let exact = (1_i64 << 53) as f64;
        let node: Html = create_element("p", None, children![1_i64 << 53, (1_i64 << 53) + 1]);

        let values: Vec<f64> = node
            .children()
            .iter()
            .filter_map(|c| match c {
                Child::Number(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(values, [exact, exact]);
    }

    #[test]
    fn fragment_factory_sets_kind() {
        let node: Html = create_fragment(None, children!["x", "y"]);
        assert!(node.is_fragment());
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn mapped_lists_flatten() {
        let items = ["one", "two", "three"];
        let rows: Vec<Html> = items
            .iter()
            .map(|item| create_element("li", None, children![*item]))
            .collect();

        let list: Html = create_element("ul", None, children![rows]);
        assert_eq!(list.children().len(), 3);
        assert!(list
            .children()
            .iter()
            .all(|c| matches!(c, Child::Element(e) if e.tag() == Some("li"))));
    }
}
