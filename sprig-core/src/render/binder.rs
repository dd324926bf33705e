//! Attribute & Event Binder
//!
//! Applies a prop mapping to one freshly created native node. The binder
//! never fails: values without a string form are skipped, everything else
//! is coerced to text.
//!
//! # Rules
//!
//! Evaluated per key, first match wins:
//!
//! | key / value              | effect                                     |
//! |--------------------------|--------------------------------------------|
//! | `children`               | ignored                                    |
//! | `className`              | written as `class`                         |
//! | `style`, mapping         | kebab-cased `key:value` pairs joined by `;` |
//! | `style`, anything else   | written verbatim                           |
//! | `ref`, callback          | ignored (the materializer calls it)        |
//! | `on*`, handler           | listener for the lowercased remainder      |
//! | boolean                  | `true` sets `""`, `false` removes          |
//! | anything else            | stringified                                |

use std::borrow::Cow;

use crate::element::{PropValue, Props, Style};
use crate::render::Host;

const EVENT_PREFIX: &str = "on";

/// Apply `props` to `node`.
pub fn apply_props<H: Host>(host: &H, node: &H::Node, props: &Props<H>) {
    for (key, value) in props.iter() {
        apply_prop(host, node, key, value);
    }
}

fn apply_prop<H: Host>(host: &H, node: &H::Node, key: &str, value: &PropValue<H>) {
    match (key, value) {
        ("children", _) => {}
        ("className", value) => write_text(host, node, "class", key, value),
        ("style", PropValue::Style(style)) => {
            host.set_attribute(node, "style", &serialize_style(style));
        }
        ("style", value) => write_text(host, node, "style", key, value),
        ("ref", PropValue::Ref(_)) => {}
        (key, PropValue::Handler(handler)) if key.starts_with(EVENT_PREFIX) => {
            let event = key[EVENT_PREFIX.len()..].to_lowercase();
            host.set_handler_property(node, key, handler.clone());
            host.add_event_listener(node, &event, handler.clone());
        }
        (key, PropValue::Bool(true)) => host.set_attribute(node, key, ""),
        (key, PropValue::Bool(false)) => host.remove_attribute(node, key),
        (key, value) => write_text(host, node, key, key, value),
    }
}

fn write_text<H: Host>(host: &H, node: &H::Node, attribute: &str, key: &str, value: &PropValue<H>) {
    match attribute_text(value) {
        Some(text) => host.set_attribute(node, attribute, &text),
        None => tracing::trace!(key, value = ?value, "prop has no attribute form; skipped"),
    }
}

/// String form of a prop value, if it has one.
pub(crate) fn attribute_text<H: Host>(value: &PropValue<H>) -> Option<Cow<'_, str>> {
    match value {
        PropValue::Text(s) => Some(Cow::Borrowed(s)),
        PropValue::Number(n) => Some(Cow::Owned(format_number(*n))),
        PropValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        PropValue::Style(style) => Some(Cow::Owned(serialize_style(style))),
        PropValue::Handler(_) | PropValue::Ref(_) | PropValue::Data(_) | PropValue::Children(_) => {
            None
        }
    }
}

/// Serialize a style mapping as `kebab-key:value` pairs joined by `;`.
pub fn serialize_style(style: &Style) -> String {
    style
        .iter()
        .map(|(property, value)| format!("{}:{}", kebab_case(property), value))
        .collect::<Vec<_>>()
        .join(";")
}

/// Convert a camelCase property name to kebab-case.
///
/// Every uppercase letter becomes a hyphen followed by its lowercase form,
/// so a leading capital yields a leading hyphen (`WebkitBox` → `-webkit-box`).
pub fn kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_uppercase() {
            out.push('-');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Format a number the way a browser stringifies it.
///
/// Integral values print without a fractional part; non-finite values use
/// the `NaN` / `Infinity` spellings. Magnitudes of `1e21` and above, or
/// below `1e-6`, switch to exponent form (`1e+21`, `1e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_owned()
    } else if n == 0.0 {
        // -0 prints as 0
        "0".to_owned()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        exponent_form(n)
    } else {
        n.to_string()
    }
}

fn exponent_form(n: f64) -> String {
    let text = format!("{n:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
