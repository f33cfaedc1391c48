//! Formatter registry
//!
//! Renders values for failure messages and owns the process-wide formatting
//! defaults, including the visible string length used by the mismatch
//! renderer.

use std::fmt::Write;
use std::rc::Rc;
use std::sync::{OnceLock, RwLock};

use crate::value::{Object, Value};

/// Formatting defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingOptions {
    /// Nesting depth beyond which object graphs are elided
    pub max_depth: usize,
    /// Visible length of string excerpts in mismatch renderings
    pub string_printing_length: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            max_depth: 5,
            string_printing_length: 50,
        }
    }
}

impl FormattingOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_string_printing_length(mut self, length: usize) -> Self {
        self.string_printing_length = length;
        self
    }
}

fn defaults() -> &'static RwLock<FormattingOptions> {
    static DEFAULTS: OnceLock<RwLock<FormattingOptions>> = OnceLock::new();
    DEFAULTS.get_or_init(|| RwLock::new(FormattingOptions::default()))
}

/// Change the process-wide formatting defaults
///
/// Intended to run once before any assertion executes.
pub fn configure(f: impl FnOnce(&mut FormattingOptions)) {
    let mut guard = defaults().write().unwrap_or_else(|p| p.into_inner());
    f(&mut guard);
}

/// Snapshot of the process-wide formatting defaults
pub fn current() -> FormattingOptions {
    defaults()
        .read()
        .unwrap_or_else(|p| p.into_inner())
        .clone()
}

/// Format a value for embedding in a failure message
pub fn format_value(value: &Value, options: &FormattingOptions) -> String {
    let mut out = String::new();
    let mut ancestors = Vec::new();
    write_value(&mut out, value, options, 0, &mut ancestors);
    out
}

fn write_value(
    out: &mut String,
    value: &Value,
    options: &FormattingOptions,
    depth: usize,
    ancestors: &mut Vec<*const Object>,
) {
    match value {
        Value::Null => out.push_str("<null>"),
        Value::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        Value::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::UInt(u) => {
            let _ = write!(out, "{}u", u);
        }
        Value::Float(x) => {
            let _ = write!(out, "{:?}", x);
        }
        Value::Char(c) => {
            let _ = write!(out, "'{}'", c);
        }
        Value::Str(s) => {
            let _ = write!(out, "\"{}\"", s);
        }
        Value::Enum(e) => {
            let ty = e.enum_type().name();
            let _ = match e.name() {
                Some(name) => write!(out, "{}.{} {{value: {}}}", ty, name, e.value()),
                None => write!(out, "{} {{value: {}}}", ty, e.value()),
            };
        }
        Value::Json(json) => out.push_str(&json.to_string()),
        Value::Seq(items) => {
            if items.is_empty() {
                out.push_str("{empty}");
                return;
            }
            if depth >= options.max_depth {
                out.push_str("{…}");
                return;
            }
            out.push('{');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, options, depth + 1, ancestors);
            }
            out.push('}');
        }
        Value::Map(entries) => {
            if entries.is_empty() {
                out.push_str("{empty}");
                return;
            }
            if depth >= options.max_depth {
                out.push_str("{…}");
                return;
            }
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('[');
                write_value(out, key, options, depth + 1, ancestors);
                out.push_str("] = ");
                write_value(out, item, options, depth + 1, ancestors);
            }
            out.push('}');
        }
        Value::Object(object) => {
            let ty = object.object_type();
            let id = Rc::as_ptr(object);
            if ancestors.contains(&id) {
                let _ = write!(out, "{{Cyclic reference to type {} detected}}", ty.name());
                return;
            }
            if depth >= options.max_depth {
                let _ = write!(out, "{} {{Maximum recursion depth was reached…}}", ty.name());
                return;
            }
            let members: Vec<_> = ty
                .members()
                .iter()
                .filter(|m| m.visibility().is_visible(false) && !m.is_indexer())
                .collect();
            if members.is_empty() {
                out.push_str(ty.name());
                return;
            }
            ancestors.push(id);
            let _ = write!(out, "{} {{ ", ty.name());
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{} = ", member.name());
                write_value(out, &object.read(member), options, depth + 1, ancestors);
            }
            out.push_str(" }");
            ancestors.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{EnumType, ObjectType, Type};

    fn fmt(value: impl Into<Value>) -> String {
        format_value(&value.into(), &FormattingOptions::default())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(fmt(Value::Null), "<null>");
        assert_eq!(fmt("abc"), "\"abc\"");
        assert_eq!(fmt(5), "5");
        assert_eq!(fmt(5u32), "5u");
        assert_eq!(fmt(2.0), "2.0");
        assert_eq!(fmt('x'), "'x'");
    }

    #[test]
    fn test_enums() {
        let e = EnumType::new("E", [("A", 5)]);
        assert_eq!(fmt((&e, 5)), "E.A {value: 5}");
        assert_eq!(fmt((&e, 7)), "E {value: 7}");
    }

    #[test]
    fn test_collections() {
        assert_eq!(fmt(vec![1, 2]), "{1, 2}");
        assert_eq!(fmt(Vec::<i32>::new()), "{empty}");
        assert_eq!(fmt(Value::map([("a", 1)])), "{[\"a\"] = 1}");
    }

    #[test]
    fn test_objects_and_cycles() {
        let ty = ObjectType::builder("Node")
            .property("A", Type::Int)
            .property("Next", Type::Any)
            .build();
        let node = Object::with_values(&ty, [("A", 1)]).unwrap();
        assert_eq!(fmt(&node), "Node { A = 1, Next = <null> }");

        node.set("Next", node.clone()).unwrap();
        assert_eq!(
            fmt(&node),
            "Node { A = 1, Next = {Cyclic reference to type Node detected} }"
        );
    }

    #[test]
    fn test_depth_limit() {
        let options = FormattingOptions::default().with_max_depth(1);
        let nested = Value::from(vec![vec![1]]);
        assert_eq!(format_value(&nested, &options), "{{…}}");
    }
}
