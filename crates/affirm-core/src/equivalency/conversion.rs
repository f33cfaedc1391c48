//! Automatic value conversion
//!
//! When enabled for a node, the subject is converted to the expectation's
//! runtime type before the remaining steps run, so that `"5"` can be
//! equivalent to `5`. Conversion is best effort: a failure leaves the subject
//! untouched.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::comparands::Comparands;
use super::node::Node;
use super::object_info::ObjectInfo;
use super::ordering::ObjectPredicate;
use crate::value::{EnumValue, Type, Value};

/// Why a conversion did not apply
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("{value} is not in a valid format for {target}")]
    Format { value: String, target: String },

    #[error("cannot convert a {from} to {to}")]
    InvalidCast { from: String, to: String },

    #[error("{value} is out of range for {target}")]
    Overflow { value: String, target: String },

    #[error("{value} is not a defined value of enum {enum_name}")]
    UndefinedEnumValue { value: i64, enum_name: String },
}

#[derive(Clone)]
struct ConversionPredicate {
    description: String,
    predicate: ObjectPredicate,
}

/// Which nodes get their subject converted
#[derive(Clone, Default)]
pub struct ConversionSelector {
    inclusions: Vec<ConversionPredicate>,
    exclusions: Vec<ConversionPredicate>,
}

impl ConversionSelector {
    pub fn include_all(&mut self) {
        self.include("everything", |_| true);
    }

    pub fn include<F>(&mut self, description: impl Into<String>, predicate: F)
    where
        F: Fn(&ObjectInfo) -> bool + Send + Sync + 'static,
    {
        self.inclusions.push(ConversionPredicate {
            description: description.into(),
            predicate: Arc::new(predicate),
        });
    }

    pub fn exclude<F>(&mut self, description: impl Into<String>, predicate: F)
    where
        F: Fn(&ObjectInfo) -> bool + Send + Sync + 'static,
    {
        self.exclusions.push(ConversionPredicate {
            description: description.into(),
            predicate: Arc::new(predicate),
        });
    }

    /// Some inclusion and no exclusion matches the node
    pub fn requires_conversion(&self, comparands: &Comparands, node: &Node) -> bool {
        if self.inclusions.is_empty() {
            return false;
        }
        let info = ObjectInfo::new(node, comparands);
        self.inclusions.iter().any(|p| (p.predicate)(&info))
            && !self.exclusions.iter().any(|p| (p.predicate)(&info))
    }
}

impl fmt::Display for ConversionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inclusions.is_empty() {
            return f.write_str("- Without automatic conversion");
        }
        let mut first = true;
        for (prefix, predicates) in [
            ("Try conversion of", &self.inclusions),
            ("Do not convert", &self.exclusions),
        ] {
            for p in predicates {
                if !first {
                    f.write_str("\n")?;
                }
                first = false;
                write!(f, "- {} {}", prefix, p.description)?;
            }
        }
        Ok(())
    }
}

/// Convert `value` to `target`
///
/// Enum targets accept integral values that name a defined member. Other
/// targets use a locale-independent conversion.
///
/// # Errors
///
/// Returns the reason the conversion does not apply.
pub fn convert(value: &Value, target: &Type) -> Result<Value, ConversionError> {
    let invalid_cast = || ConversionError::InvalidCast {
        from: value
            .runtime_type()
            .map_or_else(|| "null".to_string(), |t| t.name().to_string()),
        to: target.name().to_string(),
    };
    let format_error = |text: &str| ConversionError::Format {
        value: text.to_string(),
        target: target.name().to_string(),
    };
    let overflow = |text: String| ConversionError::Overflow {
        value: text,
        target: target.name().to_string(),
    };

    match target {
        Type::Enum(enum_type) => {
            let raw = match value {
                Value::Int(i) => *i,
                Value::UInt(u) => i64::try_from(*u).map_err(|_| overflow(u.to_string()))?,
                _ => return Err(invalid_cast()),
            };
            if enum_type.is_defined(raw) {
                Ok(Value::Enum(EnumValue::new(enum_type, raw)))
            } else {
                Err(ConversionError::UndefinedEnumValue {
                    value: raw,
                    enum_name: enum_type.name().to_string(),
                })
            }
        }
        Type::Int => match value {
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::UInt(u) => i64::try_from(*u)
                .map(Value::Int)
                .map_err(|_| overflow(u.to_string())),
            Value::Float(x) => float_to_integral(*x, i64::MIN as f64, i64::MAX as f64)
                .map(|x| Value::Int(x as i64))
                .ok_or_else(|| overflow(x.to_string())),
            Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
            Value::Char(c) => Ok(Value::Int(i64::from(u32::from(*c)))),
            Value::Enum(e) => Ok(Value::Int(e.value())),
            Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| format_error(s.as_str())),
            _ => Err(invalid_cast()),
        },
        Type::UInt => match value {
            Value::UInt(u) => Ok(Value::UInt(*u)),
            Value::Int(i) => u64::try_from(*i)
                .map(Value::UInt)
                .map_err(|_| overflow(i.to_string())),
            Value::Float(x) => float_to_integral(*x, 0.0, u64::MAX as f64)
                .map(|x| Value::UInt(x as u64))
                .ok_or_else(|| overflow(x.to_string())),
            Value::Bool(b) => Ok(Value::UInt(u64::from(*b))),
            Value::Char(c) => Ok(Value::UInt(u64::from(u32::from(*c)))),
            Value::Enum(e) => u64::try_from(e.value())
                .map(Value::UInt)
                .map_err(|_| overflow(e.value().to_string())),
            Value::Str(s) => s.trim().parse::<u64>().map(Value::UInt).map_err(|_| format_error(s.as_str())),
            _ => Err(invalid_cast()),
        },
        Type::Float => match value {
            Value::Float(x) => Ok(Value::Float(*x)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            Value::UInt(u) => Ok(Value::Float(*u as f64)),
            Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| format_error(s.as_str())),
            _ => Err(invalid_cast()),
        },
        Type::Bool => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Int(i) => Ok(Value::Bool(*i != 0)),
            Value::UInt(u) => Ok(Value::Bool(*u != 0)),
            Value::Float(x) => Ok(Value::Bool(*x != 0.0)),
            Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(format_error(s.as_str())),
            },
            _ => Err(invalid_cast()),
        },
        Type::Char => match value {
            Value::Char(c) => Ok(Value::Char(*c)),
            Value::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(format_error(s.as_str())),
                }
            }
            Value::Int(i) => u32::try_from(*i)
                .ok()
                .and_then(char::from_u32)
                .map(Value::Char)
                .ok_or_else(|| overflow(i.to_string())),
            Value::UInt(u) => u32::try_from(*u)
                .ok()
                .and_then(char::from_u32)
                .map(Value::Char)
                .ok_or_else(|| overflow(u.to_string())),
            _ => Err(invalid_cast()),
        },
        Type::String => match value {
            Value::Str(s) => Ok(Value::Str(s.clone())),
            Value::Bool(b) => Ok(Value::Str(b.to_string())),
            Value::Int(i) => Ok(Value::Str(i.to_string())),
            Value::UInt(u) => Ok(Value::Str(u.to_string())),
            Value::Float(x) => Ok(Value::Str(x.to_string())),
            Value::Char(c) => Ok(Value::Str(c.to_string())),
            Value::Enum(e) => e
                .name()
                .map(|n| Value::Str(n.to_string()))
                .ok_or_else(invalid_cast),
            _ => Err(invalid_cast()),
        },
        Type::Any | Type::Sequence | Type::Map | Type::Object(_) | Type::Json => Err(invalid_cast()),
    }
}

/// Rounded value when `x` is finite and within `[min, end)`
///
/// `i64::MAX as f64` and `u64::MAX as f64` round up to 2^63 and 2^64, so
/// callers pass them as the exclusive `end`.
fn float_to_integral(x: f64, min: f64, end: f64) -> Option<f64> {
    let rounded = x.round();
    (x.is_finite() && rounded >= min && rounded < end).then_some(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::EnumType;

    #[test]
    fn test_integral_to_defined_enum_member() {
        let e = EnumType::new("E", [("A", 5)]);
        let converted = convert(&Value::Int(5), &Type::Enum(e.clone())).unwrap();
        assert_eq!(converted, Value::from((&e, 5)));
    }

    #[test]
    fn test_undefined_enum_value_fails() {
        let e = EnumType::new("E", [("A", 1), ("B", 2)]);
        assert_eq!(
            convert(&Value::Int(5), &Type::Enum(e)),
            Err(ConversionError::UndefinedEnumValue {
                value: 5,
                enum_name: "E".to_string()
            })
        );
    }

    #[test]
    fn test_enum_requires_integral_subject() {
        let e = EnumType::new("E", [("A", 1)]);
        assert!(matches!(
            convert(&Value::from("A"), &Type::Enum(e)),
            Err(ConversionError::InvalidCast { .. })
        ));
    }

    #[test]
    fn test_string_parsing_is_locale_independent() {
        assert_eq!(convert(&"42".into(), &Type::Int), Ok(Value::Int(42)));
        assert_eq!(convert(&"1.5".into(), &Type::Float), Ok(Value::Float(1.5)));
        assert!(matches!(
            convert(&"1,5".into(), &Type::Float),
            Err(ConversionError::Format { .. })
        ));
        assert_eq!(convert(&"TRUE".into(), &Type::Bool), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_range_checks() {
        assert!(matches!(
            convert(&Value::Int(-1), &Type::UInt),
            Err(ConversionError::Overflow { .. })
        ));
        assert!(matches!(
            convert(&Value::UInt(u64::MAX), &Type::Int),
            Err(ConversionError::Overflow { .. })
        ));
        assert_eq!(convert(&Value::Float(2.6), &Type::Int), Ok(Value::Int(3)));
    }

    #[test]
    fn test_float_at_the_integral_upper_bound_overflows() {
        assert!(matches!(
            convert(&Value::Float(9.223_372_036_854_775_808e18), &Type::Int),
            Err(ConversionError::Overflow { .. })
        ));
        assert!(matches!(
            convert(&Value::Float(18_446_744_073_709_551_616.0), &Type::UInt),
            Err(ConversionError::Overflow { .. })
        ));
        assert_eq!(
            convert(&Value::Float(-9.223_372_036_854_775_808e18), &Type::Int),
            Ok(Value::Int(i64::MIN))
        );
        assert_eq!(
            convert(&Value::Float(9.223_372_036_854_774_784e18), &Type::Int),
            Ok(Value::Int(9_223_372_036_854_774_784))
        );
    }

    #[test]
    fn test_structured_targets_are_invalid_casts() {
        assert!(matches!(
            convert(&Value::Int(1), &Type::Sequence),
            Err(ConversionError::InvalidCast { .. })
        ));
    }
}
