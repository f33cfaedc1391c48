//! Type descriptors for dynamic values

use std::fmt;
use std::sync::Arc;

use super::object::ObjectType;

/// Runtime or declared type of a value
///
/// Types compare by name. `Any` is the universal assignment target and the
/// compile-time type used when nothing more specific is declared.
#[derive(Clone)]
pub enum Type {
    Any,
    Bool,
    /// Signed integral
    Int,
    /// Unsigned integral
    UInt,
    Float,
    Char,
    String,
    Enum(Arc<EnumType>),
    Sequence,
    Map,
    Object(Arc<ObjectType>),
    Json,
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::Any => "any",
            Type::Bool => "bool",
            Type::Int => "i64",
            Type::UInt => "u64",
            Type::Float => "f64",
            Type::Char => "char",
            Type::String => "string",
            Type::Enum(e) => e.name(),
            Type::Sequence => "sequence",
            Type::Map => "map",
            Type::Object(o) => o.name(),
            Type::Json => "json",
        }
    }

    /// Whether a value of this type can be used where `target` is expected
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        if matches!(target, Type::Any) || self == target {
            return true;
        }
        match (self, target) {
            (Type::Object(ty), Type::Object(_)) => {
                let mut base = ty.base();
                while let Some(current) = base {
                    if current.name() == target.name() {
                        return true;
                    }
                    base = current.base();
                }
                false
            }
            _ => false,
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Int | Type::UInt)
    }

    /// Bool, numbers and chars: types whose values are always compared by value
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Bool | Type::Int | Type::UInt | Type::Float | Type::Char
        )
    }

    pub fn as_object(&self) -> Option<&Arc<ObjectType>> {
        match self {
            Type::Object(ty) => Some(ty),
            _ => None,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other) && self.name() == other.name()
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.name())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Arc<ObjectType>> for Type {
    fn from(ty: Arc<ObjectType>) -> Self {
        Type::Object(ty)
    }
}

impl From<Arc<EnumType>> for Type {
    fn from(ty: Arc<EnumType>) -> Self {
        Type::Enum(ty)
    }
}

/// An enumeration: a name plus ordered `(member, value)` pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    members: Vec<(String, i64)>,
}

impl EnumType {
    pub fn new<N, M>(name: N, members: impl IntoIterator<Item = (M, i64)>) -> Arc<Self>
    where
        N: Into<String>,
        M: Into<String>,
    {
        Arc::new(Self {
            name: name.into(),
            members: members
                .into_iter()
                .map(|(member, value)| (member.into(), value))
                .collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[(String, i64)] {
        &self.members
    }

    pub fn is_defined(&self, value: i64) -> bool {
        self.members.iter().any(|(_, v)| *v == value)
    }

    /// First member name declared with `value`
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| name.as_str())
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| *value)
    }
}

/// A value of an enumeration; the raw value need not be a defined member
#[derive(Debug, Clone)]
pub struct EnumValue {
    ty: Arc<EnumType>,
    value: i64,
}

impl EnumValue {
    pub fn new(ty: &Arc<EnumType>, value: i64) -> Self {
        Self {
            ty: ty.clone(),
            value,
        }
    }

    /// Value of the member called `name`, if the enum declares it
    pub fn named(ty: &Arc<EnumType>, name: &str) -> Option<Self> {
        ty.value_of(name).map(|value| Self::new(ty, value))
    }

    pub fn enum_type(&self) -> &Arc<EnumType> {
        &self.ty
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn name(&self) -> Option<&str> {
        self.ty.name_of(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> Arc<EnumType> {
        EnumType::new("Color", [("Red", 1), ("Green", 2)])
    }

    #[test]
    fn test_enum_lookup() {
        let ty = color();
        assert!(ty.is_defined(2));
        assert!(!ty.is_defined(3));
        assert_eq!(ty.name_of(1), Some("Red"));
        assert_eq!(ty.value_of("Green"), Some(2));
        assert_eq!(EnumValue::new(&ty, 9).name(), None);
    }

    #[test]
    fn test_types_compare_by_name() {
        assert_eq!(Type::Enum(color()), Type::Enum(color()));
        assert_ne!(Type::Int, Type::UInt);
        assert_ne!(Type::String, Type::Enum(EnumType::new("string", [("A", 0)])));
    }

    #[test]
    fn test_any_is_universal_target() {
        assert!(Type::Int.is_assignable_to(&Type::Any));
        assert!(!Type::Int.is_assignable_to(&Type::Float));
        assert!(Type::Int.is_integral());
        assert!(!Type::Float.is_integral());
    }
}
