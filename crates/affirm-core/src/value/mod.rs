//! Dynamic object model
//!
//! The equivalency engine compares values through this model instead of
//! reflection. Member definitions are resolved once when an `ObjectType` is
//! built and cached by name, so per-instance lookups never walk the base
//! chain again.

pub mod member;
pub mod object;
pub mod types;
#[allow(clippy::module_inception)]
pub mod value;

pub use member::{Getter, MemberDef, MemberKind, MemberSource, MemberSpec, Visibility};
pub use object::{EqualityFn, Object, ObjectRef, ObjectType, ObjectTypeBuilder};
pub use types::{EnumType, EnumValue, Type};
pub use value::Value;
