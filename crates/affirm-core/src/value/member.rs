//! Member definitions
//!
//! A member is a named, typed, readable slot on an object type. It is either
//! backed by storage or computed from the rest of the object.

use std::fmt;
use std::sync::Arc;

use super::object::Object;
use super::types::Type;
use super::value::Value;

/// Computed member getter
pub type Getter = Arc<dyn Fn(&Object) -> Value + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Field => f.write_str("field"),
            MemberKind::Property => f.write_str("property"),
        }
    }
}

/// Getter visibility of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Internal,
    Private,
}

impl Visibility {
    /// Public members are always visible, internal ones only on request
    pub fn is_visible(&self, include_internal: bool) -> bool {
        match self {
            Visibility::Public => true,
            Visibility::Internal => include_internal,
            Visibility::Private => false,
        }
    }
}

#[derive(Clone)]
pub enum MemberSource {
    Slot(usize),
    Computed(Getter),
}

impl fmt::Debug for MemberSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberSource::Slot(index) => write!(f, "Slot({})", index),
            MemberSource::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// A resolved member of an object type
#[derive(Debug, Clone)]
pub struct MemberDef {
    pub(crate) name: String,
    pub(crate) kind: MemberKind,
    pub(crate) declared_type: Type,
    pub(crate) declaring_type: String,
    pub(crate) visibility: Visibility,
    pub(crate) browsable: bool,
    pub(crate) indexer: bool,
    pub(crate) source: MemberSource,
}

impl MemberDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn declared_type(&self) -> &Type {
        &self.declared_type
    }

    /// Name of the type that declared this member
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_browsable(&self) -> bool {
        self.browsable
    }

    pub fn is_indexer(&self) -> bool {
        self.indexer
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.source, MemberSource::Computed(_))
    }

    pub fn source(&self) -> &MemberSource {
        &self.source
    }

    /// Identity used to de-duplicate selected members
    pub fn is_same_member(&self, other: &MemberDef) -> bool {
        self.declaring_type == other.declaring_type
            && self.kind == other.kind
            && self.name == other.name
    }
}

/// Declaration of a member, consumed by `ObjectTypeBuilder`
#[derive(Clone)]
pub struct MemberSpec {
    pub(crate) name: String,
    pub(crate) kind: MemberKind,
    pub(crate) declared_type: Type,
    pub(crate) visibility: Visibility,
    pub(crate) browsable: bool,
    pub(crate) indexer: bool,
    pub(crate) getter: Option<Getter>,
}

impl MemberSpec {
    pub fn property(name: impl Into<String>, declared_type: Type) -> Self {
        Self::new(name, MemberKind::Property, declared_type)
    }

    pub fn field(name: impl Into<String>, declared_type: Type) -> Self {
        Self::new(name, MemberKind::Field, declared_type)
    }

    /// A read-only property whose value is derived from the owning object
    pub fn computed<F>(name: impl Into<String>, declared_type: Type, getter: F) -> Self
    where
        F: Fn(&Object) -> Value + Send + Sync + 'static,
    {
        let mut spec = Self::new(name, MemberKind::Property, declared_type);
        spec.getter = Some(Arc::new(getter));
        spec
    }

    fn new(name: impl Into<String>, kind: MemberKind, declared_type: Type) -> Self {
        Self {
            name: name.into(),
            kind,
            declared_type,
            visibility: Visibility::Public,
            browsable: true,
            indexer: false,
            getter: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn internal(self) -> Self {
        self.with_visibility(Visibility::Internal)
    }

    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    pub fn non_browsable(mut self) -> Self {
        self.browsable = false;
        self
    }

    pub fn indexer(mut self) -> Self {
        self.indexer = true;
        self
    }
}
