//! Object types and instances

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use super::member::{MemberDef, MemberKind, MemberSource, MemberSpec};
use super::types::Type;
use super::value::Value;
use crate::errors::{AffirmError, Result};

/// Value-semantics equality of two instances of the same type
pub type EqualityFn = Arc<dyn Fn(&Object, &Object) -> bool + Send + Sync>;

/// Shared handle to an object; identity is pointer identity
pub type ObjectRef = Rc<Object>;

/// A named object type with its flattened member list
///
/// Base members come first; a derived member with the same name and kind
/// replaces the base member in place.
pub struct ObjectType {
    name: String,
    base: Option<Arc<ObjectType>>,
    members: Vec<MemberDef>,
    by_name: HashMap<String, Vec<usize>>,
    slot_count: usize,
    equality: Option<EqualityFn>,
}

impl ObjectType {
    pub fn builder(name: impl Into<String>) -> ObjectTypeBuilder {
        ObjectTypeBuilder {
            name: name.into(),
            base: None,
            specs: Vec::new(),
            equality: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Option<&Arc<ObjectType>> {
        self.base.as_ref()
    }

    pub fn members(&self) -> &[MemberDef] {
        &self.members
    }

    /// Members called `name`, in declaration order
    pub fn members_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a MemberDef> + 'a {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(move |index| self.members.get(*index))
    }

    pub fn find_member(&self, name: &str, kind: MemberKind) -> Option<&MemberDef> {
        self.members_named(name).find(|m| m.kind == kind)
    }

    /// Non-indexer property visible under the visibility policy
    pub fn find_property(&self, name: &str, include_internal: bool) -> Option<&MemberDef> {
        self.members_named(name).find(|m| {
            m.kind == MemberKind::Property && !m.indexer && m.visibility.is_visible(include_internal)
        })
    }

    pub fn find_field(&self, name: &str, include_internal: bool) -> Option<&MemberDef> {
        self.members_named(name)
            .find(|m| m.kind == MemberKind::Field && m.visibility.is_visible(include_internal))
    }

    /// Property first, then field
    pub fn find_property_or_field(&self, name: &str, include_internal: bool) -> Option<&MemberDef> {
        self.find_property(name, include_internal)
            .or_else(|| self.find_field(name, include_internal))
    }

    pub fn equality(&self) -> Option<&EqualityFn> {
        self.equality.as_ref()
    }

    pub fn has_value_equality(&self) -> bool {
        self.equality.is_some()
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("name", &self.name)
            .field("base", &self.base.as_ref().map(|b| b.name().to_string()))
            .field("members", &self.members.len())
            .finish()
    }
}

pub struct ObjectTypeBuilder {
    name: String,
    base: Option<Arc<ObjectType>>,
    specs: Vec<MemberSpec>,
    equality: Option<EqualityFn>,
}

impl ObjectTypeBuilder {
    pub fn base(mut self, base: &Arc<ObjectType>) -> Self {
        self.base = Some(base.clone());
        self
    }

    pub fn property(self, name: impl Into<String>, declared_type: Type) -> Self {
        self.member(MemberSpec::property(name, declared_type))
    }

    pub fn field(self, name: impl Into<String>, declared_type: Type) -> Self {
        self.member(MemberSpec::field(name, declared_type))
    }

    pub fn member(mut self, spec: MemberSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Give the type its own equality, making it a value type for the engine
    pub fn with_equality<F>(mut self, equality: F) -> Self
    where
        F: Fn(&Object, &Object) -> bool + Send + Sync + 'static,
    {
        self.equality = Some(Arc::new(equality));
        self
    }

    pub fn build(self) -> Arc<ObjectType> {
        let mut members: Vec<MemberDef> = self
            .base
            .as_ref()
            .map(|b| b.members.clone())
            .unwrap_or_default();
        let mut slot_count = self.base.as_ref().map_or(0, |b| b.slot_count);

        for spec in self.specs {
            let source = match spec.getter {
                Some(getter) => MemberSource::Computed(getter),
                None => {
                    slot_count += 1;
                    MemberSource::Slot(slot_count - 1)
                }
            };
            let def = MemberDef {
                name: spec.name,
                kind: spec.kind,
                declared_type: spec.declared_type,
                declaring_type: self.name.clone(),
                visibility: spec.visibility,
                browsable: spec.browsable,
                indexer: spec.indexer,
                source,
            };
            match members
                .iter()
                .position(|m| m.name == def.name && m.kind == def.kind)
            {
                Some(shadowed) => members[shadowed] = def,
                None => members.push(def),
            }
        }

        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, member) in members.iter().enumerate() {
            by_name.entry(member.name.clone()).or_default().push(index);
        }

        let equality = self
            .equality
            .or_else(|| self.base.as_ref().and_then(|b| b.equality.clone()));

        Arc::new(ObjectType {
            name: self.name,
            base: self.base,
            members,
            by_name,
            slot_count,
            equality,
        })
    }
}

/// An instance of an `ObjectType`
///
/// Slots are interior-mutable so that references, including cyclic ones, can
/// be wired after construction.
pub struct Object {
    ty: Arc<ObjectType>,
    slots: RefCell<Vec<Value>>,
}

impl Object {
    /// New instance with every stored member set to `Null`
    pub fn new(ty: &Arc<ObjectType>) -> ObjectRef {
        Rc::new(Object {
            ty: ty.clone(),
            slots: RefCell::new(vec![Value::Null; ty.slot_count]),
        })
    }

    /// New instance with the given member values
    ///
    /// # Errors
    ///
    /// Returns `UnknownMember` or `ComputedMemberNotWritable` for a bad name.
    pub fn with_values<N, V>(
        ty: &Arc<ObjectType>,
        values: impl IntoIterator<Item = (N, V)>,
    ) -> Result<ObjectRef>
    where
        N: AsRef<str>,
        V: Into<Value>,
    {
        let object = Object::new(ty);
        for (name, value) in values {
            object.set(name.as_ref(), value)?;
        }
        Ok(object)
    }

    pub fn object_type(&self) -> &Arc<ObjectType> {
        &self.ty
    }

    /// Assign a stored member, property first, then field
    ///
    /// # Errors
    ///
    /// Returns `UnknownMember` when the type has no such member and
    /// `ComputedMemberNotWritable` when the member is computed.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let def = self
            .ty
            .find_member(name, MemberKind::Property)
            .or_else(|| self.ty.find_member(name, MemberKind::Field))
            .ok_or_else(|| AffirmError::UnknownMember {
                type_name: self.ty.name().to_string(),
                member: name.to_string(),
            })?;
        match def.source {
            MemberSource::Slot(index) => {
                if let Some(slot) = self.slots.borrow_mut().get_mut(index) {
                    *slot = value.into();
                }
                Ok(())
            }
            MemberSource::Computed(_) => Err(AffirmError::ComputedMemberNotWritable {
                type_name: self.ty.name().to_string(),
                member: name.to_string(),
            }),
        }
    }

    /// Read a member by name, property first, then field
    pub fn get(&self, name: &str) -> Option<Value> {
        self.ty
            .find_member(name, MemberKind::Property)
            .or_else(|| self.ty.find_member(name, MemberKind::Field))
            .map(|def| self.read_source(def))
    }

    /// Read the member matching `def` by name and kind on this instance's type
    ///
    /// Returns `Null` when this instance's type does not have the member.
    pub fn read(&self, def: &MemberDef) -> Value {
        match self.ty.find_member(&def.name, def.kind) {
            Some(own) => self.read_source(own),
            None => Value::Null,
        }
    }

    fn read_source(&self, def: &MemberDef) -> Value {
        match &def.source {
            MemberSource::Slot(index) => self
                .slots
                .borrow()
                .get(*index)
                .cloned()
                .unwrap_or(Value::Null),
            MemberSource::Computed(getter) => getter(self),
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type", &self.ty.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::member::Visibility;

    fn person() -> Arc<ObjectType> {
        ObjectType::builder("Person")
            .property("Name", Type::String)
            .field("age", Type::Int)
            .member(MemberSpec::property("Secret", Type::String).internal())
            .build()
    }

    #[test]
    fn test_set_and_get() {
        let p = Object::with_values(&person(), [("Name", Value::from("Ann")), ("age", 31.into())])
            .unwrap();
        assert_eq!(p.get("Name"), Some(Value::from("Ann")));
        assert_eq!(p.get("age"), Some(Value::Int(31)));
        assert_eq!(p.get("Secret"), Some(Value::Null));
        assert_eq!(p.get("Missing"), None);
    }

    #[test]
    fn test_unknown_member_is_an_error() {
        let p = Object::new(&person());
        let err = p.set("Nope", 1).unwrap_err();
        assert!(matches!(err, AffirmError::UnknownMember { .. }));
    }

    #[test]
    fn test_computed_member_is_read_only() {
        let ty = ObjectType::builder("Rect")
            .property("Width", Type::Int)
            .member(MemberSpec::computed("Double", Type::Int, |o: &Object| {
                match o.get("Width") {
                    Some(Value::Int(w)) => Value::Int(w * 2),
                    _ => Value::Null,
                }
            }))
            .build();
        let rect = Object::with_values(&ty, [("Width", 4)]).unwrap();
        assert_eq!(rect.get("Double"), Some(Value::Int(8)));
        assert!(matches!(
            rect.set("Double", 1),
            Err(AffirmError::ComputedMemberNotWritable { .. })
        ));
    }

    #[test]
    fn test_derived_members_shadow_base() {
        let base = person();
        let derived = ObjectType::builder("Employee")
            .base(&base)
            .property("Name", Type::Any)
            .property("Company", Type::String)
            .build();
        let names: Vec<&str> = derived.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Name", "age", "Secret", "Company"]);
        let name = derived.find_property("Name", false).unwrap();
        assert_eq!(name.declaring_type(), "Employee");
        assert!(Type::Object(derived.clone()).is_assignable_to(&Type::Object(base)));
    }

    #[test]
    fn test_visibility_respecting_lookup() {
        let ty = person();
        assert!(ty.find_property("Secret", false).is_none());
        assert!(ty.find_property("Secret", true).is_some());
        assert_eq!(
            ty.find_property_or_field("age", false).map(|m| m.kind()),
            Some(MemberKind::Field)
        );
        assert_eq!(
            ty.find_member("Secret", MemberKind::Property).map(|m| m.visibility()),
            Some(Visibility::Internal)
        );
    }

    #[test]
    fn test_cycles_can_be_wired_after_construction() {
        let node = ObjectType::builder("Node")
            .property("Next", Type::Any)
            .build();
        let a = Object::new(&node);
        let b = Object::new(&node);
        a.set("Next", b.clone()).unwrap();
        b.set("Next", a.clone()).unwrap();
        match a.get("Next") {
            Some(Value::Object(next)) => assert!(Rc::ptr_eq(&next, &b)),
            other => panic!("unexpected {:?}", other),
        }
    }
}
