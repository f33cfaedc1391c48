//! Per-comparison configuration
//!
//! `EquivalencyOptions` is a value: every builder consumes and returns it,
//! and a comparison works on its own copy for its whole duration.

use std::fmt;
use std::sync::Arc;

use super::comparands::Comparands;
use super::conversion::ConversionSelector;
use super::matching::{
    MappedMemberMatchingRule, MappedPathMatchingRule, MemberMatchingRule, MustMatchByNameRule,
    TryMatchByNameRule,
};
use super::member_path::MemberPath;
use super::object_info::ObjectInfo;
use super::ordering::{
    MatchAllOrderingRule, OrderingRuleCollection, PathBasedOrderingRule, PredicateBasedOrderingRule,
};
use super::selection::{
    AllFieldsSelectionRule, AllPropertiesSelectionRule, ExcludeMemberByPathSelectionRule,
    ExcludeMemberByPredicateSelectionRule, ExcludeNonBrowsableMembersRule,
    IncludeMemberByPathSelectionRule, MemberSelectionRule,
};
use super::steps::{EquivalencyStep, TypeAssertionStep};
use crate::errors::{AffirmError, Result};
use crate::value::{MemberDef, Type, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumEquivalencyHandling {
    #[default]
    ByValue,
    ByName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclicReferenceHandling {
    #[default]
    Report,
    Ignore,
}

/// How strings are normalized before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringComparison {
    pub ignore_case: bool,
    pub ignore_leading_whitespace: bool,
    pub ignore_trailing_whitespace: bool,
    pub ignore_newline_style: bool,
}

impl StringComparison {
    pub fn is_exact(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the whitespace and newline normalizations
    ///
    /// Case is handled at comparison time so mismatch indices stay on the
    /// original characters.
    pub fn normalize(&self, text: &str) -> String {
        let mut text = if self.ignore_newline_style {
            text.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            text.to_string()
        };
        if self.ignore_leading_whitespace {
            text = text.trim_start().to_string();
        }
        if self.ignore_trailing_whitespace {
            text = text.trim_end().to_string();
        }
        text
    }

    pub fn chars_match(&self, a: char, b: char) -> bool {
        if self.ignore_case {
            a.to_lowercase().eq(b.to_lowercase())
        } else {
            a == b
        }
    }
}

/// Options steering one structural equivalency comparison
#[derive(Clone)]
pub struct EquivalencyOptions {
    runtime_types: bool,
    include_properties: bool,
    include_fields: bool,
    include_internal: bool,
    ignore_non_browsable_on_subject: bool,
    selection_rules: Vec<Arc<dyn MemberSelectionRule>>,
    matching_rules: Vec<Arc<dyn MemberMatchingRule>>,
    ordering_rules: OrderingRuleCollection,
    conversion: ConversionSelector,
    user_steps: Vec<Arc<dyn EquivalencyStep>>,
    enum_handling: EnumEquivalencyHandling,
    value_types: Vec<Type>,
    member_types: Vec<Type>,
    cyclic_references: CyclicReferenceHandling,
    max_recursion_depth: usize,
    allow_infinite_recursion: bool,
    tracing: bool,
    string_comparison: StringComparison,
}

impl Default for EquivalencyOptions {
    fn default() -> Self {
        Self {
            runtime_types: false,
            include_properties: true,
            include_fields: true,
            include_internal: false,
            ignore_non_browsable_on_subject: false,
            selection_rules: vec![
                Arc::new(AllPropertiesSelectionRule),
                Arc::new(AllFieldsSelectionRule),
            ],
            matching_rules: vec![Arc::new(MustMatchByNameRule)],
            ordering_rules: OrderingRuleCollection::default(),
            conversion: ConversionSelector::default(),
            user_steps: Vec::new(),
            enum_handling: EnumEquivalencyHandling::ByValue,
            value_types: Vec::new(),
            member_types: Vec::new(),
            cyclic_references: CyclicReferenceHandling::Report,
            max_recursion_depth: 10,
            allow_infinite_recursion: false,
            tracing: false,
            string_comparison: StringComparison::default(),
        }
    }
}

impl EquivalencyOptions {
    /// Start from the process-wide defaults
    pub fn new() -> Self {
        super::global::snapshot().defaults
    }

    // ===== Types =====

    pub fn respecting_runtime_types(mut self) -> Self {
        self.runtime_types = true;
        self
    }

    pub fn respecting_declared_types(mut self) -> Self {
        self.runtime_types = false;
        self
    }

    // ===== Member selection =====

    pub fn including_fields(mut self) -> Self {
        self.include_fields = true;
        self
    }

    pub fn excluding_fields(mut self) -> Self {
        self.include_fields = false;
        self
    }

    pub fn including_properties(mut self) -> Self {
        self.include_properties = true;
        self
    }

    pub fn excluding_properties(mut self) -> Self {
        self.include_properties = false;
        self
    }

    pub fn including_internal_members(mut self) -> Self {
        self.include_internal = true;
        self
    }

    /// Compare only the member at `path` (and its subtree)
    ///
    /// The first include drops the default all-properties and all-fields
    /// rules.
    ///
    /// # Errors
    ///
    /// Returns a path parse error.
    pub fn including(mut self, path: &str) -> Result<Self> {
        let path = MemberPath::parse(path)?;
        self.remove_selection_rule::<AllPropertiesSelectionRule>();
        self.remove_selection_rule::<AllFieldsSelectionRule>();
        self.selection_rules
            .push(Arc::new(IncludeMemberByPathSelectionRule::new(path)));
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns a path parse error.
    pub fn excluding(mut self, path: &str) -> Result<Self> {
        let path = MemberPath::parse(path)?;
        self.selection_rules
            .push(Arc::new(ExcludeMemberByPathSelectionRule::new(path)));
        Ok(self)
    }

    pub fn excluding_members_where<F>(mut self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&MemberDef, &str) -> bool + Send + Sync + 'static,
    {
        self.selection_rules.push(Arc::new(
            ExcludeMemberByPredicateSelectionRule::new(description, predicate),
        ));
        self
    }

    pub fn excluding_non_browsable_members(mut self) -> Self {
        self.selection_rules
            .push(Arc::new(ExcludeNonBrowsableMembersRule));
        self
    }

    pub fn with_selection_rule(mut self, rule: impl MemberSelectionRule) -> Self {
        self.selection_rules.push(Arc::new(rule));
        self
    }

    fn remove_selection_rule<R: 'static>(&mut self) {
        let target = std::any::TypeId::of::<R>();
        self.selection_rules.retain(|r| r.rule_type() != target);
    }

    // ===== Member matching =====

    pub fn ignoring_non_browsable_on_subject(mut self) -> Self {
        self.ignore_non_browsable_on_subject = true;
        self
    }

    /// Skip expectation members the subject does not have
    pub fn excluding_missing_members(mut self) -> Self {
        let strict = std::any::TypeId::of::<MustMatchByNameRule>();
        for rule in self.matching_rules.iter_mut() {
            if rule.rule_type() == strict {
                *rule = Arc::new(TryMatchByNameRule);
            }
        }
        self
    }

    /// Compare the expectation member at `expectation_path` with the subject
    /// member at `subject_path`
    ///
    /// # Errors
    ///
    /// Returns a path error or `MismatchedMappingParents`.
    pub fn with_mapping(self, expectation_path: &str, subject_path: &str) -> Result<Self> {
        let rule = MappedPathMatchingRule::new(expectation_path, subject_path)?;
        Ok(self.prepend_matching_rule(rule))
    }

    /// # Errors
    ///
    /// Returns `EmptyArgument` or `NestedMemberName` for an invalid name.
    pub fn with_member_mapping(
        self,
        expectation_type: impl Into<Type>,
        subject_type: impl Into<Type>,
        expectation_member: &str,
        subject_member: &str,
    ) -> Result<Self> {
        let rule = MappedMemberMatchingRule::new(
            expectation_type.into(),
            subject_type.into(),
            expectation_member,
            subject_member,
        )?;
        Ok(self.prepend_matching_rule(rule))
    }

    pub fn prepend_matching_rule(mut self, rule: impl MemberMatchingRule) -> Self {
        self.matching_rules.insert(0, Arc::new(rule));
        self
    }

    pub fn append_matching_rule(mut self, rule: impl MemberMatchingRule) -> Self {
        self.matching_rules.push(Arc::new(rule));
        self
    }

    // ===== Ordering =====

    pub fn with_strict_ordering(mut self) -> Self {
        self.ordering_rules.clear();
        self.ordering_rules.add(MatchAllOrderingRule);
        self
    }

    pub fn without_strict_ordering(mut self) -> Self {
        self.ordering_rules.clear();
        self
    }

    pub fn with_strict_ordering_for(mut self, path: &str) -> Self {
        self.ordering_rules.add(PathBasedOrderingRule::new(path));
        self
    }

    pub fn without_strict_ordering_for(mut self, path: &str) -> Self {
        self.ordering_rules
            .add(PathBasedOrderingRule::new(path).inverted());
        self
    }

    pub fn with_strict_ordering_where<F>(mut self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ObjectInfo) -> bool + Send + Sync + 'static,
    {
        self.ordering_rules
            .add(PredicateBasedOrderingRule::new(description, predicate));
        self
    }

    pub fn without_strict_ordering_where<F>(
        mut self,
        description: impl Into<String>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&ObjectInfo) -> bool + Send + Sync + 'static,
    {
        self.ordering_rules
            .add(PredicateBasedOrderingRule::new(description, predicate).inverted());
        self
    }

    // ===== Conversion =====

    pub fn with_auto_conversion(mut self) -> Self {
        self.conversion.include_all();
        self
    }

    pub fn with_auto_conversion_for<F>(mut self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ObjectInfo) -> bool + Send + Sync + 'static,
    {
        self.conversion.include(description, predicate);
        self
    }

    pub fn without_auto_conversion_for<F>(
        mut self,
        description: impl Into<String>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&ObjectInfo) -> bool + Send + Sync + 'static,
    {
        self.conversion.exclude(description, predicate);
        self
    }

    // ===== User steps =====

    /// Run `step` before the built-in steps
    pub fn using(mut self, step: impl EquivalencyStep) -> Self {
        self.user_steps.push(Arc::new(step));
        self
    }

    /// Judge every node whose expected type is `ty` with `assertion`
    ///
    /// An `Err` message is reported as a failure at that node.
    pub fn using_for_type<F>(self, ty: impl Into<Type>, description: impl Into<String>, assertion: F) -> Self
    where
        F: Fn(&Value, &Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.using(TypeAssertionStep::new(ty.into(), description, assertion))
    }

    // ===== Value semantics =====

    pub fn comparing_enums_by_name(mut self) -> Self {
        self.enum_handling = EnumEquivalencyHandling::ByName;
        self
    }

    pub fn comparing_enums_by_value(mut self) -> Self {
        self.enum_handling = EnumEquivalencyHandling::ByValue;
        self
    }

    pub fn comparing_by_value(mut self, ty: impl Into<Type>) -> Self {
        let ty = ty.into();
        self.member_types.retain(|t| *t != ty);
        self.value_types.push(ty);
        self
    }

    pub fn comparing_by_members(mut self, ty: impl Into<Type>) -> Self {
        let ty = ty.into();
        self.value_types.retain(|t| *t != ty);
        self.member_types.push(ty);
        self
    }

    // ===== Recursion =====

    pub fn ignoring_cyclic_references(mut self) -> Self {
        self.cyclic_references = CyclicReferenceHandling::Ignore;
        self
    }

    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn allowing_infinite_recursion(mut self) -> Self {
        self.allow_infinite_recursion = true;
        self
    }

    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    // ===== Strings =====

    pub fn ignoring_case(mut self) -> Self {
        self.string_comparison.ignore_case = true;
        self
    }

    pub fn ignoring_leading_whitespace(mut self) -> Self {
        self.string_comparison.ignore_leading_whitespace = true;
        self
    }

    pub fn ignoring_trailing_whitespace(mut self) -> Self {
        self.string_comparison.ignore_trailing_whitespace = true;
        self
    }

    pub fn ignoring_newline_style(mut self) -> Self {
        self.string_comparison.ignore_newline_style = true;
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a depth limit of zero.
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.allow_infinite_recursion && self.max_recursion_depth == 0 {
            return Err(AffirmError::InvalidConfiguration {
                reason: "the maximum recursion depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    // ===== Accessors =====

    pub fn respects_runtime_types(&self) -> bool {
        self.runtime_types
    }

    pub fn includes_properties(&self) -> bool {
        self.include_properties
    }

    pub fn includes_fields(&self) -> bool {
        self.include_fields
    }

    pub fn includes_internal_members(&self) -> bool {
        self.include_internal
    }

    pub fn ignores_non_browsable_on_subject(&self) -> bool {
        self.ignore_non_browsable_on_subject
    }

    pub fn selection_rules(&self) -> &[Arc<dyn MemberSelectionRule>] {
        &self.selection_rules
    }

    pub fn matching_rules(&self) -> &[Arc<dyn MemberMatchingRule>] {
        &self.matching_rules
    }

    pub fn ordering_rules(&self) -> &OrderingRuleCollection {
        &self.ordering_rules
    }

    pub fn conversion_selector(&self) -> &ConversionSelector {
        &self.conversion
    }

    pub fn user_steps(&self) -> &[Arc<dyn EquivalencyStep>] {
        &self.user_steps
    }

    pub fn enum_handling(&self) -> EnumEquivalencyHandling {
        self.enum_handling
    }

    pub fn cyclic_reference_handling(&self) -> CyclicReferenceHandling {
        self.cyclic_references
    }

    pub fn max_recursion_depth(&self) -> usize {
        self.max_recursion_depth
    }

    pub fn allows_infinite_recursion(&self) -> bool {
        self.allow_infinite_recursion
    }

    pub fn tracing_enabled(&self) -> bool {
        self.tracing
    }

    pub fn string_comparison(&self) -> StringComparison {
        self.string_comparison
    }

    /// Whether nodes of `ty` are compared with their own equality
    ///
    /// Explicit registrations win; otherwise primitives and object types
    /// with their own equality are compared by value.
    pub fn is_compared_by_value(&self, ty: &Type) -> bool {
        if self.member_types.iter().any(|t| ty.is_assignable_to(t) && *t != Type::Any) {
            return false;
        }
        if self.value_types.iter().any(|t| ty.is_assignable_to(t)) {
            return true;
        }
        match ty {
            Type::Object(object) => object.has_value_equality(),
            other => other.is_primitive(),
        }
    }

    /// Whether nodes of `ty` were explicitly registered for structural comparison
    pub fn is_compared_by_members(&self, ty: &Type) -> bool {
        self.member_types.iter().any(|t| ty.is_assignable_to(t))
    }

    pub(crate) fn is_strictly_ordered(&self, comparands: &Comparands, node: &super::node::Node) -> bool {
        self.ordering_rules
            .is_order_strict(&ObjectInfo::new(node, comparands))
    }
}

impl fmt::Display for EquivalencyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.runtime_types {
            writeln!(f, "- Use runtime types")?;
        } else {
            writeln!(f, "- Use declared types")?;
        }
        if self.include_properties {
            writeln!(f, "- Include properties")?;
        }
        if self.include_fields {
            writeln!(f, "- Include fields")?;
        }
        if self.include_internal {
            writeln!(f, "- Include internal members")?;
        }
        match self.enum_handling {
            EnumEquivalencyHandling::ByValue => writeln!(f, "- Compare enums by value")?,
            EnumEquivalencyHandling::ByName => writeln!(f, "- Compare enums by name")?,
        }
        match self.cyclic_references {
            CyclicReferenceHandling::Report => writeln!(f, "- Report cyclic references")?,
            CyclicReferenceHandling::Ignore => writeln!(f, "- Ignore cyclic references")?,
        }
        if self.allow_infinite_recursion {
            writeln!(f, "- Allow infinite recursion")?;
        } else {
            writeln!(f, "- Stop at recursion depth {}", self.max_recursion_depth)?;
        }
        for ty in &self.value_types {
            writeln!(f, "- Compare {} by value", ty)?;
        }
        for ty in &self.member_types {
            writeln!(f, "- Compare {} by its members", ty)?;
        }
        let strings = self.string_comparison;
        for (on, text) in [
            (strings.ignore_case, "- Ignore case of strings"),
            (strings.ignore_leading_whitespace, "- Ignore leading whitespace"),
            (strings.ignore_trailing_whitespace, "- Ignore trailing whitespace"),
            (strings.ignore_newline_style, "- Ignore newline style"),
        ] {
            if on {
                writeln!(f, "{}", text)?;
            }
        }
        for rule in &self.selection_rules {
            writeln!(f, "- {}", rule)?;
        }
        for rule in &self.matching_rules {
            writeln!(f, "- {}", rule)?;
        }
        for step in &self.user_steps {
            writeln!(f, "- {}", step)?;
        }
        writeln!(f, "{}", self.ordering_rules)?;
        write!(f, "{}", self.conversion)
    }
}

impl fmt::Debug for EquivalencyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EquivalencyOptions")
            .field("runtime_types", &self.runtime_types)
            .field("selection_rules", &self.selection_rules.len())
            .field("matching_rules", &self.matching_rules.len())
            .field("user_steps", &self.user_steps.len())
            .field("max_recursion_depth", &self.max_recursion_depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectType;

    #[test]
    fn test_including_drops_default_selection_rules() {
        let options = EquivalencyOptions::default().including("Name").unwrap();
        assert_eq!(options.selection_rules().len(), 1);
        assert_eq!(options.selection_rules()[0].to_string(), "Include member root.Name");
    }

    #[test]
    fn test_mappings_run_before_name_matching() {
        let options = EquivalencyOptions::default()
            .with_mapping("Name", "FullName")
            .unwrap();
        assert_eq!(options.matching_rules().len(), 2);
        assert_eq!(
            options.matching_rules()[1].rule_type(),
            std::any::TypeId::of::<MustMatchByNameRule>()
        );
    }

    #[test]
    fn test_excluding_missing_members_relaxes_name_matching() {
        let options = EquivalencyOptions::default().excluding_missing_members();
        assert_eq!(
            options.matching_rules()[0].rule_type(),
            std::any::TypeId::of::<TryMatchByNameRule>()
        );
    }

    #[test]
    fn test_strict_ordering_toggles() {
        let info = ObjectInfo::with_path("Items");
        let strict = EquivalencyOptions::default().with_strict_ordering();
        assert!(strict.ordering_rules().is_order_strict(&info));
        let loose = strict.without_strict_ordering();
        assert!(!loose.ordering_rules().is_order_strict(&info));
    }

    #[test]
    fn test_value_semantics_registration() {
        let point = ObjectType::builder("Point").property("X", Type::Int).build();
        let ty = Type::Object(point);
        let options = EquivalencyOptions::default();
        assert!(!options.is_compared_by_value(&ty));
        assert!(options.is_compared_by_value(&Type::Int));

        let options = options.comparing_by_value(ty.clone());
        assert!(options.is_compared_by_value(&ty));

        let options = options.comparing_by_members(ty.clone());
        assert!(!options.is_compared_by_value(&ty));
        assert!(options.is_compared_by_members(&ty));
    }

    #[test]
    fn test_string_normalization() {
        let comparison = StringComparison {
            ignore_leading_whitespace: true,
            ignore_trailing_whitespace: true,
            ignore_newline_style: true,
            ..StringComparison::default()
        };
        assert_eq!(comparison.normalize("  a\r\nb \n"), "a\nb");
        assert!(StringComparison::default().is_exact());
    }

    #[test]
    fn test_display_lists_configuration() {
        let text = EquivalencyOptions::default()
            .comparing_enums_by_name()
            .with_strict_ordering()
            .to_string();
        assert!(text.contains("- Use declared types"));
        assert!(text.contains("- Compare enums by name"));
        assert!(text.contains("- Be strict about the order of items in collections"));
        assert!(text.contains("- Without automatic conversion"));
    }
}
