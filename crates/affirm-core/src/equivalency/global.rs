//! Process-wide equivalency configuration
//!
//! Holds the step plan and the default options every new
//! `EquivalencyOptions::new()` starts from. Configure once at startup;
//! comparisons work on a snapshot taken under the read lock.

use std::any::TypeId;
use std::sync::{Arc, OnceLock, RwLock};

use super::options::EquivalencyOptions;
use super::steps::{self, EquivalencyStep, SimpleEqualityEquivalencyStep};

/// Ordered list of steps tried for every node
#[derive(Clone)]
pub struct EquivalencyPlan {
    steps: Vec<Arc<dyn EquivalencyStep>>,
}

impl Default for EquivalencyPlan {
    fn default() -> Self {
        Self {
            steps: steps::default_steps(),
        }
    }
}

impl EquivalencyPlan {
    pub fn steps(&self) -> &[Arc<dyn EquivalencyStep>] {
        &self.steps
    }

    /// Add a step just before the terminal simple-equality step
    pub fn add(&mut self, step: impl EquivalencyStep) {
        let at = self
            .position_of(TypeId::of::<SimpleEqualityEquivalencyStep>())
            .unwrap_or(self.steps.len());
        self.steps.insert(at, Arc::new(step));
    }

    /// Add a step right after the step of type `T`, or at the end
    pub fn add_after<T: 'static>(&mut self, step: impl EquivalencyStep) {
        let at = self
            .position_of(TypeId::of::<T>())
            .map_or(self.steps.len(), |i| i + 1);
        self.steps.insert(at, Arc::new(step));
    }

    /// Add a step right before the step of type `T`, or at the end
    pub fn insert_before<T: 'static>(&mut self, step: impl EquivalencyStep) {
        let at = self
            .position_of(TypeId::of::<T>())
            .unwrap_or(self.steps.len());
        self.steps.insert(at, Arc::new(step));
    }

    /// Add a step at the front of the plan
    pub fn insert(&mut self, step: impl EquivalencyStep) {
        self.steps.insert(0, Arc::new(step));
    }

    pub fn remove<T: 'static>(&mut self) {
        let target = TypeId::of::<T>();
        self.steps.retain(|s| s.step_type() != target);
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn reset(&mut self) {
        self.steps = steps::default_steps();
    }

    fn position_of(&self, target: TypeId) -> Option<usize> {
        self.steps.iter().position(|s| s.step_type() == target)
    }
}

impl std::fmt::Debug for EquivalencyPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|s| s.to_string()))
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GlobalEquivalencyOptions {
    pub plan: EquivalencyPlan,
    pub defaults: EquivalencyOptions,
}

static GLOBAL: OnceLock<RwLock<GlobalEquivalencyOptions>> = OnceLock::new();

fn global() -> &'static RwLock<GlobalEquivalencyOptions> {
    GLOBAL.get_or_init(|| RwLock::new(GlobalEquivalencyOptions::default()))
}

/// Change the process-wide plan or default options
pub fn configure(f: impl FnOnce(&mut GlobalEquivalencyOptions)) {
    let mut guard = global().write().unwrap_or_else(|p| p.into_inner());
    f(&mut guard);
}

/// Copy of the current global configuration
pub fn snapshot() -> GlobalEquivalencyOptions {
    global()
        .read()
        .unwrap_or_else(|p| p.into_inner())
        .clone()
}

/// Restore the built-in plan and defaults
pub fn reset() {
    configure(|global| *global = GlobalEquivalencyOptions::default());
}
