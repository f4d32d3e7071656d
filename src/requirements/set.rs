//! Requirement registry.
//!
//! A [`RequirementSet`] is an explicit, caller-owned value: there is no
//! process-wide registry, and independent sets never share state.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{RequisiteError, Result};

use super::closure::dependency_closure;
use super::Requirement;

/// Registry of requirements keyed by name.
///
/// Registration is additive. Registering a name twice replaces the earlier
/// requirement but keeps its original position in [`requirement_ids`].
///
/// [`requirement_ids`]: RequirementSet::requirement_ids
pub struct RequirementSet<C> {
    requirements: Vec<Box<dyn Requirement<C>>>,
    index: HashMap<String, usize>,
}

impl<C> Default for RequirementSet<C> {
    fn default() -> Self {
        Self {
            requirements: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<C> RequirementSet<C> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one requirement.
    pub fn add_requirement<R>(&mut self, requirement: R) -> &mut Self
    where
        R: Requirement<C> + 'static,
    {
        self.insert(Box::new(requirement));
        self
    }

    /// Register several requirements, in order.
    pub fn add_requirements<I>(&mut self, requirements: I) -> &mut Self
    where
        I: IntoIterator<Item = Box<dyn Requirement<C>>>,
    {
        for requirement in requirements {
            self.insert(requirement);
        }
        self
    }

    fn insert(&mut self, requirement: Box<dyn Requirement<C>>) {
        let name = requirement.name().to_string();
        match self.index.get(&name) {
            Some(&position) => {
                debug!(requirement = %name, "Replacing registered requirement");
                self.requirements[position] = requirement;
            }
            None => {
                self.index.insert(name, self.requirements.len());
                self.requirements.push(requirement);
            }
        }
    }

    /// All registered names, in registration order.
    pub fn requirement_ids(&self) -> Vec<&str> {
        self.requirements.iter().map(|r| r.name()).collect()
    }

    /// Number of registered requirements.
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Whether a requirement with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a requirement by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRequirement` if nothing is registered under `name`.
    pub fn get_requirement(&self, name: &str) -> Result<&dyn Requirement<C>> {
        self.lookup(name)
            .ok_or_else(|| RequisiteError::UnknownRequirement {
                name: name.to_string(),
                required_by: None,
            })
    }

    fn lookup(&self, name: &str) -> Option<&dyn Requirement<C>> {
        self.index
            .get(name)
            .map(|&position| self.requirements[position].as_ref())
    }

    /// The dependency closure of `name`, dependencies first.
    ///
    /// Every requirement appears exactly once and strictly after all of its
    /// own dependencies. Calling this twice on an unmodified set yields the
    /// same list.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRequirement` or `CircularDependency` when the graph
    /// reachable from `name` is not resolvable.
    pub fn collect_requirements(&self, name: &str) -> Result<Vec<&dyn Requirement<C>>> {
        let order = dependency_closure(name, |n| self.lookup(n).map(|r| r.dependencies()))?;
        Ok(order.iter().filter_map(|n| self.lookup(n)).collect())
    }

    /// Check that every registered requirement can be resolved.
    ///
    /// Surfaces unknown dependencies and cycles without running anything.
    pub fn validate(&self) -> Result<()> {
        for requirement in &self.requirements {
            dependency_closure(requirement.name(), |n| {
                self.lookup(n).map(|r| r.dependencies())
            })?;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for RequirementSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequirementSet")
            .field("requirements", &self.requirement_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::FnRequirement;

    fn req(name: &str, deps: &[&str]) -> FnRequirement<()> {
        FnRequirement::new(name, |_, _| Ok(())).depends_on(deps.iter().copied())
    }

    fn names(list: &[&dyn Requirement<()>]) -> Vec<String> {
        list.iter().map(|r| r.name().to_string()).collect()
    }

    #[test]
    fn new_set_is_empty() {
        let set: RequirementSet<()> = RequirementSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn ids_follow_registration_order() {
        let mut set = RequirementSet::new();
        set.add_requirement(req("zeta", &[]))
            .add_requirement(req("alpha", &[]))
            .add_requirement(req("mid", &[]));
        assert_eq!(set.requirement_ids(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn add_requirements_accepts_boxed_list() {
        let mut set = RequirementSet::new();
        set.add_requirements(vec![
            Box::new(req("a", &[])) as Box<dyn Requirement<()>>,
            Box::new(req("b", &["a"])),
        ]);
        assert!(set.contains("a"));
        assert!(set.contains("b"));
    }

    #[test]
    fn duplicate_name_replaces_in_place() {
        let mut set = RequirementSet::new();
        set.add_requirement(req("a", &[]))
            .add_requirement(req("b", &[]))
            .add_requirement(req("a", &["b"]));

        assert_eq!(set.requirement_ids(), vec!["a", "b"]);
        assert_eq!(set.get_requirement("a").unwrap().dependencies(), ["b"]);
    }

    #[test]
    fn get_unknown_requirement_is_error() {
        let set: RequirementSet<()> = RequirementSet::new();
        assert!(matches!(
            set.get_requirement("nope"),
            Err(RequisiteError::UnknownRequirement { .. })
        ));
    }

    #[test]
    fn collect_linear_chain() {
        let mut set = RequirementSet::new();
        set.add_requirement(req("r3", &["r2"]))
            .add_requirement(req("r2", &["r1"]))
            .add_requirement(req("r1", &[]));

        let order = set.collect_requirements("r3").unwrap();
        assert_eq!(names(&order), vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn collect_is_idempotent() {
        let mut set = RequirementSet::new();
        set.add_requirement(req("a", &[]))
            .add_requirement(req("b", &["a"]))
            .add_requirement(req("c", &["a"]))
            .add_requirement(req("d", &["c", "b"]));

        let first = names(&set.collect_requirements("d").unwrap());
        let second = names(&set.collect_requirements("d").unwrap());
        assert_eq!(first, vec!["a", "c", "b", "d"]);
        assert_eq!(first, second);
    }

    #[test]
    fn collect_reports_missing_dependency() {
        let mut set = RequirementSet::new();
        set.add_requirement(req("app", &["db"]));
        assert!(matches!(
            set.collect_requirements("app"),
            Err(RequisiteError::UnknownRequirement { .. })
        ));
    }

    #[test]
    fn validate_accepts_sound_graph() {
        let mut set = RequirementSet::new();
        set.add_requirement(req("a", &[]))
            .add_requirement(req("b", &["a"]));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn validate_finds_cycle_outside_any_single_target() {
        let mut set = RequirementSet::new();
        set.add_requirement(req("ok", &[]))
            .add_requirement(req("x", &["y"]))
            .add_requirement(req("y", &["x"]));
        assert!(matches!(
            set.validate(),
            Err(RequisiteError::CircularDependency { .. })
        ));
    }

    #[test]
    fn independent_sets_do_not_interfere() {
        let mut first = RequirementSet::new();
        first.add_requirement(req("a", &[]));
        let mut second = RequirementSet::new();
        second.add_requirement(req("b", &[]));

        assert!(first.contains("a") && !first.contains("b"));
        assert!(second.contains("b") && !second.contains("a"));
    }

    #[test]
    fn set_can_move_across_threads() {
        let mut set = RequirementSet::new();
        set.add_requirement(req("a", &[]));
        let handle = std::thread::spawn(move || set.collect_requirements("a").map(|l| l.len()));
        assert_eq!(handle.join().unwrap().unwrap(), 1);
    }
}
