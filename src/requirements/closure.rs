//! Dependency closure computation.
//!
//! The closure of a requirement is every requirement it transitively
//! depends on, plus itself, ordered so each one appears once and strictly
//! after all of its own dependencies.

use std::collections::HashMap;

use crate::error::{RequisiteError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

struct Walk<'f, F> {
    dependencies_of: &'f F,
    state: HashMap<String, Visit>,
    path: Vec<String>,
    order: Vec<String>,
}

/// Compute the dependency closure of `root`.
///
/// Depth-first: each dependency is visited in listed order before the node
/// itself, and anything already collected is skipped, so diamonds collapse
/// to their first-visit position.
///
/// `dependencies_of` returns `None` for unregistered names.
///
/// # Errors
///
/// - `UnknownRequirement` if `root` or any reachable dependency is unknown
/// - `CircularDependency` if a node is reached again while still on the
///   traversal stack; the message shows the cycle path
pub fn dependency_closure<'a, F>(root: &str, dependencies_of: F) -> Result<Vec<String>>
where
    F: Fn(&str) -> Option<&'a [String]>,
{
    let mut walk = Walk {
        dependencies_of: &dependencies_of,
        state: HashMap::new(),
        path: Vec::new(),
        order: Vec::new(),
    };
    walk.visit(root, None)?;
    Ok(walk.order)
}

impl<'a, F> Walk<'_, F>
where
    F: Fn(&str) -> Option<&'a [String]>,
{
    fn visit(&mut self, name: &str, required_by: Option<&str>) -> Result<()> {
        match self.state.get(name) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => {
                let start = self.path.iter().position(|p| p == name).unwrap_or(0);
                let mut cycle = self.path[start..].to_vec();
                cycle.push(name.to_string());
                return Err(RequisiteError::CircularDependency {
                    cycle: cycle.join(" -> "),
                });
            }
            None => {}
        }

        let dependencies = (self.dependencies_of)(name).ok_or_else(|| {
            RequisiteError::UnknownRequirement {
                name: name.to_string(),
                required_by: required_by.map(str::to_string),
            }
        })?;

        self.state.insert(name.to_string(), Visit::InProgress);
        self.path.push(name.to_string());

        for dependency in dependencies {
            self.visit(dependency, Some(name))?;
        }

        self.path.pop();
        self.state.insert(name.to_string(), Visit::Done);
        self.order.push(name.to_string());
        Ok(())
    }
}
