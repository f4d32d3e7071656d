//! Requirements and the registry that orders them.
//!
//! A [`Requirement`] is a named unit of provisioning work with a list of
//! prerequisite names and three capability operations: `check`, `apply`
//! and `compensate`. Requirements are registered into a [`RequirementSet`],
//! which computes dependency closures and drives fulfillment.
//!
//! # Modules
//!
//! - [`closure`] - Depth-first dependency closure with cycle detection
//! - [`command`] - Requirements backed by shell commands
//! - [`set`] - The requirement registry

pub mod closure;
pub mod command;
pub mod set;

use std::fmt;

use crate::progress::StepReporter;

pub use command::{CommandContext, CommandRecord, CommandRequirement, Phase};
pub use set::RequirementSet;

/// A unit of provisioning work.
///
/// `C` is the caller's context type. The engine lends the same context to
/// every call of one resolution and never looks inside it.
pub trait Requirement<C>: Send + Sync {
    /// Unique name within a [`RequirementSet`].
    fn name(&self) -> &str;

    /// Names of the requirements that must be fulfilled first, in order.
    fn dependencies(&self) -> &[String] {
        &[]
    }

    /// Whether the goal is already met. When this returns `true`, `apply`
    /// is skipped. An error here is handled exactly like an `apply` failure.
    fn check(&self, ctx: &mut C, progress: &mut StepReporter<'_>) -> anyhow::Result<bool> {
        let _ = (ctx, progress);
        Ok(false)
    }

    /// Perform the provisioning work.
    fn apply(&self, ctx: &mut C, progress: &mut StepReporter<'_>) -> anyhow::Result<()>;

    /// Undo the effect of `apply`, including a partially completed one.
    ///
    /// The default implementation is a no-op.
    fn compensate(&self, ctx: &mut C, progress: &mut StepReporter<'_>) -> anyhow::Result<()> {
        let _ = (ctx, progress);
        Ok(())
    }
}

type CheckFn<C> = Box<dyn Fn(&mut C, &mut StepReporter<'_>) -> anyhow::Result<bool> + Send + Sync>;
type ActionFn<C> = Box<dyn Fn(&mut C, &mut StepReporter<'_>) -> anyhow::Result<()> + Send + Sync>;

/// A requirement assembled from closures.
///
/// ```
/// use requisite::requirements::FnRequirement;
///
/// let migrate = FnRequirement::<Vec<String>>::new("migrate", |log, _| {
///     log.push("migrate".to_string());
///     Ok(())
/// })
/// .depends_on(["database"])
/// .with_compensate(|log, _| {
///     log.push("rollback migrate".to_string());
///     Ok(())
/// });
/// ```
pub struct FnRequirement<C> {
    name: String,
    dependencies: Vec<String>,
    check: Option<CheckFn<C>>,
    apply: ActionFn<C>,
    compensate: Option<ActionFn<C>>,
}

impl<C> FnRequirement<C> {
    /// Create a requirement with the given apply operation.
    pub fn new<F>(name: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&mut C, &mut StepReporter<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            check: None,
            apply: Box::new(apply),
            compensate: None,
        }
    }

    /// Append prerequisite names.
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    /// Set the check operation.
    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&mut C, &mut StepReporter<'_>) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.check = Some(Box::new(check));
        self
    }

    /// Set the compensate operation.
    pub fn with_compensate<F>(mut self, compensate: F) -> Self
    where
        F: Fn(&mut C, &mut StepReporter<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.compensate = Some(Box::new(compensate));
        self
    }
}

impl<C> Requirement<C> for FnRequirement<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn check(&self, ctx: &mut C, progress: &mut StepReporter<'_>) -> anyhow::Result<bool> {
        match &self.check {
            Some(check) => check(ctx, progress),
            None => Ok(false),
        }
    }

    fn apply(&self, ctx: &mut C, progress: &mut StepReporter<'_>) -> anyhow::Result<()> {
        (self.apply)(ctx, progress)
    }

    fn compensate(&self, ctx: &mut C, progress: &mut StepReporter<'_>) -> anyhow::Result<()> {
        match &self.compensate {
            Some(compensate) => compensate(ctx, progress),
            None => Ok(()),
        }
    }
}

impl<C> fmt::Debug for FnRequirement<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRequirement")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("has_check", &self.check.is_some())
            .field("has_compensate", &self.compensate.is_some())
            .finish()
    }
}
