//! Requirement fulfillment.
//!
//! Resolution is strictly sequential: one capability call is in flight at a
//! time, and the sink sees a totally ordered event stream. The first failing
//! `check` or `apply` stops the forward pass, and every applied requirement
//! is compensated in reverse order, starting with the one that failed.

use tracing::{debug, warn};

use crate::error::{RequirementError, RequisiteError, Result};
use crate::progress::{ProgressEvent, ProgressSink, StepReporter};
use crate::requirements::{Requirement, RequirementSet};

/// What happened to a resolution that ran.
#[derive(Debug)]
pub enum Fulfillment {
    /// Every requirement in the closure is now satisfied.
    Completed(FulfillSummary),
    /// A step failed and every applied step was compensated.
    RolledBack(RequirementError),
}

impl Fulfillment {
    /// Whether the target was fulfilled.
    pub fn is_completed(&self) -> bool {
        matches!(self, Fulfillment::Completed(_))
    }

    /// The summary of a completed resolution.
    pub fn summary(&self) -> Option<&FulfillSummary> {
        match self {
            Fulfillment::Completed(summary) => Some(summary),
            Fulfillment::RolledBack(_) => None,
        }
    }

    /// The step failure of a rolled back resolution.
    pub fn failure(&self) -> Option<&RequirementError> {
        match self {
            Fulfillment::Completed(_) => None,
            Fulfillment::RolledBack(failure) => Some(failure),
        }
    }

    /// Treat a rollback as an error.
    pub fn into_result(self) -> Result<FulfillSummary> {
        match self {
            Fulfillment::Completed(summary) => Ok(summary),
            Fulfillment::RolledBack(failure) => Err(RequisiteError::RequirementFailed(failure)),
        }
    }
}

/// Summary of a completed resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillSummary {
    /// The requirement that was resolved.
    pub target: String,
    /// Size of the dependency closure.
    pub total_work: usize,
    /// Requirements whose `apply` ran, in order.
    pub applied: Vec<String>,
    /// Requirements whose `check` reported them already satisfied.
    pub already_satisfied: Vec<String>,
}

enum StepOutcome {
    Applied,
    AlreadySatisfied,
}

fn run_step<C>(
    requirement: &dyn Requirement<C>,
    ctx: &mut C,
    sink: &mut dyn ProgressSink,
) -> anyhow::Result<StepOutcome> {
    let mut reporter = StepReporter::new(sink);
    if requirement.check(ctx, &mut reporter)? {
        return Ok(StepOutcome::AlreadySatisfied);
    }
    requirement.apply(ctx, &mut reporter)?;
    Ok(StepOutcome::Applied)
}

impl<C> RequirementSet<C> {
    /// Fulfill `name` and everything it depends on.
    ///
    /// `ctx` is lent to every capability call and is otherwise untouched.
    ///
    /// A step failure is not an `Err`: once rollback finishes, the result is
    /// [`Fulfillment::RolledBack`] and the failure has also been reported to
    /// the sink.
    ///
    /// # Errors
    ///
    /// - `UnknownRequirement` / `CircularDependency` before any event is emitted
    /// - `CompensationFailed` if a `compensate` call fails; rollback stops there
    pub fn fulfill_requirement(
        &self,
        name: &str,
        ctx: &mut C,
        sink: &mut dyn ProgressSink,
    ) -> Result<Fulfillment> {
        let requirements = self.collect_requirements(name)?;
        let total_work = requirements.len();
        debug!(requirement = name, total_work, "Fulfilling requirement");

        sink.emit(ProgressEvent::Begin { total_work });

        let mut applied: Vec<&dyn Requirement<C>> = Vec::with_capacity(total_work);
        let mut summary = FulfillSummary {
            target: name.to_string(),
            total_work,
            applied: Vec::new(),
            already_satisfied: Vec::new(),
        };

        for (i, requirement) in requirements.iter().copied().enumerate() {
            sink.emit(ProgressEvent::StepBegin {
                name: requirement.name(),
            });

            match run_step(requirement, ctx, sink) {
                Ok(StepOutcome::Applied) => {
                    debug!(requirement = requirement.name(), "Applied");
                    summary.applied.push(requirement.name().to_string());
                }
                Ok(StepOutcome::AlreadySatisfied) => {
                    debug!(requirement = requirement.name(), "Already satisfied");
                    summary
                        .already_satisfied
                        .push(requirement.name().to_string());
                }
                Err(cause) => {
                    let completed_count = applied.len();
                    warn!(
                        requirement = requirement.name(),
                        completed_count,
                        "Step failed: {:#}",
                        cause
                    );
                    sink.emit(ProgressEvent::StepFailed {
                        requirement: requirement.name(),
                        completed_count,
                        cause: &cause,
                    });
                    let failure = RequirementError::new(requirement.name(), completed_count, cause);
                    let failure = unwind(requirement, &applied, total_work, ctx, sink, failure)?;
                    return Ok(Fulfillment::RolledBack(failure));
                }
            }

            applied.push(requirement);
            let worked = i + 1;
            sink.emit(ProgressEvent::StepCompleted {
                worked,
                total_work,
                done: worked == total_work,
            });
        }

        debug!(requirement = name, "Fulfilled");
        Ok(Fulfillment::Completed(summary))
    }
}

/// Compensate `failed`, then everything in `applied` in reverse.
///
/// The failed step was never counted as worked, so its rollback reports the
/// unchanged count; each earlier step then counts down by one.
fn unwind<'a, C>(
    failed: &'a dyn Requirement<C>,
    applied: &[&'a dyn Requirement<C>],
    total_work: usize,
    ctx: &mut C,
    sink: &mut dyn ProgressSink,
    failure: RequirementError,
) -> Result<RequirementError> {
    let rollback: Vec<&'a dyn Requirement<C>> = std::iter::once(failed)
        .chain(applied.iter().rev().copied())
        .collect();
    let mut worked = applied.len();
    debug!(steps = rollback.len(), "Rolling back");

    for (position, requirement) in rollback.iter().copied().enumerate() {
        let label = format!("Rolling back \"{}\"", requirement.name());
        sink.emit(ProgressEvent::RollbackBegin {
            requirement: requirement.name(),
            label: &label,
        });

        let compensated = {
            let mut reporter = StepReporter::new(&mut *sink);
            requirement.compensate(ctx, &mut reporter)
        };
        if let Err(source) = compensated {
            warn!(
                requirement = requirement.name(),
                "Compensation failed, stopping rollback: {:#}", source
            );
            return Err(RequisiteError::CompensationFailed {
                requirement: requirement.name().to_string(),
                pending: rollback[position + 1..]
                    .iter()
                    .map(|r| r.name().to_string())
                    .collect(),
                source,
                failure: Box::new(failure),
            });
        }

        if position > 0 {
            worked -= 1;
        }
        sink.emit(ProgressEvent::RollbackCompleted {
            worked,
            total_work,
            done: worked == 0,
        });
    }

    debug!("Rollback complete");
    Ok(failure)
}
