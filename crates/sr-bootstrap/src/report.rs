//! Per-step results of a bootstrap run.

use crate::error::{BootstrapError, ErrorKind};
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use sr_core::{ParseAnomaly, SchemaState};
use std::fmt;

/// Pipeline step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    Probe,
    Provision,
    Reprobe,
    SeedGuard,
    Seed,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Probe => "probe",
            Step::Provision => "provision",
            Step::Reprobe => "reprobe",
            Step::SeedGuard => "seed-guard",
            Step::Seed => "seed",
        };
        f.write_str(name)
    }
}

/// How a step ended.
#[derive(Debug)]
pub enum StepOutcome {
    Success,
    /// The step had nothing to do.
    Skipped(String),
    /// The step failed and the pipeline carried on.
    Recoverable(BootstrapError),
    /// The step failed and left the store unusable.
    Fatal(BootstrapError),
}

impl StepOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            StepOutcome::Success => "success",
            StepOutcome::Skipped(_) => "skipped",
            StepOutcome::Recoverable(_) => "recoverable",
            StepOutcome::Fatal(_) => "fatal",
        }
    }

    /// The error carried by a failed step.
    pub fn error(&self) -> Option<&BootstrapError> {
        match self {
            StepOutcome::Recoverable(err) | StepOutcome::Fatal(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error().is_some()
    }
}

impl Serialize for StepOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let detail = match self {
            StepOutcome::Success => None,
            StepOutcome::Skipped(reason) => Some(reason.clone()),
            StepOutcome::Recoverable(err) | StepOutcome::Fatal(err) => Some(err.to_string()),
        };
        let kind: Option<ErrorKind> = self.error().map(BootstrapError::kind);

        let mut state = serializer.serialize_struct("StepOutcome", 3)?;
        state.serialize_field("status", self.status())?;
        state.serialize_field("kind", &kind)?;
        state.serialize_field("detail", &detail)?;
        state.end()
    }
}

/// A step and how it ended.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
}

/// What happened to the seed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SeedOutcome {
    /// The seed script was loaded; `items` is the Items row count afterwards.
    Loaded { statements: usize, items: i64 },
    /// The store already held data.
    AlreadySeeded,
    /// Seeding is turned off.
    Disabled,
    /// The guard could not decide, so nothing was loaded.
    NotAttempted,
    /// Reading or loading the script failed; nothing was loaded.
    Failed,
}

/// Outcome of [`crate::Bootstrapper::ensure_ready`].
#[derive(Debug, Serialize)]
pub struct BootstrapReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Probe result before provisioning.
    pub schema_before: SchemaState,
    /// Probe result once the run finished.
    pub schema_after: SchemaState,
    /// Migrations applied during this run.
    pub applied_migrations: Vec<String>,
    /// Whether the direct DDL fallback ran.
    pub used_fallback: bool,
    pub steps: Vec<StepReport>,
    pub seed: SeedOutcome,
    /// Irregularities found in the seed script.
    pub anomalies: Vec<ParseAnomaly>,
}

impl BootstrapReport {
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            schema_before: SchemaState::Missing,
            schema_after: SchemaState::Missing,
            applied_migrations: Vec::new(),
            used_fallback: false,
            steps: Vec::with_capacity(5),
            seed: SeedOutcome::NotAttempted,
            anomalies: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, step: Step, outcome: StepOutcome) {
        match &outcome {
            StepOutcome::Success => log::debug!("Bootstrap step {step}: success"),
            StepOutcome::Skipped(reason) => log::debug!("Bootstrap step {step}: skipped ({reason})"),
            StepOutcome::Recoverable(err) => log::warn!("Bootstrap step {step}: {err}"),
            StepOutcome::Fatal(err) => log::error!("Bootstrap step {step}: {err}"),
        }
        self.steps.push(StepReport { step, outcome });
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Outcome of `step`, if it was recorded.
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|report| report.step == step)
            .map(|report| &report.outcome)
    }

    /// True when any step failed or the seed data may be missing.
    pub fn is_degraded(&self) -> bool {
        self.steps.iter().any(|report| report.outcome.is_failure())
            || matches!(self.seed, SeedOutcome::Failed | SeedOutcome::NotAttempted)
    }

    /// True when a step left the store unusable.
    pub fn has_fatal(&self) -> bool {
        self.steps
            .iter()
            .any(|report| matches!(report.outcome, StepOutcome::Fatal(_)))
    }

    /// Every error recorded during the run, in step order.
    pub fn errors(&self) -> impl Iterator<Item = &BootstrapError> {
        self.steps.iter().filter_map(|report| report.outcome.error())
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
