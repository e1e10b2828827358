use serde::{Deserialize, Serialize};

use crate::pacing::{Cancelled, Pacer};
use crate::{Algorithm, Result, SortVizError};

/// What a single step did to the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepKind {
    /// Two positions exchanged their values. `a == b` is possible: the
    /// classic animation swaps a position with itself during partitioning
    /// and still redraws.
    Swap { a: usize, b: usize },
    /// One position was overwritten (insertion shifts, merge write-backs).
    Overwrite { index: usize, value: u32 },
    /// A redraw without mutation, emitted when quick/merge recursion
    /// unwinds.
    Refresh,
}

/// One engine step: the operation performed plus the full sequence state
/// after it was applied.
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    pub kind: StepKind,
    pub values: &'a [u32],
}

/// Owned, serialisable form of a [`Step`], one line of the trace output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u64,
    #[serde(flatten)]
    pub kind: StepKind,
    pub values: Vec<u32>,
}

impl StepRecord {
    pub fn from_step(step: u64, source: &Step<'_>) -> Self {
        Self {
            step,
            kind: source.kind,
            values: source.values.to_vec(),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| SortVizError::msg(err.to_string()))
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// Result of one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub algorithm: Algorithm,
    /// Number of steps emitted before the run ended.
    pub steps: u64,
    pub outcome: RunOutcome,
}

impl RunSummary {
    pub fn completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

/// Executes `algorithm` over `values` in place, invoking `observer` after
/// every step and pausing via `pacer` before continuing.
///
/// The cancellation token is consulted before every mutation and during
/// every pause; once cancellation is observed no further state is touched
/// and no further steps are emitted. Sequences shorter than two elements
/// terminate immediately with zero steps.
pub fn run<F>(algorithm: Algorithm, values: &mut [u32], pacer: &Pacer, mut observer: F) -> RunSummary
where
    F: FnMut(Step<'_>),
{
    if pacer.is_cancelled() {
        return RunSummary {
            algorithm,
            steps: 0,
            outcome: RunOutcome::Cancelled,
        };
    }

    let mut driver = StepDriver::new(values, pacer, &mut observer);
    let outcome = match algorithm.execute(&mut driver) {
        Ok(()) => RunOutcome::Completed,
        Err(Cancelled) => RunOutcome::Cancelled,
    };
    RunSummary {
        algorithm,
        steps: driver.steps,
        outcome,
    }
}

/// Mediates every state change of a run: applies the mutation, notifies the
/// observer, then hands control to the pacer.
pub(crate) struct StepDriver<'a> {
    values: &'a mut [u32],
    pacer: &'a Pacer,
    observer: &'a mut dyn FnMut(Step<'_>),
    steps: u64,
}

impl<'a> StepDriver<'a> {
    fn new(
        values: &'a mut [u32],
        pacer: &'a Pacer,
        observer: &'a mut dyn FnMut(Step<'_>),
    ) -> Self {
        Self {
            values,
            pacer,
            observer,
            steps: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn value(&self, index: usize) -> u32 {
        self.values[index]
    }

    pub(crate) fn copy_range(&self, start: usize, end_inclusive: usize) -> Vec<u32> {
        self.values[start..=end_inclusive].to_vec()
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) -> std::result::Result<(), Cancelled> {
        self.guard()?;
        self.values.swap(a, b);
        self.emit(StepKind::Swap { a, b })
    }

    pub(crate) fn overwrite(
        &mut self,
        index: usize,
        value: u32,
    ) -> std::result::Result<(), Cancelled> {
        self.guard()?;
        self.values[index] = value;
        self.emit(StepKind::Overwrite { index, value })
    }

    pub(crate) fn refresh(&mut self) -> std::result::Result<(), Cancelled> {
        self.guard()?;
        self.emit(StepKind::Refresh)
    }

    fn guard(&self) -> std::result::Result<(), Cancelled> {
        if self.pacer.is_cancelled() {
            return Err(Cancelled);
        }
        Ok(())
    }

    fn emit(&mut self, kind: StepKind) -> std::result::Result<(), Cancelled> {
        self.steps += 1;
        let step = Step {
            kind,
            values: &*self.values,
        };
        (self.observer)(step);
        self.pacer.pause()
    }
}
