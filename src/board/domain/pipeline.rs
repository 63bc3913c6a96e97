//! Pipeline step sequence and the progress-to-status mapping.

use super::{BoardDomainError, StatusId};
use serde::{Deserialize, Serialize};

/// Validated progress percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    /// Fully complete progress.
    pub const COMPLETE: Self = Self(100);

    /// Creates a validated progress value.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidProgress`] when the value exceeds
    /// 100.
    pub const fn new(value: u8) -> Result<Self, BoardDomainError> {
        if value > 100 {
            return Err(BoardDomainError::InvalidProgress(value));
        }
        Ok(Self(value))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns `true` at exactly 100 percent.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.0 == 100
    }
}

/// One status along the linear progress scale of a pipeline.
///
/// `step_order` values are monotonically informative but need not be
/// contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStep {
    status_id: StatusId,
    step_order: u32,
}

impl PipelineStep {
    /// Creates a pipeline step.
    #[must_use]
    pub const fn new(status_id: StatusId, step_order: u32) -> Self {
        Self {
            status_id,
            step_order,
        }
    }

    /// Returns the status this step maps to.
    #[must_use]
    pub const fn status_id(&self) -> StatusId {
        self.status_id
    }

    /// Returns the step's position on the progress scale.
    #[must_use]
    pub const fn step_order(&self) -> u32 {
        self.step_order
    }
}

/// Immutable, pre-validated ordered step sequence for one pipeline.
///
/// Constructed once per pipeline and passed by reference to
/// [`Pipeline::status_for`], keeping the mapping a pure function of two
/// inputs. Non-empty by construction: the first step is held apart from the
/// rest, so first/last lookups never need a fallible unwrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    first: PipelineStep,
    rest: Vec<PipelineStep>,
}

impl Pipeline {
    /// Creates a validated pipeline from an unordered step list.
    ///
    /// Steps are sorted by `step_order` ascending.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyPipeline`] when no steps are given
    /// and [`BoardDomainError::DuplicateStepOrder`] when two steps share the
    /// same order value.
    pub fn new(steps: impl IntoIterator<Item = PipelineStep>) -> Result<Self, BoardDomainError> {
        let mut sorted: Vec<PipelineStep> = steps.into_iter().collect();
        sorted.sort_by_key(PipelineStep::step_order);

        if let Some((_, duplicate)) = sorted
            .iter()
            .zip(sorted.iter().skip(1))
            .find(|(previous, current)| previous.step_order == current.step_order)
        {
            return Err(BoardDomainError::DuplicateStepOrder(duplicate.step_order));
        }

        let mut iter = sorted.into_iter();
        let Some(first) = iter.next() else {
            return Err(BoardDomainError::EmptyPipeline);
        };
        Ok(Self {
            first,
            rest: iter.collect(),
        })
    }

    /// Iterates the steps in ascending `step_order`.
    pub fn steps(&self) -> impl DoubleEndedIterator<Item = &PipelineStep> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// Returns the step with the greatest `step_order`.
    #[must_use]
    pub fn last_step(&self) -> &PipelineStep {
        self.rest.last().unwrap_or(&self.first)
    }

    /// Maps a progress percentage to the status of the matching step.
    ///
    /// The target step is `progress / 100 × max_step` rounded half up;
    /// the selected step is the last one whose `step_order` does not exceed
    /// the target, falling back to the first step. Full progress always
    /// selects the final step, regardless of the rounded target.
    #[must_use]
    pub fn status_for(&self, progress: Progress) -> StatusId {
        if progress.is_complete() {
            return self.last_step().status_id;
        }

        let max_step = u64::from(self.last_step().step_order);
        let target = (u64::from(progress.value()) * max_step + 50).div_euclid(100);

        self.steps()
            .filter(|step| u64::from(step.step_order) <= target)
            .next_back()
            .unwrap_or(&self.first)
            .status_id
    }
}
