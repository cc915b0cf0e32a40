use serde::Serialize;

/// Where the sequencer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerPhase {
    Editing,
    Completed,
}

/// Linear step counter shared by every wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSequencer {
    current: usize,
    total: usize,
    phase: SequencerPhase,
}

impl StepSequencer {
    /// A sequencer always has at least one step.
    pub fn new(total_steps: usize) -> Self {
        Self {
            current: 0,
            total: total_steps.max(1),
            phase: SequencerPhase::Editing,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == SequencerPhase::Completed
    }

    pub fn is_final_step(&self) -> bool {
        self.current + 1 == self.total
    }

    /// Jumps to `step` when it is in range; out-of-range targets are ignored.
    pub fn go_to(&mut self, step: usize) -> bool {
        if self.is_completed() || step >= self.total {
            return false;
        }
        self.current = step;
        true
    }

    /// Advances one step when `validate` accepts the current one.
    ///
    /// At the final step the index stays put; submitting is the only way forward.
    pub fn next<E, F>(&mut self, validate: F) -> Result<usize, E>
    where
        F: FnOnce(usize) -> Result<(), E>,
    {
        if self.is_completed() {
            return Ok(self.current);
        }
        validate(self.current)?;
        if !self.is_final_step() {
            self.current += 1;
        }
        Ok(self.current)
    }

    pub fn back(&mut self) -> usize {
        if !self.is_completed() {
            self.current = self.current.saturating_sub(1);
        }
        self.current
    }

    /// Enters the terminal success pseudo-step. Returns false if already there.
    pub fn complete(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.phase = SequencerPhase::Completed;
        true
    }

    pub fn progress_percent(&self) -> u8 {
        if self.is_completed() {
            return 100;
        }
        let percent = (self.current + 1) * 100 / self.total;
        percent.min(100) as u8
    }
}
