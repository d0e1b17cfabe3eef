use serde::{Deserialize, Serialize};

/// One half of a spin cycle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Coin narrowing to edge-on.
    #[default]
    Closing,
    /// Coin widening back to face-on.
    Opening,
}

impl Phase {
    pub fn toggled(self) -> Self {
        match self {
            Phase::Closing => Phase::Opening,
            Phase::Opening => Phase::Closing,
        }
    }

    pub fn easing(self) -> Easing {
        match self {
            Phase::Closing => Easing::Accelerate,
            Phase::Opening => Easing::DecelerateReversed,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Easing {
    Accelerate,
    DecelerateReversed,
}

/// Plays a single phase of the flip animation.
///
/// Completion is reported by calling
/// [`SpinController::on_phase_complete`](crate::SpinController::on_phase_complete)
/// once the phase has finished. The controller never requests a second
/// phase before the first one has been reported complete.
pub trait AnimationDriver {
    fn play_phase(&mut self, easing: Easing);
}

/// Driver that only records the requested phase. Whoever owns the
/// controller completes the phase by taking it and calling
/// `on_phase_complete`, which makes it suitable for headless runs.
#[derive(Debug, Default, Clone)]
pub struct QueuedDriver {
    pending: Option<Easing>,
    played: u64,
}

impl QueuedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<Easing> {
        self.pending
    }

    pub fn take(&mut self) -> Option<Easing> {
        self.pending.take()
    }

    /// Total number of phases requested so far.
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AnimationDriver for QueuedDriver {
    fn play_phase(&mut self, easing: Easing) {
        assert!(
            self.pending.is_none(),
            "phase requested while another is still pending"
        );
        self.pending = Some(easing);
        self.played += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_alternate_and_pick_easing() {
        assert_eq!(Phase::Closing.toggled(), Phase::Opening);
        assert_eq!(Phase::Opening.toggled(), Phase::Closing);
        assert_eq!(Phase::Closing.easing(), Easing::Accelerate);
        assert_eq!(Phase::Opening.easing(), Easing::DecelerateReversed);
    }

    #[test]
    fn queued_driver_holds_one_phase() {
        let mut driver = QueuedDriver::new();
        driver.play_phase(Easing::Accelerate);
        assert_eq!(driver.pending(), Some(Easing::Accelerate));
        assert_eq!(driver.take(), Some(Easing::Accelerate));
        assert_eq!(driver.take(), None);
        assert_eq!(driver.played(), 1);
    }

    #[test]
    #[should_panic(expected = "still pending")]
    fn queued_driver_rejects_overlapping_phases() {
        let mut driver = QueuedDriver::new();
        driver.play_phase(Easing::Accelerate);
        driver.play_phase(Easing::DecelerateReversed);
    }
}
