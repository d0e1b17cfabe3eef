use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    display::{PlayLabel, Presenter, ScoreText},
    driver::{AnimationDriver, Phase},
    face::Face,
    rng::FaceSource,
};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Ignore choice toggles while a spin is running or finishing.
    #[serde(default)]
    pub lock_choice_while_spinning: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinState {
    pub current_face: Face,
    pub chosen_face: Face,
    pub spinning: bool,
    pub phase: Phase,
    pub phase_in_flight: bool,
    pub score: u32,
    pub last_result: Option<Face>,
    pub flips: u32,
}

/// Drives the spin/stop/settle cycle of a single coin.
///
/// All three collaborators are injected: the presenter receives display
/// updates, the driver plays animation phases and the face source decides
/// every settled outcome.
pub struct SpinController<P, D, S> {
    state: SpinState,
    config: ControllerConfig,
    presenter: P,
    driver: D,
    source: S,
}

impl<P, D, S> SpinController<P, D, S>
where
    P: Presenter,
    D: AnimationDriver,
    S: FaceSource,
{
    pub fn new(presenter: P, driver: D, source: S) -> Self {
        Self::with_config(presenter, driver, source, ControllerConfig::default())
    }

    pub fn with_config(presenter: P, driver: D, source: S, config: ControllerConfig) -> Self {
        Self {
            state: SpinState::default(),
            config,
            presenter,
            driver,
            source,
        }
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Pushes the whole display state to the presenter.
    pub fn refresh(&mut self) {
        let chosen = self.state.chosen_face;
        self.presenter.set_coin_face(self.state.current_face);
        self.presenter
            .set_choice_enabled(!chosen.is_heads(), chosen.is_heads());
        self.presenter.set_play_button_label(self.play_label());
        self.presenter
            .set_score_text(ScoreText::from_score(self.state.score));
        if let Some(face) = self.state.last_result {
            self.presenter.set_latest_flip_text(face);
        }
    }

    /// Switches the prediction to the other face. Returns false when the
    /// toggle was ignored because choices are locked mid-spin.
    pub fn toggle_choice(&mut self) -> bool {
        if self.config.lock_choice_while_spinning && self.is_busy() {
            debug!("choice locked while the coin is spinning");
            return false;
        }
        self.state.chosen_face = self.state.chosen_face.flipped();
        let chosen = self.state.chosen_face;
        debug!(chosen = %chosen, "choice toggled");
        self.presenter
            .set_choice_enabled(!chosen.is_heads(), chosen.is_heads());
        true
    }

    pub fn toggle_play(&mut self) {
        if self.state.spinning {
            // The phase in flight runs to completion; the flag is read at the next boundary.
            self.state.spinning = false;
            self.presenter.set_play_button_label(PlayLabel::Flip);
            debug!(phase = ?self.state.phase, "stop requested");
            return;
        }

        self.state.spinning = true;
        self.presenter.set_play_button_label(PlayLabel::Stop);
        if self.state.phase_in_flight {
            debug!(phase = ?self.state.phase, "spin resumed before the cycle settled");
        } else {
            debug!("spin started");
            self.start_phase(Phase::Closing);
        }
    }

    /// Handles the end of the phase in flight. Returns the settled face when
    /// this boundary ended the spin.
    ///
    /// # Panics
    ///
    /// Panics if no phase is in flight.
    pub fn on_phase_complete(&mut self) -> Option<Face> {
        assert!(
            self.state.phase_in_flight,
            "phase completion reported with no phase in flight"
        );
        self.state.phase_in_flight = false;

        match self.state.phase.toggled() {
            Phase::Closing => {
                self.state.phase = Phase::Closing;
                if !self.state.spinning {
                    return Some(self.settle());
                }
                self.start_phase(Phase::Closing);
            }
            Phase::Opening => {
                self.state.current_face = self.state.current_face.flipped();
                self.start_phase(Phase::Opening);
            }
        }
        None
    }

    fn is_busy(&self) -> bool {
        self.state.spinning || self.state.phase_in_flight
    }

    fn play_label(&self) -> PlayLabel {
        if self.state.spinning {
            PlayLabel::Stop
        } else {
            PlayLabel::Flip
        }
    }

    fn start_phase(&mut self, phase: Phase) {
        assert!(
            !self.state.phase_in_flight,
            "phase started while another is in flight"
        );
        self.state.phase = phase;
        self.state.phase_in_flight = true;
        self.presenter.set_coin_face(self.state.current_face);
        self.driver.play_phase(phase.easing());
    }

    fn settle(&mut self) -> Face {
        let face = self.source.next_face();
        self.state.current_face = face;
        self.state.last_result = Some(face);
        self.state.flips = self.state.flips.saturating_add(1);
        if face == self.state.chosen_face {
            self.state.score = self.state.score.saturating_add(1);
        }
        info!(
            result = %face,
            chosen = %self.state.chosen_face,
            score = self.state.score,
            "coin settled"
        );

        self.presenter.set_coin_face(face);
        self.presenter
            .set_score_text(ScoreText::from_score(self.state.score));
        self.presenter.set_latest_flip_text(face);
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{driver::QueuedDriver, rng::FixedFaceSource};

    #[derive(Default)]
    struct Silent;

    impl Presenter for Silent {
        fn set_coin_face(&mut self, _face: Face) {}
        fn set_choice_enabled(&mut self, _heads_enabled: bool, _tails_enabled: bool) {}
        fn set_play_button_label(&mut self, _label: PlayLabel) {}
        fn set_score_text(&mut self, _score: ScoreText) {}
        fn set_latest_flip_text(&mut self, _face: Face) {}
    }

    fn controller(face: Face) -> SpinController<Silent, QueuedDriver, FixedFaceSource> {
        SpinController::new(Silent, QueuedDriver::new(), FixedFaceSource::always(face))
    }

    #[test]
    fn test_initial_state() {
        let c = controller(Face::Heads);
        let s = c.state();
        assert_eq!(s.current_face, Face::Heads);
        assert_eq!(s.chosen_face, Face::Heads);
        assert!(!s.spinning);
        assert!(!s.phase_in_flight);
        assert_eq!(s.score, 0);
        assert_eq!(s.last_result, None);
    }

    #[test]
    fn test_full_cycle_settles() {
        let mut c = controller(Face::Heads);
        c.toggle_play();
        assert_eq!(c.driver_mut().take(), Some(crate::Easing::Accelerate));
        assert_eq!(c.on_phase_complete(), None);
        assert_eq!(c.state().current_face, Face::Tails);
        c.toggle_play();
        assert_eq!(c.driver_mut().take(), Some(crate::Easing::DecelerateReversed));
        assert_eq!(c.on_phase_complete(), Some(Face::Heads));
        assert_eq!(c.state().score, 1);
        assert_eq!(c.driver().pending(), None);
    }

    #[test]
    #[should_panic(expected = "no phase in flight")]
    fn test_completion_without_phase_panics() {
        let mut c = controller(Face::Heads);
        c.on_phase_complete();
    }
}
