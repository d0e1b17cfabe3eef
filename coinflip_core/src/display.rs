use serde::{Deserialize, Serialize};

use crate::face::Face;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayLabel {
    #[default]
    Flip,
    Stop,
}

/// Which score message to show. The wording itself belongs to the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScoreText {
    Zero,
    Points(u32),
}

impl ScoreText {
    pub fn from_score(score: u32) -> Self {
        if score == 0 {
            ScoreText::Zero
        } else {
            ScoreText::Points(score)
        }
    }
}

/// Outbound surface of the controller. Hosts render whatever they are told;
/// they never write back into the game state.
pub trait Presenter {
    fn set_coin_face(&mut self, face: Face);
    /// Exactly one of the two is true.
    fn set_choice_enabled(&mut self, heads_enabled: bool, tails_enabled: bool);
    fn set_play_button_label(&mut self, label: PlayLabel);
    fn set_score_text(&mut self, score: ScoreText);
    fn set_latest_flip_text(&mut self, face: Face);
}
