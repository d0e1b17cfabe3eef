use chrono::{DateTime, Utc};
use coinflip_core::{Face, PlayLabel, ScoreText, SpinState};
use serde::{Deserialize, Serialize};

/// Resolved English strings for everything the controller asks a host to show.
pub struct Strings;

impl Strings {
    pub const CHOICE_LOCKED: &'static str = "The pick is locked while the coin spins";

    pub fn face(face: Face) -> &'static str {
        match face {
            Face::Heads => "Heads",
            Face::Tails => "Tails",
        }
    }

    pub fn play_label(label: PlayLabel) -> &'static str {
        match label {
            PlayLabel::Flip => "Flip",
            PlayLabel::Stop => "Stop",
        }
    }

    pub fn score(score: ScoreText) -> String {
        match score {
            ScoreText::Zero => "No points yet".to_string(),
            ScoreText::Points(n) => format!("Score: {n}"),
        }
    }

    pub fn latest_flip(face: Face) -> String {
        format!("Latest flip: {}", Self::face(face))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    ChooseHeads,
    ChooseTails,
    /// The play/stop button.
    Play,
    Help,
    Quit,
}

impl InputCommand {
    pub fn parse(line: &str) -> Result<Self, InputError> {
        match line.trim().to_ascii_lowercase().as_str() {
            "h" | "heads" => Ok(InputCommand::ChooseHeads),
            "t" | "tails" => Ok(InputCommand::ChooseTails),
            "" | "p" | "play" | "s" | "stop" | "f" | "flip" => Ok(InputCommand::Play),
            "?" | "help" => Ok(InputCommand::Help),
            "q" | "quit" | "exit" => Ok(InputCommand::Quit),
            other => Err(InputError::Unknown(other.to_string())),
        }
    }

    pub const HELP: &'static str =
        "h = pick heads, t = pick tails, enter = flip/stop, q = quit, ? = help";
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command: {0:?}")]
    Unknown(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionSummary {
    pub chosen_face: Face,
    pub flips: u32,
    pub score: u32,
    pub heads: u32,
    pub tails: u32,
    pub last_result: Option<Face>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn new(started_at: DateTime<Utc>, chosen_face: Face) -> Self {
        Self {
            chosen_face,
            flips: 0,
            score: 0,
            heads: 0,
            tails: 0,
            last_result: None,
            started_at,
            finished_at: started_at,
        }
    }

    pub fn record(&mut self, face: Face) {
        match face {
            Face::Heads => self.heads += 1,
            Face::Tails => self.tails += 1,
        }
    }

    /// Copies the controller's counters and stamps the finish time.
    pub fn finish(&mut self, state: &SpinState, finished_at: DateTime<Utc>) {
        self.chosen_face = state.chosen_face;
        self.flips = state.flips;
        self.score = state.score;
        self.last_result = state.last_result;
        self.finished_at = finished_at;
    }

    pub fn win_rate(&self) -> f64 {
        if self.flips == 0 {
            0.0
        } else {
            self.score as f64 / self.flips as f64
        }
    }
}
