use std::io::Write;

use coinflip_core::{Face, PlayLabel, Presenter, ScoreText};
use coinflip_shared::Strings;
use tracing::warn;

const COIN_WIDTH: usize = 9;

/// Single-line terminal view of the game. Every update redraws the line in
/// place.
pub struct TerminalPresenter<W: Write> {
    out: W,
    face: Face,
    width: f32,
    heads_enabled: bool,
    tails_enabled: bool,
    label: PlayLabel,
    score: ScoreText,
    latest: Option<Face>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            face: Face::Heads,
            width: 1.0,
            heads_enabled: false,
            tails_enabled: true,
            label: PlayLabel::Flip,
            score: ScoreText::Zero,
            latest: None,
        }
    }

    pub fn heads_enabled(&self) -> bool {
        self.heads_enabled
    }

    pub fn tails_enabled(&self) -> bool {
        self.tails_enabled
    }

    pub fn draw_frame(&mut self, width: f32) {
        self.width = width.clamp(0.0, 1.0);
        self.redraw();
    }

    /// Prints `text` on its own line, then restores the game line below it.
    pub fn message(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "\r\x1b[2K{text}") {
            warn!(%err, "terminal write failed");
        }
        self.redraw();
    }

    /// Moves past the game line so later output starts on a fresh line.
    pub fn end_line(&mut self) {
        if let Err(err) = writeln!(self.out).and_then(|_| self.out.flush()) {
            warn!(%err, "terminal write failed");
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn coin(&self) -> String {
        let filled = (self.width * COIN_WIDTH as f32).round() as usize;
        let body = if filled == 0 {
            "|".to_string()
        } else {
            let mark = if self.face.is_heads() { "H" } else { "T" };
            mark.repeat(filled.min(COIN_WIDTH))
        };
        format!("({body:^COIN_WIDTH$})")
    }

    fn line(&self) -> String {
        // The disabled choice button is the one currently picked.
        let pick = if self.heads_enabled { Face::Tails } else { Face::Heads };
        let mut line = format!(
            "{}  pick: {}  [{}]  {}",
            self.coin(),
            Strings::face(pick),
            Strings::play_label(self.label),
            Strings::score(self.score),
        );
        if let Some(face) = self.latest {
            line.push_str("  ");
            line.push_str(&Strings::latest_flip(face));
        }
        line
    }

    fn redraw(&mut self) {
        let line = self.line();
        let res = write!(self.out, "\r\x1b[2K{line}").and_then(|_| self.out.flush());
        if let Err(err) = res {
            warn!(%err, "terminal write failed");
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn set_coin_face(&mut self, face: Face) {
        self.face = face;
        self.redraw();
    }

    fn set_choice_enabled(&mut self, heads_enabled: bool, tails_enabled: bool) {
        self.heads_enabled = heads_enabled;
        self.tails_enabled = tails_enabled;
        self.redraw();
    }

    fn set_play_button_label(&mut self, label: PlayLabel) {
        self.label = label;
        self.redraw();
    }

    fn set_score_text(&mut self, score: ScoreText) {
        self.score = score;
        self.redraw();
    }

    fn set_latest_flip_text(&mut self, face: Face) {
        self.latest = Some(face);
        self.width = 1.0;
        self.redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_line(p: TerminalPresenter<Vec<u8>>) -> String {
        let out = String::from_utf8(p.into_inner()).unwrap();
        out.rsplit("\x1b[2K").next().unwrap_or_default().to_string()
    }

    #[test]
    fn renders_score_and_latest_flip() {
        let mut p = TerminalPresenter::new(Vec::new());
        p.set_choice_enabled(true, false);
        p.set_score_text(ScoreText::Points(2));
        p.set_latest_flip_text(Face::Tails);
        p.set_coin_face(Face::Tails);
        let line = last_line(p);
        assert!(line.contains("pick: Tails"), "{line}");
        assert!(line.contains("Score: 2"), "{line}");
        assert!(line.contains("Latest flip: Tails"), "{line}");
        assert!(line.starts_with("(TTTTTTTTT)"), "{line}");
    }

    #[test]
    fn edge_on_frame_draws_a_bar() {
        let mut p = TerminalPresenter::new(Vec::new());
        p.set_play_button_label(PlayLabel::Stop);
        p.draw_frame(0.0);
        let line = last_line(p);
        assert!(line.starts_with("(    |    )"), "{line}");
        assert!(line.contains("[Stop]"), "{line}");
        assert!(line.contains("No points yet"), "{line}");
    }
}
