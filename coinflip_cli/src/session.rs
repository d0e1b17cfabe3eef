use std::io::{self, Write};
use std::time::Duration;

use anyhow::bail;
use chrono::Utc;
use coinflip_core::{
    ControllerConfig, Face, FaceSource, OsFaceSource, PlayLabel, Presenter,
    QueuedDriver, ScoreText, SeededFaceSource, SpinController,
};
use coinflip_shared::{InputCommand, SessionSummary, Strings};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::animation::{DriverEvent, TokioDriver};
use crate::terminal::TerminalPresenter;

/// Where settle outcomes come from for this run.
pub enum Source {
    Os(OsFaceSource),
    Seeded(SeededFaceSource),
}

impl FaceSource for Source {
    fn next_face(&mut self) -> Face {
        match self {
            Source::Os(src) => src.next_face(),
            Source::Seeded(src) => src.next_face(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlayOptions {
    pub phase: Duration,
    pub frames: u32,
    pub config: ControllerConfig,
}

/// Interactive game on the process terminal.
pub async fn play(source: Source, opts: PlayOptions) -> anyhow::Result<SessionSummary> {
    play_with(BufReader::new(tokio::io::stdin()), io::stdout(), source, opts).await
}

/// Interactive game reading commands from `input` and drawing to `out`.
/// Ends on `quit` or when input closes; a spin still running at end of input
/// is stopped and allowed to settle.
pub async fn play_with<R, W, S>(
    input: R,
    out: W,
    source: S,
    opts: PlayOptions,
) -> anyhow::Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: FaceSource,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = TokioDriver::new(tx, opts.phase, opts.frames);
    let mut game =
        SpinController::with_config(TerminalPresenter::new(out), driver, source, opts.config);
    let mut summary = SessionSummary::new(Utc::now(), game.state().chosen_face);

    game.presenter_mut().message(InputCommand::HELP);
    game.refresh();

    let mut lines = input.lines();
    let mut input_open = true;
    loop {
        tokio::select! {
            Some(event) = rx.recv() => {
                match event {
                    DriverEvent::Frame { width } => game.presenter_mut().draw_frame(width),
                    DriverEvent::PhaseComplete => {
                        if let Some(face) = game.on_phase_complete() {
                            summary.record(face);
                        }
                    }
                }
                if !input_open && !game.state().phase_in_flight {
                    break;
                }
            }
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    debug!("input closed");
                    input_open = false;
                    if game.state().spinning {
                        game.toggle_play();
                    }
                    if !game.state().phase_in_flight {
                        break;
                    }
                    continue;
                };
                match InputCommand::parse(&line) {
                    Ok(InputCommand::ChooseHeads) => {
                        if game.presenter().heads_enabled() && !game.toggle_choice() {
                            game.presenter_mut().message(Strings::CHOICE_LOCKED);
                        }
                    }
                    Ok(InputCommand::ChooseTails) => {
                        if game.presenter().tails_enabled() && !game.toggle_choice() {
                            game.presenter_mut().message(Strings::CHOICE_LOCKED);
                        }
                    }
                    Ok(InputCommand::Play) => game.toggle_play(),
                    Ok(InputCommand::Help) => game.presenter_mut().message(InputCommand::HELP),
                    Ok(InputCommand::Quit) => break,
                    Err(err) => game.presenter_mut().message(&err.to_string()),
                }
            }
            else => break,
        }
    }
    game.presenter_mut().end_line();

    summary.finish(game.state(), Utc::now());
    info!(flips = summary.flips, score = summary.score, "session finished");
    Ok(summary)
}

/// Presenter for headless runs.
struct Headless;

impl Presenter for Headless {
    fn set_coin_face(&mut self, _face: Face) {}
    fn set_choice_enabled(&mut self, _heads_enabled: bool, _tails_enabled: bool) {}
    fn set_play_button_label(&mut self, _label: PlayLabel) {}
    fn set_score_text(&mut self, _score: ScoreText) {}
    fn set_latest_flip_text(&mut self, _face: Face) {}
}

/// Completions needed for `cycles` full spin cycles.
fn spin_phases(cycles: u32) -> u64 {
    u64::from(cycles) * 2
}

fn advance<P: Presenter, S: FaceSource>(
    game: &mut SpinController<P, QueuedDriver, S>,
) -> anyhow::Result<Option<Face>> {
    if game.driver_mut().take().is_none() {
        bail!("no animation phase pending");
    }
    Ok(game.on_phase_complete())
}

/// Plays `flips` games back to back without any rendering. Each flip spins
/// for `cycles` full cycles before stop is pressed.
pub fn simulate<S: FaceSource>(
    source: S,
    flips: u32,
    choice: Face,
    cycles: u32,
    config: ControllerConfig,
) -> anyhow::Result<SessionSummary> {
    let mut game = SpinController::with_config(Headless, QueuedDriver::new(), source, config);
    if game.state().chosen_face != choice {
        game.toggle_choice();
    }
    let mut summary = SessionSummary::new(Utc::now(), choice);

    for _ in 0..flips {
        game.toggle_play();
        for _ in 0..spin_phases(cycles) {
            if advance(&mut game)?.is_some() {
                bail!("coin settled while still spinning");
            }
        }
        game.toggle_play();
        let face = loop {
            if let Some(face) = advance(&mut game)? {
                break face;
            }
        };
        summary.record(face);
    }

    summary.finish(game.state(), Utc::now());
    debug!(phases = game.driver().played(), "simulation finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinflip_core::FixedFaceSource;

    fn fast_opts(config: ControllerConfig) -> PlayOptions {
        PlayOptions {
            phase: Duration::from_millis(60),
            frames: 2,
            config,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_input_stops_spin_and_waits_for_settle() {
        let mut out = Vec::new();
        let summary = play_with(
            &b"t\n\n"[..],
            &mut out,
            FixedFaceSource::always(Face::Tails),
            fast_opts(ControllerConfig::default()),
        )
        .await
        .unwrap();
        assert_eq!(summary.chosen_face, Face::Tails);
        assert_eq!(summary.flips, 1);
        assert_eq!(summary.tails, 1);
        assert_eq!(summary.score, 1);
        assert_eq!(summary.last_result, Some(Face::Tails));

        let screen = String::from_utf8(out).unwrap();
        assert!(screen.contains("Latest flip: Tails"), "{screen}");
        assert!(screen.ends_with('\n'));
    }

    #[tokio::test(start_paused = true)]
    async fn quit_leaves_without_flipping() {
        let mut out = Vec::new();
        let summary = play_with(
            &b"h\nq\n\n"[..],
            &mut out,
            FixedFaceSource::always(Face::Heads),
            fast_opts(ControllerConfig::default()),
        )
        .await
        .unwrap();
        // heads is already picked, so its button is disabled
        assert_eq!(summary.chosen_face, Face::Heads);
        assert_eq!(summary.flips, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn locked_pick_reports_refusal() {
        let mut out = Vec::new();
        let config = ControllerConfig {
            lock_choice_while_spinning: true,
        };
        let summary = play_with(
            &b"\nt\n"[..],
            &mut out,
            FixedFaceSource::always(Face::Heads),
            fast_opts(config),
        )
        .await
        .unwrap();
        assert_eq!(summary.chosen_face, Face::Heads);
        assert_eq!(summary.score, 1);

        let screen = String::from_utf8(out).unwrap();
        assert!(screen.contains(Strings::CHOICE_LOCKED), "{screen}");
    }

    #[test]
    fn spin_phases_does_not_overflow() {
        assert_eq!(spin_phases(0), 0);
        assert_eq!(spin_phases(3), 6);
        assert_eq!(spin_phases(u32::MAX), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn simulate_counts_every_flip() {
        let summary = simulate(
            SeededFaceSource::new("server", "client", 0),
            250,
            Face::Tails,
            2,
            ControllerConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.flips, 250);
        assert_eq!(summary.heads + summary.tails, 250);
        assert_eq!(summary.score, summary.tails);
        assert_eq!(summary.chosen_face, Face::Tails);
    }

    #[test]
    fn simulate_with_matching_source_wins_every_time() {
        let summary = simulate(
            FixedFaceSource::always(Face::Heads),
            10,
            Face::Heads,
            0,
            ControllerConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.score, 10);
        assert_eq!(summary.win_rate(), 1.0);
        assert_eq!(summary.last_result, Some(Face::Heads));
    }

    #[test]
    fn seeded_source_replays_identically() {
        let run = || {
            simulate(
                Source::Seeded(SeededFaceSource::new("s", "c", 5)),
                40,
                Face::Heads,
                1,
                ControllerConfig::default(),
            )
            .unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!((a.heads, a.tails, a.score), (b.heads, b.tails, b.score));
    }
}
