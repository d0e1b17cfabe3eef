use std::time::Duration;

use coinflip_core::{AnimationDriver, Easing};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverEvent {
    /// Coin width relative to face-on, in [0, 1].
    Frame { width: f32 },
    PhaseComplete,
}

/// Progress of the scale animation at time `t` in [0, 1].
pub fn interpolation(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        Easing::Accelerate => t * t,
        // reversed decelerate: 1 - (1 - (1 - t)^2)
        Easing::DecelerateReversed => (1.0 - t) * (1.0 - t),
    }
}

/// The coin scales horizontally from full width to edge-on, so the drawn
/// width is whatever the interpolation has not consumed yet.
pub fn coin_width(easing: Easing, t: f32) -> f32 {
    1.0 - interpolation(easing, t)
}

/// Plays phases on tokio timers and reports back through a channel that the
/// session loop drains on the same thread as every other event.
pub struct TokioDriver {
    events: UnboundedSender<DriverEvent>,
    phase: Duration,
    frames: u32,
}

impl TokioDriver {
    pub fn new(events: UnboundedSender<DriverEvent>, phase: Duration, frames: u32) -> Self {
        Self {
            events,
            phase,
            frames: frames.max(1),
        }
    }
}

impl AnimationDriver for TokioDriver {
    fn play_phase(&mut self, easing: Easing) {
        let events = self.events.clone();
        let frames = self.frames;
        let step = self.phase / frames;
        tokio::spawn(async move {
            for i in 1..=frames {
                tokio::time::sleep(step).await;
                let width = coin_width(easing, i as f32 / frames as f32);
                if events.send(DriverEvent::Frame { width }).is_err() {
                    debug!("session gone, dropping animation");
                    return;
                }
            }
            let _ = events.send(DriverEvent::PhaseComplete);
        });
    }
}
