pub mod controller;
pub mod display;
pub mod driver;
pub mod face;
pub mod rng;

pub use crate::controller::{ControllerConfig, SpinController, SpinState};
pub use crate::display::{PlayLabel, Presenter, ScoreText};
pub use crate::driver::{AnimationDriver, Easing, Phase, QueuedDriver};
pub use crate::face::Face;
pub use crate::rng::{
    derive_hash_hex, derive_unit_float, verify_flip, FaceSource, FixedFaceSource, OsFaceSource,
    SeededFaceSource,
};
