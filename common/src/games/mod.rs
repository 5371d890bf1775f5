mod broadcaster;
mod pace;
mod session_rng;

pub mod battle;
pub mod campaign;
pub mod match3;

pub use broadcaster::GameBroadcaster;
pub use pace::{Pace, PacingSettings};
pub use session_rng::SessionRng;
