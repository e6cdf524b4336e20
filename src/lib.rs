// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod crosshair;
pub mod engine;
pub mod error;
pub mod games;
pub mod route;
pub mod runtime;
pub mod scores;
pub mod session;
pub mod settings;
pub mod sound;
pub mod timer;
pub mod util;

pub use engine::{advance, Engine, PlayArea, Point};
pub use games::GameMode;
pub use session::{Phase, SoundCue};
pub use timer::Millis;
