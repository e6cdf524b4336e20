pub mod flick;
pub mod reaction_time;
pub mod reflex;
pub mod survival;
pub mod track;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub use flick::{FlickEngine, FlickTarget};
pub use reaction_time::{ReactionPhase, ReactionTimeEngine};
pub use reflex::ReflexEngine;
pub use survival::SurvivalEngine;
pub use track::TrackEngine;

use crate::route::Route;

/// The five drills, in the order the mode picker lists them
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, ValueEnum, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    Survival,
    Flick,
    Track,
    Reflex,
    ReactionTime,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::Survival,
        GameMode::Flick,
        GameMode::Track,
        GameMode::Reflex,
        GameMode::ReactionTime,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GameMode::Survival => "Survival",
            GameMode::Flick => "Flick",
            GameMode::Track => "Tracking",
            GameMode::Reflex => "Reflex",
            GameMode::ReactionTime => "Reaction Time",
        }
    }

    pub fn blurb(self) -> &'static str {
        match self {
            GameMode::Survival => "Click targets before they vanish. Three lives.",
            GameMode::Flick => "Click the first target, then flick to the second.",
            GameMode::Track => "Keep the pointer on the moving target.",
            GameMode::Reflex => "Hit each target as it appears. One miss ends it.",
            GameMode::ReactionTime => "Click as soon as the screen turns green.",
        }
    }

    pub fn route(self) -> Route {
        match self {
            GameMode::Survival => Route::Survival,
            GameMode::Flick => Route::Flick,
            GameMode::Track => Route::Track,
            GameMode::Reflex => Route::Reflex,
            GameMode::ReactionTime => Route::ReactionTime,
        }
    }

    /// Drills with a persisted leaderboard
    pub fn has_leaderboard(self) -> bool {
        matches!(
            self,
            GameMode::Survival | GameMode::Track | GameMode::ReactionTime
        )
    }
}
