use crate::games::GameMode;

/// Screens reachable from the menus. Entering a game route always lands on
/// that game's settings phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    GameModes,
    Survival,
    Flick,
    Track,
    Reflex,
    ReactionTime,
    /// Crosshair and sound preferences
    Settings,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Home,
        Route::GameModes,
        Route::Survival,
        Route::Flick,
        Route::Track,
        Route::Reflex,
        Route::ReactionTime,
        Route::Settings,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::GameModes => "/game-modes",
            Route::Survival => "/survival",
            Route::Flick => "/flick",
            Route::Track => "/track",
            Route::Reflex => "/reflex",
            Route::ReactionTime => "/reaction-time",
            Route::Settings => "/settings",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn game(self) -> Option<GameMode> {
        match self {
            Route::Survival => Some(GameMode::Survival),
            Route::Flick => Some(GameMode::Flick),
            Route::Track => Some(GameMode::Track),
            Route::Reflex => Some(GameMode::Reflex),
            Route::ReactionTime => Some(GameMode::ReactionTime),
            _ => None,
        }
    }

    /// Where "back" leads
    pub fn parent(self) -> Option<Route> {
        match self {
            Route::Home => None,
            Route::GameModes | Route::Settings => Some(Route::Home),
            _ => Some(Route::GameModes),
        }
    }
}
