use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::timer::Millis;

/// A closed set of options the settings screens can step through.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    const ALL: &'static [Self];

    fn next(self) -> Self {
        let all = Self::ALL;
        let idx = all.iter().position(|c| *c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    fn prev(self) -> Self {
        let all = Self::ALL;
        let idx = all.iter().position(|c| *c == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TargetSize {
    /// Diameter in pixels
    pub fn px(self) -> u32 {
        match self {
            TargetSize::Small => 30,
            TargetSize::Medium => 50,
            TargetSize::Large => 70,
        }
    }
}

impl Choice for TargetSize {
    const ALL: &'static [Self] = &[TargetSize::Small, TargetSize::Medium, TargetSize::Large];
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Choice for Difficulty {
    const ALL: &'static [Self] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// Survival pacing for one difficulty. All values are in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    /// Lifetime of a single target
    pub target_speed: f64,
    pub initial_spawn_interval: f64,
    pub min_spawn_interval: f64,
    /// Seconds shaved off the spawn interval per second survived
    pub spawn_interval_decrease_rate: f64,
}

impl DifficultyConfig {
    pub fn spawn_interval(&self, time_elapsed_secs: f64) -> f64 {
        let decrease = time_elapsed_secs * self.spawn_interval_decrease_rate;
        (self.initial_spawn_interval - decrease).max(self.min_spawn_interval)
    }

    pub fn spawn_interval_ms(&self, time_elapsed_secs: f64) -> Millis {
        (self.spawn_interval(time_elapsed_secs) * 1000.0).round() as Millis
    }

    pub fn target_lifetime_ms(&self) -> Millis {
        (self.target_speed * 1000.0).round() as Millis
    }
}

impl Difficulty {
    pub fn config(self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                target_speed: 3.0,
                initial_spawn_interval: 2.0,
                min_spawn_interval: 1.0,
                spawn_interval_decrease_rate: 0.02,
            },
            Difficulty::Medium => DifficultyConfig {
                target_speed: 2.5,
                initial_spawn_interval: 1.5,
                min_spawn_interval: 0.5,
                spawn_interval_decrease_rate: 0.025,
            },
            Difficulty::Hard => DifficultyConfig {
                target_speed: 2.0,
                initial_spawn_interval: 1.0,
                min_spawn_interval: 0.2,
                spawn_interval_decrease_rate: 0.03,
            },
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FlickDistance {
    Close,
    #[default]
    Medium,
    Far,
}

impl FlickDistance {
    /// Offset between the two targets, in percent of the play area
    pub fn percent(self) -> f64 {
        match self {
            FlickDistance::Close => 20.0,
            FlickDistance::Medium => 40.0,
            FlickDistance::Far => 60.0,
        }
    }
}

impl Choice for FlickDistance {
    const ALL: &'static [Self] = &[FlickDistance::Close, FlickDistance::Medium, FlickDistance::Far];
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrackSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl TrackSpeed {
    pub fn multiplier(self) -> f64 {
        match self {
            TrackSpeed::Slow => 1.0,
            TrackSpeed::Medium => 2.0,
            TrackSpeed::Fast => 3.0,
        }
    }
}

impl Choice for TrackSpeed {
    const ALL: &'static [Self] = &[TrackSpeed::Slow, TrackSpeed::Medium, TrackSpeed::Fast];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, strum_macros::Display)]
pub enum TrackGameTime {
    #[value(name = "15")]
    #[strum(serialize = "15s")]
    Secs15,
    #[default]
    #[value(name = "30")]
    #[strum(serialize = "30s")]
    Secs30,
    #[value(name = "45")]
    #[strum(serialize = "45s")]
    Secs45,
    #[value(name = "60")]
    #[strum(serialize = "60s")]
    Secs60,
}

impl TrackGameTime {
    pub fn secs(self) -> u32 {
        match self {
            TrackGameTime::Secs15 => 15,
            TrackGameTime::Secs30 => 30,
            TrackGameTime::Secs45 => 45,
            TrackGameTime::Secs60 => 60,
        }
    }
}

impl Choice for TrackGameTime {
    const ALL: &'static [Self] = &[
        TrackGameTime::Secs15,
        TrackGameTime::Secs30,
        TrackGameTime::Secs45,
        TrackGameTime::Secs60,
    ];
}

/// Round counts offered by the reaction-time test. Stored as a plain number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum RoundsOption {
    #[value(name = "1")]
    #[strum(serialize = "1")]
    One,
    #[value(name = "3")]
    #[strum(serialize = "3")]
    Three,
    #[default]
    #[value(name = "5")]
    #[strum(serialize = "5")]
    Five,
    #[value(name = "10")]
    #[strum(serialize = "10")]
    Ten,
}

impl RoundsOption {
    pub fn count(self) -> u32 {
        match self {
            RoundsOption::One => 1,
            RoundsOption::Three => 3,
            RoundsOption::Five => 5,
            RoundsOption::Ten => 10,
        }
    }
}

impl From<RoundsOption> for u32 {
    fn from(r: RoundsOption) -> Self {
        r.count()
    }
}

impl TryFrom<u32> for RoundsOption {
    type Error = String;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(RoundsOption::One),
            3 => Ok(RoundsOption::Three),
            5 => Ok(RoundsOption::Five),
            10 => Ok(RoundsOption::Ten),
            other => Err(format!("unsupported round count: {other}")),
        }
    }
}

impl Choice for RoundsOption {
    const ALL: &'static [Self] = &[
        RoundsOption::One,
        RoundsOption::Three,
        RoundsOption::Five,
        RoundsOption::Ten,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurvivalSettings {
    pub difficulty: Difficulty,
    pub target_size: TargetSize,
}

pub const FLICK_ROUND_CHOICES: [u32; 4] = [5, 10, 15, 20];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickSettings {
    pub target_size: TargetSize,
    pub distance: FlickDistance,
    pub rounds: u32,
}

impl Default for FlickSettings {
    fn default() -> Self {
        Self {
            target_size: TargetSize::Medium,
            distance: FlickDistance::Medium,
            rounds: 10,
        }
    }
}

impl FlickSettings {
    /// Steps through the round counts offered on the settings screen
    pub fn next_rounds(&self) -> u32 {
        let idx = FLICK_ROUND_CHOICES
            .iter()
            .position(|r| *r == self.rounds)
            .map_or(0, |i| (i + 1) % FLICK_ROUND_CHOICES.len());
        FLICK_ROUND_CHOICES[idx]
    }

    pub fn prev_rounds(&self) -> u32 {
        let n = FLICK_ROUND_CHOICES.len();
        let idx = FLICK_ROUND_CHOICES
            .iter()
            .position(|r| *r == self.rounds)
            .map_or(0, |i| (i + n - 1) % n);
        FLICK_ROUND_CHOICES[idx]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReflexSettings {
    pub target_size: TargetSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReactionTimeSettings {
    pub rounds: RoundsOption,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackSettings {
    pub target_size: TargetSize,
    pub speed: TrackSpeed,
    pub game_time: TrackGameTime,
}
