use serde::{Deserialize, Serialize};

use crate::config::saturating_u8;
use crate::settings::Choice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CrosshairColor {
    #[default]
    Green,
    Red,
    Yellow,
    Cyan,
    Magenta,
    White,
    Orange,
}

impl CrosshairColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            CrosshairColor::Green => (0x00, 0xff, 0x00),
            CrosshairColor::Red => (0xff, 0x00, 0x00),
            CrosshairColor::Yellow => (0xff, 0xff, 0x00),
            CrosshairColor::Cyan => (0x00, 0xff, 0xff),
            CrosshairColor::Magenta => (0xff, 0x00, 0xff),
            CrosshairColor::White => (0xff, 0xff, 0xff),
            CrosshairColor::Orange => (0xff, 0x88, 0x00),
        }
    }
}

impl Choice for CrosshairColor {
    const ALL: &'static [Self] = &[
        CrosshairColor::Green,
        CrosshairColor::Red,
        CrosshairColor::Yellow,
        CrosshairColor::Cyan,
        CrosshairColor::Magenta,
        CrosshairColor::White,
        CrosshairColor::Orange,
    ];
}

/// Cursor drawn over the play area. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrosshairConfig {
    /// 0-100
    #[serde(deserialize_with = "saturating_u8")]
    pub opacity: u8,
    pub color: CrosshairColor,
    pub show_lines: bool,
    /// 0-20 px
    #[serde(deserialize_with = "saturating_u8")]
    pub line_gap: u8,
    /// 1-30 px
    #[serde(deserialize_with = "saturating_u8")]
    pub line_length: u8,
    /// 1-10 px
    #[serde(deserialize_with = "saturating_u8")]
    pub line_thickness: u8,
    /// No top line
    pub t_style: bool,
    pub show_dot: bool,
    /// 1-10 px
    #[serde(deserialize_with = "saturating_u8")]
    pub dot_radius: u8,
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            opacity: 100,
            color: CrosshairColor::Green,
            show_lines: true,
            line_gap: 7,
            line_length: 20,
            line_thickness: 3,
            t_style: true,
            show_dot: true,
            dot_radius: 2,
        }
    }
}

impl CrosshairConfig {
    pub fn clamp(mut self) -> Self {
        self.opacity = self.opacity.min(100);
        self.line_gap = self.line_gap.min(20);
        self.line_length = self.line_length.clamp(1, 30);
        self.line_thickness = self.line_thickness.clamp(1, 10);
        self.dot_radius = self.dot_radius.clamp(1, 10);
        self
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0 && (self.show_dot || self.show_lines)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairPreset {
    pub name: &'static str,
    pub config: CrosshairConfig,
}

pub fn presets() -> Vec<CrosshairPreset> {
    let base = CrosshairConfig::default();
    vec![
        CrosshairPreset {
            name: "Default",
            config: base,
        },
        CrosshairPreset {
            name: "Dot Only",
            config: CrosshairConfig {
                show_lines: false,
                show_dot: true,
                dot_radius: 4,
                color: CrosshairColor::White,
                ..base
            },
        },
        CrosshairPreset {
            name: "Classic",
            config: CrosshairConfig {
                t_style: false,
                show_dot: false,
                line_gap: 0,
                line_length: 15,
                color: CrosshairColor::Cyan,
                ..base
            },
        },
        CrosshairPreset {
            name: "Plus",
            config: CrosshairConfig {
                t_style: false,
                show_dot: true,
                line_gap: 3,
                line_length: 10,
                line_thickness: 2,
                dot_radius: 2,
                color: CrosshairColor::Yellow,
                ..base
            },
        },
        CrosshairPreset {
            name: "T-Style",
            config: CrosshairConfig {
                t_style: true,
                show_dot: false,
                line_gap: 0,
                line_length: 20,
                line_thickness: 4,
                color: CrosshairColor::Red,
                ..base
            },
        },
        CrosshairPreset {
            name: "Small Dot",
            config: CrosshairConfig {
                show_lines: false,
                show_dot: true,
                dot_radius: 2,
                color: CrosshairColor::Orange,
                ..base
            },
        },
    ]
}

/// Name of the preset matching `config` exactly, if any
pub fn preset_name(config: &CrosshairConfig) -> Option<&'static str> {
    presets()
        .into_iter()
        .find(|p| p.config == *config)
        .map(|p| p.name)
}
