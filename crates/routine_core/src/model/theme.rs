//! Color themes.
//!
//! Each theme is an ordered palette of hex colors used for course blocks and
//! color randomization. Unknown or missing theme names resolve to `Grass`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Lemon,
    #[default]
    Grass,
    Ocean,
    Cherry,
}

const LEMON: [&str; 8] = [
    "#d6b911", "#ffc107", "#ff9800", "#f44336", "#9c27b0", "#673ab7", "#3f51b5", "#2196f3",
];
const GRASS: [&str; 8] = [
    "#4a9e4d", "#8bc34a", "#cddc39", "#ffc107", "#ff9800", "#f44336", "#9c27b0", "#673ab7",
];
const OCEAN: [&str; 8] = [
    "#2196f3", "#03a9f4", "#00bcd4", "#00e5ff", "#ff9800", "#f44336", "#9c27b0", "#673ab7",
];
const CHERRY: [&str; 8] = [
    "#ffc0cb", "#ffb6c1", "#ff69b4", "#ff1493", "#db7093", "#c71585", "#e75480", "#f08080",
];

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Lemon, Theme::Grass, Theme::Ocean, Theme::Cherry];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lemon => "lemon",
            Self::Grass => "grass",
            Self::Ocean => "ocean",
            Self::Cherry => "cherry",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(value))
    }

    /// Resolves a stored preference, defaulting when absent or unknown.
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn palette(self) -> &'static [&'static str] {
        match self {
            Self::Lemon => &LEMON,
            Self::Grass => &GRASS,
            Self::Ocean => &OCEAN,
            Self::Cherry => &CHERRY,
        }
    }

    /// First palette entry; the preselected swatch in forms.
    pub fn primary_color(self) -> &'static str {
        self.palette()[0]
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
