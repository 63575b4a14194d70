//! Level and mood of the mascot.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;

pub const START_LEVEL: u32 = 1;
pub const HYPER_LEVEL: u32 = 5;
pub const MAX_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mood {
    Chill,
    Salty,
    #[serde(rename = "Edgy AF")]
    EdgyAF,
    Hyped,
    Hangry,
    #[serde(rename = "Spaced Out")]
    SpacedOut,
    /// Reached by feeding to level 5.
    Hyper,
    /// Reached by feeding to the level cap.
    #[serde(rename = "Jawbreaker Junkie")]
    JawbreakerJunkie,
}

/// Moods a provoke can land on.
pub const BASE_MOODS: [Mood; 6] = [
    Mood::Chill,
    Mood::Salty,
    Mood::EdgyAF,
    Mood::Hyped,
    Mood::Hangry,
    Mood::SpacedOut,
];

impl Mood {
    pub fn label(self) -> &'static str {
        match self {
            Mood::Chill => "Chill",
            Mood::Salty => "Salty",
            Mood::EdgyAF => "Edgy AF",
            Mood::Hyped => "Hyped",
            Mood::Hangry => "Hangry",
            Mood::SpacedOut => "Spaced Out",
            Mood::Hyper => "Hyper",
            Mood::JawbreakerJunkie => "Jawbreaker Junkie",
        }
    }

    /// Body tint as `0xRRGGBB`.
    pub fn tint(self) -> u32 {
        match self {
            Mood::Chill => 0x1f77b4,
            Mood::Salty => 0x9467bd,
            Mood::EdgyAF => 0xff7f0e,
            Mood::Hyped => 0x2ca02c,
            Mood::Hangry => 0xd62728,
            Mood::SpacedOut => 0x17becf,
            Mood::Hyper | Mood::JawbreakerJunkie => 0xffffff,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Level, mood and the scam toggle. Only the methods below mutate it.
#[derive(Debug, Clone)]
pub struct MascotState {
    level: u32,
    mood: Mood,
    scam_active: bool,
}

impl Default for MascotState {
    fn default() -> Self {
        Self::new()
    }
}

impl MascotState {
    pub fn new() -> Self {
        Self {
            level: START_LEVEL,
            mood: Mood::Chill,
            scam_active: false,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn scam_active(&self) -> bool {
        self.scam_active
    }

    /// Level up (capped). Milestone moods only trigger when the level moved.
    ///
    /// Returns `true` if the level changed.
    pub fn feed(&mut self) -> bool {
        if self.level >= MAX_LEVEL {
            return false;
        }
        self.level += 1;
        match self.level {
            HYPER_LEVEL => self.mood = Mood::Hyper,
            MAX_LEVEL => self.mood = Mood::JawbreakerJunkie,
            _ => {}
        }
        true
    }

    /// Swing to a random base mood.
    pub fn provoke<R: Rng>(&mut self, rng: &mut R) -> Mood {
        self.mood = BASE_MOODS.choose(rng).copied().unwrap_or(Mood::Chill);
        self.mood
    }

    pub fn toggle_scam(&mut self) -> bool {
        self.scam_active = !self.scam_active;
        self.scam_active
    }
}
