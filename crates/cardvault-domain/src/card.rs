//! Card catalog enums: game, physical condition and price currency.
//!
//! All three are closed sets. They are stored as text columns and parsed
//! exhaustively wherever a raw string enters the system.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which closed enum a raw string failed to parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Game,
    Condition,
    Currency,
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Game => "game",
            Self::Condition => "condition",
            Self::Currency => "currency",
        })
    }
}

/// A string did not name a member of one of the closed enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: VariantKind,
    pub value: String,
}

/// Trading-card game a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Game {
    Yugioh,
    Mtg,
    Pokemon,
}

impl Game {
    pub const ALL: [Game; 3] = [Game::Yugioh, Game::Mtg, Game::Pokemon];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yugioh => "yugioh",
            Self::Mtg => "mtg",
            Self::Pokemon => "pokemon",
        }
    }
}

impl FromStr for Game {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yugioh" => Ok(Self::Yugioh),
            "mtg" => Ok(Self::Mtg),
            "pokemon" => Ok(Self::Pokemon),
            _ => Err(UnknownVariant {
                kind: VariantKind::Game,
                value: s.to_owned(),
            }),
        }
    }
}

/// Physical grading of a card, best to worst.
///
/// Ordering follows declaration order, so `Mint < Damaged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Mint,
    NearMint,
    LightPlay,
    ModeratePlay,
    HeavyPlay,
    Damaged,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::Mint,
        Condition::NearMint,
        Condition::LightPlay,
        Condition::ModeratePlay,
        Condition::HeavyPlay,
        Condition::Damaged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mint => "mint",
            Self::NearMint => "near_mint",
            Self::LightPlay => "light_play",
            Self::ModeratePlay => "moderate_play",
            Self::HeavyPlay => "heavy_play",
            Self::Damaged => "damaged",
        }
    }
}

impl FromStr for Condition {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mint" => Ok(Self::Mint),
            "near_mint" => Ok(Self::NearMint),
            "light_play" => Ok(Self::LightPlay),
            "moderate_play" => Ok(Self::ModeratePlay),
            "heavy_play" => Ok(Self::HeavyPlay),
            "damaged" => Ok(Self::Damaged),
            _ => Err(UnknownVariant {
                kind: VariantKind::Condition,
                value: s.to_owned(),
            }),
        }
    }
}

/// ISO 4217 currency a price is quoted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
}

impl Currency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
        }
    }
}

impl FromStr for Currency {
    type Err = UnknownVariant;

    /// Accepts the code in any letter case (`usd`, `USD`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "JPY" => Ok(Self::Jpy),
            "CAD" => Ok(Self::Cad),
            "AUD" => Ok(Self::Aud),
            _ => Err(UnknownVariant {
                kind: VariantKind::Currency,
                value: s.to_owned(),
            }),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Game, Condition, Currency);
