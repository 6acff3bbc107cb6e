//! The closed set of Evolution traits.
//!
//! Traits are the only card payload in the game: a species carries up to
//! three of them, and every rule interaction (predation, defense,
//! cooperation, storage) is keyed off this enum.

use serde::{Deserialize, Serialize};

/// Minimum margin by which an attacker's body must exceed a hard-shell
/// defender's body for the attack to be legal.
pub const HARD_SHELL_THRESHOLD: u8 = 4;

/// Population damage dealt back to an attacker by a horned defender.
pub const HORNS_DAMAGE: u8 = 1;

/// One of the sixteen Evolution traits.
///
/// Variants are declared in alphabetical order of their kebab-case wire
/// names, so the derived `Ord` is the canonical trait ordering used for
/// deck sorting and duplicate detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trait {
    Ambush,
    Burrowing,
    Carnivore,
    Climbing,
    Cooperation,
    FatTissue,
    Fertile,
    Foraging,
    HardShell,
    Herding,
    Horns,
    LongNeck,
    PackHunting,
    Scavenger,
    Symbiosis,
    WarningCall,
}

impl Trait {
    /// All traits in canonical (alphabetical) order.
    pub const ALL: [Trait; 16] = [
        Trait::Ambush,
        Trait::Burrowing,
        Trait::Carnivore,
        Trait::Climbing,
        Trait::Cooperation,
        Trait::FatTissue,
        Trait::Fertile,
        Trait::Foraging,
        Trait::HardShell,
        Trait::Herding,
        Trait::Horns,
        Trait::LongNeck,
        Trait::PackHunting,
        Trait::Scavenger,
        Trait::Symbiosis,
        Trait::WarningCall,
    ];

    /// The wire name of this trait.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Trait::Ambush => "ambush",
            Trait::Burrowing => "burrowing",
            Trait::Carnivore => "carnivore",
            Trait::Climbing => "climbing",
            Trait::Cooperation => "cooperation",
            Trait::FatTissue => "fat-tissue",
            Trait::Fertile => "fertile",
            Trait::Foraging => "foraging",
            Trait::HardShell => "hard-shell",
            Trait::Herding => "herding",
            Trait::Horns => "horns",
            Trait::LongNeck => "long-neck",
            Trait::PackHunting => "pack-hunting",
            Trait::Scavenger => "scavenger",
            Trait::Symbiosis => "symbiosis",
            Trait::WarningCall => "warning-call",
        }
    }

    /// Parse a trait from its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Trait> {
        Trait::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for Trait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
