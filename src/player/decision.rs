//! The seam between the engine and a player's decision logic.
//!
//! The dealer never trusts a [`DecisionMaker`]: every call carries a
//! [`Deadline`], every reply is validated, and any error, late reply, or
//! invalid reply removes the player from the game while play continues
//! for everyone else.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::actions::Action4;
use crate::core::{Deadline, Species, TraitCard};
use crate::feeding::FeedingChoice;

/// Why a decision-maker call produced no usable answer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("decision arrived after the deadline")]
    Timeout,

    #[error("malformed reply: {0}")]
    Malformed(String),

    #[error("decision maker fault: {0}")]
    Fault(String),
}

/// A snapshot of one player's own state, as shown to its decision maker.
///
/// Wire shape: `[[Species, ...], bag, [TraitCard, ...]]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerState {
    pub species: Vec<Species>,
    pub bag: u32,
    pub hand: Vec<TraitCard>,
}

impl Serialize for PlayerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.species, self.bag, &self.hand).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PlayerState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (species, bag, hand) = Deserialize::deserialize(deserializer)?;
        Ok(Self { species, bag, hand })
    }
}

/// The strategy side of a player.
///
/// Implementations see only what the rules allow: their own state, the
/// public boards of the other players, and the watering hole. Boards of
/// other players are always given in feeding-queue or seating order as
/// the operation requires.
pub trait DecisionMaker {
    /// A new turn begins; `state` already includes the newly granted
    /// board (if any) and the dealt cards.
    fn start(
        &mut self,
        watering_hole: u32,
        state: &PlayerState,
        deadline: Deadline,
    ) -> Result<(), DecisionError>;

    /// Choose the card-driven actions for this turn. `before` and
    /// `after` hold the boards of the players seated before and after
    /// this one in the current turn order.
    fn choose(
        &mut self,
        before: &[Vec<Species>],
        after: &[Vec<Species>],
        deadline: Deadline,
    ) -> Result<Action4, DecisionError>;

    /// Pick the next feeding. Called only when more than one option
    /// exists; `opponents` holds the other players' boards starting
    /// after this player in the feeding queue.
    fn feed_next(
        &mut self,
        state: &PlayerState,
        opponents: &[Vec<Species>],
        watering_hole: u32,
        deadline: Deadline,
    ) -> Result<FeedingChoice, DecisionError>;
}

/// Discard an answer that arrived past its deadline.
pub(crate) fn deadline_checked<T>(
    deadline: Deadline,
    result: Result<T, DecisionError>,
) -> Result<T, DecisionError> {
    let value = result?;
    if deadline.expired() {
        return Err(DecisionError::Timeout);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Trait;

    #[test]
    fn test_player_state_wire_shape() {
        let state = PlayerState {
            species: vec![Species::new_board()],
            bag: 7,
            hand: vec![TraitCard::new(2, Trait::Horns)],
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(
            json,
            r#"[[[["food",0],["body",0],["population",1],["traits",[]]]],7,[[2,"horns"]]]"#
        );
        let back: PlayerState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }

    #[test]
    fn test_deadline_checked_flags_late_answers() {
        let late = deadline_checked(Deadline::already_expired(), Ok(1));
        assert_eq!(late, Err(DecisionError::Timeout));

        let on_time = deadline_checked(Deadline::standard(), Ok(1));
        assert_eq!(on_time, Ok(1));

        let fault: Result<i32, _> = deadline_checked(
            Deadline::standard(),
            Err(DecisionError::Fault("boom".to_string())),
        );
        assert_eq!(fault, Err(DecisionError::Fault("boom".to_string())));
    }
}
