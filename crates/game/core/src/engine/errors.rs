//! Error types for action resolution.

use crate::error::{CombatError, ErrorSeverity};
use crate::state::CombatantId;

/// Preconditions an action request failed before any target was touched.
///
/// Everything that can go wrong after the attacker is validated (unknown
/// tags, missing targets, empty target sets) degrades to "no effect"
/// instead of surfacing here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("attacker {0} is not part of the encounter")]
    AttackerNotFound(CombatantId),

    #[error("attacker {0} is dead")]
    AttackerDead(CombatantId),

    #[error("attacker {0} is stunned and cannot act")]
    AttackerIncapacitated(CombatantId),
}

impl ActionError {
    pub fn attacker(&self) -> CombatantId {
        match *self {
            ActionError::AttackerNotFound(id)
            | ActionError::AttackerDead(id)
            | ActionError::AttackerIncapacitated(id) => id,
        }
    }
}

impl CombatError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ActionError::AttackerNotFound(_) => ErrorSeverity::Validation,
            ActionError::AttackerDead(_) | ActionError::AttackerIncapacitated(_) => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ActionError::AttackerNotFound(_) => "ACTION_ATTACKER_NOT_FOUND",
            ActionError::AttackerDead(_) => "ACTION_ATTACKER_DEAD",
            ActionError::AttackerIncapacitated(_) => "ACTION_ATTACKER_INCAPACITATED",
        }
    }
}
