//! Global events used for cross-system communication.

use bevy::prelude::*;

use crate::enemies::EnemyStateKind;

/// Sent whenever an enemy brain changes state.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStateChanged {
    /// Enemy whose brain transitioned
    pub enemy: Entity,
    pub from: EnemyStateKind,
    pub to: EnemyStateKind,
}

impl EnemyStateChanged {
    /// True when this transition means the enemy just spotted its target.
    pub fn is_detection(&self) -> bool {
        self.to == EnemyStateKind::Chase
            && matches!(self.from, EnemyStateKind::Idle | EnemyStateKind::Walk)
    }
}

/// Sent when a randomized object has been moved onto one of its candidates.
#[derive(Event, Debug, Clone, Copy)]
pub struct ObjectPlaced {
    /// The object that was relocated
    pub object: Entity,
    /// Index of the chosen candidate placement
    pub index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(from: EnemyStateKind, to: EnemyStateKind) -> EnemyStateChanged {
        EnemyStateChanged {
            enemy: Entity::PLACEHOLDER,
            from,
            to,
        }
    }

    #[test]
    fn detection_is_patrol_to_chase() {
        assert!(changed(EnemyStateKind::Idle, EnemyStateKind::Chase).is_detection());
        assert!(changed(EnemyStateKind::Walk, EnemyStateKind::Chase).is_detection());
        assert!(!changed(EnemyStateKind::Attack, EnemyStateKind::Chase).is_detection());
        assert!(!changed(EnemyStateKind::Chase, EnemyStateKind::Rage).is_detection());
    }
}
