//! Victory evaluation

use serde::{Deserialize, Serialize};

use crate::battle::units::BattleUnit;

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryOutcome {
    Player,
    Enemy,
    /// Both sides eliminated at once. Not produced by single-target attacks.
    Draw,
}

impl std::fmt::Display for VictoryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VictoryOutcome::Player => write!(f, "player"),
            VictoryOutcome::Enemy => write!(f, "enemy"),
            VictoryOutcome::Draw => write!(f, "draw"),
        }
    }
}

fn any_alive(team: &[BattleUnit]) -> bool {
    team.iter().any(BattleUnit::is_alive)
}

/// Decide the battle, or `None` while both sides still stand
pub fn check_victory(player_team: &[BattleUnit], enemy_team: &[BattleUnit]) -> Option<VictoryOutcome> {
    match (any_alive(player_team), any_alive(enemy_team)) {
        (true, true) => None,
        (true, false) => Some(VictoryOutcome::Player),
        (false, true) => Some(VictoryOutcome::Enemy),
        (false, false) => Some(VictoryOutcome::Draw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DefinitionId, Team};
    use crate::roster::UnitDefinition;
    use std::sync::Arc;

    fn team(team: Team, healths: &[u32]) -> Vec<BattleUnit> {
        healths
            .iter()
            .enumerate()
            .map(|(slot, &hp)| {
                let def = Arc::new(UnitDefinition::new(DefinitionId(1), "U", 10, vec![1]));
                let mut u = BattleUnit::new(def, team, slot);
                u.take_damage(10 - hp);
                u
            })
            .collect()
    }

    #[test]
    fn test_both_alive_undecided() {
        let p = team(Team::Player, &[3, 0]);
        let e = team(Team::Enemy, &[0, 1]);
        assert_eq!(check_victory(&p, &e), None);
    }

    #[test]
    fn test_one_side_standing() {
        let p = team(Team::Player, &[3]);
        let e = team(Team::Enemy, &[0, 0]);
        assert_eq!(check_victory(&p, &e), Some(VictoryOutcome::Player));
        assert_eq!(check_victory(&e, &p), Some(VictoryOutcome::Enemy));
    }

    #[test]
    fn test_mutual_elimination_draw() {
        let p = team(Team::Player, &[0]);
        let e = team(Team::Enemy, &[0, 0]);
        assert_eq!(check_victory(&p, &e), Some(VictoryOutcome::Draw));
    }

    #[test]
    fn test_check_is_idempotent() {
        let p = team(Team::Player, &[5]);
        let e = team(Team::Enemy, &[0]);
        let first = check_victory(&p, &e);
        for _ in 0..5 {
            assert_eq!(check_victory(&p, &e), first);
        }
    }
}
