// This file is part of classroom-bracket.
//
// classroom-bracket is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// classroom-bracket is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Id, choice::Choice, outcome::GameResult, slot::Slot};

/// One recorded pairing. Names are denormalized copies taken when the match
/// was recorded.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Match {
    pub id: Id,
    pub player1_id: Id,
    pub player1_name: String,
    #[serde(default)]
    pub player1_choice: Option<Choice>,
    pub player2_id: Id,
    pub player2_name: String,
    #[serde(default)]
    pub player2_choice: Option<Choice>,
    pub result: GameResult,
    #[serde(default)]
    pub match_result: Option<Slot>,
    #[serde(default)]
    pub winner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    #[must_use]
    pub fn involves(&self, student_id: &str) -> bool {
        self.player1_id == student_id || self.player2_id == student_id
    }

    #[must_use]
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.player1_id == a && self.player2_id == b)
            || (self.player1_id == b && self.player2_id == a)
    }

    #[must_use]
    pub fn id_of(&self, slot: Slot) -> &str {
        match slot {
            Slot::Player1 => &self.player1_id,
            Slot::Player2 => &self.player2_id,
        }
    }

    #[must_use]
    pub fn name_of(&self, slot: Slot) -> &str {
        match slot {
            Slot::Player1 => &self.player1_name,
            Slot::Player2 => &self.player2_name,
        }
    }

    #[must_use]
    pub fn choice_of(&self, slot: Slot) -> Option<Choice> {
        match slot {
            Slot::Player1 => self.player1_choice,
            Slot::Player2 => self.player2_choice,
        }
    }

    /// The winning slot, found by comparing the winner's name against both
    /// players and falling back to `match_result`. `None` for ties and for
    /// records whose winner can't be placed.
    #[must_use]
    pub fn winning_slot(&self) -> Option<Slot> {
        if self.result == GameResult::Tie {
            return None;
        }

        let winner = self.winner.as_deref()?;
        if winner == self.player1_name {
            Some(Slot::Player1)
        } else if winner == self.player2_name {
            Some(Slot::Player2)
        } else {
            self.match_result
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let played = self.created_at.format("%Y-%m-%d %H:%M");

        match &self.winner {
            Some(winner) if self.result == GameResult::Win => write!(
                f,
                "{} {played} {} vs {}: {winner} wins",
                self.id, self.player1_name, self.player2_name
            ),
            _ => write!(
                f,
                "{} {played} {} vs {}: tie",
                self.id, self.player1_name, self.player2_name
            ),
        }
    }
}
