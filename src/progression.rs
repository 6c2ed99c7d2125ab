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

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{Id, match_record::Match, student::Student, tiers::WinTiers};

/// A directed link from a loser to the student who beat them.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BracketEdge {
    pub match_id: Id,
    /// The loser.
    pub source_student_id: Id,
    /// The winner.
    pub target_student_id: Id,
    pub loser_name: String,
}

impl BracketEdge {
    #[must_use]
    pub fn id(&self) -> String {
        format!("match-{}-progression", self.match_id)
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("Beat {}", self.loser_name)
    }
}

impl fmt::Display for BracketEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} \"{}\"",
            self.source_student_id,
            self.target_student_id,
            self.label()
        )
    }
}

/// Builds an edge for every decided match whose winner now sits in a
/// strictly higher tier than the loser. Matches naming students missing from
/// the roster are skipped.
#[must_use]
pub fn progression_edges(
    students: &[Student],
    matches: &[Match],
    tiers: &WinTiers<'_>,
) -> Vec<BracketEdge> {
    let roster: FxHashMap<&str, &Student> = students
        .iter()
        .map(|student| (student.id.as_str(), student))
        .collect();

    let mut edges = Vec::new();
    for game in matches {
        let Some(slot) = game.winning_slot() else {
            continue;
        };

        let (Some(winner), Some(loser)) = (
            roster.get(game.id_of(slot)),
            roster.get(game.id_of(slot.opposite())),
        ) else {
            continue;
        };

        let (Some(winner_wins), Some(loser_wins)) =
            (tiers.wins_of(&winner.id), tiers.wins_of(&loser.id))
        else {
            continue;
        };

        if winner_wins > loser_wins {
            edges.push(BracketEdge {
                match_id: game.id.clone(),
                source_student_id: loser.id.clone(),
                target_student_id: winner.id.clone(),
                loser_name: loser.name.clone(),
            });
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::{
        match_record::Match, outcome::GameResult, slot::Slot, student::Student, tiers::WinTiers,
    };

    use super::progression_edges;

    fn student(id: &str, name: &str) -> Student {
        Student::new(id.to_string(), name, Utc::now())
    }

    fn decided(id: &str, player1: &Student, player2: &Student, winner: Slot) -> Match {
        Match {
            id: id.to_string(),
            player1_id: player1.id.clone(),
            player1_name: player1.name.clone(),
            player1_choice: None,
            player2_id: player2.id.clone(),
            player2_name: player2.name.clone(),
            player2_choice: None,
            result: GameResult::Win,
            match_result: Some(winner),
            winner: Some(match winner {
                Slot::Player1 => player1.name.clone(),
                Slot::Player2 => player2.name.clone(),
            }),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn edge_points_from_loser_to_winner() {
        let students = [student("a", "A"), student("b", "B"), student("c", "C")];
        let matches = [
            decided("1", &students[1], &students[0], Slot::Player2),
            decided("2", &students[0], &students[2], Slot::Player1),
        ];
        let tiers = WinTiers::new(&students, &matches);
        let edges = progression_edges(&students, &matches, &tiers);

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source_student_id, "b");
        assert_eq!(edges[0].target_student_id, "a");
        assert_eq!(edges[0].label(), "Beat B");
        assert_eq!(edges[0].id(), "match-1-progression");
    }

    #[test]
    fn equal_win_counts_make_no_edge() {
        // B beat A and A beat B by name: a data anomaly leaving both on one win.
        let students = [student("a", "A"), student("b", "B")];
        let matches = [
            decided("1", &students[0], &students[1], Slot::Player1),
            decided("2", &students[1], &students[0], Slot::Player1),
        ];
        let tiers = WinTiers::new(&students, &matches);

        assert!(progression_edges(&students, &matches, &tiers).is_empty());
    }

    #[test]
    fn unknown_students_are_skipped() {
        let students = [student("a", "A")];
        let ghost = student("g", "Ghost");
        let matches = [decided("1", &students[0], &ghost, Slot::Player1)];
        let tiers = WinTiers::new(&students, &matches);

        assert!(progression_edges(&students, &matches, &tiers).is_empty());
    }

    #[test]
    fn ties_make_no_edge() {
        let students = [student("a", "A"), student("b", "B")];
        let mut tie = decided("1", &students[0], &students[1], Slot::Player1);
        tie.result = GameResult::Tie;
        tie.match_result = None;
        tie.winner = None;
        let matches = [tie];
        let tiers = WinTiers::new(&students, &matches);

        assert!(progression_edges(&students, &matches, &tiers).is_empty());
    }
}
