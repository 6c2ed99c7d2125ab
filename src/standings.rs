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

use serde::{Deserialize, Serialize};

use crate::{
    Id,
    choice::Choice,
    match_record::Match,
    outcome::GameResult,
    slot::Slot,
    student::Student,
    tiers::WinTiers,
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub student_id: Id,
    pub name: String,
    pub wins: u32,
    pub matches_played: usize,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} wins {} matches",
            self.name, self.wins, self.matches_played
        )
    }
}

/// Students still in the tournament, most wins first. Equal win counts keep
/// the order of `students`.
#[must_use]
pub fn leaderboard(students: &[Student], matches: &[Match]) -> Vec<Standing> {
    let tiers = WinTiers::new(students, matches);

    let mut standings: Vec<_> = students
        .iter()
        .filter(|student| student.is_active())
        .map(|student| Standing {
            student_id: student.id.clone(),
            name: student.name.clone(),
            wins: tiers.wins_of(&student.id).unwrap_or_default(),
            matches_played: matches
                .iter()
                .filter(|game| game.involves(&student.id))
                .count(),
        })
        .collect();

    standings.sort_by(|a, b| b.wins.cmp(&a.wins));
    standings
}

#[derive(Clone, Debug, PartialEq)]
pub struct TournamentStatus {
    pub total_students: usize,
    pub active_students: usize,
    pub eliminated_students: usize,
    /// Set once exactly one student is left standing.
    pub winner: Option<Student>,
    pub is_complete: bool,
}

impl TournamentStatus {
    #[must_use]
    pub fn new(students: &[Student]) -> Self {
        let active: Vec<_> = students.iter().filter(|s| s.is_active()).collect();
        let winner = match active.as_slice() {
            [only] => Some((*only).clone()),
            _ => None,
        };

        Self {
            total_students: students.len(),
            active_students: active.len(),
            eliminated_students: students.len() - active.len(),
            winner,
            is_complete: active.len() <= 1 && students.len() > 1,
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "students: {}", self.total_students)?;
        writeln!(f, "active: {}", self.active_students)?;
        writeln!(f, "eliminated: {}", self.eliminated_students)?;

        match (&self.winner, self.is_complete) {
            (Some(winner), true) => writeln!(f, "winner: {}", winner.name),
            (None, true) => writeln!(f, "complete, nobody is left"),
            _ => writeln!(f, "in progress"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChoiceCounts {
    pub rock: u32,
    pub paper: u32,
    pub scissors: u32,
}

impl ChoiceCounts {
    fn add(&mut self, choice: Choice) {
        match choice {
            Choice::Rock => self.rock += 1,
            Choice::Paper => self.paper += 1,
            Choice::Scissors => self.scissors += 1,
        }
    }
}

impl fmt::Display for ChoiceCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rock {} paper {} scissors {}",
            self.rock, self.paper, self.scissors
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchStatistics {
    pub wins: ChoiceCounts,
    pub losses: ChoiceCounts,
    /// Counted on player 1's choice only, both sides chose the same.
    pub ties: ChoiceCounts,
    pub total_matches: usize,
    pub participation_percentage: f64,
}

impl MatchStatistics {
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(students: &[Student], matches: &[Match]) -> Self {
        let mut statistics = Self {
            total_matches: matches.len(),
            ..Self::default()
        };

        for game in matches {
            match game.result {
                GameResult::Tie => {
                    if let Some(choice) = game.player1_choice {
                        statistics.ties.add(choice);
                    }
                }
                GameResult::Win => {
                    let winner = if game.winner.as_deref() == Some(game.player1_name.as_str()) {
                        Slot::Player1
                    } else {
                        Slot::Player2
                    };

                    if let Some(choice) = game.choice_of(winner) {
                        statistics.wins.add(choice);
                    }
                    if let Some(choice) = game.choice_of(winner.opposite()) {
                        statistics.losses.add(choice);
                    }
                }
            }
        }

        let played = students
            .iter()
            .filter(|student| matches.iter().any(|game| game.involves(&student.id)))
            .count();

        if !students.is_empty() {
            statistics.participation_percentage = played as f64 / students.len() as f64 * 100.0;
        }

        statistics
    }
}

impl fmt::Display for MatchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "matches: {}", self.total_matches)?;
        writeln!(f, "participation: {:.1}%", self.participation_percentage)?;
        writeln!(f, "wins: {}", self.wins)?;
        writeln!(f, "losses: {}", self.losses)?;
        writeln!(f, "ties: {}", self.ties)
    }
}
