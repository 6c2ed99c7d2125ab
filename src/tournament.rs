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

use std::{fs, io::ErrorKind, path::Path, sync::mpsc::Receiver};

use anyhow::Context;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Id,
    bracket::{Bracket, compute_bracket},
    choice::{Choice, determine_result},
    layout::LayoutConfig,
    match_record::Match,
    outcome::GameResult,
    roster::parse_roster,
    slot::Slot,
    student::Student,
    subscription::{Subscribers, Subscription},
};

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TournamentError {
    #[error("{player1} and {player2} have already played against each other")]
    AlreadyPlayed { player1: String, player2: String },
    #[error("{0} has already been eliminated from the tournament")]
    Eliminated(String),
    #[error("a student needs a name")]
    EmptyName,
    #[error("the roster has no names in it")]
    EmptyRoster,
    #[error("{0} can't play against themselves")]
    SamePlayer(String),
    #[error("there is no match with the id {0}")]
    UnknownMatch(Id),
    #[error("there is no student with the id {0}")]
    UnknownStudent(Id),
}

/// Students and matches as listed by the store: students by name, matches
/// newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub students: Vec<Student>,
    pub matches: Vec<Match>,
}

/// The roster and match history of the one tournament being run.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Tournament {
    #[serde(default)]
    students: Vec<Student>,
    #[serde(default)]
    matches: Vec<Match>,
    #[serde(skip)]
    subscribers: Subscribers<Snapshot>,
}

impl Tournament {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a tournament from a RON file. A missing file is an empty
    /// tournament.
    ///
    /// # Errors
    ///
    /// If the file can't be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(string) => {
                let tournament: Self = ron::from_str(&string)
                    .with_context(|| format!("parsing {}", path.display()))?;
                info!(
                    "loaded {} students and {} matches from {}",
                    tournament.students.len(),
                    tournament.matches.len(),
                    path.display()
                );
                Ok(tournament)
            }
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!("{} not found, starting a new tournament", path.display());
                Ok(Self::default())
            }
            Err(error) => Err(error).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// # Errors
    ///
    /// If serializing or writing the file fails.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, string).with_context(|| format!("writing {}", path.display()))?;
        debug!("saved tournament to {}", path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// If the trimmed name is empty.
    pub fn add_student(&mut self, name: &str) -> Result<Id, TournamentError> {
        let id = self.insert_student(name)?;
        self.notify();
        Ok(id)
    }

    /// Adds one student per non-blank line of `text`.
    ///
    /// # Errors
    ///
    /// If `text` has no names.
    pub fn import_roster(&mut self, text: &str) -> Result<Vec<Id>, TournamentError> {
        let names = parse_roster(text);
        if names.is_empty() {
            return Err(TournamentError::EmptyRoster);
        }

        let ids = names
            .iter()
            .map(|name| self.insert_student(name))
            .collect::<Result<Vec<_>, _>>()?;

        info!("imported {} students", ids.len());
        self.notify();
        Ok(ids)
    }

    fn insert_student(&mut self, name: &str) -> Result<Id, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }

        let id = new_id();
        info!("{id} {name} added");
        self.students.push(Student::new(id.clone(), name, Utc::now()));
        Ok(id)
    }

    /// All students sorted by name.
    #[must_use]
    pub fn students(&self) -> Vec<Student> {
        let mut students = self.students.clone();
        students.sort_by(|a, b| a.name.cmp(&b.name));
        students
    }

    #[must_use]
    pub fn active_students(&self) -> Vec<Student> {
        let mut students = self.students();
        students.retain(Student::is_active);
        students
    }

    #[must_use]
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    /// Looks a student up by id, then by exact name.
    #[must_use]
    pub fn find_student(&self, id_or_name: &str) -> Option<&Student> {
        self.student(id_or_name).or_else(|| {
            self.students
                .iter()
                .find(|student| student.name == id_or_name)
        })
    }

    /// Case-insensitive substring search over names, sorted by name.
    #[must_use]
    pub fn search_students(&self, term: &str, active_only: bool) -> Vec<Student> {
        let term = term.to_lowercase();
        let mut students = self.students();
        students.retain(|student| {
            (!active_only || student.is_active()) && student.name.to_lowercase().contains(&term)
        });
        students
    }

    /// # Errors
    ///
    /// If there is no such student.
    pub fn eliminate_student(&mut self, id: &str) -> Result<(), TournamentError> {
        self.student_mut(id)?.eliminate(Utc::now());
        info!("{id} eliminated");
        self.notify();
        Ok(())
    }

    /// # Errors
    ///
    /// If there is no such student.
    pub fn reactivate_student(&mut self, id: &str) -> Result<(), TournamentError> {
        self.student_mut(id)?.reactivate();
        info!("{id} reactivated");
        self.notify();
        Ok(())
    }

    fn student_mut(&mut self, id: &str) -> Result<&mut Student, TournamentError> {
        self.students
            .iter_mut()
            .find(|student| student.id == id)
            .ok_or_else(|| TournamentError::UnknownStudent(id.to_string()))
    }

    /// All matches, newest first.
    #[must_use]
    pub fn matches(&self) -> Vec<Match> {
        let mut matches = self.matches.clone();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches
    }

    #[must_use]
    pub fn student_matches(&self, student_id: &str) -> Vec<Match> {
        let mut matches = self.matches();
        matches.retain(|game| game.involves(student_id));
        matches
    }

    #[must_use]
    pub fn match_count(&self, student_id: &str) -> usize {
        self.matches
            .iter()
            .filter(|game| game.involves(student_id))
            .count()
    }

    #[must_use]
    pub fn has_played(&self, a: &str, b: &str) -> bool {
        self.matches.iter().any(|game| game.is_between(a, b))
    }

    /// Records a match decided by picking the winner directly and eliminates
    /// the loser.
    ///
    /// # Errors
    ///
    /// If either student is unknown or eliminated, both ids are the same
    /// student, or the pair has already played.
    pub fn record_match_with_winner(
        &mut self,
        player1_id: &str,
        player2_id: &str,
        winner: Slot,
    ) -> Result<Id, TournamentError> {
        let (player1, player2) = self.pairing(player1_id, player2_id)?;

        let mut game = new_match(&player1, &player2);
        game.match_result = Some(winner);
        game.winner = Some(game.name_of(winner).to_string());

        Ok(self.insert_match(game, Some(winner)))
    }

    /// Records a rock paper scissors round. A tie eliminates nobody.
    ///
    /// # Errors
    ///
    /// The same as [`Tournament::record_match_with_winner`].
    pub fn record_match_with_choices(
        &mut self,
        player1_id: &str,
        player1_choice: Choice,
        player2_id: &str,
        player2_choice: Choice,
    ) -> Result<Id, TournamentError> {
        let (player1, player2) = self.pairing(player1_id, player2_id)?;
        let (result, winner) = determine_result(player1_choice, player2_choice);

        let mut game = new_match(&player1, &player2);
        game.player1_choice = Some(player1_choice);
        game.player2_choice = Some(player2_choice);
        game.result = result;
        game.winner = winner.map(|slot| game.name_of(slot).to_string());

        Ok(self.insert_match(game, winner))
    }

    fn pairing(
        &self,
        player1_id: &str,
        player2_id: &str,
    ) -> Result<(Student, Student), TournamentError> {
        let player1 = self
            .student(player1_id)
            .ok_or_else(|| TournamentError::UnknownStudent(player1_id.to_string()))?;
        let player2 = self
            .student(player2_id)
            .ok_or_else(|| TournamentError::UnknownStudent(player2_id.to_string()))?;

        if player1.id == player2.id {
            return Err(TournamentError::SamePlayer(player1.name.clone()));
        }

        if self.has_played(&player1.id, &player2.id) {
            return Err(TournamentError::AlreadyPlayed {
                player1: player1.name.clone(),
                player2: player2.name.clone(),
            });
        }

        for player in [player1, player2] {
            if player.eliminated {
                return Err(TournamentError::Eliminated(player.name.clone()));
            }
        }

        Ok((player1.clone(), player2.clone()))
    }

    fn insert_match(&mut self, game: Match, winner: Option<Slot>) -> Id {
        let id = game.id.clone();
        info!("{id} {game}");

        if let Some(winner) = winner {
            let loser = game.id_of(winner.opposite()).to_string();
            if let Some(student) = self.students.iter_mut().find(|s| s.id == loser) {
                student.eliminate(game.created_at);
                info!("{loser} {} eliminated", student.name);
            }
        }

        self.matches.push(game);
        self.notify();
        id
    }

    /// Deletes a match and puts its loser back into the tournament.
    ///
    /// # Errors
    ///
    /// If there is no such match.
    pub fn delete_match(&mut self, id: &str) -> Result<(), TournamentError> {
        let index = self
            .matches
            .iter()
            .position(|game| game.id == id)
            .ok_or_else(|| TournamentError::UnknownMatch(id.to_string()))?;

        let game = self.matches.remove(index);
        if game.result != GameResult::Tie && game.winner.is_some() {
            let winner = game.match_result.unwrap_or_else(|| {
                if game.winner.as_deref() == Some(game.player1_name.as_str()) {
                    Slot::Player1
                } else {
                    Slot::Player2
                }
            });

            let loser = game.id_of(winner.opposite());
            if let Some(student) = self.students.iter_mut().find(|s| s.id == loser) {
                student.reactivate();
                info!("{loser} {} reactivated", student.name);
            }
        }

        info!("{id} deleted");
        self.notify();
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            students: self.students(),
            matches: self.matches(),
        }
    }

    /// The returned receiver gets the current snapshot right away, then a
    /// fresh one after every change until the subscription is dropped or
    /// unsubscribed.
    #[must_use]
    pub fn subscribe(&self) -> (Subscription<Snapshot>, Receiver<Snapshot>) {
        self.subscribers.subscribe(self.snapshot())
    }

    fn notify(&self) {
        if !self.subscribers.is_empty() {
            self.subscribers.notify(&self.snapshot());
        }
    }

    #[must_use]
    pub fn bracket(&self, config: &LayoutConfig) -> Bracket {
        compute_bracket(&self.students(), &self.matches(), config)
    }
}

fn new_id() -> Id {
    format!("{:016x}", rand::random::<u64>())
}

fn new_match(player1: &Student, player2: &Student) -> Match {
    Match {
        id: new_id(),
        player1_id: player1.id.clone(),
        player1_name: player1.name.clone(),
        player1_choice: None,
        player2_id: player2.id.clone(),
        player2_name: player2.name.clone(),
        player2_choice: None,
        result: GameResult::Win,
        match_result: None,
        winner: None,
        created_at: Utc::now(),
    }
}
