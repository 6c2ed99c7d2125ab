use log::trace;
use rustc_hash::FxHashMap;

use crate::{match_record::Match, student::Student};

/// Orders the students of one tier so that students who played each other
/// sit next to each other, which later puts them side by side on the ring.
///
/// This is a greedy walk over the played-against graph: start at the best
/// connected student, follow unplaced opponents while there are any, and
/// otherwise jump to the unplaced student with the most unplaced opponents.
/// Ties always go to whoever comes first in `tier`, so the ordering is
/// deterministic.
#[must_use]
pub fn cluster_tier<'a>(tier: &[&'a Student], matches: &[Match]) -> Vec<&'a Student> {
    if tier.len() <= 1 {
        return tier.to_vec();
    }

    let opponents = Opponents::new(tier, matches);
    let mut placed = vec![false; tier.len()];
    let mut order = Vec::with_capacity(tier.len());

    let mut current = opponents.best_connected(&placed);
    trace!("cluster seed: {}", tier[current].name);

    while order.len() < tier.len() {
        if !placed[current] {
            placed[current] = true;
            order.push(tier[current]);
        }

        if let Some(next) = opponents.first_unplaced_opponent(current, &placed) {
            current = next;
        } else if placed.iter().any(|placed| !placed) {
            current = opponents.best_connected(&placed);
            trace!("cluster jump: {}", tier[current].name);
        }
    }

    order
}

/// Adjacency lists over tier positions.
struct Opponents(Vec<Vec<usize>>);

impl Opponents {
    fn new(tier: &[&Student], matches: &[Match]) -> Self {
        let index: FxHashMap<&str, usize> = tier
            .iter()
            .enumerate()
            .map(|(i, student)| (student.id.as_str(), i))
            .collect();

        let mut opponents = vec![Vec::new(); tier.len()];
        for game in matches {
            let (Some(&a), Some(&b)) = (
                index.get(game.player1_id.as_str()),
                index.get(game.player2_id.as_str()),
            ) else {
                continue;
            };

            if a != b {
                opponents[a].push(b);
                opponents[b].push(a);
            }
        }

        Self(opponents)
    }

    fn remaining_connections(&self, student: usize, placed: &[bool]) -> usize {
        self.0[student]
            .iter()
            .filter(|&&opponent| !placed[opponent])
            .count()
    }

    fn first_unplaced_opponent(&self, student: usize, placed: &[bool]) -> Option<usize> {
        (0..placed.len()).find(|&other| !placed[other] && self.0[student].contains(&other))
    }

    /// The first unplaced student with the strictly greatest number of
    /// unplaced opponents. Must only be called while someone is unplaced.
    fn best_connected(&self, placed: &[bool]) -> usize {
        let mut unplaced = (0..placed.len()).filter(|&i| !placed[i]);
        let first = unplaced.next().unwrap_or_default();
        let mut best = (first, self.remaining_connections(first, placed));

        for candidate in unplaced {
            let connections = self.remaining_connections(candidate, placed);
            if connections > best.1 {
                best = (candidate, connections);
            }
        }

        best.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::{match_record::Match, outcome::GameResult, slot::Slot, student::Student};

    use super::cluster_tier;

    fn students(names: &[&str]) -> Vec<Student> {
        names
            .iter()
            .map(|name| Student::new(name.to_lowercase(), name, Utc::now()))
            .collect()
    }

    fn tie(a: &Student, b: &Student) -> Match {
        Match {
            id: format!("{}-{}", a.id, b.id),
            player1_id: a.id.clone(),
            player1_name: a.name.clone(),
            player1_choice: None,
            player2_id: b.id.clone(),
            player2_name: b.name.clone(),
            player2_choice: None,
            result: GameResult::Tie,
            match_result: None::<Slot>,
            winner: None,
            created_at: Utc::now(),
        }
    }

    fn names<'a>(order: &[&'a Student]) -> Vec<&'a str> {
        order.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn empty_and_single() {
        assert!(cluster_tier(&[], &[]).is_empty());

        let roster = students(&["Solo"]);
        let tier: Vec<_> = roster.iter().collect();
        assert_eq!(names(&cluster_tier(&tier, &[])), ["Solo"]);
    }

    #[test]
    fn no_opponents_keeps_input_order() {
        let roster = students(&["Ann", "Ben", "Cat", "Dan"]);
        let tier: Vec<_> = roster.iter().collect();
        assert_eq!(names(&cluster_tier(&tier, &[])), ["Ann", "Ben", "Cat", "Dan"]);
    }

    #[test]
    fn opponents_end_up_adjacent() {
        let roster = students(&["Ann", "Ben", "Cat", "Dan"]);
        let tier: Vec<_> = roster.iter().collect();
        let matches = [tie(&roster[0], &roster[2]), tie(&roster[1], &roster[3])];

        assert_eq!(
            names(&cluster_tier(&tier, &matches)),
            ["Ann", "Cat", "Ben", "Dan"]
        );
    }

    #[test]
    fn seed_is_best_connected() {
        let roster = students(&["Ann", "Ben", "Cat", "Dan"]);
        let tier: Vec<_> = roster.iter().collect();
        let matches = [
            tie(&roster[2], &roster[0]),
            tie(&roster[2], &roster[1]),
            tie(&roster[2], &roster[3]),
        ];

        assert_eq!(
            names(&cluster_tier(&tier, &matches)),
            ["Cat", "Ann", "Ben", "Dan"]
        );
    }

    #[test]
    fn walks_a_chain() {
        let roster = students(&["Ann", "Ben", "Cat", "Dan", "Eve"]);
        let tier: Vec<_> = roster.iter().collect();
        // Ann - Cat - Eve - Dan, Ben alone.
        let matches = [
            tie(&roster[4], &roster[2]),
            tie(&roster[2], &roster[0]),
            tie(&roster[3], &roster[4]),
        ];

        assert_eq!(
            names(&cluster_tier(&tier, &matches)),
            ["Cat", "Ann", "Dan", "Eve", "Ben"]
        );
    }

    #[test]
    fn ignores_matches_outside_the_tier() {
        let roster = students(&["Ann", "Ben", "Cat"]);
        let tier = vec![&roster[0], &roster[1]];
        let matches = [tie(&roster[1], &roster[2])];

        assert_eq!(names(&cluster_tier(&tier, &matches)), ["Ann", "Ben"]);
    }

    #[test]
    fn every_member_placed_once() {
        let roster = students(&["Ann", "Ben", "Cat", "Dan", "Eve", "Fay"]);
        let tier: Vec<_> = roster.iter().collect();
        let matches = [
            tie(&roster[0], &roster[1]),
            tie(&roster[1], &roster[2]),
            tie(&roster[2], &roster[0]),
            tie(&roster[3], &roster[4]),
        ];

        let order = cluster_tier(&tier, &matches);
        let mut sorted = names(&order);
        sorted.sort_unstable();
        assert_eq!(sorted, ["Ann", "Ben", "Cat", "Dan", "Eve", "Fay"]);
        assert_eq!(order, cluster_tier(&tier, &matches));
    }
}
