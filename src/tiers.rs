use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::{match_record::Match, student::Student};

/// Students grouped by how many matches they have won.
#[derive(Clone, Debug, Default)]
pub struct WinTiers<'a> {
    /// Win count keyed by student id.
    pub wins: FxHashMap<&'a str, u32>,
    /// Students keyed by win count, each list in roster order.
    pub tiers: BTreeMap<u32, Vec<&'a Student>>,
    pub max_wins: u32,
}

impl<'a> WinTiers<'a> {
    /// A win is credited to every student whose name equals a match's
    /// recorded `winner`. Ties name no winner and so count for nobody.
    #[must_use]
    pub fn new(students: &'a [Student], matches: &[Match]) -> Self {
        let mut wins_by_name: FxHashMap<&str, u32> = FxHashMap::default();
        for game in matches {
            if let Some(winner) = &game.winner {
                *wins_by_name.entry(winner.as_str()).or_default() += 1;
            }
        }

        let mut tiers = Self::default();
        for student in students {
            let wins = wins_by_name
                .get(student.name.as_str())
                .copied()
                .unwrap_or_default();

            tiers.wins.insert(student.id.as_str(), wins);
            tiers.tiers.entry(wins).or_default().push(student);
            tiers.max_wins = tiers.max_wins.max(wins);
        }

        tiers
    }

    #[must_use]
    pub fn wins_of(&self, student_id: &str) -> Option<u32> {
        self.wins.get(student_id).copied()
    }

    #[must_use]
    pub fn tier(&self, wins: u32) -> &[&'a Student] {
        self.tiers
            .get(&wins)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
