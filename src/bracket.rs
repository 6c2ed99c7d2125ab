use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError, mpsc::Receiver},
    thread::{self, JoinHandle},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    Id,
    cluster::cluster_tier,
    layout::{LayoutConfig, Point},
    match_record::Match,
    outcome::GameResult,
    progression::{BracketEdge, progression_edges},
    student::Student,
    tiers::WinTiers,
    tournament::Snapshot,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum NodeStatus {
    Active,
    Champion,
    Eliminated,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Champion => write!(f, "CHAMPION"),
            Self::Eliminated => write!(f, "ELIMINATED"),
        }
    }
}

/// One student placed on the bracket.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BracketNode {
    pub student_id: Id,
    pub name: String,
    pub win_count: u32,
    pub loss_count: u32,
    pub tie_count: u32,
    /// Position within the tier after clustering.
    pub angular_index: usize,
    pub ring_radius: f64,
    pub angle: f64,
    pub position: Point,
    pub is_eliminated: bool,
    pub is_champion: bool,
}

impl BracketNode {
    #[must_use]
    pub fn id(&self) -> String {
        format!("player-{}", self.student_id)
    }

    #[must_use]
    pub fn status(&self) -> NodeStatus {
        if self.is_eliminated {
            NodeStatus::Eliminated
        } else if self.is_champion {
            NodeStatus::Champion
        } else {
            NodeStatus::Active
        }
    }
}

impl fmt::Display for BracketNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} W: {} L: {}",
            self.name, self.win_count, self.loss_count
        )?;

        if self.tie_count > 0 {
            write!(f, " T: {}", self.tie_count)?;
        }

        write!(f, " {} at {}", self.status(), self.position)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Bracket {
    pub nodes: Vec<BracketNode>,
    pub edges: Vec<BracketEdge>,
}

impl Bracket {
    #[must_use]
    pub fn node(&self, student_id: &str) -> Option<&BracketNode> {
        self.nodes.iter().find(|node| node.student_id == student_id)
    }

    #[must_use]
    pub fn champions(&self) -> Vec<&BracketNode> {
        self.nodes.iter().filter(|node| node.is_champion).collect()
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wins = None;
        for node in &self.nodes {
            if wins != Some(node.win_count) {
                wins = Some(node.win_count);
                writeln!(
                    f,
                    "== {} wins, radius {:.0} ==",
                    node.win_count, node.ring_radius
                )?;
            }
            writeln!(f, "{:>3} {node}", node.angular_index)?;
        }

        if !self.edges.is_empty() {
            writeln!(f, "== progression ==")?;
        }

        for edge in &self.edges {
            let source = self.node(&edge.source_student_id).map_or("?", |n| n.name.as_str());
            let target = self.node(&edge.target_student_id).map_or("?", |n| n.name.as_str());
            writeln!(f, "{source} -> {target}: {}", edge.label())?;
        }

        Ok(())
    }
}

/// Lays out the whole bracket from scratch. Never fails: an empty roster
/// gives an empty bracket and matches naming unknown students are ignored.
#[must_use]
pub fn compute_bracket(students: &[Student], matches: &[Match], config: &LayoutConfig) -> Bracket {
    let tiers = WinTiers::new(students, matches);
    if tiers.is_empty() {
        return Bracket::default();
    }

    let mut nodes = Vec::with_capacity(students.len());
    for (&wins, tier) in &tiers.tiers {
        let ordered = cluster_tier(tier, matches);
        let radius = config.ring_radius(wins, tiers.max_wins);

        for (seat, student) in config.ring(radius, ordered.len()).into_iter().zip(ordered) {
            let (loss_count, tie_count) = losses_and_ties(student, matches);

            nodes.push(BracketNode {
                student_id: student.id.clone(),
                name: student.name.clone(),
                win_count: wins,
                loss_count,
                tie_count,
                angular_index: seat.index,
                ring_radius: radius,
                angle: seat.angle,
                position: seat.position,
                is_eliminated: student.eliminated,
                is_champion: wins == tiers.max_wins && !student.eliminated,
            });
        }
    }

    let edges = progression_edges(students, matches, &tiers);
    debug!(
        "bracket: {} nodes on {} rings, {} edges, max wins {}",
        nodes.len(),
        tiers.tiers.len(),
        edges.len(),
        tiers.max_wins
    );

    Bracket { nodes, edges }
}

fn losses_and_ties(student: &Student, matches: &[Match]) -> (u32, u32) {
    let mut losses = 0;
    let mut ties = 0;

    for game in matches.iter().filter(|game| game.involves(&student.id)) {
        if game
            .winner
            .as_ref()
            .is_some_and(|winner| *winner != student.name)
        {
            losses += 1;
        }
        if game.result == GameResult::Tie {
            ties += 1;
        }
    }

    (losses, ties)
}

/// Keeps the latest bracket for a stream of store snapshots. Every snapshot
/// replaces the previous bracket as a whole.
#[derive(Debug)]
pub struct BracketWatcher {
    current: Arc<Mutex<Bracket>>,
    handle: JoinHandle<()>,
}

impl BracketWatcher {
    #[must_use]
    pub fn spawn(snapshots: Receiver<Snapshot>, config: LayoutConfig) -> Self {
        let current = Arc::new(Mutex::new(Bracket::default()));
        let shared = Arc::clone(&current);

        let handle = thread::spawn(move || {
            for snapshot in snapshots {
                let bracket = compute_bracket(&snapshot.students, &snapshot.matches, &config);
                *shared.lock().unwrap_or_else(PoisonError::into_inner) = bracket;
            }
        });

        Self { current, handle }
    }

    #[must_use]
    pub fn current(&self) -> Bracket {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Waits for the snapshot channel to close and returns the final bracket.
    ///
    /// # Errors
    ///
    /// If the watcher thread panicked.
    pub fn join(self) -> anyhow::Result<Bracket> {
        let Self { current, handle } = self;
        handle
            .join()
            .map_err(|_| anyhow::Error::msg("the bracket watcher panicked"))?;

        let bracket = current.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(bracket.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::{
        layout::LayoutConfig, match_record::Match, outcome::GameResult, slot::Slot,
        student::Student,
    };

    use std::sync::mpsc;

    use crate::tournament::Snapshot;

    use super::{BracketWatcher, NodeStatus, compute_bracket};

    fn student(id: &str, name: &str) -> Student {
        Student::new(id.to_string(), name, Utc::now())
    }

    fn game(id: &str, a: &Student, b: &Student, result: GameResult, winner: Option<Slot>) -> Match {
        Match {
            id: id.to_string(),
            player1_id: a.id.clone(),
            player1_name: a.name.clone(),
            player1_choice: None,
            player2_id: b.id.clone(),
            player2_name: b.name.clone(),
            player2_choice: None,
            result,
            match_result: winner,
            winner: winner.map(|slot| match slot {
                Slot::Player1 => a.name.clone(),
                Slot::Player2 => b.name.clone(),
            }),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_roster_is_empty_bracket() {
        let bracket = compute_bracket(&[], &[], &LayoutConfig::default());
        assert!(bracket.nodes.is_empty());
        assert!(bracket.edges.is_empty());
    }

    #[test]
    fn losses_and_ties_are_counted() {
        let mut students = vec![student("a", "A"), student("b", "B"), student("c", "C")];
        let matches = vec![
            game("1", &students[0], &students[1], GameResult::Win, Some(Slot::Player1)),
            game("2", &students[1], &students[2], GameResult::Tie, None),
        ];
        students[1].eliminate(Utc::now());

        let bracket = compute_bracket(&students, &matches, &LayoutConfig::default());
        let b = bracket.node("b").unwrap();
        assert_eq!((b.win_count, b.loss_count, b.tie_count), (0, 1, 1));
        assert_eq!(b.status(), NodeStatus::Eliminated);

        let a = bracket.node("a").unwrap();
        assert_eq!((a.win_count, a.loss_count, a.tie_count), (1, 0, 0));
        assert_eq!(a.status(), NodeStatus::Champion);

        let c = bracket.node("c").unwrap();
        assert_eq!((c.win_count, c.loss_count, c.tie_count), (0, 0, 1));
        assert_eq!(c.status(), NodeStatus::Active);
        assert_eq!(c.id(), "player-c");
    }

    #[test]
    fn eliminated_max_winner_is_not_champion() {
        let mut students = vec![student("a", "A"), student("b", "B")];
        let matches = vec![game(
            "1",
            &students[0],
            &students[1],
            GameResult::Win,
            Some(Slot::Player1),
        )];
        students[0].eliminate(Utc::now());

        let bracket = compute_bracket(&students, &matches, &LayoutConfig::default());
        assert!(bracket.champions().is_empty());
    }

    #[test]
    fn display_lists_rings_and_edges() {
        let students = vec![student("a", "A"), student("b", "B")];
        let matches = vec![game(
            "1",
            &students[0],
            &students[1],
            GameResult::Win,
            Some(Slot::Player1),
        )];

        let text = compute_bracket(&students, &matches, &LayoutConfig::default()).to_string();
        assert!(text.contains("== 0 wins, radius 1700 =="));
        assert!(text.contains("== 1 wins, radius 1500 =="));
        assert!(text.contains("B -> A: Beat B"));
    }

    #[test]
    fn watcher_join_returns_the_last_bracket() -> anyhow::Result<()> {
        let students = vec![student("a", "A"), student("b", "B")];
        let matches = vec![game(
            "1",
            &students[0],
            &students[1],
            GameResult::Win,
            Some(Slot::Player1),
        )];

        let (tx, rx) = mpsc::channel();
        let watcher = BracketWatcher::spawn(rx, LayoutConfig::default());
        tx.send(Snapshot {
            students: students.clone(),
            matches: Vec::new(),
        })?;
        tx.send(Snapshot {
            students: students.clone(),
            matches: matches.clone(),
        })?;
        drop(tx);

        let bracket = watcher.join()?;
        assert_eq!(
            bracket,
            compute_bracket(&students, &matches, &LayoutConfig::default())
        );
        assert_eq!(bracket.edges.len(), 1);
        Ok(())
    }
}
