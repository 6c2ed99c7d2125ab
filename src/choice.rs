use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{outcome::GameResult, slot::Slot};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    #[must_use]
    pub fn beats(&self) -> Self {
        match self {
            Self::Rock => Self::Scissors,
            Self::Paper => Self::Rock,
            Self::Scissors => Self::Paper,
        }
    }
}

/// Decides a legacy move-based match. The slot is `None` on a tie.
#[must_use]
pub fn determine_result(player1: Choice, player2: Choice) -> (GameResult, Option<Slot>) {
    if player1 == player2 {
        (GameResult::Tie, None)
    } else if player1.beats() == player2 {
        (GameResult::Win, Some(Slot::Player1))
    } else {
        (GameResult::Win, Some(Slot::Player2))
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rock => write!(f, "rock"),
            Self::Paper => write!(f, "paper"),
            Self::Scissors => write!(f, "scissors"),
        }
    }
}

impl FromStr for Choice {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        let string = string.to_lowercase();

        match string.as_str() {
            "r" | "rock" => Ok(Self::Rock),
            "p" | "paper" => Ok(Self::Paper),
            "s" | "scissors" => Ok(Self::Scissors),
            _ => Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a Choice!"
            ))),
        }
    }
}
