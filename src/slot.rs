use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which side of a match a student was recorded on.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Slot {
    Player1,
    Player2,
}

impl Slot {
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Player1 => write!(f, "player1"),
            Slot::Player2 => write!(f, "player2"),
        }
    }
}

impl FromStr for Slot {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        let string = string.to_lowercase();

        match string.as_str() {
            "1" | "player1" => Ok(Self::Player1),
            "2" | "player2" => Ok(Self::Player2),
            _ => Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a Slot!"
            ))),
        }
    }
}
