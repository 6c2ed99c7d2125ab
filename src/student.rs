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

use crate::Id;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Student {
    pub id: Id,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub eliminated: bool,
    #[serde(default)]
    pub eliminated_at: Option<DateTime<Utc>>,
}

impl Student {
    #[must_use]
    pub fn new(id: Id, name: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.to_string(),
            created_at,
            eliminated: false,
            eliminated_at: None,
        }
    }

    /// Marks the student as out of the tournament as of `now`, also when they
    /// were already out.
    pub fn eliminate(&mut self, now: DateTime<Utc>) {
        self.eliminated = true;
        self.eliminated_at = Some(now);
    }

    pub fn reactivate(&mut self) {
        self.eliminated = false;
        self.eliminated_at = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.eliminated
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.eliminated {
            write!(f, "{} {} eliminated", self.id, self.name)
        } else {
            write!(f, "{} {} active", self.id, self.name)
        }
    }
}
