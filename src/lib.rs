//! A tournament manager for classroom rock paper scissors.
//!
//! Students are imported from a roster, every recorded match eliminates its
//! loser, and the bracket puts everyone on concentric rings: the more wins a
//! student has, the closer to the center they sit. Students who played each
//! other are kept next to each other on their ring and every elimination that
//! moved someone inward is drawn as a progression edge.
//!
//! ## Feature Flags
//!
//! * bench - enable the criterion benchmarks
//! * debug - log on the debug level by default
//!
//! ## Layout
//!
//! [`bracket::compute_bracket`] is a pure function of the roster and the
//! match history. It is recomputed from scratch on every change, see
//! [`bracket::BracketWatcher`] for keeping one up to date with a
//! [`tournament::Tournament`].

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

#![deny(clippy::panic)]

pub mod bracket;
pub mod choice;
pub mod cluster;
pub mod layout;
pub mod match_record;
pub mod outcome;
pub mod progression;
pub mod roster;
pub mod slot;
pub mod standings;
pub mod student;
pub mod subscription;
pub mod tiers;
pub mod tournament;
pub mod utils;

/// Opaque, stable identifier of a student or a match.
pub type Id = String;

pub const HOME: &str = "classroom-bracket";
pub const DATA_FILE: &str = "tournament.ron";

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2026 Developers of the classroom-bracket project

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2026 Developers of the classroom-bracket project
Licensed under the AGPLv3"
);
