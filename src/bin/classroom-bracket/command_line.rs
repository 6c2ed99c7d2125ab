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

use std::{io::Write as _, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use classroom_bracket::{
    COPYRIGHT, LONG_VERSION,
    choice::Choice,
    layout::{LayoutConfig, Point},
    slot::Slot,
};

/// Classroom Bracket
///
/// Runs a rock paper scissors elimination tournament and lays it out as
/// concentric rings, most wins in the middle.
#[derive(Parser, Debug)]
#[command(long_version = LONG_VERSION, about = "Classroom Bracket")]
pub(crate) struct Args {
    /// The tournament data file [default: <data dir>/classroom-bracket/tournament.ron]
    #[arg(long, value_name = "path")]
    pub data_file: Option<PathBuf>,

    /// Whether to log on the debug level
    #[arg(long)]
    pub debug: bool,

    /// Whether the application is being run by systemd
    #[arg(long)]
    pub systemd: bool,

    /// Build the manpage
    #[arg(long)]
    pub man: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Add every name in a file, one per line
    Import { file: PathBuf },

    /// Add one student
    Add { name: String },

    /// List students
    Students {
        /// Only names containing this, ignoring case
        #[arg(long)]
        search: Option<String>,

        /// Leave out eliminated students
        #[arg(long)]
        active: bool,
    },

    /// Record a match by naming the winner, the loser is eliminated
    Record {
        /// Player 1, by id or name
        player1: String,
        /// Player 2, by id or name
        player2: String,
        /// player1 or player2
        winner: Slot,
    },

    /// Record a round of rock paper scissors
    Play {
        player1: String,
        choice1: Choice,
        player2: String,
        choice2: Choice,
    },

    /// Delete a match and bring its loser back
    Delete { id: String },

    /// Take a student out of the tournament, by id or name
    Eliminate { student: String },

    /// Bring an eliminated student back, by id or name
    Reactivate { student: String },

    /// List matches, newest first
    Matches,

    /// Show the bracket
    Bracket {
        #[arg(default_value_t = 550.0, long)]
        center_x: f64,

        #[arg(default_value_t = 350.0, long)]
        center_y: f64,

        /// Radius of the innermost ring
        #[arg(default_value_t = 1500.0, long)]
        base_radius: f64,

        /// Distance between rings
        #[arg(default_value_t = 200.0, long)]
        radius_step: f64,
    },

    /// Active students by wins
    Leaderboard,

    /// How many students are left
    Status,

    /// Choice and participation statistics
    Stats,
}

impl Command {
    pub(crate) fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Import { .. }
                | Self::Add { .. }
                | Self::Record { .. }
                | Self::Play { .. }
                | Self::Delete { .. }
                | Self::Eliminate { .. }
                | Self::Reactivate { .. }
        )
    }
}

pub(crate) fn layout_config(
    center_x: f64,
    center_y: f64,
    base_radius: f64,
    radius_step: f64,
) -> LayoutConfig {
    LayoutConfig {
        center: Point::new(center_x, center_y),
        base_radius,
        radius_step,
        ..LayoutConfig::default()
    }
}

impl Args {
    /// Every run other than `--man` needs a subcommand.
    pub(crate) fn take_command(&mut self) -> anyhow::Result<Command> {
        self.command
            .take()
            .ok_or_else(|| anyhow::Error::msg("no command given, see --help"))
    }

    pub(crate) fn generate_man_page() -> anyhow::Result<()> {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Self::command().name("classroom-bracket").long_version(None);
        let man = clap_mangen::Man::new(cmd).date("2026-10-19");

        man.render(&mut buffer)?;
        write!(buffer, "{COPYRIGHT}")?;

        std::fs::write("classroom-bracket.1", buffer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use classroom_bracket::slot::Slot;

    use super::{Args, Command};

    #[test]
    fn a_command_is_required() -> anyhow::Result<()> {
        let mut args = Args::try_parse_from(["classroom-bracket", "--debug"])?;
        assert!(args.take_command().is_err());

        let mut args = Args::try_parse_from(["classroom-bracket", "status"])?;
        assert!(matches!(args.take_command()?, Command::Status));
        Ok(())
    }

    #[test]
    fn parses_student_updates() -> anyhow::Result<()> {
        let mut args = Args::try_parse_from(["classroom-bracket", "eliminate", "Alice"])?;
        let command = args.take_command()?;
        assert!(command.mutates());
        assert!(matches!(command, Command::Eliminate { student } if student == "Alice"));

        let mut args = Args::try_parse_from(["classroom-bracket", "reactivate", "Alice"])?;
        assert!(matches!(args.take_command()?, Command::Reactivate { .. }));

        let mut args =
            Args::try_parse_from(["classroom-bracket", "record", "Alice", "Bob", "player2"])?;
        assert!(matches!(
            args.take_command()?,
            Command::Record { winner: Slot::Player2, .. }
        ));
        Ok(())
    }
}
