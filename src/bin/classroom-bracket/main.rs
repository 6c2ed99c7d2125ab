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

#![deny(clippy::expect_used)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

mod command_line;

use std::fs;

use anyhow::Context;
use clap::Parser;
use classroom_bracket::{
    Id,
    standings::{MatchStatistics, TournamentStatus, leaderboard},
    tournament::Tournament,
    utils::{self, create_data_folder, data_file},
};
use log::{error, info};

use crate::command_line::{Args, Command, layout_config};

fn main() -> anyhow::Result<()> {
    let mut args = Args::parse();
    utils::init_logger(args.debug, args.systemd);

    if args.man {
        return Args::generate_man_page();
    }

    let command = args.take_command().inspect_err(|error| error!("{error}"))?;

    let path = if let Some(path) = args.data_file {
        path
    } else {
        create_data_folder()?;
        data_file()
    };

    let mut tournament = Tournament::load(&path)?;
    let mutates = command.mutates();

    run(&mut tournament, command)?;

    if mutates {
        tournament.save(&path)?;
        info!("saved {}", path.display());
    }

    Ok(())
}

fn run(tournament: &mut Tournament, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let ids = tournament.import_roster(&text)?;
            println!("imported {} students", ids.len());
        }
        Command::Add { name } => {
            let id = tournament.add_student(&name)?;
            println!("{id}");
        }
        Command::Students { search, active } => {
            let students = match search {
                Some(term) => tournament.search_students(&term, active),
                None if active => tournament.active_students(),
                None => tournament.students(),
            };

            for student in students {
                println!("{student} {}", tournament.match_count(&student.id));
            }
        }
        Command::Record {
            player1,
            player2,
            winner,
        } => {
            let player1 = resolve(tournament, &player1)?;
            let player2 = resolve(tournament, &player2)?;
            let id = tournament.record_match_with_winner(&player1, &player2, winner)?;
            println!("{id}");
        }
        Command::Play {
            player1,
            choice1,
            player2,
            choice2,
        } => {
            let player1 = resolve(tournament, &player1)?;
            let player2 = resolve(tournament, &player2)?;
            let id = tournament.record_match_with_choices(&player1, choice1, &player2, choice2)?;
            println!("{id}");
        }
        Command::Delete { id } => {
            tournament.delete_match(&id)?;
            println!("deleted {id}");
        }
        Command::Eliminate { student } => {
            let id = resolve(tournament, &student)?;
            tournament.eliminate_student(&id)?;
            println!("eliminated {student}");
        }
        Command::Reactivate { student } => {
            let id = resolve(tournament, &student)?;
            tournament.reactivate_student(&id)?;
            println!("reactivated {student}");
        }
        Command::Matches => {
            for game in tournament.matches() {
                println!("{game}");
            }
        }
        Command::Bracket {
            center_x,
            center_y,
            base_radius,
            radius_step,
        } => {
            let config = layout_config(center_x, center_y, base_radius, radius_step);
            print!("{}", tournament.bracket(&config));
        }
        Command::Leaderboard => {
            let snapshot = tournament.snapshot();
            for (place, standing) in (1..).zip(leaderboard(&snapshot.students, &snapshot.matches)) {
                println!("{place:>3}. {standing}");
            }
        }
        Command::Status => {
            print!("{}", TournamentStatus::new(&tournament.students()));
        }
        Command::Stats => {
            let snapshot = tournament.snapshot();
            print!(
                "{}",
                MatchStatistics::new(&snapshot.students, &snapshot.matches)
            );
        }
    }

    Ok(())
}

fn resolve(tournament: &Tournament, id_or_name: &str) -> anyhow::Result<Id> {
    tournament
        .find_student(id_or_name)
        .map(|student| student.id.clone())
        .ok_or_else(|| anyhow::Error::msg(format!("no student called {id_or_name}")))
}
