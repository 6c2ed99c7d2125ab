use std::{fs, io::Write, path::PathBuf};

use anyhow::Context;
use chrono::Local;
use env_logger::{Builder, Env};
use log::Level;

use crate::{DATA_FILE, HOME};

/// Logs to stderr. `RUST_LOG` overrides the level; otherwise it is `debug`
/// with `debug` set (or the `debug` feature) and `info` without.
///
/// Under systemd the journal adds its own timestamps, so lines only carry a
/// `<N>` priority prefix it understands.
pub fn init_logger(debug: bool, systemd: bool) {
    let level = if debug || cfg!(feature = "debug") {
        "debug"
    } else {
        "info"
    };

    Builder::from_env(Env::default().default_filter_or(level))
        .format(move |formatter, record| {
            if systemd {
                writeln!(
                    formatter,
                    "<{}>{}",
                    journal_priority(record.level()),
                    record.args()
                )
            } else {
                writeln!(
                    formatter,
                    "{} {:<5} {}: {}",
                    Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            }
        })
        .init();
}

/// syslog(3) priorities as read by journald.
fn journal_priority(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

#[must_use]
pub fn data_folder() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HOME)
}

#[must_use]
pub fn data_file() -> PathBuf {
    data_folder().join(DATA_FILE)
}

/// # Errors
///
/// If the folder can't be created.
pub fn create_data_folder() -> anyhow::Result<()> {
    let folder = data_folder();
    fs::create_dir_all(&folder).with_context(|| format!("creating {}", folder.display()))
}
