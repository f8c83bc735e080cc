use chrono::NaiveDate;
use clap::Subcommand;
use std::path::PathBuf;

use super::{CmdResult, DaySession};

#[derive(Subcommand)]
pub enum DayAction {
    /// Print the day's events in time order
    Show {
        /// List in file order with the positions other commands take
        #[arg(long)]
        positions: bool,
    },
    /// Print the day document as JSON
    Export,
    /// Replace the day's events with a JSON file's contents
    Import {
        /// Day document (`{"events": [...]}` or a bare array)
        file: PathBuf,
    },
    /// Remove every event of the day
    Clear,
}

pub fn run(action: DayAction, date: Option<NaiveDate>) -> CmdResult {
    let mut session = DaySession::open(date)?;
    match action {
        DayAction::Show { positions } => {
            let timeline = session.editor.timeline();
            if timeline.is_empty() {
                println!("no events");
            } else if positions {
                for (pos, (_, event)) in timeline.iter().enumerate() {
                    println!("[{pos}] {}", event.label());
                }
            } else {
                println!("{}", timeline.text_summary());
            }
        }
        DayAction::Export => {
            println!("{}", session.editor.timeline().to_json()?);
        }
        DayAction::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
            let count = session
                .editor
                .import_json(&content)
                .map_err(|e| format!("{} is not a day document: {e}", file.display()))?;
            let location = session.save()?;
            println!("imported {count} events into {location}");
        }
        DayAction::Clear => {
            session.editor.clear_day();
            let location = session.save()?;
            println!("cleared {location}");
        }
    }
    Ok(())
}
