mod report;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use timesheet_core::config::resolve_data_dir;
use timesheet_core::{
    format_time_input, parse_date, EngineConfig, FileKeyValueStore, TimesheetSession,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timesheet")]
#[command(about = "Working hours per ISO week, overtime and the team meeting rotation", long_about = None)]
struct Cli {
    /// Directory holding working hours, meeting overrides and config.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level (otherwise RUST_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Save working hours for a date (usage: set 2025-01-06 0900 1730)
    Set {
        date: String,
        start: String,
        end: String,
    },
    /// Remove the working hours of a date
    Remove { date: String },
    /// Show the working hours of a date
    Show { date: String },
    /// List every ISO week with recorded hours
    Weeks,
    /// Monthly summary with overtime
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Team meetings of a month (usage: meetings --cancel 2 --move 3:2025-01-22)
    Meetings {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// 1-based row to mark cancelled
        #[arg(long)]
        cancel: Vec<usize>,
        /// ROW:YYYY-MM-DD, moves a meeting to another date
        #[arg(long = "move")]
        moves: Vec<String>,
    },
    /// Week numbers of the calendar anchors for a year
    Calendar {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Preview how raw input is formatted as a time
    Format { raw: String },
    /// Print the active configuration (--init writes it to config.json)
    Config {
        #[arg(long)]
        init: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date_arg(input: &str) -> Option<NaiveDate> {
    let date = parse_date(input);
    if date.is_none() {
        println!("Error: '{}' is not a YYYY-MM-DD date.", input);
    }
    date
}

fn parse_move(input: &str) -> Option<(usize, &str)> {
    let (row, date) = input.split_once(':')?;
    Some((row.parse().ok()?, date))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir)?;
    let config = EngineConfig::load(&data_dir)?;
    debug!(data_dir = %data_dir.display(), ?config, "configuration loaded");
    let today = Local::now().date_naive();

    if let Some(Commands::Config { init }) = &cli.command {
        if *init {
            config.save(&data_dir)?;
            println!("Wrote {}", data_dir.join(timesheet_core::config::CONFIG_FILE_NAME).display());
        }
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let (year, month) = match &cli.command {
        Some(Commands::Month { year, month }) | Some(Commands::Meetings { year, month, .. }) => (
            year.unwrap_or(today.year()),
            month.unwrap_or(today.month()),
        ),
        _ => (today.year(), today.month()),
    };
    if !(1..=12).contains(&month) {
        println!("Error: month must be between 1 and 12.");
        return Ok(());
    }

    let store = FileKeyValueStore::new(Some(data_dir))?;
    let mut session = TimesheetSession::open(store, config, year, month);

    match cli.command {
        Some(Commands::Set { date, start, end }) => {
            let Some(date) = parse_date_arg(&date) else {
                return Ok(());
            };
            let entry = session.save_hours(date, &start, &end);
            report::show_entry(&entry);
            if !entry.is_complete() {
                println!("Note: incomplete times are stored as unset and not counted.");
            }
        }
        Some(Commands::Remove { date }) => {
            let Some(date) = parse_date_arg(&date) else {
                return Ok(());
            };
            if session.remove_hours(date) {
                println!("Removed working hours for {}", date);
            } else {
                println!("No working hours recorded for {}", date);
            }
        }
        Some(Commands::Show { date }) => {
            let Some(date) = parse_date_arg(&date) else {
                return Ok(());
            };
            report::show_entry(&session.select_day(date));
            println!("Week {}", session.snapshot().marked_dates.week_number_for(date));
        }
        Some(Commands::Weeks) => {
            let weeks: Vec<_> = session.snapshot().weeks.iter().collect();
            report::show_weeks(&weeks);
        }
        Some(Commands::Meetings { cancel, moves, .. }) => {
            let ids: Vec<_> = session.snapshot().meetings.iter().map(|m| m.id).collect();

            for row in cancel {
                match row.checked_sub(1).and_then(|i| ids.get(i)) {
                    Some(id) => session.cancel_meeting(id)?,
                    None => println!("Warning: no meeting in row {}", row),
                }
            }
            for arg in &moves {
                let Some((row, date)) = parse_move(arg) else {
                    println!("Warning: expected ROW:YYYY-MM-DD, got '{}'", arg);
                    continue;
                };
                match row.checked_sub(1).and_then(|i| ids.get(i)) {
                    Some(id) => {
                        if let Err(e) = session.edit_meeting(id, date) {
                            println!("Warning: {}", e);
                        }
                    }
                    None => println!("Warning: no meeting in row {}", row),
                }
            }

            report::show_meetings(&session.snapshot().meetings);
        }
        Some(Commands::Calendar { year }) => {
            let year = year.unwrap_or(today.year());
            for anchor in timesheet_core::generate_week_anchors(year) {
                println!("{}  week {:>2}", anchor.date, anchor.week_number);
            }
        }
        Some(Commands::Format { raw }) => {
            let formatted = format_time_input(&raw);
            let state = if timesheet_core::input::is_complete_time(&formatted) {
                "complete"
            } else {
                "partial"
            };
            println!("{} ({})", formatted, state);
        }
        Some(Commands::Month { .. }) | None => {
            let snapshot = session.snapshot();
            report::show_month(&snapshot.month, &snapshot.weeks_in_month());
        }
        Some(Commands::Config { .. }) => {}
    }

    Ok(())
}
