use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use timesheet_core::{format_date, MeetingOccurrence, MonthSummary, TimeOfDay, WeekSummary, WorkEntry};

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "Dates")]
    dates: String,
    #[tabled(rename = "Total (h)")]
    total: String,
    #[tabled(rename = "Overtime (h)")]
    overtime: String,
}

#[derive(Tabled)]
struct MeetingRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ID")]
    id: String,
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

pub fn show_entry(entry: &WorkEntry) {
    let show = |t: Option<TimeOfDay>| t.map(|t| t.to_string()).unwrap_or_else(|| "--:--".to_string());
    println!(
        "{}  start {}  end {}",
        format_date(entry.date),
        show(entry.start),
        show(entry.end)
    );
}

pub fn show_weeks(weeks: &[&WeekSummary]) {
    if weeks.is_empty() {
        println!("No working hours recorded.");
        return;
    }

    let rows: Vec<WeekRow> = weeks
        .iter()
        .map(|week| WeekRow {
            week: format!("{} ({})", week.week_number, week.iso_year),
            dates: week
                .dates
                .iter()
                .map(|d| d.format("%a %d %b").to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            total: format!("{:.2}", week.total_hours),
            overtime: if week.overtime_hours > 0.0 {
                format!("{:.2}", week.overtime_hours)
            } else {
                "-".to_string()
            },
        })
        .collect();

    println!("{}", styled(Table::new(rows)));
}

pub fn show_month(summary: &MonthSummary, weeks: &[&WeekSummary]) {
    println!(
        "\n\x1b[1;36mMonthly Summary - {:04}-{:02}\x1b[0m",
        summary.year, summary.month
    );
    show_weeks(weeks);
    println!("Monthly Total:    {:.2} hours", summary.total_hours);
    let colour = if summary.overtime_hours > 0.0 { "31" } else { "32" };
    println!(
        "Monthly Overtime: \x1b[{}m{:.2} hours\x1b[0m",
        colour, summary.overtime_hours
    );
}

pub fn show_meetings(meetings: &[MeetingOccurrence]) {
    if meetings.is_empty() {
        println!("No team meetings this month");
        return;
    }

    let rows: Vec<MeetingRow> = meetings
        .iter()
        .enumerate()
        .map(|(i, meeting)| {
            let id = meeting.id.to_string();
            MeetingRow {
                index: i + 1,
                date: meeting.date.format("%a %b %-d").to_string(),
                team: meeting.team.to_string(),
                status: if meeting.is_cancelled { "cancelled" } else { "scheduled" }.to_string(),
                id: id[..8].to_string(),
            }
        })
        .collect();

    println!("{}", styled(Table::new(rows)));
}
