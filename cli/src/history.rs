use ecotrack_core::{CategoryBreakdown, WeeklyHistory};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Logs")]
    records: usize,
    #[tabled(rename = "Transport")]
    transportation: String,
    #[tabled(rename = "Energy")]
    energy: String,
    #[tabled(rename = "Food")]
    food: String,
    #[tabled(rename = "Waste")]
    waste: String,
    #[tabled(rename = "Total (kg)")]
    total: String,
}

pub fn show_history(histories: &[WeeklyHistory]) {
    if histories.is_empty() {
        println!("No footprints logged yet.");
        return;
    }

    for history in histories {
        println!(
            "\n\x1b[1;36mWeek {}, {}\x1b[0m (Total: {:.1} kg CO2e{})",
            history.week,
            history.year,
            history.breakdown.total,
            dominant_suffix(&history.breakdown)
        );

        let rows: Vec<HistoryRow> = history
            .days
            .iter()
            .map(|day| HistoryRow {
                date: format!("{} ({})", day.date, day.day_of_week),
                records: day.records,
                transportation: kg(day.breakdown.transportation),
                energy: kg(day.breakdown.energy),
                food: kg(day.breakdown.food),
                waste: kg(day.breakdown.waste),
                total: kg(day.breakdown.total),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::modern())
            .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
        println!("{}", table);
    }
}

fn dominant_suffix(breakdown: &CategoryBreakdown) -> String {
    match breakdown.dominant() {
        Some(c) => format!(", mostly {}", c.label().to_lowercase()),
        None => String::new(),
    }
}

fn kg(value: f64) -> String {
    if value > 0.0 {
        format!("{:.2}", value)
    } else {
        "-".to_string()
    }
}
