use std::{io, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ecotrack_core::{EmissionCategory, HistoryUseCase, Profile, WeeklyHistory, POINTS_PER_LEVEL};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph},
};

use crate::Engine;

struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    good: Color,
}

const THEME: Theme = Theme {
    primary: Color::Green,
    muted: Color::DarkGray,
    text: Color::White,
    good: Color::Green,
};

fn category_color(category: EmissionCategory) -> Color {
    match category {
        EmissionCategory::Transportation => Color::Blue,
        EmissionCategory::Energy => Color::Yellow,
        EmissionCategory::Food => Color::Red,
        EmissionCategory::Waste => Color::Magenta,
    }
}

pub struct DashboardApp {
    /// Oldest week first.
    pub histories: Vec<WeeklyHistory>,
    pub current_week_index: usize,
    pub profile: Profile,
}

impl DashboardApp {
    pub fn new(mut histories: Vec<WeeklyHistory>, profile: Profile) -> Self {
        histories.reverse();
        let current_week_index = histories.len().saturating_sub(1);
        Self {
            histories,
            current_week_index,
            profile,
        }
    }

    pub fn next_week(&mut self) {
        if self.current_week_index + 1 < self.histories.len() {
            self.current_week_index += 1;
        }
    }

    pub fn previous_week(&mut self) {
        if self.current_week_index > 0 {
            self.current_week_index -= 1;
        }
    }

    pub fn current_data(&self) -> Option<&WeeklyHistory> {
        self.histories.get(self.current_week_index)
    }
}

pub fn run(engine: &Engine) -> Result<()> {
    let histories = HistoryUseCase::new(engine).get_weekly_history();
    if histories.is_empty() {
        println!("No footprints logged yet.");
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = DashboardApp::new(histories, engine.profile());

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => app.previous_week(),
                        KeyCode::Right | KeyCode::Char('l') => app.next_week(),
                        _ => {}
                    }
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(frame: &mut Frame, app: &DashboardApp) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + sidebar
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let Some(history) = app.current_data() else {
        frame.render_widget(
            Paragraph::new("No data available").alignment(Alignment::Center),
            main_layout[1],
        );
        return;
    };

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(1), Constraint::Length(30)])
        .split(main_layout[0]);

    let app_title = Paragraph::new(Span::styled(
        "ECOTRACK",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let has_prev = app.current_week_index > 0;
    let has_next = app.current_week_index + 1 < app.histories.len();
    let nav_text = Line::from(vec![
        Span::styled(" < ", Style::default().fg(if has_prev { THEME.text } else { THEME.muted })),
        Span::styled(
            format!(" Week {} - {} ", history.week, history.year),
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" > ", Style::default().fg(if has_next { THEME.text } else { THEME.muted })),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        main_layout[0],
    );

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),
            Constraint::Length(1),
            Constraint::Percentage(30),
        ])
        .split(main_layout[1]);

    draw_chart(frame, history, content_chunks[0]);
    draw_info_panel(frame, history, &app.profile, content_chunks[2]);

    let help = Line::from(vec![
        Span::styled("NAV: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), main_layout[2]);
}

/// Values are tenths of a kg so small categories still get a visible bar.
fn draw_chart(frame: &mut Frame, history: &WeeklyHistory, area: Rect) {
    let mut bar_data: Vec<(String, u64, Color)> = Vec::new();

    // Days are stored newest first; chart left to right.
    for day in history.days.iter().rev() {
        for (i, category) in EmissionCategory::ALL.iter().enumerate() {
            let label = if i == 1 { day.day_of_week.clone() } else { String::new() };
            let value = (day.breakdown.get(*category) * 10.0).round() as u64;
            bar_data.push((label, value, category_color(*category)));
        }
        bar_data.push((String::new(), 0, Color::Reset));
    }

    let max = bar_data.iter().map(|(_, v, _)| *v).max().unwrap_or(0).max(10);

    let bar_items: Vec<Bar> = bar_data
        .iter()
        .map(|(label, value, color)| {
            Bar::default()
                .label(label.as_str())
                .value(*value)
                .style(Style::default().fg(*color))
                .text_value(if *value > 0 { format!("{:.1}", *value as f64 / 10.0) } else { String::new() })
        })
        .collect();

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(" Daily Emissions (kg CO2e) ");

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(4)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bar_items))
        .max(max);

    frame.render_widget(chart, area);
}

fn draw_info_panel(frame: &mut Frame, history: &WeeklyHistory, profile: &Profile, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let mut info_text = vec![
        Line::from(Span::styled("This week", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];
    for category in EmissionCategory::ALL {
        info_text.push(Line::from(vec![
            Span::styled(format!("{:<15}", category.label()), Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{:.1} kg", history.breakdown.get(category)),
                Style::default().fg(category_color(category)).add_modifier(Modifier::BOLD),
            ),
        ]));
    }
    info_text.push(Line::from(""));
    info_text.push(Line::from(vec![
        Span::styled(format!("{:<15}", "Total"), Style::default().fg(THEME.muted)),
        Span::styled(format!("{:.1} kg", history.breakdown.total), Style::default().fg(THEME.text)),
    ]));

    let summary = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Summary "),
    );
    frame.render_widget(summary, chunks[0]);

    // Progress through the current level.
    let (ratio, label) = match profile.points_to_next_level() {
        Some(remaining) => {
            let earned = POINTS_PER_LEVEL.saturating_sub(remaining);
            (
                f64::from(earned) / f64::from(POINTS_PER_LEVEL),
                format!("Lv.{} {}/{}", profile.level, earned, POINTS_PER_LEVEL),
            )
        }
        None => (1.0, format!("Lv.{} max", profile.level)),
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" {} ", profile.level_title()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(THEME.good))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, chunks[1]);

    let badges: Vec<Line> = if profile.badges.is_empty() {
        vec![Line::from(Span::styled("None yet", Style::default().fg(THEME.muted)))]
    } else {
        profile
            .badges
            .iter()
            .map(|b| Line::from(Span::styled(b.name.clone(), Style::default().fg(THEME.text))))
            .collect()
    };
    let badge_block = Paragraph::new(badges).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(format!(" Badges ({} pts) ", profile.total_points)),
    );
    frame.render_widget(badge_block, chunks[2]);
}
