pub mod settings;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Widget},
    Frame,
};

use crate::{
    alarm::AlarmPlayer,
    app::{App, Notice, Screen},
    i18n::Strings,
    theme::{Palette, Theme},
    timer::Phase,
    util::{centered_rect, format_time},
};

pub const PANEL_WIDTH: u16 = 60;
pub const PANEL_HEIGHT: u16 = 20;
const HISTORY_ROWS: usize = 3;

pub fn draw<P: AlarmPlayer>(app: &App<P>, f: &mut Frame) {
    let area = f.area();
    match app.screen {
        Screen::Timer => f.render_widget(app, area),
        Screen::Settings => f.render_widget(settings::SettingsView::new(app), area),
    }
}

/// Rounded panel centered in `area`, filled with the theme background.
/// Returns the panel's inner area.
pub(crate) fn render_panel(
    title: &str,
    title_style: Style,
    palette: &Palette,
    area: Rect,
    buf: &mut Buffer,
) -> Rect {
    Block::default().style(palette.base()).render(area, buf);

    let panel = centered_rect(PANEL_WIDTH, PANEL_HEIGHT, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.base().fg(palette.border))
        .title(Span::styled(format!(" {} ", title), title_style))
        .title_alignment(Alignment::Center)
        .style(palette.base());
    let inner = block.inner(panel);
    block.render(panel, buf);
    inner
}

pub(crate) fn key_hints<'a>(hints: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    hints
        .into_iter()
        .map(|(key, label)| format!("[{}] {}", key, label))
        .join("  ")
}

fn theme_name(strings: &Strings, theme: Theme) -> &'static str {
    match theme {
        Theme::Light => strings.light,
        Theme::Dark => strings.dark,
    }
}

impl<P: AlarmPlayer> Widget for &App<P> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let engine = &self.engine;
        let palette = self.theme.palette();
        let strings = self.locale.strings();
        let phase = engine.phase();

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let phase_style = palette.phase_bold(phase);
        let dim = palette.dim();

        let inner = render_panel(strings.title, phase_style, &palette, area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(2)
            .vertical_margin(1)
            .constraints([
                Constraint::Length(1),                    // phase
                Constraint::Length(1),                    // countdown
                Constraint::Length(1),                    // running / paused
                Constraint::Length(1),                    // progress
                Constraint::Length(1),                    // padding
                Constraint::Length(1),                    // sessions
                Constraint::Length(1),                    // language / theme
                Constraint::Length(1),                    // alarm / notice
                Constraint::Length(1),                    // history title
                Constraint::Length(HISTORY_ROWS as u16), // history rows
                Constraint::Min(0),
                Constraint::Length(2), // key hints
            ])
            .split(inner);

        Paragraph::new(Span::styled(strings.phase(phase), phase_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format_time(engine.remaining_seconds()),
            phase_style.add_modifier(Modifier::UNDERLINED),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        let status = if engine.is_running() {
            strings.running
        } else {
            strings.paused
        };
        Paragraph::new(Span::styled(status, dim))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let ratio = engine.progress_ratio();
        Gauge::default()
            .gauge_style(Style::default().fg(palette.phase(phase)).bg(palette.muted))
            .ratio(ratio)
            .label(format!("{:.0}%", ratio * 100.0))
            .render(chunks[3], buf);

        Paragraph::new(Line::from(vec![
            Span::styled(format!("{}: ", strings.sessions), palette.base()),
            Span::styled(
                engine.completed_work_sessions().to_string(),
                palette.base().patch(bold),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        Paragraph::new(Span::styled(
            format!(
                "{}: {}  ·  {}: {}",
                strings.language,
                strings.language_name,
                strings.theme,
                theme_name(strings, self.theme)
            ),
            palette.base(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

        let banner = if engine.is_alarm_active() {
            Some(Span::styled(
                strings.alarm,
                palette.base().fg(palette.alarm).patch(bold),
            ))
        } else if self.notice == Some(Notice::ConfigDeferred) {
            Some(Span::styled(strings.applies_next_phase, dim))
        } else {
            None
        };
        if let Some(banner) = banner {
            Paragraph::new(banner)
                .alignment(Alignment::Center)
                .render(chunks[7], buf);
        }

        Paragraph::new(Span::styled(strings.history, dim))
            .alignment(Alignment::Center)
            .render(chunks[8], buf);

        let history = engine.history();
        let rows: Vec<Line> = if history.is_empty() {
            vec![Line::from(Span::styled(strings.no_sessions, dim))]
        } else {
            history
                .recent(HISTORY_ROWS)
                .enumerate()
                .map(|(i, record)| {
                    Line::from(Span::styled(
                        format!(
                            "#{}  {}",
                            history.len() - i,
                            record.completed_at.format("%H:%M:%S")
                        ),
                        palette.base(),
                    ))
                })
                .collect()
        };
        Paragraph::new(rows)
            .alignment(Alignment::Center)
            .render(chunks[9], buf);

        let toggle_label = if engine.is_running() {
            strings.pause
        } else {
            strings.start
        };
        let mut controls = vec![("space", toggle_label), ("r", strings.reset)];
        if phase == Phase::Break {
            controls.push(("s", strings.skip_break));
        }
        let hints = vec![
            Line::from(key_hints(controls)),
            Line::from(key_hints([
                ("e", strings.settings),
                ("l", strings.language),
                ("t", strings.theme),
                ("q", strings.quit),
            ])),
        ];
        Paragraph::new(hints)
            .style(dim)
            .alignment(Alignment::Center)
            .render(chunks[11], buf);
    }
}
