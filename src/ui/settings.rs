use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::{
    alarm::AlarmPlayer,
    app::App,
    settings::{Field, SettingsForm},
    theme::Palette,
    ui::{key_hints, render_panel},
};

/// Duration editor with inline validation messages.
pub struct SettingsView<'a, P: AlarmPlayer> {
    app: &'a App<P>,
}

impl<'a, P: AlarmPlayer> SettingsView<'a, P> {
    pub fn new(app: &'a App<P>) -> Self {
        Self { app }
    }
}

impl<P: AlarmPlayer> Widget for SettingsView<'_, P> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.app;
        let palette = app.theme.palette();
        let strings = app.locale.strings();
        let Some(form) = app.form.as_ref() else {
            return;
        };

        let title_style = palette.base().add_modifier(Modifier::BOLD);
        let inner = render_panel(strings.settings, title_style, &palette, area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(4)
            .vertical_margin(1)
            .constraints([
                Constraint::Length(1), // work label
                Constraint::Length(1), // work input
                Constraint::Length(1), // work error
                Constraint::Length(1), // padding
                Constraint::Length(1), // break label
                Constraint::Length(1), // break input
                Constraint::Length(1), // break error
                Constraint::Length(1), // padding
                Constraint::Length(1), // deferred note
                Constraint::Min(0),
                Constraint::Length(1), // key hints
            ])
            .split(inner);

        let fields = [
            (Field::Work, strings.work_minutes, 0),
            (Field::Break, strings.break_minutes, 4),
        ];
        for (field, label, row) in fields {
            let focused = form.focused == field;
            let label_style = if focused {
                palette.base().add_modifier(Modifier::BOLD)
            } else {
                palette.dim()
            };
            Paragraph::new(Span::styled(label, label_style)).render(chunks[row], buf);

            Paragraph::new(input_line(form, field, focused, &palette)).render(chunks[row + 1], buf);

            if let Some(err) = form.error(field) {
                Paragraph::new(Span::styled(
                    strings.config_error(err),
                    palette.base().fg(palette.error),
                ))
                .render(chunks[row + 2], buf);
            }
        }

        if app.engine.is_running() {
            Paragraph::new(Span::styled(strings.applies_next_phase, palette.dim()))
                .render(chunks[8], buf);
        }

        Paragraph::new(key_hints([
            ("enter", strings.apply),
            ("esc", strings.cancel),
            ("tab", "⇅"),
        ]))
        .style(palette.dim())
        .alignment(Alignment::Center)
        .render(chunks[10], buf);
    }
}

fn input_line<'a>(
    form: &'a SettingsForm,
    field: Field,
    focused: bool,
    palette: &Palette,
) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let mut spans = vec![
        Span::styled(marker, palette.base().fg(palette.work)),
        Span::styled(
            form.input(field),
            palette.base().add_modifier(Modifier::BOLD),
        ),
    ];
    if focused {
        spans.push(Span::styled(
            "_",
            palette.base().add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}
