use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Colors used by the renderer for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub work: Color,
    pub rest: Color,
    pub error: Color,
    pub alarm: Color,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Reset,
                foreground: Color::White,
                muted: Color::DarkGray,
                border: Color::Gray,
                work: Color::Rgb(239, 83, 80),
                rest: Color::Rgb(102, 187, 106),
                error: Color::Red,
                alarm: Color::Yellow,
            },
            Theme::Light => Palette {
                background: Color::Rgb(250, 247, 242),
                foreground: Color::Rgb(40, 40, 40),
                muted: Color::Rgb(120, 120, 120),
                border: Color::Rgb(160, 160, 160),
                work: Color::Rgb(198, 40, 40),
                rest: Color::Rgb(46, 125, 50),
                error: Color::Rgb(183, 28, 28),
                alarm: Color::Rgb(230, 81, 0),
            },
        }
    }
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn phase(&self, phase: Phase) -> Color {
        match phase {
            Phase::Work => self.work,
            Phase::Break => self.rest,
        }
    }

    pub fn phase_bold(&self, phase: Phase) -> Style {
        self.base()
            .fg(self.phase(phase))
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim(&self) -> Style {
        self.base().fg(self.muted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Theme::Light.palette(), Theme::Dark.palette());
    }

    #[test]
    fn test_phase_colors_are_distinct() {
        for theme in [Theme::Light, Theme::Dark] {
            let p = theme.palette();
            assert_ne!(p.phase(Phase::Work), p.phase(Phase::Break));
        }
    }
}
