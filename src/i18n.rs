use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::timer::Phase;

/// Display language. Only affects rendered labels, never timer behaviour.
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
pub enum Locale {
    #[default]
    En,
    Pt,
}

impl Locale {
    pub fn toggled(self) -> Self {
        match self {
            Locale::En => Locale::Pt,
            Locale::Pt => Locale::En,
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::Pt => &PT,
        }
    }
}

#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub work: &'static str,
    pub break_: &'static str,
    pub start: &'static str,
    pub pause: &'static str,
    pub reset: &'static str,
    pub skip_break: &'static str,
    pub sessions: &'static str,
    pub language: &'static str,
    pub language_name: &'static str,
    pub theme: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
    pub settings: &'static str,
    pub work_minutes: &'static str,
    pub break_minutes: &'static str,
    pub apply: &'static str,
    pub cancel: &'static str,
    pub quit: &'static str,
    pub running: &'static str,
    pub paused: &'static str,
    pub alarm: &'static str,
    pub history: &'static str,
    pub no_sessions: &'static str,
    pub applies_next_phase: &'static str,
    pub not_a_number: &'static str,
    pub out_of_range: &'static str,
}

static EN: Strings = Strings {
    title: "Pomodoro Focus",
    work: "Work",
    break_: "Break",
    start: "Start",
    pause: "Pause",
    reset: "Reset",
    skip_break: "Skip break",
    sessions: "Sessions Completed",
    language: "Language",
    language_name: "English",
    theme: "Theme",
    light: "Light",
    dark: "Dark",
    settings: "Settings",
    work_minutes: "Work (minutes)",
    break_minutes: "Break (minutes)",
    apply: "Apply",
    cancel: "Cancel",
    quit: "Quit",
    running: "Running",
    paused: "Paused",
    alarm: "Time's up!",
    history: "Completed at",
    no_sessions: "No sessions yet",
    applies_next_phase: "New durations apply from the next phase",
    not_a_number: "Enter a whole number of minutes",
    out_of_range: "Must be between 1 and 3600 minutes",
};

static PT: Strings = Strings {
    title: "Pomodoro Focus",
    work: "Trabalho",
    break_: "Pausa",
    start: "Começar",
    pause: "Pausar",
    reset: "Reiniciar",
    skip_break: "Pular pausa",
    sessions: "Sessões Concluídas",
    language: "Idioma",
    language_name: "Português",
    theme: "Tema",
    light: "Claro",
    dark: "Escuro",
    settings: "Configurações",
    work_minutes: "Trabalho (minutos)",
    break_minutes: "Pausa (minutos)",
    apply: "Aplicar",
    cancel: "Cancelar",
    quit: "Sair",
    running: "Em andamento",
    paused: "Pausado",
    alarm: "Acabou o tempo!",
    history: "Concluída às",
    no_sessions: "Nenhuma sessão ainda",
    applies_next_phase: "As novas durações valem a partir da próxima fase",
    not_a_number: "Digite um número inteiro de minutos",
    out_of_range: "Deve estar entre 1 e 3600 minutos",
};

impl Strings {
    pub fn phase(&self, phase: Phase) -> &'static str {
        match phase {
            Phase::Work => self.work,
            Phase::Break => self.break_,
        }
    }

    /// Inline message for a rejected settings field.
    pub fn config_error(&self, err: &ConfigError) -> &'static str {
        match err {
            ConfigError::OutOfRange { .. } => self.out_of_range,
            _ => self.not_a_number,
        }
    }
}
