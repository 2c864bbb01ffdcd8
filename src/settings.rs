use crate::config::{parse_minutes, ConfigError, TimerConfiguration};

// Longest value that can still be in range.
const MAX_INPUT_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Work,
    Break,
}

impl Field {
    pub fn other(self) -> Self {
        match self {
            Field::Work => Field::Break,
            Field::Break => Field::Work,
        }
    }
}

/// The duration editing form. Values stay as typed text until submitted, and
/// only a fully valid form produces a [`TimerConfiguration`].
#[derive(Debug)]
pub struct SettingsForm {
    pub work_input: String,
    pub break_input: String,
    pub focused: Field,
    pub work_error: Option<ConfigError>,
    pub break_error: Option<ConfigError>,
}

impl SettingsForm {
    pub fn from_config(config: &TimerConfiguration) -> Self {
        Self {
            work_input: config.work_minutes().to_string(),
            break_input: config.break_minutes().to_string(),
            focused: Field::Work,
            work_error: None,
            break_error: None,
        }
    }

    pub fn input(&self, field: Field) -> &str {
        match field {
            Field::Work => &self.work_input,
            Field::Break => &self.break_input,
        }
    }

    pub fn error(&self, field: Field) -> Option<&ConfigError> {
        match field {
            Field::Work => self.work_error.as_ref(),
            Field::Break => self.break_error.as_ref(),
        }
    }

    fn focused_input_mut(&mut self) -> &mut String {
        match self.focused {
            Field::Work => &mut self.work_input,
            Field::Break => &mut self.break_input,
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.other();
    }

    pub fn push_char(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let input = self.focused_input_mut();
        if input.len() < MAX_INPUT_LEN {
            input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.focused_input_mut().pop();
    }

    /// Validate both fields. On failure the per-field errors are set and the
    /// form stays open.
    pub fn submit(&mut self) -> Option<TimerConfiguration> {
        let work = parse_minutes(&self.work_input);
        let brk = parse_minutes(&self.break_input);
        match (work, brk) {
            (Ok(w), Ok(b)) => {
                self.work_error = None;
                self.break_error = None;
                TimerConfiguration::from_minutes(w, b).ok()
            }
            (w, b) => {
                self.work_error = w.err();
                self.break_error = b.err();
                tracing::debug!(
                    work = ?self.work_error,
                    brk = ?self.break_error,
                    "settings rejected"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn form() -> SettingsForm {
        SettingsForm::from_config(&TimerConfiguration::default())
    }

    #[test]
    fn test_form_prefills_from_config() {
        let f = form();
        assert_eq!(f.input(Field::Work), "25");
        assert_eq!(f.input(Field::Break), "5");
        assert_eq!(f.focused, Field::Work);
    }

    #[test]
    fn test_editing_focused_field() {
        let mut f = form();
        f.backspace();
        f.backspace();
        f.push_char('4');
        f.push_char('x');
        f.push_char('0');
        assert_eq!(f.input(Field::Work), "40");

        f.focus_next();
        f.push_char('0');
        assert_eq!(f.input(Field::Break), "50");
    }

    #[test]
    fn test_input_length_is_capped() {
        let mut f = form();
        for _ in 0..10 {
            f.push_char('9');
        }
        assert_eq!(f.input(Field::Work).len(), MAX_INPUT_LEN);
    }

    #[test]
    fn test_submit_valid() {
        let mut f = form();
        f.work_input = "50".into();
        f.break_input = "10".into();
        let cfg = f.submit().unwrap();
        assert_eq!(cfg.work_secs(), 3000);
        assert_eq!(cfg.break_secs(), 600);
        assert!(f.error(Field::Work).is_none());
    }

    #[test]
    fn test_submit_rejects_each_field_independently() {
        let mut f = form();
        f.work_input = "0".into();
        f.break_input = String::new();
        assert!(f.submit().is_none());
        assert_matches!(
            f.error(Field::Work),
            Some(ConfigError::OutOfRange { value: 0 })
        );
        assert_matches!(f.error(Field::Break), Some(ConfigError::NotANumber(_)));

        f.work_input = "3601".into();
        f.break_input = "5".into();
        assert!(f.submit().is_none());
        assert_matches!(f.error(Field::Work), Some(ConfigError::OutOfRange { .. }));
        assert!(f.error(Field::Break).is_none());
    }

    #[test]
    fn test_errors_clear_after_valid_submit() {
        let mut f = form();
        f.work_input = "9999".into();
        assert!(f.submit().is_none());
        f.work_input = "30".into();
        assert!(f.submit().is_some());
        assert!(f.error(Field::Work).is_none());
    }
}
