use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::alarm::AlarmPlayer;
use crate::i18n::Locale;
use crate::scheduler::TickScheduler;
use crate::settings::SettingsForm;
use crate::theme::Theme;
use crate::timer::{ConfigChange, TickOutcome, TimerEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Timer,
    Settings,
}

/// One-shot message shown under the timer until the next key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ConfigDeferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Application state: the timer engine plus everything the UI layers on top.
///
/// The engine is only ever driven through its control operations; after each
/// one the tick schedule is brought back in line with the running flag.
pub struct App<P: AlarmPlayer = Box<dyn AlarmPlayer>> {
    pub engine: TimerEngine<P>,
    pub scheduler: TickScheduler,
    pub locale: Locale,
    pub theme: Theme,
    pub screen: Screen,
    pub form: Option<SettingsForm>,
    pub notice: Option<Notice>,
}

impl<P: AlarmPlayer> App<P> {
    pub fn new(engine: TimerEngine<P>, locale: Locale, theme: Theme) -> Self {
        Self {
            engine,
            scheduler: TickScheduler::every_second(),
            locale,
            theme,
            screen: Screen::Timer,
            form: None,
            notice: None,
        }
    }

    fn sync_schedule(&mut self, now: Instant) {
        self.scheduler.sync(self.engine.is_running(), now);
    }

    pub fn toggle_timer(&mut self, now: Instant) {
        self.engine.toggle();
        self.sync_schedule(now);
    }

    pub fn reset(&mut self, now: Instant) {
        self.engine.reset();
        self.sync_schedule(now);
    }

    pub fn skip_break(&mut self, now: Instant) {
        self.engine.skip_break();
        self.sync_schedule(now);
    }

    /// Run every tick that fell due by `now` and service the alarm.
    pub fn advance(&mut self, now: Instant) {
        let due = self.scheduler.due_ticks(now);
        for _ in 0..due {
            if let TickOutcome::PhaseCompleted { .. } = self.engine.tick(now) {
                // the engine paused itself; drop any ticks still owed
                break;
            }
        }
        self.sync_schedule(now);
        self.engine.poll_alarm(now);
    }

    /// How long the loop may sleep before the next tick is due.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }

    pub fn open_settings(&mut self) {
        self.form = Some(SettingsForm::from_config(self.engine.config()));
        self.screen = Screen::Settings;
    }

    pub fn close_settings(&mut self) {
        self.form = None;
        self.screen = Screen::Timer;
    }

    pub fn submit_settings(&mut self, now: Instant) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let Some(config) = form.submit() else {
            return;
        };
        if self.engine.set_configuration(config) == ConfigChange::Deferred {
            self.notice = Some(Notice::ConfigDeferred);
        }
        self.sync_schedule(now);
        self.close_settings();
    }

    pub fn toggle_locale(&mut self) {
        self.locale = self.locale.toggled();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }
        self.notice = None;

        match self.screen {
            Screen::Timer => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
                KeyCode::Char(' ') | KeyCode::Enter => self.toggle_timer(now),
                KeyCode::Char('r') => self.reset(now),
                KeyCode::Char('s') => self.skip_break(now),
                KeyCode::Char('e') => self.open_settings(),
                KeyCode::Char('l') => self.toggle_locale(),
                KeyCode::Char('t') => self.toggle_theme(),
                _ => {}
            },
            Screen::Settings => match key.code {
                KeyCode::Esc => self.close_settings(),
                KeyCode::Enter => self.submit_settings(now),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    if let Some(form) = self.form.as_mut() {
                        form.focus_next();
                    }
                }
                KeyCode::Backspace => {
                    if let Some(form) = self.form.as_mut() {
                        form.backspace();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(form) = self.form.as_mut() {
                        form.push_char(c);
                    }
                }
                _ => {}
            },
        }
        Control::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::{Alarm, SilentPlayer, SoundResource};
    use crate::config::TimerConfiguration;
    use crate::settings::Field;
    use crate::timer::Phase;

    fn app(work_secs: u32, break_secs: u32) -> App<SilentPlayer> {
        let cfg = TimerConfiguration::from_seconds(work_secs, break_secs).unwrap();
        let engine = TimerEngine::new(
            cfg,
            Alarm::new(SilentPlayer::new(), SoundResource::Builtin, 0.5),
        );
        App::new(engine, Locale::En, Theme::Dark)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_space_starts_and_arms_schedule() {
        let mut app = app(60, 60);
        let t0 = Instant::now();
        app.on_key(key(KeyCode::Char(' ')), t0);

        assert!(app.engine.is_running());
        assert!(app.scheduler.is_armed());

        app.on_key(key(KeyCode::Char(' ')), t0 + secs(1));
        assert!(!app.engine.is_running());
        assert!(!app.scheduler.is_armed());
    }

    #[test]
    fn test_advance_ticks_per_elapsed_second() {
        let mut app = app(60, 60);
        let t0 = Instant::now();
        app.toggle_timer(t0);

        app.advance(t0 + Duration::from_millis(500));
        assert_eq!(app.engine.remaining_seconds(), 60);
        app.advance(t0 + secs(1));
        assert_eq!(app.engine.remaining_seconds(), 59);
        app.advance(t0 + secs(4));
        assert_eq!(app.engine.remaining_seconds(), 56);
    }

    #[test]
    fn test_phase_completion_cancels_schedule_and_drops_extra_ticks() {
        let mut app = app(3, 5);
        let t0 = Instant::now();
        app.toggle_timer(t0);

        // a very late wake-up: more ticks owed than the phase had left
        app.advance(t0 + secs(10));
        assert_eq!(app.engine.phase(), Phase::Break);
        assert_eq!(app.engine.remaining_seconds(), 5);
        assert!(!app.engine.is_running());
        assert!(!app.scheduler.is_armed());
        assert!(app.engine.is_alarm_active());

        app.advance(t0 + secs(20));
        assert_eq!(app.engine.remaining_seconds(), 5);
    }

    #[test]
    fn test_skip_key_rearms_schedule() {
        let mut app = app(2, 5);
        let t0 = Instant::now();
        app.toggle_timer(t0);
        app.advance(t0 + secs(2));
        assert_eq!(app.engine.phase(), Phase::Break);

        app.on_key(key(KeyCode::Char('s')), t0 + secs(3));
        assert_eq!(app.engine.phase(), Phase::Work);
        assert!(app.engine.is_running());
        assert!(app.scheduler.is_armed());
    }

    #[test]
    fn test_reset_key_cancels_schedule() {
        let mut app = app(60, 60);
        let t0 = Instant::now();
        app.toggle_timer(t0);
        app.advance(t0 + secs(5));
        app.on_key(key(KeyCode::Char('r')), t0 + secs(5));

        assert_eq!(app.engine.remaining_seconds(), 60);
        assert!(!app.scheduler.is_armed());
        app.advance(t0 + secs(30));
        assert_eq!(app.engine.remaining_seconds(), 60);
    }

    #[test]
    fn test_alarm_auto_stops_via_advance() {
        let mut app = app(1, 5);
        // the loop's clock, not the wall clock, decides when the alarm ends
        let t0 = Instant::now() + secs(3600);
        app.toggle_timer(t0);
        app.advance(t0 + secs(1));
        assert!(app.engine.is_alarm_active());

        app.advance(t0 + secs(20));
        assert!(app.engine.is_alarm_active());

        app.advance(t0 + secs(1) + crate::alarm::AUTO_STOP);
        assert!(!app.engine.is_alarm_active());
    }

    #[test]
    fn test_settings_flow_applies_when_idle() {
        let mut app = app(60, 60);
        let now = Instant::now();
        app.on_key(key(KeyCode::Char('e')), now);
        assert_eq!(app.screen, Screen::Settings);

        // replace "1" with "10" in the work field
        app.on_key(key(KeyCode::Backspace), now);
        app.on_key(key(KeyCode::Char('1')), now);
        app.on_key(key(KeyCode::Char('0')), now);
        app.on_key(key(KeyCode::Tab), now);
        app.on_key(key(KeyCode::Backspace), now);
        app.on_key(key(KeyCode::Char('2')), now);
        app.on_key(key(KeyCode::Enter), now);

        assert_eq!(app.screen, Screen::Timer);
        assert_eq!(app.engine.config().work_secs(), 600);
        assert_eq!(app.engine.config().break_secs(), 120);
        assert_eq!(app.engine.remaining_seconds(), 600);
        assert_eq!(app.notice, None);
    }

    #[test]
    fn test_invalid_settings_keep_form_open_and_engine_untouched() {
        let mut app = app(60, 60);
        let now = Instant::now();
        app.open_settings();
        app.on_key(key(KeyCode::Backspace), now);
        app.on_key(key(KeyCode::Char('0')), now);
        app.on_key(key(KeyCode::Enter), now);

        assert_eq!(app.screen, Screen::Settings);
        let form = app.form.as_ref().unwrap();
        assert!(form.error(Field::Work).is_some());
        assert_eq!(app.engine.config().work_secs(), 60);
        assert_eq!(app.engine.remaining_seconds(), 60);

        app.on_key(key(KeyCode::Esc), now);
        assert_eq!(app.screen, Screen::Timer);
        assert!(app.form.is_none());
    }

    #[test]
    fn test_settings_while_running_are_deferred() {
        let mut app = app(60, 60);
        let t0 = Instant::now();
        app.toggle_timer(t0);
        app.advance(t0 + secs(10));

        app.open_settings();
        app.on_key(key(KeyCode::Char('0')), t0 + secs(10));
        app.on_key(key(KeyCode::Enter), t0 + secs(10));

        assert_eq!(app.notice, Some(Notice::ConfigDeferred));
        assert_eq!(app.engine.remaining_seconds(), 50);
        assert!(app.engine.is_running());
        assert!(app.scheduler.is_armed());
        assert_eq!(app.engine.config().work_secs(), 600);
    }

    #[test]
    fn test_locale_and_theme_do_not_touch_engine() {
        let mut app = app(60, 60);
        let now = Instant::now();
        let before = app.engine.state();
        app.on_key(key(KeyCode::Char('l')), now);
        app.on_key(key(KeyCode::Char('t')), now);

        assert_eq!(app.locale, Locale::Pt);
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(app.engine.state(), before);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app(60, 60);
        let now = Instant::now();
        assert_eq!(app.on_key(key(KeyCode::Char('q')), now), Control::Quit);
        assert_eq!(
            app.on_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                now,
            ),
            Control::Quit
        );

        // 'q' is just a character inside the settings form
        app.open_settings();
        assert_eq!(app.on_key(key(KeyCode::Char('q')), now), Control::Continue);
    }
}
