use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

use pomofocus::{
    alarm::{Alarm, AlarmPlayer, BellPlayer, CommandPlayer, SilentPlayer, SoundResource},
    app::{App, Control},
    config::{check_volume, Config, ConfigStore, FileConfigStore},
    i18n::Locale,
    logging,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    theme::Theme,
    timer::TimerEngine,
    ui,
};

/// focused pomodoro timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A pomodoro timer for the terminal: alternating work and break countdowns, a session history, an alarm when each phase ends, English and Portuguese labels, and light/dark themes."
)]
pub struct Cli {
    /// work phase length in minutes (1-3600)
    #[clap(short = 'w', long = "work", value_parser = clap::value_parser!(u32).range(1..=3600))]
    work_minutes: Option<u32>,

    /// break phase length in minutes (1-3600)
    #[clap(short = 'b', long = "break", value_parser = clap::value_parser!(u32).range(1..=3600))]
    break_minutes: Option<u32>,

    /// alarm volume between 0 and 1
    #[clap(long, value_parser = parse_volume)]
    volume: Option<f32>,

    /// custom alarm sound file (mp3, wav, ogg, flac or m4a)
    #[clap(long)]
    sound: Option<PathBuf>,

    /// command that plays the alarm, e.g. "paplay --volume={volume} {file}"
    #[clap(long)]
    alarm_command: Option<String>,

    /// never play an alarm sound
    #[clap(long)]
    mute: bool,

    /// display language
    #[clap(short = 'l', long, value_enum)]
    language: Option<Locale>,

    /// color theme
    #[clap(long, value_enum)]
    theme: Option<Theme>,

    /// settings file to read instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// log more (repeat for more detail); logs go to ~/.local/state/pomofocus
    #[clap(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_volume(s: &str) -> Result<f32, String> {
    let volume = s
        .parse::<f32>()
        .map_err(|_| format!("'{}' is not a number", s))?;
    check_volume(volume).map_err(|e| e.to_string())
}

impl Cli {
    /// Command line values win over the settings file.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(work) = self.work_minutes {
            config.work_minutes = work;
        }
        if let Some(brk) = self.break_minutes {
            config.break_minutes = brk;
        }
        if let Some(volume) = self.volume {
            config.volume = volume;
        }
        if self.sound.is_some() {
            config.sound = self.sound.clone();
        }
        if self.alarm_command.is_some() {
            config.alarm_command = self.alarm_command.clone();
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn build_player(config: &Config, mute: bool) -> Box<dyn AlarmPlayer> {
    if mute {
        return Box::new(SilentPlayer::new());
    }
    if let Some(cmd) = &config.alarm_command {
        match CommandPlayer::new(cmd) {
            Ok(player) => return Box::new(player),
            Err(e) => tracing::warn!(error = %e, "falling back to terminal bell"),
        }
    }
    Box::new(BellPlayer::stdout())
}

fn build_app(cli: &Cli) -> App {
    let config = cli.apply(cli.config_store().load());
    let timer_config = config.timer_configuration().unwrap_or_default();

    let sound = SoundResource::from_path(config.sound.clone());
    if let Err(e) = sound.check() {
        tracing::warn!(error = %e, "alarm sound unavailable");
    }
    let alarm = Alarm::new(build_player(&config, cli.mute), sound, config.volume);

    tracing::info!(
        work_secs = timer_config.work_secs(),
        break_secs = timer_config.break_secs(),
        language = %config.language,
        theme = %config.theme,
        "starting"
    );
    App::new(
        TimerEngine::new(timer_config, alarm),
        config.language,
        config.theme,
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = logging::init(cli.verbose);
    let mut app = build_app(&cli);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "exiting with error");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    run_loop(terminal, app, &runner)
}

fn run_loop<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let event = runner.step_within(app.next_deadline(Instant::now()));
        let now = Instant::now();
        match event {
            AppEvent::Key(key) => {
                if app.on_key(key, now) == Control::Quit {
                    break;
                }
            }
            AppEvent::InputClosed => {
                tracing::warn!("terminal input closed, quitting");
                break;
            }
            AppEvent::Resize | AppEvent::Wake => {}
        }
        app.advance(now);
    }

    tracing::info!(
        completed = app.engine.completed_work_sessions(),
        "quit"
    );
    Ok(())
}
