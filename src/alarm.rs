//! Alarm playback behind a small capability trait.
//!
//! The timer engine only asks for an alarm to start or stop; everything about
//! how a sound is produced lives in an [`AlarmPlayer`]. Playback failures are
//! never fatal: they are logged and the countdown carries on.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Alarms silence themselves after this long.
pub const AUTO_STOP: Duration = Duration::from_secs(30);

/// How often the terminal bell repeats while an alarm is sounding.
pub const BELL_REPEAT: Duration = Duration::from_secs(2);

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp3", "wav", "ogg", "flac", "m4a"];

#[derive(Debug, Error)]
pub enum AlarmError {
    #[error("sound file not found: {0}")]
    Missing(PathBuf),

    #[error("unsupported sound file: {0}")]
    Unsupported(PathBuf),

    #[error("alarm command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The sound an alarm should play.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SoundResource {
    #[default]
    Builtin,
    File(PathBuf),
}

impl SoundResource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(SoundResource::File).unwrap_or_default()
    }

    /// Make sure a user supplied file exists and looks like audio.
    pub fn check(&self) -> Result<(), AlarmError> {
        match self {
            SoundResource::Builtin => Ok(()),
            SoundResource::File(path) => check_sound_file(path),
        }
    }
}

fn check_sound_file(path: &Path) -> Result<(), AlarmError> {
    if !path.is_file() {
        return Err(AlarmError::Missing(path.to_path_buf()));
    }
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);
    if supported {
        Ok(())
    } else {
        Err(AlarmError::Unsupported(path.to_path_buf()))
    }
}

/// Something that can make noise.
pub trait AlarmPlayer {
    fn play(&mut self, sound: &SoundResource, volume: f32) -> Result<(), AlarmError>;

    fn stop(&mut self);

    /// Called on every poll while the alarm is active; looping players restart
    /// their sound here.
    fn keep_alive(&mut self, _now: Instant) {}
}

impl<P: AlarmPlayer + ?Sized> AlarmPlayer for Box<P> {
    fn play(&mut self, sound: &SoundResource, volume: f32) -> Result<(), AlarmError> {
        (**self).play(sound, volume)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn keep_alive(&mut self, now: Instant) {
        (**self).keep_alive(now)
    }
}

/// Tracks whether an alarm is sounding and enforces the auto-stop deadline.
#[derive(Debug)]
pub struct Alarm<P: AlarmPlayer> {
    player: P,
    sound: SoundResource,
    volume: f32,
    active_since: Option<Instant>,
}

impl<P: AlarmPlayer> Alarm<P> {
    pub fn new(player: P, sound: SoundResource, volume: f32) -> Self {
        Self {
            player,
            sound,
            volume: volume.clamp(0.0, 1.0),
            active_since: None,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.silence();
        match self.player.play(&self.sound, self.volume) {
            Ok(()) => {
                tracing::info!(sound = ?self.sound, volume = self.volume, "alarm started");
                self.active_since = Some(now);
            }
            Err(e) => {
                tracing::warn!(error = %e, "alarm playback failed");
            }
        }
    }

    pub fn silence(&mut self) {
        if self.active_since.take().is_some() {
            self.player.stop();
            tracing::debug!("alarm silenced");
        }
    }

    /// Auto-stop after [`AUTO_STOP`], otherwise let the player loop.
    pub fn poll(&mut self, now: Instant) {
        let Some(since) = self.active_since else {
            return;
        };
        if now.saturating_duration_since(since) >= AUTO_STOP {
            tracing::info!("alarm auto-stopped");
            self.silence();
        } else {
            self.player.keep_alive(now);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_since.is_some()
    }

    pub fn sound(&self) -> &SoundResource {
        &self.sound
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

/// Rings the terminal bell, repeating while the alarm is active.
#[derive(Debug)]
pub struct BellPlayer<W: Write> {
    out: W,
    last_ring: Option<Instant>,
}

impl BellPlayer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> BellPlayer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_ring: None,
        }
    }

    fn ring(&mut self, now: Instant) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        self.last_ring = Some(now);
        Ok(())
    }

    pub fn output(&self) -> &W {
        &self.out
    }
}

impl<W: Write> AlarmPlayer for BellPlayer<W> {
    // A terminal can't render a sound file; a configured file is still
    // validated so a broken path gets reported.
    fn play(&mut self, sound: &SoundResource, volume: f32) -> Result<(), AlarmError> {
        sound.check()?;
        if volume <= 0.0 {
            return Ok(());
        }
        self.ring(Instant::now())?;
        Ok(())
    }

    fn stop(&mut self) {
        self.last_ring = None;
    }

    fn keep_alive(&mut self, now: Instant) {
        let Some(last) = self.last_ring else {
            return;
        };
        if now.saturating_duration_since(last) >= BELL_REPEAT {
            if let Err(e) = self.ring(now) {
                tracing::debug!(error = %e, "bell write failed");
            }
        }
    }
}

/// Runs an external command (e.g. `paplay {file}`) to play the sound.
///
/// `{file}` is replaced with the sound path and `{volume}` with the volume as
/// a percentage. The command is restarted if it exits cleanly while the
/// alarm is still active. A failing command is not retried.
#[derive(Debug)]
pub struct CommandPlayer {
    template: Vec<String>,
    args: Option<Vec<String>>,
    child: Option<Child>,
}

impl CommandPlayer {
    pub fn new(command_line: &str) -> Result<Self, AlarmError> {
        let template = shlex::split(command_line).ok_or_else(|| {
            AlarmError::Command(format!("could not parse '{command_line}'"))
        })?;
        if template.is_empty() {
            return Err(AlarmError::Command("empty command".to_string()));
        }
        Ok(Self {
            template,
            args: None,
            child: None,
        })
    }

    /// Expand the template for one sound.
    pub fn render(&self, sound: &SoundResource, volume: f32) -> Result<Vec<String>, AlarmError> {
        let percent = ((volume.clamp(0.0, 1.0)) * 100.0).round() as u32;
        let file = match sound {
            SoundResource::File(path) => Some(path.display().to_string()),
            SoundResource::Builtin => None,
        };
        self.template
            .iter()
            .map(|part| {
                let mut out = part.replace("{volume}", &percent.to_string());
                if out.contains("{file}") {
                    let file = file.as_deref().ok_or_else(|| {
                        AlarmError::Command("command needs {file} but no sound file is set".into())
                    })?;
                    out = out.replace("{file}", file);
                }
                Ok(out)
            })
            .collect()
    }

    fn spawn(&mut self) -> Result<(), AlarmError> {
        let Some(args) = self.args.as_ref() else {
            return Ok(());
        };
        let child = Command::new(&args[0])
            .args(&args[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        self.child = Some(child);
        Ok(())
    }

    /// Whether the command will be restarted when it finishes.
    pub fn is_looping(&self) -> bool {
        self.args.is_some()
    }

    fn kill_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl AlarmPlayer for CommandPlayer {
    fn play(&mut self, sound: &SoundResource, volume: f32) -> Result<(), AlarmError> {
        sound.check()?;
        self.kill_child();
        self.args = Some(self.render(sound, volume)?);
        if let Err(e) = self.spawn() {
            self.args = None;
            return Err(e);
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.args = None;
        self.kill_child();
    }

    fn keep_alive(&mut self, _now: Instant) {
        let status = match self.child.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(Some(status)) => status,
                Ok(None) => return,
                Err(e) => {
                    tracing::warn!(error = %e, "lost track of alarm command");
                    self.child = None;
                    self.args = None;
                    return;
                }
            },
            None => return,
        };
        self.child = None;
        if !status.success() {
            tracing::warn!(%status, "alarm command failed, not restarting");
            self.args = None;
            return;
        }
        if self.args.is_some() {
            if let Err(e) = self.spawn() {
                tracing::warn!(error = %e, "could not restart alarm command");
                self.args = None;
            }
        }
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        self.kill_child();
    }
}

/// Makes no sound; counts requests so callers can observe them.
#[derive(Debug, Default, Clone)]
pub struct SilentPlayer {
    plays: usize,
    stops: usize,
}

impl SilentPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> usize {
        self.plays
    }

    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl AlarmPlayer for SilentPlayer {
    fn play(&mut self, _sound: &SoundResource, _volume: f32) -> Result<(), AlarmError> {
        self.plays += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}
