// Library surface for the binary, headless integration tests and reuse.
pub mod alarm;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod theme;
pub mod timer;
pub mod ui;
pub mod util;
