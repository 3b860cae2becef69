mod animation;
mod clicker;
mod session;

pub mod commands;
pub mod controller;
pub mod hotkeys;
pub mod logging;
pub mod repl;
pub mod sim;

pub use controller::{Controller, Status};
pub use hotkeys::HotkeyOptions;
pub use repl::readline;
pub use sim::{LoggingClicker, SimulatedKeys};
