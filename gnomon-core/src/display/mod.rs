//! The display task
//!
//! Owns the frame buffer, the idle configuration and three timers, and
//! turns queued messages into frames for the LCD stage.

pub mod error;
pub mod idle_page;
pub mod task;
pub mod timers;

pub use error::{HandoffError, StartupError};
pub use idle_page::{IdlePage, IdlePageContext, IdlePageMain, PageOutcome};
pub use task::{DisplayParts, DisplayStats, DisplayTask};
pub use timers::DisplayTimers;
