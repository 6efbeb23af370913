//! Embassy async tasks
//!
//! Each task runs independently and communicates via the message pool,
//! the task queues and signals in [`crate::channels`].

pub mod display;
pub mod lcd;
pub mod settings;
pub mod tick;

pub use display::{display_task, FwDisplayTask};
pub use lcd::{lcd_task, Panel};
pub use settings::settings_task;
pub use tick::tick_task;
