//! Display task
//!
//! Runs the display state machine built in `main`.

use defmt::*;

use gnomon_core::display::IdlePageMain;
use gnomon_core::pool::MESSAGE_POOL_SIZE;
use gnomon_core::router::QUEUE_DEPTH;
use gnomon_core::timer::{TimerBank, MAX_TIMERS};
use gnomon_core::DisplayTask;

use crate::config::FlashSettings;

/// The display state machine as wired on this board
pub type FwDisplayTask = DisplayTask<
    'static,
    &'static TimerBank<MAX_TIMERS>,
    IdlePageMain,
    FlashSettings,
    MESSAGE_POOL_SIZE,
    QUEUE_DEPTH,
>;

/// Display task - serves the display queue forever
#[embassy_executor::task]
pub async fn display_task(task: FwDisplayTask) {
    info!("Display task started");
    task.run().await;
}
