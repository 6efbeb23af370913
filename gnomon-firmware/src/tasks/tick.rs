//! One-second tick task
//!
//! Advances the timer bank once a second and posts each expiry as a
//! message to its destination queue. An expiry that cannot be posted is
//! retried on the following tick.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::{FwMailbox, TIMERS};

/// Tick interval in seconds
pub const TICK_INTERVAL_S: u16 = 1;

/// Tick task - drives the one-second timers
#[embassy_executor::task]
pub async fn tick_task(mailbox: FwMailbox) {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_secs(TICK_INTERVAL_S as u64));

    loop {
        ticker.next().await;

        let report = TIMERS.tick_and_post(TICK_INTERVAL_S, mailbox);
        if report.deferred > 0 {
            warn!("{} timer expiries held for the next tick", report.deferred);
        }
    }
}
