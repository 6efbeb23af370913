//! LCD output task
//!
//! Drains the LCD queue: writes each handed-off frame to the panel, docks
//! the frame for the display task and releases the message. Between frames
//! it keeps flipping VCOM, which the memory LCD needs to avoid image
//! burn-in.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Spi};
use embassy_time::{Duration, Ticker};

use gnomon_core::{Message, MessageHandle};
use gnomon_hal_rp2040::lcd::SharpMemoryLcd;
use gnomon_hal_rp2040::LcdPanel;

use crate::channels::{FRAME_DOCK, LCD_QUEUE, POOL};

/// VCOM flip period
pub const VCOM_PERIOD_MS: u64 = 1000;

/// The panel as wired on this board
pub type Panel = SharpMemoryLcd<'static, Spi<'static, SPI0, Async>>;

/// LCD task - transfers frames to the panel
#[embassy_executor::task]
pub async fn lcd_task(mut panel: Panel) {
    info!("LCD task started");

    let mut vcom = Ticker::every(Duration::from_millis(VCOM_PERIOD_MS));

    loop {
        match select(LCD_QUEUE.receive(), vcom.next()).await {
            Either::First(handle) => write_frame(&mut panel, handle).await,
            Either::Second(()) => {
                if let Err(e) = panel.toggle_vcom().await {
                    warn!("VCOM toggle failed: {:?}", e);
                }
            }
        }
    }
}

async fn write_frame(panel: &mut Panel, handle: MessageHandle) {
    match POOL.take(&handle) {
        Some(Message::UpdateDisplay(update)) => {
            let rows = update.row_count();
            trace!("Writing {} rows", rows);
            if let Err(e) = panel.write_rows(0, update.frame.rows(rows)).await {
                warn!("LCD write failed: {:?}", e);
            }
            FRAME_DOCK.give_back(update.frame);
        }
        Some(other) => {
            warn!("LCD task got message type {:#x}", other.msg_type());
        }
        None => {
            warn!("LCD task got empty slot {}", handle.index());
        }
    }
    POOL.release(handle);
}
