//! Gnomon - Wearable Display Firmware
//!
//! Main firmware binary for an RP2040-based watch with a 96x96 Sharp
//! memory LCD. The display task owns the frame buffer and decides what is
//! on screen; the LCD task moves finished frames to the panel; the tick
//! task drives the one-second timers; the settings task writes saved idle
//! settings to flash.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{self, Spi};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use gnomon_core::display::{DisplayParts, IdlePageMain};
use gnomon_core::router::QUEUE_DEPTH;
use gnomon_core::{DisplayTask, FrameBuffer, Mailbox, QueueIndex, Router};
use gnomon_hal_rp2040::flash::Rp2040SettingsStorage;
use gnomon_hal_rp2040::lcd::{SharpMemoryLcd, LCD_SPI_FREQUENCY};

use crate::channels::{DISPLAY_QUEUE, FRAME_DOCK, IDLE_SETTINGS, LCD_QUEUE, POOL, TIMERS};
use crate::config::{load_idle_settings, FlashSettings, DISPLAY_CONFIG};

mod channels;
mod config;
mod splash;
mod tasks;

// Static cells for data the tasks borrow forever
static ROUTER: StaticCell<Router<'static, QUEUE_DEPTH>> = StaticCell::new();
static FRAME: StaticCell<FrameBuffer> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Gnomon firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Saved idle settings override the compiled-in defaults
    let mut storage = Rp2040SettingsStorage::new(p.FLASH, p.DMA_CH1);
    let mut display_config = DISPLAY_CONFIG;
    if let Some(idle) = load_idle_settings(&mut storage).await {
        display_config.idle = idle;
    }

    // Sharp memory LCD on SPI0 (SCK=GPIO18, MOSI=GPIO19, CS=GPIO17, active high)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = LCD_SPI_FREQUENCY;
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config);
    let cs = Output::new(p.PIN_17, Level::Low);
    let panel = SharpMemoryLcd::new(spi, cs);
    info!("LCD SPI initialized");

    let router = ROUTER.init_with(|| {
        let mut router = Router::new();
        router.register(QueueIndex::Display, &DISPLAY_QUEUE);
        router.register(QueueIndex::Lcd, &LCD_QUEUE);
        router
    });
    let mailbox = Mailbox::new(&POOL, router);

    let parts = DisplayParts {
        mailbox,
        dock: &FRAME_DOCK,
        frame: FRAME.init(FrameBuffer::new()),
        splash: &splash::SPLASH,
        timers: &TIMERS,
        idle_page: IdlePageMain::new(display_config.idle_refresh_s),
        settings: FlashSettings,
        published: &IDLE_SETTINGS,
        config: display_config,
    };

    // A display that cannot start is not worth running
    let display = match DisplayTask::start(parts) {
        Ok(display) => display,
        Err(e) => defmt::panic!("Display startup failed: {:?}", e),
    };
    info!("Display started, splash queued");

    // Spawn tasks
    spawner.spawn(tasks::lcd_task(panel)).unwrap();
    spawner.spawn(tasks::display_task(display)).unwrap();
    spawner.spawn(tasks::tick_task(mailbox)).unwrap();
    spawner.spawn(tasks::settings_task(storage)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
