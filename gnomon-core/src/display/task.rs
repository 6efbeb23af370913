//! Display state machine
//!
//! The display task is the only writer of the frame buffer. It draws in
//! response to messages on its queue and hands the frame to the LCD stage
//! with an `UpdateDisplay` message; the LCD stage docks the frame again
//! once it has been transferred.
//!
//! ```text
//!   tick task ──IdleUpdate/SplashTimeout──┐
//!   radio     ──ConnectionStateChange─────┤
//!   UI        ──settings/timer requests───┤
//!                                         ▼
//!                                  ┌─────────────┐  UpdateDisplay(frame)  ┌─────────┐
//!                                  │ DisplayTask │ ─────────────────────▶ │   LCD   │
//!                                  └─────────────┘ ◀───── FrameDock ───── └─────────┘
//! ```
//!
//! Other tasks change the idle settings or stop the display timers by
//! posting a request message, and read the settings from the
//! [`SharedIdleSettings`] the display task publishes to.

use gnomon_protocol::{LcdRow, LCD_ROWS};

use crate::config::{
    DisplayTaskConfig, IdleConfig, IdleLayout, SettingsError, SettingsSink, SharedIdleSettings,
};
use crate::frame::{FrameBuffer, FrameDock, FrameLease};
use crate::message::{DisplayUpdate, Message};
use crate::pool::MessageHandle;
use crate::router::{Mailbox, MessageQueue, QueueIndex, Undelivered};
use crate::timer::{TimerError, TimerService};

use super::error::{HandoffError, StartupError};
use super::idle_page::{IdlePage, IdlePageContext, PageOutcome};
use super::timers::DisplayTimers;

/// Counters kept by the display task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayStats {
    /// Messages taken off the queue
    pub handled: u32,
    /// Messages with no handler
    pub unrecognized: u32,
    /// Frames handed to the LCD stage
    pub handoffs: u32,
    /// Hand-offs that failed; the frame stayed with the display task
    pub dropped_handoffs: u32,
    /// Connection changes ignored because the splash screen was still up
    pub gated_connection_changes: u32,
}

/// Everything the display task is built from
pub struct DisplayParts<'a, T, P, S, const N: usize, const Q: usize> {
    /// Pool and queue table shared with the other tasks
    pub mailbox: Mailbox<'a, N, Q>,
    /// Return path of the frame from the LCD stage
    pub dock: &'a FrameDock,
    /// The one frame buffer
    pub frame: &'static mut FrameBuffer,
    /// Splash bitmap, drawn from row 0
    pub splash: &'a [LcdRow],
    /// Timer service
    pub timers: T,
    /// Idle page renderer
    pub idle_page: P,
    /// Where saved idle settings go
    pub settings: S,
    /// Copy of the idle settings other tasks read
    pub published: &'a SharedIdleSettings,
    /// Startup settings
    pub config: DisplayTaskConfig,
}

/// The display task
pub struct DisplayTask<'a, T, P, S, const N: usize, const Q: usize> {
    mailbox: Mailbox<'a, N, Q>,
    queue: &'a MessageQueue<Q>,
    dock: &'a FrameDock,
    /// `None` while the LCD stage holds the frame
    frame: Option<FrameLease>,
    timers: T,
    timer_ids: DisplayTimers,
    idle_page: P,
    settings: S,
    published: &'a SharedIdleSettings,
    idle_config: IdleConfig,
    connection_updates_allowed: bool,
    link_up: bool,
    stats: DisplayStats,
}

impl<'a, T, P, S, const N: usize, const Q: usize> DisplayTask<'a, T, P, S, N, Q>
where
    T: TimerService,
    P: IdlePage,
    S: SettingsSink,
{
    /// Bring the display up
    ///
    /// Sends the splash screen, initialises the idle configuration,
    /// allocates the display timers and arms the splash timeout. Any
    /// failure aborts startup.
    pub fn start(parts: DisplayParts<'a, T, P, S, N, Q>) -> Result<Self, StartupError> {
        let DisplayParts {
            mailbox,
            dock,
            frame,
            splash,
            mut timers,
            mut idle_page,
            settings,
            published,
            config,
        } = parts;

        let queue = mailbox
            .router()
            .queue(QueueIndex::Display)
            .ok_or_else(|| {
                #[cfg(feature = "defmt")]
                defmt::error!("Display queue not registered");
                StartupError::QueueMissing
            })?;

        let mut lease = FrameLease::new(frame);
        let splash_rows = lease.frame_mut().copy_rows_from(splash, 0);
        hand_off(mailbox, lease, splash_rows as u8).map_err(|(e, _)| {
            #[cfg(feature = "defmt")]
            defmt::error!("Splash hand-off failed: {:?}", e);
            StartupError::Splash(e)
        })?;

        let mut idle_config = IdleConfig::new(config.idle);
        idle_config.initialize_layout();
        idle_config.initialize_invert();
        idle_config.initialize_display_seconds();
        idle_config.initialize_time_format();
        idle_config.initialize_date_format();
        published.publish(idle_config.settings());

        let timer_ids = DisplayTimers::allocate(&mut timers).map_err(startup_timer_error)?;
        idle_page.init(timer_ids.idle);
        timer_ids
            .start_splash_timeout(&mut timers, config.splash_timeout_s)
            .map_err(startup_timer_error)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Display up: splash {} rows, timeout {}s",
            splash_rows,
            config.splash_timeout_s
        );

        Ok(Self {
            mailbox,
            queue,
            dock,
            frame: None,
            timers,
            timer_ids,
            idle_page,
            settings,
            published,
            idle_config,
            connection_updates_allowed: false,
            link_up: false,
            stats: DisplayStats::default(),
        })
    }

    /// Serve the display queue; never returns
    pub async fn run(mut self) {
        loop {
            self.process_next().await;
        }
    }

    /// Wait for the next message and handle it
    pub async fn process_next(&mut self) {
        let handle = self.queue.receive().await;
        self.process(handle).await;
    }

    /// Handle one queued message, then release its slot
    pub async fn process(&mut self, handle: MessageHandle) {
        let pool = self.mailbox.pool();
        match pool.take(&handle) {
            Some(message) => self.dispatch(message).await,
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Empty message slot {}", handle.index());
            }
        }
        pool.release(handle);
        self.stats.handled = self.stats.handled.wrapping_add(1);
    }

    async fn dispatch(&mut self, message: Message) {
        match message {
            Message::IdleUpdate => self.refresh_idle_page().await,
            Message::SplashTimeout => {
                #[cfg(feature = "defmt")]
                defmt::info!("Splash timeout, idle page takes over");
                self.connection_updates_allowed = true;
                self.refresh_idle_page().await;
            }
            Message::ConnectionStateChange { connected } => {
                self.link_up = connected;
                if self.connection_updates_allowed {
                    self.refresh_idle_page().await;
                } else {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Connection change during splash, not redrawn");
                    self.stats.gated_connection_changes =
                        self.stats.gated_connection_changes.wrapping_add(1);
                }
            }
            Message::ToggleIdleInvert => self.toggle_idle_buffer_invert(),
            Message::ToggleIdleLayout => self.toggle_idle_buffer_layout(),
            Message::SaveIdleSettings => {
                if let Err(_e) = self.save_idle_buffer_invert() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Idle settings not saved: {:?}", _e);
                }
            }
            Message::StopDisplayTimers => {
                if let Err(_e) = self.stop_all_display_timers() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Display timers not stopped: {:?}", _e);
                }
            }
            other => self.unhandled(other),
        }
    }

    fn unhandled(&mut self, message: Message) {
        #[cfg(feature = "defmt")]
        defmt::warn!("Unhandled message type {:#x}", message.msg_type());
        self.stats.unrecognized = self.stats.unrecognized.wrapping_add(1);

        // A hand-off routed here by mistake still carries the frame
        if let Some(lease) = message.into_frame() {
            self.frame = Some(lease);
        }
    }

    async fn refresh_idle_page(&mut self) {
        let mut lease = self.reclaim_frame().await;
        let outcome = self.idle_page.handle(IdlePageContext {
            frame: lease.frame_mut(),
            config: &self.idle_config,
            timers: &mut self.timers,
            idle_timer: self.timer_ids.idle,
            link_up: self.link_up,
        });
        self.frame = Some(lease);

        if let PageOutcome::Redraw { rows } = outcome {
            // Failure is counted and logged by the hand-off itself
            let _ = self.send_to_display(rows);
        }
    }

    /// Get the frame back from wherever it is
    async fn reclaim_frame(&mut self) -> FrameLease {
        match self.frame.take() {
            Some(lease) => lease,
            None => self.dock.wait().await,
        }
    }

    /// Pick up the frame if the LCD stage has docked it
    ///
    /// Returns whether the display task now holds the frame.
    pub fn try_reclaim_frame(&mut self) -> bool {
        if self.frame.is_none() {
            self.frame = self.dock.try_reclaim();
        }
        self.frame.is_some()
    }

    /// Hand the first `rows` rows of the frame to the LCD stage
    ///
    /// On failure the display task keeps the frame.
    pub fn send_to_display(&mut self, rows: u8) -> Result<(), HandoffError> {
        let lease = self.frame.take().ok_or(HandoffError::FrameInFlight)?;
        match hand_off(self.mailbox, lease, rows) {
            Ok(()) => {
                self.stats.handoffs = self.stats.handoffs.wrapping_add(1);
                Ok(())
            }
            Err((e, lease)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Hand-off of {} rows dropped: {:?}", rows, e);
                self.frame = Some(lease);
                self.stats.dropped_handoffs = self.stats.dropped_handoffs.wrapping_add(1);
                Err(e)
            }
        }
    }

    /// Current idle layout
    pub fn idle_buffer_configuration(&self) -> IdleLayout {
        self.idle_config.layout()
    }

    /// Swap the watch and phone regions
    pub fn toggle_idle_buffer_layout(&mut self) {
        self.idle_config.toggle_layout();
        self.published.publish(self.idle_config.settings());
    }

    /// Flip the idle colour inversion
    pub fn toggle_idle_buffer_invert(&mut self) {
        self.idle_config.toggle_invert();
        self.published.publish(self.idle_config.settings());
    }

    /// Current idle colour inversion
    pub fn query_invert_display(&self) -> bool {
        self.idle_config.is_inverted()
    }

    /// Persist the idle settings, inversion included
    pub fn save_idle_buffer_invert(&mut self) -> Result<(), SettingsError> {
        self.settings.save(&self.idle_config.settings())
    }

    /// Stop the idle, application and notification timers
    ///
    /// Stopping a timer that is not running has no effect, so this can be
    /// called any number of times.
    pub fn stop_all_display_timers(&mut self) -> Result<(), TimerError> {
        self.timer_ids.stop_all(&mut self.timers)
    }

    /// Whether connection changes redraw the idle page yet
    pub fn connection_updates_allowed(&self) -> bool {
        self.connection_updates_allowed
    }

    /// Timers allocated at startup
    pub fn timer_ids(&self) -> DisplayTimers {
        self.timer_ids
    }

    /// Live idle configuration
    pub fn idle_config(&self) -> &IdleConfig {
        &self.idle_config
    }

    /// The idle page renderer
    pub fn idle_page(&self) -> &P {
        &self.idle_page
    }

    /// Whether the display task holds the frame right now
    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }

    /// Counters since startup
    pub fn stats(&self) -> DisplayStats {
        self.stats
    }
}

fn startup_timer_error(e: TimerError) -> StartupError {
    #[cfg(feature = "defmt")]
    defmt::error!("Display timer setup failed: {:?}", e);
    StartupError::from(e)
}

/// Send the frame to the LCD stage, or give it back with the reason
fn hand_off<const N: usize, const Q: usize>(
    mailbox: Mailbox<'_, N, Q>,
    lease: FrameLease,
    rows: u8,
) -> Result<(), (HandoffError, FrameLease)> {
    if rows == 0 || rows as usize > LCD_ROWS {
        return Err((HandoffError::InvalidRowCount(rows), lease));
    }

    let update = Message::UpdateDisplay(DisplayUpdate { rows, frame: lease });
    match mailbox.send(update) {
        Ok(()) => Ok(()),
        Err(Undelivered { reason, message }) => match message.into_frame() {
            Some(lease) => Err((reason.into(), lease)),
            // The mailbox returns the message it was given
            None => unreachable!(),
        },
    }
}
