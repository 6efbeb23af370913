//! Idle page renderer seam
//!
//! The display task owns the frame and the idle configuration; the idle
//! page decides what goes into the frame and whether it needs sending. It
//! also owns the idle timer once the splash screen has timed out.

use core::ops::Range;

use gnomon_protocol::messages::MSG_IDLE_UPDATE;
use gnomon_protocol::{LCD_COL_BYTES, LCD_ROWS, NO_MSG_OPTIONS};

use crate::config::{
    IdleConfig, IdleLayout, IDLE_REFRESH_S, PHONE_IDLE_BUFFER_ROWS, WATCH_DRAWN_IDLE_BUFFER_ROWS,
};
use crate::frame::FrameBuffer;
use crate::timer::{Repeat, TimerId, TimerService, TimerSetup};

/// What the idle page wants done with the frame after drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageOutcome {
    /// Nothing changed on screen
    Unchanged,
    /// Send the first `rows` rows to the panel
    Redraw { rows: u8 },
}

/// Everything the idle page may touch during one update
pub struct IdlePageContext<'c> {
    /// The shared frame buffer, held by the display task
    pub frame: &'c mut FrameBuffer,
    /// Live idle configuration, read-only here
    pub config: &'c IdleConfig,
    /// Timer service, for rearming the idle timer
    pub timers: &'c mut dyn TimerService,
    /// The idle timer allocated by the display task
    pub idle_timer: TimerId,
    /// Last reported Bluetooth link state
    pub link_up: bool,
}

/// Idle page renderer
pub trait IdlePage {
    /// Called once at startup with the idle timer handle
    fn init(&mut self, idle_timer: TimerId);

    /// Draw the idle page into the frame
    fn handle(&mut self, ctx: IdlePageContext<'_>) -> PageOutcome;
}

/// Rows of the link indicator inside the watch region
const LINK_ICON_ROWS: Range<usize> = 4..12;
/// Byte columns of the link indicator
const LINK_ICON_COLS: Range<usize> = (LCD_COL_BYTES - 2)..LCD_COL_BYTES;

/// Stock idle page: watch region, separator, phone region
///
/// The regions are left blank apart from a separator line and a link
/// indicator; the clock and phone widgets draw on top of this.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdlePageMain {
    refresh_s: u16,
    idle_timer: Option<TimerId>,
    redraws: u32,
}

impl Default for IdlePageMain {
    fn default() -> Self {
        Self::new(IDLE_REFRESH_S)
    }
}

impl IdlePageMain {
    /// Create the idle page with the given refresh period
    pub const fn new(refresh_s: u16) -> Self {
        Self {
            refresh_s,
            idle_timer: None,
            redraws: 0,
        }
    }

    /// Number of times the page has been drawn
    pub fn redraws(&self) -> u32 {
        self.redraws
    }

    /// Row carrying the line between the two regions
    pub fn separator_row(layout: IdleLayout) -> usize {
        match layout {
            IdleLayout::WatchControlsTop => WATCH_DRAWN_IDLE_BUFFER_ROWS - 1,
            IdleLayout::PhoneControlsTop => PHONE_IDLE_BUFFER_ROWS,
        }
    }

    fn draw(&self, frame: &mut FrameBuffer, config: &IdleConfig, link_up: bool) {
        let layout = config.layout();
        frame.clear();

        let separator = Self::separator_row(layout);
        frame.fill_rows(separator..separator + 1, 0xFF);

        if link_up {
            let watch = layout.watch_region_start();
            for row in LINK_ICON_ROWS {
                if let Some(bytes) = frame.row_mut(watch + row) {
                    bytes[LINK_ICON_COLS].fill(0xFF);
                }
            }
        }

        if config.is_inverted() {
            frame.invert_rows(0..LCD_ROWS);
        }
    }

    fn keep_refreshing(&self, timers: &mut dyn TimerService, id: TimerId) {
        // The splash timeout also runs on this timer; leave it alone while armed
        if matches!(timers.state(id), Ok(state) if state.is_armed()) {
            return;
        }

        let setup = TimerSetup {
            period_s: self.refresh_s,
            repeat: Repeat::Forever,
            msg_type: MSG_IDLE_UPDATE,
            options: NO_MSG_OPTIONS,
        };
        if let Err(_e) = timers.configure(id, setup).and_then(|_| timers.start(id)) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Idle refresh timer not armed: {:?}", _e);
        }
    }
}

impl IdlePage for IdlePageMain {
    fn init(&mut self, idle_timer: TimerId) {
        self.idle_timer = Some(idle_timer);
    }

    fn handle(&mut self, ctx: IdlePageContext<'_>) -> PageOutcome {
        self.draw(ctx.frame, ctx.config, ctx.link_up);
        self.redraws = self.redraws.wrapping_add(1);

        if let Some(id) = self.idle_timer {
            self.keep_refreshing(ctx.timers, id);
        }

        PageOutcome::Redraw {
            rows: LCD_ROWS as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdleSettings;
    use crate::timer::{OneSecondTimers, TimerState};

    fn context<'c>(
        frame: &'c mut FrameBuffer,
        config: &'c IdleConfig,
        timers: &'c mut OneSecondTimers<4>,
        idle_timer: TimerId,
        link_up: bool,
    ) -> IdlePageContext<'c> {
        IdlePageContext {
            frame,
            config,
            timers,
            idle_timer,
            link_up,
        }
    }

    #[test]
    fn test_draws_separator_for_layout() {
        let mut timers: OneSecondTimers<4> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        let mut page = IdlePageMain::new(60);
        page.init(id);
        let mut frame = FrameBuffer::new();

        let mut config = IdleConfig::new(IdleSettings::default());
        let outcome = page.handle(context(&mut frame, &config, &mut timers, id, false));
        assert_eq!(outcome, PageOutcome::Redraw { rows: 96 });
        assert_eq!(frame.row(29), Some(&[0xFF; LCD_COL_BYTES]));
        assert_eq!(frame.row(66), Some(&[0x00; LCD_COL_BYTES]));

        config.toggle_layout();
        page.handle(context(&mut frame, &config, &mut timers, id, false));
        assert_eq!(frame.row(29), Some(&[0x00; LCD_COL_BYTES]));
        assert_eq!(frame.row(66), Some(&[0xFF; LCD_COL_BYTES]));
    }

    #[test]
    fn test_invert_flips_every_row() {
        let mut timers: OneSecondTimers<4> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        let mut page = IdlePageMain::new(60);
        let mut frame = FrameBuffer::new();

        let mut config = IdleConfig::new(IdleSettings::default());
        config.toggle_invert();
        page.handle(context(&mut frame, &config, &mut timers, id, false));

        assert_eq!(frame.row(0), Some(&[0xFF; LCD_COL_BYTES]));
        assert_eq!(frame.row(29), Some(&[0x00; LCD_COL_BYTES]));
    }

    #[test]
    fn test_link_indicator_follows_watch_region() {
        let mut timers: OneSecondTimers<4> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        let mut page = IdlePageMain::new(60);
        let mut frame = FrameBuffer::new();
        let mut config = IdleConfig::new(IdleSettings::default());

        page.handle(context(&mut frame, &config, &mut timers, id, true));
        let row = frame.row(LINK_ICON_ROWS.start).unwrap();
        assert_eq!(row[LCD_COL_BYTES - 1], 0xFF);
        assert_eq!(row[0], 0x00);

        config.toggle_layout();
        page.handle(context(&mut frame, &config, &mut timers, id, true));
        let row = frame.row(PHONE_IDLE_BUFFER_ROWS + LINK_ICON_ROWS.start).unwrap();
        assert_eq!(row[LCD_COL_BYTES - 1], 0xFF);
        assert_eq!(frame.row(LINK_ICON_ROWS.start).unwrap()[LCD_COL_BYTES - 1], 0x00);
    }

    #[test]
    fn test_arms_refresh_after_splash() {
        let mut timers: OneSecondTimers<4> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        let mut page = IdlePageMain::new(60);
        page.init(id);
        let mut frame = FrameBuffer::new();
        let config = IdleConfig::new(IdleSettings::default());

        page.handle(context(&mut frame, &config, &mut timers, id, false));

        assert_eq!(timers.state(id), Ok(TimerState::Armed { remaining_s: 60 }));
        let fired = timers.tick(60);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].msg_type, MSG_IDLE_UPDATE);
        assert!(timers.state(id).unwrap().is_armed());
    }

    #[test]
    fn test_leaves_armed_splash_timer_alone() {
        let mut timers: OneSecondTimers<4> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        timers
            .configure(
                id,
                TimerSetup {
                    period_s: 3,
                    repeat: Repeat::Once,
                    msg_type: 0x61,
                    options: NO_MSG_OPTIONS,
                },
            )
            .unwrap();
        timers.start(id).unwrap();

        let mut page = IdlePageMain::new(60);
        page.init(id);
        let mut frame = FrameBuffer::new();
        let config = IdleConfig::new(IdleSettings::default());
        page.handle(context(&mut frame, &config, &mut timers, id, false));

        assert_eq!(timers.state(id), Ok(TimerState::Armed { remaining_s: 3 }));
        assert_eq!(page.redraws(), 1);
    }
}
