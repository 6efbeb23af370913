//! Sharp memory LCD driver
//!
//! Drives the 96x96 panel over an async SPI bus. Chip select on these
//! panels is active high, so it is a plain output pin rather than part of
//! an `SpiDevice`.

use embassy_rp::gpio::Output;
use embassy_time::Timer;
use embedded_hal_async::spi::SpiBus;
use gnomon_hal::lcd::{clamp_rows, encode_line, LcdPanel, Vcom, CMD_CLEAR, CMD_WRITE_LINE};
use gnomon_protocol::LcdRow;

pub use gnomon_hal::lcd::LCD_SPI_FREQUENCY;

/// Chip select setup and hold time
const CS_SETTLE_US: u64 = 3;

/// Sharp memory LCD on an SPI bus
pub struct SharpMemoryLcd<'d, SPI> {
    spi: SPI,
    cs: Output<'d>,
    vcom: Vcom,
}

impl<'d, SPI: SpiBus> SharpMemoryLcd<'d, SPI> {
    /// Create the driver; `cs` should start low
    pub fn new(spi: SPI, cs: Output<'d>) -> Self {
        Self {
            spi,
            cs,
            vcom: Vcom::default(),
        }
    }

    /// Mode byte for `command`, flipping VCOM on every transfer
    fn mode(&mut self, command: u8) -> u8 {
        self.vcom = self.vcom.toggled();
        command | self.vcom.mode_bit()
    }

    async fn transaction(
        &mut self,
        command: u8,
        first_row: usize,
        rows: &[LcdRow],
    ) -> Result<(), SPI::Error> {
        let mode = self.mode(command);
        self.cs.set_high();
        Timer::after_micros(CS_SETTLE_US).await;

        let result = self.send(mode, first_row, rows).await;

        Timer::after_micros(CS_SETTLE_US).await;
        self.cs.set_low();
        result
    }

    async fn send(&mut self, mode: u8, first_row: usize, rows: &[LcdRow]) -> Result<(), SPI::Error> {
        self.spi.write(&[mode]).await?;
        for (offset, row) in rows.iter().enumerate() {
            self.spi.write(&encode_line(first_row + offset, row)).await?;
        }
        self.spi.write(&[0x00]).await?;
        self.spi.flush().await
    }
}

impl<'d, SPI: SpiBus> LcdPanel for SharpMemoryLcd<'d, SPI> {
    type Error = SPI::Error;

    async fn write_rows(&mut self, first_row: usize, rows: &[LcdRow]) -> Result<(), Self::Error> {
        let count = clamp_rows(first_row, rows.len());
        if count == 0 {
            return Ok(());
        }
        self.transaction(CMD_WRITE_LINE, first_row, &rows[..count]).await
    }

    async fn clear(&mut self) -> Result<(), Self::Error> {
        self.transaction(CMD_CLEAR, 0, &[]).await
    }

    async fn toggle_vcom(&mut self) -> Result<(), Self::Error> {
        self.transaction(0, 0, &[]).await
    }
}
