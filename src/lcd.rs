//! The LCD1602 driver itself

use embedded_hal::delay::DelayNs;

use crate::{
    bus::{BusPin, SoftI2c, Transfer},
    command::{CommandSet, LineMode, MoveDirection, ShiftType, State},
    error::Error,
    sender::Sender,
};

mod init;

pub use init::{Config, DEFAULT_ADDRESS};

/// Number of lines of a LCD1602
pub const LINE_COUNT: u8 = 2;
/// Number of visible characters per line
pub const LINE_CAPACITY: u8 = 16;

/// Column where `len` characters start so they're centered on a line, as `(16 / 2) - len / 2`
///
/// Text that doesn't fit starts at column 0.
pub fn centered_column(len: usize) -> u8 {
    (LINE_CAPACITY as usize / 2).saturating_sub(len / 2) as u8
}

/// A LCD1602 behind a PCF8574 backpack, on a bit-banged I2C bus
///
/// Every method blocks until the controller is ready for the next one.
pub struct Lcd<SCL, SDA, Delayer> {
    sender: Sender<SCL, SDA>,
    delayer: Delayer,
    config: Config,
}

impl<SCL, SDA, Delayer, E> Lcd<SCL, SDA, Delayer>
where
    SCL: BusPin<Error = E>,
    SDA: BusPin<Error = E>,
    Delayer: DelayNs,
{
    /// Clear the display, and move cursor to (0, 0)
    ///
    /// Only returns after the controller finished clearing.
    pub fn clean_display(&mut self) -> Result<(), Error<E>> {
        self.sender
            .send(CommandSet::ClearDisplay, &mut self.delayer)?;
        self.delay_us(self.config.get_clear_delay_us());

        #[cfg(feature = "defmt")]
        defmt::debug!("LCD1602 cleared");

        Ok(())
    }

    /// Move cursor to (0, 0), and shift display window back
    pub fn return_home(&mut self) -> Result<(), Error<E>> {
        self.sender
            .send(CommandSet::ReturnHome, &mut self.delayer)?;
        // same execution time as clear
        self.delay_us(self.config.get_clear_delay_us());
        Ok(())
    }

    /// Move cursor to `column` of `line`
    ///
    /// Line 0 starts at DDRAM address `0x00`, line 1 at `0x40`.
    pub fn set_cursor_pos(&mut self, line: u8, column: u8) -> Result<(), Error<E>> {
        let lines = match self.config.get_line_mode() {
            LineMode::OneLine => 1,
            LineMode::TwoLine => LINE_COUNT,
        };
        if line >= lines {
            return Err(Error::LineOutOfRange);
        }
        if column >= LINE_CAPACITY {
            return Err(Error::ColumnOutOfRange);
        }

        let raw_pos = line * 0x40 + column;

        self.sender
            .send(CommandSet::SetDDRAM(raw_pos), &mut self.delayer)?;
        Ok(())
    }

    /// Write a raw byte at current position
    pub fn write_u8_to_cur(&mut self, byte: u8) -> Result<(), Error<E>> {
        self.sender
            .send(CommandSet::WriteDataToRAM(byte), &mut self.delayer)?;
        Ok(())
    }

    /// Write a character at current position
    ///
    /// An ASCII character is written as its own code, so `'\x00'`~`'\x07'` show the CGRAM
    /// graphs and `'~'` shows whatever glyph the CGROM has at 0x7E.
    /// Anything outside ASCII is written as a full rectangle (0xFF).
    pub fn write_char_to_cur(&mut self, char: char) -> Result<(), Error<E>> {
        let out_byte = match char.is_ascii() {
            true => char as u8,
            false => 0xFF,
        };

        self.write_u8_to_cur(out_byte)
    }

    /// Write string from current position
    ///
    /// There is no line wrap, characters past the end of a line go to the hidden part of DDRAM.
    pub fn write_str_to_cur(&mut self, str: &str) -> Result<(), Error<E>> {
        str.chars()
            .try_for_each(|char| self.write_char_to_cur(char))
    }

    #[allow(missing_docs)]
    pub fn write_str_to_pos(&mut self, str: &str, line: u8, column: u8) -> Result<(), Error<E>> {
        self.set_cursor_pos(line, column)?;
        self.write_str_to_cur(str)
    }

    /// Store a 5x8 graph in CGRAM slot `index`, then move cursor back to (0, 0) of DDRAM
    pub fn write_graph_to_cgram(&mut self, index: u8, graph_data: &[u8; 8]) -> Result<(), Error<E>> {
        assert!(index < 8, "Only 8 graphs allowed in CGRAM");

        assert!(
            graph_data.iter().all(|&line| line < 2u8.pow(5)),
            "Only lower 5 bits use to construct display"
        );

        // if DDRAM is write from right to left, then when we change to CGRAM, graph will write from lower to upper
        // we will change it to left to right, to make writing correct
        let direction_fliped = self.get_direction() == MoveDirection::RightToLeft;
        if direction_fliped {
            self.set_direction(MoveDirection::LeftToRight)?;
        }

        self.sender
            .send(CommandSet::SetCGRAM(index << 3), &mut self.delayer)?;
        for &line_data in graph_data.iter() {
            self.write_u8_to_cur(line_data)?;
        }

        if direction_fliped {
            self.set_direction(MoveDirection::RightToLeft)?;
        }

        self.set_cursor_pos(0, 0)
    }

    /// Write graph stored in CGRAM slot `index` at current position
    pub fn write_graph_to_cur(&mut self, index: u8) -> Result<(), Error<E>> {
        assert!(index < 8, "Only 8 graphs allowed in CGRAM");
        self.write_u8_to_cur(index)
    }

    /// Move cursor one step toward `dir`, display stays
    pub fn shift_cursor(&mut self, dir: MoveDirection) -> Result<(), Error<E>> {
        self.sender.send(
            CommandSet::CursorOrDisplayShift(ShiftType::CursorOnly, dir),
            &mut self.delayer,
        )?;
        Ok(())
    }

    /// Shift the whole display window one step toward `dir`
    pub fn shift_display(&mut self, dir: MoveDirection) -> Result<(), Error<E>> {
        self.sender.send(
            CommandSet::CursorOrDisplayShift(ShiftType::CursorAndDisplay, dir),
            &mut self.delayer,
        )?;
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn set_display_state(&mut self, display: State) -> Result<(), Error<E>> {
        self.config = self.config.set_display_state(display);
        self.send_display_on_off()
    }

    #[allow(missing_docs)]
    pub fn get_display_state(&self) -> State {
        self.config.get_display_state()
    }

    #[allow(missing_docs)]
    pub fn set_cursor_state(&mut self, cursor: State) -> Result<(), Error<E>> {
        self.config = self.config.set_cursor_state(cursor);
        self.send_display_on_off()
    }

    #[allow(missing_docs)]
    pub fn get_cursor_state(&self) -> State {
        self.config.get_cursor_state()
    }

    #[allow(missing_docs)]
    pub fn set_cursor_blink_state(&mut self, blink: State) -> Result<(), Error<E>> {
        self.config = self.config.set_cursor_blink(blink);
        self.send_display_on_off()
    }

    #[allow(missing_docs)]
    pub fn get_cursor_blink_state(&self) -> State {
        self.config.get_cursor_blink()
    }

    /// Direction the cursor moves after each write
    pub fn set_direction(&mut self, dir: MoveDirection) -> Result<(), Error<E>> {
        self.config = self.config.set_direction(dir);
        self.send_entry_mode()
    }

    #[allow(missing_docs)]
    pub fn get_direction(&self) -> MoveDirection {
        self.config.get_direction()
    }

    /// Whether display window follows the cursor after each write
    pub fn set_shift_type(&mut self, shift: ShiftType) -> Result<(), Error<E>> {
        self.config = self.config.set_shift_type(shift);
        self.send_entry_mode()
    }

    #[allow(missing_docs)]
    pub fn get_shift_type(&self) -> ShiftType {
        self.config.get_shift_type()
    }

    #[allow(missing_docs)]
    pub fn set_backlight(&mut self, backlight: State) -> Result<(), Error<E>> {
        self.config = self.config.set_backlight(backlight);
        self.sender.set_backlight(backlight, &mut self.delayer)?;
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn get_backlight(&self) -> State {
        self.sender.get_backlight()
    }

    /// Current configuration, including every state changed since [`Lcd::new()`]
    pub fn get_config(&self) -> Config {
        self.config
    }

    /// Acknowledgment of the latest bus transaction
    ///
    /// The driver never acts on it, this is for an optional health check:
    /// a [`Ack::Nack`](crate::bus::Ack::Nack) here usually means no backpack on that address.
    pub fn last_ack(&self) -> Option<Transfer> {
        self.sender.last_ack()
    }

    #[allow(missing_docs)]
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }

    #[allow(missing_docs)]
    pub fn delay_us(&mut self, us: u32) {
        self.delayer.delay_us(us);
    }

    /// Give back clock pin, data pin and delayer
    pub fn release(self) -> (SCL, SDA, Delayer) {
        let (scl, sda) = SoftI2c::release(self.sender.release());
        (scl, sda, self.delayer)
    }

    fn send_display_on_off(&mut self) -> Result<(), Error<E>> {
        self.sender
            .send(self.config.display_on_off(), &mut self.delayer)?;
        Ok(())
    }

    fn send_entry_mode(&mut self) -> Result<(), Error<E>> {
        self.sender
            .send(self.config.entry_mode(), &mut self.delayer)?;
        Ok(())
    }
}

impl<SCL, SDA, Delayer, E> core::fmt::Write for Lcd<SCL, SDA, Delayer>
where
    SCL: BusPin<Error = E>,
    SDA: BusPin<Error = E>,
    Delayer: DelayNs,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_str_to_cur(s).map_err(|_| core::fmt::Error)
    }
}
