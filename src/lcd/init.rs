use embedded_hal::delay::DelayNs;

use crate::{
    bus::{BusPin, SoftI2c, DEFAULT_SETTLE_US},
    command::{CommandSet, DataWidth, Font, LineMode, MoveDirection, ShiftType, State},
    error::Error,
    lcd::Lcd,
    sender::{Sender, DEFAULT_STROBE_DELAY_US},
};

/// Default 7 bit address of PCF8574 backpacks, with A0~A2 all pulled high
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// [`Config`] is the init config of a [`Lcd`]
///
/// [`Config::default()`] gives a 2 line, 5x8 font display with backlight on, cursor and blink
/// off, text flowing left to right, on address `0x27`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    address: u8,
    backlight: State,
    line_mode: LineMode,
    font: Font,
    direction: MoveDirection,
    shift_type: ShiftType,
    display: State,
    cursor: State,
    cursor_blink: State,
    bus_settle_us: u32,
    strobe_delay_us: u32,
    clear_delay_us: u32,
    power_on_delay_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            backlight: State::On,
            line_mode: LineMode::TwoLine,
            font: Font::Font5x8,
            direction: MoveDirection::LeftToRight,
            shift_type: ShiftType::CursorOnly,
            display: State::On,
            cursor: State::Off,
            cursor_blink: State::Off,
            bus_settle_us: DEFAULT_SETTLE_US,
            strobe_delay_us: DEFAULT_STROBE_DELAY_US,
            clear_delay_us: 1_000,
            power_on_delay_ms: 1,
        }
    }
}

#[allow(missing_docs)]
impl Config {
    pub fn get_address(&self) -> u8 {
        self.address
    }

    pub fn set_address(mut self, address: u8) -> Self {
        assert!(address < 2u8.pow(7), "I2C address should be 7 bit");
        self.address = address;
        self
    }

    pub fn get_backlight(&self) -> State {
        self.backlight
    }

    pub fn set_backlight(mut self, backlight: State) -> Self {
        self.backlight = backlight;
        self
    }

    pub fn get_line_mode(&self) -> LineMode {
        self.line_mode
    }

    pub fn set_line_mode(mut self, line: LineMode) -> Self {
        self.line_mode = line;
        self
    }

    pub fn get_font(&self) -> Font {
        self.font
    }

    pub fn set_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn get_direction(&self) -> MoveDirection {
        self.direction
    }

    pub fn set_direction(mut self, dir: MoveDirection) -> Self {
        self.direction = dir;
        self
    }

    pub fn get_shift_type(&self) -> ShiftType {
        self.shift_type
    }

    pub fn set_shift_type(mut self, shift: ShiftType) -> Self {
        self.shift_type = shift;
        self
    }

    pub fn get_display_state(&self) -> State {
        self.display
    }

    pub fn set_display_state(mut self, display: State) -> Self {
        self.display = display;
        self
    }

    pub fn get_cursor_state(&self) -> State {
        self.cursor
    }

    pub fn set_cursor_state(mut self, cursor: State) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn get_cursor_blink(&self) -> State {
        self.cursor_blink
    }

    pub fn set_cursor_blink(mut self, blink: State) -> Self {
        self.cursor_blink = blink;
        self
    }

    /// settle time after every bus line transition
    pub fn get_bus_settle_us(&self) -> u32 {
        self.bus_settle_us
    }

    pub fn set_bus_settle_us(mut self, us: u32) -> Self {
        self.bus_settle_us = us;
        self
    }

    /// settle time around every expander write of the enable strobe
    pub fn get_strobe_delay_us(&self) -> u32 {
        self.strobe_delay_us
    }

    pub fn set_strobe_delay_us(mut self, us: u32) -> Self {
        self.strobe_delay_us = us;
        self
    }

    /// how long the controller is left alone after a clear or return home,
    /// datasheet asks for at least 1 ms
    pub fn get_clear_delay_us(&self) -> u32 {
        self.clear_delay_us
    }

    pub fn set_clear_delay_us(mut self, us: u32) -> Self {
        self.clear_delay_us = us;
        self
    }

    /// wait before the reset handshake, once the bus is set up
    pub fn get_power_on_delay_ms(&self) -> u32 {
        self.power_on_delay_ms
    }

    pub fn set_power_on_delay_ms(mut self, ms: u32) -> Self {
        self.power_on_delay_ms = ms;
        self
    }

    pub(crate) fn entry_mode(&self) -> CommandSet {
        CommandSet::EntryModeSet(self.direction, self.shift_type)
    }

    pub(crate) fn function_set(&self) -> CommandSet {
        CommandSet::FunctionSet(DataWidth::Bit4, self.line_mode, self.font)
    }

    pub(crate) fn display_on_off(&self) -> CommandSet {
        CommandSet::DisplayOnOff {
            display: self.display,
            cursor: self.cursor,
            cursor_blink: self.cursor_blink,
        }
    }
}

impl<SCL, SDA, Delayer, E> Lcd<SCL, SDA, Delayer>
where
    SCL: BusPin<Error = E>,
    SDA: BusPin<Error = E>,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver on the clock and data pins, and init LCD hardware
    pub fn new(scl: SCL, sda: SDA, delayer: Delayer, config: Config) -> Result<Self, Error<E>> {
        let bus = SoftI2c::new(scl, sda, config.get_bus_settle_us())?;
        let sender = Sender::new(
            bus,
            config.get_address(),
            config.get_backlight(),
            config.get_strobe_delay_us(),
        );

        let mut lcd = Lcd {
            sender,
            delayer,
            config,
        };

        lcd.delay_ms(config.get_power_on_delay_ms());
        lcd.init()?;

        Ok(lcd)
    }

    /// Run the power-on reset handshake
    ///
    /// The controller may power up in either 8 bit or 4 bit mode, so it's forced into 8 bit
    /// mode first, switched to 4 bit mode, and then configured. [`Lcd::new()`] already does
    /// this, call it again only to recover a display that lost its state.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        let config = self.config;

        // in initialization process, we'd better use "raw command", to strictly follow datasheet
        for _ in 0..3 {
            self.sender
                .send(CommandSet::ForceEightBit, &mut self.delayer)?;
        }
        self.sender
            .send(CommandSet::EnterFourBit, &mut self.delayer)?;

        self.sender.send(config.entry_mode(), &mut self.delayer)?;
        self.sender.send(config.function_set(), &mut self.delayer)?;
        self.sender
            .send(config.display_on_off(), &mut self.delayer)?;

        self.clean_display()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("LCD1602 at {=u8:#x} initialized", config.get_address());

        Ok(())
    }
}
