//! Command set of the HD44780-compatible controller, and the enums used to build them

use crate::utils::{BitOps, BitState};

/// Every instruction this driver can send to the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandSet {
    // these two are not commands from datasheet,
    // they are the raw values of the power-on reset handshake,
    // we name them, to make things tidy
    /// `0x03`, sent 3 times right after power on, forces the controller into 8 bit mode
    ForceEightBit,
    /// `0x02`, switches the controller into 4 bit mode
    EnterFourBit,
    #[allow(missing_docs)]
    ClearDisplay,
    #[allow(missing_docs)]
    ReturnHome,
    #[allow(missing_docs)]
    EntryModeSet(MoveDirection, ShiftType),
    #[allow(missing_docs)]
    DisplayOnOff {
        display: State,
        cursor: State,
        cursor_blink: State,
    },
    #[allow(missing_docs)]
    CursorOrDisplayShift(ShiftType, MoveDirection),
    #[allow(missing_docs)]
    FunctionSet(DataWidth, LineMode, Font),
    /// set CGRAM address, should be less than `0x40`
    SetCGRAM(u8),
    /// set DDRAM address, should be less than `0x80`
    SetDDRAM(u8),
    /// write a byte to the RAM currently addressed
    WriteDataToRAM(u8),
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveDirection {
    RightToLeft,
    #[default]
    LeftToRight,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftType {
    #[default]
    CursorOnly,
    CursorAndDisplay,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Off,
    #[default]
    On,
}

/// Only [`DataWidth::Bit4`] is reachable through the PCF8574 backpack,
/// since DB0~DB3 are not wired
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    #[default]
    Bit4,
    Bit8,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineMode {
    OneLine,
    #[default]
    TwoLine,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    #[default]
    Font5x8,
    Font5x11,
}

/// The register a byte is written to, it's the RS line of the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// RS = 0, instruction register
    Command,
    /// RS = 1, data register
    Character,
}

/// A logical byte ready to be sent, with the register it goes to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    mode: Mode,
    data: u8,
}

impl Command {
    #[allow(missing_docs)]
    pub fn new(mode: Mode, data: u8) -> Self {
        Self { mode, data }
    }

    #[allow(missing_docs)]
    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    #[allow(missing_docs)]
    pub fn get_data(&self) -> u8 {
        self.data
    }
}

// every option sits on one bit of its instruction, `$set` is the variant that writes a 1
macro_rules! option_bit {
    ($option:ty, $set:path) => {
        impl From<$option> for BitState {
            fn from(option: $option) -> Self {
                BitState::from(option == $set)
            }
        }
    };
}

option_bit!(MoveDirection, MoveDirection::LeftToRight);
option_bit!(ShiftType, ShiftType::CursorAndDisplay);
option_bit!(State, State::On);
option_bit!(DataWidth, DataWidth::Bit8);
option_bit!(LineMode, LineMode::TwoLine);
option_bit!(Font, Font::Font5x11);

impl From<CommandSet> for Command {
    fn from(command: CommandSet) -> Self {
        let data = match command {
            CommandSet::ForceEightBit => 0b0000_0011,
            CommandSet::EnterFourBit => 0b0000_0010,
            CommandSet::ClearDisplay => 0b0000_0001,
            CommandSet::ReturnHome => 0b0000_0010,

            CommandSet::EntryModeSet(dir, shift) => 0b0000_0100u8
                .put_bit(1, dir.into())
                .put_bit(0, shift.into()),

            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => 0b0000_1000u8
                .put_bit(2, display.into())
                .put_bit(1, cursor.into())
                .put_bit(0, cursor_blink.into()),

            CommandSet::CursorOrDisplayShift(shift, dir) => 0b0001_0000u8
                .put_bit(3, shift.into())
                .put_bit(2, dir.into()),

            CommandSet::FunctionSet(width, line, font) => 0b0010_0000u8
                .put_bit(4, width.into())
                .put_bit(3, line.into())
                .put_bit(2, font.into()),

            CommandSet::SetCGRAM(addr) => {
                assert!(addr < 2u8.pow(6), "CGRAM address out of range");
                0b0100_0000 | addr
            }

            CommandSet::SetDDRAM(addr) => {
                assert!(addr < 2u8.pow(7), "DDRAM address out of range");
                0b1000_0000 | addr
            }

            CommandSet::WriteDataToRAM(data) => return Self::new(Mode::Character, data),
        };

        Self::new(Mode::Command, data)
    }
}
