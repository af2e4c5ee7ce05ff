//! Sender of the PCF8574 backpack
//!
//! [`Sender`] turns a [`Command`] into the 4 bit interface sequence of the controller, and
//! writes each expander byte as its own [`SoftI2c`] transaction.

use embedded_hal::delay::DelayNs;

use crate::{
    bus::{BusPin, SoftI2c, Transfer},
    command::{Command, Mode, State},
};

pub(crate) mod expander;

use expander::{idle_byte, NibblePair, StrobeSeq};

/// Default settle time around every expander write, in microseconds
///
/// Anything between 100 and 600 works with common modules.
pub const DEFAULT_STROBE_DELAY_US: u32 = 500;

/// Drives the controller through the expander, with a [`SoftI2c`] bus
pub struct Sender<SCL, SDA> {
    bus: SoftI2c<SCL, SDA>,
    addr: u8,
    backlight: State,
    strobe_delay_us: u32,
    last_ack: Option<Transfer>,
}

impl<SCL, SDA, E> Sender<SCL, SDA>
where
    SCL: BusPin<Error = E>,
    SDA: BusPin<Error = E>,
{
    #[allow(missing_docs)]
    pub fn new(bus: SoftI2c<SCL, SDA>, addr: u8, backlight: State, strobe_delay_us: u32) -> Self {
        assert!(addr < 2u8.pow(7), "I2C address should be 7 bit");

        Self {
            bus,
            addr,
            backlight,
            strobe_delay_us,
            last_ack: None,
        }
    }

    /// Send a byte to the controller
    ///
    /// High nibble first, then low nibble, each one latched by an enable strobe,
    /// that is 6 bus transactions per call.
    pub fn send(&mut self, command: impl Into<Command>, delayer: &mut impl DelayNs) -> Result<(), E> {
        let command: Command = command.into();
        let StrobeSeq(seq) = NibblePair::new(command, self.backlight).into();

        delayer.delay_us(self.strobe_delay_us);
        for byte in seq {
            self.write_expander(byte, delayer)?;
            delayer.delay_us(self.strobe_delay_us);
        }

        Ok(())
    }

    /// Send a raw byte to register `mode`
    pub fn send_byte(&mut self, value: u8, mode: Mode, delayer: &mut impl DelayNs) -> Result<(), E> {
        self.send(Command::new(mode, value), delayer)
    }

    /// Wait specific duration, and send command
    pub fn delay_and_send(
        &mut self,
        command: impl Into<Command>,
        delayer: &mut impl DelayNs,
        delay_us: u32,
    ) -> Result<(), E> {
        delayer.delay_us(delay_us);
        self.send(command, delayer)
    }

    /// Set the backlight
    ///
    /// It's a bit carried by every expander byte, so it's written out right away
    /// with all control lines low, and kept for every following command.
    pub fn set_backlight(&mut self, backlight: State, delayer: &mut impl DelayNs) -> Result<(), E> {
        self.backlight = backlight;
        self.write_expander(idle_byte(backlight), delayer)?;
        delayer.delay_us(self.strobe_delay_us);
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn get_backlight(&self) -> State {
        self.backlight
    }

    #[allow(missing_docs)]
    pub fn get_addr(&self) -> u8 {
        self.addr
    }

    /// Acknowledgment of the latest expander write, [`None`] if nothing was written yet
    pub fn last_ack(&self) -> Option<Transfer> {
        self.last_ack
    }

    /// Give back the bus
    pub fn release(self) -> SoftI2c<SCL, SDA> {
        self.bus
    }

    fn write_expander(&mut self, byte: u8, delayer: &mut impl DelayNs) -> Result<(), E> {
        let transfer = self.bus.write(delayer, self.addr, byte)?;

        #[cfg(feature = "defmt")]
        if !transfer.is_acknowledged() {
            defmt::trace!("expander {=u8:#x} did not ack {=u8:#x}", self.addr, byte);
        }

        self.last_ack = Some(transfer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Sender, DEFAULT_STROBE_DELAY_US};
    use crate::{
        bus::{
            sim::{SimPin, Wire},
            Ack, LineState, SoftI2c, DEFAULT_SETTLE_US,
        },
        command::{CommandSet, Mode, State},
    };

    fn sender(wire: &Wire) -> Sender<SimPin, SimPin> {
        let (scl, sda) = wire.pins();
        let bus = SoftI2c::new(scl, sda, DEFAULT_SETTLE_US).unwrap();
        Sender::new(bus, 0x27, State::On, DEFAULT_STROBE_DELAY_US)
    }

    #[test]
    fn six_transactions_per_byte() {
        for mode in [Mode::Command, Mode::Character] {
            let wire = Wire::new();
            let mut delay = wire.delay();
            let mut sender = sender(&wire);

            sender.send_byte(0xA5, mode, &mut delay).unwrap();

            let rs: u8 = match mode {
                Mode::Command => 0x00,
                Mode::Character => 0x01,
            };
            let payloads: std::vec::Vec<u8> = wire.writes().iter().map(|&(_, p)| p).collect();
            assert_eq!(
                payloads,
                [
                    0xA8 | rs,
                    0xAC | rs,
                    0xA8 | rs,
                    0x58 | rs,
                    0x5C | rs,
                    0x58 | rs
                ]
            );
            assert!(wire.writes().iter().all(|&(addr, _)| addr == 0x27));
        }
    }

    #[test]
    fn settles_around_every_write() {
        let wire = Wire::new();
        let mut delay = wire.delay();
        let mut sender = sender(&wire);

        sender.send(CommandSet::ClearDisplay, &mut delay).unwrap();

        // 7 strobe delays, plus the bus' own pacing
        assert!(wire.now_ns() >= 7 * DEFAULT_STROBE_DELAY_US as u64 * 1_000);

        let release = sender.release();
        assert_eq!(release.scl_state(), LineState::Released);
        assert_eq!(release.sda_state(), LineState::Released);
    }

    #[test]
    fn missing_ack_is_reported_not_raised() {
        let wire = Wire::new();
        wire.set_device_ack(false);
        let mut delay = wire.delay();
        let mut sender = sender(&wire);

        assert_eq!(sender.last_ack(), None);
        assert!(sender.send(CommandSet::ReturnHome, &mut delay).is_ok());

        let transfer = sender.last_ack().unwrap();
        assert_eq!(transfer.address, Ack::Nack);
        assert_eq!(wire.writes().len(), 6);
    }

    #[test]
    fn backlight_change_writes_once() {
        let wire = Wire::new();
        let mut delay = wire.delay();
        let mut sender = sender(&wire);

        sender.set_backlight(State::Off, &mut delay).unwrap();
        sender.send(CommandSet::ClearDisplay, &mut delay).unwrap();

        assert_eq!(sender.get_backlight(), State::Off);
        let writes = wire.writes();
        assert_eq!(writes[0], (0x27, 0x00));
        let payloads: std::vec::Vec<u8> = writes[1..].iter().map(|&(_, p)| p).collect();
        assert_eq!(payloads, [0x00, 0x04, 0x00, 0x10, 0x14, 0x10]);
    }
}
