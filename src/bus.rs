//! Software (bit-banged) I2C master
//!
//! [`SoftI2c`] reproduces the two-wire bus with two GPIOs and a delay: lines are only ever
//! driven low or released to the pull-up, every transition is followed by a short settle
//! delay, and bytes are clocked out most significant bit first.
//!
//! It only supports what a PCF8574 backpack needs: one single byte write per transaction, no
//! arbitration, no clock stretching. The acknowledgment bit is sampled and reported, but
//! never acted on.

use embedded_hal::delay::DelayNs;

use crate::utils::{BitOps, BitState};

mod line;
mod pin;
#[cfg(test)]
pub(crate) mod sim;

pub(crate) use line::Line;
pub use line::LineState;
pub use pin::{BusPin, Direction, OpenDrain};

/// Default line settle time between two transitions, in microseconds
pub const DEFAULT_SETTLE_US: u32 = 1;

/// The acknowledgment slot of a byte transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// Receiver pulled data low
    Ack,
    /// Data stayed high, no device, or device didn't accept the byte
    Nack,
}

/// Acknowledgment of both bytes of a [`SoftI2c::write()`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transfer {
    #[allow(missing_docs)]
    pub address: Ack,
    #[allow(missing_docs)]
    pub payload: Ack,
}

impl Transfer {
    /// Whether the device acknowledged both address and payload
    pub fn is_acknowledged(&self) -> bool {
        self.address == Ack::Ack && self.payload == Ack::Ack
    }
}

/// Bit-banged I2C master on a clock pin and a data pin
pub struct SoftI2c<SCL, SDA> {
    scl: Line<SCL>,
    sda: Line<SDA>,
    settle_us: u32,
}

impl<SCL, SDA, E> SoftI2c<SCL, SDA>
where
    SCL: BusPin<Error = E>,
    SDA: BusPin<Error = E>,
{
    /// Take both pins, enable their pull-ups and release both lines
    pub fn new(scl: SCL, sda: SDA, settle_us: u32) -> Result<Self, E> {
        Ok(Self {
            scl: Line::new(scl)?,
            sda: Line::new(sda)?,
            settle_us,
        })
    }

    /// Give back both pins, `(scl, sda)`
    pub fn release(self) -> (SCL, SDA) {
        (self.scl.into_inner(), self.sda.into_inner())
    }

    #[allow(missing_docs)]
    pub fn scl_state(&self) -> LineState {
        self.scl.state()
    }

    #[allow(missing_docs)]
    pub fn sda_state(&self) -> LineState {
        self.sda.state()
    }

    #[allow(missing_docs)]
    pub fn get_settle_us(&self) -> u32 {
        self.settle_us
    }

    // every transition must be followed by it, or the receiver may misread bits
    fn settle(&self, delayer: &mut impl DelayNs) {
        delayer.delay_us(self.settle_us);
    }

    /// START condition: data falls while clock is high, then clock goes low
    ///
    /// Both lines should be released (bus idle) when calling this.
    pub fn start(&mut self, delayer: &mut impl DelayNs) -> Result<(), E> {
        self.sda.pull_low()?;
        self.settle(delayer);
        self.scl.pull_low()?;
        self.settle(delayer);
        Ok(())
    }

    /// STOP condition: data rises while clock is high, leaves the bus idle
    ///
    /// After an acknowledgment slot the receiver has let go of data, so data may already be
    /// high. Data is pulled low while clock is still low first, otherwise releasing data would
    /// not be a rising edge and the receiver would never see the STOP.
    pub fn stop(&mut self, delayer: &mut impl DelayNs) -> Result<(), E> {
        self.sda.pull_low()?;
        self.settle(delayer);
        self.scl.release()?;
        self.settle(delayer);
        self.sda.release()?;
        self.settle(delayer);
        Ok(())
    }

    /// Repeated START: begin a new transfer without a STOP in between
    pub fn repeated_start(&mut self, delayer: &mut impl DelayNs) -> Result<(), E> {
        self.scl.release()?;
        self.settle(delayer);
        self.sda.pull_low()?;
        self.settle(delayer);
        self.scl.pull_low()?;
        self.settle(delayer);
        Ok(())
    }

    /// Clock out one byte, MSB first, then sample the acknowledgment slot
    ///
    /// Clock should be low when calling this, and it's low again on return.
    pub fn write_byte(&mut self, delayer: &mut impl DelayNs, byte: u8) -> Result<Ack, E> {
        let mut shifter = byte;

        self.settle(delayer);

        for _ in 0..8 {
            match shifter.check_bit(7) {
                BitState::Set => self.sda.release()?,
                BitState::Clear => self.sda.pull_low()?,
            }
            shifter <<= 1;
            self.settle(delayer);
            self.scl.release()?;
            self.settle(delayer);
            self.scl.pull_low()?;
            self.settle(delayer);
        }

        // hand data line over to the receiver
        self.sda.release()?;
        self.settle(delayer);

        self.scl.release()?;
        self.settle(delayer);
        let ack = match self.sda.is_high()? {
            true => Ack::Nack,
            false => Ack::Ack,
        };
        self.scl.pull_low()?;
        self.settle(delayer);

        Ok(ack)
    }

    /// One addressed write transaction: START, address + write bit, `payload`, STOP
    ///
    /// Both lines are released on return, whatever the device answered.
    pub fn write(
        &mut self,
        delayer: &mut impl DelayNs,
        address: u8,
        payload: u8,
    ) -> Result<Transfer, E> {
        assert!(address < 2u8.pow(7), "I2C address should be 7 bit");

        self.start(delayer)?;
        // R/W bit is 0 for write
        let address_ack = self.write_byte(delayer, address << 1)?;
        let payload_ack = self.write_byte(delayer, payload)?;
        self.stop(delayer)?;

        Ok(Transfer {
            address: address_ack,
            payload: payload_ack,
        })
    }
}
