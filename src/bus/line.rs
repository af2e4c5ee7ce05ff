use embedded_hal::digital::PinState;

use super::{BusPin, Direction};

/// What the driver is currently doing to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineState {
    /// Actively driven low
    Low,
    /// Let go, pulled high by the pull-up
    Released,
}

/// One bus line (clock or data), it's either driven low or released, never driven high
pub(crate) struct Line<P> {
    pin: P,
    state: LineState,
}

impl<P: BusPin> Line<P> {
    /// Enable the pull-up and release the line
    pub(crate) fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_pull_up(true)?;

        let mut line = Self {
            pin,
            state: LineState::Released,
        };
        line.release()?;
        Ok(line)
    }

    pub(crate) fn pull_low(&mut self) -> Result<(), P::Error> {
        // latch low first, so the line never glitches high when switching to output
        self.pin.set_level(PinState::Low)?;
        self.pin.set_direction(Direction::Output)?;
        self.state = LineState::Low;
        Ok(())
    }

    pub(crate) fn release(&mut self) -> Result<(), P::Error> {
        self.pin.set_direction(Direction::Input)?;
        self.state = LineState::Released;
        Ok(())
    }

    pub(crate) fn is_high(&mut self) -> Result<bool, P::Error> {
        Ok(self.pin.level()? == PinState::High)
    }

    pub(crate) fn state(&self) -> LineState {
        self.state
    }

    pub(crate) fn into_inner(self) -> P {
        self.pin
    }
}
