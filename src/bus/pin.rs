use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Direction of a GPIO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// High impedance, the line follows the pull-up or whoever drives it
    Input,
    /// The pin drives its latched output level
    Output,
}

/// The GPIO capabilities [`SoftI2c`](super::SoftI2c) needs from each of its two pins
///
/// A line is never driven high: it's driven low by latching [`PinState::Low`] and switching to
/// [`Direction::Output`], and released by switching back to [`Direction::Input`], so that the
/// pull-up resistor brings it high.
///
/// On chips where GPIOs can switch direction at runtime, implement this trait directly on the
/// GPIO. For pins that are already configured as open-drain outputs, wrap them in [`OpenDrain`].
pub trait BusPin {
    #[allow(missing_docs)]
    type Error;

    /// Set the direction of the pin
    fn set_direction(&mut self, dir: Direction) -> Result<(), Self::Error>;

    /// Latch the output level, it only reaches the line when the pin is an output
    fn set_level(&mut self, level: PinState) -> Result<(), Self::Error>;

    /// Read the real level of the line
    fn level(&mut self) -> Result<PinState, Self::Error>;

    /// Enable or disable the internal pull-up
    fn set_pull_up(&mut self, enable: bool) -> Result<(), Self::Error>;
}

/// Adapter from an open-drain [`OutputPin`] + [`InputPin`] to [`BusPin`]
///
/// In open drain mode, setting the pin high releases the line, so direction and level are
/// folded into one output value. Pull-up is expected to be configured by the HAL or
/// provided by external resistors, [`BusPin::set_pull_up`] is a no-op.
pub struct OpenDrain<P> {
    pin: P,
    direction: Direction,
    level: PinState,
}

impl<P> OpenDrain<P> {
    #[allow(missing_docs)]
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            direction: Direction::Input,
            level: PinState::High,
        }
    }

    /// Get the wrapped pin back
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> OpenDrain<P>
where
    P: OutputPin + InputPin,
{
    fn apply(&mut self) -> Result<(), P::Error> {
        match (self.direction, self.level) {
            (Direction::Output, PinState::Low) => self.pin.set_low(),
            _ => self.pin.set_high(),
        }
    }
}

impl<P> BusPin for OpenDrain<P>
where
    P: OutputPin + InputPin,
{
    type Error = P::Error;

    fn set_direction(&mut self, dir: Direction) -> Result<(), Self::Error> {
        self.direction = dir;
        self.apply()
    }

    fn set_level(&mut self, level: PinState) -> Result<(), Self::Error> {
        self.level = level;
        match self.direction {
            Direction::Output => self.apply(),
            Direction::Input => Ok(()),
        }
    }

    fn level(&mut self) -> Result<PinState, Self::Error> {
        Ok(PinState::from(self.pin.is_high()?))
    }

    fn set_pull_up(&mut self, _enable: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}
