//! Error type of this crate

/// Errors that can occur when driving the LCD
///
/// A missing acknowledgment on the bus is not an error,
/// see [`Lcd::last_ack()`](crate::lcd::Lcd::last_ack) for a way to check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// A GPIO operation on the clock or data line failed
    Pin(E),
    /// Line index is out of the display
    LineOutOfRange,
    /// Column index is out of the display
    ColumnOutOfRange,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Error::Pin(err)
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Pin(_e) => defmt::write!(fmt, "GPIO error"),
            Error::LineOutOfRange => defmt::write!(fmt, "Line out of range"),
            Error::ColumnOutOfRange => defmt::write!(fmt, "Column out of range"),
        }
    }
}
