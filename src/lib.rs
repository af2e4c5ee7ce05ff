/*!
# LCD 1602 Driver, on a bit-banged I2C bus

Drive a 16x2 character LCD with a PCF8574 I2C adapter board,
using two plain GPIOs as the I2C bus, no I2C peripheral needed.

Basic Usage:

1. Get 2 GPIOs for the bus <br/>
    They should implement [`bus::BusPin`]: direction, output level, input level and pull-up.
    Pins that are already open-drain outputs can be wrapped in [`bus::OpenDrain`].
<br/>
<br/>
2. Use [`lcd::Lcd::new()`] with a [`lcd::Config`] to create a [`lcd::Lcd`],
    it initializes LCD1602 hardware
<br/>
<br/>
3. use any methods provide by [`lcd::Lcd`] to control LCD1602

```ignore
let mut lcd = Lcd::new(scl, sda, delayer, Config::default())?;

lcd.set_cursor_pos(0, 3)?;
lcd.write_str_to_cur("RP2040 by")?;
lcd.set_cursor_pos(1, 2)?;
lcd.write_str_to_cur("Raspberry Pi")?;
```

Layers, from bottom to top:
* [`bus::SoftI2c`]: START / STOP / byte transfer by toggling GPIOs, and single byte writes
* [`sender::Sender`]: one controller byte as 2 nibbles, each latched with an enable strobe
* [`lcd::Lcd`]: power-on handshake, clear, cursor, text
*/

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod bus;
pub mod command;
mod error;
pub mod lcd;
pub mod sender;
pub mod utils;

pub use error::Error;
