//! Show a few message pairs on a LCD1602 with a PCF8574 backpack, from a RP2040
//!
//! The backpack is driven on 2 plain GPIOs, no I2C peripheral involved.

//! Wiring diagram
//!
//! PCF8574 backpack <-> RP2040
//!              GND <-> GND
//!              VCC <-> VBUS (5V)
//!              SDA <-> GPIO4
//!              SCL <-> GPIO5
//!
//! Most backpacks carry 4.7 kOhm pull-ups on SDA and SCL, internal pull-ups are enabled anyway.

#![no_std]
#![no_main]

use core::convert::Infallible;

use embassy_executor::Spawner;
use embassy_rp::gpio::{Flex, Level, Pull};
use embassy_time::{Delay, Timer};
use embedded_hal::digital::PinState;
use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};

use lcd1602_softi2c::{
    bus::{BusPin, Direction},
    lcd::{centered_column, Config, Lcd},
};

const MESSAGES: [&str; 10] = [
    "RP2040 by",
    "Raspberry Pi",
    "A brand new",
    "microcontroller",
    "Twin core M0",
    "Full C SDK",
    "More power in",
    "your product",
    "More beans",
    "than Heinz!",
];

/// A RP2040 GPIO as one bus line, direction is switched at runtime
struct FlexLine<'d>(Flex<'d>);

impl BusPin for FlexLine<'_> {
    type Error = Infallible;

    fn set_direction(&mut self, dir: Direction) -> Result<(), Self::Error> {
        match dir {
            Direction::Input => self.0.set_as_input(),
            Direction::Output => self.0.set_as_output(),
        }
        Ok(())
    }

    fn set_level(&mut self, level: PinState) -> Result<(), Self::Error> {
        let level = match level {
            PinState::Low => Level::Low,
            PinState::High => Level::High,
        };
        self.0.set_level(level);
        Ok(())
    }

    fn level(&mut self) -> Result<PinState, Self::Error> {
        Ok(PinState::from(self.0.is_high()))
    }

    fn set_pull_up(&mut self, enable: bool) -> Result<(), Self::Error> {
        self.0.set_pull(if enable { Pull::Up } else { Pull::None });
        Ok(())
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    rtt_init_print!();

    let p = embassy_rp::init(Default::default());

    let sda = FlexLine(Flex::new(p.PIN_4));
    let scl = FlexLine(Flex::new(p.PIN_5));

    let mut lcd = Lcd::new(scl, sda, Delay, Config::default()).expect("Cannot init LCD1602");

    match lcd.last_ack() {
        Some(transfer) if transfer.is_acknowledged() => rprintln!("LCD1602 ready"),
        _ => rprintln!("no answer from address {:#x}", lcd.get_config().get_address()),
    }

    loop {
        for pair in MESSAGES.chunks(2) {
            for (line, message) in pair.iter().enumerate() {
                let column = centered_column(message.len());
                if lcd.write_str_to_pos(message, line as u8, column).is_err() {
                    rprintln!("cannot show \"{}\"", message);
                }
            }

            Timer::after_secs(2).await;

            if lcd.clean_display().is_err() {
                rprintln!("cannot clear display");
            }
        }
    }
}
