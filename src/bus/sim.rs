//! A simulated open-drain wire for tests
//!
//! Both [`SimPin`]s and [`SimDelay`] share one [`Wire`]. Every change of a line level is
//! recorded with the virtual time accumulated by the delays, and the recording can be
//! decoded back into bus events.

use core::convert::Infallible;
use std::{cell::RefCell, rc::Rc, vec::Vec};

use embedded_hal::{delay::DelayNs, digital::PinState};

use super::{BusPin, Direction};

/// Line levels at a point in time, `true` is high
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sample {
    pub(crate) at_ns: u64,
    pub(crate) scl: bool,
    pub(crate) sda: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BusEvent {
    Start,
    Byte(u8),
    Stop,
}

#[derive(Clone, Copy)]
enum Role {
    Scl,
    Sda,
}

struct WireState {
    scl_low: bool,
    sda_low: bool,
    device_ack: bool,
    now_ns: u64,
    trace: Vec<Sample>,
}

#[derive(Clone)]
pub(crate) struct Wire(Rc<RefCell<WireState>>);

impl Wire {
    pub(crate) fn new() -> Self {
        let state = WireState {
            scl_low: false,
            sda_low: false,
            device_ack: true,
            now_ns: 0,
            trace: std::vec![Sample {
                at_ns: 0,
                scl: true,
                sda: true,
            }],
        };
        Self(Rc::new(RefCell::new(state)))
    }

    /// `(scl, sda)`
    pub(crate) fn pins(&self) -> (SimPin, SimPin) {
        (SimPin::new(self.clone(), Role::Scl), SimPin::new(self.clone(), Role::Sda))
    }

    pub(crate) fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    /// Whether the simulated device pulls data low when it's sampled
    pub(crate) fn set_device_ack(&self, ack: bool) {
        self.0.borrow_mut().device_ack = ack;
    }

    pub(crate) fn now_ns(&self) -> u64 {
        self.0.borrow().now_ns
    }

    /// `(scl, sda)`, `true` is high
    pub(crate) fn levels(&self) -> (bool, bool) {
        let state = self.0.borrow();
        (!state.scl_low, !state.sda_low)
    }

    pub(crate) fn trace(&self) -> Vec<Sample> {
        self.0.borrow().trace.clone()
    }

    pub(crate) fn clear_trace(&self) {
        let mut state = self.0.borrow_mut();
        let last = Sample {
            at_ns: state.now_ns,
            scl: !state.scl_low,
            sda: !state.sda_low,
        };
        state.trace.clear();
        state.trace.push(last);
    }

    /// Decode the recording: data falling while clock is high is a START, data rising while
    /// clock is high is a STOP, every clock rising edge samples one bit, 8 bits make a byte and
    /// the 9th is the acknowledgment slot.
    pub(crate) fn events(&self) -> Vec<BusEvent> {
        let trace = self.trace();
        let mut events = Vec::new();
        let mut bits: u8 = 0;
        let mut count = 0;

        for pair in trace.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);

            if prev.scl && cur.scl {
                if prev.sda && !cur.sda {
                    events.push(BusEvent::Start);
                    bits = 0;
                    count = 0;
                } else if !prev.sda && cur.sda {
                    events.push(BusEvent::Stop);
                    bits = 0;
                    count = 0;
                }
            } else if !prev.scl && cur.scl {
                count += 1;
                if count <= 8 {
                    bits = (bits << 1) | cur.sda as u8;
                }
                if count == 8 {
                    events.push(BusEvent::Byte(bits));
                }
                if count == 9 {
                    bits = 0;
                    count = 0;
                }
            }
        }

        events
    }

    /// Decode the recording as a list of `(address, payload)` single byte write transactions,
    /// panics if anything else is on the wire
    pub(crate) fn writes(&self) -> Vec<(u8, u8)> {
        let events = self.events();

        assert!(
            events.len() % 4 == 0,
            "bus events are not whole transactions: {:?}",
            events
        );

        events
            .chunks(4)
            .map(|frame| match *frame {
                [BusEvent::Start, BusEvent::Byte(addr), BusEvent::Byte(payload), BusEvent::Stop] => {
                    assert_eq!(addr & 1, 0, "not a write transaction");
                    (addr >> 1, payload)
                }
                _ => panic!("malformed transaction: {:?}", frame),
            })
            .collect()
    }

    fn drive(&self, role: Role, low: bool) {
        let mut state = self.0.borrow_mut();
        match role {
            Role::Scl => state.scl_low = low,
            Role::Sda => state.sda_low = low,
        }

        let sample = Sample {
            at_ns: state.now_ns,
            scl: !state.scl_low,
            sda: !state.sda_low,
        };
        let last = *state.trace.last().unwrap();
        if (last.scl, last.sda) != (sample.scl, sample.sda) {
            state.trace.push(sample);
        }
    }
}

pub(crate) struct SimPin {
    wire: Wire,
    role: Role,
    direction: Direction,
    level: PinState,
}

impl SimPin {
    fn new(wire: Wire, role: Role) -> Self {
        Self {
            wire,
            role,
            direction: Direction::Input,
            level: PinState::High,
        }
    }

    fn update(&self) {
        let low = self.direction == Direction::Output && self.level == PinState::Low;
        self.wire.drive(self.role, low);
    }
}

impl BusPin for SimPin {
    type Error = Infallible;

    fn set_direction(&mut self, dir: Direction) -> Result<(), Self::Error> {
        self.direction = dir;
        self.update();
        Ok(())
    }

    fn set_level(&mut self, level: PinState) -> Result<(), Self::Error> {
        self.level = level;
        self.update();
        Ok(())
    }

    fn level(&mut self) -> Result<PinState, Self::Error> {
        let state = self.wire.0.borrow();
        let high = match self.role {
            Role::Scl => !state.scl_low,
            Role::Sda => !state.sda_low && !state.device_ack,
        };
        Ok(PinState::from(high))
    }

    fn set_pull_up(&mut self, _enable: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub(crate) struct SimDelay(Wire);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0 .0.borrow_mut().now_ns += ns as u64;
    }
}
