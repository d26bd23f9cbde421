#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use serial_display::{timing, Millis, SerialDisplay};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Data(bool),
    Clock(bool),
    DelayUs(u32),
    DelayMs(u32),
    DelayNs(u32),
    Duty(u16),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub struct Line {
    clock: bool,
    log: Log,
}

impl ErrorType for Line {
    type Error = Infallible;
}

impl OutputPin for Line {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true);
        Ok(())
    }
}

impl Line {
    fn record(&self, level: bool) {
        let event = if self.clock {
            Event::Clock(level)
        } else {
            Event::Data(level)
        };
        self.log.borrow_mut().push(event);
    }
}

pub struct FakeDelay {
    log: Log,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

pub struct FakeClock {
    now: Rc<Cell<u32>>,
}

impl Millis for FakeClock {
    fn millis(&mut self) -> u32 {
        self.now.get()
    }
}

pub struct FakePwm {
    log: Log,
}

impl embedded_hal::pwm::ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Duty(duty));
        Ok(())
    }
}

pub type Display = SerialDisplay<Line, Line, FakeDelay, FakeClock>;

pub struct Rig {
    pub log: Log,
    pub now: Rc<Cell<u32>>,
}

impl Rig {
    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn pwm(&self) -> FakePwm {
        FakePwm {
            log: self.log.clone(),
        }
    }

    /// Every transmission so far, as the byte each display received.
    ///
    /// Bytes are listed by register position: index 0 is the register next to
    /// the data input, which receives the last byte shifted out.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        let events = self.events();
        let mut frames = Vec::new();
        let mut bytes = Vec::new();
        let mut byte = 0u8;
        let mut bits = 0;
        let mut data = false;

        for (i, event) in events.iter().enumerate() {
            match *event {
                Event::Data(level) => data = level,
                Event::Clock(true) => {
                    byte = (byte << 1) | data as u8;
                    bits += 1;
                    if bits == 8 {
                        bytes.push(byte);
                        byte = 0;
                        bits = 0;
                    }
                    if events.get(i + 1) == Some(&Event::DelayUs(timing::LATCH_US)) {
                        bytes.reverse();
                        frames.push(std::mem::take(&mut bytes));
                    }
                }
                _ => {}
            }
        }
        frames
    }

    /// Hold time following every rising clock edge, in order.
    pub fn clock_high_widths(&self) -> Vec<u32> {
        let events = self.events();
        events
            .windows(2)
            .filter_map(|pair| match pair {
                [Event::Clock(true), Event::DelayUs(us)] => Some(*us),
                _ => None,
            })
            .collect()
    }

    pub fn delays_ms(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::DelayMs(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }
}

pub fn display(quantity: u8) -> (Display, Rig) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let now = Rc::new(Cell::new(1_000));

    let display = SerialDisplay::new(
        Line {
            clock: false,
            log: log.clone(),
        },
        Line {
            clock: true,
            log: log.clone(),
        },
        FakeDelay { log: log.clone() },
        FakeClock { now: now.clone() },
        quantity,
    );

    (display, Rig { log, now })
}
