#![no_std]

//! Driver for a daisy-chain of 7-segment displays behind shift registers.
//!
//! Each display sits on its own 8-bit shift register; the registers are chained
//! and fed over a bit-banged data/clock pair, with an optional PWM line on the
//! shared output-enable pin for brightness. The driver keeps the logical state
//! of every display and shifts the whole bank out whenever it changes.
//!
//! Displays are addressed 1-based. Where documented, display `0` addresses the
//! whole bank.

mod animation;
mod blink;
mod constants;
mod hal;
mod send;
mod state;

use core::fmt;
use core::ops::Range;

pub use animation::CascadeDirection;
pub use constants::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::{self, Error as _, SetDutyCycle};
pub use hal::{Millis, NoBrightness};
use log::{debug, warn};
pub use state::{Inversion, Status, Unit};

pub struct SerialDisplay<DATA, CLK, DELAY, M, OE = NoBrightness> {
    data: DATA,
    clock: CLK,
    delay: DELAY,
    millis: M,
    brightness_pin: Option<OE>,
    quantity: u8,
    units: [Unit; MAX_DISPLAYS as usize],
    inversion: Inversion,
    brightness: u8,
    blink_interval: u32,
    next_toggle: Option<u32>,
    pending: bool,
}

impl<DATA, CLK, DELAY, M> SerialDisplay<DATA, CLK, DELAY, M> {
    /// Creates a driver for `quantity` chained displays.
    ///
    /// A quantity of 0 is treated as 1 and anything above [`MAX_DISPLAYS`] is
    /// capped. Nothing is written until [`init`](Self::init).
    pub fn new(data: DATA, clock: CLK, delay: DELAY, millis: M, quantity: u8) -> Self {
        let coerced = quantity.clamp(1, MAX_DISPLAYS);
        if coerced != quantity {
            warn!("display quantity {} coerced to {}", quantity, coerced);
        }

        Self {
            data,
            clock,
            delay,
            millis,
            brightness_pin: None,
            quantity: coerced,
            units: [Unit::default(); MAX_DISPLAYS as usize],
            inversion: Inversion::empty(),
            brightness: u8::MAX,
            blink_interval: 0,
            next_toggle: None,
            pending: false,
        }
    }
}

impl<DATA, CLK, DELAY, M, OE> SerialDisplay<DATA, CLK, DELAY, M, OE> {
    pub fn destroy(self) -> (DATA, CLK, DELAY, M, Option<OE>) {
        (
            self.data,
            self.clock,
            self.delay,
            self.millis,
            self.brightness_pin,
        )
    }

    pub fn quantity(&self) -> u8 {
        self.quantity
    }

    pub fn inversion(&self) -> Inversion {
        self.inversion
    }

    /// Last requested brightness, 0 (dark) to 255 (full).
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// True when the logical state changed since the last transmission.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn units(&self) -> &[Unit] {
        &self.units[..self.quantity as usize]
    }

    /// Stored mask of a display, `None` when out of range.
    pub fn mask(&self, display: u8) -> Option<u8> {
        self.unit(display).map(|unit| unit.mask)
    }

    /// Status of a display, `None` when out of range.
    pub fn status(&self, display: u8) -> Option<Status> {
        self.unit(display).map(|unit| unit.status)
    }

    /// Human-readable dump of the bank, one line per display.
    pub fn info(&self) -> Info<'_> {
        Info {
            units: self.units(),
        }
    }

    fn unit(&self, display: u8) -> Option<&Unit> {
        match display {
            0 => None,
            _ => self.units().get(display as usize - 1),
        }
    }

    fn store(&mut self, index: usize, mask: u8) {
        let mask = if self.inversion.contains(Inversion::CHAR) {
            invert_char(mask)
        } else {
            mask
        };
        let unit = &mut self.units[index];
        unit.mask = mask;
        unit.status.insert(Status::ON);
        self.pending = true;
    }
}

impl<DATA, CLK, DELAY, M, OE, E> SerialDisplay<DATA, CLK, DELAY, M, OE>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    DELAY: DelayNs,
    M: Millis,
    OE: SetDutyCycle,
{
    /// Puts the data and clock lines in their idle (LOW) state.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.data.set_low()?;
        self.clock.set_low()?;
        Ok(())
    }

    /// Assigns a raw segment mask to a display and turns it on.
    ///
    /// With `flush` false the change is only marked pending, see [`write`](Self::write).
    pub fn set(&mut self, mask: u8, display: u8, flush: bool) -> Result<(), Error<E>> {
        let index = self.index(display)?;
        self.store(index, mask);
        if flush {
            self.send()?;
        }
        Ok(())
    }

    /// Drives a single segment. `pin` must be exactly one of the `PIN_*` bits.
    ///
    /// Setting a segment HIGH also turns the display on; clearing one never
    /// turns it off.
    pub fn set_pin(
        &mut self,
        pin: u8,
        level: PinState,
        display: u8,
        flush: bool,
    ) -> Result<(), Error<E>> {
        if pin.count_ones() != 1 {
            return Err(Error::InvalidPin(pin));
        }
        let index = self.index(display)?;

        let unit = &mut self.units[index];
        match level {
            PinState::High => {
                unit.mask |= pin;
                unit.status.insert(Status::ON);
            }
            PinState::Low => unit.mask &= !pin,
        }
        self.pending = true;

        if flush {
            self.send()?;
        }
        Ok(())
    }

    pub fn dot(&mut self, display: u8) -> Result<(), Error<E>> {
        self.set_dot(display, true)
    }

    pub fn clear_dot(&mut self, display: u8) -> Result<(), Error<E>> {
        self.set_dot(display, false)
    }

    fn set_dot(&mut self, display: u8, lit: bool) -> Result<(), Error<E>> {
        let index = self.index(display)?;

        let unit = &mut self.units[index];
        if lit {
            unit.mask |= PIN_P;
        } else {
            unit.mask &= !PIN_P;
        }
        unit.status.insert(Status::ON);
        self.pending = true;
        self.send()
    }

    /// Turns a display on, or every display when `display` is 0.
    pub fn on(&mut self, display: u8) -> Result<(), Error<E>> {
        self.set_power(display, true)
    }

    /// Turns a display off, or every display when `display` is 0. Masks are kept.
    pub fn off(&mut self, display: u8) -> Result<(), Error<E>> {
        self.set_power(display, false)
    }

    fn set_power(&mut self, display: u8, on: bool) -> Result<(), Error<E>> {
        let targets = self.targets(display)?;
        for unit in &mut self.units[targets] {
            unit.status.set(Status::ON, on);
        }
        self.pending = true;
        self.send()
    }

    /// Installs a new inversion mode.
    ///
    /// Nothing is transmitted; the change shows with the next write. Character
    /// inversion only affects masks assigned from now on.
    pub fn set_inversion(&mut self, mode: Inversion) {
        if mode != self.inversion {
            debug!("inversion {:#04x} -> {:#04x}", self.inversion.bits(), mode.bits());
            self.inversion = mode;
            self.pending = true;
        }
    }

    /// Sets the brightness, 0 (dark) to 255 (full).
    ///
    /// The enable line is active LOW, so the duty cycle driven is the inverse of
    /// `value`. Without a brightness line the value is only recorded.
    pub fn set_brightness(&mut self, value: u8) -> Result<(), Error<E>> {
        self.brightness = value;
        let duty = u8::MAX - value;

        if let Some(pin) = self.brightness_pin.as_mut() {
            debug!("brightness {} (duty {})", value, duty);
            let result = match duty {
                0 => pin.set_duty_cycle_fully_off(),
                u8::MAX => pin.set_duty_cycle_fully_on(),
                _ => pin.set_duty_cycle_fraction(duty as u16, u8::MAX as u16),
            };
            result.map_err(|e| Error::Brightness(e.kind()))?;
        }
        Ok(())
    }

    /// Transmits the bank if anything changed since the last transmission.
    pub fn write(&mut self) -> Result<(), Error<E>> {
        if self.pending {
            self.send()?;
        }
        Ok(())
    }

    // 1-based display to array index; 0 is never valid here
    fn index(&self, display: u8) -> Result<usize, Error<E>> {
        if display == 0 || display > self.quantity {
            return Err(Error::InvalidDisplay(display));
        }
        Ok(display as usize - 1)
    }

    // like `index`, but 0 selects the whole bank
    fn targets(&self, display: u8) -> Result<Range<usize>, Error<E>> {
        match display {
            0 => Ok(0..self.quantity as usize),
            _ => self.index(display).map(|i| i..i + 1),
        }
    }
}

impl<DATA, CLK, DELAY, M, E> SerialDisplay<DATA, CLK, DELAY, M, NoBrightness>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    DELAY: DelayNs,
    M: Millis,
{
    /// Attaches a PWM line on the registers' output-enable pin and sets full brightness.
    pub fn with_brightness_pin<P>(
        self,
        pin: P,
    ) -> Result<SerialDisplay<DATA, CLK, DELAY, M, P>, Error<E>>
    where
        P: SetDutyCycle,
    {
        let mut display = SerialDisplay {
            data: self.data,
            clock: self.clock,
            delay: self.delay,
            millis: self.millis,
            brightness_pin: Some(pin),
            quantity: self.quantity,
            units: self.units,
            inversion: self.inversion,
            brightness: self.brightness,
            blink_interval: self.blink_interval,
            next_toggle: self.next_toggle,
            pending: self.pending,
        };
        display.set_brightness(u8::MAX)?;
        Ok(display)
    }
}

pub struct Info<'a> {
    units: &'a [Unit],
}

impl fmt::Display for Info<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Qty:{}", self.units.len())?;
        for (i, unit) in self.units.iter().enumerate() {
            writeln!(
                f,
                "[{}] - D:{:#04x} : S:{:#04x}",
                i + 1,
                unit.mask,
                unit.status.bits()
            )?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    Pin(E),
    Brightness(pwm::ErrorKind),
    InvalidDisplay(u8),
    InvalidPin(u8),
    InvalidParameter,
    InvalidCharacter(char),
    InvalidValue,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::Pin(error)
    }
}
