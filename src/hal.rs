use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

/// Free-running millisecond counter, e.g. a SysTick or timer peripheral.
///
/// The counter may wrap; blink deadlines are compared with wrapping arithmetic.
pub trait Millis {
    fn millis(&mut self) -> u32;
}

impl<T: Millis + ?Sized> Millis for &mut T {
    fn millis(&mut self) -> u32 {
        T::millis(self)
    }
}

/// Placeholder brightness line for drivers built without one.
///
/// Uninhabited, so a driver of this type never holds a pin.
#[derive(Debug)]
pub enum NoBrightness {}

impl ErrorType for NoBrightness {
    type Error = Infallible;
}

impl SetDutyCycle for NoBrightness {
    fn max_duty_cycle(&self) -> u16 {
        match *self {}
    }

    fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> {
        match *self {}
    }
}
