use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::debug;
use num_traits::ToPrimitive;

use crate::constants::*;
use crate::{Error, Millis, SerialDisplay, Status};

/// Which way a character grows during [`SerialDisplay::cascade`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CascadeDirection {
    /// Bottom segments first.
    Up,
    /// Top segments first.
    Down,
}

impl CascadeDirection {
    // segments revealed at each step, accumulated
    fn steps(self) -> [u8; 5] {
        match self {
            CascadeDirection::Up => [
                PIN_D | PIN_P,
                PIN_C | PIN_E,
                PIN_G,
                PIN_B | PIN_F,
                PIN_A,
            ],
            CascadeDirection::Down => [
                PIN_A,
                PIN_B | PIN_F,
                PIN_G,
                PIN_C | PIN_E,
                PIN_D | PIN_P,
            ],
        }
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
    /// Redraws every display segment group by segment group, waiting
    /// `interval_ms` between frames. Ends on the masks shown before the call.
    pub fn cascade(&mut self, direction: CascadeDirection, interval_ms: u32) -> Result<(), Error<E>> {
        let quantity = self.quantity as usize;
        let mut captured = [0u8; MAX_DISPLAYS as usize];
        for (saved, unit) in captured.iter_mut().zip(self.units()) {
            *saved = unit.mask;
        }

        let mut reveal = 0;
        for step in direction.steps() {
            reveal |= step;
            for (unit, saved) in self.units[..quantity].iter_mut().zip(captured) {
                unit.mask = saved & reveal;
            }
            self.send()?;
            self.delay.delay_ms(interval_ms);
        }
        Ok(())
    }

    /// Scrolls `sequence` in from the last display towards the first, one
    /// position every `interval_ms`, until it has left the bank entirely.
    pub fn scroll(&mut self, sequence: &[u8], interval_ms: u32) -> Result<(), Error<E>> {
        if sequence.is_empty() || interval_ms == 0 {
            return Err(Error::InvalidParameter);
        }

        let quantity = self.quantity as usize;
        for unit in &mut self.units[..quantity] {
            unit.mask = 0;
            unit.status = Status::ON;
        }

        let mut pending = sequence.iter().copied();
        for _ in 0..sequence.len() + quantity {
            self.units.copy_within(1..quantity, 0);
            self.units[quantity - 1].mask = pending.next().unwrap_or(0);
            self.send()?;
            self.delay.delay_ms(interval_ms);
        }
        Ok(())
    }

    /// Prints a non-negative integer right-aligned in decimal.
    ///
    /// Digits that do not fit are dropped from the left. Displays left of the
    /// number are blanked, keeping their decimal point.
    pub fn print_number<T>(&mut self, number: T) -> Result<(), Error<E>>
    where
        T: ToPrimitive,
    {
        let mut num = number.to_u64().ok_or(Error::InvalidValue)?;
        debug!("print {}", num);

        for index in (0..self.quantity as usize).rev() {
            let dot = self.units[index].mask & PIN_P;
            let is_last = index + 1 == self.quantity as usize;
            if num == 0 && !is_last {
                let unit = &mut self.units[index];
                unit.mask = dot;
                unit.status.insert(Status::ON);
                self.pending = true;
            } else {
                self.store(index, DIGITS[(num % 10) as usize] | dot);
                num /= 10;
            }
        }
        self.send()
    }

    /// Prints one character on a display, keeping its decimal point.
    ///
    /// See [`glyph`] for the accepted characters.
    pub fn print_char(&mut self, c: char, display: u8, flush: bool) -> Result<(), Error<E>> {
        let index = self.index(display)?;
        let mask = glyph(c).ok_or(Error::InvalidCharacter(c))?;
        let dot = self.units[index].mask & PIN_P;

        self.store(index, mask | dot);
        if flush {
            self.send()?;
        }
        Ok(())
    }
}
