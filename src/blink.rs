use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::{Error, Millis, SerialDisplay, Status};

impl<DATA, CLK, DELAY, M, OE, E> SerialDisplay<DATA, CLK, DELAY, M, OE>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    DELAY: DelayNs,
    M: Millis,
    OE: SetDutyCycle,
{
    /// Starts blinking with `interval_ms`, or stops when `interval_ms` is 0.
    pub fn blink(&mut self, interval_ms: u32, display: u8) -> Result<(), Error<E>> {
        match interval_ms {
            0 => self.stop_blink(display),
            _ => self.start_blink(interval_ms, display),
        }
    }

    /// Marks a display (or all with 0) as blinking and arms the schedule.
    ///
    /// All blinking displays share one interval; the latest call wins.
    pub fn start_blink(&mut self, interval_ms: u32, display: u8) -> Result<(), Error<E>> {
        if interval_ms == 0 {
            return Err(Error::InvalidParameter);
        }
        let targets = self.targets(display)?;
        for unit in &mut self.units[targets] {
            unit.status.insert(Status::BLINK);
        }

        self.blink_interval = interval_ms;
        let due = self.millis.millis().wrapping_add(interval_ms);
        self.next_toggle = Some(due);
        debug!("blink armed every {} ms, next at {}", interval_ms, due);
        Ok(())
    }

    /// Stops blinking a display (or all with 0) and disarms the schedule for
    /// the whole bank.
    ///
    /// Displays keep whatever ON state the last toggle left them in.
    pub fn stop_blink(&mut self, display: u8) -> Result<(), Error<E>> {
        let targets = self.targets(display)?;
        for unit in &mut self.units[targets] {
            unit.status.remove(Status::BLINK);
        }

        self.next_toggle = None;
        debug!("blink disarmed");
        Ok(())
    }

    pub fn is_blink_armed(&self) -> bool {
        self.next_toggle.is_some()
    }

    /// Advances time based effects. Call this from the main loop.
    ///
    /// Once the blink deadline has passed every blinking display flips its ON
    /// state, the bank is sent once, and the next deadline is scheduled.
    /// Displays that are not blinking are left alone.
    pub fn tick(&mut self) -> Result<(), Error<E>> {
        let Some(due) = self.next_toggle else {
            return Ok(());
        };
        let now = self.millis.millis();
        // wrapping difference, negative while the deadline is still ahead
        if (now.wrapping_sub(due) as i32) < 0 {
            return Ok(());
        }

        let quantity = self.quantity as usize;
        for unit in self.units[..quantity]
            .iter_mut()
            .filter(|unit| unit.status.is_blinking())
        {
            unit.status.toggle(Status::ON);
        }
        self.send()?;

        self.next_toggle = Some(now.wrapping_add(self.blink_interval));
        Ok(())
    }
}
