use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use log::trace;

use crate::constants::timing::{CLOCK_HIGH_US, CLOCK_LOW_US, DATA_SETUP_US, LATCH_US};
use crate::{Error, Inversion, Millis, SerialDisplay};

impl<DATA, CLK, DELAY, M, OE, E> SerialDisplay<DATA, CLK, DELAY, M, OE>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    DELAY: DelayNs,
    M: Millis,
    OE: SetDutyCycle,
{
    /// Shifts the whole bank out, MSB first, one byte per display.
    ///
    /// The last display goes first so display 1 ends up in the register next to
    /// the data input. The final bit holds the clock high for [`LATCH_US`], which
    /// shifts it in and latches the outputs. Display-order inversion reverses
    /// which unit fills each slot.
    pub(crate) fn send(&mut self) -> Result<(), Error<E>> {
        let quantity = self.quantity as usize;
        let reversed = self.inversion.contains(Inversion::DISPLAY);
        trace!("send {} displays (reversed: {})", quantity, reversed);

        for slot in (0..quantity).rev() {
            let unit = if reversed { quantity - 1 - slot } else { slot };
            let byte = self.units[unit].wire_byte();
            self.shift_byte(byte, slot == 0)?;
        }

        self.data.set_low()?;
        self.pending = false;
        Ok(())
    }

    fn shift_byte(&mut self, byte: u8, last: bool) -> Result<(), Error<E>> {
        for bit in (0..8).rev() {
            self.data
                .set_state(PinState::from(byte & (1 << bit) != 0))?;
            self.delay.delay_us(DATA_SETUP_US);

            self.clock.set_high()?;
            let high = if last && bit == 0 {
                LATCH_US
            } else {
                CLOCK_HIGH_US
            };
            self.delay.delay_us(high);

            self.clock.set_low()?;
            self.delay.delay_us(CLOCK_LOW_US);
        }
        Ok(())
    }
}
