use bitflags::bitflags;

bitflags! {
    /// Per-unit status. Never transmitted, only gates what the unit shows.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Status: u8 {
        const ON = 0x01;
        const BLINK = 0x10;
    }

    /// Bank-wide rendering transforms.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Inversion: u8 {
        /// Flip characters top to bottom when a mask is assigned.
        const CHAR = 0x01;
        /// Reverse the order units are clocked out.
        const DISPLAY = 0x02;
        const BOTH = Self::CHAR.bits() | Self::DISPLAY.bits();
    }
}

impl Status {
    pub fn is_on(&self) -> bool {
        self.contains(Status::ON)
    }

    pub fn is_blinking(&self) -> bool {
        self.contains(Status::BLINK)
    }
}

/// One display in the chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unit {
    pub mask: u8,
    pub status: Status,
}

impl Unit {
    /// The byte clocked out for this unit: its mask while ON, blank otherwise.
    pub fn wire_byte(&self) -> u8 {
        if self.status.is_on() {
            self.mask
        } else {
            0
        }
    }
}
