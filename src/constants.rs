pub const MAX_DISPLAYS: u8 = 10;

// segment wiring on the shift register outputs
pub const PIN_A: u8 = 0x04;
pub const PIN_B: u8 = 0x02;
pub const PIN_C: u8 = 0x40;
pub const PIN_D: u8 = 0x20;
pub const PIN_E: u8 = 0x10;
pub const PIN_F: u8 = 0x01;
pub const PIN_G: u8 = 0x80;
pub const PIN_P: u8 = 0x08;

pub const CHAR_0: u8 = PIN_A | PIN_B | PIN_C | PIN_D | PIN_E | PIN_F;
pub const CHAR_1: u8 = PIN_B | PIN_C;
pub const CHAR_2: u8 = PIN_A | PIN_B | PIN_D | PIN_E | PIN_G;
pub const CHAR_3: u8 = PIN_A | PIN_B | PIN_C | PIN_D | PIN_G;
pub const CHAR_4: u8 = PIN_B | PIN_C | PIN_F | PIN_G;
pub const CHAR_5: u8 = PIN_A | PIN_C | PIN_D | PIN_F | PIN_G;
pub const CHAR_6: u8 = PIN_A | PIN_C | PIN_D | PIN_E | PIN_F | PIN_G;
pub const CHAR_7: u8 = PIN_A | PIN_B | PIN_C;
pub const CHAR_8: u8 = PIN_A | PIN_B | PIN_C | PIN_D | PIN_E | PIN_F | PIN_G;
pub const CHAR_9: u8 = PIN_A | PIN_B | PIN_C | PIN_F | PIN_G;
pub const CHAR_A: u8 = PIN_A | PIN_B | PIN_C | PIN_E | PIN_F | PIN_G;
pub const CHAR_B: u8 = PIN_C | PIN_D | PIN_E | PIN_F | PIN_G;
pub const CHAR_C: u8 = PIN_A | PIN_D | PIN_E | PIN_F;
pub const CHAR_D: u8 = PIN_B | PIN_C | PIN_D | PIN_E | PIN_G;
pub const CHAR_E: u8 = PIN_A | PIN_D | PIN_E | PIN_F | PIN_G;
pub const CHAR_F: u8 = PIN_A | PIN_E | PIN_F | PIN_G;
pub const CHAR_SEPARATOR: u8 = PIN_G;

pub const DIGITS: [u8; 16] = [
    CHAR_0, CHAR_1, CHAR_2, CHAR_3, CHAR_4, CHAR_5, CHAR_6, CHAR_7, CHAR_8, CHAR_9, CHAR_A, CHAR_B,
    CHAR_C, CHAR_D, CHAR_E, CHAR_F,
];

pub mod timing {
    pub const DATA_SETUP_US: u32 = 5; // data line stable before the rising clock edge
    pub const CLOCK_HIGH_US: u32 = 5;
    pub const CLOCK_LOW_US: u32 = 20;
    pub const LATCH_US: u32 = 1100; // long clock pulse on the final bit commits the outputs
}

/// Looks up the segment mask for a printable character.
///
/// Accepts `'0'..='9'`, hex letters in either case, the separator `'-'`
/// and the raw digit values `'\u{0}'..='\u{9}'`.
pub fn glyph(c: char) -> Option<u8> {
    match c {
        '\u{0}'..='\u{9}' => Some(DIGITS[c as usize]),
        '0'..='9' | 'a'..='f' | 'A'..='F' => c.to_digit(16).map(|d| DIGITS[d as usize]),
        '-' => Some(CHAR_SEPARATOR),
        _ => None,
    }
}

/// Flips a mask top to bottom: A<->D, B<->E, C<->F. G and P stay put.
pub const fn invert_char(mask: u8) -> u8 {
    const SWAPS: [(u8, u8); 3] = [(PIN_A, PIN_D), (PIN_B, PIN_E), (PIN_C, PIN_F)];

    let mut out = mask & (PIN_G | PIN_P);
    let mut i = 0;
    while i < SWAPS.len() {
        let (top, bottom) = SWAPS[i];
        if mask & top != 0 {
            out |= bottom;
        }
        if mask & bottom != 0 {
            out |= top;
        }
        i += 1;
    }
    out
}
