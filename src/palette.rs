//! The standard Macintosh system color palettes used by the classic 1-, 4-
//! and 8-bit icon types.

/// The 1-bit palette: white, then black.
pub const PALETTE_1BIT: [[u8; 3]; 2] = [[0xff, 0xff, 0xff], [0x00, 0x00, 0x00]];

/// The 16-color palette.
pub const PALETTE_4BIT: [[u8; 3]; 16] = [
    [0xff, 0xff, 0xff],
    [0xfc, 0xf3, 0x05],
    [0xff, 0x64, 0x02],
    [0xdd, 0x08, 0x06],
    [0xf2, 0x08, 0x84],
    [0x46, 0x00, 0xa5],
    [0x00, 0x00, 0xd4],
    [0x02, 0xab, 0xea],
    [0x1f, 0xb7, 0x14],
    [0x00, 0x64, 0x11],
    [0x56, 0x2c, 0x05],
    [0x90, 0x71, 0x3a],
    [0xc0, 0xc0, 0xc0],
    [0x80, 0x80, 0x80],
    [0x40, 0x40, 0x40],
    [0x00, 0x00, 0x00],
];

/// The 256-color palette: a 6x6x6 color cube (minus black), then ten-step
/// ramps of red, green, blue and gray, then black.
pub const PALETTE_8BIT: [[u8; 3]; 256] = build_palette_8bit();

const CUBE_LEVELS: [u8; 6] = [0xff, 0xcc, 0x99, 0x66, 0x33, 0x00];
const RAMP_LEVELS: [u8; 10] =
    [0xee, 0xdd, 0xbb, 0xaa, 0x88, 0x77, 0x55, 0x44, 0x22, 0x11];

const fn build_palette_8bit() -> [[u8; 3]; 256] {
    let mut palette = [[0u8; 3]; 256];
    let mut index = 0;
    // The last cube entry would be black, which instead ends the table.
    while index < 215 {
        palette[index] = [CUBE_LEVELS[index / 36],
                          CUBE_LEVELS[(index / 6) % 6],
                          CUBE_LEVELS[index % 6]];
        index += 1;
    }
    let mut channel = 0;
    while channel < 4 {
        let mut step = 0;
        while step < RAMP_LEVELS.len() {
            let level = RAMP_LEVELS[step];
            palette[index] = match channel {
                0 => [level, 0, 0],
                1 => [0, level, 0],
                2 => [0, 0, level],
                _ => [level, level, level],
            };
            index += 1;
            step += 1;
        }
        channel += 1;
    }
    palette[index] = [0, 0, 0];
    palette
}

/// Returns the palette for the given bit depth (1, 4 or 8), if any.
pub fn for_depth(bits_per_pixel: u32) -> Option<&'static [[u8; 3]]> {
    match bits_per_pixel {
        1 => Some(&PALETTE_1BIT),
        4 => Some(&PALETTE_4BIT),
        8 => Some(&PALETTE_8BIT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_8bit_layout() {
        assert_eq!(PALETTE_8BIT[0], [0xff, 0xff, 0xff]);
        assert_eq!(PALETTE_8BIT[1], [0xff, 0xff, 0xcc]);
        assert_eq!(PALETTE_8BIT[214], [0x00, 0x00, 0x33]);
        assert_eq!(PALETTE_8BIT[215], [0xee, 0x00, 0x00]);
        assert_eq!(PALETTE_8BIT[225], [0x00, 0xee, 0x00]);
        assert_eq!(PALETTE_8BIT[235], [0x00, 0x00, 0xee]);
        assert_eq!(PALETTE_8BIT[245], [0xee, 0xee, 0xee]);
        assert_eq!(PALETTE_8BIT[254], [0x11, 0x11, 0x11]);
        assert_eq!(PALETTE_8BIT[255], [0x00, 0x00, 0x00]);
    }

    #[test]
    fn palette_for_depth() {
        assert_eq!(for_depth(1).map(|p| p.len()), Some(2));
        assert_eq!(for_depth(4).map(|p| p.len()), Some(16));
        assert_eq!(for_depth(8).map(|p| p.len()), Some(256));
        assert!(for_depth(24).is_none());
    }
}
