//! Pixel polarity at the controller boundary.
//!
//! Callers set a bit for a black pixel. Most EPD controllers store black as
//! 0 and white as 1 in RAM, so outgoing blocks are inverted on the way out
//! and the caller's buffer keeps its own polarity.

/// Bytes per tile block, one byte per pixel row of 8 pixels.
pub const TILE_BYTES: usize = 8;

pub fn invert_tile(block: &[u8; TILE_BYTES]) -> [u8; TILE_BYTES] {
    let mut out = [0u8; TILE_BYTES];
    for (o, b) in out.iter_mut().zip(block.iter()) {
        *o = !b;
    }
    out
}

/// Convert a block to controller polarity. `black_bit` is the RAM bit value
/// the controller uses for black.
pub fn convert_tile(block: &[u8; TILE_BYTES], black_bit: bool) -> [u8; TILE_BYTES] {
    if black_bit {
        *block
    } else {
        invert_tile(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn inverts_each_byte() {
        let block = [0x00, 0xff, 0x0f, 0xf0, 0xaa, 0x55, 0x01, 0x80];
        assert_eq!(
            invert_tile(&block),
            [0xff, 0x00, 0xf0, 0x0f, 0x55, 0xaa, 0xfe, 0x7f]
        );
    }

    #[test]
    fn black_bit_one_passes_through() {
        let block = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(convert_tile(&block, true), block);
        assert_eq!(convert_tile(&block, false), invert_tile(&block));
    }

    proptest! {
        #[test]
        fn inverting_twice_is_identity(block in any::<[u8; 8]>()) {
            prop_assert_eq!(invert_tile(&invert_tile(&block)), block);
        }
    }
}
