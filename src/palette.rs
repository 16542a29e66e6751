//! CMAP to VGA palette conversion.
//!
//! A CMAP holds 8-bit red, green, blue triples in index order. The VGA DAC
//! takes 6 bits per channel, so every byte is shifted right by two. Channel
//! order and count are preserved.

use crate::error::IffError;

/// Convert raw CMAP bytes into 6-bit-per-channel palette bytes.
///
/// Writes exactly `src.len()` bytes to the front of `dst` and returns that
/// count. The rest of `dst` is left untouched, so a short CMAP leaves the
/// caller's remaining entries as they were.
pub fn cmap_to_vga(src: &[u8], dst: &mut [u8]) -> Result<usize, IffError> {
    let actual = dst.len();
    let out = dst.get_mut(..src.len()).ok_or(IffError::BufferTooSmall {
        needed: src.len(),
        actual,
    })?;
    for (o, &c) in out.iter_mut().zip(src) {
        *o = c >> 2;
    }
    Ok(src.len())
}

/// Expand a 6-bit VGA palette back to 8 bits per channel.
///
/// The low two bits are restored from the high bits so that 63 maps to 255.
pub fn vga_to_rgb(src: &[u8], dst: &mut [u8]) -> Result<usize, IffError> {
    let actual = dst.len();
    let out = dst.get_mut(..src.len()).ok_or(IffError::BufferTooSmall {
        needed: src.len(),
        actual,
    })?;
    for (o, &c) in out.iter_mut().zip(src) {
        let c = c & 0x3F;
        *o = (c << 2) | (c >> 4);
    }
    Ok(src.len())
}
