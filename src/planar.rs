//! Interleaved bitplane <-> chunky (byte per pixel) conversion.
//!
//! An ILBM row stores `planes` slices of `width / 8` bytes each, plane 0
//! first. Bit 7 of a plane byte is the leftmost of its eight pixels, and
//! plane `b` supplies bit `b` of the pixel's colour index.

use crate::error::IffError;

fn check_sizes(
    width: usize,
    height: usize,
    planes: u8,
    planar: usize,
    chunky: usize,
) -> Result<(usize, usize), IffError> {
    if width % 8 != 0 {
        return Err(IffError::UnsupportedFeature(alloc::format!(
            "width {width} is not a multiple of 8"
        )));
    }
    if planes > 8 {
        return Err(IffError::UnsupportedFeature(alloc::format!(
            "{planes} bitplanes (at most 8)"
        )));
    }
    let dims_err = || IffError::DimensionsTooLarge {
        width: width as u32,
        height: height as u32,
    };
    let planar_needed = (width / 8)
        .checked_mul(usize::from(planes))
        .and_then(|r| r.checked_mul(height))
        .ok_or_else(dims_err)?;
    let chunky_needed = width.checked_mul(height).ok_or_else(dims_err)?;
    if planar < planar_needed {
        return Err(IffError::BufferTooSmall {
            needed: planar_needed,
            actual: planar,
        });
    }
    if chunky < chunky_needed {
        return Err(IffError::BufferTooSmall {
            needed: chunky_needed,
            actual: chunky,
        });
    }
    Ok((planar_needed, chunky_needed))
}

/// Convert `height` interleaved-bitplane rows in `src` into chunky pixels.
///
/// Writes `width * height` bytes to `dst`. With zero planes every pixel is 0.
pub fn planar_to_chunky(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    planes: u8,
) -> Result<(), IffError> {
    let (planar_len, chunky_len) = check_sizes(width, height, planes, src.len(), dst.len())?;
    let dst = &mut dst[..chunky_len];
    let row_bytes = width / 8;
    let planes = usize::from(planes);
    if planes == 0 || row_bytes == 0 {
        dst.fill(0);
        return Ok(());
    }

    let mut bytes = [0u8; 8];
    for (src_row, dst_row) in src[..planar_len]
        .chunks_exact(row_bytes * planes)
        .zip(dst.chunks_exact_mut(width))
    {
        for (j, pixels) in dst_row.chunks_exact_mut(8).enumerate() {
            for (bplane, byte) in bytes[..planes].iter_mut().enumerate() {
                *byte = src_row[bplane * row_bytes + j];
            }

            // Roll the top bit out of every plane to build each pixel.
            for pixel in pixels.iter_mut() {
                let mut value = 0u8;
                for byte in bytes[..planes].iter_mut().rev() {
                    value = (value << 1) | (*byte >> 7);
                    *byte <<= 1;
                }
                *pixel = value;
            }
        }
    }
    Ok(())
}

/// Split chunky pixels into interleaved bitplane rows.
///
/// Bits of a pixel at or above `planes` are dropped.
pub fn chunky_to_planar(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    planes: u8,
) -> Result<(), IffError> {
    let (planar_len, chunky_len) = check_sizes(width, height, planes, dst.len(), src.len())?;
    let row_bytes = width / 8;
    let planes = usize::from(planes);
    if planes == 0 || row_bytes == 0 {
        return Ok(());
    }

    for (src_row, dst_row) in src[..chunky_len]
        .chunks_exact(width)
        .zip(dst[..planar_len].chunks_exact_mut(row_bytes * planes))
    {
        for (j, pixels) in src_row.chunks_exact(8).enumerate() {
            for bplane in 0..planes {
                let mut byte = 0u8;
                for &p in pixels {
                    byte = (byte << 1) | ((p >> bplane) & 1);
                }
                dst_row[bplane * row_bytes + j] = byte;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn single_byte_group() {
        // Two planes, one row of 8 pixels.
        let src = [0b1010_0000, 0b1100_0000];
        let mut dst = [0xFFu8; 8];
        planar_to_chunky(&src, &mut dst, 8, 1, 2).unwrap();
        assert_eq!(dst, [3, 2, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn plane_zero_is_least_significant() {
        let mut src = [0u8; 8];
        for (plane, byte) in src.iter_mut().enumerate() {
            // Pixel `plane` gets only bit `plane` set.
            *byte = 0x80 >> plane;
        }
        let mut dst = [0u8; 8];
        planar_to_chunky(&src, &mut dst, 8, 1, 8).unwrap();
        assert_eq!(dst, [1, 2, 4, 8, 16, 32, 64, 128]);
    }

    #[test]
    fn rows_advance_by_all_planes() {
        // 16x2, 2 planes: row 0 is colour 1 everywhere, row 1 colour 2.
        let src = [0xFF, 0xFF, 0, 0, 0, 0, 0xFF, 0xFF];
        let mut dst = [0u8; 32];
        planar_to_chunky(&src, &mut dst, 16, 2, 2).unwrap();
        assert!(dst[..16].iter().all(|&p| p == 1));
        assert!(dst[16..].iter().all(|&p| p == 2));
    }

    #[test]
    fn zero_planes_clears_output() {
        let mut dst = vec![0x5Au8; 16 * 3 + 4];
        planar_to_chunky(&[], &mut dst, 16, 3, 0).unwrap();
        assert!(dst[..48].iter().all(|&p| p == 0));
        assert_eq!(&dst[48..], &[0x5A; 4]);
    }

    #[test]
    fn inverse_restores_pixels() {
        let w = 24;
        let h = 5;
        for planes in 1..=8u8 {
            let mask = ((1u16 << planes) - 1) as u8;
            let chunky: alloc::vec::Vec<u8> = (0..w * h)
                .map(|i| ((i * 37 + i / 7) as u8) & mask)
                .collect();
            let mut planar = vec![0u8; w / 8 * usize::from(planes) * h];
            chunky_to_planar(&chunky, &mut planar, w, h, planes).unwrap();
            let mut back = vec![0u8; w * h];
            planar_to_chunky(&planar, &mut back, w, h, planes).unwrap();
            assert_eq!(back, chunky, "planes={planes}");
        }
    }

    #[test]
    fn undersized_buffers() {
        let mut dst = [0u8; 7];
        assert!(matches!(
            planar_to_chunky(&[0], &mut dst, 8, 1, 1),
            Err(IffError::BufferTooSmall { needed: 8, actual: 7 })
        ));
        let mut dst = [0u8; 8];
        assert!(matches!(
            planar_to_chunky(&[0], &mut dst, 8, 1, 2),
            Err(IffError::BufferTooSmall { needed: 2, actual: 1 })
        ));
        assert!(planar_to_chunky(&[0], &mut dst, 7, 1, 1).is_err());
    }
}
