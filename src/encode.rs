//! IFF ILBM / PBM writer.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::byterun::pack_row;
use crate::chunk::{ChunkId, FormType};
use crate::error::IffError;
use crate::header::{BitmapHeader, Compression, Masking};
use crate::planar::chunky_to_planar;

/// Builder for writing indexed pixels as an IFF picture.
#[derive(Clone, Debug)]
pub struct EncodeRequest<'a> {
    form: FormType,
    compression: Compression,
    mask: bool,
    palette: Option<&'a [u8]>,
}

impl<'a> EncodeRequest<'a> {
    /// Interleaved bitplanes (`FORM ILBM`).
    pub fn ilbm() -> Self {
        Self {
            form: FormType::Ilbm,
            compression: Compression::ByteRun1,
            mask: false,
            palette: None,
        }
    }

    /// Packed byte-per-pixel (`FORM PBM `), always 8 planes.
    pub fn pbm() -> Self {
        Self {
            form: FormType::Pbm,
            ..Self::ilbm()
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Write an all-opaque mask plane after the colour data of every row.
    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    /// CMAP contents: 8-bit red, green, blue triples.
    pub fn with_palette(mut self, rgb: &'a [u8]) -> Self {
        self.palette = Some(rgb);
        self
    }

    /// Encode `width * height` colour indices.
    ///
    /// `planes` is ignored for PBM, which always stores 8.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        planes: u8,
        stop: impl Stop,
    ) -> Result<Vec<u8>, IffError> {
        let planes = match self.form {
            FormType::Ilbm => planes,
            FormType::Pbm => 8,
        };
        let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(IffError::DimensionsTooLarge { width, height }),
        };
        if !(1..=8).contains(&planes) {
            return Err(IffError::UnsupportedFeature(alloc::format!(
                "cannot encode {planes} bitplanes"
            )));
        }
        let header = BitmapHeader {
            width: w,
            height: h,
            x: 0,
            y: 0,
            planes,
            masking: if self.mask {
                Masking::HasMask
            } else {
                Masking::None
            },
            compression: self.compression,
            transparent: 0,
            x_aspect: 1,
            y_aspect: 1,
            page_width: i16::try_from(w).unwrap_or(i16::MAX),
            page_height: i16::try_from(h).unwrap_or(i16::MAX),
        };
        header.validate()?;

        let chunky_len = header.chunky_len();
        if pixels.len() < chunky_len {
            return Err(IffError::BufferTooSmall {
                needed: chunky_len,
                actual: pixels.len(),
            });
        }
        let pixels = &pixels[..chunky_len];
        if planes < 8 {
            if let Some(p) = pixels.iter().find(|&&p| p >> planes != 0) {
                return Err(IffError::InvalidData(alloc::format!(
                    "pixel value {p} does not fit in {planes} bitplanes"
                )));
            }
        }

        stop.check()?;
        let body = self.encode_body(&header, pixels, &stop)?;

        let mut out = Vec::with_capacity(body.len() + 64);
        out.extend_from_slice(&ChunkId::FORM.0);
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&self.form.id().0);
        write_chunk(&mut out, ChunkId::BMHD, &header.to_bytes());
        if let Some(palette) = self.palette {
            write_chunk(&mut out, ChunkId::CMAP, palette);
        }
        write_chunk(&mut out, ChunkId::BODY, &body);

        let form_len = u32::try_from(out.len() - 8)
            .map_err(|_| IffError::DimensionsTooLarge { width, height })?;
        out[4..8].copy_from_slice(&form_len.to_be_bytes());
        Ok(out)
    }

    fn encode_body(
        &self,
        header: &BitmapHeader,
        pixels: &[u8],
        stop: &dyn Stop,
    ) -> Result<Vec<u8>, IffError> {
        let width = usize::from(header.width);
        let row_bytes = header.row_bytes();
        let scanline = header.scanline_len(self.form);
        let mask_row = vec![0xFFu8; header.mask_len()];

        let mut row = vec![0u8; scanline];
        let mut body = Vec::new();
        for (y, src) in pixels.chunks_exact(width.max(1)).enumerate() {
            if y % 16 == 0 {
                stop.check()?;
            }
            match self.form {
                FormType::Ilbm => chunky_to_planar(src, &mut row, width, 1, header.planes)?,
                FormType::Pbm => row.copy_from_slice(src),
            }

            match self.compression {
                Compression::None => {
                    body.extend_from_slice(&row);
                    body.extend_from_slice(&mask_row);
                }
                Compression::ByteRun1 => {
                    // ILBM compresses each plane row on its own.
                    let unit = match self.form {
                        FormType::Ilbm => row_bytes,
                        FormType::Pbm => scanline,
                    };
                    for part in row.chunks(unit.max(1)) {
                        pack_row(part, &mut body);
                    }
                    pack_row(&mask_row, &mut body);
                }
            }
        }
        Ok(body)
    }
}

fn write_chunk(out: &mut Vec<u8>, id: ChunkId, data: &[u8]) {
    out.extend_from_slice(&id.0);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(0);
    }
}
