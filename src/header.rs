//! The `BMHD` bitmap header chunk.

use crate::chunk::FormType;
use crate::error::IffError;

/// Masking technique declared in the header.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Masking {
    None,
    /// An extra mask plane follows the colour planes in every row.
    HasMask,
    TransparentColor,
    Lasso,
}

impl Masking {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::HasMask),
            2 => Some(Self::TransparentColor),
            3 => Some(Self::Lasso),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::None => 0,
            Self::HasMask => 1,
            Self::TransparentColor => 2,
            Self::Lasso => 3,
        }
    }
}

/// BODY compression method.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    /// PackBits-style byte-run encoding, one scanline at a time.
    #[default]
    ByteRun1,
}

impl Compression {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::None => 0,
            Self::ByteRun1 => 1,
        }
    }
}

/// Decoded `BMHD` record.
///
/// Multi-byte fields are stored big-endian in the file and hold native
/// values here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmapHeader {
    pub width: u16,
    pub height: u16,
    /// Placement offset; not used when decoding.
    pub x: i16,
    pub y: i16,
    pub planes: u8,
    pub masking: Masking,
    pub compression: Compression,
    /// Transparent colour index; informational.
    pub transparent: u16,
    pub x_aspect: u8,
    pub y_aspect: u8,
    pub page_width: i16,
    pub page_height: i16,
}

impl BitmapHeader {
    /// Size of the record in the file.
    pub const SIZE: usize = 20;

    /// Parse the record from a `BMHD` payload.
    ///
    /// Only the layout is checked here; see [`BitmapHeader::validate`] for
    /// the values this crate can decode.
    pub fn parse(data: &[u8]) -> Result<Self, IffError> {
        let b: &[u8; Self::SIZE] = data
            .get(..Self::SIZE)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| {
                IffError::InvalidHeader(alloc::format!(
                    "BMHD chunk is {} bytes, expected {}",
                    data.len(),
                    Self::SIZE
                ))
            })?;
        let u16_at = |i: usize| u16::from_be_bytes([b[i], b[i + 1]]);
        let i16_at = |i: usize| i16::from_be_bytes([b[i], b[i + 1]]);

        let masking = Masking::from_u8(b[9]).ok_or_else(|| {
            IffError::UnsupportedFeature(alloc::format!("unknown masking mode {}", b[9]))
        })?;
        let compression = match b[10] {
            0 => Compression::None,
            1 => Compression::ByteRun1,
            other => {
                return Err(IffError::UnsupportedFeature(alloc::format!(
                    "unknown compression method {other}"
                )));
            }
        };

        Ok(BitmapHeader {
            width: u16_at(0),
            height: u16_at(2),
            x: i16_at(4),
            y: i16_at(6),
            planes: b[8],
            masking,
            compression,
            transparent: u16_at(12),
            x_aspect: b[14],
            y_aspect: b[15],
            page_width: i16_at(16),
            page_height: i16_at(18),
        })
    }

    /// Serialize to the 20-byte file layout.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut b = [0u8; Self::SIZE];
        b[0..2].copy_from_slice(&self.width.to_be_bytes());
        b[2..4].copy_from_slice(&self.height.to_be_bytes());
        b[4..6].copy_from_slice(&self.x.to_be_bytes());
        b[6..8].copy_from_slice(&self.y.to_be_bytes());
        b[8] = self.planes;
        b[9] = self.masking.to_u8();
        b[10] = self.compression.to_u8();
        b[12..14].copy_from_slice(&self.transparent.to_be_bytes());
        b[14] = self.x_aspect;
        b[15] = self.y_aspect;
        b[16..18].copy_from_slice(&self.page_width.to_be_bytes());
        b[18..20].copy_from_slice(&self.page_height.to_be_bytes());
        b
    }

    /// Reject headers the decoder cannot handle.
    ///
    /// Brushes (transparent colour and lasso masking) are refused, as are
    /// more than 8 planes and widths that do not fill whole bytes.
    pub fn validate(&self) -> Result<(), IffError> {
        if !matches!(self.masking, Masking::None | Masking::HasMask) {
            return Err(IffError::UnsupportedFeature(alloc::format!(
                "masking mode {:?}",
                self.masking
            )));
        }
        if self.planes > 8 {
            return Err(IffError::UnsupportedFeature(alloc::format!(
                "{} bitplanes (at most 8)",
                self.planes
            )));
        }
        if self.width % 8 != 0 {
            return Err(IffError::UnsupportedFeature(alloc::format!(
                "width {} is not a multiple of 8",
                self.width
            )));
        }
        Ok(())
    }

    /// Bytes of one plane in one row.
    pub fn row_bytes(&self) -> usize {
        usize::from(self.width >> 3)
    }

    /// Colour bytes of one expanded scanline, mask plane excluded.
    ///
    /// ILBM rows carry `planes` plane slices; PBM rows carry one byte per pixel.
    pub fn scanline_len(&self, form: FormType) -> usize {
        match form {
            FormType::Ilbm => usize::from(self.planes) * self.row_bytes(),
            FormType::Pbm if self.planes == 0 => 0,
            FormType::Pbm => usize::from(self.width),
        }
    }

    /// Bytes of the mask plane in one expanded scanline.
    pub fn mask_len(&self) -> usize {
        if self.masking == Masking::HasMask {
            self.row_bytes()
        } else {
            0
        }
    }

    /// Size of the decompressed body, mask planes dropped.
    pub fn planar_len(&self, form: FormType) -> usize {
        self.scanline_len(form) * usize::from(self.height)
    }

    /// Bytes the whole BODY expands to, mask planes included.
    ///
    /// Zero for pictures without planes, whose BODY is never read.
    pub fn body_len(&self, form: FormType) -> usize {
        if self.planes == 0 {
            return 0;
        }
        (self.scanline_len(form) + self.mask_len()) * usize::from(self.height)
    }

    /// Size of the byte-per-pixel output region.
    pub fn chunky_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// CMAP bytes needed for every colour the planes can address.
    pub fn palette_len(&self) -> usize {
        3usize << self.planes.min(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> BitmapHeader {
        BitmapHeader {
            width: 320,
            height: 200,
            x: -4,
            y: 7,
            planes: 8,
            masking: Masking::HasMask,
            compression: Compression::ByteRun1,
            transparent: 0x0102,
            x_aspect: 5,
            y_aspect: 6,
            page_width: 320,
            page_height: 200,
        }
    }

    #[test]
    fn fields_are_big_endian() {
        let bytes = header().to_bytes();
        assert_eq!(&bytes[..4], &[0x01, 0x40, 0x00, 0xC8]);
        assert_eq!(&bytes[4..6], &[0xFF, 0xFC]);
        assert_eq!(&bytes[14..16], &[5, 6]);
        assert_eq!(BitmapHeader::parse(&bytes).unwrap(), header());
    }

    #[test]
    fn derived_sizes() {
        let h = header();
        assert_eq!(h.row_bytes(), 40);
        assert_eq!(h.scanline_len(FormType::Ilbm), 320);
        assert_eq!(h.mask_len(), 40);
        assert_eq!(h.planar_len(FormType::Ilbm), 64_000);
        assert_eq!(h.chunky_len(), 64_000);
        assert_eq!(h.palette_len(), 768);
        assert_eq!(h.body_len(FormType::Ilbm), 72_000);
        assert_eq!(h.body_len(FormType::Pbm), 72_000);
    }

    #[test]
    fn planeless_pictures_have_no_body() {
        let mut h = header();
        h.planes = 0;
        assert_eq!(h.scanline_len(FormType::Pbm), 0);
        assert_eq!(h.planar_len(FormType::Ilbm), 0);
        assert_eq!(h.body_len(FormType::Pbm), 0);
        assert_eq!(h.chunky_len(), 64_000);
    }

    #[test]
    fn short_record_is_invalid() {
        assert!(matches!(
            BitmapHeader::parse(&[0; 19]),
            Err(IffError::InvalidHeader(_))
        ));
    }

    #[test]
    fn rejects_brushes_and_unknown_compression() {
        let mut bytes = header().to_bytes();
        bytes[9] = 3;
        let lasso = BitmapHeader::parse(&bytes).unwrap();
        assert!(matches!(
            lasso.validate(),
            Err(IffError::UnsupportedFeature(_))
        ));

        bytes[9] = 2;
        let transparent = BitmapHeader::parse(&bytes).unwrap();
        assert!(transparent.validate().is_err());

        bytes[9] = 0;
        bytes[10] = 2;
        assert!(matches!(
            BitmapHeader::parse(&bytes),
            Err(IffError::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn rejects_unaligned_width_and_deep_planes() {
        let mut h = header();
        h.width = 321;
        assert!(h.validate().is_err());
        let mut h = header();
        h.planes = 24;
        assert!(h.validate().is_err());
    }
}
