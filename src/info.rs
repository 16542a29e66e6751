use crate::chunk::{ChunkId, Form, FormType};
use crate::decode::read_header;
use crate::error::IffError;
use crate::header::{Compression, Masking};

/// Picture properties read from the header without decoding the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub planes: u8,
    pub form: FormType,
    pub masking: Masking,
    pub compression: Compression,
    /// Whether a CMAP chunk is present.
    pub has_palette: bool,
}

impl ImageInfo {
    /// Probe an IFF picture.
    ///
    /// Applies the same header checks as decoding, so a successful probe
    /// means the header is decodable.
    pub fn from_bytes(data: &[u8]) -> Result<ImageInfo, IffError> {
        let form = Form::parse(data)?;
        let header = read_header(&form)?;
        Ok(ImageInfo {
            width: u32::from(header.width),
            height: u32::from(header.height),
            planes: header.planes,
            form: form.form_type,
            masking: header.masking,
            compression: header.compression,
            has_palette: form.find(ChunkId::CMAP).is_some(),
        })
    }

    /// Bytes of the chunky output buffer.
    pub fn output_len(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
