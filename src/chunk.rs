//! IFF container walking.
//!
//! An IFF picture is a `FORM` group: the marker, a big-endian length, a form
//! type, then a stream of chunks. Every chunk is a four byte tag, a
//! big-endian length and the payload, padded to an even length.

use core::fmt;

use crate::error::IffError;

/// Four character chunk (or form type) tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub const FORM: ChunkId = ChunkId(*b"FORM");
    pub const ILBM: ChunkId = ChunkId(*b"ILBM");
    pub const PBM: ChunkId = ChunkId(*b"PBM ");
    pub const BMHD: ChunkId = ChunkId(*b"BMHD");
    pub const CMAP: ChunkId = ChunkId(*b"CMAP");
    pub const BODY: ChunkId = ChunkId(*b"BODY");

    fn from_slice(bytes: &[u8]) -> Option<ChunkId> {
        Some(ChunkId(bytes.get(..4)?.try_into().ok()?))
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({self})")
    }
}

/// Pixel layout of the BODY, selected by the form type.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormType {
    /// `ILBM`: interleaved bitplanes, one row of every plane per scanline.
    Ilbm,
    /// `PBM `: packed, one byte per pixel.
    Pbm,
}

impl FormType {
    pub fn id(self) -> ChunkId {
        match self {
            FormType::Ilbm => ChunkId::ILBM,
            FormType::Pbm => ChunkId::PBM,
        }
    }
}

/// One chunk inside a form.
#[derive(Clone, Copy, Debug)]
pub struct Chunk<'a> {
    pub id: ChunkId,
    pub data: &'a [u8],
}

/// Whether `data` starts with the `FORM` marker.
pub fn is_iff(data: &[u8]) -> bool {
    data.get(..4) == Some(&ChunkId::FORM.0[..])
}

/// A parsed `FORM` group, borrowing its chunk stream from the input.
#[derive(Clone, Copy, Debug)]
pub struct Form<'a> {
    pub form_type: FormType,
    body: &'a [u8],
}

impl<'a> Form<'a> {
    /// Check the marker and form type.
    ///
    /// Returns [`IffError::NotIff`] when the marker is absent and
    /// [`IffError::UnrecognizedFormat`] for any form type other than
    /// `ILBM` or `PBM `.
    pub fn parse(data: &'a [u8]) -> Result<Form<'a>, IffError> {
        if !is_iff(data) {
            return Err(IffError::NotIff);
        }
        let len_bytes: [u8; 4] = data
            .get(4..8)
            .and_then(|b| b.try_into().ok())
            .ok_or(IffError::UnrecognizedFormat)?;
        let declared = u32::from_be_bytes(len_bytes) as usize;
        let type_id = ChunkId::from_slice(&data[8..]).ok_or(IffError::UnrecognizedFormat)?;

        let form_type = match type_id {
            ChunkId::ILBM => FormType::Ilbm,
            ChunkId::PBM => FormType::Pbm,
            other => {
                log::debug!("rejecting FORM of type {other}");
                return Err(IffError::UnrecognizedFormat);
            }
        };

        // The form length covers the type tag and the chunks after it.
        let available = data.len() - 8;
        let form_len = if declared > available {
            log::warn!("FORM declares {declared} bytes but only {available} are present");
            available
        } else {
            declared
        };
        let body = data.get(12..8 + form_len).unwrap_or(&[]);
        log::debug!("FORM {} with {} bytes of chunks", type_id, body.len());

        Ok(Form { form_type, body })
    }

    /// Iterate over the chunks in file order.
    pub fn chunks(&self) -> Chunks<'a> {
        Chunks {
            data: self.body,
            pos: 0,
        }
    }

    /// First chunk with the given tag, searching from the start of the form.
    pub fn find(&self, id: ChunkId) -> Option<&'a [u8]> {
        self.chunks().find(|c| c.id == id).map(|c| c.data)
    }
}

/// Iterator over the chunks of a form.
///
/// Stops at the first incomplete chunk header. A payload running past the
/// end of the data is cut short to what is present.
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let header = self.data.get(self.pos..self.pos.checked_add(8)?)?;
        let id = ChunkId::from_slice(header)?;
        let len = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let start = self.pos + 8;
        let end = match start.checked_add(len) {
            Some(end) if end <= self.data.len() => end,
            _ => {
                log::warn!(
                    "{id} chunk declares {len} bytes, only {} present",
                    self.data.len() - start
                );
                self.data.len()
            }
        };
        log::trace!("chunk {id} at {start}, {} bytes", end - start);

        // Odd-length payloads are followed by a pad byte.
        self.pos = end.saturating_add(len & 1).min(self.data.len());
        Some(Chunk {
            id,
            data: &self.data[start..end],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn form(form_type: &[u8; 4], chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(form_type);
        for (id, data) in chunks {
            body.extend_from_slice(*id);
            body.extend_from_slice(&(data.len() as u32).to_be_bytes());
            body.extend_from_slice(data);
            if data.len() % 2 == 1 {
                body.push(0);
            }
        }
        let mut out = b"FORM".to_vec();
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn walks_padded_chunks() {
        let data = form(b"ILBM", &[(b"ANNO", b"odd"), (b"CMAP", &[1, 2, 3, 4, 5, 6])]);
        let form = Form::parse(&data).unwrap();
        assert_eq!(form.form_type, FormType::Ilbm);
        let ids: Vec<ChunkId> = form.chunks().map(|c| c.id).collect();
        assert_eq!(ids, [ChunkId(*b"ANNO"), ChunkId::CMAP]);
        assert_eq!(form.find(ChunkId::CMAP), Some(&[1u8, 2, 3, 4, 5, 6][..]));
        assert_eq!(form.find(ChunkId::BODY), None);
    }

    #[test]
    fn find_ignores_chunk_order() {
        let data = form(b"PBM ", &[(b"BODY", &[9, 9]), (b"BMHD", &[0; 20])]);
        let form = Form::parse(&data).unwrap();
        assert_eq!(form.form_type, FormType::Pbm);
        assert_eq!(form.find(ChunkId::BMHD).map(<[u8]>::len), Some(20));
    }

    #[test]
    fn marker_and_type_are_checked() {
        assert!(matches!(Form::parse(b"RIFF\0\0\0\x04WAVE"), Err(IffError::NotIff)));
        assert!(matches!(Form::parse(b"FO"), Err(IffError::NotIff)));
        let data = form(b"8SVX", &[]);
        assert!(matches!(
            Form::parse(&data),
            Err(IffError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn truncated_chunk_is_cut_short() {
        let mut data = form(b"ILBM", &[(b"BODY", &[1, 2, 3, 4])]);
        data.truncate(data.len() - 2);
        let form = Form::parse(&data).unwrap();
        assert_eq!(form.find(ChunkId::BODY), Some(&[1u8, 2][..]));
    }

    #[test]
    fn display_is_text() {
        assert_eq!(alloc::format!("{}", ChunkId::PBM), "PBM ");
        assert_eq!(alloc::format!("{}", ChunkId([0, b'A', b'B', b'C'])), "?ABC");
    }
}
