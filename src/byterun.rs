//! ByteRun1 (PackBits) scanline codec.
//!
//! Control byte `n`, read as signed:
//! - `0..=127`: copy the next `n + 1` bytes literally
//! - `-127..=-1`: repeat the next byte `1 - n` times
//! - `-128`: no-op
//!
//! Every scanline is coded on its own; runs never cross scanlines.

use alloc::vec::Vec;

use crate::error::IffError;

/// Most output bytes one input byte can yield: a two byte replicate run
/// expands to 128.
pub const MAX_EXPANSION: usize = 64;

/// Cursor over a BODY payload that expands one scanline at a time.
#[derive(Clone, Debug)]
pub struct ByteRunReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteRunReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn next_byte(&mut self) -> Result<u8, IffError> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or(IffError::TruncatedBody { offset: self.pos })?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], IffError> {
        let end = self.pos + n;
        let bytes = self.data.get(self.pos..end).ok_or(IffError::TruncatedBody {
            offset: self.data.len(),
        })?;
        self.pos = end;
        Ok(bytes)
    }

    /// Expand one compressed scanline of `out.len() + discard` bytes.
    ///
    /// The first `out.len()` bytes land in `out`. The trailing `discard`
    /// bytes (a mask plane) are decoded to keep the stream in step and then
    /// dropped.
    pub fn unpack_row(&mut self, out: &mut [u8], discard: usize) -> Result<(), IffError> {
        let keep = out.len();
        let total = keep + discard;
        let mut produced = 0;

        while produced < total {
            let code = self.next_byte()? as i8;
            let len = match code {
                -128 => continue,
                0..=127 => code as usize + 1,
                _ => (1 - i16::from(code)) as usize,
            };
            if produced + len > total {
                return Err(IffError::InvalidData(alloc::format!(
                    "byte run of {len} at BODY offset {} overruns a {total}-byte scanline",
                    self.pos - 1
                )));
            }

            // Only the part of the run before the mask plane is written.
            let kept = keep.saturating_sub(produced).min(len);
            if code >= 0 {
                let literal = self.take(len)?;
                out[produced..produced + kept].copy_from_slice(&literal[..kept]);
            } else {
                let value = self.next_byte()?;
                out[produced..produced + kept].fill(value);
            }
            produced += len;
        }
        Ok(())
    }

    /// Copy one uncompressed scanline, dropping the trailing `discard` bytes.
    pub fn copy_row(&mut self, out: &mut [u8], discard: usize) -> Result<(), IffError> {
        let row = self.take(out.len() + discard)?;
        out.copy_from_slice(&row[..out.len()]);
        Ok(())
    }
}

/// Expand a complete ByteRun1 stream into `out`, which must be filled exactly.
pub fn unpack(src: &[u8], out: &mut [u8]) -> Result<usize, IffError> {
    let mut reader = ByteRunReader::new(src);
    reader.unpack_row(out, 0)?;
    Ok(reader.position())
}

/// Append the ByteRun1 encoding of `src` to `out`.
///
/// Repeats of three or more bytes become replicate runs; everything else is
/// gathered into literal runs. Runs are at most 128 bytes and the `-128`
/// no-op is never produced.
pub fn pack_row(src: &[u8], out: &mut Vec<u8>) {
    const MAX_RUN: usize = 128;

    let mut i = 0;
    let mut literal_start = 0;
    while i < src.len() {
        let value = src[i];
        let mut run = 1;
        while i + run < src.len() && src[i + run] == value && run < MAX_RUN {
            run += 1;
        }

        if run >= 3 {
            flush_literal(&src[literal_start..i], out);
            out.push((1 - run as i16) as i8 as u8);
            out.push(value);
            i += run;
            literal_start = i;
        } else {
            i += run;
            if i - literal_start >= MAX_RUN {
                flush_literal(&src[literal_start..literal_start + MAX_RUN], out);
                literal_start += MAX_RUN;
            }
        }
    }
    flush_literal(&src[literal_start..], out);
}

fn flush_literal(bytes: &[u8], out: &mut Vec<u8>) {
    for chunk in bytes.chunks(128) {
        out.push((chunk.len() - 1) as u8);
        out.extend_from_slice(chunk);
    }
}
