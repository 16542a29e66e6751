use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::byterun::{ByteRunReader, MAX_EXPANSION};
use crate::chunk::{ChunkId, Form, FormType};
use crate::error::IffError;
use crate::header::{BitmapHeader, Compression};
use crate::limits::Limits;
use crate::palette::cmap_to_vga;
use crate::planar::planar_to_chunky;

/// Decoded picture: one byte per pixel plus the picture's palette.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    palette: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Bitplane count from the header; pixel values are below `1 << planes`.
    pub planes: u8,
    pub form: FormType,
}

impl DecodeOutput {
    /// Colour indices, row-major, `width * height` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Palette as 6-bit-per-channel RGB triples.
    ///
    /// Holds only the entries the CMAP supplied; empty when the file has none.
    pub fn palette(&self) -> &[u8] {
        &self.palette
    }

    /// Palette entries as typed pixels (still 6 bits per channel).
    #[cfg(feature = "rgb")]
    pub fn palette_rgb(&self) -> &[rgb::RGB8] {
        let whole = self.palette.len() / 3 * 3;
        self.palette[..whole].as_pixels()
    }

    /// Zero-copy view of the colour indices as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, u8> {
        imgref::ImgRef::new(&self.pixels[..], self.width as usize, self.height as usize)
    }
}

/// Builder for decoding an in-memory IFF picture.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode into freshly allocated buffers.
    pub fn decode(&self, stop: impl Stop) -> Result<DecodeOutput, IffError> {
        let form = Form::parse(self.data)?;
        let header = read_header(&form)?;
        let body = read_body(&form, &header)?;
        let planar_len = header.planar_len(form.form_type);
        let chunky_len = header.chunky_len();
        self.check_limits(&header, form.form_type, body, planar_len + chunky_len)?;

        let mut scratch = vec![0u8; planar_len];
        let mut pixels = vec![0u8; chunky_len];
        let mut palette = vec![0u8; header.palette_len()];
        let written = decode_form(
            &form,
            &header,
            body,
            &mut scratch,
            &mut pixels,
            Some(&mut palette),
            &stop,
        )?;
        palette.truncate(written);

        Ok(DecodeOutput {
            pixels,
            palette,
            width: u32::from(header.width),
            height: u32::from(header.height),
            planes: header.planes,
            form: form.form_type,
        })
    }

    /// Decode into caller-owned buffers and return the bitplane count.
    ///
    /// `scratch` receives the decompressed body and must hold at least
    /// [`BitmapHeader::planar_len`] bytes; `dest` receives the chunky
    /// pixels and must hold [`BitmapHeader::chunky_len`] bytes. When
    /// `palette` is given, the CMAP is converted into it (see
    /// [`crate::palette::cmap_to_vga`]).
    pub fn decode_into(
        &self,
        scratch: &mut [u8],
        dest: &mut [u8],
        palette: Option<&mut [u8]>,
        stop: impl Stop,
    ) -> Result<u8, IffError> {
        let form = Form::parse(self.data)?;
        let header = read_header(&form)?;
        let body = read_body(&form, &header)?;
        let alloc_bytes = header.planar_len(form.form_type) + header.chunky_len();
        self.check_limits(&header, form.form_type, body, alloc_bytes)?;
        decode_form(&form, &header, body, scratch, dest, palette, &stop)?;
        Ok(header.planes)
    }

    fn check_limits(
        &self,
        header: &BitmapHeader,
        form: FormType,
        body: &[u8],
        alloc_bytes: usize,
    ) -> Result<(), IffError> {
        if let Some(limits) = self.limits {
            limits.check(u32::from(header.width), u32::from(header.height))?;
            limits.check_memory(alloc_bytes)?;
            limits.check_expansion(header.body_len(form), body.len())?;
        }
        Ok(())
    }
}

/// Locate, parse and validate the `BMHD` chunk.
pub(crate) fn read_header(form: &Form<'_>) -> Result<BitmapHeader, IffError> {
    let bmhd = form.find(ChunkId::BMHD).ok_or(IffError::MissingHeader)?;
    let header = BitmapHeader::parse(bmhd)?;
    log::debug!(
        "BMHD {}x{} planes={} masking={:?} compression={:?}",
        header.width,
        header.height,
        header.planes,
        header.masking,
        header.compression
    );
    header.validate()?;
    Ok(header)
}

/// Locate the `BODY` chunk, rejecting one too short to fill the picture.
///
/// Runs before any buffer is sized from the header.
fn read_body<'a>(form: &Form<'a>, header: &BitmapHeader) -> Result<&'a [u8], IffError> {
    let body = form.find(ChunkId::BODY).ok_or(IffError::MissingBody)?;
    let decoded = header.body_len(form.form_type);
    let max_ratio = match header.compression {
        Compression::None => 1,
        Compression::ByteRun1 => MAX_EXPANSION,
    };
    if body.len().saturating_mul(max_ratio) < decoded {
        log::debug!("BODY of {} bytes cannot fill {decoded} bytes", body.len());
        return Err(IffError::TruncatedBody { offset: body.len() });
    }
    Ok(body)
}

/// Palette, body and pixel conversion for an already validated header.
///
/// Returns the number of palette bytes written.
fn decode_form(
    form: &Form<'_>,
    header: &BitmapHeader,
    body: &[u8],
    scratch: &mut [u8],
    dest: &mut [u8],
    palette: Option<&mut [u8]>,
    stop: &dyn Stop,
) -> Result<usize, IffError> {
    let planar_len = header.planar_len(form.form_type);
    let chunky_len = header.chunky_len();
    if scratch.len() < planar_len {
        return Err(IffError::BufferTooSmall {
            needed: planar_len,
            actual: scratch.len(),
        });
    }
    if dest.len() < chunky_len {
        return Err(IffError::BufferTooSmall {
            needed: chunky_len,
            actual: dest.len(),
        });
    }

    let mut palette_bytes = 0;
    if let Some(palette) = palette {
        if let Some(cmap) = form.find(ChunkId::CMAP) {
            let cmap = &cmap[..cmap.len().min(header.palette_len())];
            palette_bytes = cmap_to_vga(cmap, palette)?;
            log::debug!("CMAP converted {palette_bytes} bytes");
        }
    }

    if header.planes == 0 {
        dest[..chunky_len].fill(0);
        return Ok(palette_bytes);
    }

    unpack_body(header, form.form_type, body, &mut scratch[..planar_len], stop)?;
    stop.check()?;

    match form.form_type {
        FormType::Ilbm => planar_to_chunky(
            &scratch[..planar_len],
            &mut dest[..chunky_len],
            usize::from(header.width),
            usize::from(header.height),
            header.planes,
        )?,
        FormType::Pbm => dest[..chunky_len].copy_from_slice(&scratch[..chunky_len]),
    }
    Ok(palette_bytes)
}

/// Expand every scanline of the BODY into `scratch`, dropping mask planes.
fn unpack_body(
    header: &BitmapHeader,
    form: FormType,
    body: &[u8],
    scratch: &mut [u8],
    stop: &dyn Stop,
) -> Result<(), IffError> {
    let scanline = header.scanline_len(form);
    let mask = header.mask_len();
    let mut reader = ByteRunReader::new(body);

    for row in 0..usize::from(header.height) {
        if row % 16 == 0 {
            stop.check()?;
        }
        let out = &mut scratch[row * scanline..(row + 1) * scanline];
        match header.compression {
            Compression::ByteRun1 => reader.unpack_row(out, mask)?,
            Compression::None => reader.copy_row(out, mask)?,
        }
    }
    log::trace!(
        "BODY consumed {} of {} bytes",
        reader.position(),
        body.len()
    );
    Ok(())
}
