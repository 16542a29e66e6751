//! Picture loading with a fallback for non-IFF files.
//!
//! Files that start with `FORM` are decoded here. Anything else goes to a
//! [`FallbackLoader`], whose byte count is turned into a plane count by
//! dividing by [`FRAME_SIZE`].

use enough::Unstoppable;

use crate::chunk::is_iff;
use crate::decode::DecodeRequest;
use crate::error::IffError;

/// Bytes of one 320x200 bitplane.
pub const FRAME_SIZE: usize = 8000;

/// Loader for pictures stored without an IFF container.
pub trait FallbackLoader {
    /// Load `data` into the caller's buffers and return the bytes produced.
    fn load_uncompressed(
        &mut self,
        data: &[u8],
        scratch: &mut [u8],
        dest: &mut [u8],
        palette: Option<&mut [u8]>,
    ) -> Result<usize, IffError>;
}

/// Fallback that accepts nothing: non-IFF input fails with [`IffError::NotIff`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFallback;

impl FallbackLoader for NoFallback {
    fn load_uncompressed(
        &mut self,
        _data: &[u8],
        _scratch: &mut [u8],
        _dest: &mut [u8],
        _palette: Option<&mut [u8]>,
    ) -> Result<usize, IffError> {
        Err(IffError::NotIff)
    }
}

impl<L: FallbackLoader + ?Sized> FallbackLoader for &mut L {
    fn load_uncompressed(
        &mut self,
        data: &[u8],
        scratch: &mut [u8],
        dest: &mut [u8],
        palette: Option<&mut [u8]>,
    ) -> Result<usize, IffError> {
        (**self).load_uncompressed(data, scratch, dest, palette)
    }
}

/// Load a picture held in memory and return its bitplane count.
///
/// IFF data is decoded into `scratch` and `dest` (see
/// [`DecodeRequest::decode_into`]). Other data is passed to `fallback`,
/// whose errors come back unchanged.
pub fn load_bytes(
    data: &[u8],
    scratch: &mut [u8],
    dest: &mut [u8],
    palette: Option<&mut [u8]>,
    mut fallback: impl FallbackLoader,
) -> Result<usize, IffError> {
    if !is_iff(data) {
        log::debug!("no FORM marker, using fallback loader");
        let bytes = fallback.load_uncompressed(data, scratch, dest, palette)?;
        return Ok(bytes / FRAME_SIZE);
    }
    let planes = DecodeRequest::new(data).decode_into(scratch, dest, palette, Unstoppable)?;
    Ok(usize::from(planes))
}

/// Read a whole stream and load it with [`load_bytes`].
#[cfg(feature = "std")]
pub fn read_picture<R: std::io::Read>(
    mut reader: R,
    scratch: &mut [u8],
    dest: &mut [u8],
    palette: Option<&mut [u8]>,
    fallback: impl FallbackLoader,
) -> Result<usize, IffError> {
    let mut data = alloc::vec::Vec::new();
    reader.read_to_end(&mut data)?;
    load_bytes(&data, scratch, dest, palette, fallback)
}

/// Load a picture file and return its bitplane count.
///
/// A missing file is reported as [`IffError::FileNotFound`].
#[cfg(feature = "std")]
pub fn load_picture<P: AsRef<std::path::Path>>(
    path: P,
    scratch: &mut [u8],
    dest: &mut [u8],
    palette: Option<&mut [u8]>,
    fallback: impl FallbackLoader,
) -> Result<usize, IffError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IffError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => IffError::from(e),
    })?;
    log::debug!("loaded {} ({} bytes)", path.display(), data.len());
    load_bytes(&data, scratch, dest, palette, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::EncodeRequest;

    /// Copies raw bytes straight into `dest`.
    struct RawCopy {
        calls: usize,
    }

    impl FallbackLoader for RawCopy {
        fn load_uncompressed(
            &mut self,
            data: &[u8],
            _scratch: &mut [u8],
            dest: &mut [u8],
            _palette: Option<&mut [u8]>,
        ) -> Result<usize, IffError> {
            self.calls += 1;
            dest[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn non_iff_goes_to_fallback() {
        let data = alloc::vec![7u8; 2 * FRAME_SIZE + 10];
        let mut dest = alloc::vec![0u8; data.len()];
        let mut fallback = RawCopy { calls: 0 };
        let planes = load_bytes(&data, &mut [], &mut dest, None, &mut fallback).unwrap();
        assert_eq!(planes, 2);
        assert_eq!(fallback.calls, 1);
        assert_eq!(dest, data);
    }

    #[test]
    fn no_fallback_error_is_propagated() {
        let mut dest = [0u8; 4];
        assert!(matches!(
            load_bytes(b"CPS\0data", &mut [], &mut dest, None, NoFallback),
            Err(IffError::NotIff)
        ));
    }

    /// Refuses every file with its own error.
    struct Rejecting;

    impl FallbackLoader for Rejecting {
        fn load_uncompressed(
            &mut self,
            _data: &[u8],
            _scratch: &mut [u8],
            _dest: &mut [u8],
            _palette: Option<&mut [u8]>,
        ) -> Result<usize, IffError> {
            Err(IffError::InvalidData("not a raw frame".into()))
        }
    }

    #[test]
    fn fallback_error_is_returned_unchanged() {
        let mut dest = [0u8; 4];
        match load_bytes(b"CPS\0data", &mut [], &mut dest, None, Rejecting) {
            Err(IffError::InvalidData(msg)) => assert_eq!(msg, "not a raw frame"),
            other => panic!("expected the fallback's error, got {other:?}"),
        }
    }

    #[test]
    fn iff_skips_fallback() {
        let data = EncodeRequest::ilbm()
            .encode(&[3u8; 16], 8, 2, 2, Unstoppable)
            .unwrap();
        let mut scratch = [0u8; 4];
        let mut dest = [0u8; 16];
        let mut fallback = RawCopy { calls: 0 };
        let planes = load_bytes(&data, &mut scratch, &mut dest, None, &mut fallback).unwrap();
        assert_eq!(planes, 2);
        assert_eq!(fallback.calls, 0);
        assert_eq!(dest, [3u8; 16]);
    }

    #[cfg(feature = "std")]
    #[test]
    fn missing_file() {
        let mut dest = [0u8; 4];
        let err = load_picture(
            "/nonexistent/zenilbm/picture.lbm",
            &mut [],
            &mut dest,
            None,
            NoFallback,
        )
        .unwrap_err();
        assert!(matches!(err, IffError::FileNotFound { .. }));
    }

    #[cfg(feature = "std")]
    #[test]
    fn reads_from_stream() {
        let data = EncodeRequest::pbm()
            .encode(&[9u8; 8], 8, 1, 8, Unstoppable)
            .unwrap();
        let mut scratch = [0u8; 8];
        let mut dest = [0u8; 8];
        let planes = read_picture(
            std::io::Cursor::new(data),
            &mut scratch,
            &mut dest,
            None,
            NoFallback,
        )
        .unwrap();
        assert_eq!(planes, 8);
        assert_eq!(dest, [9u8; 8]);
    }
}
