/// Resource limits for decode/encode operations.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum memory bytes for the scratch and output buffers together.
    pub max_memory_bytes: Option<u64>,
    /// Maximum ratio of decoded BODY bytes to stored BODY bytes.
    ///
    /// ByteRun1 can expand at most 64 times; a lower limit refuses
    /// pictures that are mostly long runs.
    pub max_body_expansion: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), crate::IffError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(crate::IffError::LimitExceeded(alloc::format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(crate::IffError::LimitExceeded(alloc::format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(crate::IffError::LimitExceeded(alloc::format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), crate::IffError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(crate::IffError::LimitExceeded(alloc::format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }

    /// Check a BODY of `stored` bytes that decodes to `decoded` bytes.
    pub(crate) fn check_expansion(
        &self,
        decoded: usize,
        stored: usize,
    ) -> Result<(), crate::IffError> {
        if let Some(max_ratio) = self.max_body_expansion {
            if decoded as u64 > (stored as u64).saturating_mul(max_ratio) {
                return Err(crate::IffError::LimitExceeded(alloc::format!(
                    "BODY of {stored} bytes decodes to {decoded}, over {max_ratio}x expansion limit"
                )));
            }
        }
        Ok(())
    }
}
