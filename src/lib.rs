//! # zenilbm
//!
//! IFF picture decoder for `FORM ILBM` (interleaved bitplanes) and
//! `FORM PBM ` (packed chunky) files, as written by Deluxe Paint and the
//! tools that followed it.
//!
//! Decoding produces one byte per pixel plus the picture's palette in VGA
//! DAC form (6 bits per channel).
//!
//! ## Supported
//!
//! - 1 to 8 bitplanes (0 decodes to an all-zero picture)
//! - uncompressed and ByteRun1 bodies
//! - pictures with a mask plane (the mask is read and dropped)
//!
//! ## Non-Goals
//!
//! - Brushes with transparent-colour or lasso masking
//! - Amiga planar output and nibble-packed palettes
//! - HAM, EHB, deep (24-bit) ILBMs
//!
//! ## Usage
//!
//! ```no_run
//! use zenilbm::{DecodeRequest, ImageInfo};
//! use enough::Unstoppable;
//!
//! let data: &[u8] = &[]; // your LBM bytes
//!
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} with {} planes", info.width, info.height, info.planes);
//!
//! let decoded = DecodeRequest::new(data).decode(Unstoppable)?;
//! let first_pixel = decoded.pixels()[0];
//! let vga_palette = decoded.palette();
//! # let _ = (first_pixel, vga_palette);
//! # Ok::<(), zenilbm::IffError>(())
//! ```
//!
//! Callers that manage their own buffers use [`DecodeRequest::decode_into`]
//! or [`load_picture`], which also hands non-IFF files to a
//! [`FallbackLoader`].

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod info;
mod limits;

pub mod byterun;
pub mod chunk;
pub mod header;
pub mod palette;
pub mod planar;

mod decode;
mod encode;
mod load;

// Re-exports
pub use chunk::{ChunkId, FormType};
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::IffError;
pub use header::{BitmapHeader, Compression, Masking};
pub use info::ImageInfo;
pub use limits::Limits;
pub use load::{FRAME_SIZE, FallbackLoader, NoFallback, load_bytes};
#[cfg(feature = "std")]
pub use load::{load_picture, read_picture};
