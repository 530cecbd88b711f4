//! Output writing module
//!
//! Legacy BMP, floating-point TIFF and raw float dumps, plus the batch
//! conversion configuration.

mod bmp_writer;
mod raw_dump;
mod standard_tiff_writer;
pub mod types;
mod writer;

#[cfg(test)]
mod tests;

pub use bmp_writer::{
    BMP_HEADER_SIZE, BmpPixelEncoding, LegacyBmpWriter, bmp_file_size, bmp_header, encode_bmp, legacy_gamma_byte,
};
pub use raw_dump::write_raw_dump;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{
    ConversionConfig, ConversionConfigBuilder, DEFAULT_HIGHLIGHT_MARGIN, OutputKind, PixelScale, TiffCompression,
};
pub use writer::ImageWriter;
