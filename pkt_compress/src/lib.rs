//! Lossless compression for fixed-length spacecraft housekeeping
//! telemetry packets, following CCSDS 124.0-B-1 (POCKET+).
//!
//! Housekeeping streams repeat the same packet layout over and over,
//! with most bit positions stable from one packet to the next. The
//! codec tracks which positions are unpredictable in a mask, transmits
//! only those bits per packet, and retransmits recent mask changes so
//! a receiver can miss several packets and still follow along.
//!
//! ```
//! use pkt_compress::{compress, decompress, CompressorConfig, DecompressorConfig};
//!
//! let telemetry = vec![0x0b, 0x00, 0x0b, 0x01, 0x0b, 0x02];
//! let compressed = compress(&telemetry, &CompressorConfig::new(16)).unwrap();
//! let recovered = decompress(&compressed, &DecompressorConfig::new(16)).unwrap();
//! assert_eq!(recovered, telemetry);
//! ```
//!
//! The packet length and robustness level are not stored in the
//! compressed bytes; both ends must agree on them out of band.

pub use bit_reader::BitReader;
pub use bit_vector::BitVector;
pub use compressor::{compress, Compressor, CompressorConfig, PacketFlags};
pub use decompressor::{decompress, Decompressor, DecompressorConfig};
pub use errors::{ErrorKind, PktCompressError, PktCompressResult};

mod bit_reader;
mod bit_vector;
mod bit_writer;
mod bits;
mod compressor;
mod constants;
mod decode;
mod decompressor;
mod encode;
mod errors;
mod mask;
mod robustness;

#[cfg(test)]
mod tests;
