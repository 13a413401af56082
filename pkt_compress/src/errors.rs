use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The different kinds of errors for `pkt_compress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
  /// `Decode` errors occur during decompression, indicating the
  /// provided data is inconsistent with the packet format even though
  /// every read succeeded.
  Decode,
  /// `EndOfStream` errors occur during decompression, indicating
  /// the decompressor reached the end of the provided data before
  /// finishing a packet.
  EndOfStream,
  /// `InvalidArgument` errors usually occur during compression,
  /// indicating the parameters provided to a function were invalid.
  InvalidArgument,
  /// `OutOfBounds` errors indicate a bit index past the end of a
  /// vector. They are unreachable through the compressor and
  /// decompressor; they can only arise from direct `BitVector` use.
  OutOfBounds,
}

/// The error type used in results for all `pkt_compress` functionality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PktCompressError {
  pub kind: ErrorKind,
  pub message: String,
}

impl PktCompressError {
  pub(crate) fn new<S: AsRef<str>>(kind: ErrorKind, message: S) -> Self {
    PktCompressError {
      kind,
      message: message.as_ref().to_string(),
    }
  }

  pub(crate) fn decode<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::Decode, message)
  }

  pub(crate) fn end_of_stream<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::EndOfStream, message)
  }

  pub(crate) fn end_of_stream_recipe(
    name: &str,
    bits_to_read: usize,
    bit_idx: usize,
    total_bits: usize,
  ) -> Self {
    Self::end_of_stream(format!(
      "{}: cannot read {} bits at bit idx {} out of {}",
      name, bits_to_read, bit_idx, total_bits,
    ))
  }

  pub(crate) fn invalid_argument<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::InvalidArgument, message)
  }

  pub(crate) fn out_of_bounds(name: &str, idx: usize, len: usize) -> Self {
    Self::new(
      ErrorKind::OutOfBounds,
      format!("{}: bit idx {} out of bounds for length {}", name, idx, len),
    )
  }
}

impl Display for PktCompressError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "pkt_compress {:?} error: {}",
      self.kind, &self.message
    )
  }
}

impl Error for PktCompressError {}

pub type PktCompressResult<T> = Result<T, PktCompressError>;
