use crate::bit_reader::BitReader;
use crate::bit_vector::BitVector;
use crate::constants::{
  BITS_TO_ENCODE_EFFECTIVE_ROBUSTNESS, MAX_PACKET_LENGTH, MAX_ROBUSTNESS,
};
use crate::decode::{bit_insert, count_decode, rle_decode};
use crate::errors::{PktCompressError, PktCompressResult};

/// All configurations available for a decompressor.
///
/// `packet_length` and `initial_mask` must match the compressor's;
/// neither is stored in the compressed bytes.
#[derive(Clone, Debug)]
pub struct DecompressorConfig {
  /// Length of every output packet in bits, from 1 to 65535.
  pub packet_length: usize,
  /// The compressor's robustness level, 0 to 7 inclusive (default 1).
  ///
  /// Only checked for range; the per-frame effective robustness is
  /// read from the bitstream.
  pub robustness: usize,
  /// Optional initial mask; must match the compressor's. Defaults to
  /// all zeros.
  pub initial_mask: Option<BitVector>,
}

impl DecompressorConfig {
  pub fn new(packet_length: usize) -> Self {
    Self {
      packet_length,
      robustness: 1,
      initial_mask: None,
    }
  }

  /// Sets [`robustness`][DecompressorConfig::robustness].
  pub fn with_robustness(mut self, robustness: usize) -> Self {
    self.robustness = robustness;
    self
  }

  /// Sets [`initial_mask`][DecompressorConfig::initial_mask].
  pub fn with_initial_mask(mut self, initial_mask: BitVector) -> Self {
    self.initial_mask = Some(initial_mask);
    self
  }

  pub(crate) fn validate(&self) -> PktCompressResult<()> {
    if self.packet_length == 0 || self.packet_length > MAX_PACKET_LENGTH {
      return Err(PktCompressError::invalid_argument(format!(
        "packet length must be in [1, {}], got {}",
        MAX_PACKET_LENGTH, self.packet_length,
      )));
    }
    if self.robustness > MAX_ROBUSTNESS {
      return Err(PktCompressError::invalid_argument(format!(
        "robustness must be in [0, {}], got {}",
        MAX_ROBUSTNESS, self.robustness,
      )));
    }
    if let Some(m0) = &self.initial_mask {
      if m0.len() != self.packet_length {
        return Err(PktCompressError::invalid_argument(format!(
          "initial mask has {} bits but packet length is {}",
          m0.len(),
          self.packet_length,
        )));
      }
    }
    Ok(())
  }
}

/// Converts compressed bytes back into fixed-length packets.
///
/// The decompressor mirrors the compressor's mask by replaying the
/// transmitted mask changes, then fills each output packet from the
/// previous one plus the explicitly transmitted bits.
#[derive(Debug)]
pub struct Decompressor {
  packet_length: usize,
  mask: BitVector,
  initial_mask: BitVector,
  prev_output: BitVector,
  output: BitVector,
  // positions the current frame reported as newly predictable; they
  // still carry payload bits this frame
  positive: BitVector,
  xt: BitVector,
  extraction: BitVector,
  t: usize,
}

impl Decompressor {
  pub fn from_config(config: DecompressorConfig) -> PktCompressResult<Self> {
    config.validate()?;
    let f = config.packet_length;
    let mut mask = BitVector::new(f);
    let mut initial_mask = BitVector::new(f);
    if let Some(m0) = &config.initial_mask {
      mask.copy_from(m0);
      initial_mask.copy_from(m0);
    }
    Ok(Decompressor {
      packet_length: f,
      mask,
      initial_mask,
      prev_output: BitVector::new(f),
      output: BitVector::new(f),
      positive: BitVector::new(f),
      xt: BitVector::new(f),
      extraction: BitVector::new(f),
      t: 0,
    })
  }

  /// Parses one packet from `reader` and returns the reconstructed
  /// output. The reader must be positioned at a packet start; the
  /// caller re-aligns it to a byte boundary between packets.
  pub fn decompress_packet(&mut self, reader: &mut BitReader) -> PktCompressResult<&BitVector> {
    self.output.copy_from(&self.prev_output);
    self.positive.clear();

    // header: mask changes within the robustness window
    rle_decode(reader, &mut self.xt)?;
    let effective = reader.read_usize(BITS_TO_ENCODE_EFFECTIVE_ROBUSTNESS)?;
    let mut repeated = false;
    let changed = self.xt.hamming_weight() > 0;

    if effective > 0 && changed {
      if reader.read_one()? {
        // direction bit per windowed position: 1 clears the mask bit
        for pos in self.xt.ones_asc() {
          if reader.read_one()? {
            self.mask.unchecked_set(pos, false);
            self.positive.unchecked_set(pos, true);
          } else {
            self.mask.unchecked_set(pos, true);
          }
        }
        repeated = reader.read_one()?;
      } else {
        // all windowed positions became unpredictable
        self.mask.or_with(&self.xt);
      }
    } else if effective == 0 && changed {
      if self.t == 0 {
        // the first frame's change is measured against an empty mask
        self.mask.copy_from(&self.xt);
      } else {
        self.mask.xor_with(&self.xt);
      }
    }

    let implied = reader.read_one()?;

    // optional full mask
    let mut uncompressed = false;
    if !implied {
      if reader.read_one()? {
        // sent as horizontal XOR; undo it from the last bit upward
        rle_decode(reader, &mut self.extraction)?;
        let last = self.packet_length - 1;
        let mut current = self.extraction.unchecked_get(last);
        self.mask.unchecked_set(last, current);
        for i in (0..last).rev() {
          current ^= self.extraction.unchecked_get(i);
          self.mask.unchecked_set(i, current);
        }
      }
      uncompressed = reader.read_one()?;
    }

    // payload
    if uncompressed {
      let count = count_decode(reader)?;
      if count != self.packet_length {
        return Err(PktCompressError::decode(format!(
          "verbatim packet declares {} bits but packet length is {}",
          count, self.packet_length,
        )));
      }
      for i in 0..self.packet_length {
        let b = reader.read_one()?;
        self.output.unchecked_set(i, b);
      }
    } else {
      self.extraction.copy_from(&self.mask);
      if repeated && effective > 0 {
        self.extraction.or_with(&self.positive);
      }
      bit_insert(reader, &mut self.output, &self.extraction)?;
    }

    self.prev_output.copy_from(&self.output);
    self.t += 1;
    Ok(&self.output)
  }

  /// Returns the number of packets decompressed so far.
  pub fn packets_decoded(&self) -> usize {
    self.t
  }

  /// Returns the decompressor to its initial state. Existing buffers
  /// are reused.
  pub fn reset(&mut self) {
    self.mask.copy_from(&self.initial_mask);
    self.prev_output.clear();
    self.output.clear();
    self.positive.clear();
    self.t = 0;
  }
}

/// Decompresses a stream produced by [`compress`][crate::compress]
/// with a matching configuration. Packets are parsed back to back,
/// re-aligning to a byte boundary after each, until the input is
/// exhausted.
pub fn decompress(data: &[u8], config: &DecompressorConfig) -> PktCompressResult<Vec<u8>> {
  let mut decompressor = Decompressor::from_config(config.clone())?;
  let mut reader = BitReader::from(data);
  let mut res = Vec::new();
  while reader.bits_remaining() > 0 {
    let output = decompressor.decompress_packet(&mut reader)?;
    res.extend(output.to_bytes());
    reader.align_byte();
  }
  Ok(res)
}
