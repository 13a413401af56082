use crate::bit_vector::BitVector;
use crate::bit_writer::BitWriter;
use crate::bits;
use crate::constants::{
  BITS_TO_ENCODE_EFFECTIVE_ROBUSTNESS, MAX_PACKET_LENGTH, MAX_ROBUSTNESS,
};
use crate::encode::{bit_extract, bit_extract_forward, count_encode, rle_encode};
use crate::errors::{PktCompressError, PktCompressResult};
use crate::mask::MaskUpdater;
use crate::robustness::RobustnessWindow;

/// All configurations available for a compressor.
///
/// The packet length and robustness must match between a compressor
/// and the decompressor reading its output; they are not stored in the
/// compressed bytes. The three periods only shape which frames carry
/// redundant information, so they do not need to match anything.
#[derive(Clone, Debug)]
pub struct CompressorConfig {
  /// Length of every input packet in bits, from 1 to 65535.
  pub packet_length: usize,
  /// `robustness` ranges from 0 to 7 inclusive (default 1).
  ///
  /// A decompressor can miss up to this many consecutive packets and
  /// still track the mask, because each packet retransmits the mask
  /// changes of the previous `robustness` packets. Higher values cost
  /// a little output size per frame.
  pub robustness: usize,
  /// Every `new_mask_period` frames the mask is rebuilt from recently
  /// observed changes, letting it forget positions that went quiet
  /// (default 10).
  pub new_mask_period: usize,
  /// Every `send_mask_period` frames the full mask is transmitted,
  /// re-anchoring decompressors that lost track of it (default 20).
  pub send_mask_period: usize,
  /// Every `uncompressed_period` frames the packet is transmitted
  /// verbatim, re-anchoring the prediction base (default 50).
  pub uncompressed_period: usize,
  /// Optional initial mask; positions set here are treated as
  /// unpredictable from the first frame. Must have `packet_length`
  /// bits. Defaults to all zeros.
  pub initial_mask: Option<BitVector>,
}

impl CompressorConfig {
  pub fn new(packet_length: usize) -> Self {
    Self {
      packet_length,
      robustness: 1,
      new_mask_period: 10,
      send_mask_period: 20,
      uncompressed_period: 50,
      initial_mask: None,
    }
  }

  /// Sets [`robustness`][CompressorConfig::robustness].
  pub fn with_robustness(mut self, robustness: usize) -> Self {
    self.robustness = robustness;
    self
  }

  /// Sets [`new_mask_period`][CompressorConfig::new_mask_period].
  pub fn with_new_mask_period(mut self, period: usize) -> Self {
    self.new_mask_period = period;
    self
  }

  /// Sets [`send_mask_period`][CompressorConfig::send_mask_period].
  pub fn with_send_mask_period(mut self, period: usize) -> Self {
    self.send_mask_period = period;
    self
  }

  /// Sets [`uncompressed_period`][CompressorConfig::uncompressed_period].
  pub fn with_uncompressed_period(mut self, period: usize) -> Self {
    self.uncompressed_period = period;
    self
  }

  /// Sets [`initial_mask`][CompressorConfig::initial_mask].
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
    for (name, period) in [
      ("new_mask_period", self.new_mask_period),
      ("send_mask_period", self.send_mask_period),
      ("uncompressed_period", self.uncompressed_period),
    ] {
      if period == 0 {
        return Err(PktCompressError::invalid_argument(format!(
          "{} must be positive",
          name,
        )));
      }
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

/// Per-frame control flags.
///
/// [`Compressor::next_flags`] produces these from the configured
/// periods; callers driving frames manually can set them directly.
/// The decompressor learns all three from the bitstream, so no
/// coordination is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PacketFlags {
  /// Rebuild the mask from the accumulated build vector this frame.
  pub new_mask_flag: bool,
  /// Transmit the full mask this frame.
  pub send_mask_flag: bool,
  /// Transmit the packet verbatim this frame.
  pub uncompressed_flag: bool,
}

impl PacketFlags {
  const INIT: PacketFlags = PacketFlags {
    new_mask_flag: false,
    send_mask_flag: true,
    uncompressed_flag: true,
  };
}

/// Converts fixed-length packets into compressed bytes.
///
/// ```
/// use pkt_compress::{Compressor, CompressorConfig, BitVector};
///
/// let config = CompressorConfig::new(16).with_robustness(0);
/// let mut compressor = Compressor::from_config(config).unwrap();
/// for packet in [[0x12, 0x34], [0x12, 0x35]] {
///   let input = BitVector::from_bytes(&packet, 16).unwrap();
///   let flags = compressor.next_flags();
///   compressor.compress_packet(&input, &flags).unwrap();
/// }
/// let bytes = compressor.drain_bytes();
/// assert!(!bytes.is_empty());
/// ```
#[derive(Debug)]
pub struct Compressor {
  packet_length: usize,
  robustness: usize,
  mask_updater: MaskUpdater,
  window: RobustnessWindow,
  writer: BitWriter,
  xt: BitVector,
  extraction: BitVector,
  scratch: BitVector,
  t: usize,
  new_mask_period: usize,
  send_mask_period: usize,
  uncompressed_period: usize,
  new_mask_counter: usize,
  send_mask_counter: usize,
  uncompressed_counter: usize,
}

impl Compressor {
  pub fn from_config(config: CompressorConfig) -> PktCompressResult<Self> {
    config.validate()?;
    let f = config.packet_length;
    Ok(Compressor {
      packet_length: f,
      robustness: config.robustness,
      mask_updater: MaskUpdater::new(f, config.initial_mask.as_ref()),
      window: RobustnessWindow::new(f, config.robustness),
      writer: BitWriter::default(),
      xt: BitVector::new(f),
      extraction: BitVector::new(f),
      scratch: BitVector::new(f),
      t: 0,
      new_mask_period: config.new_mask_period,
      send_mask_period: config.send_mask_period,
      uncompressed_period: config.uncompressed_period,
      new_mask_counter: config.new_mask_period,
      send_mask_counter: config.send_mask_period,
      uncompressed_counter: config.uncompressed_period,
    })
  }

  /// Returns the flags the configured periods call for on the next
  /// frame and ticks the countdown counters. Call exactly once per
  /// frame, before [`compress_packet`][Self::compress_packet].
  ///
  /// The first frame, and every frame up to the robustness level, is
  /// forced to carry the full mask and the verbatim packet so that a
  /// decompressor can start from nothing; the counters keep ticking
  /// underneath the override.
  pub fn next_flags(&mut self) -> PacketFlags {
    if self.t == 0 {
      return PacketFlags::INIT;
    }

    let mut flags = PacketFlags::default();
    if self.send_mask_counter == 1 {
      flags.send_mask_flag = true;
      self.send_mask_counter = self.send_mask_period;
    } else {
      self.send_mask_counter -= 1;
    }
    if self.new_mask_counter == 1 {
      flags.new_mask_flag = true;
      self.new_mask_counter = self.new_mask_period;
    } else {
      self.new_mask_counter -= 1;
    }
    if self.uncompressed_counter == 1 {
      flags.uncompressed_flag = true;
      self.uncompressed_counter = self.uncompressed_period;
    } else {
      self.uncompressed_counter -= 1;
    }

    if self.t <= self.robustness {
      flags = PacketFlags::INIT;
    }
    flags
  }

  /// Compresses one packet onto the internal byte stream. `input` must
  /// have exactly the configured packet length.
  pub fn compress_packet(
    &mut self,
    input: &BitVector,
    flags: &PacketFlags,
  ) -> PktCompressResult<()> {
    if input.len() != self.packet_length {
      return Err(PktCompressError::invalid_argument(format!(
        "input packet has {} bits but packet length is {}",
        input.len(),
        self.packet_length,
      )));
    }

    self.mask_updater.update(input, flags.new_mask_flag, self.t);
    self.window.record_change(self.mask_updater.change());
    self
      .window
      .window_into(&mut self.xt, self.mask_updater.change(), self.t);
    let effective = self.window.effective_robustness(self.t);
    let repeated =
      self
        .window
        .repeated_new_mask(effective, flags.new_mask_flag, self.t);
    let implied = !flags.send_mask_flag && !flags.uncompressed_flag;
    let mask = self.mask_updater.mask();

    // header: window, effective robustness, update direction bits
    rle_encode(&mut self.writer, &self.xt)?;
    self
      .writer
      .write_usize(effective, BITS_TO_ENCODE_EFFECTIVE_ROBUSTNESS);
    if effective > 0 && self.xt.hamming_weight() > 0 {
      let positive = has_positive_transitions(&self.xt, mask);
      self.writer.write_one(positive);
      if positive {
        // one direction bit per windowed position: 1 where the mask
        // bit is now 0
        self.scratch.copy_from(mask);
        self.scratch.invert();
        bit_extract_forward(&mut self.writer, &self.scratch, &self.xt);
        self.writer.write_one(repeated);
      }
    }
    self.writer.write_one(implied);

    // optional full mask
    if !implied {
      if flags.send_mask_flag {
        self.writer.write_one(true);
        // horizontal XOR turns runs in the mask into sparse edges
        self.scratch.copy_from(mask);
        self.scratch.shift_left();
        self.scratch.xor_with(mask);
        rle_encode(&mut self.writer, &self.scratch)?;
      } else {
        self.writer.write_one(false);
      }
    }

    // payload: verbatim packet, or just the unpredictable bits
    if flags.uncompressed_flag {
      self.writer.write_one(true);
      count_encode(&mut self.writer, self.packet_length)?;
      self.writer.write_bitvector(input);
    } else {
      if !implied {
        self.writer.write_one(false);
      }
      self.extraction.copy_from(mask);
      if repeated && effective > 0 {
        self.extraction.or_with(&self.xt);
      }
      bit_extract(&mut self.writer, input, &self.extraction);
    }

    self.window.advance(flags.new_mask_flag);
    self.t += 1;
    self.writer.finish_byte();
    Ok(())
  }

  /// Returns the bytes compressed so far and resets the byte stream
  /// (but not the codec state).
  pub fn drain_bytes(&mut self) -> Vec<u8> {
    self.writer.drain_bytes()
  }

  /// Returns the number of bytes so far produced.
  pub fn byte_size(&self) -> usize {
    self.writer.byte_size()
  }

  /// Returns the compressor to its initial state, discarding any
  /// undrained output. Existing buffers are reused.
  pub fn reset(&mut self) {
    self.mask_updater.reset();
    self.window.reset();
    self.writer = BitWriter::default();
    self.t = 0;
    self.new_mask_counter = self.new_mask_period;
    self.send_mask_counter = self.send_mask_period;
    self.uncompressed_counter = self.uncompressed_period;
  }
}

// any position in the window where the mask bit is 0, i.e. an
// unpredictable position became predictable again
fn has_positive_transitions(window: &BitVector, mask: &BitVector) -> bool {
  window
    .words()
    .iter()
    .zip(mask.words().iter())
    .any(|(&x, &m)| x & !m != 0)
}

/// Compresses a stream of back-to-back packets.
///
/// `data` must be a whole number of packets, each `ceil(packet_length
/// / 8)` bytes. Frames are scheduled with the configured periods; see
/// [`Compressor::next_flags`].
pub fn compress(data: &[u8], config: &CompressorConfig) -> PktCompressResult<Vec<u8>> {
  let mut compressor = Compressor::from_config(config.clone())?;
  let packet_bytes = bits::ceil_div(config.packet_length, 8);
  if data.len() % packet_bytes != 0 {
    return Err(PktCompressError::invalid_argument(format!(
      "input of {} bytes is not a multiple of the {}-byte packet size",
      data.len(),
      packet_bytes,
    )));
  }

  for chunk in data.chunks(packet_bytes) {
    let input = BitVector::from_bytes(chunk, config.packet_length)?;
    let flags = compressor.next_flags();
    compressor.compress_packet(&input, &flags)?;
  }
  Ok(compressor.drain_bytes())
}
