use crate::bit_vector::BitVector;
use crate::bit_writer::BitWriter;
use crate::bits;
use crate::constants::{BITS_TO_ENCODE_SHORT_COUNT, MAX_COUNT, MAX_SHORT_COUNT};
use crate::errors::{PktCompressError, PktCompressResult};

// The three primitive codes of the packet format. Values are written
// MSB-first; see the inverse functions in decode.rs.

/// Encodes a positive integer:
/// * 1 encodes as `0`,
/// * 2..=33 encode as `110` followed by 5 bits of (a - 2),
/// * larger values encode as `111` followed by an even number E of bits
///   of (a - 2), where E is the smallest width consistent with the
///   value's magnitude.
///
/// 0 has no encoding; the code `10` is the run-length terminator.
pub(crate) fn count_encode(writer: &mut BitWriter, a: usize) -> PktCompressResult<()> {
  if !(1..=MAX_COUNT).contains(&a) {
    return Err(PktCompressError::invalid_argument(format!(
      "COUNT value {} out of range [1, {}]",
      a, MAX_COUNT,
    )));
  }

  if a == 1 {
    writer.write_one(false);
  } else if a <= MAX_SHORT_COUNT {
    writer.write_usize(0b110, 3);
    writer.write_usize(a - 2, BITS_TO_ENCODE_SHORT_COUNT);
  } else {
    writer.write_usize(0b111, 3);
    let value = a - 2;
    let e = 2 * (bits::floor_log2(value) + 1) - 6;
    writer.write_usize(value, e);
  }
  Ok(())
}

/// Run-length encodes a sparse bit vector as a sequence of COUNT codes
/// followed by the terminator `10`.
///
/// Distances are measured from the end of the vector: the first code is
/// the gap from position `len` to the highest 1 bit, each further code
/// the gap down to the next 1 bit. An all-zero vector encodes to just
/// the terminator.
pub(crate) fn rle_encode(writer: &mut BitWriter, v: &BitVector) -> PktCompressResult<()> {
  let mut anchor = v.len();
  for pos in v.ones_desc() {
    count_encode(writer, anchor - pos)?;
    anchor = pos;
  }
  writer.write_usize(0b10, 2);
  Ok(())
}

/// Writes the bits of `data` at the 1 positions of `mask`, highest
/// position first.
pub(crate) fn bit_extract(writer: &mut BitWriter, data: &BitVector, mask: &BitVector) {
  debug_assert_eq!(data.len(), mask.len());
  for pos in mask.ones_desc() {
    writer.write_one(data.unchecked_get(pos));
  }
}

/// Writes the bits of `data` at the 1 positions of `mask`, lowest
/// position first. Used only for the positive-update sub-field of the
/// packet header.
pub(crate) fn bit_extract_forward(writer: &mut BitWriter, data: &BitVector, mask: &BitVector) {
  debug_assert_eq!(data.len(), mask.len());
  for pos in mask.ones_asc() {
    writer.write_one(data.unchecked_get(pos));
  }
}
