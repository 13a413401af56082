use crate::bit_reader::BitReader;
use crate::bit_vector::BitVector;
use crate::bits;
use crate::constants::{BITS_TO_ENCODE_SHORT_COUNT, MAX_COUNT, MAX_WIDE_COUNT_BITS};
use crate::errors::{PktCompressError, PktCompressResult};

// Inverses of the primitive codes in encode.rs.

/// Decodes a COUNT code. Returns the encoded value in [1, 65535], or 0
/// for the run-length terminator `10`.
pub(crate) fn count_decode(reader: &mut BitReader) -> PktCompressResult<usize> {
  if !reader.read_one()? {
    return Ok(1);
  }
  if !reader.read_one()? {
    // terminator
    return Ok(0);
  }
  if !reader.read_one()? {
    return Ok(reader.read_usize(BITS_TO_ENCODE_SHORT_COUNT)? + 2);
  }

  // Wide form: the field width E is not transmitted, but it is a
  // function of the value's magnitude. Read the minimum 6 bits, then
  // widen 2 bits at a time until the width matches the value read so
  // far. Each widening quadruples the value while the implied width
  // grows by 2, so a well-formed code converges; a malformed one runs
  // into the 26-bit ceiling.
  let mut e = 6;
  let mut value = reader.read_usize(6)?;
  loop {
    let implied_e = if value == 0 {
      0
    } else {
      2 * (bits::floor_log2(value) as i64 + 1) - 6
    };
    if implied_e == e as i64 {
      break;
    }
    if e >= MAX_WIDE_COUNT_BITS {
      return Err(PktCompressError::decode(format!(
        "COUNT code inconsistent at maximum width of {} bits",
        MAX_WIDE_COUNT_BITS,
      )));
    }
    e += 2;
    value = (value << 2) | reader.read_usize(2)?;
  }

  let a = value + 2;
  if a > MAX_COUNT {
    return Err(PktCompressError::decode(format!(
      "COUNT value {} exceeds maximum of {}",
      a, MAX_COUNT,
    )));
  }
  Ok(a)
}

/// Decodes a run-length encoded bit vector into `dst`, which supplies
/// the length. Each COUNT moves the position toward the start of the
/// vector; the terminator ends the code. Positions never written stay
/// zero.
pub(crate) fn rle_decode(reader: &mut BitReader, dst: &mut BitVector) -> PktCompressResult<()> {
  dst.clear();
  let mut pos = dst.len();
  loop {
    let count = count_decode(reader)?;
    if count == 0 {
      return Ok(());
    }
    if count > pos {
      return Err(PktCompressError::decode(format!(
        "run length {} underflows remaining span of {} bits",
        count, pos,
      )));
    }
    pos -= count;
    dst.unchecked_set(pos, true);
  }
}

/// Reads one bit per 1 position of `mask`, highest position first, and
/// stores each into `data`. Inverse of `bit_extract`.
pub(crate) fn bit_insert(
  reader: &mut BitReader,
  data: &mut BitVector,
  mask: &BitVector,
) -> PktCompressResult<()> {
  debug_assert_eq!(data.len(), mask.len());
  for pos in mask.ones_desc() {
    let b = reader.read_one()?;
    data.unchecked_set(pos, b);
  }
  Ok(())
}

/// Reads one bit per 1 position of `mask`, lowest position first, and
/// stores each into `data`. Inverse of `bit_extract_forward`.
pub(crate) fn bit_insert_forward(
  reader: &mut BitReader,
  data: &mut BitVector,
  mask: &BitVector,
) -> PktCompressResult<()> {
  debug_assert_eq!(data.len(), mask.len());
  for pos in mask.ones_asc() {
    let b = reader.read_one()?;
    data.unchecked_set(pos, b);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bit_writer::BitWriter;
  use crate::encode::{bit_extract, count_encode, rle_encode};
  use crate::errors::ErrorKind;

  fn reader_over(bytes: &[u8]) -> BitReader {
    BitReader::from(bytes)
  }

  #[test]
  fn test_count_decode_one_and_terminator() {
    let mut reader = reader_over(&[0b0_10_00000]);
    assert_eq!(count_decode(&mut reader).unwrap(), 1);
    assert_eq!(count_decode(&mut reader).unwrap(), 0);
  }

  #[test]
  fn test_count_decode_short_form() {
    let mut reader = reader_over(&[0b1100_0000]);
    assert_eq!(count_decode(&mut reader).unwrap(), 2);
    let mut reader = reader_over(&[0b1101_1111]);
    assert_eq!(count_decode(&mut reader).unwrap(), 33);
  }

  #[test]
  fn test_count_decode_wide_form() {
    let mut reader = reader_over(&[0b1111_0000, 0b0000_0000]);
    assert_eq!(count_decode(&mut reader).unwrap(), 34);
  }

  #[test]
  fn test_count_round_trip() {
    for a in (1..200).chain([1000, 4095, 4096, 65534, 65535]) {
      let mut writer = BitWriter::default();
      count_encode(&mut writer, a).unwrap();
      let bytes = writer.drain_bytes();
      let mut reader = reader_over(&bytes);
      assert_eq!(count_decode(&mut reader).unwrap(), a, "a={}", a);
    }
  }

  #[test]
  fn test_count_decode_runaway_code() {
    // '111' followed by zeros never matches any width
    let bytes = vec![0b1110_0000, 0, 0, 0, 0];
    let mut reader = reader_over(&bytes);
    let err = count_decode(&mut reader).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Decode);
  }

  #[test]
  fn test_count_decode_end_of_stream() {
    // wide form promises at least 6 value bits but only 5 remain
    let mut reader = reader_over(&[0b1110_0000]);
    let err = count_decode(&mut reader).unwrap_err();
    assert_eq!(err.kind, ErrorKind::EndOfStream);
  }

  #[test]
  fn test_rle_decode_all_zeros() {
    let mut reader = reader_over(&[0b1000_0000]);
    let mut v = BitVector::new(8);
    rle_decode(&mut reader, &mut v).unwrap();
    assert_eq!(v.hamming_weight(), 0);
  }

  #[test]
  fn test_rle_decode_overwrites_dst() {
    let mut reader = reader_over(&[0b1000_0000]);
    let mut v = BitVector::from_bytes(&[0xff], 8).unwrap();
    rle_decode(&mut reader, &mut v).unwrap();
    assert_eq!(v.hamming_weight(), 0);
  }

  #[test]
  fn test_rle_round_trip() {
    let cases: Vec<(usize, Vec<usize>)> = vec![
      (8, vec![]),
      (8, vec![7]),
      (8, vec![0]),
      (8, vec![0, 1, 2, 3, 4, 5, 6, 7]),
      (1, vec![0]),
      (720, vec![0, 100, 512, 719]),
      (65, vec![63, 64]),
    ];
    for (len, positions) in cases {
      let mut v = BitVector::new(len);
      for &p in &positions {
        v.set(p, true).unwrap();
      }
      let mut writer = BitWriter::default();
      rle_encode(&mut writer, &v).unwrap();
      let bytes = writer.drain_bytes();

      let mut reader = reader_over(&bytes);
      let mut decoded = BitVector::new(len);
      rle_decode(&mut reader, &mut decoded).unwrap();
      assert_eq!(decoded, v, "len={} positions={:?}", len, positions);
    }
  }

  #[test]
  fn test_rle_decode_underflow() {
    // COUNT(9) against an 8-bit vector
    let mut writer = BitWriter::default();
    count_encode(&mut writer, 9).unwrap();
    writer.write_usize(0b10, 2);
    let bytes = writer.drain_bytes();

    let mut reader = reader_over(&bytes);
    let mut v = BitVector::new(8);
    let err = rle_decode(&mut reader, &mut v).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Decode);
  }

  #[test]
  fn test_bit_insert_round_trip() {
    let data = BitVector::from_bytes(&[0b1011_0011, 0b0100_1110], 16).unwrap();
    let mask = BitVector::from_bytes(&[0b0110_1010, 0b1000_0111], 16).unwrap();

    let mut writer = BitWriter::default();
    bit_extract(&mut writer, &data, &mask);
    let bytes = writer.drain_bytes();

    let mut reader = reader_over(&bytes);
    let mut restored = BitVector::new(16);
    bit_insert(&mut reader, &mut restored, &mask).unwrap();

    for i in 0..16 {
      if mask.get(i).unwrap() {
        assert_eq!(restored.get(i).unwrap(), data.get(i).unwrap(), "i={}", i);
      } else {
        assert!(!restored.get(i).unwrap());
      }
    }
  }

  #[test]
  fn test_bit_insert_forward_reads_in_order() {
    // bits 1, 0 land at mask positions 0 and 2 respectively
    let mask = BitVector::from_bytes(&[0b1010_0000], 8).unwrap();
    let mut reader = reader_over(&[0b1000_0000]);
    let mut data = BitVector::new(8);
    bit_insert_forward(&mut reader, &mut data, &mask).unwrap();
    assert!(data.get(0).unwrap());
    assert!(!data.get(2).unwrap());
  }

  #[test]
  fn test_bit_insert_end_of_stream() {
    let mask = BitVector::from_bytes(&[0xff], 8).unwrap();
    let mut reader = reader_over(&[]);
    let mut data = BitVector::new(8);
    let err = bit_insert(&mut reader, &mut data, &mask).unwrap_err();
    assert_eq!(err.kind, ErrorKind::EndOfStream);
  }
}
