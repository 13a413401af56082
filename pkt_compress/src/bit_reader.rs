use crate::bits;
use crate::constants::{BYTES_PER_WORD, WORD_SIZE};
use crate::errors::{PktCompressError, PktCompressResult};

/// Wrapper around compressed data, enabling a
/// [`Decompressor`][crate::Decompressor] to read bit-level information
/// and maintain its position in the data.
///
/// It does this by converting the bytes into machine words up front and
/// maintaining
/// * an index into the words and
/// * a bit index from 0 to `usize::BITS` within the current word.
///
/// All reads are bounds-checked; reading past the end of the data
/// returns an `EndOfStream` error.
#[derive(Clone)]
pub struct BitReader {
  words: Vec<usize>,
  i: usize,
  j: usize,
  total_bits: usize,
}

impl From<&[u8]> for BitReader {
  fn from(bytes: &[u8]) -> Self {
    let n_words = bits::ceil_div(bytes.len(), BYTES_PER_WORD);
    let mut words = vec![0; n_words];
    for (i, &byte) in bytes.iter().enumerate() {
      let shift = WORD_SIZE - 8 - 8 * (i % BYTES_PER_WORD);
      words[i / BYTES_PER_WORD] |= (byte as usize) << shift;
    }

    BitReader {
      words,
      i: 0,
      j: 0,
      total_bits: 8 * bytes.len(),
    }
  }
}

impl BitReader {
  /// Returns the reader's current bit position.
  pub fn bit_idx(&self) -> usize {
    WORD_SIZE * self.i + self.j
  }

  /// Returns the number of bits between the reader's current position
  /// and the end.
  pub fn bits_remaining(&self) -> usize {
    self.total_bits - self.bit_idx()
  }

  fn refresh_if_needed(&mut self) {
    if self.j == WORD_SIZE {
      self.i += 1;
      self.j = 0;
    }
  }

  fn word(&self) -> usize {
    self.words.get(self.i).copied().unwrap_or(0)
  }

  fn end_of_stream_check(&self, name: &str, n: usize) -> PktCompressResult<()> {
    let bit_idx = self.bit_idx();
    if bit_idx + n > self.total_bits {
      Err(PktCompressError::end_of_stream_recipe(
        name,
        n,
        bit_idx,
        self.total_bits,
      ))
    } else {
      Ok(())
    }
  }

  /// Returns the next bit without consuming it.
  pub fn peek_one(&self) -> PktCompressResult<bool> {
    self.end_of_stream_check("peek_one", 1)?;
    if self.j == WORD_SIZE {
      Ok(bits::bit_from_word(
        self.words.get(self.i + 1).copied().unwrap_or(0),
        0,
      ))
    } else {
      Ok(bits::bit_from_word(self.word(), self.j))
    }
  }

  /// Returns the next bit and advances past it.
  pub fn read_one(&mut self) -> PktCompressResult<bool> {
    self.end_of_stream_check("read_one", 1)?;
    self.refresh_if_needed();

    let res = bits::bit_from_word(self.word(), self.j);
    self.j += 1;
    Ok(res)
  }

  /// Returns the next `n` bits packed MSB-first into a `usize`. `n`
  /// must be at most the word size.
  pub fn read_usize(&mut self, n: usize) -> PktCompressResult<usize> {
    debug_assert!(n <= WORD_SIZE);
    self.end_of_stream_check("read_usize", n)?;
    if n == 0 {
      return Ok(0);
    }

    self.refresh_if_needed();

    let n_plus_j = n + self.j;
    let masked = if self.j == 0 {
      self.word()
    } else {
      self.word() & (usize::MAX >> self.j)
    };
    if n_plus_j <= WORD_SIZE {
      self.j = n_plus_j;
      Ok(masked >> (WORD_SIZE - n_plus_j))
    } else {
      let remaining = n_plus_j - WORD_SIZE;
      self.i += 1;
      self.j = remaining;
      Ok((masked << remaining) | (self.word() >> (WORD_SIZE - remaining)))
    }
  }

  /// Advances to the next byte boundary, skipping any padding bits.
  /// Does nothing if the reader is already aligned.
  pub fn align_byte(&mut self) {
    self.j = bits::ceil_div(self.j, 8) * 8;
  }
}

#[cfg(test)]
mod tests {
  use super::BitReader;
  use crate::errors::{ErrorKind, PktCompressResult};

  #[test]
  fn test_bit_reader() -> PktCompressResult<()> {
    // bits: 1001 1010  0110 1011  0010 1101
    let bytes = [0x9a_u8, 0x6b, 0x2d];
    let mut reader = BitReader::from(&bytes[..]);
    assert_eq!(reader.read_usize(8)?, 0x9a);
    assert!(!reader.read_one()?);
    assert!(reader.read_one()?);
    assert!(reader.peek_one()?);
    assert!(reader.read_one()?);
    assert_eq!(reader.read_usize(5)?, 0b01011);
    assert_eq!(reader.bits_remaining(), 8);
    assert_eq!(reader.read_usize(8)?, 0x2d);
    assert_eq!(reader.bits_remaining(), 0);
    Ok(())
  }

  #[test]
  fn test_read_past_end() {
    let bytes = [0xff_u8];
    let mut reader = BitReader::from(&bytes[..]);
    reader.read_usize(8).unwrap();
    let err = reader.read_one().unwrap_err();
    assert_eq!(err.kind, ErrorKind::EndOfStream);
    let err = reader.read_usize(1).unwrap_err();
    assert_eq!(err.kind, ErrorKind::EndOfStream);
  }

  #[test]
  fn test_read_spanning_words() -> PktCompressResult<()> {
    let mut bytes = vec![0_u8; 16];
    bytes[7] = 0b0000_0011;
    bytes[8] = 0b1100_0000;
    let mut reader = BitReader::from(&bytes[..]);
    assert_eq!(reader.read_usize(60)?, 0);
    assert_eq!(reader.read_usize(8)?, 0b0011_1100);
    Ok(())
  }

  #[test]
  fn test_align_byte() -> PktCompressResult<()> {
    let bytes = [0b1010_0000_u8, 0xff];
    let mut reader = BitReader::from(&bytes[..]);
    assert!(reader.read_one()?);
    reader.align_byte();
    assert_eq!(reader.bit_idx(), 8);
    assert_eq!(reader.read_usize(8)?, 0xff);
    // aligning at a boundary is a no-op
    reader.align_byte();
    assert_eq!(reader.bits_remaining(), 0);
    Ok(())
  }
}
