use crate::constants::WORD_SIZE;

pub const BASE_BIT_MASK: usize = 1 << (WORD_SIZE - 1);

pub fn bit_from_word(word: usize, j: usize) -> bool {
  (word & (BASE_BIT_MASK >> j)) > 0
}

pub fn ceil_div(x: usize, divisor: usize) -> usize {
  (x + divisor - 1) / divisor
}

// x must be positive
pub fn floor_log2(x: usize) -> usize {
  (usize::BITS - 1 - x.leading_zeros()) as usize
}

pub fn words_to_bytes(words: &[usize]) -> Vec<u8> {
  // We can't just transmute because many machines are little-endian.
  words
    .iter()
    .flat_map(|w| w.to_be_bytes())
    .collect::<Vec<_>>()
}
