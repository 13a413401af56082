// Ring buffer sizes are fixed by the packet format: the effective
// robustness field is 4 bits, so at most 15 past iterations ever matter.
pub const CHANGE_HISTORY_SIZE: usize = 16;
pub const FLAG_HISTORY_SIZE: usize = 16;

pub const MAX_ROBUSTNESS: usize = 7;
pub const MAX_EFFECTIVE_ROBUSTNESS: usize = 15;
pub const BITS_TO_ENCODE_EFFECTIVE_ROBUSTNESS: usize = 4;

// COUNT codes cover [1, 65535]; 0 is structurally reserved for the RLE
// terminator. Packet length must itself be COUNT-encodable.
pub const MAX_COUNT: usize = 65535;
pub const MAX_PACKET_LENGTH: usize = MAX_COUNT;
pub const MAX_SHORT_COUNT: usize = 33;
pub const BITS_TO_ENCODE_SHORT_COUNT: usize = 5;
// Widest BIT_E field: E = 2 * (floor(log2(65533)) + 1) - 6.
pub const MAX_WIDE_COUNT_BITS: usize = 26;

pub const WORD_SIZE: usize = usize::BITS as usize;
pub const BYTES_PER_WORD: usize = WORD_SIZE / 8;
