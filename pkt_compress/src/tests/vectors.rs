//! Byte-for-byte checks of the wire format against hand-packed
//! streams (packet length 8, robustness 1, periods 10/20/50 unless
//! noted).

use crate::bit_reader::BitReader;
use crate::bit_vector::BitVector;
use crate::{
  compress, decompress, Compressor, CompressorConfig, Decompressor, DecompressorConfig,
  PacketFlags,
};

fn config8() -> CompressorConfig {
  CompressorConfig::new(8)
}

#[test]
fn test_single_frame_wire_format() {
  // frame 0 carries the full mask and the verbatim packet:
  // 10        empty change window
  // 0001      effective robustness = R = 1
  // 0         full mask and verbatim packet follow
  // 1 10      mask present, horizontal XOR of zero mask
  // 1 11000110  verbatim marker, COUNT(8)
  // 10101010  the packet
  let compressed = compress(&[0xaa], &config8()).unwrap();
  assert_eq!(compressed, vec![0x85, 0xb8, 0xd5, 0x40]);

  let recovered = decompress(&compressed, &DecompressorConfig::new(8)).unwrap();
  assert_eq!(recovered, vec![0xaa]);
}

#[test]
fn test_identical_frames_wire_format() {
  // with R = 1, frames 0 and 1 are both in the init phase and carry
  // the packet verbatim, producing identical frame bytes
  let compressed = compress(&[0x55, 0x55], &config8()).unwrap();
  assert_eq!(
    compressed,
    vec![0x85, 0xb8, 0xca, 0xa0, 0x85, 0xb8, 0xca, 0xa0]
  );
}

#[test]
fn test_identical_frames_manual_flags() {
  // driving the second frame manually with all flags off shrinks it
  // to a 7-bit header: empty window, effective robustness 1, and the
  // both-flags-implied bit
  let mut compressor = Compressor::from_config(config8()).unwrap();
  let input = BitVector::from_bytes(&[0x55], 8).unwrap();

  let init = PacketFlags {
    new_mask_flag: false,
    send_mask_flag: true,
    uncompressed_flag: true,
  };
  compressor.compress_packet(&input, &init).unwrap();
  assert_eq!(compressor.drain_bytes(), vec![0x85, 0xb8, 0xca, 0xa0]);

  compressor
    .compress_packet(&input, &PacketFlags::default())
    .unwrap();
  let frame1 = compressor.drain_bytes();
  assert_eq!(frame1, vec![0x86]);

  // and it decodes against the previous output alone
  let mut decompressor = Decompressor::from_config(DecompressorConfig::new(8)).unwrap();
  let first = [0x85, 0xb8, 0xca, 0xa0];
  let mut reader = BitReader::from(&first[..]);
  assert_eq!(
    decompressor.decompress_packet(&mut reader).unwrap().to_bytes(),
    vec![0x55]
  );
  let mut reader = BitReader::from(&frame1[..]);
  assert_eq!(
    decompressor.decompress_packet(&mut reader).unwrap().to_bytes(),
    vec![0x55]
  );
}

#[test]
fn test_single_bit_flip_wire_format() {
  // frame 1 is still in the init phase but now transmits the one-bit
  // mask change: RLE of the window (010), effective robustness 0001,
  // no predictable-again positions (0), then the full mask as
  // RLE(M xor M<<1) over positions 6 and 7 (0010), and the verbatim
  // packet
  let compressed = compress(&[0x00, 0x01], &config8()).unwrap();
  assert_eq!(
    compressed,
    vec![0x85, 0xb8, 0xc0, 0x00, 0x42, 0x4b, 0x8c, 0x02]
  );

  let recovered = decompress(&compressed, &DecompressorConfig::new(8)).unwrap();
  assert_eq!(recovered, vec![0x00, 0x01]);
}

#[test]
fn test_quiet_stream_wire_format() {
  // all-zero input with R = 0: after the verbatim frame 0, each frame
  // is a 7-bit header whose effective robustness keeps growing by one
  // per quiet frame
  let config = config8().with_robustness(0);
  let compressed = compress(&[0x00; 5], &config).unwrap();
  assert_eq!(
    compressed,
    vec![0x81, 0xb8, 0xc0, 0x00, 0x86, 0x8a, 0x8e, 0x92]
  );

  let recovered =
    decompress(&compressed, &DecompressorConfig::new(8).with_robustness(0)).unwrap();
  assert_eq!(recovered, vec![0x00; 5]);
}

#[test]
fn test_effective_robustness_saturates_on_wire() {
  // 20 quiet frames with R = 0: the effective robustness field climbs
  // to 15 and stays there
  let config = config8().with_robustness(0);
  let compressed = compress(&[0x00; 20], &config).unwrap();
  // frame 15 onward: header 10 1111 1 -> 0xbe
  let tail = &compressed[compressed.len() - 3..];
  assert_eq!(tail, &[0xbe, 0xbe, 0xbe]);
}
