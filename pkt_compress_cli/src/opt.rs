use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Clone, Debug, StructOpt)]
#[structopt(
  name = "pktcompress",
  about = "CCSDS 124.0-B-1 (POCKET+) compression for fixed-length telemetry packets"
)]
pub struct Opt {
  /// Decompress instead of compress.
  #[structopt(short = "d")]
  pub decompress: bool,
  /// Input file. Output goes to <input>.pkt when compressing, or to
  /// <input>.depkt (replacing a trailing .pkt) when decompressing.
  pub input: PathBuf,
  /// Packet size in bytes (1-8192).
  pub packet_size: usize,
  /// When compressing: <new mask period> <send mask period>
  /// <uncompressed period> <robustness>. When decompressing:
  /// <robustness>.
  pub params: Vec<usize>,
}

pub struct CompressParams {
  pub new_mask_period: usize,
  pub send_mask_period: usize,
  pub uncompressed_period: usize,
  pub robustness: usize,
}

impl Opt {
  pub fn compress_params(&self) -> anyhow::Result<CompressParams> {
    match self.params[..] {
      [new_mask_period, send_mask_period, uncompressed_period, robustness] => {
        Ok(CompressParams {
          new_mask_period,
          send_mask_period,
          uncompressed_period,
          robustness,
        })
      }
      _ => Err(anyhow::anyhow!(
        "compression takes <input> <packet_size> <new mask period> <send mask period> <uncompressed period> <robustness>"
      )),
    }
  }

  pub fn decompress_robustness(&self) -> anyhow::Result<usize> {
    match self.params[..] {
      [robustness] => Ok(robustness),
      _ => Err(anyhow::anyhow!(
        "decompression takes -d <input> <packet_size> <robustness>"
      )),
    }
  }
}
