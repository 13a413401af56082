use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

pub const MAX_PACKET_SIZE_BYTES: usize = 8192;
pub const MAX_ROBUSTNESS: usize = 7;

pub fn validate_packet_size(packet_size: usize) -> Result<()> {
  if packet_size == 0 || packet_size > MAX_PACKET_SIZE_BYTES {
    return Err(anyhow!(
      "packet size must be 1-{} bytes, got {}",
      MAX_PACKET_SIZE_BYTES,
      packet_size,
    ));
  }
  Ok(())
}

pub fn validate_robustness(robustness: usize) -> Result<()> {
  if robustness > MAX_ROBUSTNESS {
    return Err(anyhow!(
      "robustness must be 0-{}, got {}",
      MAX_ROBUSTNESS,
      robustness,
    ));
  }
  Ok(())
}

pub fn compress_output_path(input: &Path) -> PathBuf {
  let mut name = input.as_os_str().to_owned();
  name.push(".pkt");
  PathBuf::from(name)
}

/// Strips a trailing `.pkt` if present, then appends `.depkt`.
pub fn decompress_output_path(input: &Path) -> PathBuf {
  let s = input.to_string_lossy();
  let base = s.strip_suffix(".pkt").unwrap_or(&s);
  PathBuf::from(format!("{}.depkt", base))
}
