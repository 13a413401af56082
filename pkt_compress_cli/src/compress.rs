use std::fs;

use anyhow::{anyhow, Context, Result};
use pkt_compress::CompressorConfig;

use crate::opt::Opt;
use crate::utils;

pub fn compress(opt: &Opt) -> Result<()> {
  let params = opt.compress_params()?;
  utils::validate_packet_size(opt.packet_size)?;
  utils::validate_robustness(params.robustness)?;
  for (name, period) in [
    ("new mask period", params.new_mask_period),
    ("send mask period", params.send_mask_period),
    ("uncompressed period", params.uncompressed_period),
  ] {
    if period == 0 {
      return Err(anyhow!("{} must be positive", name));
    }
  }

  let input_data = fs::read(&opt.input)
    .with_context(|| format!("cannot open input file {:?}", opt.input))?;
  if input_data.is_empty() {
    return Err(anyhow!("input file is empty"));
  }
  if input_data.len() % opt.packet_size != 0 {
    return Err(anyhow!(
      "input size ({}) not divisible by packet size ({})",
      input_data.len(),
      opt.packet_size,
    ));
  }

  let config = CompressorConfig::new(opt.packet_size * 8)
    .with_robustness(params.robustness)
    .with_new_mask_period(params.new_mask_period)
    .with_send_mask_period(params.send_mask_period)
    .with_uncompressed_period(params.uncompressed_period);
  let output_data = pkt_compress::compress(&input_data, &config)?;

  let output_path = utils::compress_output_path(&opt.input);
  fs::write(&output_path, &output_data)
    .with_context(|| format!("cannot write output file {:?}", output_path))?;

  let num_packets = input_data.len() / opt.packet_size;
  let ratio = input_data.len() as f64 / output_data.len() as f64;
  println!(
    "Input:       {:?} ({} bytes, {} packets)",
    opt.input,
    input_data.len(),
    num_packets,
  );
  println!(
    "Output:      {:?} ({} bytes)",
    output_path,
    output_data.len(),
  );
  println!("Ratio:       {:.2}x", ratio);
  println!(
    "Parameters:  R={}, pt={}, ft={}, rt={}",
    params.robustness,
    params.new_mask_period,
    params.send_mask_period,
    params.uncompressed_period,
  );
  Ok(())
}
