use std::fs;

use anyhow::{anyhow, Context, Result};
use pkt_compress::DecompressorConfig;

use crate::opt::Opt;
use crate::utils;

pub fn decompress(opt: &Opt) -> Result<()> {
  let robustness = opt.decompress_robustness()?;
  utils::validate_packet_size(opt.packet_size)?;
  utils::validate_robustness(robustness)?;

  let input_data = fs::read(&opt.input)
    .with_context(|| format!("cannot open input file {:?}", opt.input))?;
  if input_data.is_empty() {
    return Err(anyhow!("input file is empty"));
  }

  let config = DecompressorConfig::new(opt.packet_size * 8).with_robustness(robustness);
  let output_data = pkt_compress::decompress(&input_data, &config)?;

  let output_path = utils::decompress_output_path(&opt.input);
  fs::write(&output_path, &output_data)
    .with_context(|| format!("cannot write output file {:?}", output_path))?;

  let num_packets = output_data.len() / opt.packet_size;
  let expansion = output_data.len() as f64 / input_data.len() as f64;
  println!(
    "Input:       {:?} ({} bytes)",
    opt.input,
    input_data.len(),
  );
  println!(
    "Output:      {:?} ({} bytes, {} packets)",
    output_path,
    output_data.len(),
    num_packets,
  );
  println!("Expansion:   {:.2}x", expansion);
  println!(
    "Parameters:  packet_size={}, R={}",
    opt.packet_size, robustness,
  );
  Ok(())
}
