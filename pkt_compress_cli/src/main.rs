use anyhow::Result;
use structopt::StructOpt;

use crate::opt::Opt;

mod compress;
mod decompress;
mod opt;
mod utils;

fn main() -> Result<()> {
  let opt = Opt::from_args();
  if opt.decompress {
    decompress::decompress(&opt)?;
  } else {
    compress::compress(&opt)?;
  }
  Ok(())
}
