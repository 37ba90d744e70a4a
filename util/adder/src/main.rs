//! CLI tool for generating small adder circuit descriptions.

use std::fs;
use std::path::PathBuf;

use adder::{MAX_BITS, generate_adder};
use anyhow::{Context, Result};
use clap::Parser;
use tcsol_builder as _;
use tcsol_types as _;
#[cfg(test)]
use tcsol_verify as _;

#[derive(Parser)]
#[command(name = "adder")]
#[command(about = "Generate a ripple-carry adder circuit description", long_about = None)]
struct Args {
    /// Number of bits for each operand
    #[arg(value_parser = clap::value_parser!(u8).range(1..=MAX_BITS as i64))]
    bits: u8,

    /// Output file (default: adder_<bits>bit.json)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let bits = usize::from(args.bits);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("adder_{bits}bit.json")));

    println!("Generating {bits}-bit adder circuit...");
    let circuit = generate_adder(bits)?;

    println!("Circuit statistics:");
    println!("  Inputs:  {}", circuit.inputs().len());
    println!("  Outputs: {}", circuit.outputs().len());
    println!("  Gates:   {}", circuit.gates().len());

    let json = circuit.to_json_pretty()?;
    fs::write(&output, json).with_context(|| format!("failed to write {}", output.display()))?;

    println!("Done! Circuit written to {}", output.display());
    Ok(())
}
