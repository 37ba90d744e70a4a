//! `tcsol`: verify, schedule and draw truth-table circuits.

mod logging;
mod render;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use rayon::prelude::*;
use tcsol_types::{CircuitDescription, InputCount, TruthTable};
use tcsol_verify::{Verified, VerifyOptions, validate, validate_with};
use tracing::info;

// Only the integration tests use these.
#[cfg(test)]
use {assert_cmd as _, predicates as _, serde_json as _, tempfile as _};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "tcsol")]
#[command(about = "Truth-table circuit validator and scheduler", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify one or more circuit descriptions
    Verify {
        /// Circuit description files (JSON)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Show detailed statistics
        #[arg(short, long)]
        detailed: bool,

        /// Don't fail when a declared output is never produced
        #[arg(long)]
        allow_missing_outputs: bool,

        /// Reject circuits with more gates than this
        #[arg(long, value_name = "N")]
        max_gates: Option<usize>,
    },

    /// Write the description with its gates in evaluation order
    Order {
        /// Circuit description file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Print the gates grouped by depth
    Levels {
        /// Circuit description file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Render a verified circuit as Graphviz DOT
    Dot {
        /// Circuit description file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            files,
            detailed,
            allow_missing_outputs,
            max_gates,
        } => {
            let options = VerifyOptions {
                require_outputs: !allow_missing_outputs,
                max_gates,
            };
            verify_files(&files, &options, detailed)?;
        }

        Commands::Order { file, output } => {
            let verified = validate(&load(&file)?)?;
            let json = verified.ordered_description().to_json_pretty()?;
            with_output(output.as_deref(), |out| writeln!(out, "{json}"))?;
        }

        Commands::Levels { file } => {
            let desc = load(&file)?;
            print_levels(&desc)?;
        }

        Commands::Dot { file, output } => {
            let verified = validate(&load(&file)?)?;
            with_output(output.as_deref(), |out| render::write_dot(&verified, out))?;
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<CircuitDescription> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    CircuitDescription::from_json(&text).with_context(|| format!("failed to load {}", path.display()))
}

/// Runs `write` against the output file, or stdout when there is none.
fn with_output(
    path: Option<&Path>,
    write: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write(&mut out)?;
            out.flush()?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write(&mut out)?;
        }
    }
    Ok(())
}

fn verify_files(files: &[PathBuf], options: &VerifyOptions, detailed: bool) -> Result<()> {
    // Circuits are independent, so each one gets its own task.
    let results = files
        .par_iter()
        .map(|path| {
            let start = Instant::now();
            let verified = load(path).and_then(|desc| Ok(validate_with(&desc, options)?));
            (path, verified, start.elapsed())
        })
        .collect::<Vec<_>>();

    let mut failures = 0usize;
    for (path, result, elapsed) in results {
        match result {
            Ok(verified) => {
                println!("{}: OK", path.display());
                let summary = Summary::new(&verified, elapsed);
                summary.print_summary();
                if detailed {
                    summary.print_detailed(&verified);
                }
            }
            Err(err) => {
                failures += 1;
                println!("{}: FAILED", path.display());
                eprintln!("error: {}: {err:#}", path.display());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} circuits failed verification", files.len());
    }
    Ok(())
}

fn print_levels(desc: &CircuitDescription) -> Result<()> {
    let n = desc.input_count();
    let levels = tcsol_lvl::levels(n, desc.gates(), desc.inputs())?;

    println!("Inputs: {}", join_bits(n, desc.inputs()));
    for level in &levels {
        println!(
            "Level {} ({} gates):",
            level.depth(),
            format_number(level.gates().len())
        );
        for gate in level.gates() {
            println!(
                "  {} {} <- {}",
                gate.kind(),
                n.bits(gate.output()),
                join_bits(n, gate.sources())
            );
        }
    }
    Ok(())
}

fn join_bits(n: InputCount, tables: &[TruthTable]) -> String {
    tables
        .iter()
        .map(|tt| n.bits(*tt).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('_');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

struct Summary {
    input_count: u8,
    inputs: usize,
    outputs: usize,
    total_gates: usize,
    nand_gates: usize,
    not_gates: usize,
    or_gates: usize,
    depth: usize,
    processing_time: Duration,
}

impl Summary {
    fn new(verified: &Verified, processing_time: Duration) -> Self {
        let desc = verified.description();
        let stats = verified.stats();
        Self {
            input_count: desc.input_count().get(),
            inputs: desc.inputs().len(),
            outputs: desc.outputs().len(),
            total_gates: stats.total_gates(),
            nand_gates: stats.nand_gates,
            not_gates: stats.not_gates,
            or_gates: stats.or_gates,
            depth: stats.depth,
            processing_time,
        }
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total_gates == 0 {
            0.0
        } else {
            (count as f64 / self.total_gates as f64) * 100.0
        }
    }

    fn print_summary(&self) {
        println!("\nVerification Summary:");
        println!("  Input count: {}", self.input_count);
        println!("  Inputs: {}", format_number(self.inputs));
        println!("  Outputs: {}", format_number(self.outputs));
        println!("  Total gates: {}", format_number(self.total_gates));
        println!(
            "  NAND gates: {} ({:.1}%)",
            format_number(self.nand_gates),
            self.percent(self.nand_gates)
        );
        println!(
            "  NOT gates: {} ({:.1}%)",
            format_number(self.not_gates),
            self.percent(self.not_gates)
        );
        println!(
            "  OR gates: {} ({:.1}%)",
            format_number(self.or_gates),
            self.percent(self.or_gates)
        );
        println!("  Depth: {}", self.depth);
        println!("  Processing time: {:.2?}", self.processing_time);
    }

    fn print_detailed(&self, verified: &Verified) {
        let n = verified.description().input_count();
        println!("\nDetailed Statistics:");
        match verified.stats().max_delay {
            Some(delay) => println!("  Max declared delay: {delay}"),
            None => println!("  Max declared delay: none"),
        }
        println!(
            "  Signals produced by gates: {}",
            format_number(verified.trace().produced().count())
        );
        println!(
            "  Outputs: {}",
            join_bits(n, verified.description().outputs())
        );
        println!("  Evaluation order:");
        for (i, gate) in verified.order().iter().enumerate() {
            println!(
                "    {i:>4}: {} {} <- {}",
                gate.kind(),
                n.bits(gate.output()),
                join_bits(n, gate.sources())
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1_000");
        assert_eq!(format_number(1234567), "1_234_567");
    }
}
