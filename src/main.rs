use std::{path::PathBuf, thread, time::Duration, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wavealign::{
    input::load_sequence,
    report::{self, DEFAULT_WIDTH},
    Aligner, BuiltinMatrix, CancelToken, Mode, Scheduler, ScoringContext, Strategy,
    SubstitutionMatrix, TracebackStart, WavefrontAligner,
};

#[derive(Parser, Debug)]
#[command(
    name = "wavealign",
    about = "Pairwise global (Needleman-Wunsch) or local (Smith-Waterman) alignment filled in parallel wavefronts"
)]
struct Cli {
    /// First sequence to align or the path to a FASTA file.
    #[arg(long, default_value = "")]
    s1: String,

    /// Second sequence to align or the path to a FASTA file.
    #[arg(long, default_value = "")]
    s2: String,

    /// Score for a match.
    #[arg(short = 'm', long = "match", default_value_t = 5, allow_negative_numbers = true)]
    match_score: i32,

    /// Score for a mismatch.
    #[arg(long = "mismatch", default_value_t = -3, allow_negative_numbers = true)]
    mismatch_score: i32,

    /// Score for a gap.
    #[arg(long, default_value_t = -4, allow_negative_numbers = true)]
    gap: i32,

    /// Built-in substitution matrix used instead of match/mismatch scores.
    #[arg(long, value_name = "PAM250|PAM30|BLOSUM62|BLOSUM45|BLOSUM80", conflicts_with = "matrix_file")]
    scoring_matrix: Option<BuiltinMatrix>,

    /// Substitution matrix file (whitespace separated, symbol header first).
    #[arg(long, value_name = "PATH")]
    matrix_file: Option<PathBuf>,

    /// Sequences are amino acids; defaults the substitution matrix to PAM250.
    #[arg(long)]
    protein: bool,

    /// Type of alignment to perform (global or local).
    #[arg(long = "type", default_value = "global")]
    mode: Mode,

    /// Number of worker threads; defaults to the available parallelism.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    cores: Option<u16>,

    /// How each anti-diagonal is split among workers (static or queue).
    #[arg(long, default_value = "static")]
    strategy: Strategy,

    /// Cells per chunk for the queue strategy.
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u32).range(1..))]
    queue_chunk: u32,

    /// Where a local traceback starts: the best cell or the bottom-right corner.
    #[arg(long, default_value = "best")]
    traceback: TracebackStart,

    /// Alignment columns per output block.
    #[arg(long, default_value_t = DEFAULT_WIDTH as u32, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Cancel the alignment if it has not finished after this many seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let s1 = load_sequence(&cli.s1).context("failed to load sequence 1")?;
    let s2 = load_sequence(&cli.s2).context("failed to load sequence 2")?;
    let scoring = scoring_context(&cli)?;

    let workers = match cli.cores {
        Some(cores) => cores as usize,
        None => thread::available_parallelism().map_or(1, |n| n.get()),
    };
    let mut scheduler = Scheduler::new(workers, cli.strategy)
        .context("failed to start workers")?
        .with_queue_chunk(cli.queue_chunk as usize)?;
    if let Some(secs) = cli.timeout {
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            trigger.cancel();
        });
        scheduler = scheduler.with_cancel(cancel);
    }

    let start = Instant::now();
    let aln = WavefrontAligner::with(&s1, &s2, &scoring)
        .with_mode(cli.mode)
        .with_traceback(cli.traceback)
        .align_on(&scheduler)
        .context("alignment failed")?;
    tracing::debug!(
        elapsed = start.elapsed().as_secs_f64(),
        workers = scheduler.workers(),
        "aligned {} x {}",
        s1.len(),
        s2.len()
    );

    let text = report::render(&aln, cli.width as usize);
    match &cli.output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("could not write report to {}", path.display()))?;
            println!("Wrote alignment to {}.", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn scoring_context(cli: &Cli) -> Result<ScoringContext> {
    let matrix = if let Some(path) = &cli.matrix_file {
        Some(
            SubstitutionMatrix::from_path(path)
                .with_context(|| format!("failed to load scoring matrix {}", path.display()))?,
        )
    } else if let Some(name) = cli.scoring_matrix.or(cli.protein.then_some(BuiltinMatrix::Pam250))
    {
        tracing::info!(matrix = %name, "using built-in scoring matrix");
        Some(SubstitutionMatrix::builtin(name).with_context(|| format!("failed to load {name}"))?)
    } else {
        None
    };
    Ok(match matrix {
        Some(matrix) => ScoringContext::matrix(matrix, cli.gap),
        None => ScoringContext::constants(cli.match_score, cli.mismatch_score, cli.gap),
    })
}
