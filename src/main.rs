use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bio::io::fasta;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rustc_hash::FxHashMap;

use seqdot::config::{ComparisonMode, DotplotConfig};
use seqdot::core::alphabet::Alphabet;
use seqdot::core::engine::DotplotSession;
use seqdot::core::gencode::GeneticCode;
use seqdot::core::geometry::DEFAULT_MAX_GRID_DIM;
use seqdot::core::matrix::{residue_labels, SubstitutionMatrix};
use seqdot::core::translation::translate_frame;
use seqdot::format::snapshot;
use seqdot::stats::{karlin_params, residue_frequencies, suggested_window, ScoreProfile};

#[derive(Parser)]
#[command(name = "seqdot")]
#[command(version = "0.1.0")]
#[command(about = "Dot-plot similarity matrices for sequence pairs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two sequences and write a dot-plot snapshot
    Compare(CompareArgs),

    /// Print the header and grid statistics of a snapshot file
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct CompareArgs {
    #[arg(short, long)]
    query: PathBuf,
    #[arg(short, long)]
    subject: PathBuf,
    /// FASTA record id to use from the query file (default: first record)
    #[arg(long)]
    query_id: Option<String>,
    /// FASTA record id to use from the subject file (default: first record)
    #[arg(long)]
    subject_id: Option<String>,
    /// Comparison mode: auto, nuc, prot, translated
    #[arg(long, default_value = "auto")]
    mode: String,
    /// Sliding window length in residues (0 = estimate from the matrix and
    /// the sequence composition)
    #[arg(short, long, default_value_t = 0)]
    window_size: usize,
    /// Source positions per grid cell; raised automatically if the grid
    /// would exceed --max-grid-dim
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,
    /// Score-to-intensity scale (0 = derive from the matrix)
    #[arg(long, default_value_t = 0.0)]
    pixel_scale: f64,
    // Scoring for nucleotide comparisons; protein modes use BLOSUM62
    #[arg(long, default_value_t = 1)]
    reward: i32,
    #[arg(long, default_value_t = -2)]
    penalty: i32,
    /// Mirror a self-comparison across the main diagonal
    #[arg(long, default_value_t = false)]
    mirror: bool,
    /// Scan only the forward query strand
    #[arg(long, default_value_t = false)]
    forward_only: bool,
    /// Scan only the reverse-complement query strand
    #[arg(long, default_value_t = false)]
    reverse_only: bool,
    /// Reading frames for translated queries
    #[arg(long, default_value_t = 3)]
    frames: usize,
    /// NCBI genetic code id for translated queries
    #[arg(long, default_value_t = 1)]
    query_gencode: u8,
    /// Hard cap on either grid dimension
    #[arg(long, default_value_t = DEFAULT_MAX_GRID_DIM)]
    max_grid_dim: usize,
    /// Snapshot output path
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Snapshot file to inspect
    #[arg(short, long)]
    input: PathBuf,
    /// Also print the stored substitution matrix
    #[arg(long, default_value_t = false)]
    matrix: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Compare(args) => compare(args),
        Commands::Info(args) => info(args),
    }
}

/// Read one record from a FASTA file, by id when given, first otherwise.
fn read_record(path: &Path, id: Option<&str>) -> Result<fasta::Record> {
    let reader = fasta::Reader::from_file(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let records: Vec<fasta::Record> = reader.records().filter_map(|r| r.ok()).collect();
    if records.is_empty() {
        bail!("{} contains no FASTA records", path.display());
    }
    match id {
        None => records
            .into_iter()
            .next()
            .with_context(|| format!("{} contains no FASTA records", path.display())),
        Some(id) => {
            let by_id: FxHashMap<String, usize> = records
                .iter()
                .enumerate()
                .map(|(i, r)| (r.id().to_string(), i))
                .collect();
            let &index = by_id
                .get(id)
                .with_context(|| format!("record '{}' not found in {}", id, path.display()))?;
            records
                .into_iter()
                .nth(index)
                .with_context(|| format!("record '{}' not found in {}", id, path.display()))
        }
    }
}

/// A sequence is taken as nucleotide when nearly all of its letters are
/// nucleotide codes; ambiguity codes keep the threshold below 1.
fn looks_like_nucleotide(seq: &[u8]) -> bool {
    let letters = seq.iter().filter(|c| c.is_ascii_alphabetic()).count();
    if letters == 0 {
        return false;
    }
    let nuc = seq
        .iter()
        .filter(|c| matches!(c.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'U' | b'N'))
        .count();
    nuc as f64 / letters as f64 >= 0.9
}

fn resolve_mode(requested: &str, query: &[u8], subject: &[u8]) -> Result<ComparisonMode> {
    match requested {
        "nuc" => Ok(ComparisonMode::NucleotideNucleotide),
        "prot" => Ok(ComparisonMode::ProteinProtein),
        "translated" => Ok(ComparisonMode::TranslatedVsProtein),
        "auto" => {
            let q_nuc = looks_like_nucleotide(query);
            let s_nuc = looks_like_nucleotide(subject);
            match (q_nuc, s_nuc) {
                (true, true) => Ok(ComparisonMode::NucleotideNucleotide),
                (false, false) => Ok(ComparisonMode::ProteinProtein),
                (true, false) => Ok(ComparisonMode::TranslatedVsProtein),
                (false, true) => {
                    bail!("protein query against nucleotide subject is not supported; swap the inputs")
                }
            }
        }
        other => bail!("unknown mode '{}', expected auto, nuc, prot or translated", other),
    }
}

/// Residue ids of both sequences in the scoring alphabet, for composition
/// statistics. A translated query contributes its first reading frame.
fn scoring_ids(mode: ComparisonMode, query: &[u8], subject: &[u8], gencode: u8) -> (Vec<u8>, Vec<u8>) {
    match mode {
        ComparisonMode::NucleotideNucleotide => (
            Alphabet::NucleotideForward.encode(query),
            Alphabet::NucleotideForward.encode(subject),
        ),
        ComparisonMode::ProteinProtein => (
            Alphabet::Peptide.encode(query),
            Alphabet::Peptide.encode(subject),
        ),
        ComparisonMode::TranslatedVsProtein => (
            translate_frame(query, 0, &GeneticCode::from_id(gencode)),
            Alphabet::Peptide.encode(subject),
        ),
    }
}

fn estimate_window(
    mode: ComparisonMode,
    query: &[u8],
    subject: &[u8],
    matrix: &SubstitutionMatrix,
    gencode: u8,
) -> Result<usize> {
    let (q_ids, s_ids) = scoring_ids(mode, query, subject, gencode);
    let q_freqs = residue_frequencies(&q_ids, matrix.size());
    let s_freqs = residue_frequencies(&s_ids, matrix.size());
    let profile = ScoreProfile::new(matrix, &q_freqs, &s_freqs)?;
    let params = karlin_params(&profile)?;
    Ok(suggested_window(&params, q_ids.len(), s_ids.len()))
}

fn compare(args: CompareArgs) -> Result<()> {
    if args.forward_only && args.reverse_only {
        bail!("--forward-only and --reverse-only exclude each other");
    }

    eprintln!("Reading query...");
    let query = read_record(&args.query, args.query_id.as_deref())?;
    eprintln!("Reading subject...");
    let subject = read_record(&args.subject, args.subject_id.as_deref())?;

    let mode = resolve_mode(&args.mode, query.seq(), subject.seq())?;
    let matrix = match mode {
        ComparisonMode::NucleotideNucleotide => {
            SubstitutionMatrix::nucleotide(args.reward, args.penalty)
        }
        _ => SubstitutionMatrix::blosum62(),
    };

    let window = if args.window_size > 0 {
        args.window_size
    } else {
        match estimate_window(mode, query.seq(), subject.seq(), &matrix, args.query_gencode) {
            Ok(win) => {
                eprintln!("Estimated window size: {}", win);
                win
            }
            Err(err) => {
                eprintln!("seqdot: window estimation failed ({}), using 25", err);
                25
            }
        }
    };

    let mut config = DotplotConfig::new(mode, window);
    config.zoom = args.zoom;
    config.pixel_scale = args.pixel_scale;
    config.mirror = args.mirror;
    config.forward_strand = !args.reverse_only;
    config.reverse_strand = !args.forward_only;
    config.frames = args.frames;
    config.genetic_code = args.query_gencode;
    config.max_grid_dim = args.max_grid_dim;

    let session = DotplotSession::new(config, query.seq(), subject.seq(), &matrix)?;
    let geometry = session.geometry();
    eprintln!(
        "Scanning {} x {} residues into a {} x {} grid (zoom {}, window {})...",
        query.seq().len(),
        subject.seq().len(),
        geometry.width,
        geometry.height,
        geometry.zoom,
        window
    );

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message("computing dot-plot");
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    let plot = session.run()?;
    bar.finish_and_clear();

    eprintln!(
        "Done: {} of {} cells carry signal, peak intensity {}",
        plot.grid.count_nonzero(),
        plot.grid.data().len(),
        plot.grid.max_value()
    );

    if let Some(out) = &args.out {
        let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
        let mut writer = BufWriter::new(file);
        snapshot::write(&mut writer, &plot, &matrix)?;
        writer
            .flush()
            .with_context(|| format!("writing {}", out.display()))?;
        eprintln!("Snapshot written to {}", out.display());
    }

    Ok(())
}

fn info(args: InfoArgs) -> Result<()> {
    let file = File::open(&args.input).with_context(|| format!("opening {}", args.input.display()))?;
    let mut reader = BufReader::new(file);
    let snap = snapshot::read(&mut reader)?;

    println!("snapshot version: {}", snapshot::FORMAT_VERSION);
    println!("grid:             {} x {}", snap.grid.width(), snap.grid.height());
    println!("zoom factor:      {}", snap.zoom);
    println!("window size:      {}", snap.window);
    println!("pixel scale:      {}", snap.pixel_scale);
    println!(
        "matrix:           {} ({}x{})",
        snap.matrix.name(),
        snap.matrix.size(),
        snap.matrix.size()
    );
    println!("non-zero cells:   {}", snap.grid.count_nonzero());
    println!("peak intensity:   {}", snap.grid.max_value());

    if args.matrix {
        let labels = residue_labels(snap.matrix.size());
        print!("    ");
        for l in &labels {
            print!("{:>4}", l);
        }
        println!();
        for (i, l) in labels.iter().enumerate() {
            print!("{:>4}", l);
            for j in 0..snap.matrix.size() {
                print!("{:>4}", snap.matrix.score(i as u8, j as u8));
            }
            println!();
        }
    }

    Ok(())
}
