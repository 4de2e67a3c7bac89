//! CLI harness: manifest in, longest-repeat report out.
//!
//! Usage:
//!   repeats-rs [flags] <manifest>
//!
//! The manifest lists one document path per line; each filename encodes its
//! required repeat count (default pattern `pages=?(\d+)`). The report goes
//! to stdout; skip notices, progress lines, and the final stats line go to
//! stderr.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use repeats_rs::{
    build_index, default_pattern, find_repeated_sequences, find_repeated_strings, read_manifest,
    AllowAll, ByteTerm, IngestOptions, IngestStats, NoiseFilter, SearchConfig, SearchOutcome,
    SeqTerm, Term, TermFilter, DEFAULT_HEADER_SIZE, DEFAULT_MIN_TERM_SIZE,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    String,
    Sequence,
}

struct Args {
    manifest: PathBuf,
    mode: Mode,
    max_term_len: usize,
    n_bad_allowed: u32,
    header_size: usize,
    epsilon: f64,
    min_term_size: usize,
    exact_latch: usize,
    pattern: Option<String>,
    no_filter: bool,
    quiet: bool,
    repeat: u32,
    #[cfg(feature = "json-report")]
    json: bool,
}

fn usage(exe: &str) {
    eprintln!(
        "usage: {} [--mode=string|sequence] [--max-len=N] [--allow-bad=N] [--header=N] \
         [--epsilon=F] [--min-term=N] [--exact-latch=N] [--pattern=REGEX] [--no-filter] \
         [--repeat=N] [--quiet] <manifest>",
        exe
    );
}

fn parse_args() -> Result<Args, String> {
    let mut argv = std::env::args();
    let _exe = argv.next();
    let mut args = Args {
        manifest: PathBuf::new(),
        mode: Mode::String,
        max_term_len: SearchConfig::default().max_term_len,
        // The spool harness historically ran with one slack document.
        n_bad_allowed: 1,
        header_size: DEFAULT_HEADER_SIZE,
        epsilon: SearchConfig::default().epsilon,
        min_term_size: DEFAULT_MIN_TERM_SIZE,
        exact_latch: SearchConfig::default().exact_latch,
        pattern: None,
        no_filter: false,
        quiet: false,
        repeat: 1,
        #[cfg(feature = "json-report")]
        json: false,
    };
    let mut manifest: Option<PathBuf> = None;

    for arg in argv {
        let flag = arg.clone();
        if let Some(value) = flag.strip_prefix("--mode=") {
            args.mode = match value {
                "string" => Mode::String,
                "sequence" => Mode::Sequence,
                other => return Err(format!("unknown mode: {}", other)),
            };
        } else if let Some(value) = flag.strip_prefix("--max-len=") {
            args.max_term_len = parse_num(value, "--max-len")?;
        } else if let Some(value) = flag.strip_prefix("--allow-bad=") {
            args.n_bad_allowed = parse_num(value, "--allow-bad")?;
        } else if let Some(value) = flag.strip_prefix("--header=") {
            args.header_size = parse_num(value, "--header")?;
        } else if let Some(value) = flag.strip_prefix("--epsilon=") {
            args.epsilon = value
                .parse::<f64>()
                .ok()
                .filter(|e| *e > 0.0 && *e <= 1.0)
                .ok_or_else(|| format!("--epsilon needs a value in (0, 1], got {}", value))?;
        } else if let Some(value) = flag.strip_prefix("--min-term=") {
            args.min_term_size = parse_num(value, "--min-term")?;
        } else if let Some(value) = flag.strip_prefix("--exact-latch=") {
            args.exact_latch = parse_num(value, "--exact-latch")?;
        } else if let Some(value) = flag.strip_prefix("--pattern=") {
            args.pattern = Some(value.to_string());
        } else if let Some(value) = flag.strip_prefix("--repeat=") {
            args.repeat = parse_num::<u32>(value, "--repeat")?.max(1);
        } else if flag == "--no-filter" {
            args.no_filter = true;
        } else if flag == "--quiet" {
            args.quiet = true;
        } else if flag == "--json" {
            #[cfg(feature = "json-report")]
            {
                args.json = true;
            }
            #[cfg(not(feature = "json-report"))]
            return Err("--json requires the json-report feature".to_string());
        } else if flag == "--help" || flag == "-h" {
            return Err(String::new());
        } else if flag.starts_with("--") {
            return Err(format!("unknown flag: {}", flag));
        } else if manifest.is_some() {
            return Err("expected exactly one manifest path".to_string());
        } else {
            manifest = Some(PathBuf::from(arg));
        }
    }

    match manifest {
        Some(path) => {
            args.manifest = path;
            Ok(args)
        }
        None => Err("missing manifest path".to_string()),
    }
}

fn parse_num<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{} needs a number, got {}", flag, value))
}

fn main() {
    let exe = std::env::args()
        .next()
        .unwrap_or_else(|| "repeats-rs".to_string());
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            if msg.is_empty() {
                // --help
                usage(&exe);
                process::exit(0);
            }
            eprintln!("{}", msg);
            usage(&exe);
            process::exit(1);
        }
    };

    if !args.quiet {
        print_build_info();
    }

    let pattern = match &args.pattern {
        Some(p) => match regex::Regex::new(p) {
            Ok(re) => re,
            Err(err) => {
                eprintln!("bad --pattern: {}", err);
                process::exit(1);
            }
        },
        None => default_pattern(),
    };
    let options = IngestOptions {
        header_size: args.header_size,
        n_bad_allowed: args.n_bad_allowed,
        pattern,
        log_skips: !args.quiet,
    };

    let mut ingest_stats = IngestStats::default();
    let entries = match read_manifest(&args.manifest, &options, &mut ingest_stats) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let index = build_index(&entries, &options, &mut ingest_stats);
    if index.num_docs() == 0 {
        eprintln!("no document survived ingestion");
        process::exit(1);
    }

    let noise;
    let filter: &dyn TermFilter = if args.no_filter {
        &AllowAll
    } else {
        noise = NoiseFilter::new(args.min_term_size);
        &noise
    };
    let cfg = SearchConfig {
        max_term_len: args.max_term_len,
        epsilon: args.epsilon,
        exact_latch: args.exact_latch,
        log_rounds: !args.quiet,
    };

    let mut durations: Vec<f64> = Vec::new();
    for run in 0..args.repeat {
        if args.repeat > 1 && !args.quiet {
            eprintln!("===== run {} of {} =====", run + 1, args.repeat);
        }
        let start = Instant::now();
        let result = match args.mode {
            Mode::String => find_repeated_strings(&index, filter, &cfg)
                .map(|out| report(&args, &out, start.elapsed().as_secs_f64())),
            Mode::Sequence => find_repeated_sequences(&index, filter, &cfg)
                .map(|out| report(&args, &out, start.elapsed().as_secs_f64())),
        };
        match result {
            Ok(elapsed) => durations.push(elapsed),
            Err(err) => {
                eprintln!("internal invariant violated: {}", err);
                process::exit(1);
            }
        }
        if !args.quiet {
            eprintln!(
                "docs={} bytes={} skipped={} elapsed_ms={:.1}",
                ingest_stats.docs,
                ingest_stats.bytes,
                ingest_stats.skipped,
                durations.last().copied().unwrap_or(0.0) * 1000.0
            );
        }
    }

    if args.repeat > 1 {
        print_duration_stats(&durations);
    }
}

/// Prints the report for one run; returns the duration for the harness.
fn report<T: Term>(args: &Args, out: &SearchOutcome<T>, duration: f64) -> f64 {
    #[cfg(feature = "json-report")]
    if args.json {
        print_json(out, duration);
        return duration;
    }
    let _ = args;

    println!("--------------------------------------------------------------------------");
    println!(
        "converged = {}, valids = {}, exacts = {}",
        out.converged,
        out.longest.len(),
        out.exact.len()
    );
    if !out.longest.is_empty() {
        println!(
            "Found {} longest valid terms of length {}",
            out.longest.len(),
            out.longest_len
        );
        for (i, term) in out.longest.iter().enumerate() {
            println!("{} : {}", i, term);
        }
    }
    if !out.exact.is_empty() {
        let len = out.exact[0].len();
        println!(
            "Found {} exactly repeated terms of length {}",
            out.exact.len(),
            len
        );
        for (i, term) in out.exact.iter().enumerate() {
            println!("{} : {}", i, term);
        }
    }
    println!("duration = {:.4}s", duration);

    eprintln!(
        "rounds={} proposed={} built={} kept={} dropped={} filtered={} peak_terms={} peak_offsets={}",
        out.stats.rounds,
        out.stats.proposed,
        out.stats.built,
        out.stats.kept,
        out.stats.dropped,
        out.stats.filtered,
        out.stats.peak_terms,
        out.stats.peak_offsets
    );
    duration
}

#[cfg(feature = "json-report")]
fn print_json<T: Term>(out: &SearchOutcome<T>, duration: f64) {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Report {
        converged: bool,
        longest_len: usize,
        longest: Vec<String>,
        exact: Vec<String>,
        duration_secs: f64,
    }

    let report = Report {
        converged: out.converged,
        longest_len: out.longest_len,
        longest: out.longest.iter().map(|t| t.to_string()).collect(),
        exact: out.exact.iter().map(|t| t.to_string()).collect(),
        duration_secs: duration,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("json report failed: {}", err),
    }
}

fn print_duration_stats(durations: &[f64]) {
    if durations.is_empty() {
        return;
    }
    let mut sorted = durations.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let median = sorted[sorted.len() / 2];
    eprintln!(
        "runs={} min_s={:.4} max_s={:.4} mean_s={:.4} median_s={:.4}",
        sorted.len(),
        min,
        max,
        mean,
        median
    );
}

/// One-line record of the sizes behind the hot structures.
fn print_build_info() {
    eprintln!(
        "repeats: offset_bytes={} postings_bytes={} byte_term_bytes={} seq_term_bytes={}",
        std::mem::size_of::<repeats_rs::Offset>(),
        std::mem::size_of::<repeats_rs::Postings>(),
        std::mem::size_of::<ByteTerm>(),
        std::mem::size_of::<SeqTerm>()
    );
}
