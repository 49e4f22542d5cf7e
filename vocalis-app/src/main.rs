//! Vocalis command-line batch runner.
//!
//! ## Modes
//!
//! ```text
//! vocalis --file <path.wav>
//!     Analyze one recording; print its voice interval if any.
//!
//! vocalis --corpus <dir> [--report <out.json>]
//!     Analyze every .wav under <dir> (one worker thread per file) and
//!     print one line per recording with detected voice. Decode failures
//!     are logged and skipped; an empty corpus is an error.
//!
//! vocalis --synth --speech <dir> --backing <path.wav> --out <dir>
//!         [--duration <secs>] [--seed <n>]
//!     Smooth-mix every speech clip under <dir> into the backing track at
//!     a random offset and write the results to <dir>.
//! ```
//!
//! Output lines are `<path>\t<start>\t<end>` in seconds; recordings with no
//! detected voice print nothing.

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{error, info};

use vocalis_core::{read_wav, synth, write_wav, DetectorConfig, VoiceDetector, VoiceInterval};

/// Default target duration for synthesized corpus files, in seconds.
const DEFAULT_SYNTH_DURATION_SECS: f64 = 10.0;

#[derive(Debug)]
enum Mode {
    File {
        path: PathBuf,
    },
    Corpus {
        dir: PathBuf,
        report: Option<PathBuf>,
    },
    Synth {
        speech_dir: PathBuf,
        backing: PathBuf,
        out_dir: PathBuf,
        duration_secs: f64,
        seed: Option<u64>,
    },
}

#[derive(Debug, Serialize)]
struct FileResult {
    file: String,
    interval: Option<VoiceInterval>,
}

#[derive(Debug, Serialize)]
struct Report {
    corpus_dir: String,
    config: DetectorConfig,
    files: Vec<FileResult>,
}

fn usage() -> &'static str {
    "Usage:\n  \
     vocalis --file <path.wav>\n  \
     vocalis --corpus <dir> [--report <out.json>]\n  \
     vocalis --synth --speech <dir> --backing <path.wav> --out <dir> \
     [--duration <secs>] [--seed <n>]"
}

fn parse_args() -> anyhow::Result<Mode> {
    let mut file: Option<PathBuf> = None;
    let mut corpus: Option<PathBuf> = None;
    let mut report: Option<PathBuf> = None;
    let mut synth_mode = false;
    let mut speech_dir: Option<PathBuf> = None;
    let mut backing: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut duration_secs = DEFAULT_SYNTH_DURATION_SECS;
    let mut seed: Option<u64> = None;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--file" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --file");
                };
                file = Some(PathBuf::from(v));
            }
            "--corpus" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --corpus");
                };
                corpus = Some(PathBuf::from(v));
            }
            "--report" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --report");
                };
                report = Some(PathBuf::from(v));
            }
            "--synth" => synth_mode = true,
            "--speech" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --speech");
                };
                speech_dir = Some(PathBuf::from(v));
            }
            "--backing" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --backing");
                };
                backing = Some(PathBuf::from(v));
            }
            "--out" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --out");
                };
                out_dir = Some(PathBuf::from(v));
            }
            "--duration" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --duration");
                };
                duration_secs = v
                    .parse::<f64>()
                    .context("invalid value for --duration")?;
            }
            "--seed" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --seed");
                };
                seed = Some(v.parse::<u64>().context("invalid value for --seed")?);
            }
            "--help" | "-h" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}\n{}", usage()),
        }
    }

    if synth_mode {
        let (Some(speech_dir), Some(backing), Some(out_dir)) = (speech_dir, backing, out_dir)
        else {
            bail!("--synth requires --speech, --backing and --out\n{}", usage());
        };
        return Ok(Mode::Synth {
            speech_dir,
            backing,
            out_dir,
            duration_secs,
            seed,
        });
    }
    match (file, corpus) {
        (Some(path), None) => Ok(Mode::File { path }),
        (None, Some(dir)) => Ok(Mode::Corpus { dir, report }),
        _ => bail!("pass exactly one of --file or --corpus\n{}", usage()),
    }
}

fn collect_wavs(dir: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_wavs(&path, out)?;
            continue;
        }
        let is_wav = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("wav"))
            .unwrap_or(false);
        if is_wav {
            out.push(path);
        }
    }
    Ok(())
}

fn analyze_file(path: &Path) -> vocalis_core::Result<Option<VoiceInterval>> {
    let track = read_wav(path)?;
    let mut detector = VoiceDetector::new(DetectorConfig::default())?;
    detector.detect(&track)
}

fn print_result(path: &Path, interval: Option<VoiceInterval>) {
    if let Some(iv) = interval {
        println!(
            "{}\t{:.2}\t{:.2}",
            path.display(),
            iv.start_seconds,
            iv.end_seconds
        );
    }
}

fn run_file(path: &Path) -> anyhow::Result<()> {
    let interval = analyze_file(path)?;
    print_result(path, interval);
    Ok(())
}

fn run_corpus(dir: &Path, report_path: Option<&Path>) -> anyhow::Result<()> {
    let mut files = Vec::new();
    collect_wavs(dir, &mut files)?;
    files.sort();
    if files.is_empty() {
        bail!("no .wav files found under {}", dir.display());
    }
    info!(files = files.len(), dir = %dir.display(), "corpus scan complete");

    // Tracks are independent: one worker per file, results funnelled back
    // over a channel and reported in input order.
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::scope(|scope| {
        for (index, path) in files.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                let result = analyze_file(path);
                let _ = tx.send((index, result));
            });
        }
    });
    drop(tx);

    let mut outcomes: Vec<_> = rx.into_iter().collect();
    outcomes.sort_by_key(|(index, _)| *index);

    let mut results = Vec::with_capacity(files.len());
    let mut failures = 0usize;
    for (index, outcome) in outcomes {
        let path = &files[index];
        match outcome {
            Ok(interval) => {
                print_result(path, interval);
                results.push(FileResult {
                    file: path.display().to_string(),
                    interval,
                });
            }
            Err(e) => {
                failures += 1;
                error!(file = %path.display(), "skipped: {e}");
            }
        }
    }
    info!(
        analyzed = results.len(),
        failures, "corpus run complete"
    );

    if let Some(report_path) = report_path {
        let report = Report {
            corpus_dir: dir.display().to_string(),
            config: DetectorConfig::default(),
            files: results,
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(report_path, json)
            .with_context(|| format!("writing {}", report_path.display()))?;
        info!(report = %report_path.display(), "report written");
    }
    Ok(())
}

fn run_synth(
    speech_dir: &Path,
    backing_path: &Path,
    out_dir: &Path,
    duration_secs: f64,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let backing = read_wav(backing_path)?;

    let mut clips = Vec::new();
    collect_wavs(speech_dir, &mut clips)?;
    clips.sort();
    if clips.is_empty() {
        bail!("no .wav files found under {}", speech_dir.display());
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for clip_path in &clips {
        let speech = read_wav(clip_path)?;
        let mixed = synth::smooth_mix(&speech, &backing, duration_secs, &mut rng)?;

        let Some(name) = clip_path.file_name() else {
            bail!("speech clip has no file name: {}", clip_path.display());
        };
        let dest = out_dir.join(name);
        write_wav(&dest, &mixed)?;
        info!(clip = %clip_path.display(), dest = %dest.display(), "synthesized");
    }
    info!(clips = clips.len(), "corpus synthesis complete");
    Ok(())
}

fn run() -> anyhow::Result<()> {
    match parse_args()? {
        Mode::File { path } => run_file(&path),
        Mode::Corpus { dir, report } => run_corpus(&dir, report.as_deref()),
        Mode::Synth {
            speech_dir,
            backing,
            out_dir,
            duration_secs,
            seed,
        } => run_synth(&speech_dir, &backing, &out_dir, duration_secs, seed),
    }
}

fn main() {
    // Results go to stdout; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vocalis=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("vocalis: {e:#}");
        std::process::exit(1);
    }
}
