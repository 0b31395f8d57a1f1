//! AudioVive command line front end
//!
//! Usage:
//!   audiovive clean <INPUT>...            - Restore recordings and write cleaned copies
//!   audiovive evaluate <ORIGINAL> <CLEANED> - Report before/after SNR
//!   audiovive plot <ORIGINAL> <CLEANED>   - Emit waveform or spectrogram data as JSON
//!   audiovive config                      - Print the effective configuration

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use audiovive_core::codec::{decode_file, write_file};
use audiovive_core::config::{ConfigLoader, ExportFormat, ProfileStrategy, RestorationConfig};
use audiovive_core::processing::{RestorationPipeline, RunStats, SnrReport};
use audiovive_core::visual::{Comparison, PlotKind};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "audiovive", version, about = "Restore old and noisy audio recordings")]
struct Cli {
    /// Configuration file merged over the defaults and discovered files
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove hum and background noise from one or more recordings
    Clean {
        /// WAV or MP3 files to restore
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for cleaned files (defaults to next to each input)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Notch frequency in Hz, e.g. 50 for European mains
        #[arg(long)]
        notch_freq: Option<f32>,

        /// Notch quality factor; higher is narrower
        #[arg(long)]
        notch_q: Option<f32>,

        /// Skip the notch filter
        #[arg(long)]
        no_notch: bool,

        /// Seconds at the start of the recording assumed to be noise only
        #[arg(long)]
        profile_secs: Option<f64>,

        /// Fraction of the estimated noise to remove, 0 to 1
        #[arg(long)]
        strength: Option<f32>,

        /// Output container
        #[arg(long, value_parser = parse_export_format)]
        format: Option<ExportFormat>,

        /// MP3 bitrate in kbps
        #[arg(long)]
        bitrate: Option<u32>,

        /// Write per-file SNR figures and run statistics as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Compare an original recording with its cleaned version
    Evaluate {
        original: PathBuf,
        cleaned: PathBuf,
    },
    /// Write plot data comparing an original with its cleaned version
    Plot {
        original: PathBuf,
        cleaned: PathBuf,

        /// waveform or spectrogram
        #[arg(short, long, default_value = "waveform")]
        kind: PlotKind,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        write: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Clean {
            inputs,
            out_dir,
            notch_freq,
            notch_q,
            no_notch,
            profile_secs,
            strength,
            format,
            bitrate,
            report,
        } => {
            let mut config = config;
            if let Some(freq) = notch_freq {
                config.notch.target_freq_hz = freq;
            }
            if let Some(q) = notch_q {
                config.notch.quality_factor = q;
            }
            if no_notch {
                config.notch.enabled = false;
            }
            if let Some(secs) = profile_secs {
                config.noise_profile.strategy = ProfileStrategy::Leading { duration_s: secs };
            }
            if let Some(s) = strength {
                config.denoise.attenuation_strength = s;
            }
            if let Some(f) = format {
                config.export.format = f;
            }
            if let Some(kbps) = bitrate {
                config.export.bitrate_kbps = kbps;
            }
            clean(config, &inputs, out_dir.as_deref(), report.as_deref())
        }
        Commands::Evaluate { original, cleaned } => evaluate(&original, &cleaned),
        Commands::Plot {
            original,
            cleaned,
            kind,
            output,
        } => plot(&original, &cleaned, kind, output.as_deref()),
        Commands::Config { write } => match write {
            Some(path) => {
                ConfigLoader::export_config(&config, &path)?;
                tracing::info!(path = %path.display(), "configuration written");
                Ok(())
            }
            None => {
                print!("{}", config.to_toml_string()?);
                Ok(())
            }
        },
    }
}

fn load_config(explicit: Option<&Path>) -> Result<RestorationConfig> {
    let loader = ConfigLoader::new();
    let loader = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("configuration file not found: {}", path.display());
            }
            let mut paths = loader.config_paths().to_vec();
            paths.push(path.to_path_buf());
            ConfigLoader::with_paths(paths)
        }
        None => loader,
    };
    Ok(loader.load()?)
}

/// One entry of the `--report` file
#[derive(Serialize)]
struct FileReport {
    input: PathBuf,
    output: PathBuf,
    snr: SnrReport,
    stats: RunStats,
}

fn clean(
    config: RestorationConfig,
    inputs: &[PathBuf],
    out_dir: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<()> {
    let pipeline = RestorationPipeline::new(config.clone()).context("invalid configuration")?;
    tracing::info!(summary = ?config.summary(), files = inputs.len(), "starting restoration");

    let signals = inputs
        .iter()
        .map(|path| decode_file(path).with_context(|| format!("failed to read {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let mut failures = 0usize;
    let mut reports = Vec::new();
    for (path, outcome) in inputs.iter().zip(pipeline.run_batch(&signals)) {
        match outcome {
            Ok(outcome) => {
                let target = output_path(path, out_dir, config.export.format);
                write_file(&outcome.cleaned, &config.export, &target)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                println!("{} -> {}", path.display(), target.display());
                println!("  {}", outcome.report);
                reports.push(FileReport {
                    input: path.clone(),
                    output: target,
                    snr: outcome.report,
                    stats: outcome.stats,
                });
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", path.display(), e);
            }
        }
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }

    if failures > 0 {
        bail!("{} of {} recordings failed", failures, inputs.len());
    }
    Ok(())
}

fn evaluate(original: &Path, cleaned: &Path) -> Result<()> {
    let original = decode_file(original).with_context(|| format!("failed to read {}", original.display()))?;
    let cleaned = decode_file(cleaned).with_context(|| format!("failed to read {}", cleaned.display()))?;
    let report = SnrReport::evaluate(&original, &cleaned)?;

    println!("SNR Before Cleaning: {:.2} dB", report.snr_before_db);
    println!("SNR After Cleaning: {:.2} dB", report.snr_after_db);
    if report.is_improved() {
        println!("The noise reduction process was effective.");
    } else {
        println!("No significant improvement in SNR. Consider adjusting parameters.");
    }
    Ok(())
}

fn plot(original: &Path, cleaned: &Path, kind: PlotKind, output: Option<&Path>) -> Result<()> {
    let original = decode_file(original).with_context(|| format!("failed to read {}", original.display()))?;
    let cleaned = decode_file(cleaned).with_context(|| format!("failed to read {}", cleaned.display()))?;
    let json = Comparison::build(&original, &cleaned, kind)?.to_json()?;

    match output {
        Some(path) => std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

fn output_path(input: &Path, out_dir: Option<&Path>, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{}_cleaned.{}", stem, format))
}

fn parse_export_format(s: &str) -> std::result::Result<ExportFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "wav" => Ok(ExportFormat::Wav),
        "mp3" => Ok(ExportFormat::Mp3),
        other => Err(format!("unknown format '{}', expected wav or mp3", other)),
    }
}
