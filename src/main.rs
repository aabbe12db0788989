use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cogscore_core::{AppConfig, AudioBuffer, CompositeScore, ResultSet};
use cogscore_destination::{ExportReport, ExporterRegistry};
use cogscore_engine::QuestionScore;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cogscore", about = "Speech-based memory assessment scoring")]
struct Cli {
    /// Path to a TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the assessment questions in order
    Questions {
        /// How the participant is addressed in the prompts
        #[arg(long, default_value = "friend")]
        greeting: String,
    },
    /// Encode a JSON sample buffer as 16-bit PCM WAV
    Encode {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the header fields of a WAV file
    Inspect { path: PathBuf },
    /// Estimate acoustic features of a WAV file
    Features { path: PathBuf },
    /// Score a JSON array of question results
    Score {
        #[arg(short, long)]
        results: PathBuf,
        /// Comma-separated export formats, e.g. `json,csv`. Given without a
        /// value, uses `export.formats` from the config
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        export: Option<Vec<String>>,
        /// Directory for export files (defaults to `export.out_dir`)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

/// Buffer file accepted by `encode`. The sample rate may be left to config.
#[derive(Deserialize)]
struct BufferFile {
    sample_rate: Option<u32>,
    channels: Vec<Vec<f32>>,
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {path:?}")),
        None => Ok(AppConfig::default()),
    }
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config)?;

    match cli.command {
        Command::Questions { greeting } => print_questions(&greeting),
        Command::Encode { input, output } => encode(&config, input, output).await,
        Command::Inspect { path } => inspect(path).await,
        Command::Features { path } => features(path).await,
        Command::Score {
            results,
            export,
            out_dir,
        } => score(&config, results, export, out_dir).await,
    }
}

fn print_questions(greeting: &str) -> Result<()> {
    for question in cogscore_core::questions::catalog() {
        println!("{:>2}. [{}] {}", question.id, question.category, question.prompt(greeting));
        println!("    {}", question.instruction);
        if let Some(sample) = question.sample_text {
            println!("    \"{sample}\"");
        }
    }
    Ok(())
}

async fn encode(config: &AppConfig, input: PathBuf, output: PathBuf) -> Result<()> {
    let json = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("failed to read buffer from {input:?}"))?;
    let file: BufferFile =
        serde_json::from_str(&json).with_context(|| format!("invalid buffer JSON in {input:?}"))?;

    let buffer = AudioBuffer::new(
        file.sample_rate.unwrap_or(config.audio.default_sample_rate),
        file.channels,
    );
    let bytes = cogscore_audio::encode_wav(&buffer).context("failed to encode WAV")?;
    tokio::fs::write(&output, &bytes)
        .await
        .with_context(|| format!("failed to write {output:?}"))?;

    tracing::info!(
        path = %output.display(),
        frames = buffer.frame_count(),
        channels = buffer.channel_count(),
        bytes = bytes.len(),
        "wrote WAV"
    );
    Ok(())
}

async fn read_wav(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {path:?}"))
}

async fn inspect(path: PathBuf) -> Result<()> {
    let bytes = read_wav(&path).await?;
    let header = cogscore_audio::parse_header(&bytes)
        .with_context(|| format!("failed to parse WAV header of {path:?}"))?;

    println!("channels:        {}", header.channels);
    println!("sample_rate:     {}", header.sample_rate);
    println!("bits_per_sample: {}", header.bits_per_sample);
    println!("sample_format:   {:?}", header.sample_format);
    println!("frames:          {}", header.frames);
    println!("duration_secs:   {:.3}", header.duration_secs());
    Ok(())
}

async fn features(path: PathBuf) -> Result<()> {
    let bytes = read_wav(&path).await?;
    let buffer = cogscore_audio::decode_wav(&bytes)
        .with_context(|| format!("failed to decode {path:?}"))?;
    let features = cogscore_audio::extract_features(&buffer);
    println!(
        "{}",
        serde_json::to_string_pretty(&features).context("failed to serialize features")?
    );
    Ok(())
}

async fn score(
    config: &AppConfig,
    results_path: PathBuf,
    export: Option<Vec<String>>,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let json = tokio::fs::read_to_string(&results_path)
        .await
        .with_context(|| format!("failed to read results from {results_path:?}"))?;
    let results = ResultSet::from_json(&json)
        .with_context(|| format!("invalid results JSON in {results_path:?}"))?;
    if results.is_empty() {
        tracing::warn!("no results to score");
    }

    let report = ExportReport::build(&results, &config.scoring);
    print_composite(&report.composite);
    print_breakdown(&report.breakdown);

    let formats = match export {
        None => return Ok(()),
        Some(formats) if formats.is_empty() => config.export.formats.clone(),
        Some(formats) => formats,
    };
    let registry = ExporterRegistry::new();
    let unknown: Vec<&String> = formats
        .iter()
        .filter(|f| registry.create(f).is_err())
        .collect();
    if !unknown.is_empty() {
        let mut known = registry.list_exporters();
        known.sort();
        bail!("unknown export format(s) {unknown:?}; available: {}", known.join(", "));
    }

    let out_dir = out_dir.unwrap_or_else(|| config.export.out_dir.clone());
    let timestamp = chrono::Utc::now().timestamp_millis();
    let written = registry
        .export_all(&formats, &report, &out_dir, timestamp)
        .await
        .context("export failed")?;
    for path in written {
        println!("exported {}", path.display());
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"))
}

fn print_composite(score: &CompositeScore) {
    println!("Composite score: {:.0}/100 ({})", score.final100.round(), score.risk);
    if score.has_language() {
        println!(
            "  language   {:.1}/10  (context {:.1}, vocabulary {:.1}, repetition {:.1}; {} answers)",
            score.language_avg10,
            score.context_avg10,
            score.vocabulary_avg10,
            score.repetition_avg10,
            score.language_count
        );
    } else {
        println!("  language   n/a");
    }
    println!(
        "  acoustic   {}/10  ({} answers)",
        fmt_opt(score.acoustic_avg10),
        score.acoustic_count
    );
}

fn print_breakdown(rows: &[QuestionScore]) {
    if rows.is_empty() {
        return;
    }
    println!();
    println!("{:>3}  {:>8}  {:>8}  {:>6}", "id", "language", "acoustic", "total");
    for row in rows {
        println!(
            "{:>3}  {:>8.1}  {:>8.1}  {:>6.1}",
            row.question_id, row.language10, row.acoustic10, row.final100
        );
    }
}
