use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use log::info;
use media_probe::{
    redact::{redact_target, redact_text},
    ProbeError, ProbeResult, Prober, StreamInfo,
};
use rayon::prelude::*;
use serde_json::json;

#[derive(Parser)]
pub struct Cli {
    /// ffprobe executable to run
    #[clap(long, default_value = "ffprobe")]
    pub ffprobe: String,
    #[command(subcommand)]
    pub subcommand: Commands,
}

#[derive(Parser)]
pub enum Commands {
    #[clap(name = "probe")]
    Probe(ProbeArgs),
    #[clap(name = "streams")]
    Streams(StreamsArgs),
}

#[derive(Parser)]
pub struct ProbeArgs {
    #[clap(long)]
    pub json: bool,
    #[clap(required = true)]
    pub targets: Vec<String>,
}

#[derive(Parser)]
pub struct StreamsArgs {
    #[clap(long = "type")]
    pub codec_type: String,
    #[clap(long)]
    pub json: bool,
    pub target: String,
}

fn format_stream(stream: &StreamInfo) -> String {
    let mut line = format!(
        "#{} {} {}",
        stream.index, stream.codec_type, stream.codec_name
    );
    if let (Some(width), Some(height)) = (stream.width, stream.height) {
        line.push_str(&format!(" {}x{}", width, height));
    }
    if let Some(sample_rate) = &stream.sample_rate {
        line.push_str(&format!(" {} Hz", sample_rate));
    }
    if let Some(layout) = &stream.channel_layout {
        line.push_str(&format!(" {}", layout));
    } else if let Some(channels) = stream.channels {
        line.push_str(&format!(" {}ch", channels));
    }
    if let Some(bit_rate) = &stream.bit_rate {
        line.push_str(&format!(" {} b/s", bit_rate));
    }
    if !stream.tags.language.is_empty() {
        line.push_str(&format!(" [{}]", stream.tags.language));
    }
    line
}

fn stream_counts(result: &ProbeResult) -> String {
    result
        .streams
        .iter()
        .map(|s| s.codec_type.as_str())
        .sorted()
        .dedup_with_count()
        .map(|(n, codec_type)| format!("{} {}", n, codec_type))
        .join(", ")
}

/// ffprobe echoes the target back as `format.filename`, credentials included.
fn json_entry(target: &str, result: &ProbeResult) -> serde_json::Value {
    let filename = redact_target(&result.format.filename).into_owned();
    let mut result = result.clone();
    result.format.filename = filename;
    json!({ "target": redact_target(target), "result": result })
}

fn display_error(err: &ProbeError) -> String {
    redact_text(&err.to_string()).into_owned()
}

fn print_summary(target: &str, result: &ProbeResult) {
    let counts = stream_counts(result);

    println!("{}", redact_target(target));
    println!(
        "  format: {} ({})",
        result.format.format_name, result.format.format_long_name
    );
    println!("  duration: {:.3}s", result.format.duration);
    if !result.format.tags.title.is_empty() {
        println!("  title: {}", result.format.tags.title);
    }
    println!("  streams: {}", counts);
    for stream in &result.streams {
        println!("    {}", format_stream(stream));
    }
}

fn cmd_probe(prober: &Prober, args: &ProbeArgs) -> anyhow::Result<()> {
    let results = args
        .targets
        .par_iter()
        .map(|target| (target, prober.probe(target)))
        .collect::<Vec<_>>();

    let mut failed = 0;
    let mut probed = Vec::new();
    for (target, result) in results {
        match result {
            Ok(result) => probed.push((target, result)),
            Err(e) => {
                eprintln!("{}: {}", redact_target(target), display_error(&e));
                failed += 1;
            }
        }
    }

    if args.json {
        let entries = probed
            .iter()
            .map(|(target, result)| json_entry(target, result))
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (target, result) in &probed {
            print_summary(target, result);
        }
    }

    info!("Probed {} targets, {} failed", args.targets.len(), failed);
    if failed > 0 {
        anyhow::bail!("{} of {} targets failed", failed, args.targets.len());
    }
    Ok(())
}

fn cmd_streams(prober: &Prober, args: &StreamsArgs) -> anyhow::Result<()> {
    let result = prober
        .probe(&args.target)
        .map_err(|e| anyhow::anyhow!(display_error(&e)))
        .with_context(|| format!("Failed to probe {}", redact_target(&args.target)))?;
    let streams = result.streams_by_type(&args.codec_type)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&streams)?);
    } else {
        for stream in streams {
            println!("{}", format_stream(stream));
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let prober = Prober::new().program(cli.ffprobe);
    match cli.subcommand {
        Commands::Probe(ref args) => cmd_probe(&prober, args),
        Commands::Streams(ref args) => cmd_streams(&prober, args),
    }
}
