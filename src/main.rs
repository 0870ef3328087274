use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};

use ghostwriter::config::SimConfig;
use ghostwriter::engine::{self, Phase};
use ghostwriter::events::Event;
use ghostwriter::llm::{ollama::OllamaFragmentClient, FragmentGenerator};
use ghostwriter::segment::{self, TextKind};
use ghostwriter::sink::BufferSink;

#[derive(Debug, Args, Clone)]
struct ConfigArgs {
    /// JSON configuration file. Missing keys fall back to defaults;
    /// out-of-range values are clamped.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Target typing speed in words per minute (15-200).
    #[arg(long)]
    wpm: Option<u32>,

    /// Typo probability per non-whitespace character, in percent (0-20).
    #[arg(long)]
    error_rate: Option<f64>,

    /// Per-character delay jitter, in percent of the base delay (0-100).
    #[arg(long)]
    variability: Option<u32>,

    /// Momentum/hesitation oscillation amplitude, in percent (0-100).
    #[arg(long)]
    burstiness: Option<u32>,

    /// Countdown before the first character, in seconds (2-15).
    #[arg(long)]
    start_delay: Option<u64>,

    /// Fixed inter-block pause when smart pausing is off, in seconds (2-30).
    #[arg(long)]
    block_pause: Option<u64>,

    /// Disable smart pausing (length-scaled block pauses and micro-breaks).
    #[arg(long)]
    no_smart_pausing: bool,

    /// Enable AI false starts (requires a reachable generator; build with
    /// `--features llm`).
    #[arg(long)]
    false_starts: bool,

    /// Number of false starts to schedule (0-10).
    #[arg(long)]
    false_start_count: Option<usize>,

    /// Disable mistake discovery (going back to fix a recent word).
    #[arg(long)]
    no_mistake_discovery: bool,

    /// Number of mistake-discovery corrections to schedule (0-8).
    #[arg(long)]
    edit_frequency: Option<usize>,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<SimConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                SimConfig::from_json(&json)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => SimConfig::default(),
        };

        if let Some(wpm) = self.wpm {
            cfg.wpm = wpm;
        }
        if let Some(error_rate) = self.error_rate {
            cfg.error_rate = error_rate;
        }
        if let Some(variability) = self.variability {
            cfg.variability = variability;
        }
        if let Some(burstiness) = self.burstiness {
            cfg.burstiness = burstiness;
        }
        if let Some(start_delay) = self.start_delay {
            cfg.start_delay_secs = start_delay;
        }
        if let Some(block_pause) = self.block_pause {
            cfg.block_pause_secs = block_pause;
        }
        if self.no_smart_pausing {
            cfg.smart_pausing = false;
        }
        if self.false_starts {
            cfg.false_starts_enabled = true;
        }
        if let Some(count) = self.false_start_count {
            cfg.false_start_count = count;
        }
        if self.no_mistake_discovery {
            cfg.mistake_discovery_enabled = false;
        }
        if let Some(frequency) = self.edit_frequency {
            cfg.edit_frequency = frequency;
        }

        let cfg = cfg.clamped();
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Parser)]
#[command(name = "ghostwriter")]
#[command(about = "Human-like typing simulation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate typing the input text (dry-run into an in-memory buffer)
    Run {
        /// Input text file, or '-' for stdin
        #[arg(long, value_name = "PATH")]
        input: PathBuf,

        /// Optional RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Suppress periodic stats lines
        #[arg(long)]
        quiet: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Classify the input and print its typing blocks
    Blocks {
        /// Input text file, or '-' for stdin
        #[arg(long, value_name = "PATH")]
        input: PathBuf,
    },

    /// Check whether the local fragment generator is reachable
    Probe,
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == std::ffi::OsStr::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn build_generator(cfg: &SimConfig) -> Result<Option<Box<dyn FragmentGenerator + Send>>> {
    if !cfg.false_starts_enabled {
        return Ok(None);
    }
    let client = OllamaFragmentClient::from_env()?;
    Ok(Some(Box::new(client)))
}

fn run_simulation(input: &PathBuf, seed: Option<u64>, quiet: bool, config: &ConfigArgs) -> Result<()> {
    let source = read_input(input)?;
    if source.trim().is_empty() {
        return Err(anyhow!("input text is empty"));
    }
    let cfg = config.resolve()?;
    let generator = build_generator(&cfg)?;

    let sink = Box::new(BufferSink::new());
    let (handle, events) = engine::spawn(source, cfg, sink, generator, seed)?;

    let control = handle.control();
    ctrlc::set_handler(move || {
        control.request_stop();
    })
    .context("failed to install Ctrl+C handler")?;

    let mut latest_text = String::new();
    for event in events {
        match event {
            Event::CountdownUpdated(secs) if secs > 0 => eprintln!("Starting in {secs}..."),
            Event::CountdownUpdated(_) => {}
            Event::StatusMessage(msg) => eprintln!("{msg}"),
            Event::StatsUpdated(s) if !quiet => {
                eprintln!(
                    "{} WPM, {}/{} chars, block {}/{}, ETA {}s",
                    s.actual_wpm, s.chars_typed, s.total_chars, s.blocks_done, s.total_blocks,
                    s.eta_seconds
                );
            }
            Event::TextUpdated(text) => latest_text = text,
            Event::Finished => break,
            _ => {}
        }
    }

    let phase = handle.wait();
    match phase {
        Phase::Complete => {
            println!("{latest_text}");
            Ok(())
        }
        Phase::Stopped => {
            eprintln!("Stopped.");
            Ok(())
        }
        other => Err(anyhow!("run ended in {other:?}")),
    }
}

fn print_blocks(input: &PathBuf) -> Result<()> {
    let source = read_input(input)?;
    let kind = match segment::classify(&source) {
        TextKind::Code => "code",
        TextKind::Prose => "prose",
    };
    let blocks = segment::segment(&source);

    eprintln!("Classified as {kind}, {} block(s)", blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let chars = block.chars().count();
        let preview: String = block.trim().chars().take(60).collect();
        println!("block {}/{} ({chars} chars): {preview}", i + 1, blocks.len());
    }
    Ok(())
}

fn probe_generator() -> Result<()> {
    let client = OllamaFragmentClient::from_env()?;
    match client.probe() {
        Ok(report) if report.model_count > 0 => {
            println!("Connected, {} model(s) installed", report.model_count);
        }
        Ok(_) => {
            println!("Generator running but no models installed");
        }
        Err(err) => {
            println!("Generator not detected ({err:#})");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            input,
            seed,
            quiet,
            config,
        } => run_simulation(&input, seed, quiet, &config),
        Command::Blocks { input } => print_blocks(&input),
        Command::Probe => probe_generator(),
    }
}
