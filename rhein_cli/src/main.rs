mod simulate;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use rhein_core::{ModSpec, SessionConfig, WindowsConfig, WindowsPreset};
use rhein_schema::Chart;

#[derive(Debug, Parser)]
#[command(name = "rhein")]
#[command(about = "Rhein chart tools and headless gameplay simulator", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse and validate a chart, then print a summary
    Check { input: PathBuf },
    /// Autoplay a chart on a simulated clock and report every judgement
    Simulate {
        input: PathBuf,
        /// Timing window preset: default, chill, lenient, tight, strict
        #[arg(long, value_parser = parse_preset)]
        windows: Option<WindowsPreset>,
        /// Mod to enable (nofail, chill, lenient, tight, strict, x<rate>); repeatable
        #[arg(long = "mod")]
        mods: Vec<ModSpec>,
        /// Session config JSON; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Spread autoplay presses by up to this many milliseconds
        #[arg(long, default_value_t = 0)]
        jitter_ms: u32,
        /// Print the play record as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a chart as JSON, or as text when the output ends in `.rch`
    Convert {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { input } => {
            let chart = load_chart(&input)?;
            rhein_core::chart::validate(&chart, chart.lane_count())
                .with_context(|| format!("invalid chart: {}", input.display()))?;
            print_summary(&input, &chart);
        }
        Command::Simulate {
            input,
            windows,
            mods,
            config,
            jitter_ms,
            json,
        } => {
            let chart = load_chart(&input)?;
            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => SessionConfig::default(),
            };
            if let Some(preset) = windows {
                config.windows = WindowsConfig::Preset(preset);
            }
            config.mods.extend(mods);

            let outcome = simulate::run_simulation(chart, &config, jitter_ms)?;
            if json {
                let out = serde_json::to_string_pretty(&outcome.record)
                    .context("failed to serialize play record")?;
                println!("{out}");
            } else {
                simulate::print_report(&outcome);
            }
        }
        Command::Convert { input, output } => {
            let chart = load_chart(&input)?;
            let out_path = output.unwrap_or_else(|| default_output_path(&input));
            let text = if is_chart_text(&out_path) {
                rhein_chart::to_chart_string(&chart)
                    .with_context(|| format!("cannot convert to text: {}", input.display()))?
            } else {
                serde_json::to_string_pretty(&chart).context("failed to serialize chart")?
            };
            fs::write(&out_path, text)
                .with_context(|| format!("failed to write: {}", out_path.display()))?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn load_chart(input: &Path) -> anyhow::Result<Chart> {
    rhein_chart::json::load_any(input).with_context(|| format!("load failed: {}", input.display()))
}

fn load_config(path: &Path) -> anyhow::Result<SessionConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config: {}", path.display()))
}

fn parse_preset(s: &str) -> Result<WindowsPreset, String> {
    match s.to_ascii_lowercase().as_str() {
        "default" => Ok(WindowsPreset::Default),
        "chill" => Ok(WindowsPreset::Chill),
        "lenient" => Ok(WindowsPreset::Lenient),
        "tight" => Ok(WindowsPreset::Tight),
        "strict" => Ok(WindowsPreset::Strict),
        other => Err(format!("unknown windows preset `{other}`")),
    }
}

fn print_summary(input: &Path, chart: &Chart) {
    let holds = chart.notes.iter().filter(|n| n.length > 0.0).count();
    println!("{}: OK", input.display());
    if let Some(name) = &chart.name {
        println!("  name:   {name}");
    }
    println!("  bpm:    {}", chart.bpm);
    println!("  offset: {} ms", chart.offset_ms);
    println!("  lanes:  {}", chart.lane_count());
    println!("  notes:  {} ({holds} holds)", chart.notes.len());
    println!("  events: {}", chart.events.len());
    println!("  length: {:.3} s", chart.last_beat() * 60.0 / chart.bpm);
}

fn is_chart_text(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(rhein_chart::EXTENSION))
}

fn default_output_path(input: &Path) -> PathBuf {
    let mut out = input.to_path_buf();
    out.set_extension("json");
    if out == input {
        out.set_extension("out.json");
    }
    out
}
