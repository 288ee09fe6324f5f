use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use starsync::{
    adjusted_file_name, check_chart_path, extract_original_lyrics_with, header_bpm,
    header_gap_ms, load_chart, ms_to_components, parse_metadata, parse_offset_arg,
    phrase_timeline, render_synced, retime_chart, synchronize_chart, Chart, OffsetMap,
    StarsyncError, SyncConfig,
};

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{err}");
            1
        }
    });
}

fn main_result() -> Result<(), StarsyncError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("starsync=info"))
        .init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::default(),
    };

    match args.command {
        Command::Lyrics { chart } => {
            let chart = read_chart(&chart)?;
            let transcript =
                extract_original_lyrics_with(&chart.note_lines, config.syllable_separator);
            println!("{transcript}");
        }
        Command::Sync {
            chart: chart_path,
            lyrics,
            title,
            language,
            gap,
            output,
        } => {
            let chart = read_chart(&chart_path)?;
            let lyrics = fs::read_to_string(&lyrics)?;
            let report = synchronize_chart(&chart, &lyrics, &config);

            let mut metadata = parse_metadata(&chart.header);
            if let Some(title) = title {
                metadata.title = title;
            }
            if let Some(language) = language {
                metadata.language = language;
            }
            if let Some(gap) = gap {
                metadata.gap = Some(ms_to_components(gap));
            }

            let text = render_synced(&chart, &metadata, &report);
            write_output(output.as_deref(), &text)?;
        }
        Command::Retime {
            chart: chart_path,
            offsets,
            output,
            save,
        } => {
            let chart = read_chart(&chart_path)?;
            let offsets = collect_offsets(&offsets)?;
            let text = retime_chart(&chart, &offsets);

            let output = if save {
                let name = adjusted_file_name(&chart.header, &config.output_suffix);
                Some(chart_path.with_file_name(name))
            } else {
                output
            };
            write_output(output.as_deref(), &text)?;
        }
        Command::Timeline {
            chart,
            offsets,
            yaml,
        } => {
            let chart = read_chart(&chart)?;
            let offsets = collect_offsets(&offsets)?;
            let bpm = header_bpm(&chart.header);
            if bpm.is_none() {
                log::warn!("No usable BPM in header, timing unknown");
            }
            let timeline =
                phrase_timeline(&chart.note_lines, bpm, header_gap_ms(&chart.header), &offsets);

            if yaml {
                let text = serde_yaml::to_string(&timeline)
                    .map_err(|err| StarsyncError::Io(format!("Could not render timeline {err}")))?;
                print!("{text}");
            } else {
                for timing in &timeline {
                    println!(
                        "{:>5}  {:>6}  {:>5}  {}",
                        timing.line_index,
                        timing.beat,
                        timing.label(),
                        chart.note_lines[timing.line_index]
                    );
                }
            }
        }
    }
    Ok(())
}

fn read_chart(path: &Path) -> Result<Chart, StarsyncError> {
    check_chart_path(path)?;
    let content = fs::read_to_string(path)?;
    let chart = load_chart(&content)?;
    log::info!("Loaded chart {path:?}");
    Ok(chart)
}

fn collect_offsets(args: &[String]) -> Result<OffsetMap, StarsyncError> {
    args.iter()
        .map(|arg| parse_offset_arg(arg))
        .collect::<Result<OffsetMap, _>>()
}

fn write_output(path: Option<&Path>, text: &str) -> Result<(), StarsyncError> {
    match path {
        Some(path) => {
            fs::write(path, text)?;
            log::info!("Wrote chart to {path:?}");
        }
        None => println!("{text}"),
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Optional path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the chart's lyrics as an editable transcript.
    Lyrics { chart: PathBuf },
    /// Replace the chart's lyrics with a new transcript.
    Sync {
        chart: PathBuf,
        lyrics: PathBuf,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New language.
        #[arg(long)]
        language: Option<String>,
        /// New GAP in milliseconds; 0 removes it.
        #[arg(long)]
        gap: Option<i64>,
        /// Output file, stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Shift notes and breaks by beat offsets.
    Retime {
        chart: PathBuf,
        /// Offset as INDEX=DELTA, cumulative from INDEX onwards. Repeatable.
        #[arg(long = "offset", allow_hyphen_values = true)]
        offsets: Vec<String>,
        /// Output file, stdout when omitted.
        #[arg(short, long, conflicts_with = "save")]
        output: Option<PathBuf>,
        /// Write next to the input as `{TITLE}{suffix}.txt`.
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    /// Print the start time of every phrase.
    Timeline {
        chart: PathBuf,
        /// Offset as INDEX=DELTA. Repeatable.
        #[arg(long = "offset", allow_hyphen_values = true)]
        offsets: Vec<String>,
        /// Print YAML instead of a table.
        #[arg(long, default_value_t = false)]
        yaml: bool,
    },
}
