use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use sort_visualiser_core::{
    engine, Algorithm, AppConfig, FrameRenderer, Pacer, Sequence, SortController, StepKind,
    StepRecord,
};
use tracing_subscriber::EnvFilter;

fn main() -> sort_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            preset,
            algorithm,
            bars,
            delay,
        } => run_animated(preset.as_deref(), algorithm, bars, delay),
        Commands::Trace {
            algorithm,
            output,
            bars,
        } => run_trace(algorithm, bars, &output),
    }
}

fn run_animated(
    preset: Option<&Path>,
    algorithm: Option<Algorithm>,
    bars: Option<usize>,
    delay: Option<u64>,
) -> sort_visualiser_core::Result<()> {
    let mut config = load_config(preset)?;
    if let Some(algorithm) = algorithm {
        config.algorithm = algorithm;
    }
    if let Some(bars) = bars {
        config.sequence.bars = bars;
    }
    if let Some(delay) = delay {
        config.pacing.delay_ms = delay;
    }

    tracing::info!(
        algorithm = %config.algorithm,
        bars = config.sequence.bars,
        delay_ms = config.pacing.delay_ms,
        "starting animated run"
    );

    let renderer = FrameRenderer::new(60, config.sequence.max_value);
    let controller = SortController::new(config)?;

    let step_renderer = renderer.clone();
    controller.on_step(move |values| draw_frame(&step_renderer, values))?;

    draw_frame(&renderer, &controller.snapshot()?);
    controller.start()?;
    let summary = controller.wait()?;

    if let Some(summary) = summary {
        tracing::info!(algorithm = %summary.algorithm, steps = summary.steps, "run finished");
    }
    Ok(())
}

fn run_trace(
    algorithm: Algorithm,
    bars: Option<usize>,
    output: &Path,
) -> sort_visualiser_core::Result<()> {
    let mut config = AppConfig::default();
    if let Some(bars) = bars {
        config.sequence.bars = bars;
    }
    config.validate()?;

    let sequence = Sequence::generate(
        config.sequence.bars,
        config.sequence.min_value,
        config.sequence.max_value,
    )?;
    let mut values = sequence.values().to_vec();

    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);

    // Step 0 records the unsorted input so the trace is replayable.
    let initial = StepRecord {
        step: 0,
        kind: StepKind::Refresh,
        values: values.clone(),
    };
    writeln!(writer, "{}", initial.to_json_string()?)?;

    let mut count = 0_u64;
    let mut write_error = None;
    let pacer = Pacer::unpaced();
    let summary = engine::run(algorithm, &mut values, &pacer, |step| {
        if write_error.is_some() {
            return;
        }
        count += 1;
        let record = StepRecord::from_step(count, &step);
        match record.to_json_string() {
            Ok(line) => {
                if let Err(err) = writeln!(writer, "{line}") {
                    write_error = Some(err.into());
                }
            }
            Err(err) => write_error = Some(err),
        }
    });

    if let Some(err) = write_error {
        return Err(err);
    }
    writer.flush()?;

    tracing::info!(
        algorithm = %summary.algorithm,
        steps = summary.steps,
        output = %output.display(),
        "trace written"
    );
    Ok(())
}

fn load_config(preset: Option<&Path>) -> sort_visualiser_core::Result<AppConfig> {
    match preset {
        Some(path) => {
            tracing::info!(preset = %path.display(), "loading preset");
            AppConfig::load(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn draw_frame(renderer: &FrameRenderer, values: &[u32]) {
    // Clear and rehome so the bars animate in place.
    print!("\x1b[2J\x1b[H{}", renderer.frame(values));
    let _ = std::io::stdout().flush();
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Animate a sorting run in the terminal.
    Run {
        /// Optional preset file to load on startup.
        #[arg(short, long)]
        preset: Option<PathBuf>,
        /// Algorithm to run (bubble, selection, insertion, quick, merge).
        #[arg(short, long)]
        algorithm: Option<Algorithm>,
        /// Number of bars to generate.
        #[arg(short, long)]
        bars: Option<usize>,
        /// Step delay in milliseconds (1-200).
        #[arg(short, long)]
        delay: Option<u64>,
    },
    /// Run an algorithm unpaced and write every step as a JSON line.
    Trace {
        /// Algorithm to trace.
        algorithm: Algorithm,
        /// Output path for the step trace.
        output: PathBuf,
        /// Number of bars to generate.
        #[arg(short, long)]
        bars: Option<usize>,
    },
}
