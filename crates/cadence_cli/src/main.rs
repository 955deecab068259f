//! Cadence CLI
//!
//! Preview easing curves and simulate the smoothing primitives from the
//! terminal. Defaults come from `cadence.toml` when one is found.

mod simulate;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cadence_animation::{AnimationConfig, Damper, Timer, TimerConfig, Tween};
use cadence_core::{first_node, truncate_with, Easing, Node};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::simulate::Sample;

#[derive(Parser, Debug)]
#[command(name = "cadence", version, about = "Preview easings and simulate animation primitives")]
struct Cli {
    /// Path to cadence.toml or the directory containing it
    #[arg(long, global = true, default_value = ".")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot an easing curve
    Ease {
        /// Easing name, e.g. easeOutCubic or "cubic-bezier(0.4, 0, 0.2, 1)"
        name: Option<String>,
        #[arg(long, default_value_t = 10)]
        steps: usize,
        /// List the named curves
        #[arg(long)]
        list: bool,
    },
    /// Simulate a damper chasing a target
    Damp {
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        from: f32,
        #[arg(long, allow_negative_numbers = true)]
        to: f32,
        /// Override damper.smooth_time (seconds)
        #[arg(long)]
        smooth_time: Option<f32>,
        /// Override damper.max_speed (units per second)
        #[arg(long)]
        max_speed: Option<f32>,
        #[arg(long)]
        fps: Option<u32>,
        #[arg(long, default_value_t = 10.0)]
        max_seconds: f32,
    },
    /// Play a tween between two values
    Tween {
        #[arg(long, allow_negative_numbers = true)]
        from: f32,
        #[arg(long, allow_negative_numbers = true)]
        to: f32,
        /// Override tween.duration_ms
        #[arg(long)]
        duration_ms: Option<f64>,
        /// Override tween.easing
        #[arg(long)]
        easing: Option<String>,
        #[arg(long)]
        fps: Option<u32>,
    },
    /// Run a repeating timer in real time
    Timer {
        #[arg(long)]
        delay_ms: Option<u64>,
        #[arg(long)]
        interval_ms: Option<u64>,
        #[arg(long)]
        iterations: Option<u32>,
    },
    /// Truncate text to a number of characters
    Truncate {
        text: String,
        #[arg(long, default_value_t = 20)]
        chars: usize,
        #[arg(long, default_value = cadence_core::DEFAULT_ELLIPSIS)]
        suffix: String,
    },
    /// Print the first top-level node of an HTML fragment
    Node { markup: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = AnimationConfig::load_from_dir(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    match cli.command {
        Command::Ease { name, steps, list } => cmd_ease(name, steps, list),
        Command::Damp {
            from,
            to,
            smooth_time,
            max_speed,
            fps,
            max_seconds,
        } => {
            let mut damper_config = config.damper.clone();
            if let Some(smooth_time) = smooth_time {
                damper_config.smooth_time = smooth_time;
            }
            if max_speed.is_some() {
                damper_config.max_speed = max_speed;
            }
            let fps = fps.unwrap_or(config.frame_loop.target_fps);
            let damper = Damper::from_config(from, &damper_config);
            print_samples(&simulate::damp(damper, to, fps, max_seconds));
            Ok(())
        }
        Command::Tween {
            from,
            to,
            duration_ms,
            easing,
            fps,
        } => {
            let mut tween_config = config.tween.clone();
            if let Some(duration_ms) = duration_ms {
                tween_config.duration_ms = duration_ms;
            }
            if let Some(easing) = easing {
                tween_config.easing = parse_easing(&easing)?;
            }
            let fps = fps.unwrap_or(config.frame_loop.target_fps);
            print_samples(&simulate::tween(Tween::from_config(&tween_config), from, to, fps));
            Ok(())
        }
        Command::Timer {
            delay_ms,
            interval_ms,
            iterations,
        } => {
            let defaults = config.timer.clone();
            let timer_config = TimerConfig {
                delay_ms: delay_ms.unwrap_or(defaults.delay_ms),
                interval_ms: interval_ms.unwrap_or(defaults.interval_ms),
                iterations: iterations.or(defaults.iterations),
                ..defaults
            };
            cmd_timer(timer_config).await
        }
        Command::Truncate {
            text,
            chars,
            suffix,
        } => {
            println!("{}", truncate_with(&text, chars, &suffix));
            Ok(())
        }
        Command::Node { markup } => {
            match first_node(&markup) {
                Some(Node::Element { tag, outer }) => println!("element <{tag}>: {outer}"),
                Some(Node::Text(text)) => println!("text: {text}"),
                Some(Node::Comment(comment)) => println!("comment: {comment}"),
                None => println!("(empty)"),
            }
            Ok(())
        }
    }
}

fn parse_easing(name: &str) -> Result<Easing> {
    name.parse::<Easing>()
        .with_context(|| "Run `cadence ease --list` for the available names")
}

fn cmd_ease(name: Option<String>, steps: usize, list: bool) -> Result<()> {
    if list {
        for (name, _) in cadence_core::easing::NAMED {
            println!("{name}");
        }
        return Ok(());
    }

    let name = name.context("Pass an easing name or --list")?;
    let easing = parse_easing(&name)?;

    for (t, value) in simulate::curve(easing, steps) {
        println!("{t:>5.2} {value:>8.4} |{}|", simulate::bar(value, 40));
    }
    Ok(())
}

async fn cmd_timer(config: TimerConfig) -> Result<()> {
    let started = tokio::time::Instant::now();
    let elapsed_ms = move || started.elapsed().as_millis();

    let mut timer = Timer::new(TimerConfig {
        autostart: true,
        ..config
    })
    .on_start(move || println!("{:>6}ms start", elapsed_ms()))
    .on_iteration(move |i| println!("{:>6}ms iteration {i}", elapsed_ms()))
    .on_finish(move || println!("{:>6}ms finish", elapsed_ms()));

    if timer.config().iterations.is_none() {
        // Repeats forever; bound the preview
        tokio::select! {
            _ = timer.run() => {}
            _ = tokio::time::sleep(Duration::from_secs(10)) => {}
        }
        timer.stop();
    } else {
        timer.run().await;
    }

    Ok(())
}

fn print_samples(samples: &[Sample]) {
    for sample in samples {
        println!("{:>9.2}ms {:>12.4}", sample.time_ms, sample.value);
    }
}
