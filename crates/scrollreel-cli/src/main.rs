use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scrollreel_core::{FrameResolver, PageLayout, PrefetchPlan, ReelConfig};
use scrollreel_motion::{LayoutSource, SectionTransform};
use scrollreel_render::{
    loader_for_root, FrameLoader, ParallaxSession, PrefetchCache, SyntheticFrameLoader,
};
use serde::Serialize;

const DEFAULT_CONFIG: &str = "scrollreel.toml";

#[derive(Parser)]
#[command(
    name = "scrollreel",
    version,
    about = "scrollreel: scroll-synchronized frame sequences",
    long_about = "Inspect, plan and dry-run a scroll-driven frame sequence.\nConfiguration is read from ./scrollreel.toml when present."
)]
struct Cli {
    /// Path to a scrollreel.toml (default: ./scrollreel.toml if it exists)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the location of a frame
    Resolve {
        /// 1-based frame index
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Show which frames are prefetched immediately and which are deferred
    Plan {
        /// Emit JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Scroll a synthetic page from top to bottom and print every update
    Simulate {
        /// Number of evenly spaced scroll positions, both ends included
        #[arg(long, default_value_t = 101)]
        steps: u32,

        /// Viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        viewport: f64,

        /// Number of reveal sections on the page
        #[arg(long, default_value_t = 3)]
        sections: usize,

        /// Load real frames from the configured asset root instead of generating them
        #[arg(long)]
        load: bool,
    },

    /// Load every frame through the prefetch cache and report the outcome
    Prefetch {
        /// Asset root override: a directory or an http(s) base URL
        #[arg(long)]
        root: Option<String>,
    },

    /// Write a default scrollreel.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display version and the effective configuration
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config;
    match cli.command {
        Commands::Resolve { index } => cmd_resolve(&load_config(config_path.as_deref())?, index),
        Commands::Plan { json } => cmd_plan(&load_config(config_path.as_deref())?, json),
        Commands::Simulate {
            steps,
            viewport,
            sections,
            load,
        } => {
            let config = load_config(config_path.as_deref())?;
            run_async(cmd_simulate(config, steps, viewport, sections, load))
        }
        Commands::Prefetch { root } => {
            let config = load_config(config_path.as_deref())?;
            run_async(cmd_prefetch(config, root))
        }
        Commands::Init { force } => {
            cmd_init(config_path.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG)), force)
        }
        Commands::Info => cmd_info(config_path.as_deref()),
    }
}

fn run_async<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;
    runtime.block_on(future)
}

/// An explicit path must exist; otherwise fall back to ./scrollreel.toml, then defaults.
fn load_config(path: Option<&Path>) -> Result<ReelConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG);
                return Ok(ReelConfig::default());
            }
            default
        }
    };
    ReelConfig::load_from_file(&path)
        .with_context(|| format!("failed to load config: {}", path.display()))
}

fn cmd_resolve(config: &ReelConfig, index: i64) -> Result<()> {
    let resolver = FrameResolver::new(&config.sequence);
    let location = resolver
        .resolve(index)
        .with_context(|| format!("cannot resolve frame {}", index))?;
    println!("{}", location);
    Ok(())
}

fn cmd_plan(config: &ReelConfig, json: bool) -> Result<()> {
    let plan = PrefetchPlan::new(config.sequence.total_frames, &config.prefetch);
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Prefetch plan for {} frames", config.sequence.total_frames);
    println!("   Immediate: {}", describe_range(&plan.immediate));
    println!(
        "   Deferred:  {} after {} ms",
        describe_range(&plan.deferred),
        plan.delay.as_millis()
    );
    Ok(())
}

fn describe_range(frames: &[scrollreel_core::FrameIndex]) -> String {
    match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => format!("{}..={} ({} frames)", first.get(), last.get(), frames.len()),
        _ => "none".to_string(),
    }
}

/// One line of `simulate` output.
#[derive(Debug, Serialize)]
struct SimulationStep {
    offset: f64,
    frame: u32,
    location: String,
    /// True while the frame has not loaded and the surface paints the placeholder.
    placeholder: bool,
    sections: Vec<SectionTransform>,
}

impl SimulationStep {
    fn capture<P: LayoutSource>(session: &ParallaxSession<P>, offset: f64) -> Self {
        let surface = session.frame();
        Self {
            offset,
            frame: surface.frame.get(),
            location: surface.location.to_string(),
            placeholder: surface.placeholder,
            sections: surface.sections,
        }
    }
}

/// Scroll a stacked page in `steps` even increments and record every frame change.
async fn simulate(
    config: &ReelConfig,
    loader: Arc<dyn FrameLoader>,
    steps: u32,
    viewport: f64,
    sections: usize,
) -> Result<Vec<SimulationStep>> {
    let layout = PageLayout::stacked(viewport, sections);
    let max_scroll = layout.max_scroll();
    let mut session = ParallaxSession::mount(config, loader, layout)?;

    let mut out = vec![SimulationStep::capture(&session, 0.0)];
    let last_step = steps.max(2) - 1;
    for step in 0..=last_step {
        // Let in-flight loads land between scroll events.
        tokio::task::yield_now().await;
        let offset = step as f64 / last_step as f64 * max_scroll;
        if session.on_scroll(offset).is_some() {
            out.push(SimulationStep::capture(&session, offset));
        }
    }
    session.teardown();
    Ok(out)
}

async fn cmd_simulate(
    config: ReelConfig,
    steps: u32,
    viewport: f64,
    sections: usize,
    load: bool,
) -> Result<()> {
    let loader: Arc<dyn FrameLoader> = if load {
        loader_for_root(&config.assets.root)
    } else {
        Arc::new(SyntheticFrameLoader::new(config.sequence.total_frames, 1, 1))
    };
    let updates = simulate(&config, loader, steps, viewport, sections).await?;
    for update in &updates {
        println!("{}", serde_json::to_string(update)?);
    }
    tracing::info!(updates = updates.len(), "simulation finished");
    Ok(())
}

async fn cmd_prefetch(config: ReelConfig, root: Option<String>) -> Result<()> {
    config.validate()?;
    let root = root.unwrap_or_else(|| config.assets.root.clone());
    let start = Instant::now();

    let cache = PrefetchCache::new(FrameResolver::new(&config.sequence), loader_for_root(&root));
    let mut warm = cache.warm(&PrefetchPlan::new(config.sequence.total_frames, &config.prefetch))?;
    warm.deferred_issued().await;
    cache.wait_idle().await;

    let stats = cache.stats();
    println!("Prefetched from {}", root);
    println!("   Loaded:   {}", stats.loaded);
    println!("   Failed:   {}", stats.failed);
    println!("   Requests: {}", cache.requests_issued());
    println!("   Elapsed:  {:.2?}", start.elapsed());

    if stats.failed > 0 {
        anyhow::bail!(
            "{} of {} frames failed to load",
            stats.failed,
            config.sequence.total_frames
        );
    }
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("'{}' already exists (use --force to overwrite)", path.display());
    }
    ReelConfig::default()
        .save_to_file(path)
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn cmd_info(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let resolver = FrameResolver::new(&config.sequence);
    println!("scrollreel {}", env!("CARGO_PKG_VERSION"));
    println!("   Frames:    {}", config.sequence.total_frames);
    println!(
        "   Range:     {} .. {}",
        resolver.resolve(1)?,
        resolver.resolve(i64::from(config.sequence.total_frames))?
    );
    println!(
        "   Prefetch:  {} immediate, rest after {} ms",
        config.prefetch.immediate, config.prefetch.defer_ms
    );
    println!(
        "   Scrub lag: frames {}s, sections {}s",
        config.scrub.frame_lag, config.scrub.section_lag
    );
    println!("   Assets:    {}", config.assets.root);
    Ok(())
}
