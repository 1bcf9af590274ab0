use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use atlas_maker_core::{
    export, AtlasEngine, GuillotineChoice, GuillotineSplit, LayoutConfig, MaxRectsHeuristic,
    PackerKind, SkylineHeuristic, SortKey,
};
use clap::{ArgAction, Parser};
use globset::{Glob, GlobSetBuilder};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Extensions accepted by the source scan. `jpeg` is kept as a literal
/// alias: it is common on disk but missing from many registries.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tga", "tif", "tiff"];

#[derive(Parser, Debug)]
#[command(
    name = "atlas-maker",
    about = "Lay out a directory of images on fixed-size atlas pages",
    version,
    author
)]
struct Cli {
    // Input/Output
    /// Source directory (or a single image file)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Write templated export records to this file (truncated each run)
    #[arg(long, help_heading = "Input/Output")]
    export_file: Option<PathBuf>,
    /// Inline export template; tokens: #filename #i #x #y #width #height #p
    #[arg(long, help_heading = "Input/Output")]
    template: Option<String>,
    /// Read the export template from a file instead
    #[arg(long, conflicts_with = "template", help_heading = "Input/Output")]
    template_file: Option<PathBuf>,
    /// Write layout metadata as JSON to this file
    #[arg(long, help_heading = "Input/Output")]
    json: Option<PathBuf>,
    /// YAML config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Input/Output")]
    print_config_format: String,
    /// Dry run: compute the layout and report, but write nothing
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    dry_run: bool,

    // Layout
    /// Page width in pixels
    #[arg(long, default_value_t = 512, help_heading = "Layout")]
    page_width: u32,
    /// Page height in pixels
    #[arg(long, default_value_t = 512, help_heading = "Layout")]
    page_height: u32,
    /// Margin kept around each image, CSS-style
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    margin: u32,
    /// Allow 90 degree rotation where the packer supports it
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    allow_rotation: bool,
    /// Sort key: none|width|height|area|magic
    #[arg(long, default_value = "none", help_heading = "Layout")]
    sort: String,
    /// Reverse the input sequence before sorting
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    reverse: bool,
    /// Packing strategy: shelf|skyline|guillotine|maxrects
    #[arg(long, default_value = "skyline", help_heading = "Layout")]
    packer: String,

    // Heuristics
    /// Skyline heuristic: bl|minwaste
    #[arg(long, default_value = "bl", help_heading = "Heuristics")]
    skyline: String,
    /// MaxRects heuristic: baf|bssf|blsf|bl
    #[arg(long, default_value = "baf", help_heading = "Heuristics")]
    heuristic: String,
    /// Guillotine choice: baf|bssf|blsf
    #[arg(long, default_value = "baf", help_heading = "Heuristics")]
    g_choice: String,
    /// Guillotine split: slas|llas|minas|maxas
    #[arg(long, default_value = "slas", help_heading = "Heuristics")]
    g_split: String,

    // Logging/UX
    /// Show a progress bar while probing images
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    run(&cli, cli.progress && !cli.quiet)
}

fn run(cli: &Cli, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(cli)?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    anyhow::ensure!(
        !paths.is_empty(),
        "no image files found under {}",
        cli.input.display()
    );

    let mut engine = AtlasEngine::new();
    probe_sources(&mut engine, &paths, show_progress)?;
    info!(count = engine.images().len(), "registered source images");

    let result = engine
        .recompute(&cfg)
        .with_context(|| "layout failed".to_string())?;

    let stats = result.stats(cfg.page_width, cfg.page_height);
    info!(
        pages = result.page_count,
        placed = stats.num_placed,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "layout complete"
    );
    println!("{}", result.status_message);

    if let Some(json_path) = &cli.json {
        if !cli.dry_run {
            let value = export::to_json(result);
            fs::write(json_path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("write {}", json_path.display()))?;
            info!(path = %json_path.display(), "layout metadata written");
        }
    }

    let template = match (&cli.template, &cli.template_file) {
        (Some(t), _) => Some(t.clone()),
        (None, Some(path)) => Some(
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?,
        ),
        (None, None) => None,
    };
    match (&cli.export_file, template) {
        (Some(path), Some(template)) => {
            let records = export::render(&result.images, &template, cfg.margin);
            if !cli.dry_run {
                export::write_to_path(&records, path)
                    .with_context(|| format!("write {}", path.display()))?;
            }
        }
        (Some(_), None) => {
            anyhow::bail!("--export-file needs a template (--template or --template-file)")
        }
        (None, Some(_)) => warn!("a template was given but no --export-file; skipping export"),
        (None, None) => {}
    }

    Ok(())
}

fn build_config(cli: &Cli) -> anyhow::Result<LayoutConfig> {
    let mut cfg = LayoutConfig {
        page_width: cli.page_width,
        page_height: cli.page_height,
        margin: cli.margin,
        rotation_enabled: cli.allow_rotation,
        sort_key: parse_key::<SortKey>(&cli.sort, "sort key")?,
        reverse: cli.reverse,
        packer: parse_key::<PackerKind>(&cli.packer, "packer")?,
        skyline_heuristic: parse_key::<SkylineHeuristic>(&cli.skyline, "skyline heuristic")?,
        mr_heuristic: parse_key::<MaxRectsHeuristic>(&cli.heuristic, "maxrects heuristic")?,
        g_choice: parse_key::<GuillotineChoice>(&cli.g_choice, "guillotine choice")?,
        g_split: parse_key::<GuillotineSplit>(&cli.g_split, "guillotine split")?,
    };
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = y.into_layout_config(cfg);
    }
    Ok(cfg)
}

fn parse_key<T: std::str::FromStr>(s: &str, what: &str) -> anyhow::Result<T> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown {what}: {s}"))
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        // Enumeration order is the discovery order export indices come
        // from, so keep it stable across platforms.
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str())
    )
}

/// Reads each file's dimensions from its header; pixel data is never
/// decoded. Unreadable files are skipped with an error log.
fn probe_sources(
    engine: &mut AtlasEngine,
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} probing {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(b)
    } else {
        None
    };
    for p in paths {
        let name = p
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        if let Some(b) = &bar {
            b.set_message(name.clone());
        }
        match image::image_dimensions(p) {
            Ok((w, h)) => {
                if let Err(e) = engine.add_source(name.clone(), p, w, h) {
                    error!(path = %p.display(), error = %e, "skip image");
                }
            }
            Err(e) => {
                error!(path = %p.display(), error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    page_width: Option<u32>,
    page_height: Option<u32>,
    margin: Option<u32>,
    allow_rotation: Option<bool>,
    sort: Option<String>,
    reverse: Option<bool>,
    packer: Option<String>,
    skyline: Option<String>,
    heuristic: Option<String>,
    g_choice: Option<String>,
    g_split: Option<String>,
}

impl YamlConfig {
    fn into_layout_config(self, mut cfg: LayoutConfig) -> LayoutConfig {
        if let Some(v) = self.page_width {
            cfg.page_width = v;
        }
        if let Some(v) = self.page_height {
            cfg.page_height = v;
        }
        if let Some(v) = self.margin {
            cfg.margin = v;
        }
        if let Some(v) = self.allow_rotation {
            cfg.rotation_enabled = v;
        }
        if let Some(v) = self.sort {
            cfg.sort_key = v.parse().unwrap_or(cfg.sort_key);
        }
        if let Some(v) = self.reverse {
            cfg.reverse = v;
        }
        if let Some(v) = self.packer {
            cfg.packer = v.parse().unwrap_or(cfg.packer);
        }
        if let Some(v) = self.skyline {
            cfg.skyline_heuristic = v.parse().unwrap_or(cfg.skyline_heuristic);
        }
        if let Some(v) = self.heuristic {
            cfg.mr_heuristic = v.parse().unwrap_or(cfg.mr_heuristic);
        }
        if let Some(v) = self.g_choice {
            cfg.g_choice = v.parse().unwrap_or(cfg.g_choice);
        }
        if let Some(v) = self.g_split {
            cfg.g_split = v.parse().unwrap_or(cfg.g_split);
        }
        cfg
    }
}
