use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;
use surveybar::legend::{Legend, OTHER_GRAY};
use surveybar::render::{html, svg};
use surveybar::{
    BarComposer, LayoutConfig, LayoutOverrides, Preset, RenderOptions,
    overall_order, storage,
};

#[derive(Parser, Debug)]
#[command(
    name = "surveybar",
    version,
    about = "Lay out stacked-bar charts for survey reports"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out every series of a counts file (and optionally render HTML/SVG).
    Layout(LayoutArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Json,
    Csv,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PresetArg {
    Classic,
    Revised,
}

impl From<PresetArg> for Preset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Classic => Preset::Classic,
            PresetArg::Revised => Preset::Revised,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    /// Keep the order of the input file.
    Input,
    /// Largest overall share first; --trailing labels last.
    Overall,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Counts file: CSV (`group,label,count` or `label,count`) or JSON.
    #[arg(short, long)]
    input: PathBuf,
    /// Layout config JSON; missing fields fall back to the preset.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Threshold preset used when no config file is given.
    #[arg(long, value_enum, default_value_t = PresetArg::Classic)]
    preset: PresetArg,
    /// Minimum segment width in percent.
    #[arg(long)]
    min_width: Option<f64>,
    /// Segments below this share get an outside label.
    #[arg(long)]
    outside_threshold: Option<f64>,
    /// Outside-labelled segments at or above this share keep their percentage inside.
    #[arg(long)]
    inner_threshold: Option<f64>,
    /// Option order within each bar.
    #[arg(long, value_enum, default_value_t = OrderArg::Input)]
    order: OrderArg,
    /// Catch-all options: drawn in gray and, with --order overall, placed last.
    #[arg(long = "trailing", value_delimiter = ',')]
    trailing: Vec<String>,
    /// Save the layout (format by --format or extension; stdout JSON when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Layout output format (json or csv).
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Write an HTML fragment with the legend and every bar.
    #[arg(long)]
    html: Option<PathBuf>,
    /// Write an SVG preview.
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Suffix printed after totals (e.g. "人").
    #[arg(long, default_value = "")]
    unit: String,
    /// Locale for thousands separators (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Bar width in pixels used for label fitting.
    #[arg(long, default_value_t = 680)]
    width: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
    }
}

fn build_config(args: &LayoutArgs) -> Result<LayoutConfig> {
    let base = match &args.config {
        Some(path) => LayoutConfig::from_json_file(path)?,
        None => LayoutConfig::from_preset(args.preset.into()),
    };
    let overrides = LayoutOverrides {
        min_segment_width_pct: args.min_width,
        outside_label_threshold_pct: args.outside_threshold,
        outside_label_inner_pct_threshold: args.inner_threshold,
        ..LayoutOverrides::default()
    };
    let config = base.with_overrides(&overrides);
    config.validate()?;
    Ok(config)
}

fn cmd_layout(args: LayoutArgs) -> Result<()> {
    let config = build_config(&args)?;
    let mut groups = storage::load_counts(&args.input)?;
    info!("loaded {} series from {}", groups.len(), args.input.display());

    if let OrderArg::Overall = args.order {
        let trailing: Vec<&str> = args.trailing.iter().map(String::as_str).collect();
        let order = overall_order(&groups, &trailing);
        groups = groups
            .iter()
            .map(|g| g.aligned_to(&order))
            .collect();
    }

    let mut legend = Legend::new();
    for label in &args.trailing {
        legend.reserve(label.clone(), OTHER_GRAY);
    }
    let mut composer = BarComposer::with_legend(config, legend)?;
    let bars = composer
        .compose_grouped(&groups)
        .with_context(|| format!("laying out {}", args.input.display()))?;
    let report = composer.finish(bars);

    match args.out.as_ref() {
        Some(path) => {
            let fmt = match args.format {
                Some(OutFormat::Csv) => "csv",
                Some(OutFormat::Json) => "json",
                None => path.extension().and_then(|e| e.to_str()).unwrap_or("json"),
            }
            .to_ascii_lowercase();
            match fmt.as_str() {
                "csv" => storage::save_layout_csv(&report, path)?,
                "json" => storage::save_layout_json(&report, path)?,
                other => anyhow::bail!("unsupported format: {}", other),
            }
            eprintln!("Saved {} bars to {}", report.bars.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    let opts = RenderOptions {
        bar_width_px: args.width,
        unit: args.unit.clone(),
        locale: args.locale.clone(),
        ..RenderOptions::default()
    };

    if let Some(path) = args.html.as_ref() {
        std::fs::write(path, html::render_report(&report, &opts))
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!("Wrote HTML to {}", path.display());
    }

    if let Some(path) = args.svg.as_ref() {
        svg::write_svg(&report, &config, &opts, path)?;
        eprintln!("Wrote SVG to {}", path.display());
    }

    Ok(())
}
