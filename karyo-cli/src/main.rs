use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use karyo_core::io::{read_chromosome_extents, read_color_map, read_payload};
use karyo_core::{parse_region, GenomeCoordinateModel, PlotGeometry};
use karyo_render::{FullGenomeView, KaryoPlotView, RenderConfig, ZoomedIntervalView};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "karyo")]
#[command(about = "Karyotype visualization of genome-wide haplotype calls")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a sample's karyotype to SVG or PNG
    Render {
        /// Haplotype-call payload JSON (plain or gzipped)
        #[arg(short, long)]
        payload: PathBuf,

        /// Strain color map JSON
        #[arg(short, long)]
        colors: Option<PathBuf>,

        /// Chromosome extent table JSON; defaults to the built-in mm10 table
        #[arg(short, long)]
        extents: Option<PathBuf>,

        /// Zoomed region, e.g. "chr1:3-10Mb" (omit for the full genome)
        #[arg(short, long)]
        region: Option<String>,

        /// Output file (.svg or .png)
        #[arg(short, long)]
        output: PathBuf,

        /// Plot width in pixels
        #[arg(long, default_value = "900")]
        width: f64,

        /// Plot height in pixels
        #[arg(long, default_value = "600")]
        height: f64,

        /// Plot title
        #[arg(long)]
        title: Option<String>,

        /// Include the render-timestamp footer
        #[arg(long)]
        footer: bool,

        /// Leave out the strain legend
        #[arg(long)]
        no_legend: bool,
    },

    /// Summarize a haplotype-call payload
    Info {
        /// Haplotype-call payload JSON (plain or gzipped)
        payload: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Render {
            payload,
            colors,
            extents,
            region,
            output,
            width,
            height,
            title,
            footer,
            no_legend,
        } => cmd_render(
            payload, colors, extents, region, output, width, height, title, footer, no_legend,
        ),
        Commands::Info { payload } => cmd_info(payload),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_render(
    payload_path: PathBuf,
    colors_path: Option<PathBuf>,
    extents_path: Option<PathBuf>,
    region: Option<String>,
    output: PathBuf,
    width: f64,
    height: f64,
    title: Option<String>,
    footer: bool,
    no_legend: bool,
) -> Result<()> {
    let model = match &extents_path {
        Some(path) => GenomeCoordinateModel::new(
            read_chromosome_extents(path)
                .with_context(|| format!("reading extents from {}", path.display()))?,
        ),
        None => GenomeCoordinateModel::mm10(),
    };

    let payload = read_payload(&payload_path)
        .with_context(|| format!("reading payload from {}", payload_path.display()))?;
    let colors = colors_path
        .map(|path| {
            read_color_map(&path)
                .with_context(|| format!("reading color map from {}", path.display()))
        })
        .transpose()?;

    let geometry = PlotGeometry {
        width,
        height,
        ..Default::default()
    };
    let config = RenderConfig {
        title,
        show_footer: footer,
        show_legend: !no_legend,
        ..Default::default()
    };

    let mut view: Box<dyn KaryoPlotView> = match &region {
        Some(text) => {
            let interval = parse_region(text)
                .ok_or_else(|| anyhow!("invalid region {text:?}; expected e.g. \"chr1:3-10Mb\""))?;
            log::info!(
                "rendering Chr{} {}-{} from {}",
                interval.chr,
                interval.start_pos,
                interval.end_pos,
                payload_path.display()
            );
            Box::new(ZoomedIntervalView::new(model, geometry, config, interval))
        }
        None => {
            log::info!("rendering full genome from {}", payload_path.display());
            Box::new(FullGenomeView::new(model, geometry, config))
        }
    };
    view.update_haplotypes(Some(payload), colors);

    let format = output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match format.as_str() {
        "png" => view.write_png(&output)?,
        "svg" | "" => view.write_svg(&output)?,
        other => return Err(anyhow!("unsupported output format: {other}")),
    }

    log::info!(
        "wrote {} ({} primitives)",
        output.display(),
        view.primitives().len()
    );
    Ok(())
}

fn cmd_info(payload_path: PathBuf) -> Result<()> {
    let payload = read_payload(&payload_path)
        .with_context(|| format!("reading payload from {}", payload_path.display()))?;

    println!(
        "Contributing strains ({}):",
        payload.contributing_strains.len()
    );
    for strain in &payload.contributing_strains {
        println!("  {strain}");
    }
    for sample in &payload.haplotype_samples {
        println!("Sample: {}", sample.obj_id);
    }

    let mut chromosomes: Vec<_> = payload.viterbi_haplotypes.chromosome_data.iter().collect();
    chromosomes.sort_by(|a, b| a.0.cmp(b.0));
    for (chr, calls) in chromosomes {
        if calls.results_pending {
            println!("Chr{chr}: results pending");
            continue;
        }
        let bins = calls
            .concordance_bins
            .as_ref()
            .map(Vec::len)
            .unwrap_or(0);
        println!(
            "Chr{chr}: {} haplotype blocks, {} concordance bins",
            calls.haplotype_blocks.len(),
            bins
        );
    }
    Ok(())
}
