//! Tributary CLI — run the flow-to-Sankey pipeline against local CSV files
//!
//! Works directly on the dataset directory, without a running server.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;
use tributary::dataset::{load_matrix, DatasetId, CATALOG};
use tributary::sankey::{build_edges, run_pipeline, top_n, SankeyParams, TopNLimits};

#[derive(Parser)]
#[command(name = "tributary", version, about = "Tributary flow-to-Sankey CLI")]
struct Cli {
    /// Directory holding the dataset CSV files
    #[arg(long, default_value = "./data", global = true, env = "TRIBUTARY_DATA_DIR")]
    data_dir: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in datasets
    Datasets,
    /// Show matrix statistics for a dataset
    Info {
        /// Dataset id (investor, financing, production, waste)
        dataset: String,
    },
    /// Print the filtered long-form edge list
    Edges {
        /// Dataset id (investor, financing, production, waste)
        dataset: String,

        /// Keep only the top N sources by total weight
        #[arg(long)]
        max_sources: Option<usize>,

        /// Keep only the top N targets by total weight
        #[arg(long)]
        max_targets: Option<usize>,

        /// Drop edges not strictly above this value (default: dataset default)
        #[arg(long)]
        min_value: Option<f64>,
    },
    /// Print the renderer payload for a dataset
    Sankey {
        /// Dataset id (investor, financing, production, waste)
        dataset: String,

        /// Keep only the top N sources by total weight
        #[arg(long)]
        max_sources: Option<usize>,

        /// Keep only the top N targets by total weight
        #[arg(long)]
        max_targets: Option<usize>,

        /// Drop edges not strictly above this value (default: dataset default)
        #[arg(long)]
        min_value: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Datasets => run_datasets(&cli),
        Commands::Info { dataset } => run_info(&cli, dataset),
        Commands::Edges {
            dataset,
            max_sources,
            max_targets,
            min_value,
        } => run_edges(&cli, dataset, *max_sources, *max_targets, *min_value),
        Commands::Sankey {
            dataset,
            max_sources,
            max_targets,
            min_value,
        } => run_sankey(&cli, dataset, *max_sources, *max_targets, *min_value),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn load(cli: &Cli, dataset: &str) -> Result<(DatasetId, tributary::FlowMatrix), Box<dyn std::error::Error>> {
    let id: DatasetId = dataset.parse()?;
    let path = cli.data_dir.join(id.spec().file_name);
    let matrix = load_matrix(&path)?;
    Ok((id, matrix))
}

fn run_datasets(cli: &Cli) -> CliResult {
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&CATALOG)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(["id", "title", "source role", "target role", "default threshold"]);
            for spec in &CATALOG {
                table.add_row([
                    spec.id.to_string(),
                    spec.title.to_string(),
                    spec.source_role.to_string(),
                    spec.target_role.to_string(),
                    format!("{}", spec.default_min_value),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn run_info(cli: &Cli, dataset: &str) -> CliResult {
    let (id, matrix) = load(cli, dataset)?;
    let stats = matrix.stats();
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Table => {
            println!("Dataset: {} ({})", id, id.spec().title);
            println!("Sources: {}", stats.rows);
            println!("Targets: {}", stats.columns);
            println!("Cells:   {}", stats.cells);
            println!("Total:   {:.2}", stats.total);
            println!("Density: {:.3}", stats.density);
        }
    }
    Ok(())
}

fn run_edges(
    cli: &Cli,
    dataset: &str,
    max_sources: Option<usize>,
    max_targets: Option<usize>,
    min_value: Option<f64>,
) -> CliResult {
    let (id, matrix) = load(cli, dataset)?;
    let min_value = min_value.unwrap_or(id.spec().default_min_value);
    if !min_value.is_finite() || min_value < 0.0 {
        return Err(format!("--min-value must be finite and non-negative, got {}", min_value).into());
    }
    let filtered = top_n(&matrix, &TopNLimits::new(max_sources, max_targets));
    let edges = build_edges(&filtered, min_value);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&edges)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(["source", "source total", "target", "value"]);
            for edge in &edges {
                table.add_row([
                    edge.source.clone(),
                    format!("{:.2}", edge.source_total),
                    edge.target.clone(),
                    format!("{:.2}", edge.value),
                ]);
            }
            println!("{}", table);
            println!("{} edge(s)", edges.len());
        }
    }
    Ok(())
}

fn run_sankey(
    cli: &Cli,
    dataset: &str,
    max_sources: Option<usize>,
    max_targets: Option<usize>,
    min_value: Option<f64>,
) -> CliResult {
    let (id, matrix) = load(cli, dataset)?;
    let params = SankeyParams {
        max_sources,
        max_targets,
        min_value: min_value.unwrap_or(id.spec().default_min_value),
        max_nodes: None,
    };
    let graph = run_pipeline(&matrix, &params)?;

    match cli.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "title": id.spec().title,
                    "labels": graph.node_labels(),
                    "source": graph.source,
                    "target": graph.target,
                    "value": graph.value,
                }))?
            );
        }
        OutputFormat::Table => {
            println!("{} — {} nodes, {} links", id.spec().title, graph.node_count(), graph.link_count());
            let labels = graph.node_labels();
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(["source", "target", "value"]);
            for i in 0..graph.link_count() {
                table.add_row([
                    labels[graph.source[i]].clone(),
                    labels[graph.target[i]].clone(),
                    format!("{:.2}", graph.value[i]),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}
