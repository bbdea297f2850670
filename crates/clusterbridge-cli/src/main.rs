mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clusterbridge_core::BridgeConfig;
use clusterbridge_graph::{ClusterGraph, DeassignClusters, MIN_NONTRIVIAL_NODES};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "clusterbridge")]
#[command(about = "ClusterBridge - refine cluster assignments on computation graphs", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "CLUSTERBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove trivial clusters from a graph
    Deassign {
        /// Input graph JSON ("-" for stdin)
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave clusters untouched (pass bypass)
        #[arg(long)]
        disable: bool,

        /// Read and write cluster annotations as node attributes
        #[arg(long)]
        legacy_attributes: bool,

        /// Print a JSON report of busted clusters to stderr
        #[arg(long)]
        report: bool,
    },

    /// List clusters and whether they would survive deassignment
    Clusters {
        /// Input graph JSON ("-" for stdin)
        input: PathBuf,

        /// Read cluster annotations from node attributes
        #[arg(long)]
        legacy_attributes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = BridgeConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init_tracing(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Deassign {
            input,
            output,
            disable,
            legacy_attributes,
            report,
        } => {
            if disable {
                config.deassign.disabled = true;
            }
            let mut graph = read_graph(&input, legacy_attributes)?;

            let result = DeassignClusters::new(config.deassign.clone())
                .deassign(&mut graph)
                .context("deassigning clusters")?;
            info!(
                "busted {} clusters ({} nodes), {} clusters kept",
                result.busted.len(),
                result.busted_node_count(),
                result.surviving.len()
            );

            if legacy_attributes {
                graph.lower_to_legacy_annotations();
            }
            write_graph(&graph, output.as_deref())?;

            if report {
                eprintln!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Commands::Clusters {
            input,
            legacy_attributes,
        } => {
            let graph = read_graph(&input, legacy_attributes)?;
            print_clusters(&graph);
        }
    }

    Ok(())
}

fn read_graph(input: &Path, legacy_attributes: bool) -> Result<ClusterGraph> {
    let mut graph = if input == Path::new("-") {
        ClusterGraph::from_reader(io::stdin().lock()).context("reading graph from stdin")?
    } else {
        let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
        ClusterGraph::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing graph {}", input.display()))?
    };

    if legacy_attributes {
        graph
            .lift_legacy_annotations()
            .context("reading legacy cluster attributes")?;
    }
    Ok(graph)
}

fn write_graph(graph: &ClusterGraph, output: Option<&Path>) -> Result<()> {
    let json = graph.to_json_string_pretty()?;
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

fn print_clusters(graph: &ClusterGraph) {
    let clusters = graph.clusters();
    if clusters.is_empty() {
        println!("{}", "No clusters".yellow());
        return;
    }

    println!(
        "{:>8}  {:>7}  {:>11}  {}",
        "cluster".bold(),
        "members".bold(),
        "non-trivial".bold(),
        "verdict".bold()
    );
    for (id, members) in &clusters {
        let non_trivial = members
            .iter()
            .filter_map(|idx| graph.node(*idx))
            .filter(|node| !node.op.is_trivial())
            .count();
        let verdict = if non_trivial >= MIN_NONTRIVIAL_NODES {
            "keep".green()
        } else {
            "bust".red()
        };
        println!(
            "{:>8}  {:>7}  {:>11}  {}",
            id.get(),
            members.len(),
            non_trivial,
            verdict
        );
    }
}
