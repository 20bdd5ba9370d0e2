use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cellmesh::config::{ClusteringConfig, LshConfig, SimilarPairsConfig};
use cellmesh::{Error, Mesh, Normalization, Result, StoreConfig};

/// Single-cell expression store: entity ingest, set algebra, LSH,
/// SimilarPairs, and cell-similarity-graph clustering.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty store directory
    Init { store: PathBuf },

    /// Add one cell, reading a two-column (gene,count) CSV with no header
    AddCell {
        store: PathBuf,
        cell_name: String,
        counts_csv: PathBuf,
    },

    /// Gene-set construction and algebra
    #[command(subcommand)]
    GeneSet(GeneSetCommand),

    /// Cell-set construction and algebra
    #[command(subcommand)]
    CellSet(CellSetCommand),

    /// Build the cell-similarity graph over (gene-set, cell-set), cluster it,
    /// and write cluster ids back to cell meta-data
    Cluster {
        store: PathBuf,
        gene_set: String,
        cell_set: String,
        /// Field name cluster ids are stored under
        #[arg(long, default_value = "cluster")]
        field: String,
        #[arg(long, default_value_t = 30)]
        k: usize,
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,
        #[arg(long)]
        use_lsh: bool,
        #[arg(long, default_value_t = 256)]
        lsh_bits: usize,
        #[arg(long, default_value_t = 0)]
        lsh_seed: u64,
        #[arg(long, default_value_t = 100)]
        max_iterations: usize,
        #[arg(long, default_value_t = 1)]
        min_cluster_size: usize,
        #[arg(long, default_value_t = 0)]
        permutation_seed: u64,
    },

    /// Print gene/cell counts and known set names
    Summary { store: PathBuf },
}

#[derive(Subcommand)]
enum GeneSetCommand {
    /// Genes whose name fully matches a regular expression
    Regex { store: PathBuf, name: String, pattern: String },
    /// Genes from an explicit, comma-separated name list
    Names { store: PathBuf, name: String, names: String },
    Union { store: PathBuf, out: String, a: String, b: String },
    Intersect { store: PathBuf, out: String, a: String, b: String },
    Difference { store: PathBuf, out: String, a: String, b: String },
    /// Genes whose information content over a cell-set exceeds a threshold
    InfoContent {
        store: PathBuf,
        out: String,
        gene_set: String,
        cell_set: String,
        threshold: f64,
        #[arg(long, default_value = "none")]
        norm: String,
    },
}

#[derive(Subcommand)]
enum CellSetCommand {
    Names { store: PathBuf, name: String, names: String },
    /// Cells with a meta-data field whose value fully matches a regex
    MetaRegex { store: PathBuf, name: String, field: String, pattern: String },
    Union { store: PathBuf, out: String, a: String, b: String },
    Intersect { store: PathBuf, out: String, a: String, b: String },
    Difference { store: PathBuf, out: String, a: String, b: String },
    Downsample { store: PathBuf, out: String, input: String, p: f64, seed: u64 },
}

fn parse_norm(s: &str) -> Result<Normalization> {
    match s {
        "none" => Ok(Normalization::None),
        "l1" => Ok(Normalization::L1),
        "l2" => Ok(Normalization::L2),
        other => Err(Error::InvalidInput(format!("unknown normalization {other}"))),
    }
}

fn split_names(s: &str) -> Vec<String> {
    s.split(',').map(|x| x.to_string()).collect()
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Init { store } => {
            let mesh = Mesh::create(&store, StoreConfig::default())?;
            mesh.close()?;
            println!("created store at {}", store.display());
        }
        Commands::AddCell { store, cell_name, counts_csv } => {
            let mut mesh = Mesh::open(&store, true)?;
            let mut reader = csv::ReaderBuilder::new().has_headers(false).from_path(&counts_csv)?;
            let mut counts = Vec::new();
            for record in reader.records() {
                let record = record?;
                let gene = record.get(0).unwrap_or_default().to_string();
                let count: f32 = record
                    .get(1)
                    .unwrap_or_default()
                    .parse()
                    .map_err(|_| Error::InvalidInput(format!("bad count in {}", counts_csv.display())))?;
                counts.push((gene, count));
            }
            let cell_id = mesh.add_cell(&[("CellName".to_string(), cell_name.clone())], &counts)?;
            mesh.close()?;
            println!("added cell {cell_name} (id {cell_id})");
        }
        Commands::GeneSet(cmd) => run_gene_set(cmd)?,
        Commands::CellSet(cmd) => run_cell_set(cmd)?,
        Commands::Cluster {
            store,
            gene_set,
            cell_set,
            field,
            k,
            threshold,
            use_lsh,
            lsh_bits,
            lsh_seed,
            max_iterations,
            min_cluster_size,
            permutation_seed,
        } => {
            let mut mesh = Mesh::open(&store, true)?;
            let view = mesh.build_subset_view(&gene_set, &cell_set)?;
            let sp_cfg = SimilarPairsConfig {
                k,
                similarity_threshold: threshold,
            };
            let pairs = if use_lsh {
                let lsh_cfg = LshConfig {
                    lsh_bit_count: lsh_bits,
                    lsh_seed,
                };
                mesh.build_similar_pairs_lsh(&view, &lsh_cfg, &sp_cfg)
            } else {
                mesh.build_similar_pairs_exact(&view, &sp_cfg)
            };
            let cell_set_ids = view.cell_set().to_vec();
            let clustering_cfg = ClusteringConfig {
                max_iterations,
                min_cluster_size,
                permutation_seed,
            };
            let graph = mesh.cluster_and_store(&cell_set_ids, &pairs, &clustering_cfg, &field)?;
            mesh.close()?;
            println!("vertices={} edges={}", graph.vertex_count(), graph.edge_count());
        }
        Commands::Summary { store } => {
            let mesh = Mesh::open(&store, false)?;
            let sa = mesh.sets();
            println!("genes: {}", mesh.store.n_genes());
            println!("cells: {}", mesh.store.n_cells());
            println!("gene-sets: {:?}", sa.list_gene_sets());
            println!("cell-sets: {:?}", sa.list_cell_sets());
        }
    }
    Ok(())
}

fn run_gene_set(cmd: GeneSetCommand) -> Result<()> {
    match cmd {
        GeneSetCommand::Regex { store, name, pattern } => {
            let mesh = Mesh::open(&store, true)?;
            let created = mesh.sets().create_gene_set_by_regex(&name, &pattern)?;
            println!("created={created}");
        }
        GeneSetCommand::Names { store, name, names } => {
            let mesh = Mesh::open(&store, true)?;
            let result = mesh.sets().create_gene_set_by_names(&name, &split_names(&names))?;
            println!("{result:?}");
        }
        GeneSetCommand::Union { store, out, a, b } => {
            let mesh = Mesh::open(&store, true)?;
            println!("created={}", mesh.sets().union_gene_sets(&out, &a, &b)?);
        }
        GeneSetCommand::Intersect { store, out, a, b } => {
            let mesh = Mesh::open(&store, true)?;
            println!("created={}", mesh.sets().intersect_gene_sets(&out, &a, &b)?);
        }
        GeneSetCommand::Difference { store, out, a, b } => {
            let mesh = Mesh::open(&store, true)?;
            println!("created={}", mesh.sets().difference_gene_sets(&out, &a, &b)?);
        }
        GeneSetCommand::InfoContent { store, out, gene_set, cell_set, threshold, norm } => {
            let mesh = Mesh::open(&store, true)?;
            let norm = parse_norm(&norm)?;
            let created = mesh.sets().create_gene_set_by_info_content(&out, &gene_set, &cell_set, norm, threshold)?;
            println!("created={created}");
        }
    }
    Ok(())
}

fn run_cell_set(cmd: CellSetCommand) -> Result<()> {
    match cmd {
        CellSetCommand::Names { store, name, names } => {
            let mesh = Mesh::open(&store, true)?;
            let result = mesh.sets().create_cell_set_by_names(&name, &split_names(&names))?;
            println!("{result:?}");
        }
        CellSetCommand::MetaRegex { store, name, field, pattern } => {
            let mesh = Mesh::open(&store, true)?;
            println!("created={}", mesh.sets().create_cell_set_by_meta_regex(&name, &field, &pattern)?);
        }
        CellSetCommand::Union { store, out, a, b } => {
            let mesh = Mesh::open(&store, true)?;
            println!("created={}", mesh.sets().union_cell_sets(&out, &a, &b)?);
        }
        CellSetCommand::Intersect { store, out, a, b } => {
            let mesh = Mesh::open(&store, true)?;
            println!("created={}", mesh.sets().intersect_cell_sets(&out, &a, &b)?);
        }
        CellSetCommand::Difference { store, out, a, b } => {
            let mesh = Mesh::open(&store, true)?;
            println!("created={}", mesh.sets().difference_cell_sets(&out, &a, &b)?);
        }
        CellSetCommand::Downsample { store, out, input, p, seed } => {
            let mesh = Mesh::open(&store, true)?;
            println!("created={}", mesh.sets().downsample_cell_set(&out, &input, p, seed)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    run()
}
