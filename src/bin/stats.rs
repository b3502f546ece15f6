use clap::Parser;
use scigraph::graph::load_graph;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stats")]
#[command(about = "Print summary statistics for a saved influence graph")]
struct Args {
    /// Path to a graph JSON file written by the crawler
    #[arg(default_value = "output/influence_graph.json")]
    path: PathBuf,

    /// How many top-degree names to list
    #[arg(short = 'n', long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let graph = load_graph(&args.path)?;

    println!("\n=== Influence Graph Statistics ===\n");
    println!("File:  {}", args.path.display());
    println!("Nodes: {}", graph.node_count());
    println!("Edges: {}", graph.edge_count());

    // Depth histogram; placeholder nodes (never visited) counted apart
    let mut by_depth: BTreeMap<u32, usize> = BTreeMap::new();
    let mut placeholders = 0usize;
    for (_, attrs) in graph.nodes() {
        match attrs.depth {
            Some(d) => *by_depth.entry(d).or_default() += 1,
            None => placeholders += 1,
        }
    }

    println!("\nNodes by depth:");
    for (depth, count) in &by_depth {
        println!("  depth {:>2}: {:>5}", depth, count);
    }
    if placeholders > 0 {
        println!("  unvisited placeholders: {}", placeholders);
    }

    let mut by_in: Vec<(&str, usize)> = graph
        .nodes()
        .map(|(name, _)| (name, graph.in_degree(name)))
        .collect();
    by_in.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    // Edges point source -> target with "source influenced target", so
    // out-degree measures influence exerted, in-degree influences received
    println!("\nMost influenced (in-degree):");
    for (name, degree) in by_in.iter().take(args.top) {
        println!("  {:>4}  {}", degree, name);
    }

    let mut by_out: Vec<(&str, usize)> = graph
        .nodes()
        .map(|(name, _)| (name, graph.out_degree(name)))
        .collect();
    by_out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    println!("\nMost influential (out-degree):");
    for (name, degree) in by_out.iter().take(args.top) {
        println!("  {:>4}  {}", degree, name);
    }

    println!();
    Ok(())
}
