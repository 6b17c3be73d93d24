//! Netfit CLI - Score flattened nets against a target silhouette.

use std::fs;
use std::path::PathBuf;

use netfit::compute::{CutLengthEvaluator, HullAreaEvaluator, MeshUnfolding, NetEvaluator, PolygonFitEvaluator};
use netfit::schema::{Contour, CurveDbConfig, Net, Point, UnfoldConfig};

/// Adapter exposing a pre-flattened net (loaded from JSON) through the
/// mesh-unfolding interface. Rebuild requests are no-ops: the net is final.
struct StaticNet {
    net: Net,
    config: UnfoldConfig,
}

impl StaticNet {
    fn new(net: Net) -> Self {
        Self {
            net,
            config: UnfoldConfig::default(),
        }
    }
}

impl MeshUnfolding for StaticNet {
    fn rebuild_from_genome(&mut self, _genome: &[f64], _check_overlaps: bool) -> usize {
        0
    }
    fn count_local_overlaps(&self) -> usize {
        0
    }
    fn count_all_overlaps(&mut self) -> usize {
        0
    }
    fn force_full_rebuild(&mut self) {}
    fn current_net(&self) -> &Net {
        &self.net
    }
    fn current_config(&self) -> &UnfoldConfig {
        &self.config
    }
    fn total_cut_length(&self) -> f64 {
        self.net.boundary.perimeter()
    }
    fn convex_hull_area(&self) -> f64 {
        self.net.boundary.convex_hull_area()
    }
    fn face_count(&self) -> usize {
        self.net.face_count
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_net();
        return;
    }

    if args.len() < 3 {
        eprintln!("Usage: {} <stencil-image> <net.json> [net.json ...]", args[0]);
        eprintln!();
        eprintln!("Score flattened nets against a target silhouette.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  stencil-image  Reference silhouette the nets are matched against");
        eprintln!("  net.json       One or more flattened nets (boundary + face count)");
        eprintln!();
        eprintln!("An example net file is printed with the --example flag.");
        eprintln!("The best-ever match is rendered to the working directory on exit.");
        std::process::exit(1);
    }

    let stencil_path = PathBuf::from(&args[1]);
    let config = CurveDbConfig::default();

    // Stencil problems are fatal here, at startup, never mid-run.
    let mut polygon_fit =
        PolygonFitEvaluator::with_config(&stencil_path, config).unwrap_or_else(|e| {
            eprintln!("Error building target shape index: {}", e);
            std::process::exit(1);
        });

    println!("Netfit");
    println!("======");
    println!("Stencil: {}", stencil_path.display());
    println!(
        "Target contour: {} points, {} curve segments",
        polygon_fit.target().contour().len(),
        polygon_fit.target().db().spans().len()
    );
    println!();

    let mut cut_length = CutLengthEvaluator;
    let mut hull_area = HullAreaEvaluator;

    for net_path in &args[2..] {
        let net_str = fs::read_to_string(net_path).unwrap_or_else(|e| {
            eprintln!("Error reading net file {}: {}", net_path, e);
            std::process::exit(1);
        });
        let net: Net = serde_json::from_str(&net_str).unwrap_or_else(|e| {
            eprintln!("Error parsing net file {}: {}", net_path, e);
            std::process::exit(1);
        });

        let mut unfolder = StaticNet::new(net);
        let fit = polygon_fit.score(&mut unfolder);
        let cut = cut_length.score(&mut unfolder);
        let hull = hull_area.score(&mut unfolder);

        println!("{}", net_path);
        println!("  polygon fit:  {:.6e}", fit);
        println!("  cut length:   {:.4}", cut);
        println!("  1/hull area:  {:.6e}", hull);
    }

    println!();
    println!(
        "Best match error across run: {:.6e}",
        polygon_fit.best_state().min_error()
    );
    // Dropping the evaluator renders the best-ever match artifact.
}

fn print_example_net() {
    let net = Net::new(
        Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(1.0, 2.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]),
        4,
    );

    println!("Example net (net.json):");
    println!("{}", serde_json::to_string_pretty(&net).unwrap());
}
