//! Unfolds a rational triangle billiard and prints the resulting surface.
//!
//! Usage:
//! ```text
//! cargo run --example unfold -- 1 1 2              # floating arithmetic
//! cargo run --example unfold -- 1 2 4 --exact      # exact cyclotomic arithmetic
//! cargo run --example unfold -- 2 3 4 --perturb    # random closed deformation
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use unfold::algebra::{Arithmetic, NumberField};
use unfold::operations::assembly::CompleteSurface;
use unfold::operations::creation::MakeTriangle;
use unfold::operations::deformation::PerturbAll;
use unfold::operations::query::SurfaceStatistics;
use unfold::{Result, Surface, SurfaceConfig};

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for unfold.
    // Override with RUST_LOG env var (e.g. RUST_LOG=unfold=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("unfold=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let angles: Vec<u32> = args.iter().filter_map(|a| a.parse().ok()).collect();
    let [a, b, c] = angles[..] else {
        eprintln!("usage: unfold <a> <b> <c> [--exact] [--perturb]");
        std::process::exit(2);
    };
    let exact = args.iter().any(|a| a == "--exact");
    let perturb = args.iter().any(|a| a == "--perturb");

    let triangle = MakeTriangle::from_angles(a, b, c);
    let mut config = SurfaceConfig::new().with_billiard(true);
    if exact {
        config = config.with_arithmetic(Arithmetic::Exact(NumberField::cyclotomic(triangle.field_order())));
    }
    let mut surface = Surface::new(config);
    triangle.execute(&mut surface)?;

    let completion = CompleteSurface::new().execute(&mut surface)?;
    println!("reflections: {}", completion.reflections);

    if perturb && exact {
        eprintln!("--perturb deforms floating coordinates only; ignored with --exact");
    } else if perturb {
        let perturbation = PerturbAll::new(1e-3).execute(&mut surface, &mut StdRng::seed_from_u64(0))?;
        println!("deformation rank: {}, free directions: {}", perturbation.rank, perturbation.nullity);
    }

    let stats = SurfaceStatistics::new().execute(&surface);
    println!(
        "V = {}, E = {}, F = {}, chi = {}",
        stats.vertices, stats.edges, stats.faces, stats.euler_characteristic
    );
    if let Some(genus) = stats.genus {
        println!("genus: {genus}");
    }
    for (id, vertex) in surface.vertices() {
        println!(
            "{id:?}: total angle {:.6} pi, valence {}",
            vertex.total_angle / std::f64::consts::PI,
            vertex.valence
        );
    }
    Ok(())
}
