use angular_sampling::config::read_json_file;
use angular_sampling::random_lcg::{ParticleSeeds, Stream, DEFAULT_SEED};
use angular_sampling::unit_sphere_from_json;
use anyhow::{Context, Error};
use log::info;

// Usage: cargo run --example sample_directions -- <config.json> [n_particles] [seed]
fn main() -> Result<(), Error> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .context("failed to init logging")?;

    let mut args = std::env::args().skip(1);
    let path = args.next().context("expected angular distribution config file")?;
    let n_particles: u64 = match args.next() {
        Some(n) => n.parse().context("particle count must be an integer")?,
        None => 10,
    };
    let seed: u64 = match args.next() {
        Some(s) => s.parse().context("seed must be an integer")?,
        None => DEFAULT_SEED,
    };

    let node = read_json_file(&path).with_context(|| format!("failed to read {}", path))?;
    let dist = unit_sphere_from_json(&node).context("invalid angular distribution")?;
    info!("sampling {} particles from {} with seed {}", n_particles, path, seed);

    println!("=== Sampled source directions ===");
    let mut mean = [0.0; 3];
    for id in 1..=n_particles {
        let mut seeds = ParticleSeeds::new(id, seed);
        let u = dist.sample(seeds.stream(Stream::Source));
        println!("  particle {:>6}: ({:+.6}, {:+.6}, {:+.6})", id, u.x, u.y, u.z);
        mean[0] += u.x;
        mean[1] += u.y;
        mean[2] += u.z;
    }

    let n = n_particles.max(1) as f64;
    println!(
        "\nmean direction: ({:+.4}, {:+.4}, {:+.4})",
        mean[0] / n,
        mean[1] / n,
        mean[2] / n
    );
    Ok(())
}
