use std::process;
use std::time::Instant;

use clap::Parser;

use clfirst::ops;
use clfirst::session::{Session, SessionOptions};
use clfirst::status::FailureKind;

/// Run a strided vector-addition kernel on an OpenCL device.
#[derive(Parser)]
#[command(name = "vector-add", version)]
struct Cli {
    /// Number of elements in each vector
    #[arg(long, default_value_t = 128 * 1024)]
    size: usize,
    /// Platform index to use
    #[arg(long, default_value_t = 0)]
    platform: usize,
    /// Device index within the platform
    #[arg(long, default_value_t = 0)]
    device: usize,
}

fn main() {
    let cli = Cli::parse();
    if let Err(failure) = run(&cli) {
        eprintln!("{failure}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), FailureKind> {
    let session = Session::open(&SessionOptions {
        platform: cli.platform,
        device: cli.device,
    })?;
    println!("# Platforms found: {}", session.platform_count);
    println!("# Devices found: {}", session.device_count);
    println!("# Using device: {}", session.device_name()?);

    let mut x = vec![1.0f32; cli.size];
    let y = vec![2.0f32; cli.size];

    println!();
    println!("Vectors before kernel launch:");
    println!("x: {} ...", preview(&x));
    println!("y: {} ...", preview(&y));

    let start = Instant::now();
    ops::vec_add(&session, &mut x, &y)?;
    let elapsed = start.elapsed();

    println!();
    println!("Vectors after kernel execution:");
    println!("x: {} ...", preview(&x));
    println!("y: {} ...", preview(&y));
    println!();
    println!("Kernel round trip took {:.3} ms", elapsed.as_secs_f64() * 1e3);

    if x.iter().any(|&v| v != 3.0) {
        eprintln!("verification failed: expected every element of x to be 3");
        process::exit(1);
    }

    println!();
    println!("#");
    println!("# My first OpenCL application finished successfully!");
    println!("#");
    Ok(())
}

/// First three elements, space-separated, like the classic tutorial output.
fn preview(v: &[f32]) -> String {
    v.iter()
        .take(3)
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
