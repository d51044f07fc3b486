use std::process;
use std::time::Instant;

use clap::Parser;

use clfirst::ops;
use clfirst::session::{Session, SessionOptions};
use clfirst::status::FailureKind;

/// Run a workgroup-reduced dot-product kernel on an OpenCL device.
#[derive(Parser)]
#[command(name = "vector-dot", version)]
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

    let x = vec![1.0f32; cli.size];
    let y = vec![2.0f32; cli.size];

    let start = Instant::now();
    let result = ops::vec_dot(&session, &x, &y)?;
    let elapsed = start.elapsed();

    println!();
    println!("Result of dot(x,y): {}", result);
    println!("Kernel round trip took {:.3} ms", elapsed.as_secs_f64() * 1e3);

    // x is all ones and y all twos, so the exact answer is 2 * size.
    let expected = 2.0 * cli.size as f64;
    if (f64::from(result) - expected).abs() > expected * 1e-5 {
        eprintln!("verification failed: expected dot(x,y) = {expected}");
        process::exit(1);
    }

    println!();
    println!("#");
    println!("# My second OpenCL application finished successfully!");
    println!("#");
    Ok(())
}
