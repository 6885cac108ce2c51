//! Walk one frame through both search variants and print the diagnostics.
//!
//! Run with:
//!   cargo run -p prism --example size_budget

use prism::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let codec = JpegCodec::new()?;
    let mut source = VirtualSource::new(Resolution::new(320, 240).ok_or("bad resolution")?);
    let frame = source.next_frame().ok_or("source yielded no frame")?;
    let uncompressed = frame.byte_len();

    println!("quality-floor search (floor 0.35):");
    let result = search_by_quality(&codec, &frame, 0.35)?;
    print_steps(&result.steps);
    println!(
        "  -> q={} psnr={:.3} {} bytes\n",
        result.quality, result.psnr, result.compressed_len
    );

    println!("size-limited search over shrinking byte budgets:");
    for divisor in [1usize, 4, 16, 64, 256] {
        let limit = uncompressed / divisor;
        let result = search_by_size(&codec, &frame, limit)?;
        println!(
            "  limit {:>7} B -> q={:>3}, {:>6} B in {} attempts",
            limit,
            result.quality,
            result.len(),
            result.steps.len()
        );
    }
    Ok(())
}

fn print_steps(steps: &[SearchStep]) {
    // Same bracketed step trace the interactive tools show.
    print!("  [");
    for step in steps {
        match step.psnr {
            Some(psnr) => print!("{}:{:.3},", step.quality, psnr),
            None => print!("{}:{},", step.quality, step.bytes),
        }
    }
    println!("]");
}
