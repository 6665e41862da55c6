//! Read a Harwell-Boeing file back and multiply it by a vector

use hbsparse::{DenseArray, HbFile, Result, SparseConvert};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();
    let filename = "example_matrix.rua";

    if !std::path::Path::new(filename).exists() {
        println!("File '{filename}' not found!");
        println!("   Run 'cargo run --example write_matrix' first");
        return Ok(());
    }

    println!("Reading Harwell-Boeing matrix from '{filename}'...");
    let start = Instant::now();
    let mut file = HbFile::open(filename)?;
    println!(
        "Header parsed in {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let header = file.header().clone();
    println!("\nMatrix Information:");
    println!("   Title: {}", file.title());
    println!("   Key: {}", file.key());
    println!("   Type: {}", header.type_code());
    println!("   Dimensions: {} x {}", header.nrows(), header.ncols());
    println!("   Non-zeros: {}", header.nnon_zeros());
    println!("   Lines: {:?}", header.line_counts());

    let start = Instant::now();
    let matrix = file.read_matrix()?.to_real();
    println!(
        "\nData sections decoded in {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    // Re-block to 3x3 and multiply by the all-ones vector
    let start = Instant::now();
    let bsr = matrix.to_bsr((3, 3))?;
    let ones = DenseArray::from_vec(vec![1.0f64; header.ncols()]);
    let y = bsr.matvec(&ones)?;
    println!(
        "Re-blocked and multiplied in {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let row_sums = y.to_f64_vec();
    println!("   First row sums: {:?}", &row_sums[..row_sums.len().min(6)]);
    println!("   Total: {:.6}", row_sums.iter().sum::<f64>());
    Ok(())
}
