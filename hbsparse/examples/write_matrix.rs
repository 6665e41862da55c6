//! Build a block sparse matrix and write it as a Harwell-Boeing file

use hbsparse::{write_hb, BsrMatrix, HbWriteOptions, Result, SparseConvert, SparseMatrix};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();
    println!("Building a block-tridiagonal BSR matrix...");

    // 3x3 blocks on the diagonal and both neighbours
    let block_rows = 2_000;
    let blocksize = (3, 3);
    let shape = (block_rows * blocksize.0, block_rows * blocksize.1);

    let start = Instant::now();
    let bsr = build_block_tridiagonal(block_rows, blocksize)?;
    println!(
        "Built {} x {} matrix with {} blocks ({} stored values) in {:?}",
        shape.0,
        shape.1,
        bsr.num_blocks(),
        bsr.nnz(),
        start.elapsed()
    );

    // Harwell-Boeing files hold compressed columns
    let start = Instant::now();
    let csc = bsr.to_csc();
    println!("Converted to CSC in {:?}", start.elapsed());

    let start = Instant::now();
    let options = HbWriteOptions::with_title("Block tridiagonal example").with_key("BTRI");
    write_hb("example_matrix.rua", &csc, &options)?;
    println!("Matrix written in {:?}", start.elapsed());
    println!("\nRun 'cargo run --example read_matrix' to read it back!");
    Ok(())
}

fn build_block_tridiagonal(block_rows: usize, blocksize: (usize, usize)) -> Result<BsrMatrix<f64>> {
    let (x, y) = blocksize;
    let mut indptr = Vec::with_capacity(block_rows + 1);
    let mut indices = Vec::new();
    let mut data = Vec::new();
    indptr.push(0);

    for i in 0..block_rows {
        for j in i.saturating_sub(1)..(i + 2).min(block_rows) {
            indices.push(j);
            for r in 0..x {
                for c in 0..y {
                    let value = if i == j && r == c {
                        4.0
                    } else {
                        -1.0 / (1 + r + c) as f64
                    };
                    data.push(value);
                }
            }
        }
        indptr.push(indices.len());
    }

    Ok(BsrMatrix::new(
        (block_rows * x, block_rows * y),
        blocksize,
        indptr,
        indices,
        data,
    )?)
}
