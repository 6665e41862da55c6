#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use hbsparse::{read_hb, HbFile, SparseConvert, SparseMatrix};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "hb-info - Inspect and query Harwell-Boeing sparse matrix files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Show the parsed header
    Info {
        /// Path to a Harwell-Boeing file
        path: std::path::PathBuf,

        /// Print the header as JSON
        #[arg(long)]
        json: bool,
    },
    /// Query a stored element
    Get {
        /// Path to a Harwell-Boeing file
        path: std::path::PathBuf,

        #[arg(long)]
        row: usize,

        #[arg(long)]
        col: usize,
    },
    /// Count stored blocks when re-blocked to ROWSxCOLS
    Blocks {
        /// Path to a Harwell-Boeing file
        path: std::path::PathBuf,

        /// Block shape (format: rows:cols)
        #[arg(long, default_value = "2:2")]
        blocksize: String,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let start_time = std::time::Instant::now();

    match &cli.command {
        Commands::Info { path, json } => handle_info(path, *json)?,
        Commands::Get { path, row, col } => {
            let matrix = read_hb(path)?.to_real();
            match matrix.get_element(*row, *col) {
                Some(value) => println!("Element at ({row}, {col}): {value}"),
                None => println!("No element at ({row}, {col})"),
            }
        }
        Commands::Blocks { path, blocksize } => {
            let blocksize = parse_blocksize(blocksize)?;
            let bsr = read_hb(path)?.to_real().to_bsr(blocksize)?;
            let (mb, nb) = bsr.block_grid();
            println!(
                "{} of {} blocks stored ({:.2}% fill inside stored blocks)",
                bsr.num_blocks(),
                mb * nb,
                100.0 * bsr.data().iter().filter(|v| **v != 0.0).count() as f64
                    / bsr.nnz().max(1) as f64
            );
        }
    }

    let elapsed = start_time.elapsed();
    println!("Completed in {elapsed:.2?}");
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This example requires the 'cli' feature to be enabled.");
    eprintln!("Run with: cargo run --features cli --example hb_info");
    std::process::exit(1);
}

#[cfg(feature = "cli")]
fn handle_info(path: &std::path::Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let file = HbFile::open(path)?;
    let header = file.header();

    if json {
        #[cfg(feature = "serde")]
        {
            println!("{}", serde_json::to_string_pretty(header)?);
            return Ok(());
        }
        #[cfg(not(feature = "serde"))]
        eprintln!("JSON output requires the 'serde' feature; printing text instead");
    }

    println!("Title: {}", header.title());
    println!("Key: {}", header.key());
    println!(
        "Type: {} ({} {} {})",
        header.type_code(),
        file.value_kind().name(),
        file.structure().name(),
        file.storage().name()
    );
    println!("Dimensions: {} x {}", header.nrows(), header.ncols());
    println!("Non-zeros: {}", header.nnon_zeros());
    println!("Line counts: {:?}", header.line_counts());
    print!("{header}");
    Ok(())
}

#[cfg(feature = "cli")]
fn parse_blocksize(text: &str) -> Result<(usize, usize), String> {
    let (rows, cols) = text
        .split_once(':')
        .ok_or_else(|| format!("block shape '{text}' must look like rows:cols"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|_| format!("'{s}' is not a block dimension"))
    };
    Ok((parse(rows)?, parse(cols)?))
}
