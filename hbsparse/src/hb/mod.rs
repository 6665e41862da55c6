//! Harwell-Boeing file reading and writing
//!
//! [`HbFile`] parses the four header lines up front and decodes the data
//! sections on demand. The `read_hb*`/`write_hb*` functions cover the
//! common one-shot cases; the path-based ones open and close the file
//! themselves.

pub mod codec;

pub use codec::{decode, encode, HbArrays, HbValues};

use crate::config::HbWriteOptions;
use crate::error::Result;
use crate::sparse::CscMatrix;
use hbsparse_core::{
    CompressedColumns, HbHeader, SparseError, SparseMatrix, Storage, Structure, ValueKind,
};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Matrix read from a Harwell-Boeing file
#[derive(Debug, Clone, PartialEq)]
pub enum HbMatrix {
    Real(CscMatrix<f64>),
    Integer(CscMatrix<i64>),
}

impl HbMatrix {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            HbMatrix::Real(m) => m.shape(),
            HbMatrix::Integer(m) => m.shape(),
        }
    }

    pub fn nnz(&self) -> usize {
        match self {
            HbMatrix::Real(m) => m.nnz(),
            HbMatrix::Integer(m) => m.nnz(),
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            HbMatrix::Real(_) => ValueKind::Real,
            HbMatrix::Integer(_) => ValueKind::Integer,
        }
    }

    /// Real matrix, if the file held real values
    pub fn into_real(self) -> Option<CscMatrix<f64>> {
        match self {
            HbMatrix::Real(m) => Some(m),
            HbMatrix::Integer(_) => None,
        }
    }

    /// Integer matrix, if the file held integer values
    pub fn into_integer(self) -> Option<CscMatrix<i64>> {
        match self {
            HbMatrix::Integer(m) => Some(m),
            HbMatrix::Real(_) => None,
        }
    }

    /// Values widened to `f64`
    pub fn to_real(&self) -> CscMatrix<f64> {
        match self {
            HbMatrix::Real(m) => m.clone(),
            HbMatrix::Integer(m) => {
                let data = m.data().iter().map(|&v| v as f64).collect();
                CscMatrix::from_parts(m.shape(), m.indptr().to_vec(), m.indices().to_vec(), data)
            }
        }
    }

    /// Write to `writer` with a header derived from `options`
    pub fn write_to<W: Write>(&self, writer: &mut W, options: &HbWriteOptions) -> Result<()> {
        match self {
            HbMatrix::Real(m) => write_hb_to(writer, m, options),
            HbMatrix::Integer(m) => write_hb_to(writer, m, options),
        }
    }
}

impl From<CscMatrix<f64>> for HbMatrix {
    fn from(m: CscMatrix<f64>) -> Self {
        HbMatrix::Real(m)
    }
}

impl From<CscMatrix<i64>> for HbMatrix {
    fn from(m: CscMatrix<i64>) -> Self {
        HbMatrix::Integer(m)
    }
}

/// Harwell-Boeing input with its header already parsed
pub struct HbFile<R> {
    header: HbHeader,
    reader: R,
}

impl HbFile<BufReader<File>> {
    /// Open a file and parse its header
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("opening Harwell-Boeing file {}", path.display());
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: BufRead> HbFile<R> {
    /// Read and parse the four header lines from `reader`
    pub fn new(mut reader: R) -> Result<Self> {
        let mut lines: [String; 4] = Default::default();
        for (i, line) in lines.iter_mut().enumerate() {
            if reader.read_line(line)? == 0 {
                return Err(SparseError::malformed_header(i + 1, "unexpected end of input").into());
            }
        }
        let header = HbHeader::parse([
            lines[0].as_str(),
            lines[1].as_str(),
            lines[2].as_str(),
            lines[3].as_str(),
        ])?;
        log::debug!(
            "parsed {} header for a {}x{} matrix with {} entries",
            header.type_code(),
            header.nrows(),
            header.ncols(),
            header.nnon_zeros()
        );
        Ok(Self { header, reader })
    }

    pub fn header(&self) -> &HbHeader {
        &self.header
    }

    pub fn title(&self) -> &str {
        self.header.title()
    }

    pub fn key(&self) -> &str {
        self.header.key()
    }

    pub fn value_kind(&self) -> ValueKind {
        self.header.type_code().value_kind
    }

    pub fn structure(&self) -> Structure {
        self.header.type_code().structure
    }

    pub fn storage(&self) -> Storage {
        self.header.type_code().storage
    }

    /// Decode the data sections into a CSC matrix
    pub fn read_matrix(&mut self) -> Result<HbMatrix> {
        let HbArrays {
            indptr,
            indices,
            values,
        } = decode(&self.header, &mut self.reader)?;
        let shape = self.header.shape();
        let matrix = match values {
            HbValues::Real(data) => HbMatrix::Real(CscMatrix::new(shape, indptr, indices, data)?),
            HbValues::Integer(data) => {
                HbMatrix::Integer(CscMatrix::new(shape, indptr, indices, data)?)
            }
        };
        Ok(matrix)
    }

    /// Give back the reader, positioned after whatever has been consumed
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Read a Harwell-Boeing file
pub fn read_hb<P: AsRef<Path>>(path: P) -> Result<HbMatrix> {
    HbFile::open(path)?.read_matrix()
}

/// Read a Harwell-Boeing matrix from any buffered reader
pub fn read_hb_from<R: BufRead>(reader: R) -> Result<HbMatrix> {
    HbFile::new(reader)?.read_matrix()
}

fn derive_header<M: CompressedColumns>(matrix: &M, options: &HbWriteOptions) -> Result<HbHeader> {
    Ok(HbHeader::derive_with_precision(
        matrix,
        &options.title,
        &options.key,
        options.significand_digits,
        options.exponent_digits,
    )?)
}

/// Write `matrix` to a new file at `path`
///
/// The whole file is rendered before it is created, so a matrix that fails
/// to encode never leaves a file behind.
pub fn write_hb<P, M>(path: P, matrix: &M, options: &HbWriteOptions) -> Result<()>
where
    P: AsRef<Path>,
    M: CompressedColumns,
{
    let path = path.as_ref();
    let header = derive_header(matrix, options)?;
    let mut text = Vec::new();
    write_hb_with_header(&mut text, matrix, &header)?;
    File::create(path)?.write_all(&text)?;
    log::info!(
        "wrote {}x{} matrix with {} entries to {}",
        header.nrows(),
        header.ncols(),
        header.nnon_zeros(),
        path.display()
    );
    Ok(())
}

/// Write `matrix` to `writer` with a header derived from `options`
pub fn write_hb_to<W, M>(writer: &mut W, matrix: &M, options: &HbWriteOptions) -> Result<()>
where
    W: Write,
    M: CompressedColumns,
{
    let header = derive_header(matrix, options)?;
    write_hb_with_header(writer, matrix, &header)
}

/// Write `matrix` to `writer` under a prepared header
pub fn write_hb_with_header<W, M>(writer: &mut W, matrix: &M, header: &HbHeader) -> Result<()>
where
    W: Write,
    M: CompressedColumns,
{
    encode(header, matrix, writer)
}
