//! Fixed-width data sections of a Harwell-Boeing file
//!
//! The three sections (column pointers, row indices, values) follow the
//! four header lines. Each is a run of lines holding `repeat` fields of
//! `width` characters, the last line possibly partial. Indices are
//! one-based on disk and zero-based in memory.

use crate::error::Result;
use hbsparse_core::validation::RecordLayout;
use hbsparse_core::{
    CompressedColumns, FieldFormat, FieldValue, HbHeader, MatrixElement, Section, SparseError,
    ValueKind,
};
use std::io::{BufRead, Write};

/// Values section, typed by the header's value kind
#[derive(Debug, Clone, PartialEq)]
pub enum HbValues {
    Real(Vec<f64>),
    Integer(Vec<i64>),
}

/// Zero-based compressed-column arrays decoded from the data sections
#[derive(Debug, Clone, PartialEq)]
pub struct HbArrays {
    pub indptr: Vec<usize>,
    pub indices: Vec<usize>,
    pub values: HbValues,
}

fn check_supported(header: &HbHeader) -> std::result::Result<(), SparseError> {
    let code = header.type_code();
    if code.is_supported_by_codec() {
        return Ok(());
    }
    Err(SparseError::Unsupported(format!(
        "{code} matrices ({} {} {}) cannot be read or written; \
         only real or integer, unsymmetric, assembled matrices are supported",
        code.value_kind.name(),
        code.structure.name(),
        code.storage.name()
    )))
}

/// Decode the data sections that follow `header`
///
/// Reads exactly the lines the header announces, so `reader` is left just
/// past the values section.
pub fn decode<R: BufRead>(header: &HbHeader, reader: &mut R) -> Result<HbArrays> {
    check_supported(header)?;

    let indptr = read_section(reader, header, Section::Pointer, decode_index)?;
    let indices = read_section(reader, header, Section::Indices, decode_index)?;
    let values = match header.type_code().value_kind {
        ValueKind::Integer => HbValues::Integer(read_section(
            reader,
            header,
            Section::Values,
            FieldFormat::decode_integer,
        )?),
        _ => HbValues::Real(read_section(
            reader,
            header,
            Section::Values,
            FieldFormat::decode_real,
        )?),
    };

    Ok(HbArrays {
        indptr,
        indices,
        values,
    })
}

fn decode_index(field: &str) -> std::result::Result<usize, SparseError> {
    let value = FieldFormat::decode_integer(field)?;
    if value < 1 {
        return Err(SparseError::InvalidStructure(format!(
            "index {value} is not a valid one-based index"
        )));
    }
    usize::try_from(value - 1).map_err(|_| SparseError::InvalidNumber(field.trim().to_string()))
}

fn read_section<R, T, F>(reader: &mut R, header: &HbHeader, section: Section, decode: F) -> Result<Vec<T>>
where
    R: BufRead,
    F: Fn(&str) -> std::result::Result<T, SparseError>,
{
    let count = header.section_len(section);
    let format = header.format(section);
    let (repeat, width) = (format.repeat(), format.width());
    let truncated = |read: usize| SparseError::TruncatedSection {
        section: section.name(),
        missing: count - read,
    };

    let mut out = Vec::with_capacity(count);
    let mut line = String::new();
    for _ in 0..header.nlines(section) {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(truncated(out.len()).into());
        }
        let text = line.trim_end_matches(['\n', '\r']);
        let fields = repeat.min(count - out.len());
        if text.len() < fields * width {
            return Err(truncated(out.len()).into());
        }
        for f in 0..fields {
            let field = text
                .get(f * width..(f + 1) * width)
                .ok_or_else(|| SparseError::InvalidNumber(text.to_string()))?;
            out.push(decode(field)?);
        }
    }
    if out.len() < count {
        return Err(truncated(out.len()).into());
    }

    log::debug!(
        "read {} {} fields over {} lines",
        out.len(),
        section.name(),
        header.nlines(section)
    );
    Ok(out)
}

/// Render `header` and the data sections of `matrix` and write them out
///
/// The whole file text is built before the first byte reaches `writer`, so
/// a failed check or an overflowing field leaves `writer` untouched.
pub fn encode<W, M>(header: &HbHeader, matrix: &M, writer: &mut W) -> Result<()>
where
    W: Write,
    M: CompressedColumns,
{
    check_supported(header)?;
    check_matches(header, matrix)?;

    let mut text = header.render();
    let one_based = |&i: &usize| FieldValue::Integer(i as i64 + 1);
    render_section(
        &mut text,
        header,
        Section::Pointer,
        matrix.indptr().iter().map(one_based),
    )?;
    render_section(
        &mut text,
        header,
        Section::Indices,
        matrix.indices().iter().map(one_based),
    )?;
    render_section(
        &mut text,
        header,
        Section::Values,
        matrix.values().iter().map(|v| v.to_field_value()),
    )?;

    writer.write_all(text.as_bytes())?;
    Ok(())
}

fn check_matches<M: CompressedColumns>(
    header: &HbHeader,
    matrix: &M,
) -> std::result::Result<(), SparseError> {
    let (nrows, ncols) = matrix.shape();
    if header.shape() != (nrows, ncols) {
        return Err(SparseError::dimension_mismatch(
            &[header.nrows(), header.ncols()],
            &[nrows, ncols],
        ));
    }
    let got = [
        matrix.indptr().len(),
        matrix.indices().len(),
        matrix.values().len(),
    ];
    let expected = [
        header.pointer_len(),
        header.indices_len(),
        header.values_len(),
    ];
    if got != expected {
        return Err(SparseError::dimension_mismatch(&expected, &got));
    }
    let kind = M::Element::data_type().value_kind();
    if kind != header.type_code().value_kind {
        return Err(SparseError::InvalidHeader(format!(
            "header declares {} values but the matrix holds {}",
            header.type_code().value_kind.name(),
            kind.name()
        )));
    }
    Ok(())
}

fn render_section<I>(
    out: &mut String,
    header: &HbHeader,
    section: Section,
    values: I,
) -> std::result::Result<(), SparseError>
where
    I: ExactSizeIterator<Item = FieldValue>,
{
    let format = header.format(section);
    let layout = RecordLayout::new(values.len(), format.repeat());
    if layout.lines() != header.nlines(section) {
        return Err(SparseError::InvalidHeader(format!(
            "{} section needs {} lines but the header declares {}",
            section.name(),
            layout.lines(),
            header.nlines(section)
        )));
    }

    let mut on_line = 0;
    for value in values {
        format.render(value, out)?;
        on_line += 1;
        if on_line == format.repeat() {
            out.push('\n');
            on_line = 0;
        }
    }
    if layout.remainder > 0 {
        out.push('\n');
    }

    log::debug!(
        "rendered {} lines of {} fields ({} full, {} on the last)",
        layout.lines(),
        section.name(),
        layout.full_lines,
        layout.remainder
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::CscMatrix;
    use hbsparse_core::{HbHeader, MatrixTypeCode, Storage, Structure};
    use std::io::Cursor;

    fn sample() -> CscMatrix<f64> {
        CscMatrix::new(
            (3, 3),
            vec![0, 2, 3, 5],
            vec![0, 2, 2, 0, 1],
            vec![1.0, 4.0, 5.0, -2.5, 3.0e10],
        )
        .unwrap()
    }

    fn encoded<M: CompressedColumns>(header: &HbHeader, matrix: &M) -> String {
        let mut out = Vec::new();
        encode(header, matrix, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn body(text: &str) -> Cursor<Vec<u8>> {
        let rest: Vec<&str> = text.lines().skip(4).collect();
        Cursor::new(rest.join("\n").into_bytes())
    }

    #[test]
    fn test_encode_layout() {
        let matrix = sample();
        let header = HbHeader::derive(&matrix, "codec test", "k1").unwrap();
        let text = encoded(&header, &matrix);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4 + header.total_nlines());
        assert_eq!(lines[4], " 1 3 4 6");
        assert_eq!(lines[5], " 1 3 3 1 2");
        assert!(lines[6].starts_with("  1.0000000000000000E+000"));
        assert_eq!(lines[6].len(), 75);
        assert_eq!(lines[7].len(), 50);
        assert!(lines[7].ends_with("3.0000000000000000E+010"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_decode_round_trip() {
        let matrix = sample();
        let header = HbHeader::derive(&matrix, "codec test", "k1").unwrap();
        let text = encoded(&header, &matrix);

        let arrays = decode(&header, &mut body(&text)).unwrap();
        assert_eq!(arrays.indptr, matrix.indptr());
        assert_eq!(arrays.indices, matrix.indices());
        assert_eq!(arrays.values, HbValues::Real(matrix.data().to_vec()));
    }

    #[test]
    fn test_integer_values() {
        let matrix = CscMatrix::new((2, 2), vec![0, 1, 2], vec![1, 0], vec![-40i64, 7]).unwrap();
        let header = HbHeader::derive(&matrix, "ints", "").unwrap();
        let text = encoded(&header, &matrix);
        assert_eq!(text.lines().nth(6), Some("-40  7"));

        let arrays = decode(&header, &mut body(&text)).unwrap();
        assert_eq!(arrays.values, HbValues::Integer(vec![-40, 7]));
        assert_eq!(arrays.indices, vec![1, 0]);
    }

    #[test]
    fn test_truncated_section() {
        let matrix = sample();
        let header = HbHeader::derive(&matrix, "codec test", "k1").unwrap();
        let err = decode(&header, &mut Cursor::new(" 1 3 4 6\n 1 3\n")).unwrap_err();
        assert_eq!(
            err.as_sparse(),
            Some(&SparseError::TruncatedSection {
                section: Section::Indices.name(),
                missing: 5,
            })
        );

        let err = decode(&header, &mut Cursor::new(" 1 3 4 6\n")).unwrap_err();
        assert!(matches!(
            err.as_sparse(),
            Some(SparseError::TruncatedSection { .. })
        ));
    }

    #[test]
    fn test_bad_fields() {
        let matrix = sample();
        let header = HbHeader::derive(&matrix, "codec test", "k1").unwrap();
        let err = decode(&header, &mut Cursor::new(" 1 x 4 6\n")).unwrap_err();
        assert!(matches!(err.as_sparse(), Some(SparseError::InvalidNumber(_))));

        let err = decode(&header, &mut Cursor::new(" 0 3 4 6\n")).unwrap_err();
        assert!(matches!(err.as_sparse(), Some(SparseError::InvalidStructure(_))));
    }

    #[test]
    fn test_rejects_unsupported_before_writing() {
        let matrix = sample();
        let derived = HbHeader::derive(&matrix, "t", "k").unwrap();
        let symmetric = HbHeader::new(
            "t",
            "k",
            MatrixTypeCode::new(ValueKind::Real, Structure::Symmetric, Storage::Assembled),
            3,
            3,
            5,
            *derived.format(Section::Pointer),
            *derived.format(Section::Indices),
            *derived.format(Section::Values),
        )
        .unwrap();

        let mut out = Vec::new();
        let err = encode(&symmetric, &matrix, &mut out).unwrap_err();
        assert!(matches!(err.as_sparse(), Some(SparseError::Unsupported(_))));
        assert!(out.is_empty());
        assert!(decode(&symmetric, &mut Cursor::new("")).is_err());
    }

    #[test]
    fn test_rejects_mismatched_matrix() {
        let matrix = sample();
        let header = HbHeader::derive(&matrix, "t", "k").unwrap();
        let other = CscMatrix::new((3, 2), vec![0, 1, 1], vec![0], vec![1.0f64]).unwrap();

        let mut out = Vec::new();
        let err = encode(&header, &other, &mut out).unwrap_err();
        assert!(matches!(
            err.as_sparse(),
            Some(SparseError::DimensionMismatch { .. })
        ));
        assert!(out.is_empty());

        let ints = CscMatrix::new((3, 3), vec![0, 2, 3, 5], vec![0, 2, 2, 0, 1], vec![1i64; 5]).unwrap();
        let err = encode(&header, &ints, &mut out).unwrap_err();
        assert!(matches!(err.as_sparse(), Some(SparseError::InvalidHeader(_))));
        assert!(out.is_empty());
    }
}
