//! CSV input loading with size guards.
//!
//! Rows come back as raw string maps; validation is the normalizer's job.
//! Oversized input is rejected here, before any parsing work is done on it.

use anyhow::Result;
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

use crate::config::ReportConfig;
use crate::error::RunError;
use crate::normalize::RawRow;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Parses CSV bytes (plain or gzip-compressed) into raw rows.
///
/// # Errors
///
/// [`RunError::OversizedInput`] when the byte cap is exceeded (before or
/// after decompression) or when more than `max_rows` rows are present; CSV
/// syntax errors surface as-is.
pub fn read_rows(bytes: &[u8], cfg: &ReportConfig) -> Result<Vec<RawRow>> {
    check_byte_cap(bytes.len() as u64, cfg)?;

    let data: Vec<u8> = if bytes.starts_with(&GZIP_MAGIC) {
        let mut decompressed = Vec::new();
        GzDecoder::new(bytes)
            .take(cfg.max_bytes + 1)
            .read_to_end(&mut decompressed)?;
        debug!(
            compressed = bytes.len(),
            decompressed = decompressed.len(),
            "Gzip input decoded"
        );
        check_byte_cap(decompressed.len() as u64, cfg)?;
        decompressed
    } else {
        bytes.to_vec()
    };

    let mut reader = csv::Reader::from_reader(data.as_slice());
    let mut rows = Vec::new();

    for result in reader.deserialize() {
        if rows.len() >= cfg.max_rows {
            return Err(RunError::OversizedInput {
                what: "row count",
                limit: cfg.max_rows as u64,
                actual: rows.len() as u64 + 1,
            }
            .into());
        }
        let row: RawRow = result?;
        rows.push(row);
    }

    debug!(rows = rows.len(), "CSV rows read");
    Ok(rows)
}

fn check_byte_cap(actual: u64, cfg: &ReportConfig) -> Result<(), RunError> {
    if actual > cfg.max_bytes {
        return Err(RunError::OversizedInput {
            what: "byte",
            limit: cfg.max_bytes,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const SAMPLE: &str = "route_id,route_name,boardings\n101,King Corridor,42\n202,Harbour Loop,7\n";

    #[test]
    fn test_reads_rows_as_string_maps() {
        let rows = read_rows(SAMPLE.as_bytes(), &ReportConfig::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["route_id"], "101");
        assert_eq!(rows[1]["route_name"], "Harbour Loop");
        assert_eq!(rows[1]["boardings"], "7");
    }

    #[test]
    fn test_gzip_input_is_transparent() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let rows = read_rows(&compressed, &ReportConfig::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["route_id"], "101");
    }

    #[test]
    fn test_byte_cap_enforced() {
        let cfg = ReportConfig {
            max_bytes: 16,
            ..Default::default()
        };
        let err = read_rows(SAMPLE.as_bytes(), &cfg).unwrap_err();
        let run_err = err.downcast_ref::<RunError>().unwrap();
        assert!(matches!(run_err, RunError::OversizedInput { what: "byte", .. }));
    }

    #[test]
    fn test_row_cap_enforced() {
        let cfg = ReportConfig {
            max_rows: 1,
            ..Default::default()
        };
        let err = read_rows(SAMPLE.as_bytes(), &cfg).unwrap_err();
        let run_err = err.downcast_ref::<RunError>().unwrap();
        assert!(matches!(
            run_err,
            RunError::OversizedInput {
                what: "row count",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        let rows = read_rows(b"", &ReportConfig::default()).unwrap();
        assert!(rows.is_empty());
    }
}
