//! Module to load stars from a Gaia catalog export.
//!
//! Expects a CSV file with a header row naming at least the `ra`, `dec`,
//! `parallax` and `phot_g_mean_mag` columns, as returned by a
//! `gaiadr3.gaia_source` query. `source_id`, `pmra` and `pmdec` are picked up
//! when present. Column order does not matter.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use super::CatalogStar;

struct Columns {
    source_id: Option<usize>,
    ra: usize,
    dec: usize,
    mag: usize,
    parallax: usize,
    pmra: Option<usize>,
    pmdec: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| anyhow::anyhow!("Missing {} column in Gaia CSV header", name))
        };
        Ok(Self {
            source_id: find("source_id"),
            ra: require("ra")?,
            dec: require("dec")?,
            mag: require("phot_g_mean_mag")?,
            parallax: require("parallax")?,
            pmra: find("pmra"),
            pmdec: find("pmdec"),
        })
    }
}

fn parse_required_f64(record: &csv::StringRecord, idx: usize, label: &str) -> Result<f64> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| anyhow::anyhow!("Missing {} field", label))?
        .parse()
        .with_context(|| format!("Failed to parse {}", label))
}

fn parse_optional<T: std::str::FromStr>(record: &csv::StringRecord, idx: Option<usize>) -> Option<T> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Read Gaia rows from any CSV source.
///
/// A missing parallax is stored as NaN so that it is flagged as invalid
/// downstream instead of reading as a distance.
pub fn read_gaia_csv<R: Read>(reader: R) -> Result<Vec<CatalogStar>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().context("Failed to read Gaia CSV header")?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut stars = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read Gaia CSV row {}", row + 1))?;

        let ra_deg = parse_required_f64(&record, columns.ra, "ra")
            .with_context(|| format!("row {}", row + 1))?;
        let dec_deg = parse_required_f64(&record, columns.dec, "dec")
            .with_context(|| format!("row {}", row + 1))?;
        let mag = parse_required_f64(&record, columns.mag, "phot_g_mean_mag")
            .with_context(|| format!("row {}", row + 1))?;
        let parallax_mas = parse_optional(&record, Some(columns.parallax)).unwrap_or(f64::NAN);

        stars.push(CatalogStar {
            source_id: parse_optional(&record, columns.source_id),
            ra_deg,
            dec_deg,
            parallax_mas,
            mag,
            pmra_mas_yr: parse_optional(&record, columns.pmra),
            pmdec_mas_yr: parse_optional(&record, columns.pmdec),
        });
    }

    tracing::debug!("read {} Gaia rows", stars.len());
    Ok(stars)
}

pub fn load_gaia_csv<T: AsRef<Path>>(path: T) -> Result<Vec<CatalogStar>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("Failed to open Gaia CSV file: {}", path.as_ref().display()))?;
    read_gaia_csv(file)
}
