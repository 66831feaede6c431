//! Reads raw trip rows and the zone lookup from CSV, local or remote.
//!
//! Cell-level garbage (unparseable timestamps, non-numeric fares) becomes a
//! missing value and is left for the cleaner to drop. A structurally broken
//! CSV is a hard error.

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::NaiveDateTime;
use flate2::read::GzDecoder;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use tracing::{debug, info};

use crate::fetch::{BasicClient, fetch_bytes};
use crate::locations::{Location, LocationTable};
use crate::trips::{RawTrip, RawTripTable};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Deserialize)]
struct CsvTripRow {
    #[serde(rename = "tpep_pickup_datetime", default, deserialize_with = "lenient_timestamp")]
    pickup_time: Option<NaiveDateTime>,
    #[serde(rename = "tpep_dropoff_datetime", default, deserialize_with = "lenient_timestamp")]
    dropoff_time: Option<NaiveDateTime>,
    #[serde(rename = "PULocationID", default, deserialize_with = "lenient_integer")]
    pickup_location_id: Option<i64>,
    #[serde(rename = "DOLocationID", default, deserialize_with = "lenient_integer")]
    dropoff_location_id: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    trip_distance: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    fare_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    payment_type: Option<i64>,
}

impl From<CsvTripRow> for RawTrip {
    fn from(row: CsvTripRow) -> Self {
        RawTrip {
            pickup_time: row.pickup_time,
            dropoff_time: row.dropoff_time,
            pickup_location_id: row.pickup_location_id.and_then(|id| u32::try_from(id).ok()),
            dropoff_location_id: row.dropoff_location_id.and_then(|id| u32::try_from(id).ok()),
            trip_distance: row.trip_distance,
            fare_amount: row.fare_amount,
            payment_type: row.payment_type,
        }
    }
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Parses an integer cell, accepting float spellings of whole numbers ("1.0").
pub fn parse_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

fn lenient_timestamp<'de, D>(de: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn lenient_integer<'de, D>(de: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.as_deref().and_then(parse_integer))
}

/// Wraps the input in a gzip decoder when it carries the gzip magic bytes.
pub fn decompress(bytes: Bytes) -> Box<dyn Read> {
    if bytes.starts_with(&GZIP_MAGIC) {
        debug!("Gzip input detected");
        Box::new(GzDecoder::new(std::io::Cursor::new(bytes)))
    } else {
        Box::new(std::io::Cursor::new(bytes))
    }
}

/// Parses trip rows from CSV, recording which columns were present.
pub fn read_trips<R: Read>(reader: R) -> Result<RawTripTable> {
    // trimmed headers keep the schema check and serde field matching in agreement
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let columns: Vec<String> = rdr
        .headers()
        .context("Failed to read trip CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<CsvTripRow>().enumerate() {
        let record = result.with_context(|| format!("Malformed trip CSV at record {}", i + 1))?;
        rows.push(RawTrip::from(record));
    }

    Ok(RawTripTable { columns, rows })
}

/// Parses the zone lookup CSV.
pub fn read_locations<R: Read>(reader: R) -> Result<LocationTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let mut locations = Vec::new();

    for result in rdr.deserialize() {
        let record: Location = result.context("Malformed zone lookup CSV")?;
        locations.push(record);
    }

    Ok(LocationTable::new(locations))
}

/// Loads raw bytes from a local file path or fetches them over HTTP.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn load_source(source: &str) -> Result<Bytes> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        Bytes::from(std::fs::read(source).with_context(|| format!("Failed to read {source}"))?)
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

pub async fn load_trips(source: &str) -> Result<RawTripTable> {
    let bytes = load_source(source).await?;
    let table = read_trips(decompress(bytes))?;
    info!(source, rows = table.rows.len(), "Trip rows loaded");
    Ok(table)
}

pub async fn load_locations(source: &str) -> Result<LocationTable> {
    let bytes = load_source(source).await?;
    let table = read_locations(decompress(bytes))?;
    info!(source, zones = table.len(), "Zone lookup loaded");
    Ok(table)
}
