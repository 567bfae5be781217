//! Random sample input, in the same line-per-record layout NeDB writes.

use chrono::{Days, NaiveDate, NaiveTime};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::config::DataConfig;
use crate::error::{DashError, Result};
use crate::types::Record;

/// Format the generator writes date-times in.
pub const SAMPLE_DATETIME_FORMAT: &str = "%a, %d %b %Y, %H:%M:%S GMT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleSpec {
    pub start: NaiveDate,
    pub days: u32,
    pub per_day: u32,
    /// Fixed seed for reproducible output
    pub seed: Option<u64>,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2012, 1, 1).unwrap_or_default(),
            days: 3,
            per_day: 48,
            seed: None,
        }
    }
}

/// Generate records day by day, each day in time order.
pub fn generate_records(spec: &SampleSpec, fields: &DataConfig) -> Vec<Record> {
    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut records = Vec::new();
    for offset in 0..spec.days {
        let Some(date) = spec.start.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };

        let mut seconds: Vec<u32> = (0..spec.per_day)
            .map(|_| rng.gen_range(0..86_400))
            .collect();
        seconds.sort_unstable();

        for secs in seconds {
            let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0) else {
                continue;
            };
            let stamp = date.and_time(time).format(SAMPLE_DATETIME_FORMAT).to_string();
            let quantity: u32 = rng.gen_range(0..1000);
            let id: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(16)
                .map(char::from)
                .collect();

            let mut record = Record::new();
            record.insert(fields.datetime_field.clone(), Value::String(stamp));
            record.insert(fields.quantity_field.clone(), Value::String(quantity.to_string()));
            record.insert("_id".to_string(), Value::String(id));
            records.push(record);
        }
    }
    records
}

/// Write a sample file and return the number of records written.
pub fn write_sample(path: &Path, spec: &SampleSpec, fields: &DataConfig) -> Result<usize> {
    let io_err = |source| DashError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let records = generate_records(spec, fields);
    for record in &records {
        let line = serde_json::to_string(record).map_err(|e| io_err(e.into()))?;
        writeln!(writer, "{line}").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;

    info!(path = %path.display(), records = records.len(), "wrote sample data");
    Ok(records.len())
}
