use std::collections::HashSet;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// One row of the benchmark table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device: String,
    pub append: f64,
    pub read: f64,
}

impl DeviceRecord {
    pub fn new(device: impl Into<String>, append: f64, read: f64) -> Self {
        Self {
            device: device.into(),
            append,
            read,
        }
    }
}

/// Ordered device records with unique names and non-negative values.
///
/// A zero append value is accepted here and rejected when metrics are derived,
/// since only the ratio is undefined for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DeviceRecord>", into = "Vec<DeviceRecord>")]
pub struct Dataset {
    records: Vec<DeviceRecord>,
}

impl Dataset {
    pub fn new(records: Vec<DeviceRecord>) -> Result<Self, ReportError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.device.as_str()) {
                return Err(ReportError::DuplicateDevice(record.device.clone()));
            }
            for (metric, value) in [("append", record.append), ("read", record.read)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ReportError::InvalidValue {
                        device: record.device.clone(),
                        metric,
                        value,
                    });
                }
            }
        }
        Ok(Self { records })
    }

    /// Parses `device,append,read` rows with a header line
    pub fn from_csv(data: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        let records = reader
            .deserialize::<DeviceRecord>()
            .enumerate()
            .map(|(i, row)| row.wrap_err(format!("Parse dataset row {}", i + 1)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(records)?)
    }

    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<Vec<DeviceRecord>> for Dataset {
    type Error = ReportError;

    fn try_from(records: Vec<DeviceRecord>) -> Result<Self, Self::Error> {
        Self::new(records)
    }
}

impl From<Dataset> for Vec<DeviceRecord> {
    fn from(dataset: Dataset) -> Self {
        dataset.records
    }
}

/// The SK Hynix / Samsung / ZNS measurements the reports were first made for
pub fn ssd_iops() -> Dataset {
    Dataset {
        records: vec![
            DeviceRecord::new("SK Hynix", 169702.00, 437204.0),
            DeviceRecord::new("Samsung", 173172.0, 140949.0),
            DeviceRecord::new("ZNS", 297746.5, 43289.0),
        ],
    }
}
