use itertools::Itertools;
use serde::Serialize;

use crate::{dataset::Dataset, error::ReportError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceMetrics {
    pub device: String,
    pub append: f64,
    pub read: f64,
    pub total: f64,
    pub ratio: f64,
}

/// A device together with the value it leads with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leader {
    pub device: String,
    pub value: f64,
}

/// `leader` reaches `multiple` times the value of `other` on one metric.
/// `multiple` is `None` when `other` scored zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub leader: String,
    pub other: String,
    pub multiple: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub best_append: Leader,
    pub best_read: Leader,
    /// Ratio closest to 1.0 on a log scale
    pub most_balanced: Leader,
    pub append_multiple: Comparison,
    pub read_multiple: Comparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub devices: Vec<DeviceMetrics>,
    /// `None` for an empty dataset
    pub aggregates: Option<Aggregates>,
}

impl Metrics {
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.devices.iter().map(|x| x.device.as_str()).collect()
    }

    pub fn appends(&self) -> Vec<f64> {
        self.devices.iter().map(|x| x.append).collect()
    }

    pub fn reads(&self) -> Vec<f64> {
        self.devices.iter().map(|x| x.read).collect()
    }

    pub fn totals(&self) -> Vec<f64> {
        self.devices.iter().map(|x| x.total).collect()
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.devices.iter().map(|x| x.ratio).collect()
    }

    pub fn ensure_not_empty(&self) -> Result<(), ReportError> {
        if self.is_empty() {
            Err(ReportError::EmptyDataset)
        } else {
            Ok(())
        }
    }
}

pub fn derive(dataset: &Dataset) -> Result<Metrics, ReportError> {
    let devices = dataset
        .records()
        .iter()
        .map(|record| {
            if record.append == 0.0 {
                return Err(ReportError::ZeroAppend {
                    device: record.device.clone(),
                });
            }
            Ok(DeviceMetrics {
                device: record.device.clone(),
                append: record.append,
                read: record.read,
                total: record.append + record.read,
                ratio: record.read / record.append,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let aggregates = aggregate(&devices);
    Ok(Metrics {
        devices,
        aggregates,
    })
}

fn aggregate(devices: &[DeviceMetrics]) -> Option<Aggregates> {
    let best_append = devices
        .iter()
        .position_max_by(|a, b| a.append.total_cmp(&b.append))?;
    let best_read = devices
        .iter()
        .position_max_by(|a, b| a.read.total_cmp(&b.read))?;
    let most_balanced = devices
        .iter()
        .position_min_by(|a, b| balance(a.ratio).total_cmp(&balance(b.ratio)))?;

    // A device leading both metrics is compared against the weakest one instead
    let append_partner = if best_read != best_append {
        best_read
    } else {
        devices
            .iter()
            .position_min_by(|a, b| a.append.total_cmp(&b.append))?
    };
    let read_partner = if best_append != best_read {
        best_append
    } else {
        devices
            .iter()
            .position_min_by(|a, b| a.read.total_cmp(&b.read))?
    };

    let leader = |idx: usize, value: fn(&DeviceMetrics) -> f64| Leader {
        device: devices[idx].device.clone(),
        value: value(&devices[idx]),
    };
    let compare = |lead: usize, other: usize, value: fn(&DeviceMetrics) -> f64| Comparison {
        leader: devices[lead].device.clone(),
        other: devices[other].device.clone(),
        multiple: Some(value(&devices[other]))
            .filter(|denominator| *denominator != 0.0)
            .map(|denominator| value(&devices[lead]) / denominator),
    };

    Some(Aggregates {
        best_append: leader(best_append, |x| x.append),
        best_read: leader(best_read, |x| x.read),
        most_balanced: leader(most_balanced, |x| x.ratio),
        append_multiple: compare(best_append, append_partner, |x| x.append),
        read_multiple: compare(best_read, read_partner, |x| x.read),
    })
}

fn balance(ratio: f64) -> f64 {
    if ratio == 0.0 {
        f64::INFINITY
    } else {
        ratio.ln().abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DeviceRecord, ssd_iops};

    fn second_variant() -> Dataset {
        Dataset::new(vec![
            DeviceRecord::new("SK Hynix", 169702.00, 437204.0),
            DeviceRecord::new("Samsung", 173172.0, 140949.0),
            DeviceRecord::new("ZNS", 297746.5, 349782.0),
        ])
        .unwrap()
    }

    #[test]
    fn totals_and_ratios() {
        for dataset in [ssd_iops(), second_variant()] {
            let metrics = derive(&dataset).unwrap();
            for (record, derived) in dataset.records().iter().zip(&metrics.devices) {
                assert_eq!(derived.total, record.append + record.read);
                assert!((derived.ratio * record.append - record.read).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn known_ratios() {
        let metrics = derive(&ssd_iops()).unwrap();
        assert_eq!(format!("{:.2}", metrics.devices[0].ratio), "2.58");
        assert_eq!(format!("{:.2}", metrics.devices[1].ratio), "0.81");
    }

    #[test]
    fn leaders_for_first_variant() {
        let agg = derive(&ssd_iops()).unwrap().aggregates.unwrap();
        assert_eq!(agg.best_append.device, "ZNS");
        assert_eq!(agg.best_append.value, 297746.5);
        assert_eq!(agg.best_read.device, "SK Hynix");
        assert_eq!(agg.most_balanced.device, "Samsung");

        assert_eq!(agg.append_multiple.leader, "ZNS");
        assert_eq!(agg.append_multiple.other, "SK Hynix");
        let multiple = agg.append_multiple.multiple.unwrap();
        assert!((multiple - 297746.5 / 169702.0).abs() < 1e-9);

        assert_eq!(agg.read_multiple.leader, "SK Hynix");
        assert_eq!(agg.read_multiple.other, "ZNS");
        assert_eq!(format!("{:.1}", agg.read_multiple.multiple.unwrap()), "10.1");
    }

    #[test]
    fn leaders_for_second_variant() {
        let agg = derive(&second_variant()).unwrap().aggregates.unwrap();
        assert_eq!(agg.best_append.device, "ZNS");
        assert_eq!(agg.best_read.device, "SK Hynix");
        // ZNS at 1.17x is closer to 1.0 than Samsung at 0.81x
        assert_eq!(agg.most_balanced.device, "ZNS");
    }

    #[test]
    fn single_leader_compares_against_weakest() {
        let dataset = Dataset::new(vec![
            DeviceRecord::new("fast", 400.0, 800.0),
            DeviceRecord::new("mid", 200.0, 400.0),
            DeviceRecord::new("slow", 100.0, 0.0),
        ])
        .unwrap();
        let agg = derive(&dataset).unwrap().aggregates.unwrap();
        assert_eq!(agg.append_multiple.other, "slow");
        assert_eq!(agg.append_multiple.multiple, Some(4.0));
        assert_eq!(agg.read_multiple.other, "slow");
        assert_eq!(agg.read_multiple.multiple, None);
    }

    #[test]
    fn zero_append_names_device() {
        let dataset = Dataset::new(vec![
            DeviceRecord::new("ok", 1.0, 1.0),
            DeviceRecord::new("broken", 0.0, 5.0),
        ])
        .unwrap();
        let err = derive(&dataset).unwrap_err();
        assert!(matches!(&err, ReportError::ZeroAppend { device } if device == "broken"));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn empty_dataset_has_no_aggregates() {
        let metrics = derive(&Dataset::default()).unwrap();
        assert!(metrics.aggregates.is_none());
        assert!(matches!(
            metrics.ensure_not_empty(),
            Err(ReportError::EmptyDataset)
        ));
    }
}
