use opentelemetry_proto::tonic::common::v1::{any_value, KeyValue};
use opentelemetry_proto::tonic::metrics::v1::{number_data_point::Value, Metric};
use opentelemetry_proto::tonic::resource::v1::Resource;

use crate::attrs::{get_str, key_value};
use crate::remappers::remapped::{add, int_value, sum_points, RemappedMetric};

const USAGE: &str = "system.filesystem.usage";
const INODES_USAGE: &str = "system.filesystem.inodes.usage";

const DEVICE_NAME: &str = "system.filesystem.device_name";
const MOUNT_POINT: &str = "system.filesystem.mount_point";
const FS_TYPE: &str = "system.filesystem.type";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Device<'a> {
    name: &'a str,
    mount_point: &'a str,
    fs_type: &'a str,
}

impl<'a> Device<'a> {
    fn of(attributes: &'a [KeyValue]) -> Option<Self> {
        Some(Device {
            name: get_str(attributes, "device")?,
            mount_point: get_str(attributes, "mountpoint")?,
            fs_type: get_str(attributes, "type")?,
        })
    }

    fn attributes(&self) -> [KeyValue; 3] {
        [
            str_value(DEVICE_NAME, self.name),
            str_value(MOUNT_POINT, self.mount_point),
            str_value(FS_TYPE, self.fs_type),
        ]
    }
}

fn str_value(key: &str, value: &str) -> KeyValue {
    key_value(key, any_value::Value::StringValue(value.to_string()))
}

/// Per device running totals, kept in first-seen order. Totals wrap on
/// overflow.
#[derive(Debug, Default)]
struct DeviceTotals<'a> {
    totals: Vec<(Device<'a>, i64)>,
}

impl<'a> DeviceTotals<'a> {
    fn add(&mut self, device: Device<'a>, value: i64) {
        match self.totals.iter_mut().find(|(seen, _)| *seen == device) {
            Some((_, total)) => *total = total.wrapping_add(value),
            None => self.totals.push((device, value)),
        }
    }

    fn get(&self, device: &Device<'a>) -> Option<i64> {
        self.totals
            .iter()
            .find_map(|(seen, total)| (seen == device).then_some(*total))
    }
}

pub(super) fn remap(
    metrics: &[Metric],
    out: &mut Vec<Metric>,
    _resource: &Resource,
    dataset: Option<&str>,
) {
    let mut timestamp = 0;
    let mut usage = DeviceTotals::default();
    let mut inodes = DeviceTotals::default();
    let mut used_bytes = DeviceTotals::default();

    for metric in metrics {
        let is_inodes = match metric.name.as_str() {
            USAGE => false,
            INODES_USAGE => true,
            _ => continue,
        };
        for point in sum_points(metric) {
            timestamp = point.time_unix_nano;
            let Some(device) = Device::of(&point.attributes) else {
                continue;
            };
            let value = int_value(point);
            let emit = |out: &mut Vec<Metric>, names: &[&str]| {
                add(
                    out,
                    dataset,
                    &device.attributes(),
                    names
                        .iter()
                        .map(|&name| RemappedMetric::sum(name, timestamp, Value::AsInt(value))),
                );
            };

            match (get_str(&point.attributes, "state"), is_inodes) {
                (Some("used"), false) => {
                    usage.add(device, value);
                    used_bytes.add(device, value);
                    emit(out, &["system.filesystem.used.bytes"]);
                }
                (Some("free"), false) => {
                    usage.add(device, value);
                    emit(out, &["system.filesystem.free", "system.filesystem.available"]);
                }
                (Some("used"), true) => inodes.add(device, value),
                (Some("free"), true) => {
                    inodes.add(device, value);
                    emit(out, &["system.filesystem.free_files"]);
                }
                _ => {}
            }
        }
    }

    for (device, total) in &usage.totals {
        let used_pct = used_bytes
            .get(device)
            .filter(|_| *total != 0)
            .map(|used| used as f64 / *total as f64);
        add(
            out,
            dataset,
            &device.attributes(),
            [RemappedMetric::sum(
                "system.filesystem.total",
                timestamp,
                Value::AsInt(*total),
            )]
            .into_iter()
            .chain(used_pct.map(|pct| {
                RemappedMetric::sum("system.filesystem.used.pct", timestamp, Value::AsDouble(pct))
            })),
        );
    }

    for (device, total) in &inodes.totals {
        add(
            out,
            dataset,
            &device.attributes(),
            [RemappedMetric::sum(
                "system.filesystem.files",
                timestamp,
                Value::AsInt(*total),
            )],
        );
    }
}
