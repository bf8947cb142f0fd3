use opentelemetry_proto::tonic::metrics::v1::{number_data_point::Value, Metric};
use opentelemetry_proto::tonic::resource::v1::Resource;

use crate::attrs::get_str;
use crate::remappers::remapped::{
    add, double_value, gauge_points, int_value, sum_points, RemappedMetric,
};

const USAGE: &str = "system.memory.usage";
const UTILIZATION: &str = "system.memory.utilization";
const STATE: &str = "state";

#[derive(Debug, Default)]
struct Memory {
    timestamp: u64,
    total: i64,
    free: i64,
    cached: i64,
    used_bytes: i64,
    actual_used_bytes: i64,
    used_pct: f64,
    actual_used_pct: f64,
}

impl Memory {
    fn observe_timestamp(&mut self, timestamp: u64) {
        if self.timestamp == 0 {
            self.timestamp = timestamp;
        }
    }

    /// Sums wrap on overflow.
    fn usage(&mut self, state: &str, value: i64) {
        match state {
            "cached" => {
                self.cached = value;
                self.total = self.total.wrapping_add(value);
            }
            "free" => {
                self.free = value;
                self.used_bytes = self.used_bytes.wrapping_sub(value);
                self.total = self.total.wrapping_add(value);
            }
            "used" | "buffered" => {
                self.total = self.total.wrapping_add(value);
                self.actual_used_bytes = self.actual_used_bytes.wrapping_add(value);
            }
            "slab_unreclaimable" | "slab_reclaimable" => {
                self.actual_used_bytes = self.actual_used_bytes.wrapping_add(value)
            }
            _ => {}
        }
    }

    fn utilization(&mut self, state: &str, value: f64) {
        match state {
            "free" => self.used_pct = 1.0 - value,
            "used" | "buffered" | "slab_unreclaimable" | "slab_reclaimable" => {
                self.actual_used_pct += value
            }
            _ => {}
        }
    }
}

pub(super) fn remap(
    metrics: &[Metric],
    out: &mut Vec<Metric>,
    _resource: &Resource,
    dataset: Option<&str>,
) {
    let mut memory = Memory::default();
    for metric in metrics {
        match metric.name.as_str() {
            USAGE => {
                for point in sum_points(metric) {
                    memory.observe_timestamp(point.time_unix_nano);
                    if let Some(state) = get_str(&point.attributes, STATE) {
                        memory.usage(state, int_value(point));
                    }
                }
            }
            UTILIZATION => {
                for point in gauge_points(metric) {
                    memory.observe_timestamp(point.time_unix_nano);
                    if let Some(state) = get_str(&point.attributes, STATE) {
                        memory.utilization(state, double_value(point));
                    }
                }
            }
            _ => {}
        }
    }

    let Memory {
        timestamp,
        total,
        free,
        cached,
        used_bytes,
        actual_used_bytes,
        used_pct,
        actual_used_pct,
    } = memory;
    let used_bytes = used_bytes.wrapping_add(total);
    let actual_free = total.wrapping_sub(actual_used_bytes);

    add(
        out,
        dataset,
        &[],
        [
            RemappedMetric::sum("system.memory.total", timestamp, Value::AsInt(total)),
            RemappedMetric::sum("system.memory.free", timestamp, Value::AsInt(free)),
            RemappedMetric::sum("system.memory.cached", timestamp, Value::AsInt(cached)),
            RemappedMetric::sum("system.memory.used.bytes", timestamp, Value::AsInt(used_bytes)),
            RemappedMetric::sum(
                "system.memory.actual.used.bytes",
                timestamp,
                Value::AsInt(actual_used_bytes),
            ),
            RemappedMetric::sum("system.memory.actual.free", timestamp, Value::AsInt(actual_free)),
            RemappedMetric::gauge("system.memory.used.pct", timestamp, Value::AsDouble(used_pct)),
            RemappedMetric::gauge(
                "system.memory.actual.used.pct",
                timestamp,
                Value::AsDouble(actual_used_pct),
            ),
        ],
    );
}
