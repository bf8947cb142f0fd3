use opentelemetry_proto::tonic::common::v1::{any_value, KeyValue};
use opentelemetry_proto::tonic::metrics::v1::{
    metric::Data, number_data_point::Value, Gauge, Metric, NumberDataPoint, Sum,
};

use crate::attributes;
use crate::attrs::key_value;

/// Data point attributes reserved up front for the remapped marker, the
/// dataset and the caller's own attributes.
const MIN_ATTRIBUTE_CAPACITY: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Gauge,
    Sum,
}

/// A single derived metric with one data point.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RemappedMetric<'a> {
    pub(crate) name: &'a str,
    pub(crate) kind: Option<Kind>,
    pub(crate) value: Option<Value>,
    pub(crate) timestamp: u64,
    pub(crate) start_timestamp: u64,
}

impl<'a> RemappedMetric<'a> {
    pub(crate) fn sum(name: &'a str, timestamp: u64, value: Value) -> Self {
        RemappedMetric {
            name,
            kind: Some(Kind::Sum),
            value: Some(value),
            timestamp,
            start_timestamp: 0,
        }
    }

    pub(crate) fn gauge(name: &'a str, timestamp: u64, value: Value) -> Self {
        RemappedMetric {
            kind: Some(Kind::Gauge),
            ..Self::sum(name, timestamp, value)
        }
    }

    /// A metric is emitted only with a name, a value, a timestamp and a
    /// supported kind.
    pub(crate) fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.value.is_some() && self.timestamp != 0 && self.kind.is_some()
    }
}

/// Appends the valid `metrics` to `out`. Each data point is tagged with
/// `otel_remapped`, then `extra`, then the dataset when one is set.
pub(crate) fn add<'a>(
    out: &mut Vec<Metric>,
    dataset: Option<&str>,
    extra: &[KeyValue],
    metrics: impl IntoIterator<Item = RemappedMetric<'a>>,
) {
    for metric in metrics.into_iter().filter(RemappedMetric::is_valid) {
        let mut point_attributes = Vec::with_capacity(MIN_ATTRIBUTE_CAPACITY.max(extra.len() + 2));
        point_attributes.push(key_value(
            attributes::OTEL_REMAPPED,
            any_value::Value::BoolValue(true),
        ));
        point_attributes.extend_from_slice(extra);
        if let Some(dataset) = dataset {
            point_attributes.push(key_value(
                attributes::DATA_STREAM_DATASET,
                any_value::Value::StringValue(dataset.to_string()),
            ));
        }

        let data_points = vec![NumberDataPoint {
            attributes: point_attributes,
            start_time_unix_nano: metric.start_timestamp,
            time_unix_nano: metric.timestamp,
            value: metric.value,
            ..Default::default()
        }];
        let data = match metric.kind {
            Some(Kind::Gauge) => Data::Gauge(Gauge { data_points }),
            Some(Kind::Sum) => Data::Sum(Sum {
                data_points,
                ..Default::default()
            }),
            None => continue,
        };
        out.push(Metric {
            name: metric.name.to_string(),
            data: Some(data),
            ..Default::default()
        });
    }
}

/// Integer value of a data point, `0` when it holds a double.
pub(crate) fn int_value(point: &NumberDataPoint) -> i64 {
    match point.value {
        Some(Value::AsInt(value)) => value,
        _ => 0,
    }
}

/// Double value of a data point, `0.0` when it holds an integer.
pub(crate) fn double_value(point: &NumberDataPoint) -> f64 {
    match point.value {
        Some(Value::AsDouble(value)) => value,
        _ => 0.0,
    }
}

pub(crate) fn sum_points(metric: &Metric) -> &[NumberDataPoint] {
    match &metric.data {
        Some(Data::Sum(sum)) => &sum.data_points,
        _ => &[],
    }
}

pub(crate) fn gauge_points(metric: &Metric) -> &[NumberDataPoint] {
    match &metric.data {
        Some(Data::Gauge(gauge)) => &gauge.data_points,
        _ => &[],
    }
}
