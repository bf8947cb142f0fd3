//! Typed reads over OTLP attribute lists, and the delta that collects
//! derived attributes before they are merged back into a span or event.
use opentelemetry_proto::tonic::common::v1::{any_value::Value, AnyValue, ArrayValue, KeyValue};

fn value<'a>(attrs: &'a [KeyValue], key: &str) -> Option<&'a Value> {
    attrs
        .iter()
        .find(|kv| kv.key == key)
        .and_then(|kv| kv.value.as_ref())
        .and_then(|any| any.value.as_ref())
}

/// Whether `key` is present and carries a value.
pub(crate) fn contains(attrs: &[KeyValue], key: &str) -> bool {
    value(attrs, key).is_some()
}

/// String value of `key`. Empty strings are treated as absent.
pub(crate) fn get_str<'a>(attrs: &'a [KeyValue], key: &str) -> Option<&'a str> {
    match value(attrs, key) {
        Some(Value::StringValue(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// String value of `key`, empty strings included.
pub(crate) fn get_raw_str<'a>(attrs: &'a [KeyValue], key: &str) -> Option<&'a str> {
    match value(attrs, key) {
        Some(Value::StringValue(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// Integer value of `key`, also accepting strings holding an integer.
pub(crate) fn get_int(attrs: &[KeyValue], key: &str) -> Option<i64> {
    match value(attrs, key)? {
        Value::IntValue(i) => Some(*i),
        Value::StringValue(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean value of `key`.
pub(crate) fn get_bool(attrs: &[KeyValue], key: &str) -> Option<bool> {
    match value(attrs, key)? {
        Value::BoolValue(b) => Some(*b),
        _ => None,
    }
}

pub(crate) fn key_value(key: &str, value: Value) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: Some(AnyValue { value: Some(value) }),
    }
}

/// Attributes derived during one enrichment pass.
///
/// Values are collected here while the span is only read, then merged with
/// [`AttributeDelta::merge_into`] once every derivation is done.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct AttributeDelta {
    entries: Vec<KeyValue>,
}

impl AttributeDelta {
    pub(crate) fn put_str(&mut self, key: &str, value: impl Into<String>) {
        self.put(key, Value::StringValue(value.into()));
    }

    pub(crate) fn put_int(&mut self, key: &str, value: i64) {
        self.put(key, Value::IntValue(value));
    }

    pub(crate) fn put_double(&mut self, key: &str, value: f64) {
        self.put(key, Value::DoubleValue(value));
    }

    pub(crate) fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, Value::BoolValue(value));
    }

    pub(crate) fn put_str_array(&mut self, key: &str, values: Vec<String>) {
        let values = values
            .into_iter()
            .map(|s| AnyValue {
                value: Some(Value::StringValue(s)),
            })
            .collect();
        self.put(key, Value::ArrayValue(ArrayValue { values }));
    }

    fn put(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|kv| kv.key == key) {
            Some(existing) => existing.value = Some(AnyValue { value: Some(value) }),
            None => self.entries.push(key_value(key, value)),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the collected attributes into `attrs`. Keys that already exist
    /// are overwritten in place, new keys are appended in insertion order.
    pub(crate) fn merge_into(self, attrs: &mut Vec<KeyValue>) {
        attrs.reserve(self.entries.len());
        for entry in self.entries {
            match attrs.iter_mut().find(|kv| kv.key == entry.key) {
                Some(existing) => existing.value = entry.value,
                None => attrs.push(entry),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn kv(key: &str, value: Value) -> KeyValue {
        key_value(key, value)
    }

    pub(crate) fn str_kv(key: &str, value: &str) -> KeyValue {
        kv(key, Value::StringValue(value.to_string()))
    }

    pub(crate) fn int_kv(key: &str, value: i64) -> KeyValue {
        kv(key, Value::IntValue(value))
    }

    pub(crate) fn bool_kv(key: &str, value: bool) -> KeyValue {
        kv(key, Value::BoolValue(value))
    }

    #[test]
    fn typed_reads() {
        let attrs = vec![
            str_kv("s", "value"),
            str_kv("empty", ""),
            int_kv("i", 42),
            str_kv("i_str", " 7 "),
            bool_kv("b", true),
            KeyValue {
                key: "none".to_string(),
                value: None,
            },
        ];

        assert_eq!(get_str(&attrs, "s"), Some("value"));
        assert_eq!(get_str(&attrs, "empty"), None);
        assert_eq!(get_raw_str(&attrs, "empty"), Some(""));
        assert_eq!(get_raw_str(&attrs, "i"), None);
        assert_eq!(get_str(&attrs, "i"), None);
        assert_eq!(get_int(&attrs, "i"), Some(42));
        assert_eq!(get_int(&attrs, "i_str"), Some(7));
        assert_eq!(get_int(&attrs, "s"), None);
        assert_eq!(get_bool(&attrs, "b"), Some(true));
        assert_eq!(get_bool(&attrs, "s"), None);
        assert!(contains(&attrs, "empty"));
        assert!(!contains(&attrs, "none"));
        assert!(!contains(&attrs, "missing"));
    }

    #[test]
    fn delta_overwrites_and_appends() {
        let mut attrs = vec![str_kv("a", "old"), int_kv("keep", 1)];

        let mut delta = AttributeDelta::default();
        delta.put_str("a", "first");
        delta.put_str("a", "new");
        delta.put_bool("b", true);
        delta.put_str_array("c", vec!["x".to_string(), "y".to_string()]);
        assert!(!delta.is_empty());
        delta.merge_into(&mut attrs);

        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs[0], str_kv("a", "new"));
        assert_eq!(attrs[1], int_kv("keep", 1));
        assert_eq!(attrs[2], bool_kv("b", true));
        assert_eq!(
            attrs[3],
            kv(
                "c",
                Value::ArrayValue(ArrayValue {
                    values: vec![
                        AnyValue {
                            value: Some(Value::StringValue("x".to_string()))
                        },
                        AnyValue {
                            value: Some(Value::StringValue("y".to_string()))
                        },
                    ]
                })
            )
        );
    }
}
