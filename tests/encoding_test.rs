//! Property tests for record encoding

use proptest::prelude::*;
use serde_yaml::{Mapping, Value};
use sitepack::core::encode::RecordEncoder;
use sitepack::domain::{ConfigName, ConfigRecord};
use std::collections::BTreeMap;

fn record(fields: &[(String, String)]) -> ConfigRecord {
    let mut data = Mapping::new();
    for (key, value) in fields {
        data.insert(Value::String(key.clone()), Value::String(value.clone()));
    }
    ConfigRecord::new(ConfigName::new("site.item.generated").unwrap(), data)
}

proptest! {
    #[test]
    fn encoding_is_deterministic(
        fields in prop::collection::vec(("[a-z_]{1,10}", "[ -~]{0,24}"), 0..12)
    ) {
        let encoder = RecordEncoder::new();
        let record = record(&fields);

        let first = encoder.encode(&record).unwrap();
        let second = encoder.encode(&record.clone()).unwrap();
        prop_assert_eq!(&first, &second);

        let decoded: Mapping = serde_yaml::from_str(&first).unwrap_or_default();
        let keys: Vec<&str> = decoded.keys().filter_map(Value::as_str).collect();
        let expected: Vec<&str> = record.data().keys().filter_map(Value::as_str).collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn json_values_keep_their_content(
        values in prop::collection::btree_map("[a-z]{1,8}", any::<i32>(), 0..8)
    ) {
        let raw = serde_json::to_string(&values).unwrap();
        let mut data = Mapping::new();
        data.insert(Value::from("json_values"), Value::from(raw.as_str()));
        let record = ConfigRecord::new(ConfigName::new("site.item.json").unwrap(), data);

        let encoded = RecordEncoder::new().encode(&record).unwrap();
        let decoded: serde_yaml::Value = serde_yaml::from_str(&encoded).unwrap();
        let pretty = decoded["json_values"].as_str().unwrap().to_string();

        let reparsed: BTreeMap<String, i32> = serde_json::from_str(&pretty).unwrap();
        prop_assert_eq!(reparsed, values);
        if raw.len() > 2 {
            prop_assert!(pretty.contains("\n  \""));
        }
    }
}

#[test]
fn test_invalid_json_left_as_is() {
    let mut data = Mapping::new();
    data.insert(Value::from("json_values"), Value::from("{not json"));
    let record = ConfigRecord::new(ConfigName::new("site.item.broken").unwrap(), data);

    let encoded = RecordEncoder::new().encode(&record).unwrap();
    let decoded: serde_yaml::Value = serde_yaml::from_str(&encoded).unwrap();
    assert_eq!(decoded["json_values"].as_str(), Some("{not json"));
}
