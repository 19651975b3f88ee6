use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::{PairRecord, QuadRecord};

/// Attribute name to raw value, as reported by the cluster for one entity.
///
/// A missing key means the value is unknown. Callers compare through
/// [`AttributeMap::get`] and skip anything that returns `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeMap {
    values: BTreeMap<String, String>,
}

/// A value after boolean coercion: the cluster reports flags as `"1"`/`"0"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Text(String),
}

impl AttributeValue {
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "1" => Self::Flag(true),
            "0" => Self::Flag(false),
            other => Self::Text(other.to_string()),
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(_) => None,
        }
    }
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects attribute and value out of quad records. Later records win.
    pub fn from_quads<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a QuadRecord>,
    {
        records
            .into_iter()
            .map(|record| (record.attribute(), record.value()))
            .collect()
    }

    pub fn from_pairs<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PairRecord>,
    {
        records
            .into_iter()
            .map(|record| (record.key(), record.value()))
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Typed view with `"1"`/`"0"` turned into booleans.
    pub fn coerced(&self) -> BTreeMap<String, AttributeValue> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), AttributeValue::coerce(value)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(entity: &str, attribute: &str, scope: &str, value: &str) -> QuadRecord {
        QuadRecord::from_parts([entity, attribute, scope, value])
    }

    #[test]
    fn test_from_quads_projects_attribute_and_value() {
        let records = vec![
            quad("web", "Critical", "global", "1"),
            quad("web", "Enabled", "global", "0"),
        ];
        let map = AttributeMap::from_quads(&records);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Critical"), Some("1"));
        assert_eq!(map.get("Enabled"), Some("0"));
        assert_eq!(map.get("Probed"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let records = vec![
            quad("web", "State", "charlie", "ONLINE"),
            quad("web", "State", "delta", "OFFLINE"),
        ];
        let map = AttributeMap::from_quads(&records);
        assert_eq!(map.get("State"), Some("OFFLINE"));
    }

    #[test]
    fn test_from_quads_is_deterministic() {
        let records = vec![
            quad("g", "AutoStart", "global", "1"),
            quad("g", "SystemList", "global", "charlie\t0\tdelta\t1"),
            quad("g", "AutoStart", "global", "0"),
        ];
        assert_eq!(
            AttributeMap::from_quads(&records),
            AttributeMap::from_quads(&records)
        );
    }

    #[test]
    fn test_coerced_only_touches_exact_flags() {
        let map: AttributeMap = [("A", "1"), ("B", "0"), ("C", "10"), ("D", "")]
            .into_iter()
            .collect();
        let typed = map.coerced();
        assert_eq!(typed["A"], AttributeValue::Flag(true));
        assert_eq!(typed["B"], AttributeValue::Flag(false));
        assert_eq!(typed["C"], AttributeValue::Text("10".to_string()));
        assert_eq!(typed["D"].as_flag(), None);
    }

    #[test]
    fn test_from_pairs() {
        let records = vec![
            PairRecord::from_parts(["ClusterName", "prod"]),
            PairRecord::from_parts(["Guests", ""]),
        ];
        let map = AttributeMap::from_pairs(&records);
        assert_eq!(map.get("ClusterName"), Some("prod"));
        assert_eq!(map.get("Guests"), Some(""));
        assert_eq!(map.get_or("ReadOnly", "1"), "1");
    }
}
