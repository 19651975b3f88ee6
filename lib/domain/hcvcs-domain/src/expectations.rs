//! Expected attribute values for clusters, groups and resources.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::attributes::AttributeMap;

/// Attribute name to required value. Comparison is plain string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpectationTable {
    entries: BTreeMap<String, String>,
}

/// An expected attribute that the cluster reports with another value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub attribute: String,
    pub expected: String,
    pub actual: String,
}

impl ExpectationTable {
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// Returns a copy of this table with `overrides` applied on top.
    pub fn with_overrides<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = self.entries.clone();
        entries.extend(
            overrides
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        Self { entries }
    }

    pub fn expected(&self, attribute: &str) -> Option<&str> {
        self.entries.get(attribute).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compares every expectation against `actual`.
    ///
    /// Attributes the cluster did not report are skipped: absence is not a
    /// mismatch.
    pub fn compare(&self, actual: &AttributeMap) -> Vec<Mismatch> {
        self.iter()
            .filter_map(|(attribute, expected)| {
                let value = actual.get(attribute)?;
                (value != expected).then(|| Mismatch {
                    attribute: attribute.to_string(),
                    expected: expected.to_string(),
                    actual: value.to_string(),
                })
            })
            .collect()
    }
}

/// Scalars accepted as expected values in configuration files. Flags are
/// written the way the cluster reports them.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigScalar {
    Text(String),
    Integer(i64),
    Flag(bool),
    Empty(()),
}

impl From<ConfigScalar> for String {
    fn from(value: ConfigScalar) -> Self {
        match value {
            ConfigScalar::Text(text) => text,
            ConfigScalar::Integer(number) => number.to_string(),
            ConfigScalar::Flag(true) => "1".to_string(),
            ConfigScalar::Flag(false) => "0".to_string(),
            ConfigScalar::Empty(()) => String::new(),
        }
    }
}

impl<'de> Deserialize<'de> for ExpectationTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, ConfigScalar>::deserialize(deserializer)?;
        Ok(Self::from_entries(raw))
    }
}

/// The four tables the health check evaluates against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expectations {
    pub cluster: ExpectationTable,
    pub failover_group: ExpectationTable,
    pub parallel_group: ExpectationTable,
    pub resource: ExpectationTable,
}

impl Expectations {
    pub fn standard_cluster() -> ExpectationTable {
        ExpectationTable::from_entries([
            ("BackupInterval", "3"),
            ("Administrators", "admin"),
            ("Guests", ""),
            ("Operators", ""),
        ])
    }

    pub fn standard_failover_group() -> ExpectationTable {
        ExpectationTable::from_entries([
            ("ManageFaults", "ALL"),
            ("AutoStart", "1"),
            ("AutoFailOver", "1"),
            ("OnlineRetryLimit", "0"),
            ("AutoStartPolicy", "Order"),
            ("FailOverPolicy", "Priority"),
            ("ClusterFailOverPolicy", "Manual"),
        ])
    }

    /// Parallel groups differ from failover groups only where listed here.
    pub fn standard_parallel_overrides() -> BTreeMap<String, String> {
        BTreeMap::from([("AutoFailOver".to_string(), "0".to_string())])
    }

    pub fn standard_resource() -> ExpectationTable {
        ExpectationTable::from_entries([("Probed", "1"), ("Enabled", "1"), ("Critical", "1")])
    }

    pub fn new(
        cluster: ExpectationTable,
        failover_group: ExpectationTable,
        parallel_overrides: &BTreeMap<String, String>,
        resource: ExpectationTable,
    ) -> Self {
        let parallel_group = failover_group.with_overrides(
            parallel_overrides
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        Self {
            cluster,
            failover_group,
            parallel_group,
            resource,
        }
    }

    /// Picks the group table from the group's own `Parallel` attribute.
    pub fn group_table(&self, group_attributes: &AttributeMap) -> &ExpectationTable {
        if group_attributes.get_or("Parallel", "0") == "1" {
            &self.parallel_group
        } else {
            &self.failover_group
        }
    }
}

impl Default for Expectations {
    fn default() -> Self {
        Self::new(
            Self::standard_cluster(),
            Self::standard_failover_group(),
            &Self::standard_parallel_overrides(),
            Self::standard_resource(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failover_group_reports_single_mismatch() {
        let attributes: AttributeMap = [
            ("ManageFaults", "NONE"),
            ("Parallel", "0"),
            ("AutoStart", "1"),
            ("AutoFailOver", "1"),
            ("OnlineRetryLimit", "0"),
            ("AutoStartPolicy", "Order"),
            ("FailOverPolicy", "Priority"),
            ("ClusterFailOverPolicy", "Manual"),
        ]
        .into_iter()
        .collect();
        let expectations = Expectations::default();

        let table = expectations.group_table(&attributes);
        let mismatches = table.compare(&attributes);

        assert_eq!(
            mismatches,
            vec![Mismatch {
                attribute: "ManageFaults".to_string(),
                expected: "ALL".to_string(),
                actual: "NONE".to_string(),
            }]
        );
    }

    #[test]
    fn test_absent_attributes_never_mismatch() {
        let table = Expectations::standard_resource();
        assert!(table.compare(&AttributeMap::new()).is_empty());

        let partial: AttributeMap = [("Critical", "1")].into_iter().collect();
        assert!(table.compare(&partial).is_empty());
    }

    #[test]
    fn test_parallel_table_is_derived_from_failover() {
        let expectations = Expectations::default();
        assert_eq!(expectations.parallel_group.expected("AutoFailOver"), Some("0"));
        assert_eq!(expectations.failover_group.expected("AutoFailOver"), Some("1"));
        assert_eq!(
            expectations.parallel_group.len(),
            expectations.failover_group.len()
        );
        assert_eq!(
            expectations.parallel_group.expected("ManageFaults"),
            expectations.failover_group.expected("ManageFaults")
        );
    }

    #[test]
    fn test_group_table_selection() {
        let expectations = Expectations::default();
        let parallel: AttributeMap = [("Parallel", "1")].into_iter().collect();
        let unknown = AttributeMap::new();
        assert_eq!(expectations.group_table(&parallel), &expectations.parallel_group);
        assert_eq!(expectations.group_table(&unknown), &expectations.failover_group);
    }

    #[test]
    fn test_empty_expected_value_matches_empty_actual() {
        let table = Expectations::standard_cluster();
        let info: AttributeMap = [("Guests", ""), ("Operators", "ops")].into_iter().collect();
        let mismatches = table.compare(&info);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].attribute, "Operators");
    }
}
