//! Fixed-arity records produced from line-oriented CLI output.

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Scope value used by attributes that apply to every system.
pub const GLOBAL_SCOPE: &str = "global";

/// A line of CLI output split into exactly `N` fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record<const N: usize> {
    fields: [String; N],
}

/// `entity attribute scope value`, the shape of every `-display` query.
pub type QuadRecord = Record<4>;

/// `name value` or `name system`, the shape of `-list` queries.
pub type PairRecord = Record<2>;

impl<const N: usize> Record<N> {
    pub fn new(fields: [String; N]) -> Self {
        Self { fields }
    }

    /// Builds a record from any number of parts, dropping extras and
    /// padding missing trailing fields with empty strings.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts = parts.into_iter();
        let fields = std::array::from_fn(|_| parts.next().map(Into::into).unwrap_or_default());
        Self { fields }
    }

    pub fn fields(&self) -> &[String; N] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn into_fields(self) -> [String; N] {
        self.fields
    }
}

impl Record<4> {
    pub fn entity(&self) -> &str {
        &self.fields[0]
    }

    pub fn attribute(&self) -> &str {
        &self.fields[1]
    }

    pub fn scope(&self) -> &str {
        &self.fields[2]
    }

    pub fn value(&self) -> &str {
        &self.fields[3]
    }

    /// True when the record applies to `system`, either directly or globally.
    pub fn applies_to(&self, system: &str) -> bool {
        self.scope() == system || self.scope() == GLOBAL_SCOPE
    }
}

impl Record<2> {
    pub fn key(&self) -> &str {
        &self.fields[0]
    }

    pub fn value(&self) -> &str {
        &self.fields[1]
    }

    pub fn into_pair(self) -> (String, String) {
        let [key, value] = self.fields;
        (key, value)
    }
}

impl<const N: usize> Serialize for Record<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(N))?;
        for field in &self.fields {
            seq.serialize_element(field)?;
        }
        seq.end()
    }
}
