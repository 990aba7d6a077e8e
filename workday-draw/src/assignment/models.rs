//! Value types for the candidate pool and the resulting assignment

/// A single spreadsheet cell taken from the first column
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell, or a row with no first cell at all
    Null,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date/time cells, kept in the textual form the reader produced
    DateTime(String),
}

impl CellValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Try to get as string
    #[cfg(test)]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // An empty cell prints as nothing, not as a placeholder
            CellValue::Null => Ok(()),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(fl) => write!(f, "{}", fl),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

/// Working set of values that can still be drawn
///
/// Values keep their spreadsheet order. Drawing removes exactly one
/// instance, so a pool with repeated values can hand out the same value
/// more than once, but never the same instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePool {
    values: Vec<CellValue>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Take the value at `index` out of the pool.
    ///
    /// The instance removed is the first one equal to the value at `index`,
    /// which for repeated values may sit earlier in the pool. Values that
    /// never compare equal (NaN) fall back to the slot itself.
    pub(crate) fn take_at(&mut self, index: usize) -> Option<CellValue> {
        let chosen = self.values.get(index)?.clone();
        match self.remove_first(&chosen) {
            Some(value) => Some(value),
            None => Some(self.values.remove(index)),
        }
    }

    /// Remove the first instance equal to `value`, leaving later equal
    /// instances in place. Returns `None` when nothing matches.
    pub fn remove_first(&mut self, value: &CellValue) -> Option<CellValue> {
        let pos = self.values.iter().position(|v| v == value)?;
        Some(self.values.remove(pos))
    }

    #[cfg(test)]
    pub fn into_values(self) -> Vec<CellValue> {
        self.values
    }
}

impl FromIterator<CellValue> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = CellValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Ordered result of a draw, one entry per submitted label
///
/// Repeated labels stay as separate entries rather than overwriting each
/// other, so every consumed value shows up in the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    entries: Vec<(String, CellValue)>,
}

impl Assignment {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, label: String, value: CellValue) {
        self.entries.push((label, value));
    }

    /// Entries in label submission order
    pub fn entries(&self) -> &[(String, CellValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value drawn for the first occurrence of `label`
    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    #[cfg(test)]
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.entries.iter().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_first_only_removes_one_instance() {
        let mut pool = CandidatePool::from_values(vec!["A".into(), "A".into(), "B".into()]);

        let removed = pool.remove_first(&CellValue::from("A"));

        assert_eq!(removed, Some(CellValue::from("A")));
        assert_eq!(pool.values(), &[CellValue::from("A"), CellValue::from("B")]);
    }

    #[test]
    fn test_take_at_removes_first_equal_instance() {
        let mut pool = CandidatePool::from_values(vec!["A".into(), "B".into(), "A".into()]);

        assert_eq!(pool.take_at(2), Some(CellValue::from("A")));
        assert_eq!(pool.values(), &[CellValue::from("B"), CellValue::from("A")]);
        assert_eq!(pool.take_at(5), None);
    }

    #[test]
    fn test_take_at_nan_removes_slot() {
        let mut pool = CandidatePool::from_values(vec![CellValue::Float(f64::NAN), CellValue::Int(1)]);

        let taken = pool.take_at(0).unwrap();

        assert!(matches!(taken, CellValue::Float(f) if f.is_nan()));
        assert_eq!(pool.values(), &[CellValue::Int(1)]);
    }

    #[test]
    fn test_remove_first_missing_value() {
        let mut pool = CandidatePool::from_values(vec!["A".into()]);
        assert_eq!(pool.remove_first(&CellValue::from("Z")), None);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_null_displays_as_empty() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_assignment_get_returns_first_entry() {
        let mut assignment = Assignment::default();
        assignment.push("Mon".to_string(), "Alice".into());
        assignment.push("Mon".to_string(), "Bob".into());

        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.get("Mon"), Some(&CellValue::from("Alice")));
        assert_eq!(assignment.get("Tue"), None);
    }
}
