//! Equality filters for bulk reads.
//!
//! A `Filter` is a conjunction of `field = value` predicates. An empty
//! filter matches every row. Field names and value types are checked
//! against the record descriptor before any statement is built, so both
//! repositories compare the same normalised values.

use super::{RepositoryError, RepositoryResult};
use crate::types::{IntoValue, RecordDescriptor, Value};

/// Conjunctive equality filter over declared fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field = value`. A `Null` value matches NULL columns.
    pub fn eq(mut self, field: impl Into<String>, value: impl IntoValue) -> Self {
        self.conditions.push((field.into(), value.into_value()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Resolves each condition to its field's declaration index, with the
    /// value conformed to the field's declared type.
    pub(crate) fn resolve(
        &self,
        descriptor: &RecordDescriptor,
    ) -> RepositoryResult<Vec<(usize, Value)>> {
        self.conditions
            .iter()
            .map(|(field, value)| {
                let index = descriptor.position(field).ok_or_else(|| {
                    RepositoryError::UnknownField {
                        table: descriptor.table().to_string(),
                        field: field.clone(),
                    }
                })?;
                let value = descriptor.fields()[index].conform(descriptor.table(), value.clone())?;
                Ok((index, value))
            })
            .collect()
    }
}

impl<K: Into<String>, V: IntoValue> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (k, v)| filter.eq(k, v))
    }
}

/// Returns true if `values` satisfies every resolved condition.
pub(crate) fn matches(conditions: &[(usize, Value)], values: &[Value]) -> bool {
    conditions
        .iter()
        .all(|(index, expected)| values.get(*index) == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::new("Custom")
            .field("bar", FieldType::Text)
            .field("a", FieldType::Integer)
            .field("amount", FieldType::Float)
    }

    #[test]
    fn resolve_maps_names_to_positions() {
        let filter = Filter::new().eq("a", 0i64).eq("bar", "test");
        let resolved = filter.resolve(&descriptor()).unwrap();
        assert_eq!(resolved[0].0, 1);
        assert_eq!(resolved[1].0, 0);
    }

    #[test]
    fn resolve_rejects_unknown_field() {
        let filter = Filter::new().eq("nope", 1i64);
        assert!(matches!(
            filter.resolve(&descriptor()),
            Err(RepositoryError::UnknownField { .. })
        ));
    }

    #[test]
    fn matches_is_conjunctive() {
        let filter = Filter::new().eq("a", 0i64).eq("bar", "test");
        let d = descriptor();
        let resolved = filter.resolve(&d).unwrap();

        let hit = [Value::Text("test".into()), Value::Integer(0), Value::Null];
        let half = [Value::Text("test".into()), Value::Integer(1), Value::Null];
        assert!(matches(&resolved, &hit));
        assert!(!matches(&resolved, &half));
    }

    #[test]
    fn integer_condition_on_float_field_is_widened() {
        let filter = Filter::new().eq("amount", 100i64);
        let d = descriptor();
        let resolved = filter.resolve(&d).unwrap();
        assert_eq!(resolved, [(2, Value::Float(100.0))]);

        let row = [Value::Null, Value::Null, Value::Float(100.0)];
        assert!(matches(&resolved, &row));
    }

    #[test]
    fn resolve_rejects_value_of_wrong_type() {
        let filter = Filter::new().eq("a", "zero");
        let err = filter.resolve(&descriptor()).unwrap_err();
        assert!(matches!(err, RepositoryError::WrongValueType { .. }));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(matches(&[], &[Value::Null]));
        assert!(Filter::new().is_empty());
    }

    #[test]
    fn collects_from_pairs() {
        let filter: Filter = [("a", 1i64), ("b", 2i64)].into_iter().collect();
        assert_eq!(filter.len(), 2);
        assert_eq!(filter, Filter::new().eq("a", 1i64).eq("b", 2i64));
    }
}
