//! In-process repository.
//!
//! `MemoryRepository<T>` keeps rows as `Vec<Value>` in a `BTreeMap` keyed by
//! identity, so iteration follows identity order. Identities start at 1 and
//! are never reused. The precondition checks and error variants are the
//! same as the SQLite repository's; foreign keys are not enforced.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use parking_lot::Mutex;

use super::filter;
use super::{Filter, Pk, Record, RecordValues, Repository, RepositoryError, RepositoryResult};
use crate::types::{RecordDescriptor, Value};

struct MemoryState {
    rows: BTreeMap<Pk, Vec<Value>>,
    next_pk: Pk,
}

/// Repository backed by a mutex-guarded map.
pub struct MemoryRepository<T> {
    descriptor: RecordDescriptor,
    state: Mutex<MemoryState>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            descriptor: T::descriptor(),
            state: Mutex::new(MemoryState {
                rows: BTreeMap::new(),
                next_pk: 1,
            }),
            _record: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> String {
        self.descriptor.table().to_string()
    }

    fn encode(&self, record: &T) -> RepositoryResult<Vec<Value>> {
        self.descriptor.conform_values(record.values())
    }

    fn build(&self, pk: Pk, values: Vec<Value>) -> RepositoryResult<T> {
        T::from_values(RecordValues::new(pk, &self.descriptor, values))
    }
}

impl<T: Record> Repository<T> for MemoryRepository<T> {
    fn descriptor(&self) -> &RecordDescriptor {
        &self.descriptor
    }

    fn add(&self, record: &mut T) -> RepositoryResult<Pk> {
        match record.pk() {
            None => return Err(RepositoryError::MissingIdentity { table: self.table() }),
            Some(0) => {}
            Some(pk) => {
                return Err(RepositoryError::IdentityAssigned {
                    table: self.table(),
                    pk,
                })
            }
        }

        let values = self.encode(record)?;
        let pk = {
            let mut state = self.state.lock();
            let pk = state.next_pk;
            state.next_pk += 1;
            state.rows.insert(pk, values);
            pk
        };
        record.set_pk(pk);
        Ok(pk)
    }

    fn get(&self, pk: Pk) -> RepositoryResult<Option<T>> {
        let values = self.state.lock().rows.get(&pk).cloned();
        values.map(|v| self.build(pk, v)).transpose()
    }

    fn get_all(&self, filter: Option<&Filter>) -> RepositoryResult<Vec<T>> {
        let conditions = match filter {
            Some(f) => f.resolve(&self.descriptor)?,
            None => Vec::new(),
        };

        let matching: Vec<(Pk, Vec<Value>)> = self
            .state
            .lock()
            .rows
            .iter()
            .filter(|(_, values)| filter::matches(&conditions, values))
            .map(|(pk, values)| (*pk, values.clone()))
            .collect();

        matching
            .into_iter()
            .map(|(pk, values)| self.build(pk, values))
            .collect()
    }

    fn update(&self, record: &T) -> RepositoryResult<()> {
        let pk = record
            .pk()
            .ok_or_else(|| RepositoryError::MissingIdentity { table: self.table() })?;
        let values = self.encode(record)?;

        let mut state = self.state.lock();
        match state.rows.get_mut(&pk) {
            Some(slot) => {
                *slot = values;
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                table: self.table(),
                pk,
            }),
        }
    }

    fn delete(&self, pk: Pk) -> RepositoryResult<()> {
        match self.state.lock().rows.remove(&pk) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound {
                table: self.table(),
                pk,
            }),
        }
    }

    fn delete_all(&self) -> RepositoryResult<()> {
        self.state.lock().rows.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldType, IntoValue};

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        text: Option<String>,
        weight: i64,
        pk: Pk,
    }

    impl Note {
        fn new(text: &str, weight: i64) -> Self {
            Self {
                text: Some(text.to_string()),
                weight,
                pk: 0,
            }
        }
    }

    impl Record for Note {
        fn descriptor() -> RecordDescriptor {
            RecordDescriptor::new("Note")
                .field("text", FieldType::Text)
                .field("weight", FieldType::Integer)
        }

        fn pk(&self) -> Option<Pk> {
            Some(self.pk)
        }

        fn set_pk(&mut self, pk: Pk) {
            self.pk = pk;
        }

        fn values(&self) -> Vec<Value> {
            vec![self.text.clone().into_value(), self.weight.into_value()]
        }

        fn from_values(mut values: RecordValues<'_>) -> RepositoryResult<Self> {
            Ok(Self {
                pk: values.pk(),
                text: values.next()?,
                weight: values.next()?,
            })
        }
    }

    #[test]
    fn add_assigns_increasing_identities() {
        let repo = MemoryRepository::<Note>::new();
        let mut a = Note::new("a", 1);
        let mut b = Note::new("a", 1);
        let pk_a = repo.add(&mut a).unwrap();
        let pk_b = repo.add(&mut b).unwrap();
        assert_eq!(a.pk, pk_a);
        assert!(pk_b > pk_a);
        assert_eq!(repo.get(pk_a).unwrap(), Some(a));
    }

    #[test]
    fn add_rejects_assigned_identity_without_inserting() {
        let repo = MemoryRepository::<Note>::new();
        let mut note = Note::new("a", 1);
        note.pk = 5;
        let err = repo.add(&mut note).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(repo.is_empty());
    }

    #[test]
    fn update_and_delete_require_existing_row() {
        let repo = MemoryRepository::<Note>::new();
        let mut ghost = Note::new("ghost", 0);
        ghost.pk = 42;
        assert!(repo.update(&ghost).unwrap_err().is_not_found());
        assert!(repo.delete(42).unwrap_err().is_not_found());
        assert!(repo.is_empty());
    }

    #[test]
    fn get_all_filters_conjunctively() {
        let repo = MemoryRepository::<Note>::new();
        for (text, weight) in [("x", 1), ("x", 2), ("y", 1)] {
            repo.add(&mut Note::new(text, weight)).unwrap();
        }

        let both = Filter::new().eq("text", "x").eq("weight", 1i64);
        let hits = repo.get_all(Some(&both)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].weight, 1);

        assert_eq!(repo.get_all(None).unwrap().len(), 3);
        assert!(repo
            .get_all(Some(&Filter::new().eq("weight", -1i64)))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn null_fields_round_trip_and_filter() {
        let repo = MemoryRepository::<Note>::new();
        let mut note = Note::new("", 3);
        note.text = None;
        let pk = repo.add(&mut note).unwrap();
        assert_eq!(repo.get(pk).unwrap().unwrap().text, None);

        let nulls = repo
            .get_all(Some(&Filter::new().eq("text", Value::Null)))
            .unwrap();
        assert_eq!(nulls.len(), 1);
    }

    #[test]
    fn delete_all_keeps_repository_usable() {
        let repo = MemoryRepository::<Note>::new();
        repo.add(&mut Note::new("a", 1)).unwrap();
        repo.delete_all().unwrap();
        assert!(repo.get_all(None).unwrap().is_empty());
        assert!(repo.add(&mut Note::new("b", 2)).is_ok());
    }
}
