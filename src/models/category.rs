//! Expense categories.
//!
//! Categories form a tree through the nullable `parent` foreign key, which
//! references another category's identity.

use std::collections::{HashMap, HashSet, VecDeque};

use eyre::{bail, eyre, Result};

use crate::repository::{Filter, Pk, Record, RecordValues, Repository, RepositoryResult};
use crate::types::{FieldType, IntoValue, RecordDescriptor, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub parent: Option<Pk>,
    pub pk: Pk,
}

impl Category {
    pub fn new(name: impl Into<String>, parent: Option<Pk>) -> Self {
        Self {
            name: name.into(),
            parent,
            pk: 0,
        }
    }

    /// Direct parent, or None for a root category.
    pub fn parent<R: Repository<Category>>(&self, repo: &R) -> Result<Option<Category>> {
        match self.parent {
            None => Ok(None),
            Some(pk) => repo
                .get(pk)?
                .map(Some)
                .ok_or_else(|| eyre!("category {} refers to missing parent {}", self.pk, pk)),
        }
    }

    /// Every ancestor, nearest first.
    pub fn ancestors<R: Repository<Category>>(&self, repo: &R) -> Result<Vec<Category>> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([self.pk]);
        let mut current = self.parent(repo)?;

        while let Some(category) = current {
            if !seen.insert(category.pk) {
                bail!("category tree has a cycle through {}", category.pk);
            }
            current = category.parent(repo)?;
            ancestors.push(category);
        }

        Ok(ancestors)
    }

    /// Every descendant, breadth first.
    pub fn subcategories<R: Repository<Category>>(&self, repo: &R) -> Result<Vec<Category>> {
        let mut found = Vec::new();
        let mut seen = HashSet::from([self.pk]);
        let mut queue = VecDeque::from([self.pk]);

        while let Some(pk) = queue.pop_front() {
            for child in repo.get_all(Some(&Filter::new().eq("parent", pk)))? {
                if seen.insert(child.pk) {
                    queue.push_back(child.pk);
                    found.push(child);
                }
            }
        }

        Ok(found)
    }

    /// Inserts `(name, parent name)` pairs in order. A parent must appear
    /// earlier in the same list.
    pub fn create_from_tree<R: Repository<Category>>(
        tree: &[(&str, Option<&str>)],
        repo: &R,
    ) -> Result<Vec<Category>> {
        let mut created: HashMap<&str, Pk> = HashMap::with_capacity(tree.len());
        let mut categories = Vec::with_capacity(tree.len());

        for &(name, parent) in tree {
            let parent_pk = match parent {
                None => None,
                Some(p) => match created.get(p) {
                    Some(pk) => Some(*pk),
                    None => bail!("parent category {:?} of {:?} is not defined before it", p, name),
                },
            };
            let mut category = Category::new(name, parent_pk);
            let pk = repo.add(&mut category)?;
            created.insert(name, pk);
            categories.push(category);
        }

        Ok(categories)
    }
}

impl Record for Category {
    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::new("Category")
            .field("name", FieldType::Text)
            .foreign_key("parent", "Category")
    }

    fn pk(&self) -> Option<Pk> {
        Some(self.pk)
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into_value(), self.parent.into_value()]
    }

    fn from_values(mut values: RecordValues<'_>) -> RepositoryResult<Self> {
        Ok(Self {
            pk: values.pk(),
            name: values.next()?,
            parent: values.next()?,
        })
    }
}
