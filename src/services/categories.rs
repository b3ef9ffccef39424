//! Category management.

use std::collections::{HashMap, HashSet};

use eyre::{bail, eyre, Result};
use tracing::{debug, info};

use crate::models::{Category, Expense};
use crate::repository::{Filter, Pk, Repository};

/// A category with its children, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Number of categories in this subtree, including the root.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::size).sum::<usize>()
    }

    /// Depth-first walk yielding each category with its depth.
    pub fn walk(&self) -> Vec<(usize, &Category)> {
        let mut out = Vec::with_capacity(self.size());
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a Category)>) {
        out.push((depth, &self.category));
        for child in &self.children {
            child.walk_into(depth + 1, out);
        }
    }
}

pub struct CategoryService<C, E> {
    categories: C,
    expenses: E,
}

impl<C, E> CategoryService<C, E>
where
    C: Repository<Category>,
    E: Repository<Expense>,
{
    pub fn new(categories: C, expenses: E) -> Self {
        Self {
            categories,
            expenses,
        }
    }

    /// Adds a category under the category named `parent`. Names are unique.
    pub fn add(&self, name: &str, parent: Option<&str>) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            bail!("category name cannot be empty");
        }
        if self.find_by_name(name)?.is_some() {
            bail!("category {:?} already exists", name);
        }

        let parent = match parent {
            Some(p) => Some(self.require_by_name(p)?.pk),
            None => None,
        };

        let mut category = Category::new(name, parent);
        self.categories.add(&mut category)?;
        info!(pk = category.pk, name, "added category");
        Ok(category)
    }

    pub fn get(&self, pk: Pk) -> Result<Option<Category>> {
        Ok(self.categories.get(pk)?)
    }

    pub fn all(&self) -> Result<Vec<Category>> {
        Ok(self.categories.get_all(None)?)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let mut found = self
            .categories
            .get_all(Some(&Filter::new().eq("name", name)))?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    pub fn require_by_name(&self, name: &str) -> Result<Category> {
        self.find_by_name(name)?
            .ok_or_else(|| eyre!("no category named {:?}", name))
    }

    pub fn rename(&self, pk: Pk, new_name: &str) -> Result<Category> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            bail!("category name cannot be empty");
        }
        let mut category = self
            .categories
            .get(pk)?
            .ok_or_else(|| eyre!("no category with pk {}", pk))?;

        if let Some(other) = self.find_by_name(new_name)? {
            if other.pk != pk {
                bail!("category {:?} already exists", new_name);
            }
        }

        category.name = new_name.to_string();
        self.categories.update(&category)?;
        debug!(pk, name = new_name, "renamed category");
        Ok(category)
    }

    /// Builds the category forest. A category whose parent is missing is
    /// treated as a root.
    pub fn tree(&self) -> Result<Vec<CategoryNode>> {
        let all = self.categories.get_all(None)?;
        let known: HashSet<Pk> = all.iter().map(|c| c.pk).collect();

        let mut children: HashMap<Option<Pk>, Vec<Category>> = HashMap::new();
        for category in all {
            let parent = category.parent.filter(|p| known.contains(p));
            children.entry(parent).or_default().push(category);
        }

        let mut seen = HashSet::new();
        let roots = children.remove(&None).unwrap_or_default();
        Ok(roots
            .into_iter()
            .map(|root| build_node(root, &mut children, &mut seen))
            .collect())
    }

    /// Removes the category, every descendant and all of their expenses.
    /// Returns the number of categories removed.
    pub fn remove(&self, pk: Pk) -> Result<usize> {
        let category = self
            .categories
            .get(pk)?
            .ok_or_else(|| eyre!("no category with pk {}", pk))?;

        // Breadth-first order reversed puts every child before its parent.
        let mut doomed = category.subcategories(&self.categories)?;
        doomed.reverse();
        doomed.push(category);

        let mut expenses = 0;
        for victim in &doomed {
            expenses += Expense::delete_for_category(&self.expenses, victim.pk)?;
            self.categories.delete(victim.pk)?;
        }

        info!(
            pk,
            categories = doomed.len(),
            expenses,
            "removed category subtree"
        );
        Ok(doomed.len())
    }
}

fn build_node(
    category: Category,
    children: &mut HashMap<Option<Pk>, Vec<Category>>,
    seen: &mut HashSet<Pk>,
) -> CategoryNode {
    seen.insert(category.pk);
    let mut node = CategoryNode {
        children: Vec::new(),
        category,
    };
    for kid in children.remove(&Some(node.category.pk)).unwrap_or_default() {
        if !seen.contains(&kid.pk) {
            node.children.push(build_node(kid, children, seen));
        }
    }
    node
}
