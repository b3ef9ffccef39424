//! SQL statement builders.
//!
//! Statement text is derived only from a validated `RecordDescriptor`;
//! every value travels as a numbered parameter. Identifiers are double
//! quoted so that field names which happen to be keywords (`when`,
//! `order`) stay usable.

use crate::types::{RecordDescriptor, Value, PK_COLUMN};

/// Fixed statements of one mapped table, built once per repository.
#[derive(Debug, Clone)]
pub struct Statements {
    pub create_table: String,
    pub drop_table: String,
    pub delete_all: String,
    pub insert: String,
    pub select_one: String,
    pub update: String,
    pub delete: String,
    select_all: String,
}

impl Statements {
    pub fn new(descriptor: &RecordDescriptor) -> Self {
        let table = quote(descriptor.table());
        let pk = quote(PK_COLUMN);
        let columns: Vec<String> = descriptor.field_names().map(quote).collect();
        let n = columns.len();

        let mut definitions = vec![format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", pk)];
        definitions.extend(
            descriptor
                .fields()
                .iter()
                .map(|f| format!("{} {}", quote(f.name()), f.field_type().column_type())),
        );
        definitions.extend(descriptor.fields().iter().filter_map(|f| {
            f.references().map(|target| {
                format!(
                    "FOREIGN KEY ({}) REFERENCES {}({})",
                    quote(f.name()),
                    quote(target),
                    pk
                )
            })
        }));

        let placeholders: Vec<String> = (1..=n).map(|i| format!("?{}", i)).collect();
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ?{}", c, i + 1))
            .collect();

        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                table,
                definitions.join(", ")
            ),
            drop_table: format!("DROP TABLE {}", table),
            delete_all: format!("DELETE FROM {}", table),
            insert: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                placeholders.join(", ")
            ),
            select_one: format!("SELECT * FROM {} WHERE {} = ?1", table, pk),
            update: format!(
                "UPDATE {} SET {} WHERE {} = ?{}",
                table,
                assignments.join(", "),
                pk,
                n + 1
            ),
            delete: format!("DELETE FROM {} WHERE {} = ?1", table, pk),
            select_all: format!("SELECT * FROM {}", table),
        }
    }

    /// `SELECT *` with one predicate per resolved condition, joined by AND.
    /// NULL conditions compare with `IS` so that they can match.
    pub fn select_where(&self, descriptor: &RecordDescriptor, conditions: &[(usize, Value)]) -> String {
        if conditions.is_empty() {
            return self.select_all.clone();
        }

        let predicates: Vec<String> = conditions
            .iter()
            .enumerate()
            .map(|(i, (index, value))| {
                let op = if value.is_null() { "IS" } else { "=" };
                format!(
                    "{} {} ?{}",
                    quote(descriptor.fields()[*index].name()),
                    op,
                    i + 1
                )
            })
            .collect();

        format!("{} WHERE {}", self.select_all, predicates.join(" AND "))
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}
