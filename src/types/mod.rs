//! # Type System for Mapped Records
//!
//! This module holds the vocabulary shared by every repository: the four
//! semantic field types, the nullable `Value` exchanged with the store, and
//! the `RecordDescriptor` that names a record type's table and fields.
//!
//! ## Module Structure
//!
//! - `field_type`: `FieldType` and its fixed column-type mapping
//! - `value`: `Value`, `IntoValue`/`FromValue`, canonical timestamp codec
//! - `descriptor`: `FieldDef`, `RecordDescriptor`
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `FieldType` | Semantic type of a field (integer, float, text, timestamp) |
//! | `Value` | One field value, or NULL |
//! | `FieldDef` | Field name, type and optional foreign-key target |
//! | `RecordDescriptor` | Table name plus ordered fields, excluding `pk` |

mod descriptor;
mod field_type;
mod value;

pub use descriptor::{FieldDef, RecordDescriptor, PK_COLUMN};
pub use field_type::FieldType;
pub use value::{
    format_timestamp, parse_timestamp, FromValue, IntoValue, Value, TIMESTAMP_FORMAT,
};
