//! Mystique mapper
//!
//! Turns schema introspection rows (`DESCRIBE`-style column descriptions) and
//! the data rows they describe into field view-models for auto-generated
//! forms and tables.
//!
//! # Example
//!
//! ```rust
//! use mqe_mapper::{ColumnDescription, Component, Dataset, Resource, meta};
//!
//! let dataset = Dataset::new(
//!     vec![Resource::new(1).with_attribute("age", "30")],
//!     vec![ColumnDescription::new("age", "int(3)")],
//! );
//!
//! let mapped = meta(&dataset).unwrap();
//! assert_eq!(mapped.data[0][0].label, "Age");
//! assert_eq!(mapped.data[0][0].component, Component::Input);
//! ```

mod datatype;
mod error;
mod field;
mod meta;
mod model;

pub use datatype::{
    BOOL_MARKER, Classification, Component, DATATYPES, DatatypeGroup, DatatypeRule, base_type,
    classify, find_rule,
};
pub use error::{MappingError, Result};
pub use field::{ID_FIELD, extract, extract_length, humanize};
pub use meta::{map_field, meta};
pub use model::{ColumnDescription, Dataset, FieldViewModel, MappedDataset, Resource};
