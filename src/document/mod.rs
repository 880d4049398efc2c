//! Tree data model and structural utilities.
//!
//! - [`node`]: keys, values and maps
//! - [`tree`]: merge, attach, flatten and other helpers
//! - [`parser`]: conversion from and to JSON, YAML and string lists

pub mod node;
pub mod parser;
pub mod tree;
