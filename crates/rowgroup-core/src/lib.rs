//! Core data structures for rowgroup (pure Rust)
//!
//! [`ParallelGroupBuilder`] groups an unordered stream of `(key, value)` pairs
//! into a flat `data` array and an offset array `ptr`, so that the values of
//! key `k` sit in `data[ptr[k]..ptr[k + 1]]`. Many threads can count and fill
//! at once; each owns its own budget/cursor row.
//!
//! ```
//! use rowgroup_core::ParallelGroupBuilder;
//!
//! let mut ptr: Vec<usize> = Vec::new();
//! let mut data: Vec<u32> = Vec::new();
//! let mut builder = ParallelGroupBuilder::new(&mut ptr, &mut data);
//! builder.init_budget(2, 1);
//! builder.add_budget_one(1, 0).unwrap();
//! builder.add_budget_one(0, 0).unwrap();
//! builder.init_storage().unwrap();
//! builder.push(1, 10, 0);
//! builder.push(0, 11, 0);
//! assert_eq!(ptr, [0, 1, 2]);
//! assert_eq!(data, [11, 10]);
//! ```

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod coo;
pub mod csc;
pub mod csr;
pub mod error;
pub mod group;
pub mod offset;

pub use coo::Coo;
pub use csc::Csc;
pub use csr::Csr;
pub use error::GroupError;
pub use group::{BudgetRow, CursorTable, FillWriter, ParallelGroupBuilder, Phase};
pub use offset::Offset;
