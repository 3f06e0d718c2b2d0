//! Parallel drivers for rowgroup (pure Rust, rayon-backed)
//!
//! [`group_by_key`] runs the budget/fill protocol of
//! [`rowgroup_core::ParallelGroupBuilder`] over contiguous shards on rayon's
//! pool; [`convert`] uses it for COO/CSR/CSC conversions.

pub mod config;
pub mod convert;
pub mod group_by;
pub mod shard;

pub use config::{GroupOptions, DEFAULT_MIN_SHARD_LEN, NUM_THREADS_ENV};
pub use convert::{coo_to_csc, coo_to_csr, csc_to_csr, csr_to_csc};
pub use group_by::{group_by_key, group_by_key_into, group_pairs, keys_from_i64, Grouped};
pub use shard::shard_ranges;
