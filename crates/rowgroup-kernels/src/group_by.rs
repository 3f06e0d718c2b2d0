//! Two-pass parallel group-by driver on rayon.
//
// Records are split into contiguous shards, one per worker. Pass one counts
// each worker's keys into its own budget row, pass two re-reads the same shard
// and writes through that row's cursors. Joining the parallel iterator is the
// barrier around `init_storage`.

use log::debug;
use rayon::prelude::*;
use rowgroup_core::{GroupError, Offset, ParallelGroupBuilder};

use crate::config::GroupOptions;
use crate::shard::shard_ranges;

/// Owned result of a fresh grouping run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouped<V> {
    pub ptr: Vec<usize>,
    pub data: Vec<V>,
}

impl<V> Grouped<V> {
    #[inline]
    #[must_use]
    pub fn nkeys(&self) -> usize {
        self.ptr.len().saturating_sub(1)
    }

    /// Values grouped under `key`; empty for keys past the end.
    #[inline]
    #[must_use]
    pub fn group(&self, key: usize) -> &[V] {
        if key >= self.nkeys() {
            return &[];
        }
        &self.data[self.ptr[key]..self.ptr[key + 1]]
    }
}

/// Group `values[i]` under `keys[i]` into a fresh `(ptr, data)`.
///
/// Within a key, values keep their input order.
///
/// # Errors
/// [`GroupError::LengthMismatch`] if the slices differ in length,
/// [`GroupError::ZeroThreads`] for a zero worker count,
/// [`GroupError::OffsetOverflow`] if offsets do not fit the offset type, and
/// [`GroupError::Alloc`] if `data` cannot be allocated.
pub fn group_by_key<V>(
    keys: &[usize],
    values: &[V],
    opts: &GroupOptions,
) -> Result<Grouped<V>, GroupError>
where
    V: Clone + Default + Send + Sync,
{
    let mut ptr = Vec::new();
    let mut data = Vec::new();
    group_by_key_into(&mut ptr, &mut data, keys, values, opts)?;
    Ok(Grouped { ptr, data })
}

/// Like [`group_by_key`], but appends into existing storage: the current tail
/// of `ptr` is the base offset for the new values.
///
/// # Errors
/// Same as [`group_by_key`].
pub fn group_by_key_into<V, S>(
    ptr: &mut Vec<S>,
    data: &mut Vec<V>,
    keys: &[usize],
    values: &[V],
    opts: &GroupOptions,
) -> Result<(), GroupError>
where
    V: Clone + Default + Send + Sync,
    S: Offset,
{
    if keys.len() != values.len() {
        return Err(GroupError::LengthMismatch {
            keys: keys.len(),
            values: values.len(),
        });
    }
    group_with(ptr, data, keys.len(), |i| keys[i], |i| values[i].clone(), opts)
}

/// Convert signed keys (as they arrive from numpy or COO coordinates) to
/// `usize` keys.
///
/// # Errors
/// [`GroupError::NegativeIndex`] if any key is negative.
pub fn keys_from_i64(keys: &[i64]) -> Result<Vec<usize>, GroupError> {
    keys.par_iter()
        .map(|&k| {
            usize::try_from(k).map_err(|_| {
                if k < 0 {
                    GroupError::NegativeIndex(k)
                } else {
                    GroupError::IndexOutOfBounds {
                        index: k,
                        bound: usize::MAX,
                    }
                }
            })
        })
        .collect()
}

/// Group a slice of `(key, value)` pairs.
///
/// # Errors
/// [`GroupError::ZeroThreads`] or [`GroupError::Alloc`].
pub fn group_pairs<V>(pairs: &[(usize, V)], opts: &GroupOptions) -> Result<Grouped<V>, GroupError>
where
    V: Clone + Default + Send + Sync,
{
    let mut ptr = Vec::new();
    let mut data = Vec::new();
    group_with(
        &mut ptr,
        &mut data,
        pairs.len(),
        |i| pairs[i].0,
        |i| pairs[i].1.clone(),
        opts,
    )?;
    Ok(Grouped { ptr, data })
}

/// Run all four phases over records `0..len`.
///
/// `key_of` must return the same key for a record in both passes; the fill
/// pass relies on it to stay within each worker's budget.
pub(crate) fn group_with<V, S, K, F>(
    ptr: &mut Vec<S>,
    data: &mut Vec<V>,
    len: usize,
    key_of: K,
    value_of: F,
    opts: &GroupOptions,
) -> Result<(), GroupError>
where
    V: Default + Send,
    S: Offset,
    K: Fn(usize) -> usize + Sync,
    F: Fn(usize) -> V + Sync,
{
    let nthread = opts.resolve_nthread(len)?;
    let mut builder = ParallelGroupBuilder::new(ptr, data);
    builder.init_budget(opts.nkeys_hint, nthread);

    if nthread == 1 {
        debug!("grouping {len} records on the calling thread");
        for i in 0..len {
            builder.add_budget_one(key_of(i), 0)?;
        }
        builder.init_storage()?;
        for i in 0..len {
            builder.push(key_of(i), value_of(i), 0);
        }
        return Ok(());
    }

    let shards = shard_ranges(len, nthread);
    debug!("grouping {len} records over {nthread} shards");
    builder
        .budget_rows()
        .into_par_iter()
        .zip(shards.par_iter())
        .try_for_each(|(mut row, range)| {
            for i in range.clone() {
                row.add_one(key_of(i))?;
            }
            Ok::<(), GroupError>(())
        })?;
    builder.init_storage()?;
    builder
        .fill_writers()
        .into_par_iter()
        .zip(shards.par_iter())
        .for_each(|(mut writer, range)| {
            for i in range.clone() {
                // SAFETY: this worker budgeted exactly the keys of this range.
                unsafe { writer.push(key_of(i), value_of(i)) };
            }
        });
    Ok(())
}
