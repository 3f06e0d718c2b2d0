//! Two-pass parallel grouping of `(key, value)` pairs.
//
// Input: an unordered sequence (k1, v1), (k2, v2), ... spread over worker threads.
// Output: a flat `data` array and an offset array `ptr` such that
// `data[ptr[k]..ptr[k + 1]]` holds every value pushed under key `k`.
//
// A run goes through four phases driven by the caller:
//   1. `init_budget`   - zeroed counter row per thread
//   2. `add_budget`    - each thread counts what it will push per key
//   3. `init_storage`  - single-threaded prefix sum; counters become cursors
//   4. `push`          - each thread writes its values through its own cursors
//
// Rows are owned exclusively by one thread in phases 2 and 4, so no locking is
// needed. Phase 3 is the barrier between the two parallel phases.

use log::{debug, trace};
use std::marker::PhantomData;

use crate::error::GroupError;
use crate::offset::Offset;

/// Meaning of the cells in the per-thread table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Cells count how many values a thread will push per key.
    Budget,
    /// Cells are absolute write positions into `data`.
    Fill,
}

/// Storage of the per-thread budget/cursor rows.
#[derive(Debug)]
pub enum CursorTable<'a, S> {
    /// Private scratch rows, dropped with the builder.
    Owned(Vec<Vec<S>>),
    /// Caller-supplied rows, reused across runs and inspectable afterwards.
    Borrowed(&'a mut Vec<Vec<S>>),
}

impl<S> CursorTable<'_, S> {
    #[inline]
    fn rows(&self) -> &Vec<Vec<S>> {
        match self {
            Self::Owned(rows) => rows,
            Self::Borrowed(rows) => rows,
        }
    }

    #[inline]
    fn rows_mut(&mut self) -> &mut Vec<Vec<S>> {
        match self {
            Self::Owned(rows) => rows,
            Self::Borrowed(rows) => rows,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

#[inline]
fn grow_and_add<S: Offset>(row: &mut Vec<S>, key: usize, nelem: S) -> Result<(), GroupError> {
    if nelem < S::ZERO {
        return Err(GroupError::NegativeBudget);
    }
    if row.len() <= key {
        let width = key.checked_add(1).ok_or(GroupError::OffsetOverflow)?;
        trace!("growing budget row from {} to {} keys", row.len(), width);
        row.try_reserve_exact(width - row.len())?;
        row.resize(width, S::ZERO);
    }
    let cell = &mut row[key];
    *cell = cell.add_checked(nelem).ok_or(GroupError::OffsetOverflow)?;
    Ok(())
}

/// Multi-threaded group builder writing into caller-owned `ptr`/`data`.
///
/// `V` is the value type, `S` the offset type stored in `ptr` and in the
/// per-thread rows.
#[derive(Debug)]
pub struct ParallelGroupBuilder<'a, V, S = usize> {
    ptr: &'a mut Vec<S>,
    data: &'a mut Vec<V>,
    table: CursorTable<'a, S>,
    phase: Phase,
}

impl<'a, V, S: Offset> ParallelGroupBuilder<'a, V, S> {
    /// Builder with private per-thread rows.
    ///
    /// If `ptr` is non-empty its last element is the base offset of this run
    /// (append mode); `data` must then already hold that many values.
    #[must_use]
    pub fn new(ptr: &'a mut Vec<S>, data: &'a mut Vec<V>) -> Self {
        Self {
            ptr,
            data,
            table: CursorTable::Owned(Vec::new()),
            phase: Phase::Budget,
        }
    }

    /// Builder whose per-thread rows live in `rows`.
    #[must_use]
    pub fn with_thread_rows(
        ptr: &'a mut Vec<S>,
        data: &'a mut Vec<V>,
        rows: &'a mut Vec<Vec<S>>,
    ) -> Self {
        Self {
            ptr,
            data,
            table: CursorTable::Borrowed(rows),
            phase: Phase::Budget,
        }
    }

    #[inline]
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub const fn table(&self) -> &CursorTable<'a, S> {
        &self.table
    }

    #[inline]
    #[must_use]
    pub fn nthread(&self) -> usize {
        self.table.rows().len()
    }

    /// Budget counts (before `init_storage`) or cursors (after) of one thread.
    #[inline]
    #[must_use]
    pub fn thread_row(&self, threadid: usize) -> &[S] {
        &self.table.rows()[threadid]
    }

    /// Step 1: allocate `nthread` zeroed rows of `nkeys` counters.
    ///
    /// `nkeys` is only a hint; rows grow to fit larger keys in `add_budget`.
    pub fn init_budget(&mut self, nkeys: usize, nthread: usize) {
        let rows = self.table.rows_mut();
        rows.resize_with(nthread, Vec::new);
        for row in rows.iter_mut() {
            row.clear();
            row.resize(nkeys, S::ZERO);
        }
        self.phase = Phase::Budget;
    }

    /// Step 2: record that `threadid` will push `nelem` more values under `key`.
    ///
    /// A budget of zero still widens the thread's row to cover `key`, so the
    /// key gets an (empty) segment in `ptr`.
    ///
    /// # Errors
    /// [`GroupError::Alloc`] if the row cannot grow to cover `key`,
    /// [`GroupError::OffsetOverflow`] if the count no longer fits in `S`, and
    /// [`GroupError::NegativeBudget`] for a negative `nelem`.
    #[inline]
    pub fn add_budget(
        &mut self,
        key: usize,
        threadid: usize,
        nelem: S,
    ) -> Result<(), GroupError> {
        debug_assert_eq!(self.phase, Phase::Budget, "add_budget after init_storage");
        grow_and_add(&mut self.table.rows_mut()[threadid], key, nelem)
    }

    /// # Errors
    /// Same as [`Self::add_budget`].
    #[inline]
    pub fn add_budget_one(&mut self, key: usize, threadid: usize) -> Result<(), GroupError> {
        self.add_budget(key, threadid, S::ONE)
    }

    /// Split the table into one exclusive handle per thread for a parallel
    /// budgeting pass. Handles are returned in thread order.
    pub fn budget_rows(&mut self) -> Vec<BudgetRow<'_, S>> {
        debug_assert_eq!(self.phase, Phase::Budget, "budget_rows after init_storage");
        self.table
            .rows_mut()
            .iter_mut()
            .enumerate()
            .map(|(threadid, row)| BudgetRow { threadid, row })
            .collect()
    }

    /// Step 3: turn the budgets into final offsets and per-thread cursors and
    /// size `data` to hold every value.
    ///
    /// Within a key, thread 0's slots come first, then thread 1's, and so on.
    /// Nothing is modified when an error is returned.
    ///
    /// # Errors
    /// [`GroupError::OffsetOverflow`] if the final size does not fit in `S`
    /// (or in `usize`), [`GroupError::Alloc`] if `data` cannot grow to it.
    pub fn init_storage(&mut self) -> Result<(), GroupError>
    where
        V: Default,
    {
        debug_assert_eq!(self.phase, Phase::Budget, "init_storage called twice");
        let rows = self.table.rows_mut();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let base = self.ptr.last().copied().unwrap_or(S::ZERO);
        let base_us = base.to_usize();

        // Every cursor and offset written below is at most `total`.
        let mut added = 0usize;
        for &budget in rows.iter().flatten() {
            added = added
                .checked_add(budget.to_usize())
                .ok_or(GroupError::OffsetOverflow)?;
        }
        let total = base_us.checked_add(added).ok_or(GroupError::OffsetOverflow)?;
        S::try_from_usize(total).ok_or(GroupError::OffsetOverflow)?;
        if total > self.data.len() {
            self.data.try_reserve_exact(total - self.data.len())?;
        }

        if self.ptr.len() < width + 1 {
            self.ptr.resize(width + 1, base);
        }
        let mut count = 0usize;
        for i in 0..self.ptr.len() - 1 {
            for row in rows.iter_mut() {
                if let Some(cell) = row.get_mut(i) {
                    let budget = cell.to_usize();
                    *cell = S::from_usize(count + base_us);
                    count += budget;
                }
            }
            self.ptr[i + 1] += S::from_usize(count);
        }
        debug_assert_eq!(self.ptr[self.ptr.len() - 1].to_usize(), total);

        self.data.resize_with(total, V::default);
        self.phase = Phase::Fill;

        debug!(
            "grouped storage ready: {} keys, {} threads, base {}, {} values ({} new)",
            self.ptr.len() - 1,
            rows.len(),
            base_us,
            total,
            count
        );
        Ok(())
    }

    /// Step 4: write `value` into the next slot of `threadid` for `key`.
    ///
    /// Calls must match the budgets declared in step 2 exactly. Overruns hit
    /// another thread's slot or panic on the bounds check of `data`.
    #[inline]
    pub fn push(&mut self, key: usize, value: V, threadid: usize) {
        debug_assert_eq!(self.phase, Phase::Fill, "push before init_storage");
        let cell = &mut self.table.rows_mut()[threadid][key];
        self.data[cell.to_usize()] = value;
        *cell += S::ONE;
    }

    /// Split into one writer per thread for a parallel fill pass. Writers are
    /// returned in thread order.
    pub fn fill_writers(&mut self) -> Vec<FillWriter<'_, V, S>> {
        debug_assert_eq!(self.phase, Phase::Fill, "fill_writers before init_storage");
        let data = self.data.as_mut_ptr();
        let len = self.data.len();
        self.table
            .rows_mut()
            .iter_mut()
            .enumerate()
            .map(|(threadid, row)| FillWriter {
                threadid,
                cursors: row.as_mut_slice(),
                data,
                len,
                _data: PhantomData,
            })
            .collect()
    }
}

/// Exclusive view of one thread's budget row.
#[derive(Debug)]
pub struct BudgetRow<'b, S> {
    threadid: usize,
    row: &'b mut Vec<S>,
}

impl<S: Offset> BudgetRow<'_, S> {
    #[inline]
    #[must_use]
    pub const fn threadid(&self) -> usize {
        self.threadid
    }

    /// # Errors
    /// Same as [`ParallelGroupBuilder::add_budget`].
    #[inline]
    pub fn add(&mut self, key: usize, nelem: S) -> Result<(), GroupError> {
        grow_and_add(self.row, key, nelem)
    }

    /// # Errors
    /// Same as [`ParallelGroupBuilder::add_budget`].
    #[inline]
    pub fn add_one(&mut self, key: usize) -> Result<(), GroupError> {
        grow_and_add(self.row, key, S::ONE)
    }

    #[inline]
    #[must_use]
    pub fn counts(&self) -> &[S] {
        &self.row[..]
    }
}

/// One thread's cursors plus a shared view of `data`.
///
/// Writers of different threads touch disjoint slots of `data`, so they can
/// be moved to and used from different threads at the same time.
#[derive(Debug)]
pub struct FillWriter<'b, V, S> {
    threadid: usize,
    cursors: &'b mut [S],
    data: *mut V,
    len: usize,
    _data: PhantomData<&'b mut [V]>,
}

// SAFETY: each writer only writes through its own cursors, and the cursor
// ranges of distinct threads are disjoint after `init_storage`.
unsafe impl<V: Send, S: Send> Send for FillWriter<'_, V, S> {}

impl<V, S: Offset> FillWriter<'_, V, S> {
    #[inline]
    #[must_use]
    pub const fn threadid(&self) -> usize {
        self.threadid
    }

    #[inline]
    #[must_use]
    pub fn cursors(&self) -> &[S] {
        &*self.cursors
    }

    /// Write `value` into this thread's next slot for `key`.
    ///
    /// # Safety
    /// This thread must have budgeted `key`, and the number of pushes for
    /// `key` must not exceed that budget. Otherwise the write lands in another
    /// thread's slot (a data race) or outside `data`.
    #[inline]
    pub unsafe fn push(&mut self, key: usize, value: V) {
        debug_assert!(key < self.cursors.len(), "key {key} was never budgeted");
        let cell = unsafe { self.cursors.get_unchecked_mut(key) };
        let pos = cell.to_usize();
        debug_assert!(pos < self.len, "push past the end of data");
        unsafe {
            *self.data.add(pos) = value;
        }
        *cell += S::ONE;
    }
}
