//! Run options for the grouping driver.

use rowgroup_core::GroupError;

/// Environment variable overriding the worker count of [`GroupOptions::from_env`].
pub const NUM_THREADS_ENV: &str = "ROWGROUP_NUM_THREADS";
/// Below this many records per worker, extra workers are not worth it.
pub const DEFAULT_MIN_SHARD_LEN: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOptions {
    /// Worker count; `None` uses rayon's current pool size.
    pub nthread: Option<usize>,
    /// Expected number of keys. Larger keys still work.
    pub nkeys_hint: usize,
    /// Minimum records per shard before another worker is added.
    pub min_shard_len: usize,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            nthread: None,
            nkeys_hint: 0,
            min_shard_len: DEFAULT_MIN_SHARD_LEN,
        }
    }
}

impl GroupOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the worker count taken from `ROWGROUP_NUM_THREADS` when
    /// it holds a positive integer. Rayon itself honours `RAYON_NUM_THREADS`.
    #[must_use]
    pub fn from_env() -> Self {
        let nthread = std::env::var(NUM_THREADS_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0);
        Self {
            nthread,
            ..Self::default()
        }
    }

    /// [`Self::from_env`], with an explicit worker count taking precedence.
    #[must_use]
    pub fn from_env_with(nthread: Option<usize>, nkeys_hint: usize) -> Self {
        let mut opts = Self::from_env().with_nkeys_hint(nkeys_hint);
        if nthread.is_some() {
            opts.nthread = nthread;
        }
        opts
    }

    #[must_use]
    pub const fn with_nthread(mut self, nthread: usize) -> Self {
        self.nthread = Some(nthread);
        self
    }

    #[must_use]
    pub const fn with_nkeys_hint(mut self, nkeys: usize) -> Self {
        self.nkeys_hint = nkeys;
        self
    }

    #[must_use]
    pub const fn with_min_shard_len(mut self, len: usize) -> Self {
        self.min_shard_len = len;
        self
    }

    /// Number of workers to use for `len` records: the configured count,
    /// capped so every shard holds at least `min_shard_len` records.
    ///
    /// # Errors
    /// [`GroupError::ZeroThreads`] if the configured count is zero.
    pub fn resolve_nthread(&self, len: usize) -> Result<usize, GroupError> {
        let nthread = self.nthread.unwrap_or_else(rayon::current_num_threads);
        if nthread == 0 {
            return Err(GroupError::ZeroThreads);
        }
        let cap = len.div_ceil(self.min_shard_len.max(1)).max(1);
        Ok(nthread.min(cap))
    }
}
