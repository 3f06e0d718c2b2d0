//! Integer types usable as offsets in `ptr` and in the per-thread cursor rows.

use core::fmt::Debug;
use core::ops::AddAssign;

/// An index-range holder: the element type of the offset array and of the
/// per-thread budget/cursor rows.
///
/// `to_usize`/`from_usize` are unchecked in release builds and only used on
/// values already validated with `try_from_usize` or `add_checked`.
pub trait Offset: Copy + Default + Ord + Debug + AddAssign + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;

    fn to_usize(self) -> usize;
    fn from_usize(x: usize) -> Self;
    /// `None` if `x` is not representable.
    fn try_from_usize(x: usize) -> Option<Self>;
    /// `None` on overflow.
    fn add_checked(self, rhs: Self) -> Option<Self>;
}

impl Offset for usize {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    #[inline]
    fn to_usize(self) -> usize {
        self
    }

    #[inline]
    fn from_usize(x: usize) -> Self {
        x
    }

    #[inline]
    fn try_from_usize(x: usize) -> Option<Self> {
        Some(x)
    }

    #[inline]
    fn add_checked(self, rhs: Self) -> Option<Self> {
        usize::checked_add(self, rhs)
    }
}

impl Offset for u64 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    #[inline]
    fn to_usize(self) -> usize {
        debug_assert!(usize::try_from(self).is_ok(), "offset must fit in usize");
        #[allow(clippy::cast_possible_truncation)]
        {
            self as usize
        }
    }

    #[inline]
    fn from_usize(x: usize) -> Self {
        x as u64
    }

    #[inline]
    fn try_from_usize(x: usize) -> Option<Self> {
        u64::try_from(x).ok()
    }

    #[inline]
    fn add_checked(self, rhs: Self) -> Option<Self> {
        u64::checked_add(self, rhs)
    }
}

impl Offset for u32 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_usize(x: usize) -> Self {
        debug_assert!(u32::try_from(x).is_ok(), "offset must fit in u32");
        #[allow(clippy::cast_possible_truncation)]
        {
            x as u32
        }
    }

    #[inline]
    fn try_from_usize(x: usize) -> Option<Self> {
        u32::try_from(x).ok()
    }

    #[inline]
    fn add_checked(self, rhs: Self) -> Option<Self> {
        u32::checked_add(self, rhs)
    }
}

impl Offset for i64 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    #[inline]
    fn to_usize(self) -> usize {
        debug_assert!(self >= 0, "offset must be non-negative");
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        {
            self as usize
        }
    }

    #[inline]
    fn from_usize(x: usize) -> Self {
        debug_assert!(i64::try_from(x).is_ok(), "offset must fit in i64");
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        {
            x as i64
        }
    }

    #[inline]
    fn try_from_usize(x: usize) -> Option<Self> {
        i64::try_from(x).ok()
    }

    #[inline]
    fn add_checked(self, rhs: Self) -> Option<Self> {
        i64::checked_add(self, rhs)
    }
}
