//! Wraparound-safe millisecond arithmetic
//!
//! Timestamps are `u32` milliseconds from a monotonic clock and wrap after
//! ~49.7 days. Never compare raw timestamps with `<`/`>`; subtract first.

/// Milliseconds elapsed from `since` to `now`
#[inline]
pub fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Whether at least `duration_ms` has passed since `since`
#[inline]
pub fn has_elapsed(now: u32, since: u32, duration_ms: u32) -> bool {
    elapsed_ms(now, since) >= duration_ms
}

/// Whether `deadline` is at or before `now`
///
/// Valid as long as deadlines are less than 2^31 ms in the future.
#[inline]
pub fn deadline_reached(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}
