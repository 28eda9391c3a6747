#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use web_time::{SystemTime, UNIX_EPOCH};

/// A source of whole seconds since the Unix epoch.
///
/// This abstraction allows you to plug in the real wall clock or a mocked
/// time source in tests.
///
/// # Example
///
/// ```
/// use secflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_secs(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_secs(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in whole seconds since 1970-01-01 UTC.
    fn current_secs(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_secs(&self) -> u64 {
        (**self).current_secs()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_secs(&self) -> u64 {
        (**self).current_secs()
    }
}

/// The real-time (wall) clock.
///
/// Unlike a monotonic timer this follows system clock adjustments. A clock
/// that jumps backward is absorbed by the creator: it keeps issuing IDs on
/// its last used second until real time catches up.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_secs(&self) -> u64 {
        // A clock set before 1970 reads as the epoch itself.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.current_secs() > 1_577_836_800);
    }

    #[test]
    fn shared_clocks_delegate() {
        struct Fixed(u64);
        impl TimeSource for Fixed {
            fn current_secs(&self) -> u64 {
                self.0
            }
        }

        let clock = std::sync::Arc::new(Fixed(77));
        assert_eq!(clock.current_secs(), 77);
        assert_eq!((&Fixed(5)).current_secs(), 5);
    }
}
