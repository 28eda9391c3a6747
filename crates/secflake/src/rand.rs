use rand::{Rng, rng};

/// A trait for random sources that return random integers.
///
/// Creators draw from it once, to self-assign an instance ID when none was
/// given. Tests plug in a fixed source to keep that deterministic.
///
/// # Example
/// ```
/// use secflake::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn rand(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedRand.rand(), 1234);
/// ```
pub trait RandSource {
    /// Returns a random integer.
    fn rand(&self) -> u64;
}

impl<R: RandSource + ?Sized> RandSource for &R {
    fn rand(&self) -> u64 {
        (**self).rand()
    }
}

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This type does not store the RNG; it reaches for the calling thread's
/// generator on each call, so it is freely `Send` and `Sync`.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
