//! The process-wide default creator.

use std::sync::OnceLock;

use crate::IdCreator;

impl IdCreator {
    /// Returns the process-wide creator, building it on first use.
    ///
    /// It has a randomly assigned instance ID, 16 sequence bits and no
    /// timestamp floor. Every caller in the process shares its counter, and it
    /// lives until the process exits.
    ///
    /// # Example
    /// ```
    /// use secflake::IdCreator;
    ///
    /// let creator = IdCreator::global();
    /// assert_eq!(creator.sequence_bits(), 16);
    /// assert!(std::ptr::eq(creator, IdCreator::global()));
    /// ```
    pub fn global() -> &'static IdCreator {
        static GLOBAL: OnceLock<IdCreator> = OnceLock::new();
        GLOBAL.get_or_init(IdCreator::default)
    }
}

/// Issues an ID from the process-wide creator.
///
/// ```
/// let a = secflake::create_id();
/// let b = secflake::create_id();
/// assert!(a < b);
/// ```
pub fn create_id() -> u64 {
    IdCreator::global().create()
}
