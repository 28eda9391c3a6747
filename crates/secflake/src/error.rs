use core::fmt;

/// A result type that defaults to this crate's [`Error`].
///
/// ID generation itself is infallible. Only the checked packing helpers on
/// [`Layout`](crate::Layout) return errors.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Identifies one of the three packed fields of an ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Timestamp,
    InstanceId,
    Sequence,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timestamp => "timestamp",
            Self::InstanceId => "instance id",
            Self::Sequence => "sequence",
        };
        f.write_str(name)
    }
}

/// All error variants that `secflake` can emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A component does not fit in its field for the active layout.
    #[error("{field} {value} exceeds the field maximum {max}")]
    ComponentOverflow { field: Field, value: u64, max: u64 },

    /// The raw value has bit 63 set and cannot have come from a creator.
    #[error("raw id {raw:#x} has the sign bit set")]
    SignBitSet { raw: u64 },
}
