use crate::{Error, Field, Result};

/// Number of bits reserved for the instance ID.
pub const INSTANCE_BITS: u8 = 10;

/// Largest instance ID that fits in [`INSTANCE_BITS`].
pub const MAX_INSTANCE_ID: u16 = (1 << INSTANCE_BITS) - 1;

/// Smallest accepted sequence width.
pub const MIN_SEQUENCE_BITS: u8 = 1;

/// Largest accepted sequence width.
pub const MAX_SEQUENCE_BITS: u8 = 32;

/// Sequence width used by the default creator: 65536 IDs per second.
pub const DEFAULT_SEQUENCE_BITS: u8 = 16;

/// Bits available below the always-zero sign bit.
const USABLE_BITS: u8 = 63;

/// Bits shared by the timestamp and the sequence.
const TIMESTAMP_AND_SEQUENCE_BITS: u8 = USABLE_BITS - INSTANCE_BITS;

/// The bit layout of an ID for a given sequence width.
///
/// ```text
///  Bit Index:  63    62 ........ 10+S   9+S ...... S    S-1 ..... 0
///              +----+-----------------+---------------+--------------+
///  Field:      | 0  | timestamp (53-S)| instance (10) | sequence (S) |
///              +----+-----------------+---------------+--------------+
///              |<----------- MSB ------- 64 bits ------ LSB -------->|
/// ```
///
/// A layout is always normalized: the sequence width lies in
/// [`MIN_SEQUENCE_BITS`]..=[`MAX_SEQUENCE_BITS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub struct Layout {
    sequence_bits: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            sequence_bits: DEFAULT_SEQUENCE_BITS,
        }
    }
}

impl Layout {
    /// Builds a layout, clamping `sequence_bits` to `1..=32`.
    ///
    /// ```
    /// use secflake::Layout;
    ///
    /// assert_eq!(Layout::new(0).sequence_bits(), 1);
    /// assert_eq!(Layout::new(64).sequence_bits(), 32);
    /// assert_eq!(Layout::new(12).max_sequence(), 4095);
    /// ```
    pub const fn new(sequence_bits: i32) -> Self {
        let sequence_bits = if sequence_bits < MIN_SEQUENCE_BITS as i32 {
            MIN_SEQUENCE_BITS
        } else if sequence_bits > MAX_SEQUENCE_BITS as i32 {
            MAX_SEQUENCE_BITS
        } else {
            sequence_bits as u8
        };
        Self { sequence_bits }
    }

    pub const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    pub const fn timestamp_bits(&self) -> u8 {
        TIMESTAMP_AND_SEQUENCE_BITS - self.sequence_bits
    }

    pub const fn instance_shift(&self) -> u8 {
        self.sequence_bits
    }

    pub const fn timestamp_shift(&self) -> u8 {
        INSTANCE_BITS + self.sequence_bits
    }

    /// Highest sequence value usable within one second.
    pub const fn max_sequence(&self) -> u64 {
        (1 << self.sequence_bits) - 1
    }

    /// Highest value the timestamp field can hold.
    pub const fn max_timestamp(&self) -> u64 {
        (1 << self.timestamp_bits()) - 1
    }

    /// Number of IDs one instance can issue per second before borrowing.
    pub const fn capacity_per_second(&self) -> u64 {
        1 << self.sequence_bits
    }

    /// Folds raw epoch seconds into the timestamp field's range.
    ///
    /// Once the field is exhausted the folded value restarts at zero. With the
    /// default 16-bit sequence that takes roughly 4000 years.
    pub const fn fold_timestamp(&self, epoch_secs: u64) -> u64 {
        epoch_secs % (self.max_timestamp() + 1)
    }

    /// Packs the three components into an ID.
    ///
    /// Each component is masked to its field width, so the result never has
    /// bit 63 set. Use [`Layout::try_compose`] to reject oversized input
    /// instead.
    pub const fn compose(&self, timestamp: u64, instance_id: u16, sequence: u64) -> u64 {
        let t = (timestamp & self.max_timestamp()) << self.timestamp_shift();
        let i = ((instance_id & MAX_INSTANCE_ID) as u64) << self.instance_shift();
        let s = sequence & self.max_sequence();
        t | i | s
    }

    /// Packs `parts`, failing if any component overflows its field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ComponentOverflow`] naming the first field that does
    /// not fit.
    pub fn try_compose(&self, parts: IdParts) -> Result<u64> {
        check(Field::Timestamp, parts.timestamp, self.max_timestamp())?;
        check(
            Field::InstanceId,
            u64::from(parts.instance_id),
            u64::from(MAX_INSTANCE_ID),
        )?;
        check(Field::Sequence, parts.sequence, self.max_sequence())?;
        Ok(self.compose(parts.timestamp, parts.instance_id, parts.sequence))
    }

    /// Splits an ID into its components. Bit 63 is ignored.
    pub const fn decompose(&self, id: u64) -> IdParts {
        IdParts {
            timestamp: (id >> self.timestamp_shift()) & self.max_timestamp(),
            instance_id: ((id >> self.instance_shift()) as u16) & MAX_INSTANCE_ID,
            sequence: id & self.max_sequence(),
        }
    }

    /// Splits a raw value into its components, rejecting anything with the
    /// sign bit set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignBitSet`] if bit 63 of `raw` is set.
    pub fn try_decompose(&self, raw: u64) -> Result<IdParts> {
        if raw >> USABLE_BITS != 0 {
            return Err(Error::SignBitSet { raw });
        }
        Ok(self.decompose(raw))
    }
}

fn check(field: Field, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(Error::ComponentOverflow { field, value, max });
    }
    Ok(())
}

impl From<u8> for Layout {
    fn from(sequence_bits: u8) -> Self {
        Self::new(i32::from(sequence_bits))
    }
}

impl From<Layout> for u8 {
    fn from(layout: Layout) -> Self {
        layout.sequence_bits
    }
}

/// The decoded components of an ID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdParts {
    /// Folded epoch seconds, or a borrowed future second.
    pub timestamp: u64,
    pub instance_id: u16,
    pub sequence: u64,
}
