use crate::{DEFAULT_SEQUENCE_BITS, Layout, MAX_INSTANCE_ID, RandSource};

/// Construction parameters for an [`IdCreator`](crate::IdCreator).
///
/// Every value is accepted; out-of-range input is normalized when the creator
/// is built, never rejected:
///
/// - `instance_id < 0` self-assigns a random instance ID in `0..=1023`,
///   otherwise the value is reduced modulo 1024.
/// - `sequence_bits` is clamped to `1..=32`.
/// - `initial_timestamp` (epoch seconds) is the floor the creator starts from.
///
/// # Restarts
///
/// A creator that issued IDs ahead of real time (after bursts above its
/// per-second capacity) and then restarts with the same instance ID may
/// repeat IDs unless `initial_timestamp` is set above the last timestamp it
/// used. See [`IdCreator::current_timestamp`](crate::IdCreator::current_timestamp).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CreatorConfig {
    pub instance_id: i64,
    pub sequence_bits: i32,
    pub initial_timestamp: u64,
}

impl Default for CreatorConfig {
    /// A randomly assigned instance ID, 16 sequence bits and no timestamp
    /// floor.
    fn default() -> Self {
        Self {
            instance_id: -1,
            sequence_bits: i32::from(DEFAULT_SEQUENCE_BITS),
            initial_timestamp: 0,
        }
    }
}

impl CreatorConfig {
    pub const fn new(instance_id: i64, sequence_bits: i32, initial_timestamp: u64) -> Self {
        Self {
            instance_id,
            sequence_bits,
            initial_timestamp,
        }
    }

    #[must_use]
    pub const fn with_instance_id(mut self, instance_id: i64) -> Self {
        self.instance_id = instance_id;
        self
    }

    #[must_use]
    pub const fn with_sequence_bits(mut self, sequence_bits: i32) -> Self {
        self.sequence_bits = sequence_bits;
        self
    }

    #[must_use]
    pub const fn with_initial_timestamp(mut self, initial_timestamp: u64) -> Self {
        self.initial_timestamp = initial_timestamp;
        self
    }

    /// The normalized layout for `sequence_bits`.
    pub const fn layout(&self) -> Layout {
        Layout::new(self.sequence_bits)
    }

    /// The normalized instance ID, drawing from `rand` when unassigned.
    pub fn resolve_instance_id(&self, rand: &impl RandSource) -> u16 {
        normalize_instance_id(self.instance_id, rand)
    }
}

/// Maps any integer onto `0..=1023`: negative values pick a random ID,
/// anything else is taken modulo 1024.
pub fn normalize_instance_id(instance_id: i64, rand: &impl RandSource) -> u16 {
    let modulus = u64::from(MAX_INSTANCE_ID) + 1;
    let raw = u64::try_from(instance_id).unwrap_or_else(|_| rand.rand());
    // Lossless: the remainder is below 1024.
    (raw % modulus) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRand(u64);

    impl RandSource for FixedRand {
        fn rand(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn non_negative_ids_wrap_at_1024() {
        let rand = FixedRand(0);
        assert_eq!(normalize_instance_id(0, &rand), 0);
        assert_eq!(normalize_instance_id(5, &rand), 5);
        assert_eq!(normalize_instance_id(1023, &rand), 1023);
        assert_eq!(normalize_instance_id(1024, &rand), 0);
        assert_eq!(normalize_instance_id(2047, &rand), 1023);
        assert_eq!(normalize_instance_id(i64::MAX, &rand), 1023);
    }

    #[test]
    fn negative_ids_draw_from_rand() {
        assert_eq!(normalize_instance_id(-1, &FixedRand(7)), 7);
        assert_eq!(normalize_instance_id(-1, &FixedRand(1024 + 9)), 9);
        assert_eq!(normalize_instance_id(i64::MIN, &FixedRand(u64::MAX)), 1023);
    }

    #[test]
    fn explicit_ids_ignore_rand() {
        let config = CreatorConfig::default().with_instance_id(42);
        assert_eq!(config.resolve_instance_id(&FixedRand(999)), 42);
    }

    #[test]
    fn default_config() {
        let config = CreatorConfig::default();
        assert_eq!(config.instance_id, -1);
        assert_eq!(config.sequence_bits, 16);
        assert_eq!(config.initial_timestamp, 0);
        assert_eq!(config.layout(), Layout::default());
    }

    #[test]
    fn setters_chain() {
        let config = CreatorConfig::default()
            .with_instance_id(3)
            .with_sequence_bits(40)
            .with_initial_timestamp(1_000);
        assert_eq!(config, CreatorConfig::new(3, 40, 1_000));
        assert_eq!(config.layout().sequence_bits(), 32);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_partial_config() {
        let config: CreatorConfig =
            serde_json::from_str(r#"{ "instance_id": 12, "sequence_bits": 64 }"#).unwrap();
        assert_eq!(config, CreatorConfig::new(12, 64, 0));
        assert_eq!(config.layout().sequence_bits(), 32);

        let empty: CreatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, CreatorConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_round_trip() {
        let config = CreatorConfig::new(-1, 12, 1_700_000_000);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"instance_id":-1,"sequence_bits":12,"initial_timestamp":1700000000}"#
        );
        assert_eq!(serde_json::from_str::<CreatorConfig>(&json).unwrap(), config);
    }
}
