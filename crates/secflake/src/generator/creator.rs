use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[cfg(not(feature = "parking-lot"))]
use super::mutex::PoisonError;
use super::mutex::{Mutex, MutexGuard};
use crate::{CreatorConfig, Layout, RandSource, SystemClock, ThreadRandom, TimeSource};

/// The mutable half of a creator: the last used second and the next sequence
/// value within it.
#[derive(Debug)]
struct CreatorState {
    timestamp: u64,
    sequence: u64,
}

/// A lock-based ID creator suitable for multi-threaded environments.
///
/// The instance ID and layout are fixed at construction. The current
/// timestamp and sequence live behind one [`Mutex`] inside an [`Arc`], so a
/// creator can be shared by reference or cloned; clones draw from the same
/// counter.
///
/// ## Capacity
///
/// A creator issues up to `2^sequence_bits` IDs per second. Past that it
/// borrows the next second instead of blocking or failing, and keeps doing so
/// for as long as demand stays above capacity. Its timestamp then runs ahead
/// of real time and only re-joins the wall clock once real time overtakes it.
///
/// The folded clock wraps to zero every `2^(53 - sequence_bits)` seconds
/// (about 24 days at 32 sequence bits). A running creator does not follow it
/// back to zero. No folded reading is ever past the pre-wrap second, so the
/// creator stays there for good and only moves forward by borrowing once a
/// second fills up. A borrow past the field maximum masks the embedded
/// timestamp back to zero. Only a new creator starts on the wrapped value.
///
/// ## Restarts
///
/// State is not persisted. A restarted process reusing an instance ID should
/// pass an `initial_timestamp` above the last [`current_timestamp`] of its
/// predecessor, otherwise IDs issued in borrowed seconds may repeat.
///
/// [`current_timestamp`]: IdCreator::current_timestamp
#[derive(Clone, Debug)]
pub struct IdCreator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<CreatorState>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<CreatorState>>,
    instance_id: u16,
    layout: Layout,
    time: T,
}

impl IdCreator<SystemClock> {
    /// Creates a creator on the system clock.
    ///
    /// # Parameters
    ///
    /// - `instance_id`: negative to self-assign a random ID in `0..=1023`,
    ///   otherwise reduced modulo 1024.
    /// - `sequence_bits`: clamped to `1..=32`; sets the per-second capacity.
    /// - `initial_timestamp`: epoch seconds the creator starts from, `0` for
    ///   none.
    ///
    /// # Example
    /// ```
    /// use secflake::IdCreator;
    ///
    /// let creator = IdCreator::new(2047, 12, 0);
    /// assert_eq!(creator.instance_id(), 1023);
    ///
    /// let id = creator.create();
    /// assert_eq!(creator.layout().decompose(id).sequence, 0);
    /// ```
    pub fn new(instance_id: i64, sequence_bits: i32, initial_timestamp: u64) -> Self {
        Self::from_config(&CreatorConfig::new(
            instance_id,
            sequence_bits,
            initial_timestamp,
        ))
    }

    /// Creates a creator with 16 sequence bits and no timestamp floor.
    pub fn with_instance(instance_id: i64) -> Self {
        Self::from_config(&CreatorConfig::default().with_instance_id(instance_id))
    }

    /// Creates a creator on the system clock, drawing a random instance ID from
    /// the thread RNG when `config.instance_id` is negative.
    pub fn from_config(config: &CreatorConfig) -> Self {
        Self::with_sources(config, SystemClock, ThreadRandom)
    }
}

impl Default for IdCreator<SystemClock> {
    /// A randomly assigned instance ID and 16 sequence bits.
    fn default() -> Self {
        Self::from_config(&CreatorConfig::default())
    }
}

impl<T> IdCreator<T>
where
    T: TimeSource,
{
    /// Creates a creator reading seconds from `time`.
    ///
    /// `rand` is consulted once, and only when `config.instance_id` is
    /// negative.
    ///
    /// # Example
    /// ```
    /// use secflake::{CreatorConfig, IdCreator, IdParts, ThreadRandom, TimeSource};
    ///
    /// struct FixedTime;
    /// impl TimeSource for FixedTime {
    ///     fn current_secs(&self) -> u64 {
    ///         1000
    ///     }
    /// }
    ///
    /// let config = CreatorConfig::new(5, 4, 0);
    /// let creator = IdCreator::with_sources(&config, FixedTime, ThreadRandom);
    ///
    /// let parts = creator.layout().decompose(creator.create());
    /// assert_eq!(parts, IdParts { timestamp: 1000, instance_id: 5, sequence: 0 });
    /// ```
    pub fn with_sources(config: &CreatorConfig, time: T, rand: impl RandSource) -> Self {
        let instance_id = config.resolve_instance_id(&rand);
        let layout = config.layout();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            instance_id,
            sequence_bits = layout.sequence_bits(),
            initial_timestamp = config.initial_timestamp,
            "created id creator"
        );

        let state = Mutex::new(CreatorState {
            timestamp: config.initial_timestamp,
            sequence: 0,
        });
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(state)),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(state),
            instance_id,
            layout,
            time,
        }
    }

    /// Issues the next ID.
    ///
    /// The whole step, from reading the clock to bumping the sequence, runs
    /// under the creator's lock:
    ///
    /// 1. Read the clock and fold it into the timestamp field.
    /// 2. If it is past the current timestamp, adopt it and restart the
    ///    sequence at zero.
    /// 3. Otherwise stay on the current timestamp. If that second's sequence
    ///    is used up, move to the next second and restart at zero.
    /// 4. Pack timestamp, instance ID and sequence, then bump the sequence.
    ///
    /// Never blocks beyond the lock and never fails. IDs from one creator are
    /// unique and strictly increasing until the folded clock wraps; see the
    /// type-level docs for what happens after.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(instance_id = self.instance_id))
    )]
    pub fn create(&self) -> u64 {
        let mut state = self.lock();
        let now = self.layout.fold_timestamp(self.time.current_secs());

        if now > state.timestamp {
            state.timestamp = now;
            state.sequence = 0;
        } else {
            #[cfg(feature = "tracing")]
            if now < state.timestamp {
                tracing::trace!(now, timestamp = state.timestamp, "clock behind creator");
            }

            if state.sequence > self.layout.max_sequence() {
                state.timestamp = state.timestamp.wrapping_add(1);
                state.sequence = 0;

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    now,
                    timestamp = state.timestamp,
                    "sequence exhausted, borrowing next second"
                );
            }
        }

        let id = self
            .layout
            .compose(state.timestamp, self.instance_id, state.sequence);
        state.sequence += 1;
        id
    }

    /// The last timestamp used or borrowed, not the wall clock.
    ///
    /// This is a snapshot; concurrent calls to [`IdCreator::create`] may move
    /// it forward immediately after it is read.
    pub fn current_timestamp(&self) -> u64 {
        self.lock().timestamp
    }

    /// The sequence value the next ID would carry if issued in the current
    /// second. Exceeds [`Layout::max_sequence`] once that second is used up.
    pub fn current_sequence(&self) -> u64 {
        self.lock().sequence
    }

    /// The normalized instance ID, in `0..=1023`.
    pub fn instance_id(&self) -> u16 {
        self.instance_id
    }

    /// The clamped sequence width, in `1..=32`.
    pub fn sequence_bits(&self) -> u8 {
        self.layout.sequence_bits()
    }

    /// The bit layout of every ID this creator issues.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn lock(&self) -> MutexGuard<'_, CreatorState> {
        #[cfg(feature = "parking-lot")]
        {
            self.state.lock()
        }
        // State is only written after every fallible step, so a guard
        // recovered from a panicked holder is still consistent.
        #[cfg(not(feature = "parking-lot"))]
        {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}
