//! UUIDv1 generator and related types.

use std::fmt;

use parking_lot::RwLock;
use rand::{
    rngs::{OsRng, SmallRng},
    CryptoRng, RngCore, SeedableRng,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{id::instance_id_from_clock_seq_and_node, timestamp, Error, Uuid};

mod entropy;
use entropy::EntropyPool;


/// Largest 13-bit clock sequence.
const MAX_CLOCK_SEQ: u16 = (1 << 13) - 1;

/// Mask of the 48-bit node field.
const NODE_MASK: u64 = (1 << 48) - 1;

/// Bits of the packed state kept when the clock sequence and random node bits are replaced: the
/// variant, the 30-bit instance id, and the 'local' and 'multicast' bits.
const KEEP_ON_REPACK: u64 = 0xe000_ffff_ffff_0000;

/// Bits of the packed state kept when the instance id is replaced: the variant, the clock
/// sequence, the 'local' and 'multicast' bits, and the random node bits.
const KEEP_ON_SET_INSTANCE_ID: u64 = 0xffff_0300_0000_ffff;

/// A trait that defines the minimum system clock interface for [`V1Generator`].
pub trait TimeSource {
    /// Returns the current Unix timestamp in nanoseconds, negative if before 1970.
    fn unix_ts_nanos(&self) -> i64;
}

/// The default [`TimeSource`] that reads the current time from [`std::time::SystemTime`].
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_nanos(&self) -> i64 {
        use std::time;
        match time::SystemTime::now().duration_since(time::UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_nanos() as i64,
            Err(err) => -(err.duration().as_nanos() as i64),
        }
    }
}

/// Represents a UUIDv1 generator that owns a clock sequence and a randomized node identifier.
///
/// The 48-bit node field never carries a hardware address: both its 'multicast' and 'local' bits
/// are set so that it cannot be confused with a real IEEE 802 address. Its first 30 bits form an
/// instance id that is random at construction and can be replaced with
/// [`set_instance_id`](V1Generator::set_instance_id); the last 16 bits churn to increase the
/// randomness of the UUIDs.
///
/// The generator comes with two methods that generate a UUIDv1:
///
/// | Flavor               | Clock sequence | Last 16 node bits                  |
/// | -------------------- | -------------- | ---------------------------------- |
/// | [`generate`]         | Incremented    | Refreshed by a PRNG upon rollover  |
/// | [`generate_crypto`]  | Random         | Random                             |
///
/// [`generate`] needs no system entropy after construction, while [`generate_crypto`] draws 32
/// random bits per call from a pool that is refilled from the cryptographic source.
///
/// All methods take `&self`; the state is guarded by a lock and the generator can be shared
/// across threads.
///
/// # Examples
///
/// ```rust
/// use std::{sync, thread};
/// use uuid1::V1Generator;
///
/// let g = sync::Arc::new(V1Generator::new()?);
/// g.set_instance_id(0x2a)?;
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 let uuid = g.generate();
///                 assert_eq!(uuid.node_id(), 0x2a);
///                 println!("{} by thread {}", uuid, i);
///             }
///         });
///     }
/// });
/// # Ok::<(), uuid1::Error>(())
/// ```
///
/// [`generate`]: V1Generator::generate
/// [`generate_crypto`]: V1Generator::generate_crypto
pub struct V1Generator<R = SmallRng, E = OsRng, T = StdSystemTime> {
    state: RwLock<State<R, E>>,
    time: T,
}

/// The lock-guarded part of [`V1Generator`].
struct State<R, E> {
    /// Variant (3 bits), clock sequence (13 bits), and node (48 bits), as laid out in octets 8-15.
    clock_seq_and_node: u64,
    clock_seq: u16,
    node_rand: u16,

    /// Non-cryptographic source for `node_rand` upon clock sequence rollover.
    rng: R,
    pool: EntropyPool<E>,
}

/// Debug output shows the instance id only; the random sources and the clock sequence would make
/// subsequent UUIDs predictable.
impl<R, E, T: fmt::Debug> fmt::Debug for V1Generator<R, E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("V1Generator")
            .field("instance_id", &self.instance_id())
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl V1Generator {
    /// Creates a generator instance seeded from the operating system's random source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyInitFailure`] if the operating system cannot supply the initial
    /// random bytes.
    pub fn new() -> Result<Self, Error> {
        Self::with_sources(OsRng, StdSystemTime)
    }
}

impl<R, E, T> V1Generator<R, E, T>
where
    R: RngCore + SeedableRng,
    E: RngCore + CryptoRng,
    T: TimeSource,
{
    /// Creates a generator instance with the specified entropy and time sources.
    ///
    /// Eight bytes are read from `entropy` to derive the variant, the initial clock sequence, and
    /// the initial node identifier. The non-cryptographic random number generator `R` is seeded
    /// with the same value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyInitFailure`] if `entropy` keeps failing to supply the initial
    /// random bytes.
    ///
    /// # Examples
    ///
    /// `R` appears in neither argument, so it has to be named explicitly:
    ///
    /// ```rust
    /// use rand::rngs::{OsRng, SmallRng};
    /// use uuid1::{generator::StdSystemTime, V1Generator};
    ///
    /// let g = V1Generator::<SmallRng, _, _>::with_sources(OsRng, StdSystemTime)?;
    /// assert_eq!(g.generate().version(), 1);
    /// # Ok::<(), uuid1::Error>(())
    /// ```
    pub fn with_sources(entropy: E, time: T) -> Result<Self, Error> {
        let mut pool = EntropyPool::new(entropy);
        let mut seed = pool.read_seed()?;

        // variant `100`
        seed[0] = (seed[0] & 0x1f) | 0x80;
        // 'local' and 'multicast' bits of the first node octet
        seed[2] |= 0x03;

        let clock_seq_and_node = u64::from_be_bytes(seed);
        Ok(Self {
            state: RwLock::new(State {
                clock_seq_and_node,
                clock_seq: (clock_seq_and_node >> 48) as u16 & MAX_CLOCK_SEQ,
                node_rand: clock_seq_and_node as u16,
                rng: R::seed_from_u64(clock_seq_and_node),
                pool,
            }),
            time,
        })
    }

    /// Generates a new UUIDv1 object from the current timestamp by incrementing the clock
    /// sequence.
    ///
    /// When the 13-bit clock sequence rolls over to zero, the last 16 bits of the node are
    /// replaced with a value from the non-cryptographic random number generator.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Uuid {
        let clock_seq_and_node = self.state.write().increment();
        self.build(clock_seq_and_node)
    }

    /// Generates a new UUIDv1 object from the current timestamp with a cryptographic-quality
    /// random clock sequence and last 16 bits of the node.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_crypto(&self) -> Uuid {
        let clock_seq_and_node = self.state.write().randomize();
        self.build(clock_seq_and_node)
    }

    /// Combines the current timestamp with a snapshot of the packed state taken under the lock.
    fn build(&self, clock_seq_and_node: u64) -> Uuid {
        let ticks = timestamp::from_unix_nanos(self.time.unix_ts_nanos()) & timestamp::MAX_TICKS;
        Uuid::from_fields_v1(
            ticks,
            (clock_seq_and_node >> 48) as u16 & MAX_CLOCK_SEQ,
            clock_seq_and_node & NODE_MASK,
        )
    }
}

impl<R, E, T> V1Generator<R, E, T> {
    /// Sets the 30-bit instance id embedded in the node of subsequently generated UUIDs.
    ///
    /// Any `u32` is accepted and the least significant 30 bits always take effect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedInstanceId`] if the discarded most significant 2 bits are
    /// non-zero. The truncated value has been applied even in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid1::{Error, V1Generator};
    ///
    /// let g = V1Generator::new()?;
    /// assert_eq!(
    ///     g.set_instance_id(0xc000_0123),
    ///     Err(Error::TruncatedInstanceId { value: 0xc000_0123 })
    /// );
    /// assert_eq!(g.instance_id(), 0x123);
    /// # Ok::<(), uuid1::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn set_instance_id(&self, value: u32) -> Result<(), Error> {
        let bits = ((value & 0x3f00_0000) << 2) | (value & 0x00ff_ffff);
        {
            let mut state = self.state.write();
            state.clock_seq_and_node =
                (state.clock_seq_and_node & KEEP_ON_SET_INSTANCE_ID) | (bits as u64) << 16;
        }

        if value >> 30 != 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(value, "discarded non-zero most significant 2 bits of instance id");
            return Err(Error::TruncatedInstanceId { value });
        }
        Ok(())
    }

    /// Returns the 30-bit instance id embedded in the node of generated UUIDs.
    pub fn instance_id(&self) -> u32 {
        instance_id_from_clock_seq_and_node(self.state.read().clock_seq_and_node)
    }
}

impl<R: RngCore, E: RngCore + CryptoRng> State<R, E> {
    /// Increments the clock sequence, refreshing the random node bits upon rollover, and returns
    /// the repacked state.
    fn increment(&mut self) -> u64 {
        self.clock_seq = (self.clock_seq + 1) & MAX_CLOCK_SEQ;
        if self.clock_seq == 0 {
            self.node_rand = self.rng.next_u32() as u16;
            #[cfg(feature = "tracing")]
            tracing::debug!(node_rand = self.node_rand, "clock sequence rolled over");
        }
        self.repack()
    }

    /// Replaces the clock sequence and the random node bits with 29 bits from the entropy pool
    /// and returns the repacked state.
    fn randomize(&mut self) -> u64 {
        let value = self.pool.next_u32();
        self.clock_seq = (value >> 16) as u16 & MAX_CLOCK_SEQ;
        self.node_rand = value as u16;
        self.repack()
    }

    fn repack(&mut self) -> u64 {
        self.clock_seq_and_node = (self.clock_seq_and_node & KEEP_ON_REPACK)
            | (self.clock_seq as u64) << 48
            | self.node_rand as u64;
        self.clock_seq_and_node
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv1 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use uuid1::V1Generator;
///
/// V1Generator::new()?
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// # Ok::<(), uuid1::Error>(())
/// ```
impl<R, E, T> Iterator for V1Generator<R, E, T>
where
    R: RngCore + SeedableRng,
    E: RngCore + CryptoRng,
    T: TimeSource,
{
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R, E, T> std::iter::FusedIterator for V1Generator<R, E, T>
where
    R: RngCore + SeedableRng,
    E: RngCore + CryptoRng,
    T: TimeSource,
{
}
