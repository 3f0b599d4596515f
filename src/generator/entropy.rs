//! Reusable buffer of cryptographic-quality random bytes.

use std::fmt;

use rand::{CryptoRng, RngCore};

use crate::Error;

/// Capacity of the pool in bytes.
pub(crate) const POOL_SIZE: usize = 256;

/// Number of attempts made to obtain the initial random state before giving up.
const MAX_INIT_ATTEMPTS: usize = 8;

/// A ring buffer refilled from a cryptographic random source and consumed four bytes at a time,
/// so that the source is queried once per `POOL_SIZE / 4` draws rather than on every draw.
pub(crate) struct EntropyPool<E> {
    buffer: [u8; POOL_SIZE],
    cursor: usize,
    source: E,
}

/// Shows the capacity only; the buffered bytes are the next outputs of the generator.
impl<E> fmt::Debug for EntropyPool<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntropyPool")
            .field("capacity", &POOL_SIZE)
            .finish_non_exhaustive()
    }
}

impl<E: RngCore + CryptoRng> EntropyPool<E> {
    /// Creates an empty pool that fills itself upon the first draw.
    pub fn new(source: E) -> Self {
        Self {
            buffer: [0; POOL_SIZE],
            cursor: POOL_SIZE,
            source,
        }
    }

    /// Reads eight bytes directly from the source, retrying a few times on failure.
    pub fn read_seed(&mut self) -> Result<[u8; 8], Error> {
        let mut seed = [0u8; 8];
        for _ in 0..MAX_INIT_ATTEMPTS {
            match self.source.try_fill_bytes(&mut seed) {
                Ok(()) => return Ok(seed),
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(error = %_err, "retrying initial entropy read");
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::error!(
            attempts = MAX_INIT_ATTEMPTS,
            "could not obtain initial random bytes"
        );
        Err(Error::EntropyInitFailure)
    }

    /// Returns the next four bytes of the pool as a big-endian `u32`.
    pub fn next_u32(&mut self) -> u32 {
        if self.cursor + 4 > POOL_SIZE {
            self.refill();
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.buffer[self.cursor..self.cursor + 4]);
        self.cursor += 4;
        u32::from_be_bytes(bytes)
    }

    /// Refills the whole buffer and rewinds the cursor.
    ///
    /// On failure the previous contents are kept and reused.
    fn refill(&mut self) {
        if let Err(_err) = self.source.try_fill_bytes(&mut self.buffer) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "could not refill entropy pool; reusing stale bytes");
        }
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{EntropyPool, POOL_SIZE};
    use crate::{generator::tests::CountingSource, Error};

    /// Consumes the pool four bytes at a time and refills once per pool size
    #[test]
    fn consumes_the_pool_four_bytes_at_a_time_and_refills_once_per_pool_size() {
        let mut pool = EntropyPool::new(CountingSource::new(usize::MAX));
        assert_eq!(pool.next_u32(), 0x0001_0203);
        assert_eq!(pool.next_u32(), 0x0405_0607);
        for _ in 2..POOL_SIZE / 4 {
            pool.next_u32();
        }
        assert_eq!(pool.source.calls, 1);

        // the counting source continues from 256 = 0 (mod 256)
        assert_eq!(pool.next_u32(), 0x0001_0203);
        assert_eq!(pool.source.calls, 2);
    }

    /// Reuses stale bytes when the source fails
    #[test]
    fn reuses_stale_bytes_when_the_source_fails() {
        let mut pool = EntropyPool::new(CountingSource::new(1));
        let first: Vec<u32> = (0..POOL_SIZE / 4).map(|_| pool.next_u32()).collect();
        let second: Vec<u32> = (0..POOL_SIZE / 4).map(|_| pool.next_u32()).collect();
        assert_eq!(first, second);
    }

    /// Hides the buffered bytes from debug output
    #[test]
    fn hides_the_buffered_bytes_from_debug_output() {
        let mut pool = EntropyPool::new(CountingSource::new(usize::MAX));
        assert_eq!(pool.next_u32(), 0x0001_0203);
        assert_eq!(format!("{:?}", pool), "EntropyPool { capacity: 256, .. }");
    }

    /// Reads a seed or reports failure after retrying
    #[test]
    fn reads_a_seed_or_reports_failure_after_retrying() {
        let mut pool = EntropyPool::new(CountingSource::new(1));
        assert_eq!(pool.read_seed(), Ok([0, 1, 2, 3, 4, 5, 6, 7]));
        assert_eq!(pool.read_seed(), Err(Error::EntropyInitFailure));
    }
}
