//! COMB generator and related types.

use chrono::{DateTime, TimeZone, Utc};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Comb, Result};

pub mod with_rand08;

/// A trait that defines the minimum random number generator interface for [`CombGenerator`].
pub trait RandSource {
    /// Fills `dest` with random data.
    fn fill_bytes(&mut self, dest: &mut [u8]);
}

/// Represents a COMB generator that fills the non-timestamp bytes of each COMB from a random
/// number generator.
///
/// Generation is stateless apart from the random number generator, so two COMBs generated for the
/// same accuracy unit (1/300 millisecond) are ordered by their random bytes only. The following
/// example shares one generator across threads.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use combid::CombGenerator;
///
/// let g = sync::Arc::new(sync::Mutex::new(CombGenerator::with_rand08(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct CombGenerator<R> {
    /// The random number generator used by the generator.
    rng: R,
}

impl<R: RandSource> CombGenerator<R> {
    /// Creates a generator instance.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates a new COMB object from the current system time.
    ///
    /// # Panics
    ///
    /// Panics if the system clock reports a time outside `MIN_DATE..=MAX_DATE`.
    pub fn generate(&mut self) -> Comb {
        self.generate_at(&Utc::now())
            .expect("combid: system clock out of range")
    }

    /// Generates a new COMB object from the timestamp passed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`](crate::Error::OutOfRange) if `ts` lies outside
    /// `MIN_DATE..=MAX_DATE`.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_at<Tz: TimeZone>(&mut self, ts: &DateTime<Tz>) -> Result<Comb> {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        Comb::embed(bytes, ts)
    }
}

/// Supports operations as an infinite iterator that produces a new COMB object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use combid::CombGenerator;
///
/// CombGenerator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
impl<R: RandSource> Iterator for CombGenerator<R> {
    type Item = Comb;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource> std::iter::FusedIterator for CombGenerator<R> {}
