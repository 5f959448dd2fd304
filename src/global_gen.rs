//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use chrono::{DateTime, TimeZone};

use crate::{Comb, Result};
use inner::GlobalGenInner;

/// Returns the lock handle of process-wide global generator, creating one if none exists.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .expect("combid: could not lock global generator")
}

/// Generates a COMB object from the current system time.
///
/// This function employs a global generator seeded from the operating system. On Unix, this
/// function reseeds the generator when the process ID changes (i.e., upon process forks) to
/// prevent collisions across processes.
///
/// # Examples
///
/// ```rust
/// let comb = combid::comb();
/// println!("{}", comb); // e.g., "2f1a0000-350b-5b40-bfaa-7b4a11c7ae4b"
/// println!("{:?}", comb.timestamp());
///
/// let comb_string: String = combid::comb().to_string();
/// ```
pub fn comb() -> Comb {
    lock_global_gen().get_mut().generate()
}

/// Generates a COMB object from the timestamp passed using the global generator.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`](crate::Error::OutOfRange) if `ts` lies outside
/// `MIN_DATE..=MAX_DATE`.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let x = combid::comb_at(&ts)?;
/// let y = combid::comb_at(&(ts + chrono::TimeDelta::seconds(1)))?;
/// assert!(x < y);
/// assert_eq!(x.timestamp(), ts);
/// # Ok::<(), combid::Error>(())
/// ```
pub fn comb_at<Tz: TimeZone>(ts: &DateTime<Tz>) -> Result<Comb> {
    lock_global_gen().get_mut().generate_at(ts)
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Core;

    use crate::generator::{CombGenerator, RandSource};

    /// The random number generator of the global generator.
    ///
    /// The global generator currently employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to
    /// emulate the strategy used by [`rand::rngs::ThreadRng`].
    pub struct GlobalGenRng(ReseedingRng<ChaCha12Core, OsRng>);

    impl RandSource for GlobalGenRng {
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            rand::RngCore::fill_bytes(&mut self.0, dest);
        }
    }

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: CombGenerator<GlobalGenRng>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            let core = ChaCha12Core::from_rng(OsRng)
                .expect("combid: could not initialize global generator");
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: CombGenerator::new(GlobalGenRng(ReseedingRng::new(
                    core,
                    1024 * 64,
                    OsRng,
                ))),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner [`CombGenerator`] instance, reseeding the
        /// generator on Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut CombGenerator<GlobalGenRng> {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}
