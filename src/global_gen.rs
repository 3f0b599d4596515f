//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Error, Uuid, V1Generator};

/// Returns the process-wide global generator, creating one if none exists.
///
/// # Panics
///
/// Panics on first use if the operating system cannot supply the initial random bytes, as no
/// identifier can be generated safely without them.
fn global_gen() -> &'static V1Generator {
    static G: sync::OnceLock<V1Generator> = sync::OnceLock::new();
    G.get_or_init(|| V1Generator::new().expect("uuid1: could not initialize global generator"))
}

/// Generates a UUIDv1 object by incrementing the clock sequence of the global generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid1::uuid1();
/// println!("{}", uuid); // e.g., "f254df4a-184c-1019-80a4-c61cd00a6899"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uuid1::uuid1().to_string();
/// ```
pub fn uuid1() -> Uuid {
    global_gen().generate()
}

/// Generates a UUIDv1 object with a cryptographic-quality random clock sequence and last 16 bits
/// of the node, using the global generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid1::uuid1_crypto();
/// assert_eq!(uuid.version(), 1);
/// ```
pub fn uuid1_crypto() -> Uuid {
    global_gen().generate_crypto()
}

/// Sets the 30-bit instance id of the global generator.
///
/// See [`V1Generator::set_instance_id`] for the description.
pub fn set_instance_id(value: u32) -> Result<(), Error> {
    global_gen().set_instance_id(value)
}

/// Returns the 30-bit instance id of the global generator.
pub fn instance_id() -> u32 {
    global_gen().instance_id()
}

#[cfg(test)]
mod tests_fast {
    use super::uuid1;
    use crate::Variant;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| uuid1().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-1[0-9a-f]{3}-[89][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_nanos() as i128;
            let timestamp = uuid1().unix_nanos();
            assert!((ts_now - timestamp).abs() < 16_000_000);
        }
    }

    /// Parses back what it formats
    #[test]
    fn parses_back_what_it_formats() {
        SAMPLES.with(|samples| {
            for e in samples.iter().take(1_000) {
                let parsed = e.parse::<crate::Uuid>().unwrap();
                assert_eq!(&parsed.to_string(), e);
                assert_eq!(e.replace('-', "").parse(), Ok(parsed));
            }
        });
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        for _ in 0..1_000 {
            let e = uuid1();
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), 1);
        }
    }

    /// Generates no IDs sharing same timestamp and clock sequence under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_clock_sequence_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(uuid1()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(e);
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}


#[cfg(test)]
mod tests_instance_id {
    use super::{instance_id, set_instance_id, uuid1, uuid1_crypto};
    use crate::Error;

    /// Applies instance id to subsequent UUIDs
    #[test]
    fn applies_instance_id_to_subsequent_uuids() {
        // the only test touching the global instance id
        assert_eq!(set_instance_id(0x1234_5678), Ok(()));
        assert_eq!(instance_id(), 0x1234_5678);
        assert_eq!(uuid1().node_id(), 0x1234_5678);
        assert_eq!(uuid1_crypto().node_id(), 0x1234_5678);

        assert_eq!(
            set_instance_id(0x8765_4321),
            Err(Error::TruncatedInstanceId { value: 0x8765_4321 })
        );
        assert_eq!(instance_id(), 0x0765_4321);
    }
}
