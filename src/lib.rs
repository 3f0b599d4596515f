//! An implementation of RFC 4122 UUID version 1 with randomized node identifiers
//!
//! ```rust
//! use uuid1::V1Generator;
//!
//! let g = V1Generator::new()?;
//! let uuid = g.generate();
//! println!("{}", uuid); // e.g., "f254df4a-184c-1019-80a4-c61cd00a6899"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! # Ok::<(), uuid1::Error>(())
//! ```
//!
//! With the default `global_gen` feature, [`uuid1()`] and [`uuid1_crypto()`] generate from a
//! process-wide generator instead.
//!
//! See [RFC 4122](https://www.rfc-editor.org/rfc/rfc4122).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           time_low                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           time_mid            |  ver  |        time_hi        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! | var |        clock_seq        |instance_id|L|M|  instance_id  |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          instance_id          |           node_rand           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 60-bit `time_low`, `time_mid`, and `time_hi` fields together hold the number of
//!   100-nanosecond intervals since 1582-10-15T00:00:00Z.
//! - The 4-bit `ver` field is set at `0001`.
//! - The 3-bit `var` field is set at `100`.
//! - The 13-bit `clock_seq` field is a counter incremented on every call of
//!   [`uuid1()`], or a cryptographically strong random number for [`uuid1_crypto()`].
//! - The 48-bit node consists of a 30-bit `instance_id` that is random at startup and can be
//!   fixed with [`set_instance_id()`], the `L`ocal and `M`ulticast bits that are always set so
//!   the node never resembles a real IEEE 802 address, and a 16-bit `node_rand`.
//! - `node_rand` is replaced by a non-cryptographic PRNG whenever `clock_seq` rolls over in
//!   [`uuid1()`], and by a cryptographically strong random number on every call of
//!   [`uuid1_crypto()`].
//!
//! Uniqueness across processes relies solely on each process's randomly initialized node, so
//! processes that must never collide should be given distinct instance ids.
//!
//! # Other features
//!
//! Identifiers can be parsed leniently, with dashes allowed anywhere, and encoded with pluggable
//! [`encoding`] schemes:
//!
//! ```rust
//! use uuid1::{encoding::Base64Encoder, Uuid};
//!
//! let uuid = "f254df4a184c101980a4c61cd00a6899".parse::<Uuid>()?;
//! assert_eq!(uuid.to_string(), "f254df4a-184c-1019-80a4-c61cd00a6899");
//! assert_eq!(uuid.encode_to_string_with(&Base64Encoder::url()), "8lTfShhMEBmApMYc0ApomQ");
//! # Ok::<(), uuid1::Error>(())
//! ```
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide default generator behind [`uuid1()`] and friends.
//! - `tracing`: emits spans and events through the `tracing` crate.
//!
//! Optional features:
//!
//! - `serde`: enables serialization and deserialization of [`Uuid`] via `serde`.
//! - `uuid`: enables conversion from/to the [`uuid::Uuid`] type.
//!
//! [`uuid::Uuid`]: https://docs.rs/uuid/1/uuid/struct.Uuid.html

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{Error, Result};

mod id;
pub use id::{Uuid, Variant};

pub mod encoding;

pub mod timestamp;

pub mod generator;
pub use generator::V1Generator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{instance_id, set_instance_id, uuid1, uuid1_crypto};
