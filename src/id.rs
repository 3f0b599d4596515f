use std::{fmt, str};

use fstr::FStr;

use crate::{
    encoding::{Encoder, EncoderToString},
    timestamp, Error,
};

/// Represents a Universally Unique IDentifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates an object by copying a byte slice that must be exactly 16 bytes long.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid1::{Error, Uuid};
    ///
    /// let bytes = [0xf2, 0x54, 0xdf, 0x4a, 0x18, 0x4c, 0x10, 0x19,
    ///              0x80, 0xa4, 0xc6, 0x1c, 0xd0, 0x0a, 0x68, 0x99];
    /// let x = Uuid::from_slice(&bytes)?;
    /// assert_eq!(x.as_bytes(), &bytes);
    ///
    /// assert_eq!(Uuid::from_slice(&bytes[1..]), Err(Error::InvalidLength { len: 15 }));
    /// # Ok::<(), uuid1::Error>(())
    /// ```
    pub fn from_slice(src: &[u8]) -> Result<Self, Error> {
        <[u8; 16]>::try_from(src)
            .map(Self)
            .map_err(|_| Error::InvalidLength { len: src.len() })
    }

    /// Creates a UUID byte array from UUIDv1 field values.
    ///
    /// `ticks` is the 60-bit Gregorian-epoch timestamp, `clock_seq` the 13-bit clock sequence, and
    /// `node` the 48-bit node identifier. The version and variant bits are filled in.
    ///
    /// # Panics
    ///
    /// Panics if any argument is out of its field's range.
    pub const fn from_fields_v1(ticks: u64, clock_seq: u16, node: u64) -> Self {
        if ticks >= 1 << 60 || clock_seq >= 1 << 13 || node >= 1 << 48 {
            panic!("invalid field value");
        }

        Self([
            (ticks >> 24) as u8,
            (ticks >> 16) as u8,
            (ticks >> 8) as u8,
            ticks as u8,
            (ticks >> 40) as u8,
            (ticks >> 32) as u8,
            0x10 | (ticks >> 56) as u8,
            (ticks >> 48) as u8,
            0x80 | (clock_seq >> 8) as u8,
            clock_seq as u8,
            (node >> 40) as u8,
            (node >> 32) as u8,
            (node >> 24) as u8,
            (node >> 16) as u8,
            (node >> 8) as u8,
            node as u8,
        ])
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type.
    ///
    /// Use the [`fmt::Display`] trait usually to get the canonical hexadecimal string
    /// representation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid1::Uuid;
    ///
    /// let x = "f254df4a-184c-1019-80a4-c61cd00a6899".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(y.as_str(), "f254df4a-184c-1019-80a4-c61cd00a6899");
    /// assert_eq!(format!("{}", y), "f254df4a-184c-1019-80a4-c61cd00a6899");
    /// # Ok::<(), uuid1::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for (i, e) in self.0.iter().enumerate() {
            let [hi, lo] = hex_digits(*e);
            *buf_iter.next().unwrap() = hi;
            *buf_iter.next().unwrap() = lo;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                *buf_iter.next().unwrap() = b'-';
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII code points
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Returns the 32-digit hexadecimal string representation without dashes.
    pub fn hex(&self) -> FStr<32> {
        let mut buffer = [0u8; 32];
        for (dst, e) in buffer.chunks_exact_mut(2).zip(self.0) {
            dst.copy_from_slice(&hex_digits(e));
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII code points
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Encodes the 16 raw bytes with a byte-oriented [`Encoder`].
    pub fn encode_with<E: Encoder + ?Sized>(&self, encoder: &E) -> Vec<u8> {
        encoder.encode(&self.0)
    }

    /// Encodes the 16 raw bytes with a string-oriented [`EncoderToString`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid1::{encoding::Base64Encoder, Uuid};
    ///
    /// let x = "f254df4a-184c-1019-80a4-c61cd00a6899".parse::<Uuid>()?;
    /// assert_eq!(x.encode_to_string_with(&Base64Encoder::url()), "8lTfShhMEBmApMYc0ApomQ");
    /// # Ok::<(), uuid1::Error>(())
    /// ```
    pub fn encode_to_string_with<E: EncoderToString + ?Sized>(&self, encoder: &E) -> String {
        encoder.encode_to_string(&self.0)
    }

    /// Returns the 30-bit instance id embedded in the node field.
    ///
    /// The node field reserves its first octet's two least significant bits for the 'multicast'
    /// and 'local' flags and its last 16 bits for randomness, so the instance id is the remaining
    /// 6 + 24 bits.
    pub const fn node_id(&self) -> u32 {
        let b = &self.0;
        instance_id_from_clock_seq_and_node(u64::from_be_bytes([
            b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15],
        ]))
    }

    /// Returns the 60-bit timestamp in 100-nanosecond ticks since the Gregorian epoch.
    pub const fn gregorian_ticks(&self) -> u64 {
        let b = &self.0;
        let time_low = u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as u64;
        let time_mid = u16::from_be_bytes([b[4], b[5]]) as u64;
        let time_hi = (u16::from_be_bytes([b[6], b[7]]) & 0x0fff) as u64;
        time_low | time_mid << 32 | time_hi << 48
    }

    /// Returns the timestamp as nanoseconds since the Unix epoch.
    ///
    /// The result is always a multiple of 100 and is negative for timestamps before 1970.
    pub const fn unix_nanos(&self) -> i128 {
        timestamp::to_unix_nanos(self.gregorian_ticks())
    }

    /// Returns the timestamp as a UTC calendar time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid1::Uuid;
    ///
    /// let x = "13814000-1dd2-11b2-8000-000000000000".parse::<Uuid>()?;
    /// assert_eq!(x.time().to_rfc3339(), "1970-01-01T00:00:00+00:00");
    /// # Ok::<(), uuid1::Error>(())
    /// ```
    pub fn time(&self) -> chrono::DateTime<chrono::Utc> {
        const NANOS_PER_SEC: i128 = 1_000_000_000;
        let nanos = self.unix_nanos();
        chrono::DateTime::from_timestamp(
            nanos.div_euclid(NANOS_PER_SEC) as i64,
            nanos.rem_euclid(NANOS_PER_SEC) as u32,
        )
        .expect("60-bit timestamps always fall in the range of chrono")
    }

    /// Returns the version field (the most significant 4 bits of octet 6).
    pub const fn version(&self) -> u8 {
        self.0[6] >> 4
    }

    /// Returns the variant field (the most significant 3 bits of octet 8).
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 5 {
            0b000..=0b011 => Variant::Var0,
            0b100..=0b101 => Variant::Var10,
            0b110 => Variant::Var110,
            _ => Variant::Var111,
        }
    }
}

/// Extracts the 30-bit instance id from the clock sequence and node octets packed into a `u64`.
pub(crate) const fn instance_id_from_clock_seq_and_node(clock_seq_and_node: u64) -> u32 {
    let node_id = clock_seq_and_node >> 16;
    ((node_id & 0x00ff_ffff) | ((node_id & 0xfc00_0000) >> 2)) as u32
}

const fn hex_digits(e: u8) -> [u8; 2] {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    [DIGITS[(e >> 4) as usize], DIGITS[(e & 15) as usize]]
}

/// The variant field of a UUID as interpreted per RFC 4122.
///
/// Casting with `as u8` yields the numeric code of each variant.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum Variant {
    /// `0xx`: reserved, NCS backward compatibility.
    Var0 = 0,

    /// `10x`: the variant specified in RFC 4122.
    Var10 = 1,

    /// `110`: reserved, Microsoft Corporation backward compatibility.
    Var110 = 2,

    /// `111`: reserved for future definition.
    Var111 = 3,
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from a hexadecimal string representation.
    ///
    /// Dashes are ignored wherever they appear and however many there are; what remains must be
    /// exactly 32 hexadecimal digits.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: Error = Error::InvalidFormat;
        let mut dst = [0u8; 16];
        let mut iter = src.chars().filter(|c| *c != '-');
        for e in dst.iter_mut() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            *e = (hi << 4) | lo;
        }
        if iter.next().is_none() {
            Ok(Self(dst))
        } else {
            Err(ERR)
        }
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::from_slice(value).map_err(de::Error::custom)
        }
    }

}
