//! Pluggable binary-to-text transforms applied to the raw 16-byte form.
//!
//! ```rust
//! use uuid1::{encoding::Base64Encoder, Uuid};
//!
//! let x = "04e37eeb-6881-45db-976b-ec2efbb0e475".parse::<Uuid>()?;
//! assert_eq!(x.encode_to_string_with(&Base64Encoder::url()), "BON-62iBRduXa-wu-7DkdQ");
//! assert_eq!(x.encode_to_string_with(&Base64Encoder::std()), "BON+62iBRduXa+wu+7DkdQ");
//! # Ok::<(), uuid1::Error>(())
//! ```

use data_encoding::{Encoding, BASE64URL_NOPAD, BASE64_NOPAD};

/// A transform producing an encoded byte vector.
pub trait Encoder {
    /// Encodes `src` into a newly allocated byte vector.
    fn encode(&self, src: &[u8]) -> Vec<u8>;
}

/// A transform producing an encoded string.
pub trait EncoderToString {
    /// Encodes `src` into a newly allocated string.
    fn encode_to_string(&self, src: &[u8]) -> String;
}

/// Adapter that implements [`Encoder`] and [`EncoderToString`] for any base64 [`Encoding`].
///
/// The wrapped [`Encoding`] is public, so custom alphabets and padding can be plugged in directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Base64Encoder(pub Encoding);

impl Base64Encoder {
    /// Returns an encoder for unpadded URL-safe base64 (RFC 4648 section 5).
    pub fn url() -> Self {
        Self(BASE64URL_NOPAD)
    }

    /// Returns an encoder for unpadded standard base64 (RFC 4648 section 4).
    pub fn std() -> Self {
        Self(BASE64_NOPAD)
    }
}

impl Encoder for Base64Encoder {
    fn encode(&self, src: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; self.0.encode_len(src.len())];
        self.0.encode_mut(src, &mut out);
        out
    }
}

impl EncoderToString for Base64Encoder {
    fn encode_to_string(&self, src: &[u8]) -> String {
        self.0.encode(src)
    }
}
