//! Decoder trait for type-safe conversions.
//!
//! A decoder turns a source representation `T` into a destination `D`. The
//! destination opts in with [`DecodableFrom<T>`], and the source implements
//! [`Decoder<T, D>`] with the conversion itself.
//!
//! ```no_run
//! use kagi::decoder::{DecodableFrom, Decoder};
//!
//! struct Armored(String);
//! struct Payload(Vec<u8>);
//!
//! #[derive(Debug)]
//! struct BadInput;
//!
//! impl DecodableFrom<Armored> for Payload {}
//!
//! impl Decoder<Armored, Payload> for Armored {
//!     type Error = BadInput;
//!
//!     fn decode(&self) -> Result<Payload, Self::Error> {
//!         Ok(Payload(self.0.as_bytes().to_vec()))
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into `D`.
///
/// When a source can be decoded into several destinations, call sites pick
/// one with a type annotation:
///
/// ```ignore
/// let der: Der = pem.decode()?;
/// let key: EncryptedPrivateKeyInfo = pem.decode()?;
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into `D`.
    ///
    /// # Errors
    ///
    /// Returns an error when `self` is not a valid encoding of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait: `Self` can be decoded from `T`.
pub trait DecodableFrom<T> {}
