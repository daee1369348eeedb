//! Encoder trait, the inverse of [`crate::decoder::Decoder`].
//!
//! `Encoder<T, E>` is implemented on `T` and produces `E`. The output type
//! opts in with [`EncodableTo<T>`].

/// Converts `self` (of type `T`) into `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into `E`.
    ///
    /// # Errors
    ///
    /// Returns an error when `self` cannot be represented as `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait: `Self` can be produced by encoding a `T`.
pub trait EncodableTo<T> {}
