//! # kagi
//!
//! Core traits for the kagi private key toolkit.
//!
//! Every layer of kagi converts one representation into the next with the
//! [`decoder::Decoder`] trait and back with the [`encoder::Encoder`] trait:
//!
//! ```text
//! &str → Pem → Der → ASN1Object → Element → EncryptedPrivateKeyInfo
//! ```
//!
//! The marker traits [`decoder::DecodableFrom`] and [`encoder::EncodableTo`]
//! restrict which pairs of types may be converted, so a conversion that does
//! not exist is a compile error rather than a runtime failure.
//!
//! ## Example
//!
//! ```ignore
//! use kagi::decoder::Decoder;
//! use kagi_asn1::ASN1Object;
//! use kagi_der::Der;
//!
//! let bytes = vec![0x30, 0x03, 0x02, 0x01, 0x07];
//! let der: Der = bytes.decode()?;
//! let asn1: ASN1Object = der.decode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
