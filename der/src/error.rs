use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error("parser incomplete: {0:?}")]
    ParserIncomplete(nom::Needed),
    #[error("indefinite length is not allowed in DER")]
    IndefiniteLength,
    #[error("length field of {0} bytes does not fit in usize")]
    LengthOverflow(u8),
    #[error("multi-byte tag numbers are not supported: 0x{0:02x}")]
    UnsupportedTag(u8),
    #[error("context-specific slot {0} does not fit in a single tag byte")]
    InvalidSlot(u8),
    #[error("constructed values nested deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("pem: {0}")]
    Pem(#[from] kagi_pem::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
