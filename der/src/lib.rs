//! DER (Distinguished Encoding Rules) TLV codec.
//!
//! [`Der`] is the ordered list of top-level [`Tlv`]s found in a byte string.
//! Constructed values are parsed recursively so callers can walk the tree
//! without re-parsing. The serializer always writes minimal definite lengths.

use kagi::decoder::{DecodableFrom, Decoder};
use kagi::encoder::{EncodableTo, Encoder};
use kagi_pem::Pem;
use nom::IResult;
use nom::error::ErrorKind;

pub mod error;

use error::Error;

/// Bit 6 of the identifier octet marks a constructed encoding.
pub const TAG_CONSTRUCTED: u8 = 0x20;

const TAG_CLASS_MASK: u8 = 0xc0;
const TAG_CLASS_UNIVERSAL: u8 = 0x00;
const TAG_CLASS_CONTEXT_SPECIFIC: u8 = 0x80;
const TAG_NUMBER_MASK: u8 = 0x1f;

const LENGTH_LONG_FORM: u8 = 0x80;

/// Deepest nesting of constructed values the parser descends into.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }

    fn parse(mut input: &[u8]) -> error::Result<Der> {
        let mut elements = Vec::new();
        while !input.is_empty() {
            let (rest, tlv) = Tlv::parse(input).map_err(Error::from)?;
            elements.push(tlv);
            input = rest;
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        Der::parse(self)
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        Der::parse(self)
    }
}

impl DecodableFrom<Pem> for Der {}

impl Decoder<Pem, Der> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        let bytes: Vec<u8> = self.decode()?;
        Der::parse(&bytes)
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write(&mut out)?;
        }
        Ok(out)
    }
}

/// Universal tags kagi knows how to interpret.
///
/// The value of `u8::from(&tag)` is the universal tag number, without the
/// constructed bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    UTF8String,
    Sequence,
    Set,
    PrintableString,
    IA5String,
    /// Any other identifier octet, kept as-is.
    Unimplemented(u8),
}

impl From<&PrimitiveTag> for u8 {
    fn from(tag: &PrimitiveTag) -> Self {
        match tag {
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::UTF8String => 0x0c,
            PrimitiveTag::Sequence => 0x10,
            PrimitiveTag::Set => 0x11,
            PrimitiveTag::PrintableString => 0x13,
            PrimitiveTag::IA5String => 0x16,
            PrimitiveTag::Unimplemented(b) => *b,
        }
    }
}

impl PrimitiveTag {
    fn from_identifier(b: u8) -> Self {
        if b & TAG_CLASS_MASK != TAG_CLASS_UNIVERSAL {
            return PrimitiveTag::Unimplemented(b);
        }
        match b & TAG_NUMBER_MASK {
            0x01 => PrimitiveTag::Boolean,
            0x02 => PrimitiveTag::Integer,
            0x03 => PrimitiveTag::BitString,
            0x04 => PrimitiveTag::OctetString,
            0x05 => PrimitiveTag::Null,
            0x06 => PrimitiveTag::ObjectIdentifier,
            0x0c => PrimitiveTag::UTF8String,
            0x10 => PrimitiveTag::Sequence,
            0x11 => PrimitiveTag::Set,
            0x13 => PrimitiveTag::PrintableString,
            0x16 => PrimitiveTag::IA5String,
            _ => PrimitiveTag::Unimplemented(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// A universal (or unknown class) tag and its full identifier octet.
    Primitive(PrimitiveTag, u8),
    /// `[slot]` tagged value.
    ContextSpecific { slot: u8, constructed: bool },
}

impl Tag {
    pub fn is_constructed(&self) -> bool {
        match self {
            Tag::Primitive(_, b) => b & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            Tag::ContextSpecific { constructed, .. } => *constructed,
        }
    }

    fn identifier(&self) -> error::Result<u8> {
        match self {
            Tag::Primitive(_, b) => Ok(*b),
            Tag::ContextSpecific { slot, constructed } => {
                if *slot >= TAG_NUMBER_MASK {
                    return Err(Error::InvalidSlot(*slot));
                }
                let constructed = if *constructed { TAG_CONSTRUCTED } else { 0 };
                Ok(TAG_CLASS_CONTEXT_SPECIFIC | constructed | slot)
            }
        }
    }
}

impl TryFrom<u8> for Tag {
    type Error = Error;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        if b & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
            return Err(Error::UnsupportedTag(b));
        }
        if b & TAG_CLASS_MASK == TAG_CLASS_CONTEXT_SPECIFIC {
            return Ok(Tag::ContextSpecific {
                slot: b & TAG_NUMBER_MASK,
                constructed: b & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            });
        }
        Ok(Tag::Primitive(PrimitiveTag::from_identifier(b), b))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Tlv(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Contents of a primitive TLV.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    /// Children of a constructed TLV.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Serializes this TLV as DER.
    pub fn to_bytes(&self) -> error::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }

    fn write(&self, out: &mut Vec<u8>) -> error::Result<()> {
        out.push(self.tag.identifier()?);
        match &self.value {
            Value::Data(data) => {
                write_length(data.len(), out);
                out.extend_from_slice(data);
            }
            Value::Tlv(tlvs) => {
                let mut content = Vec::new();
                for tlv in tlvs {
                    tlv.write(&mut content)?;
                }
                write_length(content.len(), out);
                out.extend_from_slice(&content);
            }
        }
        Ok(())
    }

    fn parse(input: &[u8]) -> ParseResult<'_, Tlv> {
        Self::parse_nested(input, 0)
    }

    fn parse_nested(input: &[u8], depth: usize) -> ParseResult<'_, Tlv> {
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let (input, data) = nom::bytes::complete::take::<_, _, ParseError>(length)(input)?;

        if tag.is_constructed() {
            if depth >= MAX_DEPTH {
                return fail(Error::NestingTooDeep(MAX_DEPTH));
            }
            // parse TLV recursively.
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, v) = Self::parse_nested(data, depth + 1)?;
                data = rest;
                tlvs.push(v);
            }
            return Ok((input, Tlv::new_constructed(tag, tlvs)));
        }

        Ok((input, Tlv::new_primitive(tag, data.to_vec())))
    }
}

#[derive(Debug)]
enum ParseError {
    Nom(ErrorKind),
    Der(Error),
}

impl<I> nom::error::ParseError<I> for ParseError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        ParseError::Nom(kind)
    }

    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<ParseError>> for Error {
    fn from(e: nom::Err<ParseError>) -> Self {
        match e {
            nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
            nom::Err::Error(e) | nom::Err::Failure(e) => match e {
                ParseError::Nom(kind) => Error::Parser(kind),
                ParseError::Der(e) => e,
            },
        }
    }
}

type ParseResult<'a, T> = IResult<&'a [u8], T, ParseError>;

fn fail<'a, T>(e: Error) -> ParseResult<'a, T> {
    Err(nom::Err::Failure(ParseError::Der(e)))
}

fn parse_tag(input: &[u8]) -> ParseResult<'_, Tag> {
    let (input, n) = nom::number::complete::be_u8::<_, ParseError>(input)?;
    match Tag::try_from(n) {
        Ok(tag) => Ok((input, tag)),
        Err(e) => fail(e),
    }
}

fn parse_length(input: &[u8]) -> ParseResult<'_, usize> {
    let (input, n) = nom::number::complete::be_u8::<_, ParseError>(input)?;
    if n & LENGTH_LONG_FORM == 0 {
        // short form: 0-127
        return Ok((input, n as usize));
    }
    // long form
    // First 1 bit is a marker for long form.
    // Other bits represent bytes length of the length field.
    let count = n & !LENGTH_LONG_FORM;
    if count == 0 {
        return fail(Error::IndefiniteLength);
    }
    if count as usize > std::mem::size_of::<usize>() {
        return fail(Error::LengthOverflow(count));
    }
    let (input, bs) = nom::bytes::complete::take::<_, _, ParseError>(count)(input)?;
    let length = bs.iter().fold(0usize, |n, &b| (n << 8) | b as usize);
    Ok((input, length))
}

fn write_length(length: usize, out: &mut Vec<u8>) {
    if length < LENGTH_LONG_FORM as usize {
        out.push(length as u8);
        return;
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(LENGTH_LONG_FORM | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}
