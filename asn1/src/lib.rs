//! ASN.1 element model.
//!
//! [`Element`] is the typed view of a DER [`Tlv`]. Universal types kagi needs
//! for PKCS#5 and PKCS#8 are decoded into their own variants. Everything else
//! is kept as [`Element::Unimplemented`] and written back byte for byte.

use std::{fmt::Display, str::FromStr};

use error::{Error, Result};
use kagi::decoder::{DecodableFrom, Decoder};
use kagi::encoder::{EncodableTo, Encoder};
use kagi_der::{Der, PrimitiveTag, TAG_CONSTRUCTED, Tag, Tlv};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der> {
        let tlvs = self
            .elements
            .iter()
            .map(|e| e.encode())
            .collect::<Result<Vec<Tlv>>>()?;
        Ok(Der::new(tlvs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    PrintableString(String),
    IA5String(String),
    /// `[slot]` tagged value.
    ///
    /// Constructed (EXPLICIT) values hold the single wrapped element.
    /// Primitive (IMPLICIT) values hold the raw contents as an OctetString;
    /// the caller reinterprets them from its schema.
    ContextSpecific {
        slot: u8,
        constructed: bool,
        element: Box<Element>,
    },
    /// A TLV kagi does not interpret, re-encoded verbatim.
    Unimplemented(Tlv),
}

impl Element {
    /// Decodes a single DER encoded element. Trailing data is an error.
    pub fn from_der(bytes: &[u8]) -> Result<Element> {
        let der: Der = bytes.decode()?;
        let asn1: ASN1Object = der.decode()?;
        let mut elements = asn1.into_elements().into_iter();
        match (elements.next(), elements.next()) {
            (Some(element), None) => Ok(element),
            (None, _) => Err(Error::NoElement),
            (Some(_), Some(_)) => Err(Error::TrailingData),
        }
    }

    /// Encodes this element as DER.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let tlv = self.encode()?;
        Ok(tlv.to_bytes()?)
    }

    /// Short ASN.1 type name, used by inspection output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Boolean(_) => "BOOLEAN",
            Element::Integer(_) => "INTEGER",
            Element::BitString(_) => "BIT STRING",
            Element::OctetString(_) => "OCTET STRING",
            Element::Null => "NULL",
            Element::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Element::UTF8String(_) => "UTF8String",
            Element::Sequence(_) => "SEQUENCE",
            Element::Set(_) => "SET",
            Element::PrintableString(_) => "PrintableString",
            Element::IA5String(_) => "IA5String",
            Element::ContextSpecific { .. } => "CONTEXT SPECIFIC",
            Element::Unimplemented(_) => "UNKNOWN",
        }
    }
}

fn primitive_data(tlv: &Tlv) -> &[u8] {
    tlv.data().unwrap_or_default()
}

fn decode_string(tlv: &Tlv, err: Error) -> Result<String> {
    String::from_utf8(primitive_data(tlv).to_vec()).map_err(|_| err)
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _)
                if tlv.tag().is_constructed()
                    != matches!(primitive_tag, PrimitiveTag::Sequence | PrimitiveTag::Set) =>
            {
                // e.g. a BER constructed OCTET STRING
                Ok(Element::Unimplemented(tlv.clone()))
            }
            Tag::Primitive(primitive_tag, _) => match primitive_tag {
                PrimitiveTag::Boolean => match tlv.data() {
                    Some([0x00]) => Ok(Element::Boolean(false)),
                    Some([0xff]) => Ok(Element::Boolean(true)),
                    _ => Err(Error::InvalidBoolean),
                },
                PrimitiveTag::Integer => match tlv.data() {
                    Some(data) if !data.is_empty() => Ok(Element::Integer(Integer::from(data))),
                    _ => Err(Error::IntegerNoData),
                },
                PrimitiveTag::BitString => {
                    let data = tlv.data().ok_or(Error::BitStringNoData)?;
                    Ok(Element::BitString(BitString::try_from(data)?))
                }
                PrimitiveTag::OctetString => {
                    Ok(Element::OctetString(OctetString::from(primitive_data(tlv))))
                }
                PrimitiveTag::Null => Ok(Element::Null),
                PrimitiveTag::ObjectIdentifier => {
                    let data = tlv.data().ok_or(Error::ObjectIdentifierNoData)?;
                    Ok(Element::ObjectIdentifier(ObjectIdentifier::try_from(data)?))
                }
                PrimitiveTag::UTF8String => Ok(Element::UTF8String(decode_string(
                    tlv,
                    Error::Utf8StringInvalidUtf8,
                )?)),
                PrimitiveTag::PrintableString => Ok(Element::PrintableString(decode_string(
                    tlv,
                    Error::PrintableStringInvalidEncoding,
                )?)),
                PrimitiveTag::IA5String => {
                    let s = decode_string(tlv, Error::Ia5StringInvalidEncoding)?;
                    if !s.is_ascii() {
                        return Err(Error::Ia5StringInvalidEncoding);
                    }
                    Ok(Element::IA5String(s))
                }
                PrimitiveTag::Sequence | PrimitiveTag::Set => {
                    let elements = tlv
                        .tlvs()
                        .unwrap_or_default()
                        .iter()
                        .map(Element::try_from)
                        .collect::<Result<Vec<_>>>()?;
                    if *primitive_tag == PrimitiveTag::Sequence {
                        Ok(Element::Sequence(elements))
                    } else {
                        Ok(Element::Set(elements))
                    }
                }
                PrimitiveTag::Unimplemented(_) => Ok(Element::Unimplemented(tlv.clone())),
            },
            Tag::ContextSpecific { slot, constructed } => {
                if *constructed {
                    match tlv.tlvs() {
                        Some([inner]) => Ok(Element::ContextSpecific {
                            slot: *slot,
                            constructed: true,
                            element: Box::new(Element::try_from(inner)?),
                        }),
                        // IMPLICIT SET OF and friends: keep the raw TLV.
                        _ => Ok(Element::Unimplemented(tlv.clone())),
                    }
                } else {
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: false,
                        element: Box::new(Element::OctetString(OctetString::from(
                            primitive_data(tlv),
                        ))),
                    })
                }
            }
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({})", bs),
            Element::OctetString(os) => write!(f, "OctetString({})", os),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::UTF8String(s) => write!(f, "UTF8String({})", s),
            Element::Sequence(seq) => write!(f, "Sequence({:?})", seq),
            Element::Set(set) => write!(f, "Set({:?})", set),
            Element::PrintableString(s) => write!(f, "PrintableString({})", s),
            Element::IA5String(s) => write!(f, "IA5String({})", s),
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => write!(
                f,
                "ContextSpecific(slot: {}, constructed: {}, element: {})",
                slot, constructed, element
            ),
            Element::Unimplemented(tlv) => write!(f, "Unimplemented({:?})", tlv.tag()),
        }
    }
}

fn universal(tag: PrimitiveTag) -> Tag {
    let number = u8::from(&tag);
    match tag {
        PrimitiveTag::Sequence | PrimitiveTag::Set => {
            Tag::Primitive(tag, number | TAG_CONSTRUCTED)
        }
        _ => Tag::Primitive(tag, number),
    }
}

impl TryFrom<&Element> for Tlv {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self> {
        let tlv = match element {
            Element::Boolean(b) => Tlv::new_primitive(
                universal(PrimitiveTag::Boolean),
                vec![if *b { 0xff } else { 0x00 }],
            ),
            Element::Integer(i) => Tlv::new_primitive(
                universal(PrimitiveTag::Integer),
                i.as_bigint().to_signed_bytes_be(),
            ),
            Element::BitString(bs) => {
                Tlv::new_primitive(universal(PrimitiveTag::BitString), bs.to_der_contents())
            }
            Element::OctetString(os) => {
                Tlv::new_primitive(universal(PrimitiveTag::OctetString), os.as_bytes().to_vec())
            }
            Element::Null => Tlv::new_primitive(universal(PrimitiveTag::Null), vec![]),
            Element::ObjectIdentifier(oid) => Tlv::new_primitive(
                universal(PrimitiveTag::ObjectIdentifier),
                oid.to_der_contents()?,
            ),
            Element::UTF8String(s) => {
                Tlv::new_primitive(universal(PrimitiveTag::UTF8String), s.as_bytes().to_vec())
            }
            Element::PrintableString(s) => Tlv::new_primitive(
                universal(PrimitiveTag::PrintableString),
                s.as_bytes().to_vec(),
            ),
            Element::IA5String(s) => {
                Tlv::new_primitive(universal(PrimitiveTag::IA5String), s.as_bytes().to_vec())
            }
            Element::Sequence(elements) | Element::Set(elements) => {
                let tag = if matches!(element, Element::Sequence(_)) {
                    universal(PrimitiveTag::Sequence)
                } else {
                    universal(PrimitiveTag::Set)
                };
                let tlvs = elements
                    .iter()
                    .map(Tlv::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Tlv::new_constructed(tag, tlvs)
            }
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => {
                let tag = Tag::ContextSpecific {
                    slot: *slot,
                    constructed: *constructed,
                };
                let inner = Tlv::try_from(element.as_ref())?;
                if *constructed {
                    // EXPLICIT tagging: wrap the inner element
                    Tlv::new_constructed(tag, vec![inner])
                } else {
                    // IMPLICIT tagging: replace the inner tag
                    let data = inner.data().ok_or(Error::ElementImplicitNotPrimitive)?;
                    Tlv::new_primitive(tag, data.to_vec())
                }
            }
            Element::Unimplemented(tlv) => tlv.clone(),
        };
        Ok(tlv)
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv> {
        Tlv::try_from(self)
    }
}

/// ASN.1 INTEGER of arbitrary size, positive or negative.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let inner = s.parse::<BigInt>().map_err(serde::de::Error::custom)?;
        Ok(Integer { inner })
    }
}

impl From<&[u8]> for Integer {
    fn from(value: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(value),
        }
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl TryFrom<&Integer> for u32 {
    type Error = Error;

    fn try_from(value: &Integer) -> Result<Self> {
        value.to_u32().ok_or(Error::IntegerOutOfRange("u32"))
    }
}

impl TryFrom<&Integer> for u64 {
    type Error = Error;

    fn try_from(value: &Integer) -> Result<Self> {
        value.to_u64().ok_or(Error::IntegerOutOfRange("u64"))
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// ASN.1 OBJECT IDENTIFIER as a list of arcs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }

    fn to_der_contents(&self) -> Result<Vec<u8>> {
        let (first, second, rest) = match self.inner.as_slice() {
            [first, second, rest @ ..] => (*first, *second, rest),
            _ => return Err(Error::ObjectIdentifierTooFewComponents),
        };
        if first > 2 || (first < 2 && second >= 40) {
            return Err(Error::ObjectIdentifierInvalidRoot(first, second));
        }
        let root = second
            .checked_add(first * 40)
            .ok_or(Error::ObjectIdentifierInvalidRoot(first, second))?;

        let mut result = Vec::new();
        for arc in std::iter::once(root).chain(rest.iter().copied()) {
            push_base128(arc, &mut result);
        }
        Ok(result)
    }
}

fn push_base128(mut value: u64, out: &mut Vec<u8>) {
    let mut encoded = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        encoded.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(encoded.iter().rev());
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut pending = false;
        for b in value {
            if val > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierIncompleteEncoding);
            }
            val = (val << 7) | (*b & 0x7f) as u64;
            pending = *b & 0x80 != 0;
            if !pending {
                subidentifiers.push(val);
                val = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        let mut inner = Vec::with_capacity(subidentifiers.len() + 1);
        let root = subidentifiers[0];
        match root {
            0..40 => inner.extend([0, root]),
            40..80 => inner.extend([1, root - 40]),
            _ => inner.extend([2, root - 80]),
        }
        inner.extend_from_slice(&subidentifiers[1..]);
        Ok(ObjectIdentifier { inner })
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .split('.')
            .map(|s| s.parse::<u64>().map_err(Error::ObjectIdentifierInvalidComponent))
            .collect::<Result<Vec<u64>>>()?;
        if inner.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<ObjectIdentifier> for &str {
    fn eq(&self, other: &ObjectIdentifier) -> bool {
        other == self
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    /// Number of unused bits in the last byte.
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused as usize)
    }

    fn to_der_contents(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.data.len() + 1);
        data.push(self.unused);
        data.extend_from_slice(&self.data);
        data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        match value.split_first() {
            Some((&unused, _)) if unused > 7 => Err(Error::BitStringUnusedBitsOutOfRange(unused)),
            Some((&unused, data)) => Ok(BitString {
                unused,
                data: data.to_vec(),
            }),
            None => Err(Error::BitStringNoData),
        }
    }
}

impl Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("BitString", 2)?;
        state.serialize_field("bit_length", &self.bit_len())?;
        state.serialize_field("bits", &hex(&self.data, ":"))?;
        state.end()
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last = self.data.len().saturating_sub(1);
        for (i, byte) in self.data.iter().enumerate() {
            if i == last && self.unused > 0 {
                let bit_count = 8 - self.unused as usize;
                write!(f, "{:0bit_count$b}", byte >> self.unused)?;
            } else {
                write!(f, "{:08b}", byte)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Serialize for OctetString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex(&self.inner, ""))
        } else {
            self.inner.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for OctetString {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if !deserializer.is_human_readable() {
            let inner = Vec::<u8>::deserialize(deserializer)?;
            return Ok(OctetString { inner });
        }
        let s = String::deserialize(deserializer)?;
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ':')
            .collect();
        if cleaned.len() % 2 != 0 {
            return Err(serde::de::Error::custom("hex string must have even length"));
        }
        let inner = (0..cleaned.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&cleaned[i..i + 2], 16))
            .collect::<std::result::Result<Vec<u8>, _>>()
            .map_err(serde::de::Error::custom)?;
        Ok(OctetString { inner })
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.inner, ""))
    }
}

fn hex(data: &[u8], sep: &str) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use kagi::decoder::Decoder;
    use kagi::encoder::Encoder;
    use kagi_der::{Der, PrimitiveTag, Tag, Tlv};
    use rstest::rstest;

    use super::*;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    #[rstest(input, expected,
        case(vec![0x02, 0x01, 0x00], "0"),
        case(vec![0x02, 0x01, 0x7f], "127"),
        case(vec![0x02, 0x02, 0x00, 0x80], "128"),
        case(vec![0x02, 0x02, 0x08, 0x00], "2048"),
        case(vec![0x02, 0x01, 0xff], "-1"),
        case(vec![0x02, 0x09, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff], "18446744073709551615"),
    )]
    fn test_parse_element_integer(input: Vec<u8>, expected: &str) {
        let element = Element::from_der(&input).unwrap();
        match &element {
            Element::Integer(i) => assert_eq!(expected, i.to_string()),
            other => panic!("expected Integer, got {}", other),
        }
        assert_eq!(input, element.to_der().unwrap());
    }

    #[rstest(value, expected,
        case(0u64, vec![0x02, 0x01, 0x00]),
        case(2048u64, vec![0x02, 0x02, 0x08, 0x00]),
        case(0x80u64, vec![0x02, 0x02, 0x00, 0x80]),
    )]
    fn test_integer_encode_minimal(value: u64, expected: Vec<u8>) {
        let element = Element::Integer(Integer::from(value));
        assert_eq!(expected, element.to_der().unwrap());
    }

    #[rstest(input, expected,
        case("1.2.840.113549.1.5.13", vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x05, 0x0d]),
        case("1.3.14.3.2.7", vec![0x2b, 0x0e, 0x03, 0x02, 0x07]),
        case("2.16.840.1.101.3.4.1.42", vec![0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x01, 0x2a]),
        case("1.2.840.113549.2.7", vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x02, 0x07]),
        case("2.999.3", vec![0x88, 0x37, 0x03]),
        case("0.0", vec![0x00]),
        case("1.2.0.5", vec![0x2a, 0x00, 0x05]),
    )]
    fn test_object_identifier_der_contents(input: &str, expected: Vec<u8>) {
        let id = oid(input);
        assert_eq!(expected, id.to_der_contents().unwrap());
        assert_eq!(id, ObjectIdentifier::try_from(expected.as_slice()).unwrap());
        assert_eq!(input, id.to_string());
    }

    #[rstest(input,
        case(vec![]),
        case(vec![0x2a, 0x86]),
    )]
    fn test_object_identifier_invalid_bytes(input: Vec<u8>) {
        assert!(ObjectIdentifier::try_from(input.as_slice()).is_err());
    }

    #[rstest(input,
        case(""),
        case("1"),
        case("1.2.x"),
        case("1..2"),
    )]
    fn test_object_identifier_invalid_str(input: &str) {
        assert!(ObjectIdentifier::from_str(input).is_err());
    }

    #[rstest(input, case("3.1"), case("1.40"), case("0.99.1"))]
    fn test_object_identifier_invalid_root(input: &str) {
        assert!(matches!(
            oid(input).to_der_contents(),
            Err(Error::ObjectIdentifierInvalidRoot(_, _))
        ));
    }

    #[test]
    fn test_object_identifier_compare_str() {
        let id = oid("1.2.840.113549.1.5.12");
        assert!(id == "1.2.840.113549.1.5.12");
        assert!("1.2.840.113549.1.5.12" == id);
        assert!(id != "1.2.840.113549.1.5.13");
    }

    #[test]
    fn test_object_identifier_serde() {
        let id = oid("2.16.840.1.101.3.4.1.2");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(r#""2.16.840.1.101.3.4.1.2""#, json);
        let back: ObjectIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
        assert!(serde_json::from_str::<ObjectIdentifier>(r#""1""#).is_err());
    }

    #[rstest(input, expected,
        case(BitString::new(0, vec![0b1010_1010]), "10101010"),
        case(BitString::new(4, vec![0b1111_0000]), "1111"),
        case(BitString::new(1, vec![0xff, 0b0000_0010]), "111111110000001"),
        case(BitString::new(0, vec![]), ""),
    )]
    fn test_bitstring_to_string(input: BitString, expected: &str) {
        assert_eq!(expected, input.to_string());
    }

    #[test]
    fn test_bitstring_unused_bits_out_of_range() {
        let input: &[u8] = &[0x08, 0xff];
        assert!(matches!(
            BitString::try_from(input),
            Err(Error::BitStringUnusedBitsOutOfRange(8))
        ));
    }

    #[rstest(input, expected_json,
        case(OctetString::from(vec![0xe1, 0xf2, 0x74, 0xfe]), r#""e1f274fe""#),
        case(OctetString::from(vec![]), r#""""#),
    )]
    fn test_octetstring_serde(input: OctetString, expected_json: &str) {
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(expected_json, json);
        let back: OctetString = serde_json::from_str(&json).unwrap();
        assert_eq!(input, back);
    }

    #[test]
    fn test_octetstring_deserialize_with_separators() {
        let os: OctetString = serde_json::from_str(r#""e1:f2 74""#).unwrap();
        assert_eq!(&[0xe1, 0xf2, 0x74], os.as_bytes());
        assert!(serde_json::from_str::<OctetString>(r#""abc""#).is_err());
    }

    #[rstest(input, expected,
        case(vec![0x01, 0x01, 0xff], Element::Boolean(true)),
        case(vec![0x05, 0x00], Element::Null),
        case(vec![0x04, 0x00], Element::OctetString(OctetString::from(vec![]))),
        case(vec![0x0c, 0x02, 0x68, 0x69], Element::UTF8String("hi".into())),
        case(vec![0x13, 0x02, 0x68, 0x69], Element::PrintableString("hi".into())),
        case(vec![0x16, 0x02, 0x68, 0x69], Element::IA5String("hi".into())),
        case(vec![0x30, 0x00], Element::Sequence(vec![])),
        case(vec![0x31, 0x03, 0x02, 0x01, 0x01], Element::Set(vec![Element::Integer(Integer::from(1u32))])),
        case(
            vec![0xa0, 0x03, 0x02, 0x01, 0x01],
            Element::ContextSpecific {
                slot: 0,
                constructed: true,
                element: Box::new(Element::Integer(Integer::from(1u32))),
            }
        ),
        case(
            vec![0x81, 0x02, 0x00, 0xaa],
            Element::ContextSpecific {
                slot: 1,
                constructed: false,
                element: Box::new(Element::OctetString(OctetString::from(vec![0x00, 0xaa]))),
            }
        ),
    )]
    fn test_element_decode_encode(input: Vec<u8>, expected: Element) {
        let element = Element::from_der(&input).unwrap();
        assert_eq!(expected, element);
        assert_eq!(input, element.to_der().unwrap());
    }

    #[rstest(input, case(vec![0x01, 0x01, 0x01]), case(vec![0x01, 0x00]), case(vec![0x02, 0x00]), case(vec![0x16, 0x01, 0xe9]))]
    fn test_element_decode_invalid(input: Vec<u8>) {
        assert!(Element::from_der(&input).is_err());
    }

    #[test]
    fn test_element_from_der_rejects_deep_nesting() {
        let mut tlv = Tlv::new_primitive(Tag::Primitive(PrimitiveTag::Null, 0x05), vec![]);
        for _ in 0..1000 {
            tlv = Tlv::new_constructed(Tag::Primitive(PrimitiveTag::Sequence, 0x30), vec![tlv]);
        }
        let input = tlv.to_bytes().unwrap();
        assert!(matches!(
            Element::from_der(&input),
            Err(Error::FailedToDecodeDer(kagi_der::error::Error::NestingTooDeep(
                kagi_der::MAX_DEPTH
            )))
        ));
    }

    #[test]
    fn test_element_from_der_rejects_trailing_data() {
        let input = [0x05, 0x00, 0x05, 0x00];
        assert!(matches!(
            Element::from_der(&input),
            Err(Error::TrailingData)
        ));
    }

    #[rstest(input,
        // [0] IMPLICIT SET OF Attribute with two attributes
        case(vec![0xa0, 0x06, 0x30, 0x01, 0x05, 0x30, 0x01, 0x05]),
        // empty [0]
        case(vec![0xa0, 0x00]),
        // BMPString
        case(vec![0x1e, 0x02, 0x00, 0x41]),
        // application class
        case(vec![0x61, 0x03, 0x02, 0x01, 0x07]),
    )]
    fn test_element_unimplemented_reencodes_verbatim(input: Vec<u8>) {
        let element = Element::from_der(&input).unwrap();
        assert!(matches!(element, Element::Unimplemented(_)));
        assert_eq!(input, element.to_der().unwrap());
    }

    #[test]
    fn test_element_to_tlv_implicit_from_bitstring() {
        let element = Element::ContextSpecific {
            slot: 1,
            constructed: false,
            element: Box::new(Element::BitString(BitString::new(0, vec![0x04, 0x01]))),
        };
        let tlv: Tlv = element.encode().unwrap();
        assert_eq!(
            &Tag::ContextSpecific {
                slot: 1,
                constructed: false
            },
            tlv.tag()
        );
        assert_eq!(Some([0x00, 0x04, 0x01].as_slice()), tlv.data());
    }

    #[test]
    fn test_element_to_tlv_implicit_requires_primitive() {
        let element = Element::ContextSpecific {
            slot: 0,
            constructed: false,
            element: Box::new(Element::Sequence(vec![])),
        };
        assert!(matches!(
            Tlv::try_from(&element),
            Err(Error::ElementImplicitNotPrimitive)
        ));
    }

    #[test]
    fn test_sequence_tag_has_constructed_bit() {
        let tlv = Tlv::try_from(&Element::Sequence(vec![Element::Null])).unwrap();
        assert_eq!(&Tag::Primitive(PrimitiveTag::Sequence, 0x30), tlv.tag());
        let tlv = Tlv::try_from(&Element::Set(vec![])).unwrap();
        assert_eq!(&Tag::Primitive(PrimitiveTag::Set, 0x31), tlv.tag());
    }

    #[rstest(input,
        case(include_str!("../../pkcs/testdata/pkcs8/key_v2_aes.pem")),
        case(include_str!("../../pkcs/testdata/pkcs8/key_v2_rc2.pem")),
        case(include_str!("../../pkcs/testdata/pkcs8/key_PBE-SHA1-RC2-64.pem")),
        case(include_str!("../../pkcs/testdata/pkcs8/private_key.pem")),
    )]
    fn test_roundtrip_pkcs8_document(input: &str) {
        let pem = kagi_pem::Pem::from_str(input).unwrap();
        let bytes: Vec<u8> = pem.decode().unwrap();
        let der: Der = pem.decode().unwrap();
        let asn1: ASN1Object = der.decode().unwrap();
        assert_eq!(1, asn1.elements().len());

        let encoded: Der = asn1.encode().unwrap();
        let encoded: Vec<u8> = encoded.encode().unwrap();
        assert_eq!(bytes, encoded);
    }
}
