use std::str::FromStr;

use kagi::decoder::{DecodableFrom, Decoder};
use kagi::encoder::{EncodableTo, Encoder};
use kagi_asn1::{BitString, Element, Integer, OctetString};
use kagi_der::Tag;
use kagi_pem::{FromPem, Label, Pem, ToPem};
use kagi_pkix_types::AlgorithmIdentifier;
use serde::{Serialize, Serializer};

use super::error::{Error, Result};

/*
RFC 5958 - Asymmetric Key Packages

OneAsymmetricKey ::= SEQUENCE {
    version                   Version,
    privateKeyAlgorithm       PrivateKeyAlgorithmIdentifier,
    privateKey                PrivateKey,
    attributes            [0] Attributes OPTIONAL,
    ...,
    [[2: publicKey        [1] PublicKey OPTIONAL ]],
    ...
}

PrivateKeyInfo ::= OneAsymmetricKey

Version ::= INTEGER { v1(0), v2(1) } (v1, ..., v2)

PrivateKey ::= OCTET STRING

PublicKey ::= BIT STRING

Attributes ::= SET OF Attribute
*/

/// PKCS#8 OneAsymmetricKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Version {
    /// Version 1 (no public key)
    V1 = 0,
    /// Version 2 (with public key)
    V2 = 1,
}

impl TryFrom<&Integer> for Version {
    type Error = Error;

    fn try_from(value: &Integer) -> Result<Self> {
        match value.to_u32() {
            Some(0) => Ok(Version::V1),
            Some(1) => Ok(Version::V2),
            _ => Err(Error::shape(format!("invalid version: {}", value))),
        }
    }
}

impl From<Version> for Integer {
    fn from(v: Version) -> Self {
        Integer::from(v as u32)
    }
}

/// OneAsymmetricKey (PKCS#8 v2)
///
/// The private key bytes are algorithm specific and kept opaque.
/// Attributes are kept as the encoded `[0]` element and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneAsymmetricKey {
    pub version: Version,
    pub private_key_algorithm: AlgorithmIdentifier,
    pub private_key: OctetString,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_attributes"
    )]
    pub attributes: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<BitString>,
}

/// PrivateKeyInfo (PKCS#8 v1 compatibility)
pub type PrivateKeyInfo = OneAsymmetricKey;

fn serialize_attributes<S>(
    attributes: &Option<Element>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match attributes {
        Some(element) => {
            let der = element.to_der().map_err(serde::ser::Error::custom)?;
            OctetString::from(der).serialize(serializer)
        }
        None => serializer.serialize_none(),
    }
}

impl OneAsymmetricKey {
    /// A v1 key without attributes.
    pub fn new(private_key_algorithm: AlgorithmIdentifier, private_key: OctetString) -> Self {
        Self {
            version: Version::V1,
            private_key_algorithm,
            private_key,
            attributes: None,
            public_key: None,
        }
    }

    /// Decodes a single DER encoded key. Trailing data is rejected.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let element = Element::from_der(der)?;
        element.decode()
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element: Element = self.encode()?;
        Ok(element.to_der()?)
    }
}

impl DecodableFrom<Element> for OneAsymmetricKey {}

impl Decoder<Element, OneAsymmetricKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<OneAsymmetricKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::shape("OneAsymmetricKey must be a SEQUENCE"));
        };
        let [version, algorithm, private_key, optional @ ..] = elements.as_slice() else {
            return Err(Error::shape(
                "OneAsymmetricKey must have at least 3 elements",
            ));
        };

        let Element::Integer(version) = version else {
            return Err(Error::shape("version must be an INTEGER"));
        };
        let version = Version::try_from(version)?;
        let private_key_algorithm: AlgorithmIdentifier = algorithm.decode()?;
        let Element::OctetString(private_key) = private_key else {
            return Err(Error::shape("privateKey must be an OCTET STRING"));
        };

        let mut attributes = None;
        let mut public_key = None;
        for element in optional {
            match element {
                // a single attribute decodes as EXPLICIT, several stay raw
                Element::ContextSpecific {
                    slot: 0,
                    constructed: true,
                    ..
                } if attributes.is_none() && public_key.is_none() => {
                    attributes = Some(element.clone());
                }
                Element::Unimplemented(tlv)
                    if matches!(
                        tlv.tag(),
                        Tag::ContextSpecific {
                            slot: 0,
                            constructed: true
                        }
                    ) && attributes.is_none()
                        && public_key.is_none() =>
                {
                    attributes = Some(element.clone());
                }
                Element::ContextSpecific {
                    slot: 1,
                    constructed: false,
                    element: inner,
                } if public_key.is_none() => {
                    let Element::OctetString(raw) = inner.as_ref() else {
                        return Err(Error::shape("publicKey must be a primitive [1]"));
                    };
                    public_key = Some(BitString::try_from(raw.as_bytes())?);
                }
                _ => {
                    return Err(Error::shape(format!(
                        "unexpected {} in OneAsymmetricKey",
                        element.type_name()
                    )));
                }
            }
        }

        Ok(OneAsymmetricKey {
            version,
            private_key_algorithm,
            private_key: private_key.clone(),
            attributes,
            public_key,
        })
    }
}

impl EncodableTo<OneAsymmetricKey> for Element {}

impl Encoder<OneAsymmetricKey, Element> for OneAsymmetricKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let base_elements = vec![
            Element::Integer(self.version.into()),
            self.private_key_algorithm.encode()?,
            Element::OctetString(self.private_key.clone()),
        ];

        let optional_elements = [
            self.attributes.clone(),
            self.public_key
                .as_ref()
                .map(|pubkey| Element::ContextSpecific {
                    slot: 1,
                    constructed: false,
                    element: Box::new(Element::BitString(pubkey.clone())),
                }),
        ];

        let elements = base_elements
            .into_iter()
            .chain(optional_elements.into_iter().flatten())
            .collect();

        Ok(Element::Sequence(elements))
    }
}

impl FromStr for OneAsymmetricKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pem: Pem = s.parse()?;
        Self::from_pem(&pem)
    }
}

impl FromPem for OneAsymmetricKey {
    type Error = Error;

    fn expected_label() -> Label {
        Label::PrivateKey
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        if *pem.label() != Self::expected_label() {
            return Err(Error::WrongContainerType {
                expected: Self::expected_label(),
                found: pem.label().clone(),
            });
        }
        let der: Vec<u8> = pem.decode()?;
        Self::from_der(&der)
    }
}

impl ToPem for OneAsymmetricKey {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::PrivateKey
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_der()?))
    }
}

impl DecodableFrom<Pem> for OneAsymmetricKey {}

impl Decoder<Pem, OneAsymmetricKey> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<OneAsymmetricKey> {
        OneAsymmetricKey::from_pem(self)
    }
}
