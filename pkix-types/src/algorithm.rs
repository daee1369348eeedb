//! AlgorithmIdentifier type
//!
//! Defined in RFC 5280 Section 4.1.1.2

use kagi::decoder::{DecodableFrom, Decoder};
use kagi::encoder::{EncodableTo, Encoder};
use kagi_asn1::{Element, ObjectIdentifier};
use serde::{Serialize, ser::SerializeStruct};

use crate::error::{Error, Result};

/// Parameters field in AlgorithmIdentifier
///
/// Wrapped in Option:
/// - None: field not present
/// - Some(AlgorithmParameters::Null): explicit NULL (05 00)
/// - Some(AlgorithmParameters::Elm(Element)): any other ASN.1 element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    Null,
    Elm(Element),
}

impl Serialize for AlgorithmParameters {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            AlgorithmParameters::Null => serializer.serialize_str("NULL"),
            AlgorithmParameters::Elm(elm) => serializer.serialize_str(elm.type_name()),
        }
    }
}

/// Algorithm Identifier
///
/// ```asn1
/// AlgorithmIdentifier ::= SEQUENCE {
///     algorithm   OBJECT IDENTIFIER,
///     parameters  ANY DEFINED BY algorithm OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    pub fn new(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: None,
        }
    }

    pub fn new_with_params(algorithm: ObjectIdentifier, parameters: AlgorithmParameters) -> Self {
        Self {
            algorithm,
            parameters: Some(parameters),
        }
    }

    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }

    /// The parameters as an element, with NULL mapped to `Element::Null`.
    pub fn parameters_element(&self) -> Option<Element> {
        self.parameters.as_ref().map(|p| match p {
            AlgorithmParameters::Null => Element::Null,
            AlgorithmParameters::Elm(elm) => elm.clone(),
        })
    }
}

impl Serialize for AlgorithmIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AlgorithmIdentifier", 2)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        if let Some(ref params) = self.parameters {
            state.serialize_field("parameters", params)?;
        }
        state.end()
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::AlgorithmIdentifierExpectedSequence);
        };
        let (algorithm, parameters) = match elements.as_slice() {
            [algorithm] => (algorithm, None),
            [algorithm, parameters] => (algorithm, Some(parameters)),
            _ => {
                return Err(Error::AlgorithmIdentifierInvalidElementCount(
                    elements.len(),
                ));
            }
        };
        let Element::ObjectIdentifier(algorithm) = algorithm else {
            return Err(Error::AlgorithmIdentifierExpectedOid);
        };
        let parameters = parameters.map(|p| match p {
            Element::Null => AlgorithmParameters::Null,
            other => AlgorithmParameters::Elm(other.clone()),
        });

        Ok(AlgorithmIdentifier {
            algorithm: algorithm.clone(),
            parameters,
        })
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.algorithm.clone())];
        elements.extend(self.parameters_element());
        Ok(Element::Sequence(elements))
    }
}
