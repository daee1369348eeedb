//! RFC 5958 EncryptedPrivateKeyInfo
//!
//! ```asn1
//! EncryptedPrivateKeyInfo ::= SEQUENCE {
//!     encryptionAlgorithm  EncryptionAlgorithmIdentifier,
//!     encryptedData        EncryptedData }
//!
//! EncryptionAlgorithmIdentifier ::= AlgorithmIdentifier
//!     { CONTENT-ENCRYPTION, { KeyEncryptionAlgorithms } }
//!
//! EncryptedData ::= OCTET STRING
//! ```

use std::str::FromStr;

use kagi::decoder::{DecodableFrom, Decoder};
use kagi::encoder::{EncodableTo, Encoder};
use kagi_asn1::{Element, OctetString};
use kagi_pem::{FromPem, Label, Pem, ToPem};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use super::error::{DecryptionError, Error, Result, StructureError};
use super::types::PrivateKeyInfo;
use crate::pkcs5::{CipherAlgorithmIdentifier, Crypto, PbeAlgorithmIdentifier, PbeScheme};

/// Algorithms an EncryptedPrivateKeyInfo may name.
///
/// Decoding only yields [`EncryptionAlgorithmIdentifier::Pbe`]; a bare
/// cipher can be wrapped by hand but cannot be used with a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EncryptionAlgorithmIdentifier {
    Pbe(PbeAlgorithmIdentifier),
    Cipher(CipherAlgorithmIdentifier),
}

impl EncryptionAlgorithmIdentifier {
    pub fn oid(&self) -> &'static str {
        match self {
            EncryptionAlgorithmIdentifier::Pbe(pbe) => pbe.oid(),
            EncryptionAlgorithmIdentifier::Cipher(cipher) => cipher.oid(),
        }
    }

    pub fn as_pbe(&self) -> Option<&PbeAlgorithmIdentifier> {
        match self {
            EncryptionAlgorithmIdentifier::Pbe(pbe) => Some(pbe),
            EncryptionAlgorithmIdentifier::Cipher(_) => None,
        }
    }
}

impl From<PbeAlgorithmIdentifier> for EncryptionAlgorithmIdentifier {
    fn from(pbe: PbeAlgorithmIdentifier) -> Self {
        EncryptionAlgorithmIdentifier::Pbe(pbe)
    }
}

impl From<CipherAlgorithmIdentifier> for EncryptionAlgorithmIdentifier {
    fn from(cipher: CipherAlgorithmIdentifier) -> Self {
        EncryptionAlgorithmIdentifier::Cipher(cipher)
    }
}

impl DecodableFrom<Element> for EncryptionAlgorithmIdentifier {}

impl Decoder<Element, EncryptionAlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<EncryptionAlgorithmIdentifier> {
        let pbe: PbeAlgorithmIdentifier = self.decode().map_err(Error::from_resolver)?;
        Ok(EncryptionAlgorithmIdentifier::Pbe(pbe))
    }
}

impl EncodableTo<EncryptionAlgorithmIdentifier> for Element {}

impl Encoder<EncryptionAlgorithmIdentifier, Element> for EncryptionAlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        match self {
            EncryptionAlgorithmIdentifier::Pbe(pbe) => pbe.encode(),
            EncryptionAlgorithmIdentifier::Cipher(cipher) => cipher.encode(),
        }
        .map_err(|err| Error::MalformedStructure(StructureError::Pkcs5(err)))
    }
}

/// A password protected private key.
///
/// Values are immutable; encryption builds a new container and decryption
/// returns the plaintext [`PrivateKeyInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptedPrivateKeyInfo {
    algorithm: EncryptionAlgorithmIdentifier,
    ciphertext: OctetString,
}

impl EncryptedPrivateKeyInfo {
    pub fn new(algorithm: impl Into<EncryptionAlgorithmIdentifier>, ciphertext: Vec<u8>) -> Self {
        Self {
            algorithm: algorithm.into(),
            ciphertext: OctetString::from(ciphertext),
        }
    }

    pub fn algorithm(&self) -> &EncryptionAlgorithmIdentifier {
        &self.algorithm
    }

    pub fn ciphertext(&self) -> &[u8] {
        self.ciphertext.as_bytes()
    }

    /// Decodes a single DER encoded container. Trailing data is rejected.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let element = Element::from_der(der)?;
        element.decode()
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element: Element = self.encode()?;
        Ok(element.to_der()?)
    }

    /// Decrypts the private key with `password`.
    ///
    /// A wrong password surfaces as [`Error::DecryptionFailed`], either from
    /// the padding check or from parsing the recovered bytes.
    pub fn decrypt_with_password(
        &self,
        password: &[u8],
        crypto: Option<&dyn Crypto>,
    ) -> Result<PrivateKeyInfo> {
        let EncryptionAlgorithmIdentifier::Pbe(algorithm) = &self.algorithm else {
            return Err(Error::UnsupportedOperation(
                "algorithm does not support password based encryption".to_string(),
            ));
        };
        let scheme = PbeScheme::from_algorithm_identifier(algorithm, crypto).map_err(Error::Scheme)?;
        debug!(
            algorithm = algorithm.name(),
            len = self.ciphertext.len(),
            "decrypting private key"
        );

        let plaintext = scheme
            .decrypt(self.ciphertext(), password)
            .map(Zeroizing::new)
            .map_err(|err| Error::DecryptionFailed(DecryptionError::Scheme(err)))?;
        PrivateKeyInfo::from_der(&plaintext)
            .map_err(|err| Error::DecryptionFailed(DecryptionError::PrivateKey(Box::new(err))))
    }

    /// Encrypts `private_key` with a key derived from `password`.
    pub fn encrypt_with_password(
        private_key: &PrivateKeyInfo,
        algorithm: PbeAlgorithmIdentifier,
        password: &[u8],
        crypto: Option<&dyn Crypto>,
    ) -> Result<Self> {
        let scheme =
            PbeScheme::from_algorithm_identifier(&algorithm, crypto).map_err(Error::Scheme)?;
        let der = Zeroizing::new(private_key.to_der()?);
        debug!(algorithm = algorithm.name(), "encrypting private key");
        let ciphertext = scheme.encrypt(&der, password).map_err(Error::Scheme)?;
        Ok(Self::new(algorithm, ciphertext))
    }

    /// Encrypts `private_key` with already derived key material.
    ///
    /// `key` is what [`PbeScheme::derive_key`] would produce: for PBES1 the
    /// cipher key followed by the IV, for PBES2 the cipher key.
    pub fn encrypt_with_derived_key(
        private_key: &PrivateKeyInfo,
        algorithm: PbeAlgorithmIdentifier,
        key: &[u8],
        crypto: Option<&dyn Crypto>,
    ) -> Result<Self> {
        let scheme =
            PbeScheme::from_algorithm_identifier(&algorithm, crypto).map_err(Error::Scheme)?;
        let der = Zeroizing::new(private_key.to_der()?);
        debug!(algorithm = algorithm.name(), "encrypting private key with derived key");
        let ciphertext = scheme.encrypt_with_key(&der, key).map_err(Error::Scheme)?;
        Ok(Self::new(algorithm, ciphertext))
    }
}

impl DecodableFrom<Element> for EncryptedPrivateKeyInfo {}

impl Decoder<Element, EncryptedPrivateKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<EncryptedPrivateKeyInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::shape("EncryptedPrivateKeyInfo must be a SEQUENCE"));
        };
        let [algorithm, encrypted_data] = elements.as_slice() else {
            return Err(Error::shape(format!(
                "EncryptedPrivateKeyInfo must have 2 elements, got {}",
                elements.len()
            )));
        };
        let Element::OctetString(ciphertext) = encrypted_data else {
            return Err(Error::shape("encryptedData must be an OCTET STRING"));
        };
        if !matches!(algorithm, Element::Sequence(_)) {
            return Err(Error::shape("encryptionAlgorithm must be a SEQUENCE"));
        }
        let algorithm: EncryptionAlgorithmIdentifier = algorithm.decode()?;

        Ok(EncryptedPrivateKeyInfo {
            algorithm,
            ciphertext: ciphertext.clone(),
        })
    }
}

impl EncodableTo<EncryptedPrivateKeyInfo> for Element {}

impl Encoder<EncryptedPrivateKeyInfo, Element> for EncryptedPrivateKeyInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            self.algorithm.encode()?,
            Element::OctetString(self.ciphertext.clone()),
        ]))
    }
}

impl FromStr for EncryptedPrivateKeyInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pem: Pem = s.parse()?;
        Self::from_pem(&pem)
    }
}

impl FromPem for EncryptedPrivateKeyInfo {
    type Error = Error;

    fn expected_label() -> Label {
        Label::EncryptedPrivateKey
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

impl ToPem for EncryptedPrivateKeyInfo {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::EncryptedPrivateKey
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_der()?))
    }
}

impl DecodableFrom<Pem> for EncryptedPrivateKeyInfo {}

impl Decoder<Pem, EncryptedPrivateKeyInfo> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<EncryptedPrivateKeyInfo> {
        EncryptedPrivateKeyInfo::from_pem(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkcs5::{
        Pbes1Scheme, Pbkdf2Parameters, Prf, RustCryptoEngine, default_crypto,
    };
    use rstest::rstest;
    use std::error::Error as _;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PASSWORD: &[u8] = b"password";

    const PRIVATE_KEY_PEM: &str = include_str!("../../testdata/pkcs8/private_key.pem");
    const PBE_MD5_DES: &str = include_str!("../../testdata/pkcs8/key_PBE-MD5-DES.pem");
    const PBE_MD5_RC2_64: &str = include_str!("../../testdata/pkcs8/key_PBE-MD5-RC2-64.pem");
    const PBE_SHA1_DES: &str = include_str!("../../testdata/pkcs8/key_PBE-SHA1-DES.pem");
    const PBE_SHA1_RC2_64: &str = include_str!("../../testdata/pkcs8/key_PBE-SHA1-RC2-64.pem");
    const PBE_SHA1_3DES: &str = include_str!("../../testdata/pkcs8/key_PBE-SHA1-3DES.pem");
    const V2_AES: &str = include_str!("../../testdata/pkcs8/key_v2_aes.pem");
    const V2_AES128_SHA512: &str = include_str!("../../testdata/pkcs8/key_v2_aes128_sha512.pem");
    const V2_DES: &str = include_str!("../../testdata/pkcs8/key_v2_des.pem");
    const V2_DES3: &str = include_str!("../../testdata/pkcs8/key_v2_des3.pem");
    const V2_RC2: &str = include_str!("../../testdata/pkcs8/key_v2_rc2.pem");

    fn pem_der(pem: &str) -> Vec<u8> {
        let pem: Pem = pem.parse().unwrap();
        pem.decode().unwrap()
    }

    fn private_key() -> PrivateKeyInfo {
        PRIVATE_KEY_PEM.parse().unwrap()
    }

    fn pbe_algorithm(epki: &EncryptedPrivateKeyInfo) -> PbeAlgorithmIdentifier {
        epki.algorithm().as_pbe().unwrap().clone()
    }

    #[rstest]
    #[case(PBE_MD5_DES)]
    #[case(PBE_MD5_RC2_64)]
    #[case(PBE_SHA1_DES)]
    #[case(PBE_SHA1_RC2_64)]
    #[case(V2_AES)]
    #[case(V2_AES128_SHA512)]
    #[case(V2_DES)]
    #[case(V2_DES3)]
    #[case(V2_RC2)]
    fn test_decode_encode_roundtrip(#[case] pem: &str) {
        let epki: EncryptedPrivateKeyInfo = pem.parse().unwrap();
        assert_eq!(epki.ciphertext().len(), 144);

        let der = pem_der(pem);
        assert_eq!(epki.to_der().unwrap(), der);
        assert_eq!(EncryptedPrivateKeyInfo::from_der(&der).unwrap(), epki);

        let armored = epki.to_pem().unwrap();
        assert_eq!(armored.label(), &Label::EncryptedPrivateKey);
        assert_eq!(armored.to_string().trim(), pem.trim());
        let decoded: EncryptedPrivateKeyInfo = armored.decode().unwrap();
        assert_eq!(decoded, epki);
    }

    #[rstest]
    #[case(PBE_MD5_DES)]
    #[case(PBE_MD5_RC2_64)]
    #[case(PBE_SHA1_DES)]
    #[case(PBE_SHA1_RC2_64)]
    #[case(V2_AES)]
    #[case(V2_AES128_SHA512)]
    #[case(V2_DES)]
    #[case(V2_DES3)]
    #[case(V2_RC2)]
    fn test_decrypt_reference(#[case] pem: &str) {
        let epki: EncryptedPrivateKeyInfo = pem.parse().unwrap();
        let pki = epki.decrypt_with_password(PASSWORD, None).unwrap();
        assert_eq!(pki.to_der().unwrap(), pem_der(PRIVATE_KEY_PEM));
    }

    // Re-encrypting with the reference salt, iteration count and IV must
    // reproduce the reference file.
    #[rstest]
    #[case(PBE_SHA1_RC2_64)]
    #[case(V2_DES3)]
    #[case(V2_AES)]
    fn test_encrypt_matches_reference(#[case] pem: &str) {
        let reference: EncryptedPrivateKeyInfo = pem.parse().unwrap();
        let epki = EncryptedPrivateKeyInfo::encrypt_with_password(
            &private_key(),
            pbe_algorithm(&reference),
            PASSWORD,
            None,
        )
        .unwrap();
        assert_eq!(epki.to_der().unwrap(), reference.to_der().unwrap());
    }

    #[test]
    fn test_encrypt_pbkdf2_aes256_explicit_parameters() {
        let algorithm = PbeAlgorithmIdentifier::pbes2(
            Pbkdf2Parameters::new(
                vec![0xe1, 0xf2, 0x74, 0xfe, 0xd7, 0xf4, 0xf5, 0xde],
                2048,
                None,
                Some(Prf::HmacWithSha256),
            ),
            CipherAlgorithmIdentifier::Aes256Cbc {
                iv: [
                    0x40, 0x8c, 0x05, 0x9e, 0xee, 0x22, 0x66, 0x45, 0x9b, 0x6a, 0x14, 0xea, 0xe5,
                    0x9e, 0xed, 0xc3,
                ],
            },
        );
        let epki =
            EncryptedPrivateKeyInfo::encrypt_with_password(&private_key(), algorithm, PASSWORD, None)
                .unwrap();
        assert_eq!(epki.to_der().unwrap(), pem_der(V2_AES));
    }

    #[rstest]
    #[case(PbeAlgorithmIdentifier::pbes1(Pbes1Scheme::Sha1Rc2Cbc, [0x6e; 8], 2048))]
    #[case(PbeAlgorithmIdentifier::pbes2(
        Pbkdf2Parameters::new(vec![0x2a; 16], 1000, None, Some(Prf::HmacWithSha512)),
        CipherAlgorithmIdentifier::Aes128Cbc { iv: [0x01; 16] },
    ))]
    fn test_encrypt_with_derived_key(#[case] algorithm: PbeAlgorithmIdentifier) {
        let scheme = PbeScheme::from_algorithm_identifier(&algorithm, None).unwrap();
        let key = scheme
            .kdf()
            .derive(
                PASSWORD,
                scheme.salt(),
                scheme.iterations(),
                scheme.key_length().unwrap(),
            )
            .unwrap();

        let with_key = EncryptedPrivateKeyInfo::encrypt_with_derived_key(
            &private_key(),
            algorithm.clone(),
            &key,
            None,
        )
        .unwrap();
        let with_password = EncryptedPrivateKeyInfo::encrypt_with_password(
            &private_key(),
            algorithm,
            PASSWORD,
            None,
        )
        .unwrap();
        assert_eq!(with_key, with_password);
        assert_eq!(
            with_key.decrypt_with_password(PASSWORD, None).unwrap(),
            private_key()
        );
    }

    #[rstest]
    #[case(PBE_SHA1_RC2_64)]
    #[case(V2_AES)]
    fn test_decrypt_wrong_password(#[case] pem: &str) {
        let epki: EncryptedPrivateKeyInfo = pem.parse().unwrap();
        let err = epki.decrypt_with_password(b"nope", None).unwrap_err();
        assert!(matches!(err, Error::DecryptionFailed(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_decrypt_bare_cipher_unsupported() {
        let epki = EncryptedPrivateKeyInfo::new(
            CipherAlgorithmIdentifier::Aes256Cbc { iv: [0; 16] },
            vec![0; 144],
        );
        match epki.decrypt_with_password(PASSWORD, None) {
            Err(Error::UnsupportedOperation(msg)) => {
                assert_eq!(msg, "algorithm does not support password based encryption")
            }
            other => panic!("unexpected result: {:?}", other),
        }

        // the container still encodes, but will not decode as PBE
        let der = epki.to_der().unwrap();
        assert!(matches!(
            EncryptedPrivateKeyInfo::from_der(&der),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_decode_unsupported_algorithm() {
        match PBE_SHA1_3DES.parse::<EncryptedPrivateKeyInfo>() {
            Err(Error::UnsupportedAlgorithm(oid)) => assert_eq!(oid, "1.2.840.113549.1.12.1.3"),
            other => panic!("unexpected result: {:?}", other),
        }

        // SEQUENCE { SEQUENCE { OID 1.3.6.1.3 }, OCTET STRING 00 }
        let der = [
            0x30, 0x0b, 0x30, 0x06, 0x06, 0x04, 0x2b, 0x06, 0x01, 0x03, 0x04, 0x01, 0x00,
        ];
        match EncryptedPrivateKeyInfo::from_der(&der) {
            Err(Error::UnsupportedAlgorithm(oid)) => assert_eq!(oid, "1.3.6.1.3"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_pem_wrong_container() {
        let pem: Pem = PRIVATE_KEY_PEM.parse().unwrap();
        assert!(matches!(
            EncryptedPrivateKeyInfo::from_pem(&pem),
            Err(Error::WrongContainerType {
                expected: Label::EncryptedPrivateKey,
                found: Label::PrivateKey
            })
        ));
        assert!(matches!(
            PRIVATE_KEY_PEM.parse::<EncryptedPrivateKeyInfo>(),
            Err(Error::WrongContainerType { .. })
        ));
    }

    fn reference_with(f: impl FnOnce(&mut Vec<Element>)) -> Vec<u8> {
        let Element::Sequence(mut elements) = Element::from_der(&pem_der(V2_DES3)).unwrap() else {
            panic!("expected SEQUENCE");
        };
        f(&mut elements);
        Element::Sequence(elements).to_der().unwrap()
    }

    #[rstest]
    // extra element
    #[case(reference_with(|e| e.push(Element::Null)))]
    // missing encryptedData
    #[case(reference_with(|e| {
        e.pop();
    }))]
    // encryptedData is not an OCTET STRING
    #[case(reference_with(|e| e[1] = Element::Null))]
    // algorithm is not a SEQUENCE
    #[case(reference_with(|e| e[0] = Element::Null))]
    // PBES2 parameters with a bad IV length
    #[case(reference_with(|e| {
        let Element::Sequence(alg) = &mut e[0] else { panic!() };
        let Element::Sequence(params) = &mut alg[1] else { panic!() };
        let Element::Sequence(cipher) = &mut params[1] else { panic!() };
        cipher[1] = Element::OctetString(OctetString::from(vec![0; 7]));
    }))]
    // not a SEQUENCE at all
    #[case(vec![0x04, 0x01, 0x00])]
    // empty input
    #[case(vec![])]
    fn test_decode_malformed(#[case] der: Vec<u8>) {
        let result = EncryptedPrivateKeyInfo::from_der(&der);
        assert!(
            matches!(result, Err(Error::MalformedStructure(_))),
            "{:?}",
            result
        );
    }

    fn rc2_with_key_length(key_length: u32) -> PbeAlgorithmIdentifier {
        PbeAlgorithmIdentifier::pbes2(
            Pbkdf2Parameters::new(vec![0x67; 8], 2048, Some(key_length), None),
            CipherAlgorithmIdentifier::Rc2Cbc {
                version: Some(58),
                iv: [0xca; 8],
            },
        )
    }

    #[rstest]
    #[case(rc2_with_key_length(20_000_000))]
    #[case(PbeAlgorithmIdentifier::pbes2(
        Pbkdf2Parameters::new(vec![0xe1; 8], 2048, Some(16), Some(Prf::HmacWithSha256)),
        CipherAlgorithmIdentifier::Aes256Cbc { iv: [0x40; 16] },
    ))]
    fn test_decode_rejects_invalid_key_length(#[case] algorithm: PbeAlgorithmIdentifier) {
        let der = EncryptedPrivateKeyInfo::new(algorithm, vec![0; 144])
            .to_der()
            .unwrap();
        match EncryptedPrivateKeyInfo::from_der(&der) {
            Err(Error::MalformedStructure(StructureError::Pkcs5(
                crate::pkcs5::Error::InvalidKeyLength { .. },
            ))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decrypt_huge_key_length_fails_before_derivation() {
        // built by hand, so decoding never saw it
        let epki = EncryptedPrivateKeyInfo::new(rc2_with_key_length(u32::MAX), vec![0; 144]);
        match epki.decrypt_with_password(PASSWORD, None) {
            Err(Error::Scheme(crate::pkcs5::Error::InvalidKeyLength { expected, actual })) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, u32::MAX as usize);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_deep_nesting() {
        use kagi_der::{PrimitiveTag, Tag, Tlv};

        let mut tlv = Tlv::new_primitive(Tag::Primitive(PrimitiveTag::Null, 0x05), vec![]);
        for _ in 0..1000 {
            tlv = Tlv::new_constructed(Tag::Primitive(PrimitiveTag::Sequence, 0x30), vec![tlv]);
        }
        let der = tlv.to_bytes().unwrap();
        assert!(matches!(
            EncryptedPrivateKeyInfo::from_der(&der),
            Err(Error::MalformedStructure(StructureError::Asn1(
                kagi_asn1::error::Error::FailedToDecodeDer(kagi_der::error::Error::NestingTooDeep(_))
            )))
        ));
    }

    #[test]
    fn test_decode_trailing_data() {
        let mut der = pem_der(V2_AES);
        der.extend_from_slice(&[0x05, 0x00]);
        assert!(matches!(
            EncryptedPrivateKeyInfo::from_der(&der),
            Err(Error::MalformedStructure(_))
        ));
    }

    #[test]
    fn test_to_der_is_stable() {
        let epki: EncryptedPrivateKeyInfo = V2_RC2.parse().unwrap();
        let first = epki.to_der().unwrap();
        let second = epki.to_der().unwrap();
        assert_eq!(first, second);
    }

    #[derive(Default)]
    struct CountingEngine {
        calls: AtomicUsize,
    }

    impl Crypto for CountingEngine {
        fn encrypt(
            &self,
            data: &[u8],
            key: &[u8],
            cipher: &CipherAlgorithmIdentifier,
        ) -> crate::pkcs5::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RustCryptoEngine.encrypt(data, key, cipher)
        }

        fn decrypt(
            &self,
            data: &[u8],
            key: &[u8],
            cipher: &CipherAlgorithmIdentifier,
        ) -> crate::pkcs5::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            default_crypto().decrypt(data, key, cipher)
        }
    }

    #[test]
    fn test_custom_crypto_engine() {
        let engine = CountingEngine::default();
        let epki: EncryptedPrivateKeyInfo = V2_DES.parse().unwrap();

        let pki = epki.decrypt_with_password(PASSWORD, Some(&engine)).unwrap();
        let reencrypted = EncryptedPrivateKeyInfo::encrypt_with_password(
            &pki,
            pbe_algorithm(&epki),
            PASSWORD,
            Some(&engine),
        )
        .unwrap();

        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
        assert_eq!(reencrypted, epki);
    }
}
