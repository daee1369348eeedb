use std::str::FromStr;

use clap::Args;
use kagi_asn1::Element;
use kagi_pem::{FromPem, Label, Pem};
use kagi_pkcs::pkcs5::{
    CipherAlgorithmIdentifier, OID_PBKDF2, PbeAlgorithmIdentifier, Pbes1Parameters,
    Pbes2Parameters,
};
use kagi_pkcs::pkcs8::{
    AlgorithmParameters, EncryptedPrivateKeyInfo, EncryptionAlgorithmIdentifier, PrivateKeyInfo,
};
use tracing::debug;

use crate::error::Result;
use crate::output::{OutputFormat, print_structured};
use crate::utils::{hex, read_pem_input};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the PEM file. If not specified, reads from stdin
    pub(crate) file: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub(crate) output: OutputFormat,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let contents = read_pem_input(config.file.as_deref())?;
    let pem = Pem::from_str(&contents)?;
    debug!(label = %pem.label(), "parsed PEM");

    match pem.label() {
        Label::EncryptedPrivateKey => {
            let key = EncryptedPrivateKeyInfo::from_pem(&pem)?;
            output_encrypted_private_key_info(&key, config.output)
        }
        Label::PrivateKey => {
            let key = PrivateKeyInfo::from_pem(&pem)?;
            output_private_key_info(&key, config.output)
        }
        other => Err(format!("Unsupported PEM label: {}", other).into()),
    }
}

fn print_effective_bits(cipher: &CipherAlgorithmIdentifier, indent: usize) {
    if !cipher.has_variable_key_length() {
        return;
    }
    match cipher.effective_key_bits() {
        Ok(bits) => println!("{}Effective Key Bits: {}", " ".repeat(indent), bits),
        Err(e) => println!("{}Effective Key Bits: {}", " ".repeat(indent), e),
    }
}

fn print_cipher(cipher: &CipherAlgorithmIdentifier, indent: usize) {
    let prefix = " ".repeat(indent);
    println!("{}Cipher: {} ({})", prefix, cipher.name(), cipher.oid());
    print_effective_bits(cipher, indent + 2);
    println!("{}  IV: {}", prefix, hex(cipher.iv()));
}

fn print_pbes1(params: &Pbes1Parameters) {
    println!(
        "Encryption Scheme: {} ({})",
        params.scheme.name(),
        params.scheme.oid()
    );
    println!("  KDF: PBKDF1 ({})", params.scheme.digest().name());
    println!("    Salt: {}", hex(&params.salt));
    println!("    Iterations: {}", params.iterations);
    let cipher = params.scheme.cipher([0; 8]);
    println!("  Cipher: {} ({})", cipher.name(), cipher.oid());
    print_effective_bits(&cipher, 4);
    println!("    IV: derived from password");
}

fn print_pbes2(oid: &str, params: &Pbes2Parameters) {
    println!("Encryption Scheme: PBES2 ({})", oid);
    println!("  KDF: PBKDF2 ({})", OID_PBKDF2);
    let prf = params.kdf.prf();
    println!("    PRF: {} ({})", prf.name(), prf.oid());
    println!("    Salt: {}", hex(&params.kdf.salt));
    println!("    Iterations: {}", params.kdf.iterations);
    match params.kdf.key_length {
        Some(key_length) => println!("    Key Length: {}", key_length),
        None => {
            if let Ok(key_length) = params.cipher.default_key_length() {
                println!("    Key Length: {} (cipher default)", key_length);
            }
        }
    }
    print_cipher(&params.cipher, 2);
}

pub(crate) fn output_encrypted_private_key_info(
    key: &EncryptedPrivateKeyInfo,
    format: OutputFormat,
) -> Result<()> {
    if print_structured(key, format)? {
        return Ok(());
    }

    println!("PKCS#8 Encrypted Private Key");
    match key.algorithm() {
        EncryptionAlgorithmIdentifier::Pbe(pbe) => match pbe {
            PbeAlgorithmIdentifier::Pbes1(params) => print_pbes1(params),
            PbeAlgorithmIdentifier::Pbes2(params) => print_pbes2(pbe.oid(), params),
        },
        EncryptionAlgorithmIdentifier::Cipher(cipher) => print_cipher(cipher, 0),
    }
    println!("Encrypted Data: {} bytes", key.ciphertext().len());

    Ok(())
}

fn describe_parameters(params: &AlgorithmParameters) -> String {
    match params {
        AlgorithmParameters::Null => "NULL".to_string(),
        AlgorithmParameters::Elm(Element::ObjectIdentifier(oid)) => oid.to_string(),
        AlgorithmParameters::Elm(elm) => elm.type_name().to_string(),
    }
}

pub(crate) fn output_private_key_info(key: &PrivateKeyInfo, format: OutputFormat) -> Result<()> {
    if print_structured(key, format)? {
        return Ok(());
    }

    println!("PKCS#8 Private Key (OneAsymmetricKey)");
    println!("Version: {:?}", key.version);
    println!("Algorithm: {}", key.private_key_algorithm.algorithm());
    if let Some(params) = key.private_key_algorithm.parameters() {
        println!("Algorithm Parameters: {}", describe_parameters(params));
    }
    println!("Private Key: {} bytes", key.private_key.len());
    if key.attributes.is_some() {
        println!("Attributes: present");
    }
    if let Some(public_key) = &key.public_key {
        println!("Public Key: {} bits", public_key.bit_len());
    }

    Ok(())
}
