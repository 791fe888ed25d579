//! solace-cipher
//!
//! Passphrase-based encryption of chat text between the browser and the API.
//!
//! The format is the one OpenSSL `enc` and CryptoJS produce for a string
//! passphrase: base64 of `"Salted__" || salt || AES-256-CBC(PKCS#7)`, with
//! key and IV derived by `EVP_BytesToKey` (MD5, one round). It provides
//! confidentiality only. There is no authentication tag, and the
//! passphrase is shipped to browsers. Do not use it to protect credentials.

pub mod error;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use md5::{Digest, Md5};
use rand::RngCore;

use crate::error::CipherError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const MAGIC: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

#[derive(Clone)]
pub struct MessageCipher {
    passphrase: Vec<u8>,
}

impl MessageCipher {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into().into_bytes(),
        }
    }

    /// Encrypt with a fresh random salt.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let (key, iv) = derive_key_iv(&self.passphrase, &salt);
        let ciphertext = Aes256CbcEnc::new(&key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let mut out = Vec::with_capacity(MAGIC.len() + SALT_LEN + ciphertext.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&salt);
        out.extend_from_slice(&ciphertext);
        STANDARD.encode(out)
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let raw = STANDARD.decode(encoded.trim())?;
        let rest = raw.strip_prefix(MAGIC.as_slice()).ok_or(CipherError::MissingSalt)?;
        if rest.len() < SALT_LEN {
            return Err(CipherError::MissingSalt);
        }
        let (salt, ciphertext) = rest.split_at(SALT_LEN);

        let (key, iv) = derive_key_iv(&self.passphrase, salt);
        let plaintext = Aes256CbcDec::new(&key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CipherError::BadPadding)?;

        Ok(String::from_utf8(plaintext)?)
    }
}

impl std::fmt::Debug for MessageCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCipher").finish_non_exhaustive()
    }
}

/// OpenSSL `EVP_BytesToKey` with MD5 and a single iteration.
fn derive_key_iv(passphrase: &[u8], salt: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut material = Vec::with_capacity(KEY_LEN + IV_LEN);
    let mut previous: Vec<u8> = Vec::new();

    while material.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        hasher.update(&previous);
        hasher.update(passphrase);
        hasher.update(salt);
        previous = hasher.finalize().to_vec();
        material.extend_from_slice(&previous);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&material[..KEY_LEN]);
    iv.copy_from_slice(&material[KEY_LEN..KEY_LEN + IV_LEN]);
    (key, iv)
}
