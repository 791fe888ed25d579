use thiserror::Error;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("ciphertext is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("ciphertext is missing the salt header")]
    MissingSalt,

    #[error("decryption failed: wrong passphrase or corrupted ciphertext")]
    BadPadding,

    #[error("decrypted text is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
