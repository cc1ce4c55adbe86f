use std::borrow::Cow;

/// A specialized [`StorageError`] enum of this crate.
#[ggnet_derive::ggnet_error]
pub enum StorageError {
    #[error("Object not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Path traversal security violation{}: {message}", format_context(.context))]
    PathTraversalAttempt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Store misconfigured{}: {message}", format_context(.context))]
    Misconfigured { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Stream decryption failure{}: {source}", format_context(.context))]
    Cipher { source: ggnet_cipher::CipherError, context: Option<Cow<'static, str>> },
}
