//! # Cipher Errors
//!
//! [`CipherError`] covers key handling, malformed streams and the I/O of the copy loop.

use std::borrow::Cow;

/// A specialized [`CipherError`] enum for stream cipher failures.
#[ggnet_derive::ggnet_error]
pub enum CipherError {
    /// Reading the input stream or writing the output sink failed.
    #[error("Cipher stream I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The key material has the wrong length, is not valid hex, or could not be derived.
    #[error("Invalid encryption key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The encrypted stream ended before its header was complete.
    #[error("Invalid encrypted stream{}: {message}", format_context(.context))]
    InvalidPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback, e.g. the OS random source being unavailable.
    #[error("Internal cipher error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
