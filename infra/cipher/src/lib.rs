//! Streaming symmetric encryption for objects exchanged between ggnet peers.
//!
//! The sending side encrypts an object with [`copy_encrypt`]; the storing side runs the
//! incoming bytes through [`copy_decrypt`] while persisting them, so plaintext never needs to
//! be held in memory as a whole.
//!
//! ## Stream Format
//!
//! ```text
//! [IV(16)][AES-256-CTR CIPHERTEXT(N)]
//! ```
//!
//! CTR mode keeps ciphertext and plaintext the same length and allows decrypting any prefix
//! of the stream. It does **not** authenticate the data; a tampered stream decrypts to garbage
//! rather than failing.
//!
//! ## Example
//!
//! ```rust
//! use ggnet_cipher::{EncryptionKey, copy_decrypt, copy_encrypt};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), ggnet_cipher::CipherError> {
//! let key = EncryptionKey::generate()?;
//!
//! let mut sealed = Vec::new();
//! copy_encrypt(&key, &mut Cursor::new(b"object bytes"), &mut sealed)?;
//!
//! let mut opened = Vec::new();
//! let n = copy_decrypt(&key, &mut Cursor::new(sealed), &mut opened)?;
//! assert_eq!(n, 12);
//! assert_eq!(opened, b"object bytes");
//! # Ok(())
//! # }
//! ```

mod error;
mod key;
mod stream;

pub use error::{CipherError, CipherErrorExt};
pub use key::{EncryptionKey, KEY_LEN};
pub use stream::{IV_LEN, copy_decrypt, copy_encrypt};
