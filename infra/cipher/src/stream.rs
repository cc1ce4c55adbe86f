//! Streaming encrypt/decrypt copies.
//!
//! Both directions move data through a fixed-size buffer, so memory use does not grow
//! with the object size and plaintext is produced while the input is still arriving.

use crate::error::{CipherError, CipherErrorExt};
use crate::key::EncryptionKey;
use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use getrandom::fill;
use std::io::{ErrorKind, Read, Write};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Length of the random IV that prefixes every encrypted stream.
pub const IV_LEN: usize = 16;

const CHUNK_LEN: usize = 32 * 1024;

/// Encrypts `src` into `dst` as `[IV(16)][ciphertext]`.
///
/// # Results
/// Returns the number of bytes written to `dst`, IV included.
///
/// # Errors
/// * [`CipherError::Internal`] if no IV can be drawn from the OS RNG.
/// * [`CipherError::Io`] if reading `src` or writing `dst` fails.
pub fn copy_encrypt<R, W>(key: &EncryptionKey, src: &mut R, dst: &mut W) -> Result<u64, CipherError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut iv = [0u8; IV_LEN];
    fill(&mut iv).map_err(|e| CipherError::Internal {
        message: e.to_string().into(),
        context: Some("System RNG unavailable for IV generation".into()),
    })?;

    let mut cipher = init_cipher(key, &iv)?;
    dst.write_all(&iv).context("Writing stream IV")?;

    let written = pump(&mut cipher, src, dst)?;
    Ok(written + IV_LEN as u64)
}

/// Decrypts an `[IV(16)][ciphertext]` stream from `src` into `dst`.
///
/// Decryption happens chunk by chunk while copying; the ciphertext is never buffered in full.
///
/// # Results
/// Returns the number of plaintext bytes written to `dst`.
///
/// # Errors
/// * [`CipherError::InvalidPayload`] if `src` ends before a full IV was read.
/// * [`CipherError::Io`] if reading `src` or writing `dst` fails.
pub fn copy_decrypt<R, W>(key: &EncryptionKey, src: &mut R, dst: &mut W) -> Result<u64, CipherError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut iv = [0u8; IV_LEN];
    src.read_exact(&mut iv).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            CipherError::InvalidPayload {
                message: format!("Stream shorter than the {IV_LEN}-byte IV").into(),
                context: None,
            }
        } else {
            CipherError::Io { source: e, context: Some("Reading stream IV".into()) }
        }
    })?;

    let mut cipher = init_cipher(key, &iv)?;
    pump(&mut cipher, src, dst)
}

fn init_cipher(key: &EncryptionKey, iv: &[u8; IV_LEN]) -> Result<Aes256Ctr, CipherError> {
    Aes256Ctr::new_from_slices(key.as_bytes(), iv).map_err(|_| CipherError::InvalidKey {
        message: "Key or IV has an invalid length for AES-256-CTR".into(),
        context: None,
    })
}

fn pump<R, W>(cipher: &mut Aes256Ctr, src: &mut R, dst: &mut W) -> Result<u64, CipherError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; CHUNK_LEN];
    let mut total = 0u64;

    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CipherError::Io {
                    source: e,
                    context: Some(format!("Read failed after {total} bytes").into()),
                });
            },
        };

        cipher.apply_keystream(&mut buf[..n]);
        dst.write_all(&buf[..n]).context(format!("Write failed after {total} bytes"))?;
        total += n as u64;
    }

    dst.flush().context("Flushing cipher output")?;
    Ok(total)
}
