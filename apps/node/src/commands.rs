//! Subcommand handlers.
//!
//! Handlers take their stdin/stdout as trait objects so they can run against in-memory buffers.

use crate::Node;
use crate::cli::NodeCommand;
use anyhow::{Context, Result};
use ggnet_cipher::EncryptionKey;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::info;

/// Info label bound into passphrase-derived keys.
const KEY_INFO: &str = "ggnet/stream-key/v1";

/// Runs a command that does not need a store.
///
/// # Errors
/// Fails if `command` needs a store, or on bad key material and I/O errors.
pub fn execute_offline(
    command: NodeCommand,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
) -> Result<()> {
    match command {
        NodeCommand::Keygen { passphrase, salt } => {
            let key = match passphrase {
                Some(passphrase) => EncryptionKey::derive(passphrase, salt, KEY_INFO)?,
                None => EncryptionKey::generate().context("OS random source unavailable")?,
            };
            writeln!(stdout, "{}", key.to_hex())?;
        },
        NodeCommand::Encrypt { key, input, output } => {
            let key = parse_key(&key)?;
            let written = with_input(input.as_deref(), stdin, |src| {
                with_output(output.as_deref(), stdout, |dst| {
                    ggnet_cipher::copy_encrypt(&key, src, dst).context("Encryption failed")
                })
            })?;
            info!(bytes = written, "Stream encrypted");
        },
        other => anyhow::bail!("`{other:?}` needs an open store"),
    }
    Ok(())
}

/// Runs a store command against `node`.
///
/// # Errors
/// Propagates store, cipher and I/O failures with the object they concern.
pub fn execute(
    node: &Node,
    command: NodeCommand,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
) -> Result<()> {
    let store = node.store();

    match command {
        NodeCommand::Put { id, key, file } => {
            let written = with_input(file.as_deref(), stdin, |src| {
                store.write(&id, &key, src).with_context(|| format!("Failed to put {id}/{key}"))
            })?;
            writeln!(stdout, "{written}")?;
        },
        NodeCommand::Get { id, key, output } => {
            let (size, mut file) =
                store.read(&id, &key).with_context(|| format!("Failed to get {id}/{key}"))?;
            let copied = with_output(output.as_deref(), stdout, |dst| {
                io::copy(&mut file, dst).context("Failed to stream object")
            })?;
            info!(size, copied, "Object streamed");
        },
        NodeCommand::Has { id, key } => {
            writeln!(stdout, "{}", store.has(&id, &key))?;
        },
        NodeCommand::Delete { id, key } => {
            store.delete(&id, &key).with_context(|| format!("Failed to delete {id}/{key}"))?;
        },
        NodeCommand::DropNamespace { id } => {
            store.delete_namespace(&id).with_context(|| format!("Failed to drop namespace {id}"))?;
        },
        NodeCommand::Clear {} => {
            store.clear().context("Failed to clear storage")?;
        },
        NodeCommand::Path { id, key } => {
            let path = store.resolve(&id, &key)?;
            writeln!(stdout, "{}", path.display())?;
        },
        NodeCommand::PutEncrypted { id, key, with_key, file } => {
            let key_material = parse_key(&with_key)?;
            let written = with_input(file.as_deref(), stdin, |src| {
                store
                    .write_decrypted(&key_material, &id, &key, src)
                    .with_context(|| format!("Failed to put decrypted {id}/{key}"))
            })?;
            writeln!(stdout, "{written}")?;
        },
        offline @ (NodeCommand::Keygen { .. } | NodeCommand::Encrypt { .. }) => {
            execute_offline(offline, stdin, stdout)?;
        },
    }
    Ok(())
}

fn parse_key(hex: &str) -> Result<EncryptionKey> {
    EncryptionKey::from_hex(hex.trim()).context("Expected a 64-character hex key")
}

fn with_input<T>(
    path: Option<&Path>,
    stdin: &mut dyn Read,
    f: impl FnOnce(&mut dyn Read) -> Result<T>,
) -> Result<T> {
    match path {
        Some(path) => {
            let mut file =
                File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
            f(&mut file)
        },
        None => f(stdin),
    }
}

fn with_output<T>(
    path: Option<&Path>,
    stdout: &mut dyn Write,
    f: impl FnOnce(&mut dyn Write) -> Result<T>,
) -> Result<T> {
    match path {
        Some(path) => {
            let mut file =
                File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
            f(&mut file)
        },
        None => {
            let value = f(&mut *stdout)?;
            stdout.flush()?;
            Ok(value)
        },
    }
}
