//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! Computes the SHA-256 digest of a file's full content, reading in fixed
//! 8 KiB chunks so memory use is independent of file size. The digest is
//! returned as a lowercase hex string, which is the form persisted in the
//! store and compared during duplicate grouping.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::HashError;

/// Read chunk size for streaming hashing.
const CHUNK_SIZE: usize = 8192;

/// Compute the SHA-256 digest of a file's content as a lowercase hex string.
///
/// Identical content always yields an identical digest; the indexer relies
/// on this for duplicate grouping.
///
/// # Errors
///
/// Returns a [`HashError`] classifying the failure (not found, permission
/// denied, other I/O). Callers are expected to log and skip the file rather
/// than abort the run.
pub fn hash_file(path: &Path) -> Result<String, HashError> {
    let mut file = File::open(path).map_err(|e| classify_io_error(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| classify_io_error(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hash_to_hex(hasher.finalize().as_slice()))
}

/// Convert raw digest bytes to a lowercase hex string.
#[must_use]
pub fn hash_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

/// Map an I/O error onto the hashing error taxonomy.
fn classify_io_error(path: &Path, error: std::io::Error) -> HashError {
    match error.kind() {
        ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hash_file_known_vector() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, b"hello").unwrap();

        assert_eq!(
            hash_file(&path).unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_hash_file_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();

        // SHA-256 of the empty string
        assert_eq!(
            hash_file(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_file_identical_content_identical_digest() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn test_hash_file_different_content_different_digest() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        fs::write(&a, b"content A").unwrap();
        fs::write(&b, b"content B").unwrap();

        assert_ne!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn test_hash_file_streams_across_chunks() {
        // Content larger than one read chunk must hash the same as a
        // one-shot digest of the full buffer
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.bin");
        let content: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &content).unwrap();

        let expected = hash_to_hex(Sha256::digest(&content).as_slice());
        assert_eq!(hash_file(&path).unwrap(), expected);
    }

    #[test]
    fn test_hash_file_missing_is_not_found() {
        let err = hash_file(Path::new("/nonexistent/file.bin")).unwrap_err();
        assert!(matches!(err, HashError::NotFound(_)));
    }

    #[test]
    fn test_hash_to_hex() {
        assert_eq!(hash_to_hex(&[0x00, 0xff, 0x0a]), "00ff0a");
        assert_eq!(hash_to_hex(&[]), "");
    }
}
