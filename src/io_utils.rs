//! Encoding resolution and text acquisition.
//!
//! The parser core consumes text; this module is the collaborator that turns
//! files and readers into text, decoding via `encoding_rs` with UTF-8 as the
//! default. Reading failures are the only hard errors the crate produces.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Error, Result};

/// Resolves a WHATWG encoding label; `None` means UTF-8.
pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(value.to_string()))
    } else {
        Ok(UTF_8)
    }
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(Error::Decode(encoding.name()))
    } else {
        Ok(text.into_owned())
    }
}

/// Reads an entire file as text with the given encoding.
pub fn read_to_string(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let file = File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
    decode_bytes(&bytes, encoding)
}

/// Reads an entire file-like object as text with the given encoding.
pub fn read_reader_to_string<R: Read>(mut reader: R, encoding: &'static Encoding) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_bytes(&bytes, encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_encoding_defaults_to_utf8() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(resolve_encoding(Some("utf-8")).unwrap(), UTF_8);
        assert_eq!(resolve_encoding(Some(" UTF-8 ")).unwrap(), UTF_8);
        assert!(resolve_encoding(Some("not-an-encoding")).is_err());
    }

    #[test]
    fn decode_bytes_honors_the_encoding() {
        let latin1 = resolve_encoding(Some("latin1")).unwrap();
        // 0xE9 is 'é' in latin1 but invalid UTF-8.
        assert_eq!(decode_bytes(&[0x63, 0xE9], latin1).unwrap(), "cé");
        assert!(decode_bytes(&[0xE9], UTF_8).is_err());
    }

    #[test]
    fn read_reader_decodes_in_memory_sources() {
        let text = read_reader_to_string("a,b\n1,2\n".as_bytes(), UTF_8).unwrap();
        assert_eq!(text, "a,b\n1,2\n");
    }
}
