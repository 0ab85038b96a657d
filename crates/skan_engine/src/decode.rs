use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}")]
    DecodeFailure { encoding: String },
}

/// Decode a source page: a BOM selects (and is stripped from) the encoding,
/// otherwise the bytes must be valid UTF-8.
pub fn decode_source(bytes: &[u8]) -> Result<String, DecodeError> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::{decode_source, DecodeError};

    #[test]
    fn plain_utf8_is_kept() {
        assert_eq!(decode_source("<p>café</p>".as_bytes()).unwrap(), "<p>café</p>");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        assert_eq!(decode_source(b"\xEF\xBB\xBFhello").unwrap(), "hello");
    }

    #[test]
    fn utf16_bom_selects_encoding() {
        assert_eq!(decode_source(b"\xFF\xFEh\x00i\x00").unwrap(), "hi");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(
            decode_source(b"caf\xe9"),
            Err(DecodeError::DecodeFailure {
                encoding: "UTF-8".to_string()
            })
        );
    }
}
