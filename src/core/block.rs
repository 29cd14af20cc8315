// Definite-length binary block framing
//
// Layout: <prefix> "#9" <9 ASCII digits: n> <n payload bytes> <trailer>

use crate::core::constants::{BLOCK_LENGTH_DIGITS, BLOCK_MARKER};
use crate::core::error::{FramingError, Result};
use crate::core::format::RawBlock;

/// Slice the payload of the first definite-length block in `raw`.
///
/// The buffer must already hold the complete response. Bytes before the
/// marker and after the payload are ignored.
pub fn extract_block(raw: &[u8]) -> Result<RawBlock> {
    let marker = raw
        .windows(BLOCK_MARKER.len())
        .position(|w| w == BLOCK_MARKER)
        .ok_or(FramingError::MissingMarker)?;

    let length_start = marker + BLOCK_MARKER.len();
    let data_start = length_start + BLOCK_LENGTH_DIGITS;

    let length_field = raw.get(length_start..data_start).ok_or_else(|| {
        FramingError::InvalidLength(String::from_utf8_lossy(&raw[length_start..]).into_owned())
    })?;

    let declared = parse_length(length_field)?;

    let available = raw.len() - data_start;
    if available < declared {
        return Err(FramingError::Truncated {
            declared,
            available,
        }
        .into());
    }

    Ok(RawBlock::new(raw[data_start..data_start + declared].to_vec()))
}

fn parse_length(field: &[u8]) -> std::result::Result<usize, FramingError> {
    if !field.iter().all(u8::is_ascii_digit) {
        return Err(FramingError::InvalidLength(
            String::from_utf8_lossy(field).into_owned(),
        ));
    }

    // Nine digits always fit in usize
    Ok(field
        .iter()
        .fold(0usize, |acc, d| acc * 10 + usize::from(d - b'0')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ScopeError;

    fn framing(result: Result<RawBlock>) -> FramingError {
        match result {
            Err(ScopeError::Framing(e)) => e,
            other => panic!("expected framing error, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_payload() {
        let block = extract_block(b"junk#9000000005HELLOtrailer").unwrap();
        assert_eq!(block.as_bytes(), b"HELLO");
    }

    #[test]
    fn test_extract_siglent_response() {
        let mut raw = b"C1:WF DAT2,#9000000004".to_vec();
        raw.extend_from_slice(&[0x00, 0x80, 0xff, 0x23]);
        raw.extend_from_slice(b"\n\n");

        let block = extract_block(&raw).unwrap();
        assert_eq!(block.as_bytes(), &[0x00, 0x80, 0xff, 0x23]);
    }

    #[test]
    fn test_binary_payload_may_contain_marker() {
        let block = extract_block(b"#9000000004#9xy").unwrap();
        assert_eq!(block.as_bytes(), b"#9xy");
    }

    #[test]
    fn test_empty_payload() {
        let block = extract_block(b"#9000000000\n").unwrap();
        assert!(block.is_empty());
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(
            framing(extract_block(b"C1:WF DAT2,000000005HELLO")),
            FramingError::MissingMarker
        );
        assert_eq!(framing(extract_block(b"")), FramingError::MissingMarker);
    }

    #[test]
    fn test_bad_length_field() {
        assert!(matches!(
            framing(extract_block(b"#90000x0005HELLO")),
            FramingError::InvalidLength(_)
        ));
        assert!(matches!(
            framing(extract_block(b"#90000")),
            FramingError::InvalidLength(_)
        ));
    }

    #[test]
    fn test_truncated_payload() {
        assert_eq!(
            framing(extract_block(b"junk#9000000010HELLO")),
            FramingError::Truncated {
                declared: 10,
                available: 5
            }
        );
    }
}
