//! Latin-1 (ISO-8859-1) text codec.
//!
//! Device firmware is free to put any byte into banners and hostnames.
//! Latin-1 maps each byte value 0-255 to exactly one character, so decoding
//! never fails and character offsets equal byte offsets.

/// Decode bytes as Latin-1.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode text as Latin-1. Characters outside the range become `?`.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_byte_decodes() {
        let all: Vec<u8> = (0..=255).collect();
        let text = decode_latin1(&all);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(encode_latin1(&text), all);
    }

    #[test]
    fn test_wism_hostname() {
        // 0xE9 is 'é' in Latin-1 and invalid on its own in UTF-8
        let text = decode_latin1(b"caf\xe9-wism>");
        assert_eq!(text, "café-wism>");
    }

    #[test]
    fn test_unencodable_chars() {
        assert_eq!(encode_latin1("show int → desc"), b"show int ? desc");
    }
}
