//! TP-Link Smart Home wire format.
//!
//! Every message is a 4-byte big-endian length followed by the JSON body
//! scrambled with an XOR autokey cipher: the key starts at 171 and each
//! ciphertext byte becomes the key for the next one.

/// Initial key of the autokey cipher.
pub const INITIAL_KEY: u8 = 171;

/// Size of the length prefix in front of every message.
pub const HEADER_LEN: usize = 4;

/// Scramble `plain` and prepend its length.
#[must_use]
pub fn encode(plain: &[u8]) -> Vec<u8> {
    let len = u32::try_from(plain.len()).unwrap_or(u32::MAX);
    let mut frame = Vec::with_capacity(HEADER_LEN + plain.len());
    frame.extend_from_slice(&len.to_be_bytes());
    let mut key = INITIAL_KEY;
    for &byte in plain {
        key ^= byte;
        frame.push(key);
    }
    frame
}

/// Unscramble a message body, without its length prefix.
#[must_use]
pub fn decrypt(body: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    body.iter()
        .map(|&byte| {
            let plain = key ^ byte;
            key = byte;
            plain
        })
        .collect()
}

/// Body length announced by a message header.
#[must_use]
pub fn body_len(header: [u8; HEADER_LEN]) -> usize {
    usize::try_from(u32::from_be_bytes(header)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_prefix_body_length_big_endian() {
        let frame = encode(br#"{"system":{"set_relay_state":{"state":1}}}"#);
        assert_eq!(&frame[..HEADER_LEN], &[0, 0, 0, 42]);
        assert_eq!(frame.len(), HEADER_LEN + 42);
    }

    #[test]
    fn should_chain_key_through_ciphertext() {
        let frame = encode(br#"{"system""#);
        assert_eq!(
            &frame[HEADER_LEN..],
            &[0xd0, 0xf2, 0x81, 0xf8, 0x8b, 0xff, 0x9a, 0xf7, 0xd5]
        );
        assert_eq!(encode(b"{}"), [0, 0, 0, 2, 208, 173]);
    }

    #[test]
    fn should_recover_plain_text() {
        let plain = br#"{"system":{"get_sysinfo":{"relay_state":1}}}"#;
        let frame = encode(plain);
        let header: [u8; HEADER_LEN] = frame[..HEADER_LEN].try_into().unwrap();
        assert_eq!(body_len(header), plain.len());
        assert_eq!(decrypt(&frame[HEADER_LEN..]), plain);
    }

    #[test]
    fn should_handle_empty_body() {
        assert_eq!(encode(b""), [0, 0, 0, 0]);
        assert!(decrypt(&[]).is_empty());
    }
}
