//! Fixed-width base-58 decoding
//!
//! Decodes into an exact-size big-endian byte array. The digit table is
//! built at compile time.

use super::CodecError;

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Byte -> digit value, -1 for bytes outside the alphabet
const BASE58_MAP: [i8; 256] = build_base58_map();

const fn build_base58_map() -> [i8; 256] {
    let mut map = [-1i8; 256];
    let mut i = 0;
    while i < BASE58_ALPHABET.len() {
        map[BASE58_ALPHABET[i] as usize] = i as i8;
        i += 1;
    }
    map
}

/// Decode base-58 `text` into exactly `N` bytes
///
/// Shorter values are left-padded with zero bytes. Characters outside the
/// alphabet (`0`, `O`, `I`, `l` and anything non-alphanumeric) are rejected,
/// as is any value that does not fit in `N` bytes.
///
/// # Example
///
/// ```
/// use unregd::codec::decode_base58;
///
/// assert_eq!(decode_base58::<2>("5R").unwrap(), [0x01, 0x00]);
/// ```
pub fn decode_base58<const N: usize>(text: &str) -> Result<[u8; N], CodecError> {
    // Little-endian while accumulating, reversed at the end
    let mut result = [0u8; N];

    for ch in text.chars() {
        let digit = if ch.is_ascii() {
            BASE58_MAP[ch as usize]
        } else {
            -1
        };
        if digit < 0 {
            return Err(CodecError::InvalidBase58Character(ch));
        }

        let mut carry = digit as u32;
        for byte in result.iter_mut() {
            let x = (*byte as u32) * 58 + carry;
            *byte = x as u8;
            carry = x >> 8;
        }
        if carry != 0 {
            return Err(CodecError::Base58OutOfRange(N));
        }
    }

    result.reverse();
    Ok(result)
}
