//! Numeric fields of IBIS telegrams (addresses, block counts)
//!
//! Values are written nibble by nibble using the alphabet `0123456789:;<=>?`, which is simply the
//! ASCII range starting at `'0'`. The high nibble is left out when it is zero, so values below 16
//! take one character and everything else two.
use heapless::Vec;

pub const VDV_HEX_ALPHABET: &[u8; 16] = b"0123456789:;<=>?";

/// Longest possible encoding of a single byte
pub const MAX_VDV_HEX_LENGTH: usize = 2;

pub type VdvHexVec = Vec<u8, MAX_VDV_HEX_LENGTH>;

/// Encodes `value` as 1 or 2 characters of [`VDV_HEX_ALPHABET`]
pub fn encode(value: u8) -> VdvHexVec {
    let high_nibble = value >> 4;
    let low_nibble = value & 0x0f;
    let leading = if high_nibble > 0 {
        Some(high_nibble)
    } else {
        None
    };
    leading
        .into_iter()
        .chain(Some(low_nibble))
        .map(|nibble| VDV_HEX_ALPHABET[nibble as usize])
        .collect()
}

/// Appends the encoding of `value` to `buf`
pub fn encode_into<const N: usize>(value: u8, buf: &mut Vec<u8, N>) -> Result<(), ()> {
    buf.extend_from_slice(&encode(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(encoded: &[u8]) -> u8 {
        encoded.iter().fold(0u8, |acc, c| {
            let nibble = VDV_HEX_ALPHABET.iter().position(|a| a == c).unwrap() as u8;
            (acc << 4) | nibble
        })
    }

    #[test]
    fn test_single_digit() {
        assert_eq!(&encode(0)[..], b"0");
        assert_eq!(&encode(1)[..], b"1");
        assert_eq!(&encode(9)[..], b"9");
    }

    #[test]
    fn test_digits_above_nine() {
        assert_eq!(&encode(10)[..], b":");
        assert_eq!(&encode(11)[..], b";");
        assert_eq!(&encode(12)[..], b"<");
        assert_eq!(&encode(13)[..], b"=");
        assert_eq!(&encode(14)[..], b">");
        assert_eq!(&encode(15)[..], b"?");
    }

    #[test]
    fn test_high_nibble() {
        assert_eq!(&encode(16)[..], b"10");
        assert_eq!(&encode(0x2f)[..], b"2?");
        assert_eq!(&encode(0xa0)[..], b":0");
        assert_eq!(&encode(255)[..], b"??");
    }

    #[test]
    fn test_nibble_boundaries() {
        assert_eq!(&encode(0x0f)[..], b"?");
        assert_eq!(&encode(0x10)[..], b"10");
        assert_eq!(&encode(0xf0)[..], b"?0");
    }

    #[test]
    fn test_length_and_decode_for_all_values() {
        for value in 0..=255u8 {
            let encoded = encode(value);
            let expected_len = if value < 16 { 1 } else { 2 };
            assert_eq!(encoded.len(), expected_len, "value {}", value);
            assert_eq!(decode(&encoded), value);
        }
    }

    #[test]
    fn test_encode_into_appends() {
        let mut buf = Vec::<u8, 4>::from_slice(b"aA").unwrap();
        encode_into(1, &mut buf).unwrap();
        assert_eq!(&buf[..], b"aA1");
        // full buffer, the second digit does not fit
        assert_eq!(encode_into(0x12, &mut buf), Err(()));
    }
}
