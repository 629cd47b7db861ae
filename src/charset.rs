//! IBIS character set
//!
//! Displays only understand 7-bit ASCII. German umlauts and sharp s are sent as the ASCII
//! characters which the national variant of ISO 646 (DIN 66003) puts in their place.
use heapless::Vec;

/// Source characters and the byte they are sent as
pub const SUBSTITUTIONS: [(char, u8); 7] = [
    ('ä', b'{'),
    ('ö', b'|'),
    ('ü', b'}'),
    ('ß', b'~'),
    ('Ä', b'['),
    ('Ö', b'\\'),
    ('Ü', b']'),
];

/// Returns the wire byte for `c`, or `None` when `c` cannot be displayed.
///
/// Printable ASCII (0x20 - 0x7e) is sent as is.
pub fn to_wire(c: char) -> Option<u8> {
    if (' '..='~').contains(&c) {
        return Some(c as u8);
    }
    SUBSTITUTIONS
        .iter()
        .find(|(source, _)| *source == c)
        .map(|(_, substitute)| *substitute)
}

/// Replaces the German special characters in `text` and appends the result to `buf`.
///
/// On error `buf` may contain part of `text`. The offending character is returned in
/// [`NormalizeError::UnsupportedCharacter`].
pub fn normalize_into<const N: usize>(
    text: &str,
    buf: &mut Vec<u8, N>,
) -> Result<(), NormalizeError> {
    for c in text.chars() {
        let byte = to_wire(c).ok_or(NormalizeError::UnsupportedCharacter(c))?;
        buf.push(byte).map_err(|_| NormalizeError::BufferFull)?;
    }
    Ok(())
}

/// Length of `text` once normalized, i.e. the number of characters
pub fn normalized_len(text: &str) -> usize {
    text.chars().count()
}

#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum NormalizeError {
    UnsupportedCharacter(char),
    BufferFull,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_unchanged() {
        let mut buf = Vec::<u8, 32>::new();
        normalize_into("Hauptbahnhof 12", &mut buf).unwrap();
        assert_eq!(&buf[..], b"Hauptbahnhof 12");
    }

    #[test]
    fn test_all_special_characters_in_place() {
        let mut buf = Vec::<u8, 32>::new();
        normalize_into("aäoöuüsßAÄOÖUÜ", &mut buf).unwrap();
        assert_eq!(&buf[..], b"a{o|u}s~A[O\\U]");
        assert!(buf.iter().all(|b| b.is_ascii()));
    }

    #[test]
    fn test_real_destination() {
        let mut buf = Vec::<u8, 32>::new();
        normalize_into("München Straßberg", &mut buf).unwrap();
        assert_eq!(&buf[..], b"M}nchen Stra~berg");
        assert_eq!(buf.len(), normalized_len("München Straßberg"));
    }

    #[test]
    fn test_unsupported_character() {
        let mut buf = Vec::<u8, 32>::new();
        assert_eq!(
            normalize_into("Café", &mut buf),
            Err(NormalizeError::UnsupportedCharacter('é'))
        );
        assert_eq!(
            normalize_into("a\tb", &mut buf),
            Err(NormalizeError::UnsupportedCharacter('\t'))
        );
    }

    #[test]
    fn test_buffer_full() {
        let mut buf = Vec::<u8, 3>::new();
        assert_eq!(
            normalize_into("Ölweg", &mut buf),
            Err(NormalizeError::BufferFull)
        );
    }

    #[test]
    fn test_to_wire() {
        assert_eq!(to_wire(' '), Some(b' '));
        assert_eq!(to_wire('~'), Some(b'~'));
        assert_eq!(to_wire('ß'), Some(b'~'));
        assert_eq!(to_wire('\n'), None);
        assert_eq!(to_wire('\u{7f}'), None);
        assert_eq!(to_wire('€'), None);
    }
}
