//! Reversible compact encoding of integer keys.
//!
//! Keys are written as little-endian digits in base 64: the first character
//! is the least significant digit. The encoding is canonical, so [`decode`]
//! only accepts strings that [`encode`] can produce.

use crate::error::CoreError;

/// The identifier alphabet. A symbol's position is its digit value.
pub const ALPHABET: &[u8; 64] = b"DsUCF6hjX2u5QpolMWaNmLr8keVqzR0_3tn7HdOyJbZTI1AgfExB4SP9GiwYcvK-";

const BASE: u64 = ALPHABET.len() as u64;

/// Longest canonical encoding of a `u64`.
pub const MAX_ENCODED_LEN: usize = 11;

const NOT_A_DIGIT: u8 = u8::MAX;

const DIGITS: [u8; 128] = {
    let mut table = [NOT_A_DIGIT; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Returns the symbol for a digit value in `0..64`.
///
/// # Panics
///
/// Panics if `value >= 64`.
pub fn symbol(value: u8) -> char {
    char::from(ALPHABET[value as usize])
}

/// Returns the digit value of `c`, or `None` if `c` is not in the alphabet.
pub fn digit(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match DIGITS[c as usize] {
        NOT_A_DIGIT => None,
        value => Some(value),
    }
}

/// Encodes `n` as its shortest string over [`ALPHABET`].
///
/// `0` encodes to the first alphabet symbol.
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return symbol(0).to_string();
    }

    let mut encoded = String::with_capacity(MAX_ENCODED_LEN);
    while n > 0 {
        encoded.push(symbol((n % BASE) as u8));
        n /= BASE;
    }
    encoded
}

/// Decodes a canonical encoding back into its integer key.
///
/// Fails with [`CoreError::InvalidIdentifier`] when the input is empty,
/// contains a symbol outside the alphabet, ends in a zero digit (a
/// non-canonical form `encode` never produces) or does not fit in a `u64`.
pub fn decode(encoded: &str) -> Result<u64, CoreError> {
    if encoded.is_empty() {
        return Err(CoreError::InvalidIdentifier(
            "identifier is empty".to_string(),
        ));
    }

    let mut value: u64 = 0;
    // Walk from the most significant digit so overflow is caught by checked math.
    for (position, c) in encoded.chars().rev().enumerate() {
        let d = digit(c).ok_or_else(|| {
            CoreError::InvalidIdentifier(format!("'{c}' is not in the identifier alphabet"))
        })?;

        if position == 0 && d == 0 && encoded.len() > 1 {
            return Err(CoreError::InvalidIdentifier(format!(
                "'{encoded}' is not a canonical encoding"
            )));
        }

        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(u64::from(d)))
            .ok_or_else(|| {
                CoreError::InvalidIdentifier(format!("'{encoded}' is out of range"))
            })?;
    }

    Ok(value)
}

/// Returns `true` if `encoded` is exactly what [`encode`] produces for some key.
pub fn is_canonical(encoded: &str) -> bool {
    decode(encoded).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn alphabet_has_64_distinct_symbols() {
        let mut seen = std::collections::HashSet::new();
        for &b in ALPHABET.iter() {
            assert!(seen.insert(b), "duplicate symbol {}", b as char);
        }
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn zero_encodes_to_first_symbol() {
        assert_eq!(encode(0), "D");
        assert_eq!(decode("D").unwrap(), 0);
    }

    #[test]
    fn digits_are_little_endian() {
        assert_eq!(encode(1), "s");
        assert_eq!(encode(63), "-");
        // 64 = 0 + 1 * 64
        assert_eq!(encode(64), "Ds");
        assert_eq!(decode("Ds").unwrap(), 64);
        // 65 = 1 + 1 * 64
        assert_eq!(encode(65), "ss");
    }

    #[test]
    fn decode_inverts_encode() {
        let samples = [
            0,
            1,
            2,
            63,
            64,
            4095,
            4096,
            262_143,
            1_000_000,
            123_456_789_012,
            u64::from(u32::MAX),
            u64::MAX - 1,
            u64::MAX,
        ];
        for n in samples {
            assert_eq!(decode(&encode(n)).unwrap(), n, "round trip of {n}");
        }
    }

    #[test]
    fn max_value_uses_eleven_symbols() {
        let encoded = encode(u64::MAX);
        assert_eq!(encoded.len(), MAX_ENCODED_LEN);
        assert_eq!(encoded, "----------l");
    }

    #[test]
    fn rejects_symbols_outside_alphabet() {
        for input in ["+abc", "ab~", "a.b", "a b", "ab/", "é", "a\u{1F600}"] {
            let err = decode(input).unwrap_err();
            assert!(matches!(err, CoreError::InvalidIdentifier(_)), "{input}");
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            decode("").unwrap_err(),
            CoreError::InvalidIdentifier(_)
        ));
    }

    #[test]
    fn rejects_trailing_zero_digit() {
        // "sD" would decode to 1, which canonically is "s".
        assert!(decode("sD").is_err());
        assert!(decode("DD").is_err());
        assert!(!is_canonical("sD"));
        assert!(is_canonical("s"));
    }

    #[test]
    fn rejects_overflow() {
        assert!(decode("-----------").is_err());
        assert!(decode("DDDDDDDDDDDs").is_err());
    }

    #[test]
    fn canonical_strings_survive_decode_then_encode() {
        for s in ["D", "s", "Ds", "hello", "Q_-9", "----------l"] {
            assert_eq!(encode(decode(s).unwrap()), s);
        }
    }

    proptest! {
        #[test]
        fn encode_then_decode_is_identity(n in any::<u64>()) {
            let encoded = encode(n);
            prop_assert!(encoded.len() <= MAX_ENCODED_LEN);
            prop_assert!(is_canonical(&encoded));
            prop_assert_eq!(decode(&encoded).unwrap(), n);
        }

        #[test]
        fn decoded_strings_encode_back(s in "[A-Za-z0-9_-]{1,12}") {
            // Anything decode accepts must be exactly what encode produces.
            if let Ok(n) = decode(&s) {
                prop_assert_eq!(encode(n), s);
            }
        }

        #[test]
        fn digit_strings_without_trailing_zero_decode(
            digits in prop::collection::vec(0u8..64, 0..=9),
            top in 1u8..64,
        ) {
            let mut s: String = digits.iter().map(|&d| symbol(d)).collect();
            s.push(symbol(top));
            let n = decode(&s).unwrap();
            prop_assert_eq!(encode(n), s);
        }
    }
}
