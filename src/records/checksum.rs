// Additive frame checksum
//
// The radio picks the trailing byte so that, over the whole frame
// including that byte, ((sum - 1) ^ 0xFF) & 0xFF == 0.

/// Left-hand side of the checksum identity; zero for an intact frame
pub fn residue(buffer: &[u8]) -> u8 {
    let sum = buffer
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)));
    ((sum.wrapping_sub(1) ^ 0xFF) & 0xFF) as u8
}

/// Check a complete frame, trailer included
pub fn validate(buffer: &[u8]) -> bool {
    residue(buffer) == 0
}

/// Trailer byte that makes `payload` followed by it validate
pub fn checksum_byte(payload: &[u8]) -> u8 {
    let sum = payload
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)));
    (0xFFu32.wrapping_sub(sum.wrapping_sub(1)) & 0xFF) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_frames() {
        // 0x0C + 0x40 + 0x40 = 0x8C; a 0x74 trailer brings the sum to 0x100
        assert_eq!(checksum_byte(&[0x0C, 0x40, 0x40]), 0x74);
        assert!(validate(&[0x0C, 0x40, 0x40, 0x74]));
        assert!(!validate(&[0x0C, 0x40, 0x40, 0x75]));
        assert_eq!(residue(&[0x0C, 0x40, 0x40, 0x75]), 0xFF);
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(checksum_byte(&[]), 0x00);
        assert!(validate(&[]));
    }

    #[test]
    fn test_single_byte_change_fails() {
        let mut frame = vec![0x0C, 0x00, 0x40, 0x0E, 0x00, 0x28];
        frame.push(checksum_byte(&frame));
        assert!(validate(&frame));

        frame[4] ^= 0x01;
        assert!(!validate(&frame));
    }

    proptest! {
        #[test]
        fn prop_constructed_trailer_validates(
            payload in proptest::collection::vec(any::<u8>(), 0..140),
        ) {
            let mut frame = payload.clone();
            frame.push(checksum_byte(&payload));
            prop_assert!(validate(&frame));
        }

        #[test]
        fn prop_validate_matches_identity(
            buffer in proptest::collection::vec(any::<u8>(), 0..140),
        ) {
            let sum: i64 = buffer.iter().map(|&b| i64::from(b)).sum();
            let expected = ((sum - 1) ^ 0xFF) & 0xFF == 0;
            prop_assert_eq!(validate(&buffer), expected);
        }

        #[test]
        fn prop_payload_corruption_detected(
            payload in proptest::collection::vec(any::<u8>(), 1..80),
            index in any::<prop::sample::Index>(),
            delta in 1u8..=255,
        ) {
            let mut frame = payload.clone();
            frame.push(checksum_byte(&payload));
            let i = index.index(payload.len());
            frame[i] = frame[i].wrapping_add(delta);
            prop_assert!(!validate(&frame));
        }
    }
}
