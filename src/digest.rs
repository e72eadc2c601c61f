use crc32fast::Hasher;

/// Seeded 32-bit digest over a byte sequence.
///
/// Contract: pure and deterministic — equal `(seed, bytes)` inputs always
/// produce equal digests. Collisions are expected; every consumer pairs a
/// digest comparison with an exact byte comparison and never assumes
/// uniqueness.
#[inline]
pub(crate) fn digest(seed: u32, bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(seed);
    hasher.update(bytes);
    hasher.finalize()
}

#[cfg(test)]
mod digest_tests {
    use super::digest;

    #[test]
    fn test_digest_deterministic() {
        assert_eq!(digest(0xdead_beef, b"YXQXXDIP"), digest(0xdead_beef, b"YXQXXDIP"));
    }

    #[test]
    fn test_digest_seed_dependent() {
        assert_ne!(digest(0, b"YXQXXDIP"), digest(1, b"YXQXXDIP"));
    }

    #[test]
    fn test_digest_input_dependent() {
        assert_ne!(digest(0, b"YXQXXDIP"), digest(0, b"BSWANXGU"));
    }

    #[test]
    fn test_digest_empty_input() {
        assert_eq!(digest(7, b""), digest(7, b""));
    }
}
