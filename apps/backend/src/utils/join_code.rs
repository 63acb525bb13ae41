//! Join code generation for game sessions.
//!
//! Codes are 6-character strings over Crockford's Base32 alphabet: short
//! enough to share out loud, with the lookalike letters removed. Uniqueness
//! among live sessions is the registry's job, not this function's.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U
const CODE_LEN: usize = 6;

pub fn generate_join_code() -> String {
    let mut rng = rand::rng();
    let mut s = String::with_capacity(CODE_LEN);
    for _ in 0..CODE_LEN {
        s.push(CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_expected_length_and_alphabet() {
        let code = generate_join_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(code.bytes().all(|b| CROCKFORD.contains(&b)));
    }

    #[test]
    fn codes_differ_between_calls() {
        // Collisions are possible but vanishingly unlikely across a handful
        // of draws.
        let codes: std::collections::HashSet<String> =
            (0..8).map(|_| generate_join_code()).collect();
        assert!(codes.len() > 1);
    }
}
