use rand::Rng;

pub const ID_LENGTH: usize = 8;

pub const URL_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Random URL-safe id. `thread_rng` is a CSPRNG, reseeded from the OS.
pub fn generate(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| URL_ALPHABET[rng.gen_range(0..URL_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_length_and_alphabet() {
        for _ in 0..200 {
            let id = generate(ID_LENGTH);
            assert_eq!(id.len(), ID_LENGTH);
            assert!(id.bytes().all(|b| URL_ALPHABET.contains(&b)), "unexpected char in {id}");
        }
    }

    #[test]
    fn test_generate_is_unlikely_to_collide() {
        let ids: HashSet<String> = (0..1000).map(|_| generate(ID_LENGTH)).collect();
        assert_eq!(ids.len(), 1000);
    }
}
