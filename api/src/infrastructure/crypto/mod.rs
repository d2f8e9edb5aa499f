use rand::RngCore;

pub const TOKEN_KEY_BYTES: usize = 20;

/// A fresh opaque token key: 40 lowercase hex characters.
pub fn generate_token_key() -> String {
    let mut bytes = [0u8; TOKEN_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_forty_hex_chars() {
        let key = generate_token_key();
        assert_eq!(key.len(), 40);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn keys_differ() {
        assert_ne!(generate_token_key(), generate_token_key());
    }
}
