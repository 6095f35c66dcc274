//! Short random id minting.

use rand::Rng;
use std::collections::HashSet;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 7;

/// Mint a 7 character base-36 id that is not yet in `taken`, and reserve it.
pub fn mint_unique_id(taken: &mut HashSet<String>) -> String {
    let mut rng = rand::rng();
    loop {
        let id: String = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        if taken.insert(id.clone()) {
            return id;
        }
    }
}
