//! Short identifiers for tracked files.

const ID_LENGTH: usize = 7;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a short opaque token (7 lowercase base-36 characters).
///
/// Tokens are drawn from the random bits of a v4 UUID. They are unique
/// enough to key a list of uploads, not to serve as global identifiers.
pub fn generate_id() -> String {
    let mut bits = uuid::Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(ID_LENGTH);
    for _ in 0..ID_LENGTH {
        id.push(ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    id
}
