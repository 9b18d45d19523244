//! Room code generation and parsing.
//!
//! Room codes are 6-character strings using Crockford's Base32 alphabet.

use rand::Rng;

use crate::domain::SessionId;
use crate::errors::domain::{DomainError, ValidationKind};

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const ROOM_CODE_LEN: usize = 6;

/// Generate a random room code.
///
/// # Example
/// ```
/// use threeup::game::room_code::{generate_room_code, ROOM_CODE_LEN};
///
/// let code = generate_room_code(&mut rand::rng());
/// assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
/// ```
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> SessionId {
    let mut s = String::with_capacity(ROOM_CODE_LEN);
    for _ in 0..ROOM_CODE_LEN {
        s.push(CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char);
    }
    SessionId::new(s)
}

/// Parse a room code typed by a user. Case-insensitive; surrounding
/// whitespace is ignored.
pub fn parse_room_code(raw: &str) -> Result<SessionId, DomainError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() != ROOM_CODE_LEN || !code.bytes().all(|b| CROCKFORD.contains(&b)) {
        return Err(DomainError::validation(
            ValidationKind::InvalidRoomCode,
            format!("{raw:?} is not a room code"),
        ));
    }
    Ok(SessionId::new(code))
}
