//! Accounts and session management.
//!
//! Passwords are stored as Argon2id hashes. Sessions are HMAC-signed cookies
//! carrying the user id; nothing about a session is stored server-side.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum_extra::extract::CookieJar;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::LazyLock;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::models::User;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Session cookie name
pub const SESSION_COOKIE: &str = "thinknotes_session";

/// Session time-to-live in hours
pub const SESSION_TTL_HOURS: i64 = 24;

pub const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// Session Structure
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Session {
    user_id: String,
    created: i64,
    expires: i64,
    nonce: String,
}

/// Generate a random signing key for when none is configured.
pub fn random_secret() -> Vec<u8> {
    let mut key = vec![0u8; 32];
    rand::thread_rng().fill(&mut key[..]);
    key
}

// ============================================================================
// Password Hashing
// ============================================================================

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Hash checked when a login names no account, so an unknown email costs
/// the same Argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("not-a-real-password").unwrap_or_default());

/// Full verification against [`DUMMY_HASH`]. Always `false`.
pub fn verify_unknown_user(password: &str) -> bool {
    let _ = verify_password(password, &DUMMY_HASH);
    false
}

// ============================================================================
// Registration Input
// ============================================================================

pub fn validate_registration(email: &str, password: &str, confirm: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Please enter a valid email address".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if password != confirm {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }
    Ok(())
}

// ============================================================================
// Session Tokens
// ============================================================================

/// Create a signed session token for `user_id`
pub fn create_session(user_id: &str, secret: &[u8]) -> Option<String> {
    let now = Utc::now().timestamp();
    let nonce: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();

    let session = Session {
        user_id: user_id.to_string(),
        created: now,
        expires: now + (SESSION_TTL_HOURS * 3600),
        nonce,
    };
    let session_json = serde_json::to_string(&session).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(session_json.as_bytes());
    let signature = hex_encode(mac.finalize().into_bytes().as_slice());

    Some(format!("{}.{}", base64_encode(&session_json), signature))
}

/// Verify a session token, returning the user id it was issued for
pub fn verify_session(token: &str, secret: &[u8]) -> Option<String> {
    let (payload, sig) = token.split_once('.')?;
    if sig.contains('.') {
        return None;
    }

    let session_json = base64_decode(payload)?;

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(session_json.as_bytes());
    let expected_sig = hex_encode(mac.finalize().into_bytes().as_slice());

    // Constant-time comparison
    let sig_bytes = sig.as_bytes();
    let expected_bytes = expected_sig.as_bytes();
    if sig_bytes.len() != expected_bytes.len() || sig_bytes.ct_eq(expected_bytes).unwrap_u8() != 1 {
        return None;
    }

    let session: Session = serde_json::from_str(&session_json).ok()?;
    if Utc::now().timestamp() < session.expires {
        Some(session.user_id)
    } else {
        None
    }
}

/// Resolve the session cookie to a user, if any.
pub fn current_user(state: &AppState, jar: &CookieJar) -> Option<User> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let user_id = verify_session(cookie.value(), &state.session_secret)?;
    match state.store.get_user(&user_id) {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("failed to load session user: {}", e);
            None
        }
    }
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_TTL_HOURS * 3600
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

// ============================================================================
// Encoding Helpers
// ============================================================================

pub fn base64_encode(s: &str) -> String {
    STANDARD.encode(s.as_bytes())
}

pub fn base64_decode(s: &str) -> Option<String> {
    let bytes = STANDARD.decode(s).ok()?;
    String::from_utf8(bytes).ok()
}

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_session_roundtrip() {
        let token = create_session("user42", SECRET).unwrap();
        assert_eq!(verify_session(&token, SECRET).as_deref(), Some("user42"));
    }

    #[test]
    fn test_session_rejects_wrong_secret() {
        let token = create_session("user42", SECRET).unwrap();
        assert!(verify_session(&token, b"other").is_none());
    }

    #[test]
    fn test_session_rejects_tampered_payload() {
        let token = create_session("user42", SECRET).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!(
            "{}.{}",
            base64_encode(r#"{"user_id":"admin","created":0,"expires":99999999999,"nonce":"x"}"#),
            sig
        );
        assert!(verify_session(&forged, SECRET).is_none());
        assert!(verify_session("garbage", SECRET).is_none());
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-hash"));
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration("a@b.c", "secret12", "secret12").is_ok());
        assert!(validate_registration("nope", "secret12", "secret12").is_err());
        assert!(validate_registration("a@b.c", "short", "short").is_err());
        assert!(validate_registration("a@b.c", "abcdefg", "abcdefg").is_err());
        assert!(validate_registration("a@b.c", "secret12", "secreT12").is_err());
    }

    #[test]
    fn test_unknown_user_runs_real_verification() {
        assert!(PasswordHash::new(&DUMMY_HASH).is_ok());
        assert!(!verify_unknown_user("not-a-real-password"));
        assert!(!verify_unknown_user("anything"));
    }
}
