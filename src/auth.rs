use base64::engine::{general_purpose, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use tracing::debug;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Session token utilities standing in for the platform's session layer.
///
/// Tokens are `base64url(user_id:issued_at:nonce).hex_hmac` signed with the
/// service-wide `SESSION_SECRET`. The waiting room only needs to recover an
/// authenticated user id for the organizer check; session lifetime policy
/// belongs to the platform, not this service.
pub struct SessionAuth;

impl SessionAuth {
    /// Generate a random nonce for session tokens
    pub fn generate_nonce() -> String {
        rand::thread_rng().gen_range(10000000..99999999).to_string()
    }

    /// Get current timestamp in seconds
    pub fn get_timestamp() -> i64 {
        Utc::now().timestamp()
    }

    fn sign(secret: &str, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Issue a signed session token for a user id
    pub fn issue_token(secret: &str, user_id: i64) -> String {
        let payload = format!(
            "{}:{}:{}",
            user_id,
            Self::get_timestamp(),
            Self::generate_nonce()
        );

        debug!("Issuing session token for user {}", user_id);

        let signature = Self::sign(secret, &payload);
        let encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{}.{}", encoded, signature)
    }

    /// Verify a session token and return the embedded user id.
    /// Returns None for malformed tokens or signature mismatches.
    pub fn verify_token(secret: &str, token: &str) -> Option<i64> {
        let (encoded, signature) = token.split_once('.')?;

        let payload_bytes = general_purpose::URL_SAFE_NO_PAD.decode(encoded).ok()?;
        let payload = String::from_utf8(payload_bytes).ok()?;

        let expected = hex::decode(signature).ok()?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&expected).ok()?;

        payload.split(':').next()?.parse::<i64>().ok()
    }
}
