//! Share token signing and verification

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use specdock_core::{Result, SharePayload, SharePermissions, SpecdockError};
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies share tokens with a process-wide secret.
///
/// Verification is a total function: malformed input, a bad signature and an
/// expired payload all yield `None`, indistinguishably, so the caller leaks
/// nothing about which check failed.
#[derive(Clone)]
pub struct ShareTokenService {
    secret: Vec<u8>,
}

impl std::fmt::Debug for ShareTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret
        f.debug_struct("ShareTokenService").finish_non_exhaustive()
    }
}

impl ShareTokenService {
    /// Create a service from the configured secret.
    ///
    /// An empty secret is a configuration error. There is no fallback:
    /// startup must fail instead of minting forgeable tokens.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SpecdockError::config_error(
                "share token secret must not be empty",
            ));
        }
        Ok(Self { secret })
    }

    /// Mint a signed token granting `permissions` on one document.
    ///
    /// `expiry_hours` may be zero or negative; the resulting token is already
    /// expired and will never verify. That is legal input, not an error.
    pub fn create_share_token(
        &self,
        document_id: &str,
        user_id: &str,
        expiry_hours: i64,
        permissions: SharePermissions,
    ) -> Result<String> {
        // Saturating math keeps absurd expiry inputs from overflowing.
        let expires_at = Utc::now()
            .timestamp_millis()
            .saturating_add(expiry_hours.saturating_mul(3_600_000));
        let payload = SharePayload {
            document_id: document_id.to_string(),
            user_id: user_id.to_string(),
            expires_at,
            permissions,
        };

        let json = serde_json::to_vec(&payload)
            .map_err(|e| SpecdockError::token_error(format!("payload encoding: {e}")))?;
        let payload_b64 = BASE64.encode(json);
        let signature = BASE64.encode(self.sign(payload_b64.as_bytes()));

        Ok(format!("{payload_b64}.{signature}"))
    }

    /// Verify a token and return its payload, or `None` if the token is
    /// malformed, tampered with or expired.
    pub fn verify_share_token(&self, token: &str) -> Option<SharePayload> {
        let mut parts = token.split('.');
        let (payload_b64, signature_b64) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(s), None) if !p.is_empty() && !s.is_empty() => (p, s),
            _ => {
                debug!("share token rejected: malformed");
                return None;
            }
        };

        // Constant-time comparison via Mac::verify_slice.
        let signature = BASE64.decode(signature_b64).ok()?;
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(payload_b64.as_bytes());
        if mac.verify_slice(&signature).is_err() {
            debug!("share token rejected: signature mismatch");
            return None;
        }

        let json = BASE64.decode(payload_b64).ok()?;
        let payload: SharePayload = serde_json::from_slice(&json).ok()?;

        if Utc::now().timestamp_millis() > payload.expires_at {
            debug!("share token rejected: expired");
            return None;
        }

        Some(payload)
    }

    /// Build the public share URL for a token.
    pub fn share_url(&self, base_url: &str, token: &str) -> String {
        format!("{}/share/{}", base_url.trim_end_matches('/'), token)
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        // new_from_slice only fails on an empty key, which new() rules out.
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("secret validated at construction"));
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ShareTokenService {
        ShareTokenService::new("test-secret-please-rotate").unwrap()
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(ShareTokenService::new("").is_err());
        assert!(ShareTokenService::new(Vec::new()).is_err());
    }

    #[test]
    fn round_trip_preserves_payload() {
        let svc = service();
        let perms = SharePermissions {
            can_view: true,
            can_edit: true,
            can_download: false,
        };
        let token = svc
            .create_share_token("doc-42", "user-7", 24, perms)
            .unwrap();

        let payload = svc.verify_share_token(&token).unwrap();
        assert_eq!(payload.document_id, "doc-42");
        assert_eq!(payload.user_id, "user-7");
        assert_eq!(payload.permissions, perms);
        assert!(payload.expires_at > Utc::now().timestamp_millis());
    }

    #[test]
    fn default_permissions_round_trip() {
        let svc = service();
        let token = svc
            .create_share_token("doc-1", "user-1", 1, SharePermissions::default())
            .unwrap();
        let payload = svc.verify_share_token(&token).unwrap();
        assert!(payload.permissions.can_view);
        assert!(!payload.permissions.can_edit);
        assert!(payload.permissions.can_download);
    }

    #[test]
    fn token_shape_is_payload_dot_signature() {
        let svc = service();
        let token = svc
            .create_share_token("doc-1", "user-1", 1, SharePermissions::default())
            .unwrap();
        let parts: Vec<_> = token.split('.').collect();
        assert_eq!(parts.len(), 2);
        assert!(!parts[0].is_empty());
        assert!(!parts[1].is_empty());

        // The payload half is plain base64url JSON with the fixed field names.
        let json = BASE64.decode(parts[0]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert!(value.get("documentId").is_some());
        assert!(value.get("userId").is_some());
        assert!(value["expiresAt"].is_i64());
        assert!(value["permissions"].get("canView").is_some());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let svc = service();
        let token = svc
            .create_share_token("doc-1", "user-1", 24, SharePermissions::default())
            .unwrap();

        let dot = token.find('.').unwrap();
        // Flip each character of the signature in turn; every variant must fail.
        for i in dot + 1..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert!(
                svc.verify_share_token(&tampered).is_none(),
                "tampered signature at index {i} verified"
            );
        }
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let svc = service();
        let token = svc
            .create_share_token("doc-1", "user-1", 24, SharePermissions::default())
            .unwrap();
        let (payload_b64, signature) = token.split_once('.').unwrap();

        // Re-encode a payload claiming a different document, keep the old
        // signature.
        let mut payload: SharePayload =
            serde_json::from_slice(&BASE64.decode(payload_b64).unwrap()).unwrap();
        payload.document_id = "doc-2".to_string();
        let forged_payload = BASE64.encode(serde_json::to_vec(&payload).unwrap());
        let forged = format!("{forged_payload}.{signature}");

        assert!(svc.verify_share_token(&forged).is_none());
    }

    #[test]
    fn negative_expiry_yields_already_expired_token() {
        let svc = service();
        let token = svc
            .create_share_token("doc-1", "user-1", -1, SharePermissions::default())
            .unwrap();
        assert!(svc.verify_share_token(&token).is_none());
    }

    #[test]
    fn zero_expiry_yields_already_expired_token() {
        let svc = service();
        let token = svc
            .create_share_token("doc-1", "user-1", 0, SharePermissions::default())
            .unwrap();
        // expires_at == now at creation; by verification time now > expires_at.
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(svc.verify_share_token(&token).is_none());
    }

    #[test]
    fn malformed_tokens_return_none_without_panicking() {
        let svc = service();
        for input in [
            "",
            "not-a-token",
            ".",
            "..",
            "a.",
            ".b",
            "a.b.c",
            "!!!.???",
            "aGVsbG8.not!base64url",
        ] {
            assert!(svc.verify_share_token(input).is_none(), "{input:?} verified");
        }
    }

    #[test]
    fn token_from_different_secret_is_rejected() {
        let svc_a = ShareTokenService::new("secret-a").unwrap();
        let svc_b = ShareTokenService::new("secret-b").unwrap();
        let token = svc_a
            .create_share_token("doc-1", "user-1", 24, SharePermissions::default())
            .unwrap();
        assert!(svc_b.verify_share_token(&token).is_none());
        assert!(svc_a.verify_share_token(&token).is_some());
    }

    #[test]
    fn share_url_joins_cleanly() {
        let svc = service();
        assert_eq!(
            svc.share_url("https://docs.example.com", "abc.def"),
            "https://docs.example.com/share/abc.def"
        );
        assert_eq!(
            svc.share_url("https://docs.example.com/", "abc.def"),
            "https://docs.example.com/share/abc.def"
        );
    }
}
