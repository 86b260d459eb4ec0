//! Specdock Share - stateless capability tokens for document sharing
//!
//! A share token lets an unauthenticated holder view (and optionally edit or
//! download) one document until the token expires. Tokens are self-contained:
//! `base64url(JSON payload) + "." + base64url(HMAC-SHA256 signature)`, so
//! verification needs no storage round-trip. The trade-off is
//! non-revocability before expiry, accepted for short-lived share links;
//! rotating the secret invalidates every outstanding token.

pub mod token;

pub use token::ShareTokenService;
