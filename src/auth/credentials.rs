//! Persisted bearer-credential slot.
//!
//! One fixed storage slot holds at most one access token for the whole
//! client, persisted across runs in `token.json` under the storage
//! directory. The slot is the sole source of truth for "possibly
//! authenticated": the session layer and the transport both read it, and a
//! 401 clears it.
//!
//! Expiry is checked by decoding the token's payload segment locally. The
//! signature is NOT verified here; the backend validates it on every
//! request, the client only inspects the `exp` claim. A token that cannot
//! be decoded counts as absent.
//!
//! Every mutation bumps a monotonically increasing epoch. In-flight
//! requests capture the epoch they were sent under, and rejection handling
//! only clears the slot while the epoch is unchanged. That keeps a stale
//! 401 from clobbering a credential obtained by a newer login, and makes
//! the expired-session side effect fire exactly once when several requests
//! fail together.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the single credential slot.
const TOKEN_FILE: &str = "token.json";

/// Claims inspected client-side. Everything else in the payload is opaque.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiration instant, Unix seconds.
    pub exp: i64,
    /// Subject (user id or username), when present.
    #[serde(default)]
    pub sub: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PersistedSlot {
    access_token: String,
}

struct Slot {
    token: Option<String>,
    epoch: u64,
}

/// File-backed single-slot credential store.
pub struct CredentialStore {
    path: PathBuf,
    slot: Mutex<Slot>,
}

impl CredentialStore {
    /// Open the slot under `storage_dir`, loading any persisted token.
    /// Construction never fails: unreadable or malformed state is treated
    /// as an empty slot.
    pub fn open(storage_dir: &Path) -> Self {
        if let Err(err) = std::fs::create_dir_all(storage_dir) {
            tracing::warn!("Could not create storage dir {}: {err}", storage_dir.display());
        }
        let path = storage_dir.join(TOKEN_FILE);

        let token = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<PersistedSlot>(&raw).ok())
            .map(|slot| slot.access_token);

        Self {
            path,
            slot: Mutex::new(Slot { token, epoch: 0 }),
        }
    }

    /// Store a new credential, replacing any previous one.
    pub fn set(&self, token: &str) {
        {
            let mut slot = self.slot.lock();
            slot.token = Some(token.to_string());
            slot.epoch += 1;
        }
        self.persist(Some(token));
    }

    /// The stored credential, if any. Never errors.
    pub fn get(&self) -> Option<String> {
        self.slot.lock().token.clone()
    }

    /// Remove the credential unconditionally.
    pub fn clear(&self) {
        {
            let mut slot = self.slot.lock();
            slot.token = None;
            slot.epoch += 1;
        }
        self.persist(None);
    }

    /// Whether a credential is stored and its `exp` claim is in the future.
    /// Malformed tokens count as invalid, never as an error.
    pub fn is_valid(&self) -> bool {
        match self.get() {
            Some(token) => match decode_claims(&token) {
                Some(claims) => claims.exp > chrono::Utc::now().timestamp(),
                None => false,
            },
            None => false,
        }
    }

    /// Current epoch. Bumped on every `set`/`clear`.
    pub fn epoch(&self) -> u64 {
        self.slot.lock().epoch
    }

    /// Atomic read for the request phase: the token (only when currently
    /// valid) together with the epoch it was read under.
    pub fn bearer_snapshot(&self) -> (Option<String>, u64) {
        let (token, epoch) = {
            let slot = self.slot.lock();
            (slot.token.clone(), slot.epoch)
        };
        let valid = token
            .as_deref()
            .and_then(decode_claims_ref)
            .map(|claims| claims.exp > chrono::Utc::now().timestamp())
            .unwrap_or(false);
        (if valid { token } else { None }, epoch)
    }

    /// Clear the slot only if it still holds a token from `seen_epoch`.
    /// Returns whether anything was cleared. A stale epoch (the credential
    /// has been replaced or already cleared since the request went out)
    /// is a no-op.
    pub fn invalidate(&self, seen_epoch: u64) -> bool {
        let cleared = {
            let mut slot = self.slot.lock();
            if slot.token.is_some() && slot.epoch == seen_epoch {
                slot.token = None;
                slot.epoch += 1;
                true
            } else {
                false
            }
        };
        if cleared {
            self.persist(None);
        }
        cleared
    }

    /// Write the slot to disk. Storage failures are logged, not propagated:
    /// the in-memory slot stays authoritative for this run.
    fn persist(&self, token: Option<&str>) {
        let result = match token {
            Some(token) => serde_json::to_string(&PersistedSlot {
                access_token: token.to_string(),
            })
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&self.path, json)),
            None => match std::fs::remove_file(&self.path) {
                Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err),
                _ => Ok(()),
            },
        };
        if let Err(err) = result {
            tracing::warn!("Could not persist credential slot {}: {err}", self.path.display());
        }
    }
}

/// Decode the payload segment of a JWT-shaped token. Returns `None` for
/// anything that is not three dot-separated base64url segments with a JSON
/// payload carrying `exp`.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    decode_claims_ref(token)
}

fn decode_claims_ref(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    // Some issuers pad the segment; the strict no-pad alphabet rejects that.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Forge an unsigned JWT-shaped token with the given payload JSON.
    pub(crate) fn forge_token(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.sig")
    }

    /// Token expiring `offset_secs` from now (negative = already expired).
    pub(crate) fn forge_with_exp(offset_secs: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + offset_secs;
        forge_token(&format!(r#"{{"exp":{exp},"sub":"1"}}"#))
    }

    fn test_store() -> (TempDir, CredentialStore) {
        let tmp = TempDir::new().unwrap();
        let store = CredentialStore::open(tmp.path());
        (tmp, store)
    }

    #[test]
    fn empty_slot_is_absent_and_invalid() {
        let (_tmp, store) = test_store();
        assert!(store.get().is_none());
        assert!(!store.is_valid());
    }

    #[test]
    fn set_get_clear_roundtrip() {
        let (_tmp, store) = test_store();
        store.set("abc");
        assert_eq!(store.get().as_deref(), Some("abc"));
        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn survives_reopen_from_same_dir() {
        let tmp = TempDir::new().unwrap();
        let token = forge_with_exp(3600);
        {
            let store = CredentialStore::open(tmp.path());
            store.set(&token);
        }
        let reopened = CredentialStore::open(tmp.path());
        assert_eq!(reopened.get().as_deref(), Some(token.as_str()));
        assert!(reopened.is_valid());
    }

    #[test]
    fn clear_removes_persisted_state() {
        let tmp = TempDir::new().unwrap();
        {
            let store = CredentialStore::open(tmp.path());
            store.set(&forge_with_exp(3600));
            store.clear();
        }
        let reopened = CredentialStore::open(tmp.path());
        assert!(reopened.get().is_none());
    }

    #[test]
    fn future_exp_is_valid() {
        let (_tmp, store) = test_store();
        store.set(&forge_with_exp(3600));
        assert!(store.is_valid());
    }

    #[test]
    fn past_exp_is_invalid() {
        let (_tmp, store) = test_store();
        store.set(&forge_with_exp(-1));
        assert!(!store.is_valid());
    }

    #[test]
    fn malformed_tokens_are_invalid_not_errors() {
        let (_tmp, store) = test_store();
        for bad in [
            "not-a-jwt",
            "only.two",
            "a.%%%.c",
            &forge_token(r#"{"no_exp_claim":true}"#),
            &forge_token("not json"),
        ] {
            store.set(bad);
            assert!(!store.is_valid(), "token {bad:?} should be invalid");
        }
    }

    #[test]
    fn snapshot_withholds_expired_token_but_reports_epoch() {
        let (_tmp, store) = test_store();
        store.set(&forge_with_exp(-10));
        let (token, epoch) = store.bearer_snapshot();
        assert!(token.is_none());
        assert_eq!(epoch, store.epoch());
    }

    #[test]
    fn invalidate_clears_only_current_epoch() {
        let (_tmp, store) = test_store();
        store.set(&forge_with_exp(3600));
        let (_, stale_epoch) = store.bearer_snapshot();

        // A fresh login replaces the credential; the stale failure must not
        // clobber it.
        let fresh = forge_with_exp(7200);
        store.set(&fresh);
        assert!(!store.invalidate(stale_epoch));
        assert_eq!(store.get().as_deref(), Some(fresh.as_str()));
    }

    #[test]
    fn invalidate_fires_once_for_concurrent_failures() {
        let (_tmp, store) = test_store();
        store.set(&forge_with_exp(3600));
        let (_, epoch) = store.bearer_snapshot();

        assert!(store.invalidate(epoch));
        assert!(!store.invalidate(epoch));
        assert!(store.get().is_none());
    }

    #[test]
    fn invalidate_on_empty_slot_is_noop() {
        let (_tmp, store) = test_store();
        assert!(!store.invalidate(store.epoch()));
    }

    #[test]
    fn decode_claims_reads_exp_and_sub() {
        let token = forge_token(r#"{"exp":1700000000,"sub":"42"}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, 1_700_000_000);
        assert_eq!(claims.sub.as_deref(), Some("42"));
    }

    #[test]
    fn decode_claims_tolerates_padded_segment() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let body = format!("{}==", URL_SAFE_NO_PAD.encode(br#"{"exp":1}"#));
        let claims = decode_claims(&format!("{header}.{body}.sig"));
        assert!(claims.is_some());
    }
}
