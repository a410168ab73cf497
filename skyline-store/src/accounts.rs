use sha2::{Digest, Sha256};
use skyline_core::account::{Account, Profile};
use skyline_core::{CoreError, CoreResult};
use std::collections::HashMap;
use std::fmt::Write;
use tokio::sync::RwLock;

/// User registration and credential verification. Independent of booking
/// logic; the ledger consumes it only to attribute ownership.
pub struct AccountStore {
    inner: RwLock<Accounts>,
}

struct Accounts {
    next_id: i64,
    by_id: HashMap<i64, Account>,
    id_by_username: HashMap<String, i64>,
}

/// SHA-256 hex digest. Illustrative strength only; the stored value is
/// one-way but unsalted.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Accounts {
                next_id: 1,
                by_id: HashMap::new(),
                id_by_username: HashMap::new(),
            }),
        }
    }

    /// Register a new user; usernames are unique.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        profile: Profile,
    ) -> CoreResult<Account> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CoreError::Validation("username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(CoreError::Validation("password must not be empty".into()));
        }

        let mut inner = self.inner.write().await;
        if inner.id_by_username.contains_key(username) {
            return Err(CoreError::Conflict(format!(
                "username {username} already registered"
            )));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let account = Account {
            id,
            username: username.to_string(),
            password_hash: hash_password(password),
            profile,
        };
        inner.id_by_username.insert(account.username.clone(), id);
        inner.by_id.insert(id, account.clone());

        tracing::info!(account_id = id, username, "account registered");
        Ok(account)
    }

    /// Verify credentials; the error does not reveal whether the username
    /// or the password was wrong.
    pub async fn authenticate(&self, username: &str, password: &str) -> CoreResult<Account> {
        let inner = self.inner.read().await;
        let account = inner
            .id_by_username
            .get(username.trim())
            .and_then(|id| inner.by_id.get(id))
            .ok_or_else(|| CoreError::Unauthorized("invalid username or password".into()))?;

        if account.password_hash != hash_password(password) {
            return Err(CoreError::Unauthorized("invalid username or password".into()));
        }
        Ok(account.clone())
    }

    pub async fn get(&self, account_id: i64) -> CoreResult<Account> {
        let inner = self.inner.read().await;
        inner
            .by_id
            .get(&account_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("account {account_id} not found")))
    }

    /// Display name for history joins; falls back to a placeholder rather
    /// than failing a read-only query.
    pub async fn username(&self, account_id: i64) -> String {
        let inner = self.inner.read().await;
        inner
            .by_id
            .get(&account_id)
            .map(|a| a.username.clone())
            .unwrap_or_else(|| format!("account-{account_id}"))
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_and_authenticate() {
        let store = AccountStore::new();
        let account = store
            .register("alice", "s3cret", Profile::default())
            .await
            .unwrap();
        assert_eq!(account.id, 1);
        assert_ne!(account.password_hash, "s3cret");

        let authed = store.authenticate("alice", "s3cret").await.unwrap();
        assert_eq!(authed.id, account.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let store = AccountStore::new();
        store.register("alice", "a", Profile::default()).await.unwrap();
        assert!(matches!(
            store.register("alice", "b", Profile::default()).await,
            Err(CoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let store = AccountStore::new();
        store.register("alice", "s3cret", Profile::default()).await.unwrap();

        assert!(matches!(
            store.authenticate("alice", "wrong").await,
            Err(CoreError::Unauthorized(_))
        ));
        assert!(matches!(
            store.authenticate("bob", "s3cret").await,
            Err(CoreError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = AccountStore::new();
        let a = store.register("a", "pw", Profile::default()).await.unwrap();
        let b = store.register("b", "pw", Profile::default()).await.unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn digest_is_stable_hex() {
        let digest = hash_password("password");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_password("password"));
        assert_ne!(digest, hash_password("Password"));
    }
}
