//! CLI auth session helpers with secure keychain persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use jeda_core::auth::{AuthClient, SessionError, SessionPersistence, SessionResult};
use jeda_core::config::ClientConfig;
pub use jeda_core::auth::AuthSession;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "jeda-cli";

/// Session storage keyed by CLI profile.
#[derive(Clone)]
pub struct SessionStore {
    username: String,
}

impl SessionStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("session:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> SessionResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| SessionError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for SessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> SessionResult<Option<AuthSession>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(SessionError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> SessionResult<Option<AuthSession>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| SessionError::SecureStorage(error.to_string()))?;
        if let Some(raw) = guard.get(&self.username) {
            Ok(Some(serde_json::from_str(raw)?))
        } else {
            Ok(None)
        }
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &AuthSession) -> SessionResult<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| SessionError::SecureStorage(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save_session(&self, session: &AuthSession) -> SessionResult<()> {
        let raw = serde_json::to_string(session)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| SessionError::SecureStorage(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> SessionResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(SessionError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> SessionResult<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| SessionError::SecureStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

pub type ProfileAuthClient = AuthClient<SessionStore>;

pub fn auth_client_for_profile(
    profile_name: &str,
    config: ClientConfig,
) -> SessionResult<ProfileAuthClient> {
    AuthClient::new(config, SessionStore::new(profile_name))
}

pub fn load_stored_session(profile_name: &str) -> SessionResult<Option<AuthSession>> {
    SessionStore::new(profile_name).load_session()
}

pub fn clear_stored_session(profile_name: &str) -> SessionResult<()> {
    SessionStore::new(profile_name).clear_session()
}

#[cfg(test)]
mod tests {
    use jeda_core::auth::AuthUser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn session(token: &str) -> AuthSession {
        AuthSession {
            token: token.to_string(),
            expires_at: None,
            user: AuthUser {
                id: "user-1".to_string(),
                name: "Tomato".to_string(),
                email: Some("tomato@example.com".to_string()),
                image: None,
            },
        }
    }

    #[test]
    fn session_store_is_scoped_per_profile() {
        SessionStore::new("store-a")
            .save_session(&session("token-a"))
            .unwrap();

        assert_eq!(
            load_stored_session("store-a").unwrap(),
            Some(session("token-a"))
        );
        assert_eq!(load_stored_session("store-b").unwrap(), None);

        clear_stored_session("store-a").unwrap();
        assert_eq!(load_stored_session("store-a").unwrap(), None);
    }

    #[test]
    fn clearing_missing_session_is_ok() {
        assert!(clear_stored_session("never-signed-in").is_ok());
    }

    #[test]
    fn session_debug_redacts_token() {
        let rendered = format!("{:?}", session("secret-session-token"));
        assert!(!rendered.contains("secret-session-token"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
