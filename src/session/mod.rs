//! Session store: authentication token, user identity and the local
//! expiry heuristics built on top of them.

pub mod jwt;

use chrono::{DateTime, Utc};

use crate::api::ApiClient;
use crate::db::storage::{KvStore, SESSION_KEY};
use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use crate::models::user::{AuthResponse, Credentials, User};

#[derive(Debug)]
pub struct SessionStore {
    session: Session,
    timeout_minutes: i64,
}

impl SessionStore {
    pub fn new(timeout_minutes: i64) -> Self {
        Self {
            session: Session::anonymous(timeout_minutes),
            timeout_minutes,
        }
    }

    /// Load the persisted session. A session that is already expired is
    /// dropped from storage on the spot.
    pub fn restore(storage: &KvStore, timeout_minutes: i64, now: DateTime<Utc>) -> AppResult<Self> {
        let mut store = Self::new(timeout_minutes);

        let persisted: Option<Session> = match storage.get(SESSION_KEY) {
            Ok(s) => s,
            Err(AppError::Json(e)) => {
                tracing::warn!("discarding unreadable stored session: {e}");
                storage.remove(SESSION_KEY)?;
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(mut session) = persisted {
            session.session_timeout_minutes = timeout_minutes;
            store.session = session;
            if store.session.token.is_some() && !store.is_authenticated(now) {
                tracing::info!("stored session expired, clearing it");
                store.clear(storage)?;
            }
        }

        Ok(store)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    /// Local view on whether the user is logged in: a token must be present,
    /// decodable and unexpired, and the inactivity window must not have
    /// elapsed. The stored `is_authenticated` flag alone is never trusted.
    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        match self.token() {
            Some(token) => !jwt::is_expired(token, now) && !self.session.is_idle(now),
            None => false,
        }
    }

    /// Sign in against the server and persist the resulting session.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        storage: &KvStore,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> AppResult<&Session> {
        let resp = api.auth().signin(credentials).await?;
        self.establish(resp, storage, now)?;
        Ok(&self.session)
    }

    /// Turn a sign-in response into the active session.
    pub fn establish(
        &mut self,
        resp: AuthResponse,
        storage: &KvStore,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if jwt::is_expired(&resp.token, now) {
            tracing::warn!("sign-in returned an expired or malformed token");
            return Err(AppError::invalid_response());
        }

        let user = resp.user();
        tracing::info!(user_id = user.id, email = %user.email, "session established");
        self.session = Session::established(resp.token, user, now, self.timeout_minutes);
        storage.set(SESSION_KEY, &self.session)?;
        Ok(())
    }

    /// Best-effort server logout, then local cleanup. Never fails because of
    /// the server.
    pub async fn logout(&mut self, api: &ApiClient, storage: &KvStore) -> AppResult<()> {
        if self.token().is_some()
            && let Err(e) = api.auth().logout().await
        {
            tracing::warn!("server logout failed, clearing local session anyway: {e}");
        }
        self.clear(storage)
    }

    /// Activity ping: extend the inactivity window.
    pub fn touch(&mut self, storage: &KvStore, now: DateTime<Utc>) -> AppResult<()> {
        if self.session.token.is_none() {
            return Ok(());
        }
        self.session.last_activity = Some(now);
        storage.set(SESSION_KEY, &self.session)
    }

    pub fn update_user(&mut self, user: User, storage: &KvStore) -> AppResult<()> {
        if self.session.token.is_none() {
            return Err(AppError::NotAuthenticated);
        }
        self.session.user = Some(user);
        storage.set(SESSION_KEY, &self.session)
    }

    /// Drop the session from memory and durable storage.
    pub fn clear(&mut self, storage: &KvStore) -> AppResult<()> {
        self.session = Session::anonymous(self.timeout_minutes);
        storage.remove(SESSION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn token_expiring_at(exp: i64) -> String {
        encode(
            &Header::default(),
            &json!({ "sub": "a@b.com", "exp": exp }),
            &EncodingKey::from_secret(b"k"),
        )
        .unwrap()
    }

    fn response(token: String) -> AuthResponse {
        serde_json::from_value(json!({
            "token": token,
            "id": 1,
            "email": "a@b.com",
            "firstName": "A",
            "lastName": "B",
            "roles": ["ROLE_EMPLOYEE"]
        }))
        .unwrap()
    }

    #[test]
    fn establish_persists_and_authenticates() {
        let kv = KvStore::in_memory().unwrap();
        let now = Utc::now();
        let mut store = SessionStore::new(30);
        store
            .establish(response(token_expiring_at(now.timestamp() + 3600)), &kv, now)
            .unwrap();

        assert!(store.is_authenticated(now));
        assert_eq!(store.session().full_name().as_deref(), Some("A B"));

        let restored = SessionStore::restore(&kv, 30, now).unwrap();
        assert!(restored.is_authenticated(now));
        assert_eq!(restored.user().map(|u| u.id), Some(1));
    }

    #[test]
    fn expired_jwt_is_not_authenticated_despite_flag() {
        let kv = KvStore::in_memory().unwrap();
        let now = Utc::now();
        let mut store = SessionStore::new(0);
        store
            .establish(response(token_expiring_at(now.timestamp() + 60)), &kv, now)
            .unwrap();
        assert!(store.session().is_authenticated);

        let later = now + chrono::Duration::minutes(5);
        assert!(store.session().is_authenticated);
        assert!(!store.is_authenticated(later));

        let restored = SessionStore::restore(&kv, 0, later).unwrap();
        assert!(!restored.is_authenticated(later));
        assert!(restored.token().is_none());
        assert!(kv.get::<Session>(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn establish_rejects_expired_token() {
        let kv = KvStore::in_memory().unwrap();
        let now = Utc::now();
        let mut store = SessionStore::new(30);
        let err = store
            .establish(response(token_expiring_at(now.timestamp() - 10)), &kv, now)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!store.is_authenticated(now));
    }

    #[test]
    fn inactivity_ends_session_and_touch_extends_it() {
        let kv = KvStore::in_memory().unwrap();
        let now = Utc::now();
        let mut store = SessionStore::new(30);
        store
            .establish(response(token_expiring_at(now.timestamp() + 86_400)), &kv, now)
            .unwrap();

        let t1 = now + chrono::Duration::minutes(20);
        store.touch(&kv, t1).unwrap();
        assert!(store.is_authenticated(t1 + chrono::Duration::minutes(20)));
        assert!(!store.is_authenticated(t1 + chrono::Duration::minutes(31)));
    }

    #[test]
    fn clear_wipes_storage() {
        let kv = KvStore::in_memory().unwrap();
        let now = Utc::now();
        let mut store = SessionStore::new(30);
        store
            .establish(response(token_expiring_at(now.timestamp() + 3600)), &kv, now)
            .unwrap();
        store.clear(&kv).unwrap();
        assert!(!store.is_authenticated(now));
        assert!(kv.get::<Session>(SESSION_KEY).unwrap().is_none());
    }
}
