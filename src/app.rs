//! Application context: owns the session store, the work-status store, the
//! API client with its query cache, navigation state and durable storage.
//! Every command builds one and drives it through `&mut` methods.

use chrono::{Local, NaiveDate, Utc};

use crate::api::ApiClient;
use crate::api::cache::{Mutation, Query, QueryCache};
use crate::api::gate::{AuthorizationGate, GateAction};
use crate::api::time_records::{BookingRequest, CurrentStatus};
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::storage::{KvStore, REDIRECT_KEY, WORK_STATUS_KEY};
use crate::errors::{AppError, AppResult};
use crate::models::location::LocationType;
use crate::models::protocol_entry::{EntryId, ProtocolEntry};
use crate::models::session::Session;
use crate::models::today_summary::TodaySummary;
use crate::models::user::{Credentials, SignupRequest, User};
use crate::nav::{Navigator, View};
use crate::session::SessionStore;
use crate::workstatus::WorkStatusStore;
use crate::workstatus::machine::Intent;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub full_name: String,
    pub roles: Vec<String>,
    /// Path the user was sent away from by a previous 401, if any.
    pub redirect_to: Option<String>,
}

/// Result of a booking the server accepted.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub entry: ProtocolEntry,
    pub summary: TodaySummary,
    /// Set when the follow-up refetch failed; local state then still holds
    /// the optimistic update.
    pub refetch_error: Option<String>,
}

pub struct AppContext {
    config: Config,
    api: ApiClient,
    session: SessionStore,
    work: WorkStatusStore,
    cache: QueryCache,
    navigator: Navigator,
    storage: KvStore,
}

impl AppContext {
    pub fn new(config: Config, storage: KvStore, view: View) -> AppResult<Self> {
        let mut api = ApiClient::from_config(&config)?;
        let session = SessionStore::restore(&storage, config.session_timeout_minutes, Utc::now())?;
        api.set_bearer(session.token());

        let work = match storage.get::<WorkStatusStore>(WORK_STATUS_KEY) {
            Ok(w) => w.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("ignoring unreadable work-status snapshot: {e}");
                WorkStatusStore::default()
            }
        };

        Ok(Self {
            config,
            api,
            session,
            work,
            cache: QueryCache::default(),
            navigator: Navigator::new(view),
            storage,
        })
    }

    /// Open the durable storage configured in `config` and build the context.
    pub fn open(config: Config, view: View) -> AppResult<Self> {
        let storage = KvStore::open(&config.database)?;
        Self::new(config, storage, view)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated(Utc::now())
    }

    pub fn work(&self) -> &WorkStatusStore {
        &self.work
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn storage(&self) -> &KvStore {
        &self.storage
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // ------------------------------------------------
    // Gate + session helpers
    // ------------------------------------------------

    /// Route an API result through the authorization gate.
    fn guard<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        let (result, action) = AuthorizationGate::inspect(
            result,
            &mut self.session,
            &mut self.navigator,
            &self.storage,
        );
        if let GateAction::SessionCleared { .. } = action {
            self.api.set_bearer(None);
            self.cache.clear();
            self.work = WorkStatusStore::default();
        }
        result
    }

    /// Fail fast when the local session is missing or expired; otherwise
    /// record activity.
    fn require_session(&mut self) -> AppResult<()> {
        let now = Utc::now();
        if !self.session.is_authenticated(now) {
            if self.session.token().is_some() {
                tracing::info!("local session expired");
                self.session.clear(&self.storage)?;
                self.api.set_bearer(None);
            }
            return Err(AppError::NotAuthenticated);
        }
        self.session.touch(&self.storage, now)
    }

    fn persist_work(&self) {
        if self.session.token().is_none() {
            return;
        }
        if let Err(e) = self.storage.set(WORK_STATUS_KEY, &self.work) {
            tracing::warn!("failed to persist work-status snapshot: {e}");
        }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    // ------------------------------------------------
    // Authentication
    // ------------------------------------------------

    pub async fn login(&mut self, credentials: &Credentials) -> AppResult<LoginOutcome> {
        self.navigator.navigate(View::Login);

        let result = self
            .session
            .login(&self.api, &self.storage, credentials, Utc::now())
            .await
            .map(|s| {
                let roles = s.user.as_ref().map(|u| u.roles.clone()).unwrap_or_default();
                (s.full_name().unwrap_or_default(), roles)
            });
        let (full_name, roles) = self.guard(result)?;

        self.api.set_bearer(self.session.token());
        self.cache.invalidate(Mutation::Login.invalidates());

        let redirect_to: Option<String> = self.storage.take(REDIRECT_KEY)?;
        self.navigator.navigate(View::Dashboard);

        ttlog_quiet(self.storage.conn(), "login", &credentials.email, "Session established");

        Ok(LoginOutcome {
            full_name,
            roles,
            redirect_to,
        })
    }

    pub async fn signup(&mut self, request: &SignupRequest) -> AppResult<String> {
        self.navigator.navigate(View::Signup);
        let result = self.api.auth().signup(request).await;
        let resp = self.guard(result)?;
        ttlog_quiet(self.storage.conn(), "signup", &request.email, "Account created");
        Ok(resp.message)
    }

    pub async fn logout(&mut self) -> AppResult<()> {
        self.session.logout(&self.api, &self.storage).await?;
        self.api.set_bearer(None);
        self.cache.invalidate(Mutation::Logout.invalidates());
        self.cache.clear();
        self.work = WorkStatusStore::default();
        self.storage.remove(WORK_STATUS_KEY)?;
        self.navigator.navigate(View::Login);
        ttlog_quiet(self.storage.conn(), "logout", "", "Session cleared");
        Ok(())
    }

    /// Refresh the user identity from the server.
    pub async fn me(&mut self) -> AppResult<User> {
        self.require_session()?;
        let query = Query::Me;
        if let Some(user) = self.cache.get::<User>(&query) {
            return Ok(user);
        }
        let result = self.api.auth().me().await;
        let user = self.guard(result)?;
        self.cache.put(&query, &user);
        self.session.update_user(user.clone(), &self.storage)?;
        Ok(user)
    }

    // ------------------------------------------------
    // Queries
    // ------------------------------------------------

    async fn fetch_today_protocol(&mut self) -> AppResult<Vec<ProtocolEntry>> {
        let query = Query::Today;
        if let Some(v) = self.cache.get(&query) {
            return Ok(v);
        }
        let result = self.api.time_records().today().await;
        let entries = self.guard(result)?;
        self.cache.put(&query, &entries);
        Ok(entries)
    }

    async fn fetch_summary_today(&mut self) -> AppResult<TodaySummary> {
        let query = Query::SummaryToday;
        if let Some(v) = self.cache.get(&query) {
            return Ok(v);
        }
        let result = self.api.time_records().summary_today().await;
        let summary = self.guard(result)?;
        self.cache.put(&query, &summary);
        Ok(summary)
    }

    /// Load today's summary and protocol from the server and make them the
    /// local state. Both queries stay subscribed so later mutations refetch
    /// them.
    pub async fn refresh_today(&mut self) -> AppResult<&WorkStatusStore> {
        self.require_session()?;
        self.cache.subscribe(Query::SummaryToday);
        self.cache.subscribe(Query::Today);

        let summary = self.fetch_summary_today().await?;
        let entries = self.fetch_today_protocol().await?;
        self.work.reconcile(summary, entries, Self::today());
        self.persist_work();
        Ok(&self.work)
    }

    pub async fn current_status(&mut self) -> AppResult<CurrentStatus> {
        self.require_session()?;
        let query = Query::CurrentStatus;
        self.cache.subscribe(query.clone());
        if let Some(v) = self.cache.get(&query) {
            return Ok(v);
        }
        let result = self.api.time_records().current_status().await;
        let status = self.guard(result)?;
        self.cache.put(&query, &status);
        Ok(status)
    }

    /// Bookings between `start` and `end` (inclusive), oldest first.
    pub async fn my_records(&mut self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<ProtocolEntry>> {
        self.require_session()?;
        self.navigator.navigate(View::Protocol);
        let query = Query::MyRecords { start, end };
        if let Some(v) = self.cache.get(&query) {
            return Ok(v);
        }
        let result = self.api.time_records().my_records(start, end).await;
        let mut entries = self.guard(result)?;
        entries.sort_by_key(|e| e.timestamp());
        self.cache.put(&query, &entries);
        Ok(entries)
    }

    /// Refetch the subscribed queries a mutation marked stale.
    async fn refetch(&mut self, queries: Vec<Query>) -> AppResult<()> {
        for query in queries {
            match query {
                Query::Today => {
                    let entries = self.fetch_today_protocol().await?;
                    self.work.replace_protocol(entries, Self::today());
                }
                Query::SummaryToday => {
                    let summary = self.fetch_summary_today().await?;
                    self.work.replace_summary(summary, Self::today());
                }
                Query::CurrentStatus => {
                    self.current_status().await?;
                }
                Query::MyRecords { start, end } => {
                    self.my_records(start, end).await?;
                }
                Query::Me => {
                    self.me().await?;
                }
            }
        }
        self.persist_work();
        Ok(())
    }

    // ------------------------------------------------
    // Mutations
    // ------------------------------------------------

    /// Book `intent`: validated and applied locally first, then sent to the
    /// server. A rejected request undoes the local change before the error
    /// is returned.
    pub async fn book(
        &mut self,
        intent: Intent,
        location: Option<LocationType>,
        notes: Option<String>,
    ) -> AppResult<BookingOutcome> {
        self.require_session()?;
        self.navigator.navigate(View::Dashboard);

        if self.cache.is_stale(&Query::Today) || self.work.day() != Some(Self::today()) {
            self.refresh_today().await?;
        }

        let location = match location {
            Some(l) => l,
            None => self.config.default_location_type()?,
        };
        let terminal = self.config.terminal.clone();

        let booking = self.work.apply(
            intent,
            location,
            &terminal,
            notes.clone(),
            Local::now().naive_local(),
        )?;
        self.persist_work();
        tracing::debug!(?intent, id = %booking.entry_id(), "optimistic booking applied");

        let request = BookingRequest {
            location_type: location,
            terminal,
            notes,
        };
        let record_type = intent.record_type();
        let result = self.api.time_records().book(record_type, &request).await;

        let entry = match self.guard(result) {
            Ok(entry) => entry,
            Err(e) => {
                let id = booking.entry_id().to_string();
                if !matches!(e, AppError::Unauthorized) {
                    self.work.undo(booking);
                    self.persist_work();
                }
                tracing::warn!(?intent, "booking failed, local change rolled back: {e}");
                ttlog_quiet(
                    self.storage.conn(),
                    "book_failed",
                    record_type.as_api_str(),
                    &format!("Rolled back {id}: {e}"),
                );
                return Err(e);
            }
        };

        ttlog_quiet(
            self.storage.conn(),
            "book",
            record_type.as_api_str(),
            &format!("{} at {} ({})", record_type.label(), entry.time_str(), location),
        );

        let stale = self.cache.invalidate(Mutation::Booking(record_type).invalidates());
        let refetch_error = match self.refetch(stale).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("refetch after booking failed: {e}");
                Some(e.to_string())
            }
        };

        Ok(BookingOutcome {
            entry,
            summary: self.work.summary().clone(),
            refetch_error,
        })
    }

    pub async fn update_notes(&mut self, id: i64, notes: &str) -> AppResult<ProtocolEntry> {
        self.require_session()?;
        let result = self.api.time_records().update_notes(id, notes).await;
        let entry = self.guard(result)?;

        ttlog_quiet(self.storage.conn(), "notes", &id.to_string(), "Notes updated");

        if self.work.day() == Some(Self::today()) {
            self.work.upsert_entry(entry.clone());
        }
        let stale = self.cache.invalidate(Mutation::UpdateNotes.invalidates());
        if let Err(e) = self.refetch(stale).await {
            tracing::warn!("refetch after notes update failed: {e}");
        }
        Ok(entry)
    }

    pub async fn delete_record(&mut self, id: i64) -> AppResult<()> {
        self.require_session()?;
        let result = self.api.time_records().delete(id).await;
        self.guard(result)?;

        ttlog_quiet(self.storage.conn(), "delete", &id.to_string(), "Time record deleted");

        self.work.remove_entry(&EntryId::Server(id));
        let stale = self.cache.invalidate(Mutation::DeleteRecord.invalidates());
        if let Err(e) = self.refetch(stale).await {
            tracing::warn!("refetch after delete failed: {e}");
        }
        self.persist_work();
        Ok(())
    }
}
