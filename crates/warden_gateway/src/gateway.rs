//! The allow-list gateway.

use crate::{help_text, Caller, Request, Response};
use chrono::NaiveDate;
use derive_getters::Getters;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use warden_cache::{CacheConfig, SnapshotCache};
use warden_core::{
    find_entry, remove_entry, upsert_entry, Entry, RejectReason, RemoveOutcome, UpsertKind,
    UpsertOutcome,
};
use warden_security::{
    EntryValidator, GuardChain, Invocation, PauseGate, PauseState, PermissionChecker,
    PermissionConfig, RateLimit, RateLimiter, SecurityError, SecurityErrorKind,
    ValidationPolicy,
};
use warden_store::DocumentStore;

/// Everything needed to assemble a [`Gateway`] around a store.
#[derive(Debug, Clone, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GatewaySettings {
    /// Snapshot cache settings
    #[builder(default)]
    cache: CacheConfig,
    /// Per-user limit on rate-limited commands
    #[builder(default)]
    rate_limit: RateLimit,
    /// Input limits for new entries
    #[builder(default)]
    validation: ValidationPolicy,
    /// Designated channel and owners
    permissions: PermissionConfig,
}

/// Converts a validation failure into a mutation rejection.
fn rejection(err: SecurityError) -> RejectReason {
    match err.kind {
        SecurityErrorKind::ValidationFailed { field, reason } => {
            RejectReason::Invalid { field, reason }
        }
        other => RejectReason::invalid("request", other.to_string()),
    }
}

/// Allow-list operations over a cached full-document store.
///
/// Read operations are served from the snapshot cache. Mutations read the
/// document fresh, change it in memory and write the whole document back.
/// Two mutations whose read-modify-write spans overlap can overwrite each
/// other: the store has no revision check to detect it.
pub struct Gateway<S> {
    cache: SnapshotCache<S>,
    validator: EntryValidator,
    gate: Arc<PauseGate>,
    limiter: Arc<RateLimiter>,
    permissions: Arc<PermissionChecker>,
    guards: GuardChain,
}

impl<S: DocumentStore> Gateway<S> {
    /// Assemble a gateway with the standard guard chain.
    pub fn new(store: S, settings: GatewaySettings) -> Self {
        let GatewaySettings {
            cache,
            rate_limit,
            validation,
            permissions,
        } = settings;

        let gate = Arc::new(PauseGate::new());
        let limiter = Arc::new(RateLimiter::new(rate_limit));
        let permissions = Arc::new(PermissionChecker::new(permissions));
        let guards = GuardChain::standard(permissions.clone(), gate.clone(), limiter.clone());

        info!(
            backend = store.backend_name(),
            guards = ?guards.names(),
            "Gateway ready"
        );

        Self {
            cache: SnapshotCache::new(store, cache),
            validator: EntryValidator::new(validation),
            gate,
            limiter,
            permissions,
            guards,
        }
    }

    /// Find the entry for `uid`, from the cache when fresh.
    #[instrument(skip(self))]
    pub async fn lookup(&self, uid: &str) -> Option<Entry> {
        let entries = self.cache.read(false).await;
        let found = find_entry(&entries, uid).cloned();
        debug!(found = found.is_some(), "Lookup complete");
        found
    }

    /// Every entry in document order, from the cache when fresh.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Vec<Entry> {
        self.cache.read(false).await
    }

    /// Add `uid`, or replace its fields in place if present.
    ///
    /// Input is validated before the store is touched. The document is read
    /// fresh; if that read fails nothing is written.
    #[instrument(skip(self, comment))]
    pub async fn upsert(&self, uid: &str, expiry_date: NaiveDate, comment: &str) -> UpsertOutcome {
        let checked = self.validator.uid(uid).and_then(|uid| {
            let expiry = self.validator.expiry(expiry_date)?;
            let comment = self.validator.comment(comment)?;
            Ok(Entry::new(uid, expiry, comment))
        });
        let entry = match checked {
            Ok(entry) => entry,
            Err(e) => return UpsertOutcome::Rejected(rejection(e)),
        };
        self.write_entry(entry).await
    }

    /// Add or update from separate date parts, as `/adduid` supplies them.
    #[instrument(skip(self, comment))]
    pub async fn upsert_parts(
        &self,
        uid: &str,
        year: i64,
        month: i64,
        day: i64,
        comment: &str,
    ) -> UpsertOutcome {
        match self.validator.expiry_date(year, month, day) {
            Ok(expiry) => self.upsert(uid, expiry, comment).await,
            Err(e) => UpsertOutcome::Rejected(rejection(e)),
        }
    }

    async fn write_entry(&self, entry: Entry) -> UpsertOutcome {
        let mut entries = match self.cache.refresh().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Fresh read before write failed");
                return UpsertOutcome::Rejected(RejectReason::StoreReadFailed);
            }
        };

        let kind = upsert_entry(&mut entries, entry.clone());
        if !self.cache.commit(entries).await {
            return UpsertOutcome::Rejected(RejectReason::StoreWriteFailed);
        }

        info!(uid = %entry.uid, kind = ?kind, "Entry written");
        match kind {
            UpsertKind::Added => UpsertOutcome::Added(entry),
            UpsertKind::Updated => UpsertOutcome::Updated(entry),
        }
    }

    /// Remove every entry matching `uid`.
    ///
    /// The store is written only when something was removed.
    #[instrument(skip(self))]
    pub async fn remove(&self, uid: &str) -> RemoveOutcome {
        let uid = match self.validator.uid(uid) {
            Ok(uid) => uid,
            Err(e) => return RemoveOutcome::Rejected(rejection(e)),
        };

        let mut entries = match self.cache.refresh().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Fresh read before remove failed");
                return RemoveOutcome::Rejected(RejectReason::StoreReadFailed);
            }
        };

        let Some(removed) = remove_entry(&mut entries, &uid) else {
            debug!("Nothing to remove");
            return RemoveOutcome::NotFound;
        };

        if !self.cache.commit(entries).await {
            return RemoveOutcome::Rejected(RejectReason::StoreWriteFailed);
        }

        info!(uid = %removed.uid, "Entry removed");
        RemoveOutcome::Removed(removed)
    }

    /// Open or close the pause gate, returning the previous setting.
    #[instrument(skip(self))]
    pub fn set_pause(&self, paused: bool) -> bool {
        let previous = self.gate.set_paused(paused);
        info!(previous, "Pause gate set");
        previous
    }

    /// Current pause state.
    pub fn pause_state(&self) -> PauseState {
        self.gate.state()
    }

    /// Run the guard chain for `caller`, then the requested operation.
    #[instrument(skip(self, request), fields(command = %request.command(), user = %caller.user))]
    pub async fn dispatch(&self, caller: Caller, request: Request) -> Response {
        let command = request.command();
        let invocation = Invocation::new(caller.user, caller.channel, command.as_ref(), command.policy());
        if let Err(e) = self.guards.run(&invocation) {
            return Response::Denied(e);
        }

        match request {
            Request::Help => Response::Help(help_text()),
            Request::CheckUid { uid } | Request::ViewUid { uid } => {
                let entry = self.lookup(&uid).await;
                Response::Lookup {
                    uid: uid.trim().to_string(),
                    entry,
                }
            }
            Request::ListUids => Response::Entries(self.list_all().await),
            Request::AddUid {
                uid,
                year,
                month,
                day,
                comment,
            } => Response::Upserted(self.upsert_parts(&uid, year, month, day, &comment).await),
            Request::RemoveUid { uid } => Response::Removed(self.remove(&uid).await),
            Request::Pause => Response::PauseChanged {
                paused: true,
                previous: self.set_pause(true),
            },
            Request::Resume => Response::PauseChanged {
                paused: false,
                previous: self.set_pause(false),
            },
        }
    }

    /// The snapshot cache.
    pub fn cache(&self) -> &SnapshotCache<S> {
        &self.cache
    }

    /// The shared rate limiter.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// The channel and owner checker.
    pub fn permissions(&self) -> &PermissionChecker {
        &self.permissions
    }
}
