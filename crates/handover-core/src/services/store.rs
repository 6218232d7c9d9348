//! Record store: validated handover CRUD on top of the libSQL repository.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::convert;
use crate::db::{Database, HandoverRepository, LibSqlHandoverRepository};
use crate::models::{Handover, HandoverDraft, HandoverId};
use crate::util::{format_timestamp, parse_timestamp, unix_millis_now};
use crate::validation::{normalize_draft, validate_draft, ValidationRules};
use crate::{Error, Result};

/// Store behaviour that callers may configure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Reject imported handovers that carry no signatures
    pub require_signatures_on_import: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            require_signatures_on_import: true,
        }
    }
}

impl StoreOptions {
    const fn import_rules(self) -> ValidationRules {
        if self.require_signatures_on_import {
            ValidationRules::strict()
        } else {
            ValidationRules::without_signatures()
        }
    }
}

/// Outcome of a bulk create. Failed items are logged, not returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkInsertReport {
    pub inserted: usize,
    pub failed: usize,
}

/// Thread-safe handover store.
///
/// Owns the single database handle for the process; clones share it.
#[derive(Clone)]
pub struct HandoverStore {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
    options: StoreOptions,
}

impl HandoverStore {
    /// Open a store backed by the database file at `db_path`.
    pub async fn open_path(db_path: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path).await?;
        tracing::info!("Opened handover database at {}", db_path.display());
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
            options,
        })
    }

    /// Open an in-memory store (primarily for tests).
    pub async fn open_in_memory(options: StoreOptions) -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
            options,
        })
    }

    /// Path of the backing database file, if any.
    #[must_use]
    pub fn db_path(&self) -> Option<&PathBuf> {
        self.db_path.as_ref()
    }

    #[must_use]
    pub const fn options(&self) -> StoreOptions {
        self.options
    }

    /// List every handover, newest submission first.
    pub async fn list(&self) -> Result<Vec<Handover>> {
        let db = self.db.lock().await;
        let repo = LibSqlHandoverRepository::new(db.connection());
        repo.list().await
    }

    /// List handovers matching a free-text query over staff and device fields.
    pub async fn search(&self, query: &str) -> Result<Vec<Handover>> {
        let needle = query.trim().to_lowercase();
        let mut handovers = self.list().await?;
        handovers.retain(|handover| handover.matches_query(&needle));
        Ok(handovers)
    }

    /// Fetch a handover by id.
    pub async fn get(&self, id: &HandoverId) -> Result<Handover> {
        let db = self.db.lock().await;
        let repo = LibSqlHandoverRepository::new(db.connection());
        repo.get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Validate and store a new handover.
    pub async fn create(&self, draft: HandoverDraft) -> Result<Handover> {
        validate_draft(&draft, ValidationRules::strict())?;

        let db = self.db.lock().await;
        let repo = LibSqlHandoverRepository::new(db.connection());
        let handover = insert_draft(&repo, draft).await?;
        tracing::debug!(id = %handover.id, devices = handover.device_count(), "Created handover");
        Ok(handover)
    }

    /// Replace the contents of a stored handover.
    ///
    /// The id and creation time are kept; `submittedAt` is kept unless the
    /// draft supplies one.
    pub async fn update(&self, id: &HandoverId, draft: HandoverDraft) -> Result<Handover> {
        validate_draft(&draft, ValidationRules::strict())?;
        let draft = normalize_draft(draft);

        let db = self.db.lock().await;
        let repo = LibSqlHandoverRepository::new(db.connection());
        let existing = repo
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let submitted_at = draft
            .submitted_at
            .as_deref()
            .and_then(parse_timestamp)
            .map_or(existing.submitted_at, format_timestamp);
        let updated_at = unix_millis_now().max(existing.updated_at);

        let handover = Handover {
            id: existing.id,
            staff_details: draft.staff_details,
            devices: draft.devices,
            terms_accepted: draft.terms_accepted,
            signatures: draft.signatures,
            submitted_at,
            created_at: existing.created_at,
            updated_at,
        };

        if !repo.replace(&handover).await? {
            return Err(Error::NotFound(id.to_string()));
        }
        tracing::debug!(id = %handover.id, "Updated handover");
        Ok(handover)
    }

    /// Delete a handover and its devices.
    pub async fn delete(&self, id: &HandoverId) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlHandoverRepository::new(db.connection());
        if repo.delete(id).await? {
            tracing::debug!(id = %id, "Deleted handover");
            Ok(())
        } else {
            Err(Error::NotFound(id.to_string()))
        }
    }

    /// Insert many handovers, each on its own.
    ///
    /// Items that fail validation or storage are skipped and logged; the rest
    /// are kept.
    pub async fn bulk_create(&self, drafts: Vec<HandoverDraft>) -> BulkInsertReport {
        let rules = self.options.import_rules();
        let mut report = BulkInsertReport::default();

        let db = self.db.lock().await;
        let repo = LibSqlHandoverRepository::new(db.connection());

        for (index, draft) in drafts.into_iter().enumerate() {
            if let Err(error) = validate_draft(&draft, rules) {
                tracing::warn!(index, "Skipping imported handover: {error}");
                report.failed += 1;
                continue;
            }

            match insert_draft(&repo, draft).await {
                Ok(_) => report.inserted += 1,
                Err(error) => {
                    tracing::warn!(index, "Failed to store imported handover: {error}");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            inserted = report.inserted,
            failed = report.failed,
            "Bulk import finished"
        );
        report
    }

    /// Parse a CSV export and store the handovers it describes.
    ///
    /// A malformed file is rejected as a whole before anything is written.
    pub async fn import_csv(&self, input: &str) -> Result<BulkInsertReport> {
        let drafts = convert::import_csv(input)?;
        Ok(self.bulk_create(drafts).await)
    }

    /// Render every stored handover as CSV, one row per device.
    pub async fn export_csv(&self) -> Result<String> {
        let handovers = self.list().await?;
        convert::export_csv(&handovers)
    }
}

/// Normalize an already validated draft and insert it.
///
/// A supplied id that is already taken is replaced by a fresh one.
async fn insert_draft(repo: &LibSqlHandoverRepository<'_>, draft: HandoverDraft) -> Result<Handover> {
    let draft = normalize_draft(draft);

    let id = match draft.id {
        Some(id) if repo.exists(&id).await? => {
            let fresh = HandoverId::new();
            tracing::warn!("Handover id {id} already exists; storing as {fresh}");
            fresh
        }
        Some(id) => id,
        None => HandoverId::new(),
    };

    let now = Utc::now();
    let submitted_at = draft
        .submitted_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(now);

    let handover = Handover {
        id,
        staff_details: draft.staff_details,
        devices: draft.devices,
        terms_accepted: draft.terms_accepted,
        signatures: draft.signatures,
        submitted_at: format_timestamp(submitted_at),
        created_at: now.timestamp_millis(),
        updated_at: now.timestamp_millis(),
    };

    repo.insert(&handover).await?;
    Ok(handover)
}
