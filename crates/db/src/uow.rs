//! Unit of work: one transaction plus the change set recorded against it.
//!
//! Every mutating operation runs inside a [`UnitOfWork`]. Handlers load and
//! mutate rows through [`UnitOfWork::conn`], record each affected entity on
//! [`UnitOfWork::changes`], and finish with [`UnitOfWork::commit`], which
//! derives the audit rows and commits them together with the mutation.
//! Dropping the unit of work without committing rolls everything back, so a
//! failure at any step leaves neither the mutation nor a partial audit trail
//! behind.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use taskflow_core::audit::ChangeSet;
use taskflow_core::types::DbId;

use crate::repositories::AuditLogRepo;

pub struct UnitOfWork<'a> {
    tx: Transaction<'a, Postgres>,
    actor_id: DbId,
    changes: ChangeSet,
}

impl<'a> UnitOfWork<'a> {
    /// Open a transaction on behalf of the acting user.
    pub async fn begin(pool: &'a PgPool, actor_id: DbId) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(Self {
            tx,
            actor_id,
            changes: ChangeSet::new(),
        })
    }

    /// The acting user every audit row of this unit of work is stamped with.
    pub fn actor_id(&self) -> DbId {
        self.actor_id
    }

    /// The transaction connection; all loads and mutations of this unit of
    /// work must go through it.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// The change set collecting the entities mutated so far.
    pub fn changes(&mut self) -> &mut ChangeSet {
        &mut self.changes
    }

    /// Derive audit rows from the change set, persist them, and commit.
    pub async fn commit(mut self) -> Result<(), sqlx::Error> {
        let entries = std::mem::take(&mut self.changes).into_entries();
        for entry in &entries {
            AuditLogRepo::insert(&mut self.tx, self.actor_id, entry).await?;
        }
        self.tx.commit().await?;
        if !entries.is_empty() {
            tracing::debug!(
                actor_id = self.actor_id,
                audit_rows = entries.len(),
                "unit of work committed"
            );
        }
        Ok(())
    }
}
