//! Entity change-set capture and audit record derivation.
//!
//! Every accepted write runs through a [`ChangeSet`]: the orchestrating code
//! records each created, updated, or deleted entity, and at commit time the
//! set is turned into one [`AuditEntry`] per mutated entity instance. Field
//! enumeration is explicit -- each entity implements [`Auditable`] with an
//! ordered list of `(column, value)` descriptors instead of any runtime
//! introspection.
//!
//! Redaction is a fixed list, not a heuristic: columns named in
//! [`REDACTED_FIELDS`] never enter a value map, for any entity and any
//! operation. Audit rows themselves are excluded from capture so an audit
//! write can never trigger another audit write.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Table name of the audit rows themselves; entities with this table are
/// silently ignored by the change set.
pub const AUDIT_TABLE: &str = "audit_logs";

/// Columns that are unconditionally excluded from every value map.
pub const REDACTED_FIELDS: &[&str] = &["password_hash"];

/// An entity whose mutations are captured in the audit trail.
///
/// `audit_fields` must return every persisted column in a stable order,
/// including columns on the redaction list (they are filtered centrally);
/// `key_values` renders the primary key as `name=value` pairs, comma-joined
/// for composite keys.
pub trait Auditable {
    const TABLE: &'static str;

    fn key_values(&self) -> String;
    fn audit_fields(&self) -> Vec<(&'static str, Value)>;
}

/// The kind of mutation an audit entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditKind {
    Create,
    Update,
    Delete,
    None,
}

impl AuditKind {
    /// String representation for display and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::None => "None",
        }
    }
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One derived audit record, ready to be persisted alongside the mutation it
/// describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub table_name: &'static str,
    /// Primary key as `name=value` pairs, computed from the current value
    /// even on deletion.
    pub key_values: String,
    /// Pre-write values. Absent for creations.
    pub old_values: Option<Value>,
    /// Post-write values. Absent for deletions.
    pub new_values: Option<Value>,
    /// Names of the columns whose values differ; empty for create/delete.
    pub changed_columns: Vec<&'static str>,
    pub kind: AuditKind,
}

// ---------------------------------------------------------------------------
// Change set
// ---------------------------------------------------------------------------

/// Snapshot of one entity's audited fields, taken at record time so later
/// in-place mutation of the entity cannot corrupt the trail.
#[derive(Debug, Clone)]
struct Snapshot {
    table: &'static str,
    key_values: String,
    fields: Vec<(&'static str, Value)>,
}

impl Snapshot {
    fn capture<E: Auditable>(entity: &E) -> Self {
        let fields = entity
            .audit_fields()
            .into_iter()
            .filter(|(name, _)| !REDACTED_FIELDS.contains(name))
            .collect();
        Self {
            table: E::TABLE,
            key_values: entity.key_values(),
            fields,
        }
    }

    fn into_map(self) -> Value {
        let mut map = Map::new();
        for (name, value) in self.fields {
            map.insert(name.to_string(), value);
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone)]
enum Change {
    Created(Snapshot),
    Updated { before: Snapshot, after: Snapshot },
    Deleted(Snapshot),
}

/// The set of entities mutated within one unit of work.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn record_create<E: Auditable>(&mut self, entity: &E) {
        if E::TABLE == AUDIT_TABLE {
            return;
        }
        self.changes.push(Change::Created(Snapshot::capture(entity)));
    }

    /// Record an update. The key is taken from `after`, the current value.
    pub fn record_update<E: Auditable>(&mut self, before: &E, after: &E) {
        if E::TABLE == AUDIT_TABLE {
            return;
        }
        self.changes.push(Change::Updated {
            before: Snapshot::capture(before),
            after: Snapshot::capture(after),
        });
    }

    pub fn record_delete<E: Auditable>(&mut self, entity: &E) {
        if E::TABLE == AUDIT_TABLE {
            return;
        }
        self.changes.push(Change::Deleted(Snapshot::capture(entity)));
    }

    /// Derive the audit entries for every recorded change, in record order.
    ///
    /// Updates are diffed by value equality; an update where no field
    /// actually changed yields no entry at all.
    pub fn into_entries(self) -> Vec<AuditEntry> {
        self.changes
            .into_iter()
            .filter_map(|change| match change {
                Change::Created(snapshot) => Some(AuditEntry {
                    table_name: snapshot.table,
                    key_values: snapshot.key_values.clone(),
                    old_values: None,
                    new_values: Some(snapshot.into_map()),
                    changed_columns: Vec::new(),
                    kind: AuditKind::Create,
                }),
                Change::Deleted(snapshot) => Some(AuditEntry {
                    table_name: snapshot.table,
                    key_values: snapshot.key_values.clone(),
                    old_values: Some(snapshot.into_map()),
                    new_values: None,
                    changed_columns: Vec::new(),
                    kind: AuditKind::Delete,
                }),
                Change::Updated { before, after } => diff_update(before, after),
            })
            .collect()
    }
}

/// Diff two snapshots of the same entity; `None` when nothing changed.
fn diff_update(before: Snapshot, after: Snapshot) -> Option<AuditEntry> {
    let mut old_values = Map::new();
    let mut new_values = Map::new();
    let mut changed_columns = Vec::new();

    for ((name, old), (_, new)) in before.fields.iter().zip(after.fields.iter()) {
        if old != new {
            changed_columns.push(*name);
            old_values.insert(name.to_string(), old.clone());
            new_values.insert(name.to_string(), new.clone());
        }
    }

    if changed_columns.is_empty() {
        return None;
    }

    Some(AuditEntry {
        table_name: after.table,
        key_values: after.key_values,
        old_values: Some(Value::Object(old_values)),
        new_values: Some(Value::Object(new_values)),
        changed_columns,
        kind: AuditKind::Update,
    })
}
