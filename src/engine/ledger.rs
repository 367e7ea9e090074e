//! Points ledger: the only module that reads or writes Profile rows.
//!
//! Callers open the profiles table inside their own write transaction and
//! pass it in, so every credit commits atomically with the bookkeeping
//! that earned it. Point updates are additive only; nothing in this crate
//! overwrites the accumulator with an absolute value.

use redb::{Database, ReadableTable, Table};

use crate::db::tables;
use crate::error::{AppError, Result};
use crate::models::ProfileRecord;

type ProfilesTable<'txn> = Table<'txn, &'static str, &'static [u8]>;

/// Load a profile row, if present
///
/// Works against both read-only and write-transaction tables.
pub fn load_profile(
    profiles: &impl ReadableTable<&'static str, &'static [u8]>,
    user_id: &str,
) -> Result<Option<ProfileRecord>> {
    match profiles.get(user_id)? {
        Some(bytes) => Ok(Some(bincode::deserialize(bytes.value())?)),
        None => Ok(None),
    }
}

/// Load a profile row, treating absence as a referential-integrity error
pub fn require_profile(
    profiles: &impl ReadableTable<&'static str, &'static [u8]>,
    user_id: &str,
) -> Result<ProfileRecord> {
    load_profile(profiles, user_id)?.ok_or(AppError::ProfileMissing)
}

/// Write a profile row back under the user's key
pub fn store_profile(
    profiles: &mut ProfilesTable<'_>,
    user_id: &str,
    record: &ProfileRecord,
) -> Result<()> {
    let bytes = bincode::serialize(record)?;
    profiles.insert(user_id, bytes.as_slice())?;
    Ok(())
}

/// Credit points to a user: read the current total, add a non-negative
/// delta, write the sum back. Returns the updated record.
///
/// Must be called inside a write transaction; the transaction's exclusivity
/// is what makes the read-add-write safe against concurrent credits.
pub fn credit(
    profiles: &mut ProfilesTable<'_>,
    user_id: &str,
    delta: u32,
) -> Result<ProfileRecord> {
    let mut record = require_profile(profiles, user_id)?;
    record.points = record.points.saturating_add(delta);
    store_profile(profiles, user_id, &record)?;
    Ok(record)
}

/// Fetch a profile in its own read transaction
///
/// Read-through accessor for handlers outside a write transaction.
pub fn fetch_profile(db: &Database, user_id: &str) -> Result<Option<ProfileRecord>> {
    let read_txn = db.begin_read()?;
    let profiles = read_txn.open_table(tables::PROFILES)?;
    load_profile(&profiles, user_id)
}

/// Open the profiles table within a write transaction
///
/// Convenience wrapper so engine modules share one spelling.
pub fn open_profiles<'txn>(txn: &'txn redb::WriteTransaction) -> Result<ProfilesTable<'txn>> {
    Ok(txn.open_table(tables::PROFILES)?)
}
