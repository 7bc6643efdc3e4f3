use error_stack::Report;

pub mod memory;
pub mod mongodb;

pub type RepoInitResult<T> = Result<T, Report<RepoInitErr>>;

#[derive(Debug, thiserror::Error)]
#[error("failed to initialize repository")]
pub struct RepoInitErr;

/// Keys that identify a stored document or belong to its counters.
/// Free-form client fields with these names are dropped so they can't
/// shadow the id or overwrite the purchase counter.
const RESERVED_DETAIL_KEYS: [&str; 3] = ["_id", "id", "numberOfPurchases"];

pub fn strip_reserved_keys(details: &mut foods_core::model::Details) {
    for key in RESERVED_DETAIL_KEYS {
        details.remove(key);
    }
}
