use sea_orm::{DbErr, SqlErr};

/// True when the statement failed on the named unique (or partial unique)
/// index or constraint.
///
/// Guards that must be atomic per key are enforced by the index itself; the
/// caller turns this into its domain conflict instead of a 500.
pub fn violates_index(err: &DbErr, index_name: &str) -> bool {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => detail.contains(index_name),
        _ => false,
    }
}
