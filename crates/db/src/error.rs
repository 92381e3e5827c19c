//! Classification of sqlx errors into the [`CoreError`] taxonomy.

use armory_core::error::CoreError;

/// SQLSTATE codes that indicate a transient condition worth retrying.
///
/// - `40001` serialization failure
/// - `40P01` deadlock detected
/// - `57P01` admin shutdown
/// - `53300` too many connections
const TEMPORARY_SQLSTATES: &[&str] = &["40001", "40P01", "57P01", "53300"];

/// `numeric_value_out_of_range`, raised when an additive counter overflows `BIGINT`.
const OUT_OF_RANGE_SQLSTATE: &str = "22003";

/// Classify a sqlx error.
///
/// - `RowNotFound` maps to [`CoreError::NotFound`] on `entity`.
/// - Unique violations map to [`CoreError::Conflict`].
/// - Counter overflow (`22003`) maps to [`CoreError::Request`], like the
///   range check in [`to_db_count`].
/// - Pool exhaustion, I/O, TLS, connection-class (`08xxx`) and the codes in
///   [`TEMPORARY_SQLSTATES`] map to [`CoreError::Temporary`].
/// - Everything else maps to [`CoreError::Internal`].
pub fn classify(err: sqlx::Error, entity: &'static str, id: &str) -> CoreError {
    match err {
        sqlx::Error::RowNotFound => CoreError::not_found(entity, id),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            CoreError::Temporary(format!("database pool unavailable: {err}"))
        }
        sqlx::Error::Io(ref io) => CoreError::Temporary(format!("database i/o error: {io}")),
        sqlx::Error::Tls(ref tls) => CoreError::Temporary(format!("database tls error: {tls}")),
        sqlx::Error::Database(ref db_err) => {
            if db_err.is_unique_violation() {
                return CoreError::Conflict(format!(
                    "{entity} {id} already exists: {}",
                    db_err.message()
                ));
            }
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            if code == OUT_OF_RANGE_SQLSTATE {
                return CoreError::Request(format!(
                    "{entity} {id} counter out of range: {}",
                    db_err.message()
                ));
            }
            if code.starts_with("08") || TEMPORARY_SQLSTATES.contains(&code.as_str()) {
                return CoreError::Temporary(format!("database unavailable ({code}): {db_err}"));
            }
            tracing::error!(error = %db_err, entity, "Unclassified database error");
            CoreError::Internal(format!("database error: {db_err}"))
        }
        other => {
            tracing::error!(error = %other, entity, "Unclassified database error");
            CoreError::Internal(format!("database error: {other}"))
        }
    }
}

/// Convert a counter to the signed column type, rejecting values that do not fit.
pub fn to_db_count(value: u64, field: &str) -> Result<i64, CoreError> {
    i64::try_from(value)
        .map_err(|_| CoreError::Request(format!("{field} value {value} is out of range")))
}

/// Convert a stored counter back; the schema keeps counters non-negative.
pub fn from_db_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
