use std::num::ParseIntError;

use crate::model::HitRecord;

/// Parse the value of a `last` parameter. Surrounding whitespace is ignored.
pub fn parse_limit(raw: &str) -> Result<i64, ParseIntError> {
    raw.trim().parse()
}

/// Response field holding the `limit` most recent hits.
pub fn history_key(limit: i64) -> String {
    format!("last_{limit}_requests")
}

/// Keep the `limit` most recent records, newest first.
///
/// A limit of zero or less yields nothing; a limit above the record count
/// yields every record. Records sharing a timestamp are ordered by path so
/// the result is stable.
pub fn latest(mut records: Vec<HitRecord>, limit: i64) -> Vec<HitRecord> {
    let Ok(limit) = usize::try_from(limit) else {
        return Vec::new();
    };

    records.sort_by(|a, b| {
        b.timestamp_millis
            .cmp(&a.timestamp_millis)
            .then_with(|| a.path.cmp(&b.path))
    });
    records.truncate(limit);
    records
}
