//! Roster import: bulk-load entries from CSV.

use crate::models::TournamentError;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One roster row: `title,author,image`. Author and image may be blank;
/// upload defaults apply when the record becomes an entry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub image: String,
}

/// Parse a roster CSV (headered `title,author,image`) into records.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<RosterRecord>, TournamentError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let record: RosterRecord = row.map_err(|e| TournamentError::InvalidRoster(e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}
