//! Relevance-ranked free-text search.
//!
//! Each record is scored against the lower-cased query:
//!
//! | where                  | how                                 | points |
//! |------------------------|-------------------------------------|--------|
//! | title                  | query is a substring                | 10     |
//! | content                | each pattern match                  | 2      |
//! | tags                   | each tag containing the query       | 5      |
//! | searchable text        | each pattern match                  | 1      |
//!
//! "Pattern" means the query compiled as a regular expression
//! ([`QueryMode::Regex`]) or escaped to match literally
//! ([`QueryMode::Literal`]). Records scoring zero are dropped; the rest are
//! ordered by descending score, ties keeping collection order.
//!
//! Matches are counted with [`Regex::find_iter`], which never reports an
//! empty match that starts where the previous match ended. Patterns that can
//! match the empty string therefore count fewer hits than engines which do
//! report it: `a*` finds 3 matches in `bab` (`""`, `"a"`, and `""` at the end)
//! where Python's `re.findall` finds 4.

use crate::commands::CmdResult;
use crate::config::QueryMode;
use crate::error::{InfobaseError, Result};
use crate::model::Record;
use crate::store::{RecordStore, StorageBackend};
use regex::Regex;

pub const TITLE_HIT: u64 = 10;
pub const CONTENT_MATCH: u64 = 2;
pub const TAG_HIT: u64 = 5;
pub const INDEX_MATCH: u64 = 1;

pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    query: &str,
    mode: QueryMode,
) -> Result<CmdResult> {
    let ranked = rank(store.records(), query, mode)?;

    let mut result = CmdResult::default();
    for (record, score) in ranked {
        result.listed_records.push(record.clone());
        result.scores.push(score);
    }
    Ok(result)
}

/// Scores every record and returns the positive ones, best first.
pub fn rank<'a>(records: &'a [Record], query: &str, mode: QueryMode) -> Result<Vec<(&'a Record, u64)>> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let needle = query.to_lowercase();
    let pattern = compile(&needle, mode)?;

    let mut scored: Vec<(&Record, u64)> = records
        .iter()
        .map(|record| (record, score(record, &needle, &pattern)))
        .filter(|(_, score)| *score > 0)
        .collect();

    // sort_by is stable, so equal scores stay in collection order
    scored.sort_by(|(_, a), (_, b)| b.cmp(a));
    Ok(scored)
}

/// Relevance of one record. `needle` must already be lower-cased and
/// `pattern` compiled from it.
pub fn score(record: &Record, needle: &str, pattern: &Regex) -> u64 {
    let mut score = 0;

    if record.title.to_lowercase().contains(needle) {
        score += TITLE_HIT;
    }

    let content_matches = pattern.find_iter(&record.content.to_lowercase()).count() as u64;
    score += content_matches * CONTENT_MATCH;

    let tag_hits = record
        .tags
        .iter()
        .filter(|tag| tag.to_lowercase().contains(needle))
        .count() as u64;
    score += tag_hits * TAG_HIT;

    let index_matches = pattern.find_iter(&record.searchable_text).count() as u64;
    score += index_matches * INDEX_MATCH;

    score
}

fn compile(needle: &str, mode: QueryMode) -> Result<Regex> {
    if mode == QueryMode::Regex {
        match Regex::new(needle) {
            Ok(pattern) => return Ok(pattern),
            Err(e) => {
                log::warn!(
                    "Query '{}' is not a valid pattern ({}); matching it literally",
                    needle,
                    e
                );
            }
        }
    }
    Regex::new(&regex::escape(needle))
        .map_err(|e| InfobaseError::Api(format!("Query cannot be matched: {}", e)))
}
