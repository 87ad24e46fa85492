use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::ContentType;
use crate::store::{RecordStore, StorageBackend};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// A read-only summary of the store, computed fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_entries: usize,
    pub total_tags: usize,
    /// Distinct tags across all records, sorted.
    pub tags_list: Vec<String>,
    pub content_types: BTreeMap<String, usize>,
    pub data_file: PathBuf,
    pub file_size: u64,
}

/// One row of the content type catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub description: String,
    pub count: usize,
}

pub fn compute<B: StorageBackend>(store: &RecordStore<B>) -> Result<Statistics> {
    let records = store.records();

    let tags: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.tags.iter().map(String::as_str))
        .collect();

    let mut content_types = BTreeMap::new();
    for record in records {
        *content_types
            .entry(record.content_type.to_string())
            .or_insert(0) += 1;
    }

    Ok(Statistics {
        total_entries: records.len(),
        total_tags: tags.len(),
        tags_list: tags.into_iter().map(str::to_string).collect(),
        content_types,
        data_file: store.backend().location(),
        file_size: store.backend().size()?,
    })
}

pub fn run<B: StorageBackend>(store: &RecordStore<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_statistics(compute(store)?))
}

/// Every known content type with its description and how many records use
/// it, followed by any unknown types found in the data.
pub fn catalogue<B: StorageBackend>(store: &RecordStore<B>) -> Vec<TypeSummary> {
    let count = |ct: &ContentType| {
        store
            .records()
            .iter()
            .filter(|r| &r.content_type == ct)
            .count()
    };

    let mut rows: Vec<TypeSummary> = ContentType::ALL
        .iter()
        .map(|ct| TypeSummary {
            name: ct.to_string(),
            description: ct.description().to_string(),
            count: count(ct),
        })
        .collect();

    let unknown: BTreeSet<&str> = store
        .records()
        .iter()
        .filter_map(|r| match &r.content_type {
            ContentType::Other(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    for name in unknown {
        let ct = ContentType::Other(name.to_string());
        rows.push(TypeSummary {
            name: name.to_string(),
            description: ct.description().to_string(),
            count: count(&ct),
        });
    }
    rows
}
