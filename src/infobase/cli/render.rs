//! # Rendering
//!
//! Every `render_*` function returns the finished text so handlers only
//! print, and tests can inspect output without a terminal.
//!
//! The list view is one line per record:
//! - `id` (right aligned, 5 chars incl. the dot)
//! - `type` (10 chars)
//! - title and a content preview (fill), truncated to fit
//! - score, for search results
//! - time since creation (14 chars, right aligned)

use chrono::Local;
use colored::Colorize;
use infobase::api::{CmdMessage, MessageLevel, Statistics, TypeSummary};
use infobase::error::Result;
use infobase::model::{Record, Timestamp};
use serde::Serialize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const COL_ID: usize = 5;
const COL_TYPE: usize = 10;
const COL_SCORE: usize = 6;
const COL_TIME: usize = 14;
const PREVIEW_CHARS: usize = 50;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

/// One line per record. `scores`, when given, pairs up with `records`.
pub fn render_record_list(records: &[Record], scores: Option<&[u64]>) -> String {
    if records.is_empty() {
        return "No records found.\n".to_string();
    }

    let mut output = String::new();
    for (i, record) in records.iter().enumerate() {
        let id = format!("{:>width$}", format!("{}.", record.id), width = COL_ID - 1);
        let kind = format!("{:<width$}", record.content_type.as_str(), width = COL_TYPE);

        let preview: String = record
            .content
            .chars()
            .take(PREVIEW_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let title_content = if preview.is_empty() {
            record.title.clone()
        } else {
            format!("{} {}", record.title, preview.dimmed())
        };

        let score = scores
            .and_then(|s| s.get(i))
            .map(|s| format!("{:>width$}", s, width = COL_SCORE));
        let score_width = score.as_ref().map_or(0, |_| COL_SCORE);

        let fixed = COL_ID + COL_TYPE + score_width + COL_TIME + 1;
        let available = LINE_WIDTH.saturating_sub(fixed);
        // width is measured on the uncolored text
        let plain = if preview.is_empty() {
            record.title.clone()
        } else {
            format!("{} {}", record.title, preview)
        };
        let shown = truncate_to_width(&plain, available);
        let display = if shown == plain { title_content } else { shown.clone() };
        let padding = available.saturating_sub(shown.width());

        output.push_str(&format!(
            "{} {}{}{}{}{}\n",
            id.yellow(),
            kind.cyan(),
            display,
            " ".repeat(padding),
            score.map(|s| s.bold().to_string()).unwrap_or_default(),
            format_time_ago(&record.created_at).dimmed()
        ));
    }
    output
}

/// Full view of each record, separated by a rule.
pub fn render_full_records(records: &[Record]) -> String {
    let mut output = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            output.push_str("\n================================\n\n");
        }
        output.push_str(&format!(
            "{} {}\n",
            format!("{}.", record.id).yellow(),
            record.title.bold()
        ));
        output.push_str(&field_line("type", record.content_type.as_str()));
        if !record.url.is_empty() {
            output.push_str(&field_line("url", &record.url));
        }
        if !record.tags.is_empty() {
            output.push_str(&field_line("tags", &record.tags.join(", ")));
        }
        for (key, value) in &record.metadata {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            output.push_str(&field_line(key, &value));
        }
        output.push_str(&field_line("created", &record.created_at.to_string()));
        output.push_str(&field_line("updated", &record.updated_at.to_string()));
        if !record.content.is_empty() {
            output.push_str("--------------------------------\n");
            output.push_str(&record.content);
            output.push('\n');
        }
    }
    output
}

fn field_line(label: &str, value: &str) -> String {
    format!("  {:<10} {}\n", format!("{}:", label).dimmed(), value)
}

pub fn render_statistics(stats: &Statistics) -> String {
    let mut output = String::new();
    output.push_str(&format!("{:<14} {}\n", "Records:", stats.total_entries));
    output.push_str(&format!("{:<14} {}\n", "Tags:", stats.total_tags));
    if !stats.tags_list.is_empty() {
        output.push_str(&format!("  {}\n", stats.tags_list.join(", ").dimmed()));
    }
    if !stats.content_types.is_empty() {
        output.push_str("Content types:\n");
        for (name, count) in &stats.content_types {
            output.push_str(&format!("  {:<12} {}\n", name, count));
        }
    }
    output.push_str(&format!(
        "{:<14} {}\n",
        "Data file:",
        stats.data_file.display()
    ));
    output.push_str(&format!("{:<14} {} bytes\n", "File size:", stats.file_size));
    output
}

pub fn render_types(types: &[TypeSummary]) -> String {
    types
        .iter()
        .map(|t| {
            format!(
                "{:<10} {:>5}  {}\n",
                t.name.cyan(),
                t.count,
                t.description.dimmed()
            )
        })
        .collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

/// Relative age of a record. Timestamps in a foreign layout are shown as stored.
fn format_time_ago(created_at: &Timestamp) -> String {
    let time_str = match created_at.datetime() {
        Some(at) => {
            let duration = Local::now().naive_local().signed_duration_since(at);
            Formatter::new().convert(duration.to_std().unwrap_or_default())
        }
        None => created_at.to_string(),
    };

    format!("{:>width$}", time_str, width = COL_TIME)
}
