//! # CLI Layer
//!
//! The CLI is the **only** place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Initializes the logger
//! - Decides where the data directory is
//! - Saves the store after a mutation
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with API and configuration
//! - `handle_*()`: Per-command handlers that call the API and print results

use super::render::{
    print_messages, render_full_records, render_json, render_record_list, render_statistics,
    render_types,
};
use super::setup::{
    Cli, Commands, CoreCommands, DataCommands, FieldArgs, MiscCommands, RecordCommands,
};
use clap::Parser;
use directories::ProjectDirs;
use infobase::api::{CmdResult, InfobaseApi, RecordFilter};
use infobase::config::InfobaseConfig;
use infobase::error::{InfobaseError, Result};
use infobase::model::{parse_metadata, parse_tags, ContentType, Metadata, NewRecord, RecordPatch};
use infobase::store::fs::FsBackend;
use std::path::{Path, PathBuf};

/// Overrides the data directory when `--home` is not given.
pub const HOME_ENV: &str = "INFOBASE_HOME";

struct AppContext {
    api: InfobaseApi<FsBackend>,
    json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let home = resolve_home(cli.home.as_deref())?;
    log::debug!("Using data directory {}", home.display());

    // config does not need the store
    if let Some(Commands::Misc(MiscCommands::Config { key, value })) = &cli.command {
        return handle_config(&home, key.as_deref(), value.as_deref(), cli.json);
    }

    let mut ctx = init_context(&cli, &home)?;

    match cli.command {
        Some(Commands::Core(cmd)) => match cmd {
            CoreCommands::Add {
                title,
                content,
                fields,
            } => handle_add(&mut ctx, title, content, fields),
            CoreCommands::List { content_type } => handle_list(&mut ctx, content_type),
            CoreCommands::Search { query, scores } => {
                handle_search(&mut ctx, &query.join(" "), scores)
            }
        },
        Some(Commands::Record(cmd)) => match cmd {
            RecordCommands::Show { ids } => handle_show(&mut ctx, &ids),
            RecordCommands::Update {
                id,
                title,
                content,
                fields,
            } => handle_update(&mut ctx, id, title, content, fields),
            RecordCommands::Delete { ids } => handle_delete(&mut ctx, &ids),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Export { file } => handle_export(&mut ctx, file),
            DataCommands::Import { file } => handle_import(&mut ctx, &file),
            DataCommands::Stats => handle_stats(&mut ctx),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Types => handle_types(&mut ctx),
            MiscCommands::Config { .. } => Ok(()),
        },
        None => handle_list(&mut ctx, None),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    // RUST_LOG still wins when set
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

fn resolve_home(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(home) = flag {
        return Ok(home.to_path_buf());
    }
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    ProjectDirs::from("com", "infobase", "infobase")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| InfobaseError::Config("Could not determine a data directory".into()))
}

fn init_context(cli: &Cli, home: &Path) -> Result<AppContext> {
    let mut config = InfobaseConfig::load(home)?;

    if let Some(file) = &cli.file {
        let file = if file.is_absolute() {
            file.clone()
        } else {
            std::env::current_dir()?.join(file)
        };
        config.data_file = file.to_string_lossy().into_owned();
    }

    Ok(AppContext {
        api: InfobaseApi::open(home, config),
        json: cli.json,
    })
}

/// Saves and prints the outcome of a command that changed the collection.
fn finish_mutation(ctx: &AppContext, result: &CmdResult) -> Result<()> {
    ctx.api.save()?;
    if ctx.json {
        print!("{}", render_json(&result.affected_records)?);
    } else {
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_add(
    ctx: &mut AppContext,
    title: String,
    content: String,
    fields: FieldArgs,
) -> Result<()> {
    let mut input = NewRecord::new(title, content)
        .with_type(fields.content_type.unwrap_or_default())
        .with_url(fields.url.unwrap_or_default());
    if let Some(tags) = fields.tags {
        input = input.with_tags(parse_tags(&tags));
    }
    if let Some(metadata) = collect_metadata(&fields.meta)? {
        input = input.with_metadata(metadata);
    }

    let result = ctx.api.add_record(input)?;
    finish_mutation(ctx, &result)
}

fn handle_update(
    ctx: &mut AppContext,
    id: u64,
    title: Option<String>,
    content: Option<String>,
    fields: FieldArgs,
) -> Result<()> {
    let patch = RecordPatch {
        title,
        content,
        url: fields.url,
        tags: fields.tags.as_deref().map(parse_tags),
        content_type: fields.content_type,
        metadata: collect_metadata(&fields.meta)?,
    };

    let result = ctx.api.update_record(id, patch)?;
    finish_mutation(ctx, &result)
}

fn handle_delete(ctx: &mut AppContext, ids: &[u64]) -> Result<()> {
    let result = ctx.api.delete_records(ids)?;
    if result.affected_records.is_empty() {
        print_messages(&result.messages);
        return Err(InfobaseError::Api("Nothing to delete".into()));
    }
    finish_mutation(ctx, &result)
}

fn handle_list(ctx: &mut AppContext, content_type: Option<ContentType>) -> Result<()> {
    let result = ctx.api.get_records(&RecordFilter { content_type })?;
    if ctx.json {
        print!("{}", render_json(&result.listed_records)?);
    } else {
        print!("{}", render_record_list(&result.listed_records, None));
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_show(ctx: &mut AppContext, ids: &[u64]) -> Result<()> {
    let result = ctx.api.view_records(ids)?;
    if ctx.json {
        print!("{}", render_json(&result.listed_records)?);
    } else {
        print!("{}", render_full_records(&result.listed_records));
    }
    Ok(())
}

fn handle_search(ctx: &mut AppContext, query: &str, show_scores: bool) -> Result<()> {
    let result = ctx.api.search(query)?;
    if ctx.json {
        print!("{}", render_json(&result.scored())?);
        return Ok(());
    }
    let scores = show_scores.then_some(result.scores.as_slice());
    print!("{}", render_record_list(&result.listed_records, scores));
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &mut AppContext, file: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.export(file)?;
    if ctx.json {
        print!("{}", render_json(&result.written_path)?);
    } else {
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let result = ctx.api.import(file)?;
    finish_mutation(ctx, &result)
}

fn handle_stats(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.statistics()?;
    if let Some(stats) = &result.statistics {
        if ctx.json {
            print!("{}", render_json(stats)?);
        } else {
            print!("{}", render_statistics(stats));
        }
    }
    Ok(())
}

fn handle_types(ctx: &mut AppContext) -> Result<()> {
    let types = ctx.api.content_types();
    if ctx.json {
        print!("{}", render_json(&types)?);
    } else {
        print!("{}", render_types(&types));
    }
    Ok(())
}

fn handle_config(home: &Path, key: Option<&str>, value: Option<&str>, json: bool) -> Result<()> {
    let mut config = InfobaseConfig::load(home)?;

    match (key, value) {
        (None, _) => {
            if json {
                print!("{}", render_json(&config)?);
            } else {
                for key in InfobaseConfig::keys() {
                    println!("{} = {}", key, config.get(key)?);
                }
            }
        }
        (Some(key), None) => println!("{}", config.get(key)?),
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save(home)?;
            log::info!("Saved {} = {} to {}", key, value, home.display());
            println!("{} = {}", key, config.get(key)?);
        }
    }
    Ok(())
}

/// Folds `--meta` values into one map. Each value is `key=value`, a JSON
/// object, or `key: value` lines.
fn collect_metadata(entries: &[String]) -> Result<Option<Metadata>> {
    if entries.is_empty() {
        return Ok(None);
    }

    let mut metadata = Metadata::new();
    for entry in entries {
        let parsed = match entry.split_once('=') {
            Some((key, value)) if !entry.trim_start().starts_with('{') && !key.contains(':') => {
                let mut pair = Metadata::new();
                pair.insert(
                    key.trim().to_string(),
                    serde_json::Value::String(value.trim().to_string()),
                );
                pair
            }
            _ => parse_metadata(entry),
        };
        if parsed.is_empty() {
            return Err(InfobaseError::Api(format!("Invalid metadata: {}", entry)));
        }
        metadata.extend(parsed);
    }
    Ok(Some(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn metadata_absent_when_not_given() {
        assert!(collect_metadata(&[]).unwrap().is_none());
    }

    #[test]
    fn metadata_from_pairs() {
        let metadata = collect_metadata(&entries(&["code=rust", "stars = 5"]))
            .unwrap()
            .unwrap();
        assert_eq!(metadata.get("code"), Some(&json!("rust")));
        assert_eq!(metadata.get("stars"), Some(&json!("5")));
    }

    #[test]
    fn metadata_from_json_and_lines() {
        let metadata = collect_metadata(&entries(&[
            r#"{"stars": 5, "query": "a=b"}"#,
            "url: http://x.y",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(metadata.get("stars"), Some(&json!(5)));
        assert_eq!(metadata.get("query"), Some(&json!("a=b")));
        assert_eq!(metadata.get("url"), Some(&json!("http://x.y")));
    }

    #[test]
    fn unparseable_metadata_is_rejected() {
        assert!(collect_metadata(&entries(&["nothing useful"])).is_err());
    }

    #[test]
    fn home_flag_wins() {
        let home = resolve_home(Some(Path::new("/tmp/infobase-flag"))).unwrap();
        assert_eq!(home, PathBuf::from("/tmp/infobase-flag"));
    }
}
