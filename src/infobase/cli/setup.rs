use clap::{Args, Parser, Subcommand};
use infobase::model::ContentType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "infobase", bin_name = "infobase", version)]
#[command(
    about = "Personal information store with ranked full-text search",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $INFOBASE_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub home: Option<PathBuf>,

    /// Use this data file instead of the configured one
    #[arg(short, long, global = true, value_name = "PATH", help_heading = "Options")]
    pub file: Option<PathBuf>,

    /// Print records and results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Record(RecordCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

/// Field values shared by `add` and `update`.
#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Source URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Comma separated tags (e.g. "rust,cli")
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Content type: article, link, image, video, code, news, tutorial, tool
    #[arg(long = "type", short = 'T', value_name = "TYPE")]
    pub content_type: Option<ContentType>,

    /// Metadata as key=value, repeatable; a JSON object or "key: value" lines also work
    #[arg(short, long = "meta", value_name = "META")]
    pub meta: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// Add a record
    #[command(alias = "n", display_order = 1)]
    Add {
        title: String,

        /// Body text (required for articles)
        #[arg(short, long, default_value = "")]
        content: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List records
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Only records of this content type
        #[arg(long = "type", short = 'T', value_name = "TYPE")]
        content_type: Option<ContentType>,
    },

    /// Search records, best match first
    #[command(alias = "s", display_order = 3)]
    Search {
        /// Query words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Show the relevance score of each hit
        #[arg(long)]
        scores: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// Show one or more records in full
    #[command(alias = "v", display_order = 10)]
    Show {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u64>,
    },

    /// Change fields of a record
    #[command(alias = "e", display_order = 11)]
    Update {
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body text
        #[arg(short, long)]
        content: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete one or more records
    #[command(alias = "rm", display_order = 12)]
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Export all records to a JSON file (default: export_<timestamp>.json)
    #[command(display_order = 20)]
    Export { file: Option<PathBuf> },

    /// Append records from a JSON array file
    #[command(display_order = 21)]
    Import { file: PathBuf },

    /// Show collection statistics
    #[command(display_order = 22)]
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// List content types with descriptions and counts
    #[command(display_order = 30)]
    Types,

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (data-file, id-policy, query-mode, validate-updates)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("infobase").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_add_with_fields() {
        let cli = parse(&[
            "add", "Rust Guide", "-c", "body", "--type", "code", "-t", "rust,cli", "-m",
            "code=rust",
        ]);
        match cli.command {
            Some(Commands::Core(CoreCommands::Add {
                title,
                content,
                fields,
            })) => {
                assert_eq!(title, "Rust Guide");
                assert_eq!(content, "body");
                assert_eq!(fields.content_type, Some(ContentType::Code));
                assert_eq!(fields.tags.as_deref(), Some("rust,cli"));
                assert_eq!(fields.meta, vec!["code=rust"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let result = Cli::try_parse_from(["infobase", "add", "T", "--type", "podcast"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = parse(&["delete", "1", "3", "--home", "/tmp/x", "--json"]);
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/x")));
        assert!(cli.json);
        match cli.command {
            Some(Commands::Record(RecordCommands::Delete { ids })) => assert_eq!(ids, vec![1, 3]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn search_joins_words() {
        let cli = parse(&["search", "rust", "guide", "--scores"]);
        match cli.command {
            Some(Commands::Core(CoreCommands::Search { query, scores })) => {
                assert_eq!(query.join(" "), "rust guide");
                assert!(scores);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn bare_invocation_has_no_command() {
        assert!(parse(&[]).command.is_none());
    }
}
