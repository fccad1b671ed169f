//! Command-line argument definitions and parsing

use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use sitematter::core::{split_items, Field, FieldKind, FieldOperation, FieldRequest, Selection};
use sitematter::error::{Result, SiteMatterError};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "sitematter",
    version,
    about = "Manage the front matter of static-site posts",
    long_about = "sitematter edits tags, categories and other metadata fields in the \
                  YAML, TOML or JSON front matter of a directory of posts, and keeps \
                  file modification times in step with each post's date."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Set file modification times from each post's date
    Datetime(DatetimeArgs),
    /// Add, remove, set, copy, move or dump tags, categories and custom fields
    Tag(TagArgs),
}

/// Post selection options shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Select all posts
    #[arg(long)]
    pub all: bool,

    /// Select posts whose title contains PATTERN (case-insensitive)
    #[arg(long, value_name = "PATTERN")]
    pub title: Option<String>,

    /// Select posts from this date onwards
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_cli_date)]
    pub fromdate: Option<NaiveDate>,

    /// Select posts up to and including this date
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_cli_date)]
    pub todate: Option<NaiveDate>,

    /// Select posts by file path (one or more); overrides the other criteria
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub path: Vec<PathBuf>,
}

impl SelectionArgs {
    pub fn to_selection(&self, text: Option<String>) -> Selection {
        Selection {
            all: self.all,
            title: self.title.clone(),
            from_date: self.fromdate,
            to_date: self.todate,
            text,
            paths: self.path.clone(),
        }
    }
}

/// Options shared by all commands
#[derive(Args, Debug, Clone)]
pub struct CommonOpts {
    /// Show what would be changed without modifying files
    #[arg(long)]
    pub dry_run: bool,

    /// Directory holding the posts
    #[arg(
        long,
        value_name = "DIR",
        env = "SITEMATTER_CONTENT_DIR",
        default_value = "content/posts"
    )]
    pub content_dir: PathBuf,
}

/// Arguments for the datetime command
#[derive(Args, Debug, Clone)]
#[command(after_help = "Examples:\n  \
    sitematter datetime --all\n  \
    sitematter datetime --fromdate 2024-01-01 --dry-run\n  \
    sitematter datetime --path content/posts/hello.md")]
pub struct DatetimeArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub opts: CommonOpts,
}

/// Arguments for the tag command
#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("field")
        .args(["categories", "custom_list", "custom_label"])
        .multiple(false)
))]
#[command(after_help = "Examples:\n  \
    sitematter tag --all --add python\n  \
    sitematter tag --title docker --remove draft\n  \
    sitematter tag --all --categories --add Tech\n  \
    sitematter tag --title \"My Post\" --custom-label status --set published\n  \
    sitematter tag --all --categories --move tags\n  \
    sitematter tag --all --custom-label author --dump")]
pub struct TagArgs {
    /// Operate on categories instead of tags
    #[arg(long, help_heading = "Field selection")]
    pub categories: bool,

    /// Operate on a custom list field (e.g. keywords)
    #[arg(long, value_name = "FIELD", help_heading = "Field selection")]
    pub custom_list: Option<String>,

    /// Operate on a custom single-value field (e.g. status, series)
    #[arg(long, value_name = "FIELD", help_heading = "Field selection")]
    pub custom_label: Option<String>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Select posts with PATTERN in the front matter or content
    #[arg(long, value_name = "PATTERN", help_heading = "Post selection")]
    pub text: Option<String>,

    /// Add items to a list field (comma-separated)
    #[arg(long, value_name = "ITEM[,ITEM...]", help_heading = "Operations")]
    pub add: Option<String>,

    /// Remove items from a list field, or remove a label field entirely
    #[arg(long, value_name = "ITEM[,ITEM...]", help_heading = "Operations")]
    pub remove: Option<String>,

    /// Set the value of a label field
    #[arg(long, value_name = "VALUE", help_heading = "Operations")]
    pub set: Option<String>,

    /// Remove a label field
    #[arg(long, conflicts_with = "set", help_heading = "Operations")]
    pub clear: bool,

    /// Copy values from another field into the selected one
    #[arg(
        long,
        value_name = "FIELD",
        conflicts_with_all = ["add", "remove", "set", "clear", "move_from"],
        help_heading = "Operations"
    )]
    pub copy: Option<String>,

    /// Move values from another field into the selected one
    #[arg(
        long = "move",
        value_name = "FIELD",
        conflicts_with_all = ["add", "remove", "set", "clear"],
        help_heading = "Operations"
    )]
    pub move_from: Option<String>,

    /// Report current values of the selected field without modifying
    #[arg(
        long,
        conflicts_with_all = ["add", "remove", "set", "clear", "copy", "move_from"],
        help_heading = "Operations"
    )]
    pub dump: bool,

    #[command(flatten)]
    pub opts: CommonOpts,
}

impl TagArgs {
    /// Resolve the field and operation into a validated request
    pub fn to_request(&self) -> Result<FieldRequest> {
        let field = Field::resolve(
            self.categories,
            self.custom_list.as_deref(),
            self.custom_label.as_deref(),
        )?;

        let operation = if self.dump {
            FieldOperation::Dump
        } else if let Some(source) = &self.copy {
            FieldOperation::Copy {
                source: source.clone(),
            }
        } else if let Some(source) = &self.move_from {
            FieldOperation::Move {
                source: source.clone(),
            }
        } else if field.kind == FieldKind::Label {
            if self.add.is_some() {
                return Err(SiteMatterError::invalid_request(
                    "cannot use --add with label fields; use --set instead",
                ));
            }
            // on a label, --remove with any value clears it
            FieldOperation::Assign {
                value: self.set.clone(),
                clear: self.clear || self.remove.is_some(),
            }
        } else if self.set.is_some() || self.clear {
            FieldOperation::Assign {
                value: self.set.clone(),
                clear: self.clear,
            }
        } else {
            FieldOperation::Edit {
                add: self.add.as_deref().map(split_items).unwrap_or_default(),
                remove: self.remove.as_deref().map(split_items).unwrap_or_default(),
            }
        };

        FieldRequest::new(field, operation)
    }

    pub fn to_selection(&self) -> Selection {
        self.selection.to_selection(self.text.clone())
    }
}

fn parse_cli_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date format: {}. Use YYYY-MM-DD", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn tag_args(argv: &[&str]) -> TagArgs {
        let mut full = vec!["sitematter", "tag"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Tag(args) => args,
            Commands::Datetime(_) => panic!("expected tag command"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tag_defaults_to_tags_edit() {
        let args = tag_args(&["--all", "--add", "python, rust"]);
        let request = args.to_request().unwrap();
        assert_eq!(request.field(), &Field::tags());
        match request.operation() {
            FieldOperation::Edit { add, remove } => {
                assert_eq!(add.len(), 2);
                assert!(remove.is_empty());
            }
            other => panic!("unexpected operation {:?}", other),
        }
        assert_eq!(args.opts.content_dir, PathBuf::from("content/posts"));
    }

    #[test]
    fn test_remove_on_label_means_clear() {
        let args = tag_args(&["--all", "--custom-label", "draft", "--remove", "true"]);
        let request = args.to_request().unwrap();
        assert_eq!(request.field().kind, FieldKind::Label);
        assert_eq!(
            request.operation(),
            &FieldOperation::Assign {
                value: None,
                clear: true
            }
        );
    }

    #[test]
    fn test_add_on_label_is_rejected() {
        let err = tag_args(&["--all", "--custom-label", "status", "--add", "x"])
            .to_request()
            .unwrap_err();
        assert!(matches!(err, SiteMatterError::InvalidRequest { .. }));
    }

    #[test]
    fn test_set_on_list_is_rejected() {
        let err = tag_args(&["--all", "--set", "x"]).to_request().unwrap_err();
        assert!(matches!(err, SiteMatterError::InvalidRequest { .. }));
    }

    #[test]
    fn test_field_selectors_conflict() {
        assert!(Cli::try_parse_from([
            "sitematter",
            "tag",
            "--all",
            "--categories",
            "--custom-list",
            "keywords",
            "--dump"
        ])
        .is_err());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["sitematter", "datetime", "--fromdate", "2023/01/01"]).is_err());
        assert!(Cli::try_parse_from(["sitematter", "datetime", "--fromdate", "2023-01-01"]).is_ok());
    }

    #[test]
    fn test_multiple_paths() {
        let args = tag_args(&["--path", "a.md", "b.md", "--dump"]);
        assert_eq!(args.selection.path.len(), 2);
        assert!(!args.to_selection().all);
    }
}
