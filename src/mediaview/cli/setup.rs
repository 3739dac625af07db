use clap::{Args, Parser, Subcommand, ValueEnum};
use mediaview::view::PerPage;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "mediaview", bin_name = "mediaview", version)]
#[command(
    about = "Browse, filter and edit a media library export",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Media export to read (overrides `media_file` from config)
    #[arg(short = 'f', long, global = true, help_heading = "Options")]
    pub file: Option<PathBuf>,

    /// Extra config file, ahead of ./mediaview.toml and the global one
    #[arg(long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Disable colors
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List media items (default)
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show every field of one media item
    Show {
        id: u64,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Change fields of one media item
    Edit {
        id: u64,

        /// field=value, repeatable (e.g. --set alt_text="A red boat")
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        assignments: Vec<String>,
    },

    /// Change author or date of several items; without --set, show their shared values
    BulkEdit {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u64>,

        #[arg(long = "set", value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
    },

    /// Check one media item against the edit form's rules
    Validate { id: u64 },

    /// List the fields views can use
    Fields,

    /// Show the resolved configuration
    Config {
        /// Print a commented mediaview.toml instead
        #[arg(long)]
        template: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Search the searchable fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// field:operator:value, repeatable (e.g. mime_type:isAny:image/png,image/jpeg)
    #[arg(long = "filter", value_name = "FIELD:OP:VALUE")]
    pub filters: Vec<String>,

    /// field or field:asc|desc
    #[arg(long)]
    pub sort: Option<String>,

    #[arg(short, long)]
    pub page: Option<usize>,

    /// Items per page, or "all"
    #[arg(long)]
    pub per_page: Option<PerPage>,

    /// Columns to show, comma separated
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Load a saved view (DataViews JSON); flags given here override it
    #[arg(long, value_name = "FILE")]
    pub view: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn no_subcommand_is_allowed() {
        assert!(parse(&["mediaview"]).command.is_none());
    }

    #[test]
    fn list_flags() {
        let cli = parse(&[
            "mediaview",
            "list",
            "--search",
            "sunset",
            "--filter",
            "mime_type:isAny:image/png",
            "--filter",
            "filesize:isGreaterThan:1000",
            "--sort",
            "date:desc",
            "--page",
            "2",
            "--per-page",
            "all",
            "--fields",
            "date,alt_text",
            "-o",
            "json",
        ]);
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.search.as_deref(), Some("sunset"));
        assert_eq!(args.filters.len(), 2);
        assert_eq!(args.sort.as_deref(), Some("date:desc"));
        assert_eq!(args.page, Some(2));
        assert_eq!(args.per_page, Some(PerPage::All));
        assert_eq!(args.fields, vec!["date", "alt_text"]);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn per_page_rejects_zero() {
        assert!(Cli::try_parse_from(["mediaview", "list", "--per-page", "0"]).is_err());
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = parse(&["mediaview", "show", "3", "--file", "media.json", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.file, Some(PathBuf::from("media.json")));
        assert!(matches!(cli.command, Some(Commands::Show { id: 3, .. })));
    }

    #[test]
    fn edit_requires_assignments() {
        assert!(Cli::try_parse_from(["mediaview", "edit", "1"]).is_err());
        let cli = parse(&["mediaview", "edit", "1", "--set", "alt_text=Boat"]);
        let Some(Commands::Edit { assignments, .. }) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(assignments, vec!["alt_text=Boat"]);
    }

    #[test]
    fn bulk_edit_takes_many_ids() {
        let cli = parse(&["mediaview", "bulk-edit", "1", "2", "3", "--set", "author=2"]);
        let Some(Commands::BulkEdit { ids, assignments }) = cli.command else {
            panic!("expected bulk-edit");
        };
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(assignments.len(), 1);
    }
}
