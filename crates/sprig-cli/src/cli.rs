use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sprig",
    about = "sprig: a small content-addressed version control system",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug detail to stderr (SPRIG_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Run as if sprig was started in DIR
    #[arg(short = 'C', global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init(InitArgs),
    /// Stage working files for the next commit
    Add(AddArgs),
    /// Remove paths from the staging area
    Unstage(UnstageArgs),
    /// Record the staged changes
    Commit(CommitArgs),
    /// Show commit history, newest first
    Log(LogArgs),
    /// Show a commit and the files it records
    Show(ShowArgs),
    /// Diff a working file against the last commit
    Diff(DiffArgs),
    /// Show repository status
    Status(StatusArgs),
    /// Print a file as recorded in a commit
    Cat(CatArgs),
    /// Verify stored objects and the commit chain
    Fsck(FsckArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<PathBuf>,
    /// Default author for commits made without --author
    #[arg(long)]
    pub author: Option<String>,
    /// Name of the branch HEAD starts on
    #[arg(long)]
    pub branch: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct UnstageArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short, long)]
    pub message: String,
    /// Author name (defaults to the repository setting)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    /// Number of commits to show (defaults to the repository setting)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    /// One line per commit: short id and subject
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(default_value = "HEAD")]
    pub rev: String,
}

#[derive(Args)]
pub struct DiffArgs {
    pub path: String,
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct CatArgs {
    pub rev: String,
    pub path: String,
}

#[derive(Args)]
pub struct FsckArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["sprig", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init(_)));
    }

    #[test]
    fn parse_init_with_path_and_author() {
        let cli = Cli::try_parse_from(["sprig", "init", "/tmp/r", "--author", "ada"]).unwrap();
        let Command::Init(args) = cli.command else {
            panic!("parsed the wrong subcommand");
        };
        assert_eq!(args.path, Some(PathBuf::from("/tmp/r")));
        assert_eq!(args.author.as_deref(), Some("ada"));
    }

    #[test]
    fn parse_add_many() {
        let cli = Cli::try_parse_from(["sprig", "add", "a.txt", "b/c.txt"]).unwrap();
        let Command::Add(args) = cli.command else {
            panic!("parsed the wrong subcommand");
        };
        assert_eq!(args.paths, vec!["a.txt", "b/c.txt"]);
    }

    #[test]
    fn add_requires_a_path() {
        assert!(Cli::try_parse_from(["sprig", "add"]).is_err());
    }

    #[test]
    fn parse_commit() {
        let cli = Cli::try_parse_from(["sprig", "commit", "-m", "hello", "--author", "bob"]).unwrap();
        let Command::Commit(args) = cli.command else {
            panic!("parsed the wrong subcommand");
        };
        assert_eq!(args.message, "hello");
        assert_eq!(args.author.as_deref(), Some("bob"));
    }

    #[test]
    fn commit_requires_message() {
        assert!(Cli::try_parse_from(["sprig", "commit"]).is_err());
    }

    #[test]
    fn parse_log_oneline() {
        let cli = Cli::try_parse_from(["sprig", "log", "--oneline", "-n", "5"]).unwrap();
        let Command::Log(args) = cli.command else {
            panic!("parsed the wrong subcommand");
        };
        assert!(args.oneline);
        assert_eq!(args.limit, Some(5));
    }

    #[test]
    fn show_defaults_to_head() {
        let cli = Cli::try_parse_from(["sprig", "show"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("parsed the wrong subcommand");
        };
        assert_eq!(args.rev, "HEAD");
    }

    #[test]
    fn parse_cat() {
        let cli = Cli::try_parse_from(["sprig", "cat", "abcd1234", "a.txt"]).unwrap();
        let Command::Cat(args) = cli.command else {
            panic!("parsed the wrong subcommand");
        };
        assert_eq!(args.rev, "abcd1234");
        assert_eq!(args.path, "a.txt");
    }

    #[test]
    fn parse_global_flags() {
        let cli =
            Cli::try_parse_from(["sprig", "status", "-v", "--format", "json", "-C", "/repo"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.directory, Some(PathBuf::from("/repo")));
    }
}
