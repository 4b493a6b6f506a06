use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;
use sprig_sdk::{unify_separators, Commit, RepoConfig, RepoStatus, Repository, SdkError};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let cwd = match &cli.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot read the current directory")?,
    };
    let cwd = cwd
        .canonicalize()
        .with_context(|| format!("cannot access {}", cwd.display()))?;
    debug!(cwd = %cwd.display(), "resolved working directory");
    let fmt = cli.format;

    match cli.command {
        Command::Init(args) => cmd_init(&cwd, args, fmt),
        Command::Status(_) => cmd_status(&cwd, fmt),
        Command::Add(args) => cmd_add(&open(&cwd)?, &cwd, args, fmt),
        Command::Unstage(args) => cmd_unstage(&open(&cwd)?, &cwd, args, fmt),
        Command::Commit(args) => cmd_commit(&open(&cwd)?, args, fmt),
        Command::Log(args) => cmd_log(&open(&cwd)?, args, fmt),
        Command::Show(args) => cmd_show(&open(&cwd)?, args, fmt),
        Command::Diff(args) => cmd_diff(&open(&cwd)?, &cwd, args, fmt),
        Command::Cat(args) => cmd_cat(&open(&cwd)?, &cwd, args, fmt),
        Command::Fsck(_) => cmd_fsck(&open(&cwd)?, fmt),
    }
}

fn open(cwd: &Path) -> anyhow::Result<Repository> {
    Ok(Repository::discover(cwd)?)
}

/// Paths on the command line are relative to where sprig runs, not to the
/// repository root.
fn from_cwd(cwd: &Path, path: &str) -> String {
    cwd.join(path).to_string_lossy().into_owned()
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn branch_name(status: &RepoStatus) -> &str {
    status
        .current_ref
        .as_deref()
        .map(|r| r.trim_start_matches("refs/heads/"))
        .unwrap_or("(none)")
}

fn cmd_init(cwd: &Path, args: InitArgs, fmt: OutputFormat) -> anyhow::Result<()> {
    let target: PathBuf = match args.path {
        Some(path) => cwd.join(path),
        None => cwd.to_path_buf(),
    };
    let mut config = RepoConfig::default();
    if let Some(author) = args.author {
        config.default_author = author;
    }
    if let Some(branch) = args.branch {
        config.default_branch = branch;
    }
    let repo = Repository::init_with_config(&target, config)?;

    if fmt == OutputFormat::Json {
        return print_json(&repo.status()?);
    }
    println!(
        "{} Initialized empty sprig repository in {}",
        "✓".green().bold(),
        repo.control_dir().display().to_string().bold()
    );
    println!("  Branch: {}", repo.config().default_branch.yellow());
    Ok(())
}

#[derive(Serialize)]
struct StatusView {
    #[serde(flatten)]
    status: RepoStatus,
    untracked: Vec<String>,
}

fn cmd_status(cwd: &Path, fmt: OutputFormat) -> anyhow::Result<()> {
    let view = match Repository::discover(cwd) {
        Ok(repo) => StatusView {
            status: repo.status()?,
            untracked: repo.untracked()?,
        },
        Err(SdkError::NotARepository(_)) => StatusView {
            status: RepoStatus::uninitialized(),
            untracked: Vec::new(),
        },
        Err(e) => return Err(e.into()),
    };

    if fmt == OutputFormat::Json {
        return print_json(&view);
    }
    let status = &view.status;
    if !status.initialized {
        println!("{}", "Not a sprig repository (run `sprig init`).".yellow());
        return Ok(());
    }
    println!("On branch {}", branch_name(status).yellow().bold());
    match status.head {
        Some(id) => println!("HEAD: {} ({} commits)", id.short_hex().yellow(), status.total_commits),
        None => println!("No commits yet"),
    }
    if status.staged_paths.is_empty() {
        println!("\nNothing staged.");
    } else {
        println!("\nChanges to be committed:");
        for path in &status.staged_paths {
            println!("  {} {}", "staged:".green(), path);
        }
    }
    if !view.untracked.is_empty() {
        println!("\nUntracked files:");
        for path in &view.untracked {
            println!("  {}", path.red());
        }
    }
    Ok(())
}

fn cmd_add(repo: &Repository, cwd: &Path, args: AddArgs, fmt: OutputFormat) -> anyhow::Result<()> {
    let mut staged = Vec::new();
    for path in &args.paths {
        let entry = repo
            .stage_file(&from_cwd(cwd, path))
            .with_context(|| format!("cannot stage {path}"))?;
        if fmt == OutputFormat::Text {
            println!(
                "  {} {} {}",
                "staged:".green(),
                entry.path,
                entry.digest.short_hex().dimmed()
            );
        }
        staged.push(entry);
    }
    if fmt == OutputFormat::Json {
        print_json(&staged)?;
    }
    Ok(())
}

fn cmd_unstage(
    repo: &Repository,
    cwd: &Path,
    args: UnstageArgs,
    fmt: OutputFormat,
) -> anyhow::Result<()> {
    let mut results = Vec::new();
    for path in &args.paths {
        let removed = repo.unstage(&from_cwd(cwd, path))?;
        if fmt == OutputFormat::Text {
            if removed {
                println!("  {} {}", "unstaged:".yellow(), path);
            } else {
                println!("  {} {}", "not staged:".dimmed(), path);
            }
        }
        results.push(serde_json::json!({ "path": path, "removed": removed }));
    }
    if fmt == OutputFormat::Json {
        print_json(&results)?;
    }
    Ok(())
}

fn cmd_commit(repo: &Repository, args: CommitArgs, fmt: OutputFormat) -> anyhow::Result<()> {
    let commit = repo.commit(&args.message, args.author.as_deref())?;
    if fmt == OutputFormat::Json {
        return print_json(&commit);
    }
    println!(
        "[{} {}] {}",
        repo.config().default_branch.yellow(),
        commit.id.short_hex().bold(),
        commit.summary()
    );
    println!("  {} file(s) committed", commit.files.len());
    Ok(())
}

fn print_commit_header(commit: &Commit) {
    println!("{} {}", "commit".yellow(), commit.id.to_hex().yellow());
    if let Some(parent) = commit.parent {
        println!("Parent: {}", parent.short_hex());
    }
    println!("Author: {}", commit.author);
    println!("Date:   {}", commit.timestamp);
    println!();
    for line in commit.message.lines() {
        println!("    {line}");
    }
}

fn cmd_log(repo: &Repository, args: LogArgs, fmt: OutputFormat) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(repo.config().history_limit);
    let history = repo.history(Some(limit))?;
    if fmt == OutputFormat::Json {
        return print_json(&history);
    }
    if history.is_empty() {
        println!("No commits yet.");
        return Ok(());
    }
    for (i, commit) in history.iter().enumerate() {
        if args.oneline {
            println!("{} {}", commit.id.short_hex().yellow(), commit.summary());
            continue;
        }
        if i > 0 {
            println!();
        }
        print_commit_header(commit);
    }
    Ok(())
}

fn cmd_show(repo: &Repository, args: ShowArgs, fmt: OutputFormat) -> anyhow::Result<()> {
    let details = repo.show(&args.rev)?;
    if fmt == OutputFormat::Json {
        return print_json(&details);
    }
    print_commit_header(&details.commit);
    println!();
    for file in &details.files {
        println!(
            "  {} {:>8} B  {}",
            file.id.short_hex().dimmed(),
            file.size,
            file.path
        );
    }
    Ok(())
}

fn cmd_diff(repo: &Repository, cwd: &Path, args: DiffArgs, fmt: OutputFormat) -> anyhow::Result<()> {
    let diff = repo.diff(&from_cwd(cwd, &args.path))?;
    if fmt == OutputFormat::Json {
        return print_json(&serde_json::json!({ "path": args.path, "diff": diff }));
    }
    if diff.is_empty() {
        println!("No changes.");
        return Ok(());
    }
    for line in diff.lines() {
        let styled = if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        println!("{styled}");
    }
    Ok(())
}

fn cmd_cat(repo: &Repository, cwd: &Path, args: CatArgs, fmt: OutputFormat) -> anyhow::Result<()> {
    // Committed paths are root-relative; map a cwd-relative argument onto the root.
    let path = match cwd.strip_prefix(repo.root()) {
        Ok(sub) if !sub.as_os_str().is_empty() => {
            unify_separators(&sub.join(&args.path).to_string_lossy()).into_owned()
        }
        _ => args.path.clone(),
    };
    let content = repo.read_committed(&args.rev, &path)?;
    if fmt == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "rev": args.rev,
            "path": path,
            "content": String::from_utf8_lossy(&content),
        }));
    }
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&content)?;
    stdout.flush()?;
    Ok(())
}

fn cmd_fsck(repo: &Repository, fmt: OutputFormat) -> anyhow::Result<()> {
    let report = repo.fsck()?;
    if fmt == OutputFormat::Json {
        print_json(&report)?;
    } else {
        for id in &report.discarded_objects {
            println!("{} discarded corrupt object {}", "!".red().bold(), id);
        }
        for missing in &report.missing_objects {
            println!(
                "{} commit {} is missing {} ({})",
                "!".red().bold(),
                missing.commit.short_hex(),
                missing.path,
                missing.id.short_hex()
            );
        }
        if report.is_clean() {
            println!(
                "{} No issues ({} commits checked).",
                "✓".green().bold(),
                report.commits_checked
            );
        }
    }
    if !report.is_clean() {
        bail!("integrity check found problems");
    }
    Ok(())
}
