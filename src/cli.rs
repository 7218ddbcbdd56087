//! CLI definitions and entry point

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::config::{CONFIG_FILE, Config, Overrides};
use crate::issues;
use crate::output::{self, OutputMode};
use crate::pipeline::Pipeline;
use crate::rules;
use crate::source;

/// gitlint - lint git commit messages
#[derive(Parser, Debug)]
#[command(
    name = "gitlint",
    version,
    about = "Lint git commit messages against configurable style rules",
    long_about = "Walks the repository's history and reports commits whose messages\n\
                  violate the configured rules. The exit status is the number of\n\
                  issues found, so a non-zero exit fails the build.\n\n\
                  Options may also be set in a .gitlint.toml file in the repository;\n\
                  command-line values take precedence."
)]
pub struct Cli {
    /// Path to the git repository (default: ".")
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Reference to start walking history from (default: HEAD)
    #[arg(long)]
    pub from: Option<String>,

    /// Commit subject line must conform to this regular expression
    #[arg(long)]
    pub subject_regex: Option<String>,

    /// Min length for the commit subject line
    #[arg(long)]
    pub subject_minlen: Option<usize>,

    /// Max length for the commit subject line
    #[arg(long)]
    pub subject_maxlen: Option<usize>,

    /// Commit message body must conform to this regular expression
    #[arg(long)]
    pub body_regex: Option<String>,

    /// Max length for the commit message body
    #[arg(long)]
    pub body_maxlen: Option<usize>,

    /// Only lint commits authored on or after this date (yyyy-MM-dd)
    #[arg(long)]
    pub since: Option<String>,

    /// Only lint commits with at most this many parents; 1 excludes merges
    #[arg(long)]
    pub max_parents: Option<usize>,

    /// Don't lint commits whose author name matches any of these
    /// comma-separated regular expressions
    #[arg(long, value_delimiter = ',')]
    pub excl_author_names: Option<Vec<String>>,

    /// Don't lint commits whose author email matches any of these
    /// comma-separated regular expressions
    #[arg(long, value_delimiter = ',')]
    pub excl_author_emails: Option<Vec<String>>,

    /// Only lint the commit message found in this file
    #[arg(long)]
    pub msg_file: Option<PathBuf>,

    /// Output in JSON format (machine-readable)
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The command-line option layer.
    fn overrides(&self) -> Overrides {
        Overrides {
            path: self.path.clone(),
            from: self.from.clone(),
            subject_regex: self.subject_regex.clone(),
            subject_minlen: self.subject_minlen,
            subject_maxlen: self.subject_maxlen,
            body_regex: self.body_regex.clone(),
            body_maxlen: self.body_maxlen,
            since: self.since.clone(),
            max_parents: self.max_parents,
            excl_author_names: self.excl_author_names.clone(),
            excl_author_emails: self.excl_author_emails.clone(),
            msg_file: self.msg_file.clone(),
        }
    }
}

/// Run the CLI, returning the number of issues found.
pub fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let config = load_config(&cli)?;

    // All configuration is validated before the first commit is read.
    let rules = rules::from_config(&config).context("invalid rule configuration")?;
    let pipeline = Pipeline::from_config(&config).context("invalid pipeline configuration")?;

    let commits = match &config.msg_file {
        Some(file) => source::message_from_file(file).context("cannot read commit message")?,
        None => {
            let history = source::commits_in(&config.path, config.from.as_deref())
                .context("cannot read repository history")?;
            pipeline.run(history)
        }
    };

    let found = issues::collect(&rules, &commits);
    output::render(&found, mode)?;

    Ok(i32::try_from(found.len()).unwrap_or(i32::MAX))
}

/// Merge command-line options over the repository's `.gitlint.toml`, when
/// one exists, and resolve defaults. The file is looked up under the
/// repository path given on the command line (or the current directory).
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let cli_layer = cli.overrides();
    let repo_path = cli_layer.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let file = repo_path.join(CONFIG_FILE);
    let merged = if file.exists() {
        cli_layer.or(Overrides::from_file(&file)?)
    } else {
        cli_layer
    };
    Ok(Config::resolve(merged))
}
