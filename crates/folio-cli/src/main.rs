use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use folio_errors::ErrorHandler;
use std::path::PathBuf;

mod commands;
mod context;
mod output;

use commands::admin::run_config;
use commands::console::{run_exec, run_shell};
use commands::contact::run_contact;
use commands::cv::run_cv;
use commands::site::{run_page, run_seo};
use context::AppContext;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Ali Hassan's portfolio in the terminal, with command console and chat", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging to stderr.
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Directory holding `.folio/` settings, logs and preferences.
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Language (de or en); defaults to the saved preference. The
    /// interactive shell saves it as the new preference.
    #[arg(long = "lang", global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one console command, e.g. `folio exec help`.
    Exec(ExecArgs),
    /// Print one page of the portfolio.
    Page(PageArgs),
    /// Print SEO metadata for one or all routes.
    Seo(SeoArgs),
    /// Save the CV into the download directory.
    Cv(CvArgs),
    /// Validate and send a contact message.
    Contact(ContactArgs),
    /// Print the merged configuration.
    Config,
}

#[derive(Args)]
pub(crate) struct ExecArgs {
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

#[derive(Args)]
pub(crate) struct PageArgs {
    pub name: String,
    /// Project category filter (projects page only).
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub(crate) struct SeoArgs {
    #[arg(long)]
    pub page: Option<String>,
}

#[derive(Args)]
pub(crate) struct CvArgs {
    /// CV language (de or en); defaults to the active language.
    #[arg(long = "language")]
    pub language: Option<String>,
    /// Override the configured download directory.
    #[arg(long)]
    pub dest: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct ContactArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub company: String,
    #[arg(long, default_value = "")]
    pub position: String,
    #[arg(long, default_value = "")]
    pub message: String,
    #[arg(long, default_value = "", hide = true)]
    pub website: String,
}

fn main() {
    let cli = Cli::parse();
    let handler = ErrorHandler::new().verbose(cli.verbose);
    if let Err(err) = run(cli) {
        eprint!("{}", handler.handle(&err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let workspace = match cli.workspace {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let interactive = cli.command.is_none();
    let ctx = AppContext::new(
        workspace,
        cli.json,
        cli.verbose,
        cli.language.as_deref(),
        interactive,
    )?;

    match cli.command {
        None => run_shell(&ctx),
        Some(Commands::Exec(args)) => run_exec(&ctx, args),
        Some(Commands::Page(args)) => run_page(&ctx, args),
        Some(Commands::Seo(args)) => run_seo(&ctx, args),
        Some(Commands::Cv(args)) => run_cv(&ctx, args),
        Some(Commands::Contact(args)) => run_contact(&ctx, args),
        Some(Commands::Config) => run_config(&ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn exec_collects_all_words() {
        let cli = Cli::parse_from(["folio", "exec", "help", "me"]);
        match cli.command {
            Some(Commands::Exec(args)) => assert_eq!(args.words, vec!["help", "me"]),
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::parse_from(["folio", "page", "skills", "--json", "--lang", "en"]);
        assert!(cli.json);
        assert_eq!(cli.language.as_deref(), Some("en"));
    }
}
