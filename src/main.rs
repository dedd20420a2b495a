use std::{path::PathBuf, process::exit};

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use compact_str::CompactString;
use gitlab_fragments::{
    config::{default_config_path, load_config},
    loader::split_reference,
    logging::{init_logging, LoggingConfig},
    ClientConfig, Fragment,
};

/// Load a GitLab repository or issue as prompt fragments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// `gitlab:host:group/project` or `gitlab-issue:host:group/project/issue/N`
    #[arg(required_unless_present = "print_config_path")]
    reference: Option<String>,
    /// Branch, tag or commit to load instead of the default branch.
    #[arg(short = 'r', long = "ref", value_name = "REF")]
    git_ref: Option<String>,
    /// Print fragments as a JSON array.
    #[arg(short, long)]
    json: bool,
    /// Alternate path to the configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the path to the configuration file and exit.
    #[arg(short, long)]
    print_config_path: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(default_config_path);

    if args.print_config_path {
        println!("{}", config_path.display());
        exit(0);
    }

    let config = load_config(&config_path)
        .wrap_err_with(|| format!("loading {}", config_path.display()))?;

    let logging_config =
        LoggingConfig::from_env().with_level_override(config.log_level.as_deref());
    let _log_guard = init_logging(logging_config)
        .map_err(|e| eyre!("Failed to initialize logging: {e}"))?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "gitlab-fragments starting up");

    let mut client_config = config.client_config(ClientConfig::from_env());
    if let Some(git_ref) = args.git_ref {
        client_config = client_config.with_git_ref(Some(CompactString::from(git_ref)));
    }

    let reference = args.reference.unwrap_or_default();
    let (loader, argument) = split_reference(&reference)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to create runtime")?;

    let fragments = rt
        .block_on(loader.load(argument, &client_config))
        .wrap_err_with(|| format!("{loader} loader failed for {argument}"))?;

    print_fragments(&fragments, args.json)
}

fn print_fragments(fragments: &[Fragment], json: bool) -> color_eyre::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(fragments)?);
        return Ok(());
    }

    for fragment in fragments {
        println!("==> {} <==", fragment.source);
        print!("{}", fragment.content);
        if !fragment.content.ends_with('\n') {
            println!();
        }
        println!();
    }
    Ok(())
}
