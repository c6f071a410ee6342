use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use folio_core::{
    providers::GitHubSource, Config, FeedLoader, FeedState, FeedStatus, MalformedPolicy,
    PageSession, ThemeMode,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Public GitHub repositories for a personal portfolio", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the Projects page
    Projects {
        /// GitHub user whose repositories are listed
        #[arg(short, long)]
        username: Option<String>,

        /// How many repositories to request
        #[arg(short = 'n', long)]
        max: Option<u32>,

        /// Repository to hide, in addition to the configured ones
        #[arg(short = 'x', long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,

        /// Initial theme (light or dark)
        #[arg(long)]
        theme: Option<ThemeMode>,

        /// GitHub token, raises the API rate limit
        #[arg(long, env = "FOLIO_GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Treat a response that isn't a repository list as a failure
        #[arg(long)]
        strict: bool,

        /// Print the feed as text instead of opening the page
        #[arg(long, conflicts_with = "json")]
        plain: bool,

        /// Print the feed state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the active configuration
    Config {
        /// Only print where the config file lives
        #[arg(long)]
        path: bool,

        /// Write the active configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(
        cli.command,
        None | Some(Commands::Projects {
            plain: false,
            json: false,
            ..
        })
    );
    init_logging(interactive);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    match cli.command {
        Some(Commands::Projects {
            username,
            max,
            exclude,
            theme,
            token,
            strict,
            plain,
            json,
        }) => {
            if let Some(username) = username {
                config.feed.username = username;
            }
            if let Some(max) = max {
                config.feed.max_count = max;
            }
            config.feed.excluded_repos.extend(exclude);
            if let Some(theme) = theme {
                config.ui.theme = theme;
            }
            if token.is_some() {
                config.github.token = token;
            }
            if strict {
                config.feed.malformed_payload = MalformedPolicy::Strict;
            }

            let output = if json {
                Output::Json
            } else if plain {
                Output::Plain
            } else {
                Output::Interactive
            };
            show_projects(&config, output).await
        }
        Some(Commands::Config { path, save }) => {
            if path {
                println!("{}", config_path.display());
            } else if save {
                config.save_to(&config_path)?;
                println!("Wrote {}", config_path.display());
            } else {
                print!("{}", redacted_toml(&config)?);
            }
            Ok(())
        }
        None => show_projects(&config, Output::Interactive).await,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Interactive,
    Plain,
    Json,
}

/// Logs go to stderr. On the interactive page they'd scribble over the
/// screen, so they stay off there unless RUST_LOG asks for them.
fn init_logging(interactive: bool) {
    if interactive && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_loader(config: &Config) -> anyhow::Result<FeedLoader> {
    let source = GitHubSource::new(&config.github).context("Failed to set up GitHub client")?;
    let request = config.feed_request()?;

    Ok(FeedLoader::new(Arc::new(source), request).with_policy(config.feed.malformed_payload))
}

async fn show_projects(config: &Config, output: Output) -> anyhow::Result<()> {
    let loader = build_loader(config)?;
    tracing::info!(
        "Loading up to {} repositories for {}",
        loader.request().max_count(),
        loader.request().username()
    );

    if output == Output::Interactive {
        let app = folio_tui::App::new(loader, config.ui.theme);
        return folio_tui::run_tui(app).await;
    }

    let mut session = PageSession::activate(loader);
    let state = session.wait().await;

    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(state)?),
        _ => print!("{}", render_plain(&config.feed.username, state)),
    }

    if state.status() == FeedStatus::Failed {
        anyhow::bail!("Could not load repositories for {}", config.feed.username);
    }

    Ok(())
}

fn render_plain(username: &str, state: &FeedState) -> String {
    let Some(records) = state.records() else {
        return format!("Projects for {}: {}\n", username, state.status());
    };

    let mut out = format!("Projects for {} ({})\n", username, records.len());
    if records.is_empty() {
        out.push_str("\nNo repositories to show\n");
    }

    for record in records {
        out.push('\n');
        out.push_str(&format!("{}\n", record.name));
        out.push_str(&format!(
            "  {}\n",
            record
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("No description available")
        ));

        let mut meta = Vec::new();
        if let Some(language) = &record.language {
            meta.push(format!("● {}", language));
        }
        if record.stars > 0 {
            meta.push(format!("★ {}", record.stars));
        }
        if !record.topics.is_empty() {
            meta.push(
                record
                    .topics
                    .iter()
                    .map(|t| format!("#{}", t))
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }
        if !meta.is_empty() {
            out.push_str(&format!("  {}\n", meta.join("  ")));
        }
        out.push_str(&format!("  {}\n", record.url));
    }

    out
}

fn redacted_toml(config: &Config) -> anyhow::Result<String> {
    let mut shown = config.clone();
    if shown.github.token.is_some() {
        shown.github.token = Some("********".to_string());
    }
    Ok(toml::to_string_pretty(&shown)?)
}
