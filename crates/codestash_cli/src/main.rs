//! Command-line client for the Code Stash API.

use anyhow::{anyhow, bail, Context};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use codestash_cli::client::trim_server;
use codestash_cli::output::{
    format_delete_output, format_get_output, format_list_output, format_picker_output,
    format_saved_output, format_sort_output,
};
use codestash_cli::HttpSnippetApi;
use codestash_core::models::snippet::parse_tags_csv;
use codestash_core::mutation::{DeleteOutcome, UpdateOutcome};
use codestash_core::picker::{Picker, SingleSelect};
use codestash_core::session::MutationResult;
use codestash_core::{
    Config, SnippetDraft, SnippetPatch, SnippetSession, SortDirection, SortField, SortSpec,
};
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;


const DEFAULT_LOG_FILTER: &str = "codestash_core=warn,codestash_cli=warn,cstash=warn";

#[derive(Parser)]
#[command(name = "cstash", about = "Code Stash CLI", version)]
struct Cli {
    /// Server URL (can also be set via CSTASH_SERVER env var)
    #[arg(short, long, env = "CSTASH_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Request timeout in seconds (defaults to CSTASH_TIMEOUT_SECS or 30)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List snippets, optionally filtered by search text and tags
    List {
        #[arg(short = 'q', long = "query")]
        search: Option<String>,
        /// Tag filter; repeat to require several tags
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long)]
        order: Option<SortDirection>,
    },
    /// Print a snippet's content
    Get { id: String },
    /// Create a snippet from a file or stdin
    New {
        #[arg(long)]
        title: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long)]
        language: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Change fields of an existing snippet
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        language: Option<String>,
        /// Comma-separated tags replacing the current ones
        #[arg(long)]
        tags: Option<String>,
        /// Replace the content with this file's contents
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Toggle the favorite flag
    Fav { id: String },
    Delete { id: String },
    /// List known tags, marking the ones passed with --tag
    Tags {
        #[arg(short = 't', long = "tag")]
        selected: Vec<String>,
    },
    /// Show sort fields and orders, marking the one `list` would use
    Sorts {
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long)]
        order: Option<SortDirection>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// `--server` when given and non-blank, else the configured URL.
fn resolve_server(server: Option<&str>, config: &Config) -> String {
    let chosen = server
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(config.server_url.as_str());
    trim_server(chosen).to_string()
}

/// Sort and order pickers preset from config, with the flags chosen on top.
fn sort_pickers(
    config: &Config,
    field: Option<SortField>,
    direction: Option<SortDirection>,
) -> (Picker<SingleSelect>, Picker<SingleSelect>) {
    let mut fields = config.sort.field_picker();
    let mut directions = config.sort.direction_picker();
    if let Some(field) = field {
        fields.choose(field.label());
    }
    if let Some(direction) = direction {
        directions.choose(direction.label());
    }
    (fields, directions)
}

fn resolve_sort(
    config: &Config,
    field: Option<SortField>,
    direction: Option<SortDirection>,
) -> SortSpec {
    let (fields, directions) = sort_pickers(config, field, direction);
    SortSpec::from_pickers(&fields, &directions).unwrap_or(config.sort)
}

fn read_content(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn build_draft(
    title: String,
    content: String,
    language: Option<String>,
    description: Option<String>,
    tags: Option<&str>,
) -> SnippetDraft {
    SnippetDraft {
        title,
        content,
        language: language.unwrap_or_default(),
        description: description.unwrap_or_default(),
        tags: tags.map(parse_tags_csv).unwrap_or_default(),
        is_favorite: false,
    }
}

fn build_patch(
    title: Option<String>,
    description: Option<String>,
    language: Option<String>,
    tags: Option<&str>,
    content: Option<String>,
) -> SnippetPatch {
    SnippetPatch {
        title,
        description,
        content,
        language,
        tags: tags.map(parse_tags_csv),
        is_favorite: None,
    }
}

fn print_output(output: Result<String, String>, action: &str) -> anyhow::Result<()> {
    let output = output.map_err(|message| anyhow!("{} failed: {}", action, message))?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

fn report_update(
    result: MutationResult<UpdateOutcome>,
    action: &str,
    json: bool,
) -> anyhow::Result<()> {
    match result {
        MutationResult::Skipped(rejection) if rejection.is_validation_skip() => {
            eprintln!("{}: nothing to change ({})", action, rejection);
            Ok(())
        }
        MutationResult::Skipped(rejection) => bail!("{} failed: {}", action, rejection),
        MutationResult::Resolved(UpdateOutcome::Committed(snippet)) => {
            print_output(format_saved_output(action, &snippet, json), action)
        }
        MutationResult::Resolved(UpdateOutcome::RolledBack { error, .. }) => {
            bail!("{} failed: {}", action, error)
        }
        MutationResult::Resolved(UpdateOutcome::Discarded) => {
            bail!("{} failed: snippet disappeared while saving", action)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        server,
        json,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    init_tracing();
    let config = Config::from_env()?;
    if let Commands::Sorts { sort, order } = command {
        let (fields, directions) = sort_pickers(&config, sort, order);
        return print_output(format_sort_output(&fields, &directions, json), "Sorts");
    }
    let server = resolve_server(server.as_deref(), &config);
    let timeout = Duration::from_secs(timeout.unwrap_or(config.request_timeout_secs));
    let api = HttpSnippetApi::new(&server, timeout)?;
    tracing::debug!(server = %server, "using backend");

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before client setup"),
        Commands::List {
            search,
            tags,
            sort,
            order,
        } => {
            let session = SnippetSession::new(api, resolve_sort(&config, sort, order));
            if let Some(search) = search {
                session.set_search(search);
            }
            for tag in &tags {
                session.toggle_tag(tag);
            }
            session.refresh().await.context("List failed")?;
            print_output(format_list_output(&session.snapshot(), json), "List")?;
        }
        Commands::Get { id } => {
            let session = SnippetSession::new(api, config.sort);
            let snippet = session.fetch(&id).await.context("Get failed")?;
            print_output(format_get_output(&snippet, json), "Get")?;
        }
        Commands::New {
            title,
            file,
            language,
            description,
            tags,
        } => {
            let content = read_content(file.as_ref())?;
            let draft = build_draft(title, content, language, description, tags.as_deref());
            let session = SnippetSession::new(api, config.sort);
            let created = session.create(&draft).await.context("New failed")?;
            print_output(format_saved_output("Created", &created, json), "New")?;
        }
        Commands::Edit {
            id,
            title,
            description,
            language,
            tags,
            file,
        } => {
            let content = match file {
                Some(path) => Some(read_content(Some(&path))?),
                None => None,
            };
            let patch = build_patch(title, description, language, tags.as_deref(), content);
            if patch.is_empty() {
                bail!("Edit failed: pass at least one field to change");
            }
            let session = SnippetSession::new(api, config.sort);
            session.fetch(&id).await.context("Edit failed")?;
            report_update(session.update(&id, patch).await, "Updated", json)?;
        }
        Commands::Fav { id } => {
            let session = SnippetSession::new(api, config.sort);
            session.fetch(&id).await.context("Fav failed")?;
            report_update(session.toggle_favorite(&id).await, "Updated", json)?;
        }
        Commands::Delete { id } => {
            let session = SnippetSession::new(api, config.sort);
            session.fetch(&id).await.context("Delete failed")?;
            match session.delete(&id).await {
                MutationResult::Resolved(DeleteOutcome::Deleted) => {
                    print_output(format_delete_output(&id, json), "Delete")?;
                }
                MutationResult::Resolved(DeleteOutcome::Failed { error, .. }) => {
                    bail!("Delete failed: {}", error)
                }
                MutationResult::Resolved(DeleteOutcome::Discarded) => {
                    bail!("Delete failed: snippet changed while deleting")
                }
                MutationResult::Skipped(rejection) => bail!("Delete failed: {}", rejection),
            }
        }
        Commands::Tags { selected } => {
            let session = SnippetSession::new(api, config.sort);
            for tag in &selected {
                session.toggle_tag(tag);
            }
            let picker = session.tag_picker().await.context("Tags failed")?;
            print_output(format_picker_output(&picker, json), "Tags")?;
        }
        Commands::Sorts { .. } => unreachable!("sorts handled before client setup"),
    }

    Ok(())
}
