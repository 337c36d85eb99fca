//! ContentKit CLI - pull Contentful entries as static-site documents

use clap::{Args, Parser, Subcommand, ValueEnum};
use contentkit::{meta, Client, Document, Documents, LocaleFilter, Query};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Output format for the pull subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Markdown with YAML frontmatter, one block per document
    #[default]
    Md,
    /// JSON array of documents
    Json,
}

/// ContentKit - Contentful entries as static-site documents
#[derive(Parser, Debug)]
#[command(name = "contentkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pull entries from a space and output the mapped documents
    Pull(PullArgs),
    /// Print the JSON schema for the query configuration
    Schema,
}

#[derive(Args, Debug)]
struct PullArgs {
    /// Space id to pull from
    #[arg(long)]
    space: String,

    /// Content Delivery API access token
    #[arg(long)]
    token: String,

    /// Restrict to entries of this content type
    #[arg(long)]
    content_type: Option<String>,

    /// Locale to emit documents for: a code, "*" for all locales, empty
    /// for the space default
    #[arg(long, default_value = "")]
    locale: LocaleFilter,

    /// Entry field whose value becomes the document body
    #[arg(long)]
    content_field: Option<String>,

    /// Link resolution depth (0-10)
    #[arg(long, default_value_t = 1)]
    include: u8,

    /// Page size (1-1000)
    #[arg(long, default_value_t = 100)]
    limit: u32,

    /// Entries to skip before the first page
    #[arg(long, default_value_t = 0)]
    skip: u32,

    /// Follow pagination until the result set is exhausted
    #[arg(long)]
    recursive: bool,

    /// Override the API base URL (e.g. the Preview API host)
    #[arg(long)]
    base_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "md")]
    output: OutputFormat,

    /// Write documents into this directory instead of stdout
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pull(args) => run_pull(args).await,
        Commands::Schema => {
            let json = serde_json::to_string_pretty(&Query::schema()).unwrap_or_else(|e| {
                eprintln!("Error serializing schema: {}", e);
                std::process::exit(1);
            });
            writeln_safe(&json);
        }
    }
}

async fn run_pull(args: PullArgs) {
    let mut client = Client::builder().space(&args.space).token(&args.token);
    if let Some(base_url) = &args.base_url {
        client = client.base_url(base_url);
    }
    let client = match client.build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut query = Query::builder()
        .locale(args.locale)
        .include(args.include)
        .limit(args.limit)
        .skip(args.skip)
        .recursive(args.recursive);
    if let Some(content_type) = args.content_type {
        query = query.content_type(content_type);
    }
    if let Some(content_field) = args.content_field {
        query = query.content_field(content_field);
    }
    let query = query.build();

    let docs = match contentkit::pull(&client, &query).await {
        Ok(docs) => docs,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let content_field = query.content_field.as_deref();
    match args.output {
        OutputFormat::Md => match args.out_dir {
            Some(dir) => write_md_files(docs, content_field, &dir),
            None => {
                for doc in docs {
                    writeln_safe(&format_md_with_frontmatter(&doc, content_field));
                }
            }
        },
        OutputFormat::Json => {
            let docs: Vec<Document> = docs.collect();
            let json = match serde_json::to_string_pretty(&docs) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("Error serializing documents: {}", e);
                    std::process::exit(1);
                }
            };
            match args.out_dir {
                Some(dir) => {
                    ensure_dir(&dir);
                    let path = dir.join("documents.json");
                    write_or_exit(&path, &json);
                    eprintln!("Wrote {} documents to {}", docs.len(), path.display());
                }
                None => writeln_safe(&json),
            }
        }
    }
}

/// Write one markdown file per document into `dir`
fn write_md_files(docs: Documents, content_field: Option<&str>, dir: &Path) {
    ensure_dir(dir);
    let mut written = 0usize;
    for doc in docs {
        let path = dir.join(document_file_name(&doc));
        write_or_exit(&path, &format_md_with_frontmatter(&doc, content_field));
        written += 1;
    }
    eprintln!("Wrote {} documents to {}", written, dir.display());
}

/// File name for a document: `<entry id>.<locale>.md`
fn document_file_name(doc: &Document) -> String {
    format!("{}.{}.md", doc.id(), doc.locale())
}

/// Format a document as markdown with YAML frontmatter
///
/// The frontmatter carries the entry id, the locale, and every
/// single-line string field. The content field is left out of the
/// frontmatter since its value is the body; non-string fields and the
/// attached collections are only visible in the JSON output format.
fn format_md_with_frontmatter(doc: &Document, content_field: Option<&str>) -> String {
    let reserved = [meta::ENTRY_ID, meta::LOCALE, meta::ASSETS, meta::ENTRIES];

    let mut output = String::new();
    output.push_str("---\n");
    output.push_str(&format!("id: {}\n", doc.id()));
    output.push_str(&format!("locale: {}\n", doc.locale()));
    for (key, value) in &doc.meta {
        if reserved.contains(&key.as_str()) || Some(key.as_str()) == content_field {
            continue;
        }
        if let Some(s) = value.as_str() {
            if !s.contains('\n') {
                output.push_str(&format!("{}: {}\n", key, s));
            }
        }
    }
    output.push_str("---\n");
    output.push_str(&doc.content);

    output
}

/// Create `dir` and its parents, exiting on failure
fn ensure_dir(dir: &Path) {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("Error creating {}: {}", dir.display(), e);
        std::process::exit(1);
    }
}

/// Write `contents` to `path`, exiting on failure
fn write_or_exit(path: &Path, contents: &str) {
    if let Err(e) = fs::write(path, contents) {
        eprintln!("Error writing {}: {}", path.display(), e);
        std::process::exit(1);
    }
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
