//! SummaryKit CLI - extraction server, RPC client and one-shot extractor

mod rpc;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use summarykit::{
    extract_local, extract_url, ExtractionResult, ParserService, METHOD_PARSE,
    METHOD_PARSE_TEST, SERVICE_LLMTXT,
};
use tracing_subscriber::EnvFilter;

/// Default listen address of the server
const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:50051";

/// Default server address used by the client commands
const DEFAULT_TARGET_ADDRESS: &str = "localhost:50051";

/// Output format for extraction results
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Fields as frontmatter, content as body
    #[default]
    Text,
    /// JSON format
    Json,
}

/// SummaryKit - title, thumbnail and content extraction for web pages
#[derive(Parser, Debug)]
#[command(name = "summarykit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the JSON-RPC extraction server over TCP
    Serve {
        /// Listen address (host:port)
        #[arg(long, short, default_value = DEFAULT_LISTEN_ADDRESS)]
        address: String,

        /// Fetch deadline in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Custom User-Agent
        #[arg(long)]
        user_agent: Option<String>,

        /// Only fetch URLs starting with this prefix (repeatable)
        #[arg(long)]
        allow_prefix: Vec<String>,

        /// Never fetch URLs starting with this prefix (repeatable)
        #[arg(long)]
        block_prefix: Vec<String>,

        /// Let ParseTest read HTML files under this directory
        /// (otherwise ParseTest input is always literal markup)
        #[arg(long)]
        fixture_dir: Option<PathBuf>,
    },
    /// Ask a running server to fetch and extract a URL
    Parse {
        /// URL to extract
        url: String,

        /// Server address (host:port)
        #[arg(long, short, default_value = DEFAULT_TARGET_ADDRESS)]
        address: String,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
    /// Ask a running server to extract literal markup or a fixture file
    ParseTest {
        /// HTML markup, or a path relative to the server's fixture directory
        source: String,

        /// Server address (host:port)
        #[arg(long, short, default_value = DEFAULT_TARGET_ADDRESS)]
        address: String,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
    /// Extract in-process, without a server
    Extract {
        /// URL to extract, or a local source with --local
        input: String,

        /// Treat the input as a file path or literal HTML
        #[arg(long)]
        local: bool,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(SERVICE_LLMTXT);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Serve {
            address,
            timeout,
            user_agent,
            allow_prefix,
            block_prefix,
            fixture_dir,
        }) => {
            init_logging("info");
            let mut builder = ParserService::builder().timeout(Duration::from_secs(timeout));
            if let Some(ua) = user_agent {
                builder = builder.user_agent(ua);
            }
            for prefix in allow_prefix {
                builder = builder.allow_prefix(prefix);
            }
            for prefix in block_prefix {
                builder = builder.block_prefix(prefix);
            }
            if let Some(dir) = fixture_dir {
                builder = builder.fixture_dir(dir);
            }

            if let Err(e) = rpc::run_server(&address, builder.build()).await {
                tracing::error!(address = %address, error = %e, "Server failed");
                std::process::exit(1);
            }
        }
        Some(Commands::Parse {
            url,
            address,
            output,
        }) => {
            init_logging("warn");
            let result = rpc::call_extract(&address, METHOD_PARSE, json!({ "url": url })).await;
            finish(result, output);
        }
        Some(Commands::ParseTest {
            source,
            address,
            output,
        }) => {
            init_logging("warn");
            let result =
                rpc::call_extract(&address, METHOD_PARSE_TEST, json!({ "filePath": source }))
                    .await;
            finish(result, output);
        }
        Some(Commands::Extract {
            input,
            local,
            output,
        }) => {
            init_logging("warn");
            let result = if local {
                extract_local(&input).await
            } else {
                extract_url(&input).await
            };
            finish(result, output);
        }
        None => {
            eprintln!("Usage: summarykit serve [--address HOST:PORT]");
            eprintln!("   or: summarykit parse <URL>");
            eprintln!("   or: summarykit --help");
            std::process::exit(1);
        }
    }
}

/// Log to stderr, filtered by RUST_LOG when set
fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Print a result or exit with its error
fn finish<E: std::fmt::Display>(result: Result<ExtractionResult, E>, output: OutputFormat) {
    match result {
        Ok(result) => match output {
            OutputFormat::Text => writeln_safe(&format_text(&result)),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
                    eprintln!("Error serializing response: {}", e);
                    std::process::exit(1);
                });
                writeln_safe(&json);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Format a result with title and thumbnail as frontmatter
fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();
    output.push_str("---\n");
    output.push_str(&format!("title: {}\n", result.title));
    output.push_str(&format!("thumbnail_url: {}\n", result.thumbnail));
    output.push_str("---\n");
    output.push_str(&result.content);
    output
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
