//! xsparse CLI entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use xsparse::{parse_request, XmlInput};
use xsparse_cli::config::{resolve_encoding, resolve_log_level};
use xsparse_cli::render::{collect_events, info, normalize_line_endings, to_json_lines};

#[derive(Parser)]
#[command(
    name = "xsparse",
    about = "Inspect raw HTTP request messages and SAX event streams",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    /// Also reads from XSPARSE_LOG env var.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a raw request message and print it as JSON.
    Request {
        /// File holding the complete request message.
        file: PathBuf,

        /// Convert bare LF line endings to CRLF before parsing.
        #[arg(long)]
        crlf: bool,
    },

    /// Run an XML document through the SAX parser and print one JSON line per event.
    Sax {
        /// XML document to parse.
        file: PathBuf,

        /// Encoding of the file bytes (utf8, ascii, latin1, utf16le, ...).
        /// Also reads from XSPARSE_ENCODING env var.
        #[arg(short, long)]
        encoding: Option<String>,
    },

    /// Print the supported handler slots, disabled members and encodings as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   xsparse completions bash > ~/.local/share/bash-completion/completions/xsparse
    ///   xsparse completions zsh > ~/.zfunc/_xsparse
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = resolve_log_level(cli.log_level.as_deref());
    let filter = tracing_subscriber::EnvFilter::try_new(&log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Request { file, crlf } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read request file {}", file.display()))?;
            let raw = if crlf { normalize_line_endings(&raw) } else { raw };
            tracing::info!("Parsing request message from {}", file.display());
            let request = parse_request(&raw)
                .with_context(|| format!("Invalid request message in {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }

        Commands::Sax { file, encoding } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read XML file {}", file.display()))?;
            let encoding = resolve_encoding(encoding.as_deref());
            tracing::info!(
                encoding = encoding.as_deref().unwrap_or("utf8"),
                "Parsing XML from {}",
                file.display()
            );
            let events = collect_events(XmlInput::Bytes(&bytes), encoding.as_deref())
                .with_context(|| format!("Failed to parse XML in {}", file.display()))?;
            print!("{}", to_json_lines(&events)?);
        }

        Commands::Info => {
            println!("{}", serde_json::to_string_pretty(&info())?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "xsparse", &mut std::io::stdout());
        }
    }

    Ok(())
}
