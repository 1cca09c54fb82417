//! WebReader CLI - read a web page as Markdown from the command line

mod mcp;

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use webreader::{MarkdownResult, ReadRequest, Tool, TOOL_LLMTXT};

/// Output format for fetch subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Markdown with YAML frontmatter
    #[default]
    Md,
    /// JSON format
    Json,
}

/// WebReader - fetch a website and print its main content as Markdown
#[derive(Parser, Debug)]
#[command(name = "webreader")]
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
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Fetch URL and output as markdown with metadata frontmatter
    Fetch {
        /// URL to fetch
        url: String,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,

        /// Custom User-Agent
        #[arg(long)]
        user_agent: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Mcp) => {
            mcp::run_server().await;
        }
        Some(Commands::Fetch {
            url,
            output,
            user_agent,
            timeout,
        }) => {
            run_fetch(&url, output, user_agent, Duration::from_secs(timeout)).await;
        }
        None => {
            eprintln!("Usage: webreader fetch <URL>");
            eprintln!("   or: webreader mcp");
            eprintln!("   or: webreader --help");
            std::process::exit(1);
        }
    }
}

/// Log to stderr; stdout carries Markdown or JSON-RPC
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_fetch(url: &str, output: OutputFormat, user_agent: Option<String>, timeout: Duration) {
    let mut builder = Tool::builder().timeout(timeout);

    if let Some(ua) = user_agent {
        builder = builder.user_agent(ua);
    }

    let tool = builder.build();

    let cancel = async {
        // Without a signal handler, never cancel
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    match tool.execute_until(ReadRequest::new(url), cancel).await {
        Ok(result) => match output {
            OutputFormat::Md => writeln_safe(&format_md_with_frontmatter(&result)),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
                    eprintln!("Error serializing result: {}", e);
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

/// Format result as markdown with YAML frontmatter
fn format_md_with_frontmatter(result: &MarkdownResult) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!("url: {}\n", yaml_quote(&result.url)));
    if result.source_url != result.url {
        output.push_str(&format!("source_url: {}\n", yaml_quote(&result.source_url)));
    }
    if !result.content_type.is_empty() {
        output.push_str(&format!("content_type: {}\n", yaml_quote(&result.content_type)));
    }
    output.push_str(&format!("detection: {}\n", result.detection));
    if let Some(ref selector) = result.selector {
        output.push_str(&format!("selector: {}\n", yaml_quote(selector)));
    }
    if let Some(ref title) = result.title {
        output.push_str(&format!("title: {}\n", yaml_quote(title)));
    }
    output.push_str("---\n");

    output.push_str(&result.markdown);

    output
}

/// Double-quote a scalar for YAML
fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
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

#[cfg(test)]
mod tests {
    use super::*;
    use webreader::DetectionMethod;

    fn html_result() -> MarkdownResult {
        MarkdownResult {
            url: "https://example.com/old".to_string(),
            source_url: "https://example.com/blog/post".to_string(),
            content_type: "text/html; charset=utf-8".to_string(),
            detection: DetectionMethod::HtmlExtracted,
            selector: Some("#main-content".to_string()),
            title: Some("A \"quoted\" title".to_string()),
            markdown: "# Hello World".to_string(),
        }
    }

    #[test]
    fn test_format_md_html() {
        let output = format_md_with_frontmatter(&html_result());

        assert!(output.starts_with("---\n"));
        assert!(output.contains("url: \"https://example.com/old\"\n"));
        assert!(output.contains("source_url: \"https://example.com/blog/post\"\n"));
        assert!(output.contains("content_type: \"text/html; charset=utf-8\"\n"));
        assert!(output.contains("detection: html-extracted\n"));
        assert!(output.contains("selector: \"#main-content\"\n"));
        assert!(output.contains("title: \"A \\\"quoted\\\" title\"\n"));
        assert!(output.ends_with("---\n# Hello World"));
    }

    #[test]
    fn test_format_md_raw_omits_optional_fields() {
        let result = MarkdownResult {
            url: "https://example.com/a.txt".to_string(),
            source_url: "https://example.com/a.txt".to_string(),
            content_type: String::new(),
            detection: DetectionMethod::Raw,
            selector: None,
            title: None,
            markdown: "plain".to_string(),
        };

        let output = format_md_with_frontmatter(&result);

        assert!(!output.contains("source_url"));
        assert!(!output.contains("content_type"));
        assert!(!output.contains("selector"));
        assert!(!output.contains("title"));
        assert_eq!(
            output,
            "---\nurl: \"https://example.com/a.txt\"\ndetection: raw\n---\nplain"
        );
    }

    #[test]
    fn test_format_md_quotes_yaml_special_characters() {
        let mut result = html_result();
        result.url = "https://example.com/a: b#frag".to_string();
        result.source_url = result.url.clone();

        let output = format_md_with_frontmatter(&result);

        assert!(output.contains("url: \"https://example.com/a: b#frag\"\n"));
        assert!(!output.contains("source_url"));
        assert_eq!(yaml_quote(r"C:\path"), r#""C:\\path""#);
    }

    #[test]
    fn test_cli_parses_fetch() {
        let cli = Cli::parse_from([
            "webreader",
            "fetch",
            "https://example.com",
            "--output",
            "json",
            "--timeout",
            "3",
        ]);

        match cli.command {
            Some(Commands::Fetch {
                url,
                output,
                user_agent,
                timeout,
            }) => {
                assert_eq!(url, "https://example.com");
                assert!(matches!(output, OutputFormat::Json));
                assert!(user_agent.is_none());
                assert_eq!(timeout, 3);
            }
            other => panic!("expected fetch command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_fetch_defaults() {
        let cli = Cli::parse_from(["webreader", "fetch", "https://example.com"]);

        match cli.command {
            Some(Commands::Fetch {
                output, timeout, ..
            }) => {
                assert!(matches!(output, OutputFormat::Md));
                assert_eq!(timeout, 10);
            }
            other => panic!("expected fetch command, got {:?}", other),
        }
    }
}
