//! Extract an article and print the result as JSON.
//!
//! Usage: `extract_article [--strategy NAME] [--user-agent UA] [URL]`
//!
//! Without a URL the HTML document is read from stdin. The language service
//! key is taken from `DETECT_LANGUAGE_KEY`; logs go to stderr and are
//! filtered with `RUST_LOG`.

use std::io::{self, Read};
use std::process::ExitCode;

use article_extractor::{Extractor, Options, Strategy};

const USAGE: &str = "usage: extract_article [--strategy NAME] [--user-agent UA] [URL]";

fn parse_args(options: &mut Options) -> Result<Option<String>, String> {
    let mut url = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strategy" => {
                let name = args.next().ok_or("--strategy needs a value")?;
                let strategy: Strategy = name.parse().map_err(|e| format!("{e}"))?;
                options.forced_strategy = Some(strategy);
            }
            "--user-agent" => {
                options.user_agent = Some(args.next().ok_or("--user-agent needs a value")?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with('-') => return Err(format!("unknown flag {other}\n{USAGE}")),
            other => url = Some(other.to_string()),
        }
    }
    Ok(url)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut options = Options::from_env();
    let url = match parse_args(&mut options) {
        Ok(url) => url,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let extractor = match Extractor::new(options) {
        Ok(extractor) => extractor,
        Err(err) => {
            eprintln!("failed to initialise extractor: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = if let Some(url) = url {
        extractor.extract_url(&url)
    } else {
        let mut html = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut html) {
            eprintln!("failed to read from stdin: {err}");
            return ExitCode::FAILURE;
        }
        extractor.extract_html(&html)
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            ExitCode::FAILURE
        }
    }
}
