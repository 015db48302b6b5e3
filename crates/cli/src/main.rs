//! EWS request assembler.
//!
//! Builds a FindItem or SendItem SOAP envelope from a JSON parameter file
//! and `-p NAME=VALUE` options, and prints it or writes it to a file.

use anyhow::Context;
use clap::Parser;
use ews_connector::{
    ConnectorConfig, InMemoryContext, Operation, Parameters, RequestSettings, connect,
    init_logging,
};
use std::path::PathBuf;
use tracing::info;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "ews-request")]
#[command(version, about = "Assemble EWS SOAP requests from parameters")]
struct Args {
    /// Operation to build.
    #[arg(value_enum)]
    operation: Operation,

    /// JSON object file with the request parameters.
    #[arg(long, short = 'f')]
    params: Option<PathBuf>,

    /// A single parameter as NAME=VALUE. Overrides the parameter file.
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    param: Vec<(String, String)>,

    /// Write the envelope to this file instead of stdout.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Prepend an XML declaration.
    #[arg(long)]
    declaration: bool,

    #[command(flatten)]
    config: ConnectorConfig,
}

/// Splits `NAME=VALUE` at the first `=`.
fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

/// Loads the parameter file, if any, and applies the inline parameters.
fn load_parameters(args: &Args) -> anyhow::Result<Parameters> {
    let mut params = match &args.params {
        Some(path) => Parameters::from_json_file(path)
            .with_context(|| format!("reading parameters from {}", path.display()))?,
        None => Parameters::new(),
    };
    params.extend(args.param.iter().cloned());
    Ok(params)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.config.log_level);

    if let Err(errors) = args.config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let settings = RequestSettings::from_config(&args.config)?;
    let params = load_parameters(&args)?;
    info!(
        operation = %args.operation,
        parameters = params.len(),
        "Building request"
    );

    let builder = args.operation.builder(settings);
    let mut context = InMemoryContext::new(params);
    connect(builder.as_ref(), &mut context)?;
    let envelope = context
        .take_envelope()
        .context("no envelope was produced")?;

    let xml = if args.declaration {
        envelope.to_xml_document(args.config.pretty)?
    } else {
        envelope.to_xml_string(args.config.pretty)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", xml))
                .with_context(|| format!("writing envelope to {}", path.display()))?;
            info!(path = %path.display(), "Envelope written");
        }
        None => println!("{}", xml),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ews_connector::ParameterSource;
    use std::io::Write;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("Traversal=Shallow"),
            Ok(("Traversal".to_string(), "Shallow".to_string()))
        );
        assert_eq!(
            parse_param("QueryString=a=b"),
            Ok(("QueryString".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_param("MailboxCulture="),
            Ok(("MailboxCulture".to_string(), String::new()))
        );
        assert!(parse_param("Traversal").is_err());
        assert!(parse_param("=Shallow").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "ews-request",
            "send-item",
            "-p",
            "SaveItemToFolder=true",
            "--types-prefix",
            "typ",
        ])
        .expect("arguments parse");

        assert_eq!(args.operation, Operation::SendItem);
        assert_eq!(args.param.len(), 1);
        assert_eq!(args.config.types_prefix, "typ");
        assert!(args.output.is_none());
    }

    #[test]
    fn test_inline_parameters_override_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"Traversal": "Deep", "BaseShape": "IdOnly"}}"#).expect("write");
        let path = file.path().to_string_lossy().to_string();

        let args = Args::try_parse_from([
            "ews-request",
            "find-item",
            "--params",
            path.as_str(),
            "-p",
            "Traversal=Shallow",
        ])
        .expect("arguments parse");

        let params = load_parameters(&args).expect("parameters load");
        assert_eq!(params.lookup("Traversal"), Some("Shallow"));
        assert_eq!(params.lookup("BaseShape"), Some("IdOnly"));
    }
}
