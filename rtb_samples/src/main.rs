//! Print Creatives — prints the creatives of a `buyers.creatives.list` response
//! saved as JSON, filtered to one buyer account and optionally to some
//! creative formats.
//!
//! Usage example (CLI):
//! ```bash
//! print_creatives --account_id 12345 --creatives_file ./creatives.json -c html,native
//! ```
//!
//! The file may contain either a list response (`{"creatives": [...]}`) or a
//! single creative.
#![warn(missing_docs)]
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use rtb_common::auth::MAX_PAGE_SIZE;
use rtb_common::creative::{Creative, ListCreativesResponse, print_creative};
use rtb_common::{CliOption, OptionParser, OptionType, ParsedArgs, Result, SampleError};

const ACCOUNT_ID: &str = "account_id";
const CREATIVES_FILE: &str = "creatives_file";
const CREATIVE_FORMAT: &str = "creative_format";
const PAGE_SIZE: &str = "page_size";

fn main() {
    init_logger();
    if let Err(err) = run() {
        match err {
            SampleError::Cli(e) => e.exit(),
            other => {
                error!("{}", other);
                eprintln!("Error: {}", other);
                std::process::exit(1);
            }
        }
    }
}

fn run() -> Result<()> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();
    let args = OptionParser::new(options()?)?
        .with_about("Prints creatives from a saved buyers.creatives.list response.")
        .parse(&mut argv)?;
    if !argv.is_empty() {
        warn!("Ignoring unexpected arguments: {:?}", argv);
    }

    let account_id = args.require_str(ACCOUNT_ID)?;
    let path = normalize_path(args.require_str(CREATIVES_FILE)?);
    if !is_file_exist(&path) {
        return Err(SampleError::InvalidArgument(format!(
            "'{}' is not a file",
            path.display()
        )));
    }

    let creatives = load_creatives(&path)?;
    info!("Loaded {} creatives from {}", creatives.len(), path.display());

    let selected = select_creatives(creatives, account_id, &args);
    if selected.is_empty() {
        info!("No creatives found for buyer account {}.", account_id);
        return Ok(());
    }

    println!("Creatives for buyer account '{}':", account_id);
    for creative in &selected {
        print_creative(creative)?;
    }
    Ok(())
}

fn options() -> Result<Vec<CliOption>> {
    Ok(vec![
        CliOption::builder(
            ACCOUNT_ID,
            "The resource ID of the buyers resource under which the creatives were created.",
        )
        .short('a')
        .required(true)
        .build()?,
        CliOption::builder(
            CREATIVES_FILE,
            "Path to a JSON file holding a creatives list response or a single creative.",
        )
        .short('f')
        .required(true)
        .build()?,
        CliOption::builder(CREATIVE_FORMAT, "Comma-separated creative formats to print.")
            .short('c')
            .value_type(OptionType::StringList)
            .valid_values(vec!["HTML", "NATIVE", "VIDEO"])
            .build()?,
        CliOption::builder(PAGE_SIZE, "The maximum number of creatives to print.")
            .short('p')
            .value_type(OptionType::Integer)
            .default_value(MAX_PAGE_SIZE)
            .build()?,
    ])
}

/// Reads either a list response or a single creative.
fn load_creatives(path: &Path) -> Result<Vec<Creative>> {
    let file = File::open(path)?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
    if json.get("creatives").is_some() {
        let page: ListCreativesResponse = serde_json::from_value(json)?;
        if let Some(token) = &page.next_page_token {
            debug!("Response has more pages, next page token: {}", token);
        }
        Ok(page.creatives)
    } else {
        Ok(vec![serde_json::from_value(json)?])
    }
}

fn select_creatives(creatives: Vec<Creative>, account_id: &str, args: &ParsedArgs) -> Vec<Creative> {
    let parent = format!("buyers/{}/", account_id);
    let formats: Option<Vec<String>> = args
        .get_list(CREATIVE_FORMAT)
        .map(|list| list.iter().map(|f| f.to_uppercase()).collect());
    let limit = args
        .get_i64(PAGE_SIZE)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(MAX_PAGE_SIZE as usize);

    creatives
        .into_iter()
        // Creatives without a resource name cannot be attributed; keep them.
        .filter(|c| c.name.as_deref().is_none_or(|name| name.starts_with(&parent)))
        .filter(|c| match (&formats, &c.creative_format) {
            (None, _) => true,
            (Some(formats), Some(format)) => formats.contains(&format.to_uppercase()),
            (Some(_), None) => false,
        })
        .take(limit)
        .collect()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &Path) -> bool {
    path.exists() && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creative(name: &str, format: &str) -> Creative {
        Creative {
            name: Some(name.to_string()),
            creative_id: name.rsplit('/').next().unwrap().to_string(),
            creative_format: Some(format.to_string()),
            ..Default::default()
        }
    }

    fn parse(args: &[&str]) -> ParsedArgs {
        let mut argv: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        OptionParser::new(options().unwrap()).unwrap().parse(&mut argv).unwrap()
    }

    #[test]
    fn selects_by_account_format_and_page_size() {
        let creatives = vec![
            creative("buyers/1/creatives/a", "HTML"),
            creative("buyers/2/creatives/b", "HTML"),
            creative("buyers/1/creatives/c", "VIDEO"),
            creative("buyers/1/creatives/d", "NATIVE"),
            creative("buyers/1/creatives/e", "HTML"),
        ];
        let args = parse(&["-a", "1", "-f", "x.json", "-c", "html,video", "-p", "2"]);
        let ids: Vec<String> = select_creatives(creatives, "1", &args)
            .into_iter()
            .map(|c| c.creative_id)
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let mut argv: Vec<String> = ["-a", "1", "-f", "x.json", "-c", "audio"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = OptionParser::new(options().unwrap())
            .unwrap()
            .parse(&mut argv)
            .unwrap_err();
        assert!(matches!(err, SampleError::Validation { .. }));
    }

    #[test]
    fn normalize_path_strips_quotes() {
        assert_eq!(normalize_path(" \"C:\\ads\\c.json\" "), PathBuf::from("C:\\ads\\c.json"));
    }
}
