use clap::{Arg, ArgAction, Command};
use mc_snbt::{Style, collect_snbt_files};
use mc_snbt_mt::{
    Credentials, MockMode, MockTranslator, StringTranslator, TranslationReport, TreeTranslator,
    XunfeiConfig, XunfeiTranslator, key_contains_any, key_matches, translate_file,
};
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("snbt-mt")
        .version("0.1.0")
        .about("Machine-translate string values in SNBT files (FTB Quests chapters and similar)")
        .arg(
            Arg::new("path")
                .help("SNBT file, or directory to search recursively for .snbt files")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .short('f')
                .help("Source language code (default: en)")
                .default_value("en"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .short('t')
                .help("Target language code (default: cn)")
                .default_value("cn"),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .short('k')
                .help("Translate string values whose key contains this text, ignoring case (repeatable, default: title)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("key-pattern")
                .long("key-pattern")
                .help("Translate string values whose key matches this regular expression (overrides --key)")
                .conflicts_with("key"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Per-request timeout in seconds (default: none)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the mock translator instead of iFlytek (appends _<to> to each text)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .short('n')
                .help("Translate but do not write files back")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .help("Write single-line SNBT instead of the FTB Quests layout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every translated value")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" })),
        )
        .init();

    let path = PathBuf::from(matches.get_one::<String>("path").expect("path is required"));
    let from = matches.get_one::<String>("from").expect("from has a default");
    let to = matches.get_one::<String>("to").expect("to has a default");
    let dry_run = matches.get_flag("dry-run");
    let style = if matches.get_flag("compact") {
        Style::Compact
    } else {
        Style::Pretty
    };

    // 1. Pick the provider
    let provider: Box<dyn StringTranslator> = if matches.get_flag("mock") {
        Box::new(MockTranslator::new(MockMode::Suffix(to.clone())))
    } else {
        let credentials = match Credentials::from_env() {
            Ok(credentials) => credentials,
            Err(e) => {
                error!("{}", e);
                eprintln!("   Set APP_ID, API_SECRET and API_KEY from the iFlytek console");
                eprintln!("   Or use --mock to use the mock translator");
                return Err(e.into());
            }
        };
        let mut config = XunfeiConfig::new(credentials).with_languages(from, to);
        if let Some(secs) = matches.get_one::<u64>("timeout") {
            config = config.with_timeout(Duration::from_secs(*secs));
        }
        Box::new(XunfeiTranslator::new(config)?)
    };
    info!(provider = provider.provider_name(), %from, %to, "translator ready");

    // 2. Pick the predicate
    let translator = match matches.get_one::<String>("key-pattern") {
        Some(pattern) => TreeTranslator::new(provider, key_matches(Regex::new(pattern)?)),
        None => {
            let keys: Vec<String> = matches
                .get_many::<String>("key")
                .map(|values| values.cloned().collect())
                .unwrap_or_else(|| vec!["title".to_string()]);
            TreeTranslator::new(provider, key_contains_any(keys))
        }
    };

    // 3. Translate each document in turn
    let files = collect_snbt_files(&path)?;
    if files.is_empty() {
        warn!(path = %path.display(), "no .snbt files found");
    }

    let mut total = TranslationReport::default();
    let mut skipped = 0;
    for file in &files {
        match translate_file(&translator, file, style, dry_run).await {
            Ok(report) => total.merge(report),
            Err(e) if e.is_fatal() => {
                error!(path = %file.display(), error = %e, "aborting");
                return Err(e.into());
            }
            Err(e) => {
                error!(path = %file.display(), error = %e, "skipping document");
                skipped += 1;
            }
        }
    }

    info!(
        files = files.len(),
        skipped,
        requested = total.requested,
        failed = total.failed,
        emptied = total.emptied,
        "done"
    );
    if total.emptied > 0 {
        warn!(
            "{} values were left empty because their translation failed",
            total.emptied
        );
    }

    Ok(())
}
