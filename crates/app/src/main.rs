use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};
use services::{
    AppServices, CategoryQuestions, CreateOrSearch, DeletedQuestion, ErrorBody, QuestionListing,
    QuestionServiceConfig, QuestionServiceError, QuizQuestion, SearchResults,
};
use trivia_core::model::{CategoryId, CategoryMap, QuestionId};
use trivia_core::pagination::PageNumber;
use trivia_core::search::SearchTerm;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DB_URL: &str = "sqlite:trivia.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidCategoryId { raw: String },
    InvalidQuestionId { raw: String },
    InvalidPage { raw: String },
    InvalidJson { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}> argument"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidCategoryId { raw } => write!(f, "invalid category id: {raw}"),
            ArgsError::InvalidQuestionId { raw } => write!(f, "invalid question id: {raw}"),
            ArgsError::InvalidPage { raw } => write!(f, "invalid --page value: {raw}"),
            ArgsError::InvalidJson { raw } => write!(f, "invalid JSON body: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  categories              Map of category id to label");
    eprintln!("  list                    One page of all questions");
    eprintln!("  delete <id>             Delete a question, then list");
    eprintln!("  search <term>           Case-insensitive search of question text");
    eprintln!("  create <json>           Create a question (or search with searchTerm)");
    eprintln!("  category <id>           One page of a category's questions");
    eprintln!("  quiz <json>             Next quiz question, e.g.");
    eprintln!(r#"                          '{{"quiz_category":{{"id":0}},"previous_questions":[]}}'"#);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>           SQLite URL (default: {DEFAULT_DB_URL})");
    eprintln!("  --page <n>                  Page number, from 1 (default: 1)");
    eprintln!("  --current-category <id>     Category reported by list (default: 1)");
    eprintln!("  --strict-category-errors    Report category listing failures as 500");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  TRIVIA_DB_URL, TRIVIA_CURRENT_CATEGORY, TRIVIA_STRICT_CATEGORY_ERRORS, RUST_LOG");
}

#[derive(Debug)]
enum Command {
    Categories,
    List,
    Delete(QuestionId),
    Search(String),
    Create(Value),
    Category(CategoryId),
    Quiz(Value),
}

impl Command {
    fn parse(name: &str, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        match name {
            "categories" => Ok(Self::Categories),
            "list" => Ok(Self::List),
            "delete" => {
                let raw = positional(args, "id")?;
                raw.parse()
                    .map(Self::Delete)
                    .map_err(|_| ArgsError::InvalidQuestionId { raw })
            }
            "search" => positional(args, "term").map(Self::Search),
            "create" => parse_json(positional(args, "json")?).map(Self::Create),
            "category" => {
                let raw = positional(args, "id")?;
                raw.parse()
                    .map(Self::Category)
                    .map_err(|_| ArgsError::InvalidCategoryId { raw })
            }
            "quiz" => parse_json(positional(args, "json")?).map(Self::Quiz),
            other => Err(ArgsError::UnknownCommand(other.to_owned())),
        }
    }
}

fn positional(
    args: &mut impl Iterator<Item = String>,
    name: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingArgument { name })
}

fn parse_json(raw: String) -> Result<Value, ArgsError> {
    serde_json::from_str(&raw).map_err(|_| ArgsError::InvalidJson { raw })
}

#[derive(Debug)]
struct Args {
    db_url: String,
    page: PageNumber,
    config: QuestionServiceConfig,
    command: Command,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("TRIVIA_DB_URL").unwrap_or_else(|_| DEFAULT_DB_URL.into());
        let mut config = QuestionServiceConfig::default();
        if let Ok(raw) = std::env::var("TRIVIA_CURRENT_CATEGORY") {
            config.current_category = raw
                .parse()
                .map_err(|_| ArgsError::InvalidCategoryId { raw })?;
        }
        if env_flag("TRIVIA_STRICT_CATEGORY_ERRORS") {
            config.coarse_category_errors = false;
        }
        let mut page = PageNumber::FIRST;
        let mut command = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--page" => {
                    let value = require_value(&mut args, "--page")?;
                    page = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidPage { raw: value })?;
                }
                "--current-category" => {
                    let value = require_value(&mut args, "--current-category")?;
                    config.current_category = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCategoryId { raw: value })?;
                }
                "--strict-category-errors" => config.coarse_category_errors = false,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if command.is_none() => command = Some(Command::parse(&arg, &mut args)?),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let command = command.ok_or(ArgsError::MissingArgument { name: "command" })?;
        Ok(Self {
            db_url: normalize_sqlite_url(db_url),
            page,
            config,
            command,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw.starts_with("sqlite::memory:") || raw.starts_with("sqlite://") || raw.contains("mode=")
    {
        return raw;
    }
    let path = raw.trim().strip_prefix("sqlite:").unwrap_or(raw.trim());
    format!("sqlite://{path}?mode=rwc")
}

/// `{"success": true, ...payload}`.
fn success_envelope(payload: &impl Serialize) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(payload)?;
    match value.as_object_mut() {
        Some(fields) => {
            fields.insert("success".into(), Value::Bool(true));
            Ok(value)
        }
        None => Ok(json!({ "success": true, "data": value })),
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Reply {
    Categories { categories: CategoryMap },
    Listing(QuestionListing),
    Deleted(DeletedQuestion),
    Searched(SearchResults),
    CreatedOrSearched(CreateOrSearch),
    Category(CategoryQuestions),
    Quiz(QuizQuestion),
}

async fn execute(
    services: &AppServices,
    command: Command,
    page: PageNumber,
) -> Result<Reply, QuestionServiceError> {
    let questions = services.question_service();
    let reply = match command {
        Command::Categories => Reply::Categories {
            categories: services.category_service().all_categories().await?,
        },
        Command::List => Reply::Listing(questions.list(page).await?),
        Command::Delete(id) => Reply::Deleted(questions.delete(id, page).await?),
        Command::Search(term) => match SearchTerm::new(term) {
            Some(term) => Reply::Searched(questions.search(&term, page).await?),
            None => Reply::Listing(questions.list(page).await?),
        },
        Command::Create(body) => {
            Reply::CreatedOrSearched(questions.create_or_search_json(body, page).await?)
        }
        Command::Category(id) => Reply::Category(questions.list_by_category(id, page).await?),
        Command::Quiz(body) => Reply::Quiz(questions.next_quiz_question_json(body).await?),
    };
    Ok(reply)
}

async fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    tracing::debug!(db_url = %args.db_url, command = ?args.command, "starting");

    let services = AppServices::new_sqlite(&args.db_url, args.config).await?;

    let (output, ok) = match execute(&services, args.command, args.page).await {
        Ok(reply) => (success_envelope(&reply)?, true),
        Err(err) => {
            tracing::warn!(error = %err, "command failed");
            (serde_json::to_value(ErrorBody::from(&err))?, false)
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ok)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> impl Iterator<Item = String> {
        args.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_command_with_options() {
        let args = Args::parse(argv(&[
            "--db",
            "sqlite:test.sqlite3",
            "category",
            "3",
            "--page",
            "2",
            "--strict-category-errors",
        ]))
        .unwrap();
        assert!(matches!(args.command, Command::Category(id) if id == CategoryId::new(3)));
        assert_eq!(args.page.get(), 2);
        assert!(!args.config.coarse_category_errors);
        assert_eq!(args.db_url, "sqlite://test.sqlite3?mode=rwc");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Args::parse(argv(&["list", "--page", "0"])),
            Err(ArgsError::InvalidPage { .. })
        ));
        assert!(matches!(
            Args::parse(argv(&["delete"])),
            Err(ArgsError::MissingArgument { name: "id" })
        ));
        assert!(matches!(
            Args::parse(argv(&["quiz", "{not json"])),
            Err(ArgsError::InvalidJson { .. })
        ));
        assert!(matches!(
            Args::parse(argv(&["shuffle"])),
            Err(ArgsError::UnknownCommand(_))
        ));
        assert!(matches!(
            Args::parse(argv(&[])),
            Err(ArgsError::MissingArgument { name: "command" })
        ));
    }

    #[test]
    fn memory_and_explicit_urls_are_left_alone() {
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite://data/trivia.db".into()),
            "sqlite://data/trivia.db"
        );
    }

    #[test]
    fn success_envelope_merges_payload_fields() {
        let value = success_envelope(&json!({ "total_questions": 3 })).unwrap();
        assert_eq!(value, json!({ "success": true, "total_questions": 3 }));
    }
}
