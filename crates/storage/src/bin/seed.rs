use std::fmt;

use storage::repository::{NewQuestionRecord, Storage};
use trivia_core::model::{Category, CategoryId, QuestionDraft};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    questions: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("TRIVIA_DB_URL")
            .unwrap_or_else(|_| "sqlite:trivia.sqlite3?mode=rwc".into());
        let mut questions = true;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--categories-only" => questions = false,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, questions })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:trivia.sqlite3?mode=rwc)");
    eprintln!("  --categories-only         Seed categories without sample questions");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  TRIVIA_DB_URL");
}

const CATEGORIES: [(u64, &str); 6] = [
    (1, "Science"),
    (2, "Art"),
    (3, "Geography"),
    (4, "History"),
    (5, "Entertainment"),
    (6, "Sports"),
];

const QUESTIONS: [(&str, &str, u64, u64); 8] = [
    ("What is the heaviest organ in the human body?", "The Liver", 1, 4),
    ("Who discovered penicillin?", "Alexander Fleming", 1, 3),
    ("Which Dutch graphic artist–initials M C was a creator of optical illusions?", "Escher", 2, 1),
    ("La Giaconda is better known as what?", "Mona Lisa", 2, 3),
    ("What is the largest lake in Africa?", "Lake Victoria", 3, 2),
    ("Who invented Peanut Butter?", "George Washington Carver", 4, 2),
    ("What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 5, 4),
    ("Which is the only team to play in every soccer World Cup tournament?", "Brazil", 6, 3),
];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;

    for (id, label) in CATEGORIES {
        let category = Category::new(CategoryId::new(id), label)?;
        storage.categories.upsert_category(&category).await?;
    }

    let mut inserted = 0;
    if args.questions && storage.questions.list_questions().await?.is_empty() {
        for (question, answer, category, difficulty) in QUESTIONS {
            let validated = QuestionDraft {
                question: Some(question.to_owned()),
                answer: Some(answer.to_owned()),
                category: Some(category),
                difficulty: Some(difficulty),
            }
            .validate()?;
            storage
                .questions
                .insert_new_question(NewQuestionRecord::from_validated(validated))
                .await?;
            inserted += 1;
        }
    }

    println!(
        "Seeded {} categories and {} questions into {}",
        CATEGORIES.len(),
        inserted,
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
