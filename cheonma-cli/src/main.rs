use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use cheonma_classify::generators::format_krw;
use cheonma_classify::{AiHint, Classifier};
use cheonma_core::{
    summarize, time, CandidateRecord, CategoryTotal, Category, ClassificationResult,
    ClassifiedTransaction, ExtractionHints, PaymentMethod, TimeWindow,
};
use cheonma_ingest::FieldExtractor;
use serde::Serialize;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod ai_hint;
mod config;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "cheonma",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CHEONMA_BUILD_SHA"), ")"),
    about = "Classify Korean spending utterances into budget categories"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract fields from an utterance and classify it
    Parse {
        text: String,

        /// Local clock to resolve relative days against (default: now in the configured timezone)
        #[arg(long)]
        now: Option<String>,

        /// Declared amount in KRW; overrides the extracted one
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<i64>,

        /// Declared payment method: cash, card, transfer, mobile-pay
        #[arg(long)]
        payment: Option<String>,

        /// Declared merchant or location
        #[arg(long)]
        location: Option<String>,

        /// Category suggested by an external model (id or display name)
        #[arg(long)]
        ai_category: Option<String>,

        #[arg(long, requires = "ai_category", default_value_t = 0.8)]
        ai_confidence: f64,

        /// Ask the configured AI service for a category hint
        #[arg(long, conflicts_with = "ai_category")]
        remote_ai: bool,

        #[arg(long)]
        json: bool,
    },

    /// Classify one utterance per line and print this month's totals
    Summary {
        /// Utterance file (default: stdin)
        file: Option<PathBuf>,

        /// Month to summarize, YYYY-MM (default: the current month)
        #[arg(long)]
        month: Option<String>,

        #[arg(long)]
        now: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List categories and their subcategories
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// Record a user's correction of a classification
    Correct {
        text: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        subcategory: Option<String>,
    },

    /// Manage ~/.cheonma/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    record: &'a CandidateRecord,
    classification: &'a ClassificationResult,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            text,
            now,
            amount,
            payment,
            location,
            ai_category,
            ai_confidence,
            remote_ai,
            json,
        } => {
            let cfg = config::load_config()?;
            let now = resolve_now(now.as_deref(), &cfg.locale.timezone)?;

            let payment_method = payment
                .as_deref()
                .map(str::parse::<PaymentMethod>)
                .transpose()?;
            let hints = ExtractionHints {
                amount,
                occurs_at: None,
                payment_method,
                location,
            };

            let hint = match ai_category {
                Some(name) => Some(AiHint::checked(name, ai_confidence)?),
                None if remote_ai || cfg.ai.enabled => ai_hint::resolve_hint(&cfg.ai, &text).await,
                None => None,
            };

            let extractor = FieldExtractor::new()?;
            let record = extractor.extract_with_hints(&text, now, &hints)?;
            let classification = Classifier::new(cfg.classifier).classify(&text, &record, hint.as_ref());

            if json {
                let out = ParseOutput {
                    record: &record,
                    classification: &classification,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_parse(&record, &classification);
            }
        }

        Command::Summary {
            file,
            month,
            now,
            json,
        } => {
            let cfg = config::load_config()?;
            let now = resolve_now(now.as_deref(), &cfg.locale.timezone)?;
            let window = match month {
                Some(m) => parse_month(&m)?,
                None => TimeWindow::month_of(now).context("current month out of range")?,
            };

            let lines = read_lines(file)?;
            let extractor = FieldExtractor::new()?;
            let classifier = Classifier::new(cfg.classifier);
            let txns: Vec<ClassifiedTransaction> = lines
                .iter()
                .map(|line| {
                    let record = extractor.extract(line, now);
                    let result = classifier.classify(line, &record, None);
                    ClassifiedTransaction::new(&record, &result)
                })
                .collect();

            let summary = summarize(&txns, window);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} .. {}  ({} utterances)",
                    summary.window.start.date(),
                    summary.window.end.date(),
                    txns.len()
                );
                for t in &summary.by_category {
                    println!("{}", summary_line(t));
                }
                println!(
                    "expense ₩{}  income ₩{}  net {}",
                    format_krw(summary.total_expense),
                    format_krw(summary.total_income),
                    summary.net()
                );
            }
        }

        Command::Categories { json } => {
            if json {
                let infos: Vec<_> = Category::ALL
                    .into_iter()
                    .map(|c| {
                        serde_json::json!({
                            "id": c.id(),
                            "name": c.name(),
                            "subcategories": c.subcategories(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&infos)?);
            } else {
                for c in Category::ALL {
                    println!("{:<14} {:<8} {}", c.id(), c.name(), c.subcategories().join(", "));
                }
            }
        }

        Command::Correct {
            text,
            category,
            subcategory,
        } => {
            let Some(category) = Category::from_name(&category) else {
                bail!("unknown category: {category} (see: cheonma categories)");
            };
            Classifier::default().learn_from_correction(&text, category, subcategory.as_deref());
            println!("Recorded: {} -> {}", text, category);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn resolve_now(now: Option<&str>, timezone: &str) -> Result<NaiveDateTime> {
    match now {
        Some(s) => time::parse_local_datetime(s),
        None => time::local_now(timezone),
    }
}

/// "2026-03" -> that calendar month.
fn parse_month(s: &str) -> Result<TimeWindow> {
    let (y, m) = s
        .trim()
        .split_once('-')
        .with_context(|| format!("invalid month '{s}' (expected YYYY-MM)"))?;
    let year: i32 = y.parse().with_context(|| format!("invalid year in '{s}'"))?;
    let month: u32 = m.parse().with_context(|| format!("invalid month in '{s}'"))?;
    TimeWindow::month(year, month).with_context(|| format!("no such month: {s}"))
}

fn summary_line(t: &CategoryTotal) -> String {
    format!(
        "{:<8} {:>3}건  ₩{:>12}  {:>5.1}%",
        t.category.name(),
        t.count,
        format_krw(t.amount),
        t.share * 100.0
    )
}

fn read_lines(file: Option<PathBuf>) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match &file {
        Some(p) => Box::new(BufReader::new(
            std::fs::File::open(p).with_context(|| format!("open {}", p.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.context("read utterance")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn print_parse(record: &CandidateRecord, result: &ClassificationResult) {
    println!("amount      ₩{}", format_krw(record.amount));
    println!("description {}", record.description);
    println!(
        "location    {}",
        record.merchant_location.as_deref().unwrap_or("-")
    );
    println!("occurs at   {}", record.occurs_at.format("%Y-%m-%d %H:%M"));
    println!("direction   {:?}", record.direction);
    println!("payment     {}", record.payment_method.id());
    println!();
    match &result.subcategory {
        Some(sub) => println!("category    {} / {}", result.category, sub),
        None => println!("category    {}", result.category),
    }
    println!("confidence  {:.2}", result.confidence);
    for r in &result.rationale {
        println!("  - {r}");
    }
}
