use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use env_logger::Env;

use mail_review::sync::load_archive_dir;
use mail_review::threading::tree_traversal::render_ascii;
use mail_review::{Epoch, ReleaseDigest, ReviewConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "mail-review",
    about = "Summarize release discussion from monthly mailing list archives"
)]
struct Args {
    /// Directory holding `<list>-<YYYY>-<MM>.mbox[.gz]` archives.
    archive_dir: PathBuf,

    /// Ignore archives older than this month (YYYY-MM).
    #[arg(short, long)]
    start_month: Option<Epoch>,

    /// Mailing list name, overriding REVIEW_MAILING_LIST.
    #[arg(long)]
    list: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let mut config = ReviewConfig::from_env()?;
    if let Some(list) = args.list {
        config.mailing_list = list;
    }
    if args.start_month.is_some() {
        config.start_month = args.start_month;
    }

    let batches = load_archive_dir(&args.archive_dir, &config.mailing_list, config.start_month)?;
    let digest = ReleaseDigest::from_config(&config)?;
    let archive = digest.thread(&batches);

    if log::log_enabled!(log::Level::Debug) {
        eprint!("{}", render_ascii(&archive.forest));
    }

    let export = digest.summarize(&archive);
    match args.format {
        OutputFormat::Text => print!("{export}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&export)?),
    }

    Ok(())
}
