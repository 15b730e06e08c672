use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use podsync::{
    NoopReporter, ProgressEvent, ProgressReporter, ReqwestClient, SharedProgressReporter,
    SyncOptions, sync_podcast,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");

/// Mirror the episodes of an RSS podcast feed into a local directory
#[derive(Parser, Debug)]
#[command(name = "podsync")]
#[command(about = "Mirror the episodes of an RSS podcast feed into a local directory")]
#[command(version)]
struct Args {
    /// RSS feed URL or path to a local RSS file
    feed: String,

    /// Root directory for downloaded episodes
    #[arg(short, long, default_value = "./podcasts")]
    output: PathBuf,

    /// Number of concurrent file checks per batch
    #[arg(short, long, default_value = "20")]
    batch_size: usize,

    /// Maximum number of episodes to download
    #[arg(short, long)]
    limit: Option<usize>,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Progress reporter using indicatif for terminal output
struct ConsoleReporter {
    multi: MultiProgress,
    main_bar: ProgressBar,
    download_bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    fn new() -> Self {
        let multi = MultiProgress::new();

        let main_style = ProgressStyle::default_bar()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let main_bar = multi.add(ProgressBar::new_spinner());
        main_bar.set_style(main_style);
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            main_bar,
            download_bar: Mutex::new(None),
        }
    }

    fn start_download_bar(&self, length: Option<u64>) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template(&format!(
                "  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{bytes}}/{{total_bytes}} {{wide_msg}}"
            ))
            .unwrap()
            .progress_chars("█▓░");

        let bar = self.multi.add(ProgressBar::new(length.unwrap_or(0)));
        bar.set_style(style);

        let mut slot = self.download_bar.lock().unwrap();
        if let Some(old) = slot.replace(bar.clone()) {
            old.finish_and_clear();
        }
        bar
    }

    fn finish_download_bar(&self) {
        if let Some(bar) = self.download_bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }

    fn current_download_bar(&self) -> Option<ProgressBar> {
        self.download_bar.lock().unwrap().clone()
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingFeed { source } => {
                self.main_bar
                    .set_message(format!("{SEARCH}Fetching feed: {}", source.cyan()));
            }

            ProgressEvent::FeedParsed {
                channel_title,
                episode_count,
            } => {
                self.main_bar.set_message(format!(
                    "{HEADPHONES}{} • {} episodes",
                    channel_title.bold().green(),
                    episode_count.to_string().cyan()
                ));
            }

            ProgressEvent::DiffCompleted { missing_count } => {
                self.main_bar.println(format!(
                    "{HEADPHONES}{} episodes to download",
                    missing_count.to_string().yellow()
                ));
            }

            ProgressEvent::SizeMismatch {
                episode_title,
                local_bytes,
                declared_bytes,
                similarity,
            } => {
                self.main_bar.println(format!(
                    "{WARNING}{}: {} bytes on disk, {} declared (similarity {:.4})",
                    truncate_title(&episode_title, 40).yellow(),
                    local_bytes,
                    declared_bytes,
                    similarity
                ));
            }

            ProgressEvent::DownloadStarting {
                episode_title,
                episode_index,
                total_to_download,
                content_length,
            } => {
                let bar = self.start_download_bar(content_length);
                bar.set_message(format!(
                    "Processing {}. {} of {}",
                    truncate_title(&episode_title, 40),
                    (episode_index + 1).to_string().cyan(),
                    total_to_download.to_string().cyan()
                ));
            }

            ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
                ..
            } => {
                if let Some(bar) = self.current_download_bar() {
                    if let Some(total) = total_bytes {
                        bar.set_length(total);
                    }
                    bar.set_position(bytes_downloaded);
                }
            }

            ProgressEvent::DownloadCompleted { episode_title, .. } => {
                self.finish_download_bar();
                self.main_bar.println(format!(
                    "{SUCCESS}Downloaded {}",
                    truncate_title(&episode_title, 40).green()
                ));
            }

            ProgressEvent::SyncCompleted { downloaded_count } => {
                self.main_bar.finish_and_clear();
                println!(
                    "\n{PARTY}{} {} downloaded",
                    "Sync complete:".bold().green(),
                    downloaded_count.to_string().green().bold()
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let kept: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "\n{}{} {}\n",
        MICROPHONE,
        "podsync".bold().magenta(),
        "- Podcast Mirror".dimmed()
    );

    let client = ReqwestClient::new();

    let options = SyncOptions {
        root: args.output.clone(),
        batch_size: args.batch_size,
        limit: args.limit,
        ..Default::default()
    };

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(ConsoleReporter::new())
    };

    let summary = sync_podcast(&client, &args.feed, &options, reporter)
        .await
        .context("Failed to sync podcast")?;

    if !args.quiet {
        println!(
            "{HEADPHONES}{}: {} episodes, {} already on disk",
            summary.channel_title.bold(),
            summary.total_episodes.to_string().cyan(),
            summary.skipped.to_string().cyan()
        );
        println!(
            "\n{FOLDER}Output: {}\n",
            args.output.display().to_string().cyan()
        );
    }

    Ok(())
}
