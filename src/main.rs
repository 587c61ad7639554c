use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;

use hls_stream_tool::commands;
use hls_stream_tool::core::config::AppConfig;
use hls_stream_tool::utils::logging;

#[derive(Parser)]
#[command(name = "hls-stream-tool")]
#[command(author, version, about = "Personal HLS stream download and monitoring tool")]
struct Cli {
    /// Playlist URL to operate on (overrides the configured URL)
    #[arg(short, long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the first segments of the stream
    Download {
        /// Number of segments to fetch
        #[arg(default_value_t = 20)]
        count: usize,
    },

    /// Record the stream with ffmpeg
    Record {
        /// Recording duration in seconds
        #[arg(default_value_t = 60)]
        duration: u64,

        /// Output file
        #[arg(default_value = "output.mp4")]
        output: String,
    },

    /// Play the stream with ffplay
    Play,

    /// Print the playlist and its segment URLs
    Info,

    /// Watch the playlist for changes until interrupted
    Monitor,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default();
    if let Some(url) = cli.url {
        config.stream.playlist_url = url;
    }
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Some(Commands::Download { count }) => {
            commands::download(&config, count).await?;
        }
        Some(Commands::Record { duration, output }) => {
            commands::record(&config, duration, &output).await?;
        }
        Some(Commands::Play) => commands::play(&config).await?,
        Some(Commands::Info) => commands::info(&config).await?,
        Some(Commands::Monitor) => run_monitor(&config).await?,
        None => interactive_menu(&config).await?,
    }

    Ok(())
}

/// Run the monitor with Ctrl-C translated into a token cancel.
async fn run_monitor(config: &AppConfig) -> Result<()> {
    let cancel = CancellationToken::new();

    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    commands::monitor(config, cancel).await
}

/// Numbered menu over the same operations, for invocation without a
/// subcommand. Operation failures are reported and the menu continues.
async fn interactive_menu(config: &AppConfig) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("HLS Stream Tool");
    println!("========================================");

    loop {
        println!();
        println!("Menu:");
        println!("1. Download segments");
        println!("2. Record stream");
        println!("3. Play stream");
        println!("4. Stream info");
        println!("5. Monitor stream");
        println!("6. Exit");
        println!();
        println!("Choose option (1-6):");

        let Some(choice) = lines.next_line().await? else {
            break;
        };

        let result = match choice.trim() {
            "1" => {
                let count = prompt_parsed(&mut lines, "How many segments? (default 20):", 20).await?;
                commands::download(config, count).await.map(|_| ())
            }
            "2" => {
                let duration =
                    prompt_parsed(&mut lines, "Duration in seconds? (default 60):", 60).await?;
                let output = prompt_string(
                    &mut lines,
                    "Output filename? (default output.mp4):",
                    "output.mp4",
                )
                .await?;
                commands::record(config, duration, &output).await
            }
            "3" => commands::play(config).await,
            "4" => commands::info(config).await,
            "5" => run_monitor(config).await,
            "6" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                println!("Invalid choice");
                continue;
            }
        };

        if let Err(error) = result {
            eprintln!("Error: {error:#}");
        }
    }

    Ok(())
}

async fn prompt_string(
    lines: &mut Lines<BufReader<Stdin>>,
    prompt: &str,
    default: &str,
) -> Result<String> {
    println!("{prompt}");
    let answer = lines.next_line().await?.unwrap_or_default();
    let answer = answer.trim();
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.to_string())
    }
}

async fn prompt_parsed<T>(
    lines: &mut Lines<BufReader<Stdin>>,
    prompt: &str,
    default: T,
) -> Result<T>
where
    T: std::str::FromStr,
{
    println!("{prompt}");
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(answer.trim().parse().unwrap_or(default))
}
