mod animation;
mod session;
mod terminal;

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use coinflip_core::{verify_flip, ControllerConfig, Face, OsFaceSource, SeededFaceSource};
use coinflip_shared::{SessionSummary, Strings};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::session::{PlayOptions, Source};

#[derive(Parser)]
#[command(name = "coinflip", about = "Heads or tails in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Tracing filter, e.g. `debug` or `coinflip_core=debug`
    #[arg(long, global = true, env = "COINFLIP_LOG", default_value = "warn")]
    log: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively
    Play {
        /// Duration of one animation phase in milliseconds
        #[arg(long, env = "COINFLIP_PHASE_MS", default_value_t = 60)]
        phase_ms: u64,
        /// Frames drawn per phase
        #[arg(long, default_value_t = 4)]
        frames: u32,
        /// Refuse to change the pick while the coin is spinning
        #[arg(long)]
        lock_choice: bool,
        #[command(flatten)]
        seed: SeedArgs,
    },
    /// Run flips without rendering and print a summary
    Simulate {
        #[arg(long, default_value_t = 100)]
        flips: u32,
        #[arg(long, value_enum, default_value_t = Pick::Heads)]
        choice: Pick,
        /// Full spin cycles before stop is pressed
        #[arg(long, default_value_t = 1)]
        cycles: u32,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        seed: SeedArgs,
    },
    /// Check a seeded flip result
    Verify {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: u64,
        #[arg(long, value_enum)]
        face: Pick,
    },
}

#[derive(Args)]
struct SeedArgs {
    /// Secret seed; makes every flip reproducible and verifiable
    #[arg(long, env = "COINFLIP_SERVER_SEED")]
    server_seed: Option<String>,
    #[arg(long, default_value = "player")]
    client_seed: String,
    /// Nonce of the first flip
    #[arg(long, default_value_t = 0)]
    nonce: u64,
}

impl SeedArgs {
    fn source(self) -> Source {
        match self.server_seed {
            Some(server_seed) => {
                let src = SeededFaceSource::new(server_seed, self.client_seed, self.nonce);
                info!(server_seed_hash = %src.server_seed_hash_hex(), "using seeded flips");
                Source::Seeded(src)
            }
            None => Source::Os(OsFaceSource),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Pick {
    Heads,
    Tails,
}

impl From<Pick> for Face {
    fn from(pick: Pick) -> Self {
        match pick {
            Pick::Heads => Face::Heads,
            Pick::Tails => Face::Tails,
        }
    }
}

fn print_summary(summary: &SessionSummary) {
    println!(
        "picked={} flips={} score={} heads={} tails={} win_rate={:.3}",
        Strings::face(summary.chosen_face),
        summary.flips,
        summary.score,
        summary.heads,
        summary.tails,
        summary.win_rate()
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log)?)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Play {
            phase_ms,
            frames,
            lock_choice,
            seed,
        } => {
            let opts = PlayOptions {
                phase: Duration::from_millis(phase_ms),
                frames,
                config: ControllerConfig {
                    lock_choice_while_spinning: lock_choice,
                },
            };
            let summary = session::play(seed.source(), opts).await?;
            print_summary(&summary);
        }
        Commands::Simulate {
            flips,
            choice,
            cycles,
            json,
            seed,
        } => {
            let summary = session::simulate(
                seed.source(),
                flips,
                choice.into(),
                cycles,
                ControllerConfig::default(),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Verify {
            server_seed,
            client_seed,
            nonce,
            face,
        } => {
            let src = SeededFaceSource::new(&server_seed, &client_seed, nonce);
            let actual = src.face_at(nonce);
            let ok = verify_flip(&server_seed, &client_seed, nonce, face.into());
            println!(
                "server_seed_hash={} nonce={} face={} match={}",
                src.server_seed_hash_hex(),
                nonce,
                actual,
                ok
            );
        }
    }

    Ok(())
}
