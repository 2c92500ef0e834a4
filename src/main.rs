use anyhow::{Context, Result};
use clap::Parser;
use rover::runtime::RealRuntime;
use rover::{Config, DiscordLinkResult, LinkRecord, RoverClient, UpdateOutcome};
use serde::Serialize;
use std::time::Duration;

/// rover - RoVer account-linking API client
///
/// Look up Discord/Roblox account links and trigger role syncs.
///
/// The API key is read from ROVER_API_KEY unless --api-key is given.
///
/// Examples:
///   rover discord-to-roblox 123456789012345678 234567890123456789
///   rover update 123456789012345678 234567890123456789
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RoVer API key
    #[arg(
        long = "api-key",
        value_name = "KEY",
        env = "ROVER_API_KEY",
        hide_env_values = true,
        global = true
    )]
    pub api_key: Option<String>,

    /// RoVer API URL (defaults to https://registry.rover.link/api)
    #[arg(long = "api-url", value_name = "URL", env = "ROVER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS", env = "ROVER_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Applies command-line overrides on top of the environment config.
    fn config(&self, base: Config) -> Config {
        Config {
            api_key: self.api_key.clone().or(base.api_key),
            api_url: self.api_url.clone().unwrap_or(base.api_url),
            timeout: self.timeout.map(Duration::from_secs).or(base.timeout),
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the Roblox account linked to a Discord user
    DiscordToRoblox(LookupArgs),

    /// Show the Discord members linked to a Roblox account
    RobloxToDiscord(RobloxLookupArgs),

    /// Sync roles and nickname for a Discord user
    Update(LookupArgs),

    /// Revoke the API key in use
    DeleteApiKey,
}

#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    /// Discord guild (server) ID
    #[arg(value_name = "GUILD_ID")]
    pub guild_id: u64,

    /// Discord user ID
    #[arg(value_name = "USER_ID")]
    pub user_id: u64,
}

#[derive(clap::Args, Debug)]
pub struct RobloxLookupArgs {
    /// Discord guild (server) ID
    #[arg(value_name = "GUILD_ID")]
    pub guild_id: u64,

    /// Roblox user ID
    #[arg(value_name = "ROBLOX_ID")]
    pub roblox_id: u64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    Link(LinkRecord),
    Discord(DiscordLinkResult),
    Update(UpdateOutcome),
    Revoked { revoked: bool },
}

async fn run(client: &RoverClient, command: Commands) -> rover::Result<Output> {
    let output = match command {
        Commands::DiscordToRoblox(args) => Output::Link(
            client
                .get_roblox_from_discord(args.guild_id, args.user_id)
                .await?,
        ),
        Commands::RobloxToDiscord(args) => Output::Discord(
            client
                .get_discord_from_roblox(args.guild_id, args.roblox_id)
                .await?,
        ),
        Commands::Update(args) => {
            Output::Update(client.update_user(args.guild_id, args.user_id).await?)
        }
        Commands::DeleteApiKey => {
            client.delete_api_key().await?;
            Output::Revoked { revoked: true }
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = cli.config(Config::from_runtime(&RealRuntime));
    let mut client = RoverClient::with_config(config);

    let command = cli.command;
    let output = client
        .scoped(|c| Box::pin(run(c, command)))
        .await
        .context("RoVer request failed")?;

    let json = serde_json::to_string_pretty(&output).context("Failed to format output")?;
    println!("{}", json);
    Ok(())
}
