mod commands;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod state;
mod voting;

use config::Config;
use db::Database;
use models::CandidateRegistry;
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use state::AppState;
use std::sync::Arc;
use log::{info, error};
use voting::VoteLedger;

struct Bot {
    state: Arc<AppState>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Bot {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let state = Arc::clone(&self.state);

        // Handle each interaction on its own task
        tokio::spawn(async move {
            handlers::handle_interaction(&state, &ctx, interaction).await;
        });
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        match commands::register_commands(&ctx, &self.state.registry, self.guild_id).await {
            Ok(()) => match self.guild_id {
                Some(guild_id) => info!("Registered slash commands for guild {}", guild_id),
                None => info!("Registered global slash commands."),
            },
            Err(why) => error!("Failed to register slash commands: {:?}", why),
        }
    }
}

fn load_registry(config: &Config) -> Result<CandidateRegistry, error::ConfigError> {
    match &config.candidates_file {
        Some(path) => CandidateRegistry::from_file(path),
        None => {
            info!("CANDIDATES_FILE not set, using built-in roster");
            Ok(CandidateRegistry::default_roster())
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let registry = match load_registry(&config) {
        Ok(registry) => registry,
        Err(e) => {
            error!("Failed to load candidates: {}", e);
            return;
        }
    };

    let database = match Database::connect(&config.database_url, config.max_connections).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    // Every candidate needs a vote record before the first vote arrives
    if let Err(e) = database.seed(&registry.names()).await {
        error!("Failed to seed vote records: {}", e);
        return;
    }

    let state = Arc::new(AppState::new(database, registry));
    let bot = Bot {
        state,
        guild_id: config.guild_id.map(GuildId),
    };

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_INTEGRATIONS;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(bot)
        .await
    {
        Ok(client) => client,
        Err(why) => {
            error!("Error creating client: {:?}", why);
            return;
        }
    };

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
