mod ballot;

use crate::models::CandidateRegistry;
use serenity::builder::CreateApplicationCommands;
use serenity::model::application::command::Command;
use serenity::model::id::GuildId;
use serenity::prelude::*;

pub const DASHBOARD_COMMAND: &str = "dashboard";
pub const VOTE_COMMAND: &str = "vote";
pub const COMMENTS_COMMAND: &str = "comments";
pub const COMPARE_COMMAND: &str = "compare";

pub async fn register_commands(
    ctx: &Context,
    registry: &CandidateRegistry,
    guild_id: Option<GuildId>,
) -> Result<(), serenity::Error> {
    match guild_id {
        // Guild commands propagate immediately, handy while testing
        Some(guild_id) => {
            guild_id
                .set_application_commands(&ctx.http, |commands| build_commands(commands, registry))
                .await?;
        }
        None => {
            Command::set_global_application_commands(&ctx.http, |commands| build_commands(commands, registry))
                .await?;
        }
    }
    Ok(())
}

fn build_commands<'a>(
    commands: &'a mut CreateApplicationCommands,
    registry: &CandidateRegistry,
) -> &'a mut CreateApplicationCommands {
    commands
        .create_application_command(|command| ballot::create_dashboard_command(command))
        .create_application_command(|command| ballot::create_vote_command(command, registry))
        .create_application_command(|command| ballot::create_comments_command(command, registry))
        .create_application_command(|command| ballot::create_compare_command(command))
}
