use crate::handlers::{reply_ephemeral, render, string_option};
use crate::state::AppState;
use crate::voting::VoteLedger;
use log::error;
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;

pub async fn handle_comments_command(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let candidate = match string_option(command, "candidate").and_then(|name| state.registry.get(name)) {
        Some(candidate) => candidate,
        None => {
            reply_ephemeral(ctx, command, "Please choose a candidate from the list.").await?;
            return Ok(());
        }
    };

    let comments = match state.database.comments_for(&candidate.name).await {
        Ok(comments) => comments,
        Err(e) => {
            error!("Failed to load comments for {}: {}", candidate.name, e);
            reply_ephemeral(ctx, command, "Could not load comments right now.").await?;
            return Ok(());
        }
    };

    let mut embed = CreateEmbed::default();
    embed
        .title(format!("💬 Comments for {} {}", candidate.country, candidate.name))
        .description(render::comments_text(&candidate.name, &comments))
        .colour(render::ACCENT_COLOUR);

    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.add_embed(embed).ephemeral(true))
        })
        .await?;
    Ok(())
}
