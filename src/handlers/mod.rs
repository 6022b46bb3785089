mod comments;
mod dashboard;
mod render;
mod vote;

use crate::commands::{COMMENTS_COMMAND, COMPARE_COMMAND, DASHBOARD_COMMAND, VOTE_COMMAND};
use crate::state::AppState;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::prelude::*;
use log::{info, warn, error};

// Handle slash commands
pub async fn handle_command(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Received command: {}", command.data.name);
    match command.data.name.as_str() {
        DASHBOARD_COMMAND => dashboard::handle_dashboard_command(state, ctx, command).await?,
        VOTE_COMMAND => vote::handle_vote_command(state, ctx, command).await?,
        COMMENTS_COMMAND => comments::handle_comments_command(state, ctx, command).await?,
        COMPARE_COMMAND => dashboard::handle_compare_command(state, ctx, command).await?,
        _ => reply_ephemeral(ctx, command, "Unknown command").await?,
    }
    Ok(())
}

// Route button clicks by custom_id
pub async fn handle_component(
    state: &AppState,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let custom_id = &component.data.custom_id;
    info!("Received component interaction: {}", custom_id);

    if let Some(candidate_name) = custom_id.strip_prefix(dashboard::VOTE_BUTTON_PREFIX) {
        vote::handle_vote_button(state, ctx, component, candidate_name).await?;
    } else {
        warn!("Unhandled component custom_id: {}", custom_id);
        component
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| message.content("Unknown button action.").ephemeral(true))
            })
            .await?;
    }

    Ok(())
}

pub async fn handle_interaction(state: &AppState, ctx: &Context, interaction: Interaction) {
    let result = match interaction {
        Interaction::ApplicationCommand(command) => handle_command(state, ctx, &command).await,
        Interaction::MessageComponent(component) => handle_component(state, ctx, &component).await,
        _ => {
            warn!("Unhandled interaction type: {:?}", interaction.kind());
            Ok(())
        }
    };

    if let Err(why) = result {
        error!("Interaction handler error: {:?}", why);
    }
}

pub(crate) fn string_option<'a>(command: &'a ApplicationCommandInteraction, name: &str) -> Option<&'a str> {
    command
        .data
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_ref())
        .and_then(|value| value.as_str())
}

pub(crate) async fn reply_ephemeral(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
) -> Result<(), serenity::Error> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await
}
