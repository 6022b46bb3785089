use crate::error::VoteError;
use crate::handlers::{reply_ephemeral, render};
use crate::models::{CandidateRegistry, StatField};
use crate::state::AppState;
use crate::voting::{ranking, VoteLedger, VoteSnapshot};
use log::{error, info};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;

pub const VOTE_BUTTON_PREFIX: &str = "vote:";

const BUTTONS_PER_ROW: usize = 5;
const MAX_ROWS: usize = 5;
const BUTTON_LABEL_LIMIT: usize = 80;

pub async fn load_snapshot(state: &AppState) -> Result<VoteSnapshot, VoteError> {
    state.database.snapshot().await
}

pub fn dashboard_embed(state: &AppState, snapshot: &VoteSnapshot) -> CreateEmbed {
    let standings = ranking::standings(state.registry.candidates(), snapshot);
    let view = render::dashboard_view(&standings, ranking::total_votes(snapshot));

    let mut embed = CreateEmbed::default();
    embed
        .title(render::TITLE)
        .description(&view.description)
        .colour(render::ACCENT_COLOUR);
    for (title, body) in &view.cards {
        embed.field(title, body, true);
    }
    embed.field("📊 Current Rankings", &view.rankings, false);
    embed.footer(|footer| footer.text(render::FOOTER));
    embed
}

// One vote button per candidate, in registry order
pub fn vote_buttons(registry: &CandidateRegistry) -> CreateComponents {
    let mut components = CreateComponents::default();
    for row_candidates in registry.candidates().chunks(BUTTONS_PER_ROW).take(MAX_ROWS) {
        components.create_action_row(|row| {
            for candidate in row_candidates {
                row.create_button(|btn| {
                    btn.custom_id(format!("{}{}", VOTE_BUTTON_PREFIX, candidate.name))
                        .label(render::clip(&format!("🗳️ {}", candidate.name), BUTTON_LABEL_LIMIT))
                        .style(ButtonStyle::Primary)
                });
            }
            row
        });
    }
    components
}

pub async fn handle_dashboard_command(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let snapshot = match load_snapshot(state).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to load vote tallies: {}", e);
            reply_ephemeral(ctx, command, "Could not load the current tallies.").await?;
            return Ok(());
        }
    };
    info!(
        "Rendering dashboard for {} ({} votes cast)",
        command.user.id,
        ranking::total_votes(&snapshot)
    );

    let embed = dashboard_embed(state, &snapshot);
    let buttons = vote_buttons(&state.registry);
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.add_embed(embed).set_components(buttons))
        })
        .await?;
    Ok(())
}

pub async fn handle_compare_command(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let blocks = render::comparison_blocks(state.registry.candidates(), &StatField::COMPARISON);

    let mut embed = CreateEmbed::default();
    embed
        .title("📈 Stat Comparison")
        .description("Each bar is scaled between the lowest and highest value of that stat.")
        .colour(render::ACCENT_COLOUR);
    for (label, block) in &blocks {
        embed.field(label, block, false);
    }

    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.add_embed(embed))
        })
        .await?;
    Ok(())
}
