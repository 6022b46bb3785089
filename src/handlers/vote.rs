use crate::error::VoteError;
use crate::handlers::{dashboard, reply_ephemeral, string_option};
use crate::state::AppState;
use crate::voting::{submit_vote, VoteOutcome};
use log::{debug, error, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;

/// Run one vote through the voter's session guard and the store.
pub async fn cast_vote(
    state: &AppState,
    voter_key: &str,
    candidate_name: &str,
    comment: Option<&str>,
) -> Result<VoteOutcome, VoteError> {
    if !state.registry.contains(candidate_name) {
        return Err(VoteError::UnknownCandidate(candidate_name.to_string()));
    }

    let session = state.sessions.session_for(voter_key).await;
    let mut session = session.lock().await;
    debug!("Voter {} using session {}", voter_key, session.id());

    submit_vote(&state.database, &mut *session, candidate_name, comment).await
}

fn outcome_message(candidate_name: &str, outcome: &VoteOutcome) -> String {
    match outcome {
        VoteOutcome::Recorded { candidate, new_count, comment_saved } => format!(
            "✅ Vote recorded for **{}** (now {} votes).{}",
            candidate,
            new_count,
            if *comment_saved { " Your comment was saved." } else { "" }
        ),
        VoteOutcome::AlreadyVoted => format!("You have already voted for **{}**.", candidate_name),
    }
}

fn failure_message(candidate_name: &str, err: &VoteError) -> String {
    match err {
        VoteError::UnknownCandidate(_) => format!("**{}** is not on the ballot.", candidate_name),
        VoteError::Store(_) => "Your vote could not be recorded. Please try again.".to_string(),
    }
}

pub async fn handle_vote_command(
    state: &AppState,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let candidate_name = match string_option(command, "candidate") {
        Some(name) => name,
        None => {
            reply_ephemeral(ctx, command, "Please choose a candidate.").await?;
            return Ok(());
        }
    };
    let comment = string_option(command, "comment");
    let voter_key = command.user.id.to_string();

    let message = match cast_vote(state, &voter_key, candidate_name, comment).await {
        Ok(outcome) => outcome_message(candidate_name, &outcome),
        Err(e) => {
            match &e {
                VoteError::UnknownCandidate(_) => warn!("Vote for unknown candidate {:?}", candidate_name),
                VoteError::Store(_) => error!("Failed to record vote for {}: {}", candidate_name, e),
            }
            failure_message(candidate_name, &e)
        }
    };

    reply_ephemeral(ctx, command, &message).await?;
    Ok(())
}

pub async fn handle_vote_button(
    state: &AppState,
    ctx: &Context,
    component: &MessageComponentInteraction,
    candidate_name: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Processing vote button for {} from {}", candidate_name, component.user.id);
    let voter_key = component.user.id.to_string();

    let message = match cast_vote(state, &voter_key, candidate_name, None).await {
        Ok(outcome @ VoteOutcome::Recorded { .. }) => {
            // State changed: rebuild the board from a fresh snapshot
            let snapshot = match dashboard::load_snapshot(state).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    // The vote already counted; confirm it even though the board can't refresh
                    error!("Vote for {} recorded but dashboard refresh failed: {}", candidate_name, e);
                    reply_to_button(ctx, component, outcome_message(candidate_name, &outcome)).await?;
                    return Ok(());
                }
            };
            component
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::UpdateMessage)
                        .interaction_response_data(|message| {
                            message
                                .add_embed(dashboard::dashboard_embed(state, &snapshot))
                                .set_components(dashboard::vote_buttons(&state.registry))
                        })
                })
                .await?;
            return Ok(());
        }
        Ok(outcome) => outcome_message(candidate_name, &outcome),
        Err(e) => {
            error!("Vote button for {} failed: {}", candidate_name, e);
            failure_message(candidate_name, &e)
        }
    };

    reply_to_button(ctx, component, message).await?;
    Ok(())
}

async fn reply_to_button(
    ctx: &Context,
    component: &MessageComponentInteraction,
    message: String,
) -> Result<(), serenity::Error> {
    component
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.content(message).ephemeral(true))
        })
        .await
}
