use crate::commands::{COMMENTS_COMMAND, COMPARE_COMMAND, DASHBOARD_COMMAND, VOTE_COMMAND};
use crate::models::CandidateRegistry;
use serenity::builder::{CreateApplicationCommand, CreateApplicationCommandOption};
use serenity::model::application::command::CommandOptionType;

// Discord caps string choices at 25 per option
const MAX_CHOICES: usize = 25;

pub fn create_dashboard_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name(DASHBOARD_COMMAND)
        .description("Show the R4 promotion candidates, vote tallies and rankings")
}

pub fn create_vote_command<'a>(
    command: &'a mut CreateApplicationCommand,
    registry: &CandidateRegistry,
) -> &'a mut CreateApplicationCommand {
    command
        .name(VOTE_COMMAND)
        .description("Vote for a member to promote to R4")
        .create_option(|option| candidate_option(option, registry, "Who to vote for"))
        .create_option(|option| {
            option
                .name("comment")
                .description("Optional comment to attach to your vote")
                .kind(CommandOptionType::String)
                .required(false)
        })
}

pub fn create_comments_command<'a>(
    command: &'a mut CreateApplicationCommand,
    registry: &CandidateRegistry,
) -> &'a mut CreateApplicationCommand {
    command
        .name(COMMENTS_COMMAND)
        .description("Read the comments left for a candidate")
        .create_option(|option| candidate_option(option, registry, "Whose comments to show"))
}

pub fn create_compare_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name(COMPARE_COMMAND)
        .description("Compare candidate stats side by side")
}

fn candidate_option<'a>(
    option: &'a mut CreateApplicationCommandOption,
    registry: &CandidateRegistry,
    description: &str,
) -> &'a mut CreateApplicationCommandOption {
    option
        .name("candidate")
        .description(description)
        .kind(CommandOptionType::String)
        .required(true);
    for candidate in registry.candidates().iter().take(MAX_CHOICES) {
        option.add_string_choice(&candidate.name, &candidate.name);
    }
    option
}
