use crate::models::error::{CommandError, ExtractError, FetchError, PipelineError, PlatformError};

const FAILED: &str = "❌ Failed to create event.";

/// The reply shown to the user for a failed `/createevent`.
pub fn user_message(err: &CommandError) -> String {
    match err {
        CommandError::MissingLink => "❌ Please provide a Partiful event link.".to_string(),
        CommandError::Pipeline(err) => pipeline_message(err),
        CommandError::Platform(err) => platform_message(err),
    }
}

fn pipeline_message(err: &PipelineError) -> String {
    match err {
        PipelineError::InvalidLink(_) => "❌ Please provide a valid Partiful event link.".to_string(),
        PipelineError::Fetch(FetchError::BadStatus { status }) => format!(
            "{} Could not access the Partiful link (HTTP {}). Please check the URL.",
            FAILED, status
        ),
        PipelineError::Fetch(FetchError::Network(_)) => format!(
            "{} Could not access the Partiful link. Please check the URL.",
            FAILED
        ),
        PipelineError::Extract(err) => extract_message(err),
        PipelineError::PastEvent { .. } => "❌ Event date must be in the future.".to_string(),
    }
}

fn extract_message(err: &ExtractError) -> String {
    let detail = match err {
        ExtractError::MissingTitle => "Could not find the event title",
        ExtractError::MissingBaseDate => "Could not find the event date",
        ExtractError::MissingTimeText => "Could not find the event time",
        ExtractError::UnparsableTime(_) => "Could not read the event time",
    };
    format!(
        "❌ Failed to scrape event data from the Partiful link. {}. Please check the link and try again.",
        detail
    )
}

fn platform_message(err: &PlatformError) -> String {
    let detail = match err {
        PlatformError::MissingPermissions => "Bot lacks permissions to create events.",
        PlatformError::InvalidPayload(_) => "Invalid event data provided.",
        PlatformError::Other(_) => "Please try again later.",
    };
    format!("{} {}", FAILED, detail)
}
