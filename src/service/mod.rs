pub mod dom_path;
pub mod error_messages;
pub mod event_pipeline;
pub mod page_extractor;
pub mod scheduled_event;
pub mod time_parser;
