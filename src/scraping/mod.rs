pub mod error;
pub mod output;
pub mod pacing;
pub mod page_source;
pub mod scraper;
pub mod url_builder;
