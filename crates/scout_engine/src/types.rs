use thiserror::Error;

use crate::export::ExportError;

/// One scraped place listing. Fields the listing did not expose carry the
/// configured unavailable-text placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRecord {
    pub name: String,
    pub rating: String,
    pub reviews: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub maps_url: String,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("no result feed rendered within {waited}s")]
    ResultsTimeout { waited: u64 },
    #[error("page script failed: {0}")]
    Script(String),
    #[error(transparent)]
    Export(#[from] ExportError),
}
