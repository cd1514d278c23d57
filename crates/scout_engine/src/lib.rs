//! Scout engine: browser automation, driver resolution, and CSV export.
mod browser;
mod driver;
mod export;
mod scrape;
mod types;

pub use driver::{ManagedDriverResolver, DEFAULT_INSTALL_DIR};
pub use export::{
    query_slug, render_csv, write_outputs, AtomicFileWriter, ExportError, ExportPaths,
};
pub use scrape::{
    build_search_url, parse_detail_lines, parse_rating_label, salvage_outputs, search_hosts,
    DetailFields, MapsScrapeJob,
};
pub use types::{PlaceRecord, ScrapeError};
