use std::collections::HashSet;
use std::time::{Duration, Instant};

use chromiumoxide::browser::Browser;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use scout_core::{JobConfig, JobError, JobOutcome, ScrapeJob};
use scout_logging::{scout_debug, scout_info, scout_warn};
use url::Url;

use crate::browser;
use crate::export::{write_outputs, ExportPaths};
use crate::types::{PlaceRecord, ScrapeError};

/// The scrollable feed of results on a Maps search page.
const RESULT_FEED_SELECTOR: &str = "div[role='feed']";
/// One place card inside the rendered feed.
const RESULT_CARD_SELECTOR: &str = "div[role='feed'] div[role='article']";
/// Place name inside a card.
const NAME_SELECTOR: &str = ".qBF1Pd";
/// Star-rating badge; its aria-label carries rating and review count.
const RATING_SELECTOR: &str = "span[role='img']";
/// Secondary detail lines (category, address, hours, phone).
const DETAIL_LINE_SELECTOR: &str = ".W4Efsd";
/// Direct link to the listing's own website, when present.
const WEBSITE_SELECTOR: &str = "a[data-value='Website']";

const FEED_POLL_INTERVAL: Duration = Duration::from_millis(200);
const SCROLL_SETTLE: Duration = Duration::from_millis(400);
/// Scroll rounds without new cards before the feed is treated as exhausted.
const MAX_STALL_ROUNDS: u32 = 4;

/// Hosts to try, in order: the default Maps host first, then one per
/// suggested extension.
pub fn search_hosts(suggested_ext: &[String]) -> Vec<String> {
    let mut hosts = vec!["www.google.com".to_string()];
    for ext in suggested_ext {
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() {
            continue;
        }
        let host = format!("www.google.{ext}");
        if !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    hosts
}

/// Maps search URL for a query on the given host, with the query
/// percent-encoded into the path.
pub fn build_search_url(host: &str, query: &str) -> Result<Url, ScrapeError> {
    let mut url = Url::parse(&format!("https://{host}/maps/search/"))
        .map_err(|err| ScrapeError::Navigation(format!("bad host {host:?}: {err}")))?;
    url.path_segments_mut()
        .map_err(|_| ScrapeError::Navigation(format!("bad host {host:?}")))?
        .pop_if_empty()
        .push(query);
    url.set_query(Some("hl=en"));
    Ok(url)
}

/// Rating and review count parsed from a badge label such as
/// `"4.6 stars 1,234 Reviews"`.
pub fn parse_rating_label(label: &str) -> (Option<String>, Option<String>) {
    let tokens: Vec<&str> = label.split_whitespace().collect();
    let rating = tokens
        .first()
        .filter(|t| t.parse::<f32>().is_ok())
        .map(|t| t.to_string());
    let reviews = tokens
        .iter()
        .position(|t| t.eq_ignore_ascii_case("reviews") || t.eq_ignore_ascii_case("review"))
        .and_then(|idx| idx.checked_sub(1))
        .and_then(|idx| tokens.get(idx))
        .filter(|t| t.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .map(|t| t.to_string());
    (rating, reviews)
}

/// Fields recovered from a card's secondary detail lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Best-effort split of Maps detail lines into category, address, and
/// phone. Lines look like `"Cafe · Main St 4"` or
/// `"Open ⋅ Closes 18:00 · +358 40 1234567"`.
pub fn parse_detail_lines(lines: &[String]) -> DetailFields {
    let mut fields = DetailFields::default();
    for line in lines {
        for segment in line.split(['·', '⋅']) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            if phone_like(segment) {
                fields.phone.get_or_insert_with(|| segment.to_string());
            } else if segment.chars().any(|c| c.is_ascii_digit()) {
                // Hours segments mention opening or closing; skip those.
                let lower = segment.to_lowercase();
                if lower.contains("open") || lower.contains("close") {
                    continue;
                }
                fields.address.get_or_insert_with(|| segment.to_string());
            } else {
                fields.category.get_or_insert_with(|| segment.to_string());
            }
        }
    }
    fields
}

fn phone_like(segment: &str) -> bool {
    let digits = segment.chars().filter(char::is_ascii_digit).count();
    digits >= 7
        && segment
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
}

/// The Google Maps scrape job.
///
/// Opaque to the controller: it only honors the run contract, polling the
/// cancellation predicate at least once per processed result and reporting
/// a non-decreasing count.
#[derive(Debug, Default)]
pub struct MapsScrapeJob;

impl MapsScrapeJob {
    pub fn new() -> Self {
        Self
    }
}

impl ScrapeJob for MapsScrapeJob {
    fn run(
        &self,
        config: &JobConfig,
        is_cancelled: &dyn Fn() -> bool,
        on_progress: &dyn Fn(u64),
    ) -> JobOutcome {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                return JobOutcome::Failed {
                    error: JobError::new(format!("failed to start async runtime: {err}")),
                }
            }
        };

        match runtime.block_on(scrape_places(config, is_cancelled, on_progress)) {
            Ok(harvest) => {
                let total = harvest.records.len() as u64;
                if harvest.cancelled {
                    JobOutcome::Cancelled { total }
                } else {
                    JobOutcome::Completed { total }
                }
            }
            Err(err) => JobOutcome::Failed {
                error: JobError::new(err.to_string()),
            },
        }
    }
}

struct Harvest {
    records: Vec<PlaceRecord>,
    cancelled: bool,
    /// Set when collection broke off mid-feed; the records gathered up to
    /// that point are still present.
    error: Option<ScrapeError>,
}

/// Writes whatever a failing run collected before the error. Export
/// trouble is logged so it cannot mask the failure being reported.
pub fn salvage_outputs(config: &JobConfig, records: &[PlaceRecord]) -> Option<ExportPaths> {
    if records.is_empty() {
        return None;
    }
    match write_outputs(config, records) {
        Ok(paths) => {
            scout_info!(
                "kept {} partial records in {}",
                records.len(),
                paths.csv.display()
            );
            Some(paths)
        }
        Err(err) => {
            scout_warn!("could not keep partial records: {err}");
            None
        }
    }
}

async fn scrape_places(
    config: &JobConfig,
    is_cancelled: &dyn Fn() -> bool,
    on_progress: &dyn Fn(u64),
) -> Result<Harvest, ScrapeError> {
    let (mut browser, handler_task) = browser::launch(config).await?;

    let result = drive_feed(&browser, config, is_cancelled, on_progress).await;

    if let Err(err) = browser.close().await {
        scout_warn!("failed to close browser cleanly: {err}");
    }
    let _ = browser.wait().await;
    handler_task.abort();

    let mut harvest = result?;
    if let Some(error) = harvest.error.take() {
        // A failed run keeps what it collected, the same as a cancelled one.
        salvage_outputs(config, &harvest.records);
        return Err(error);
    }

    // A cancelled run still writes the records collected so far.
    let paths = write_outputs(config, &harvest.records)?;
    scout_info!(
        "wrote {} records to {}",
        harvest.records.len(),
        paths.csv.display()
    );
    Ok(harvest)
}

async fn drive_feed(
    browser: &Browser,
    config: &JobConfig,
    is_cancelled: &dyn Fn() -> bool,
    on_progress: &dyn Fn(u64),
) -> Result<Harvest, ScrapeError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|err| ScrapeError::Navigation(err.to_string()))?;

    let mut feed_found = false;
    for host in search_hosts(&config.suggested_ext) {
        let url = build_search_url(&host, &config.query)?;
        scout_info!("navigating to {url}");
        if let Err(err) = page.goto(url.as_str()).await {
            scout_warn!("navigation to {host} failed: {err}");
            continue;
        }
        let _ = page.wait_for_navigation().await;

        if wait_for_feed(&page, config.wait_secs).await {
            feed_found = true;
            break;
        }
        scout_warn!("no result feed on {host} within {}s", config.wait_secs);
    }
    if !feed_found {
        return Err(ScrapeError::ResultsTimeout {
            waited: config.wait_secs,
        });
    }

    Ok(collect_records(&page, config, is_cancelled, on_progress).await)
}

/// Maps renders the feed via JavaScript after navigation, so poll the DOM
/// for it instead of trusting `wait_for_navigation`.
async fn wait_for_feed(page: &Page, wait_secs: u64) -> bool {
    let deadline = Instant::now() + Duration::from_secs(wait_secs);
    loop {
        if page.find_element(RESULT_FEED_SELECTOR).await.is_ok() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(FEED_POLL_INTERVAL).await;
    }
}

async fn collect_records(
    page: &Page,
    config: &JobConfig,
    is_cancelled: &dyn Fn() -> bool,
    on_progress: &dyn Fn(u64),
) -> Harvest {
    let limit = config.effective_limit();
    let mut records: Vec<PlaceRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut stall_rounds = 0u32;

    loop {
        if is_cancelled() {
            return Harvest {
                records,
                cancelled: true,
                error: None,
            };
        }

        let cards = page
            .find_elements(RESULT_CARD_SELECTOR)
            .await
            .unwrap_or_default();
        let mut grew = false;
        for card in &cards {
            if is_cancelled() {
                return Harvest {
                    records,
                    cancelled: true,
                    error: None,
                };
            }
            if records.len() as u64 >= limit {
                return Harvest {
                    records,
                    cancelled: false,
                    error: None,
                };
            }

            let record = extract_record(card, &config.unavailable_text).await;
            let key = format!("{}|{}", record.name, record.address);
            if !seen.insert(key) {
                continue;
            }
            records.push(record);
            grew = true;
            on_progress(records.len() as u64);
        }

        if at_end_of_feed(page).await {
            scout_debug!("end-of-feed marker reached at {} records", records.len());
            return Harvest {
                records,
                cancelled: false,
                error: None,
            };
        }
        if grew {
            stall_rounds = 0;
        } else {
            stall_rounds += 1;
            if stall_rounds >= MAX_STALL_ROUNDS {
                scout_debug!("feed stalled after {stall_rounds} empty rounds");
                return Harvest {
                    records,
                    cancelled: false,
                    error: None,
                };
            }
        }

        if let Err(err) = scroll_feed(page).await {
            return Harvest {
                records,
                cancelled: false,
                error: Some(err),
            };
        }
        tokio::time::sleep(SCROLL_SETTLE).await;
    }
}

async fn extract_record(card: &Element, unavailable: &str) -> PlaceRecord {
    let fallback = || unavailable.to_string();

    let name = text_of(card, NAME_SELECTOR).await.unwrap_or_else(fallback);

    let rating_label = attribute_of(card, RATING_SELECTOR, "aria-label").await;
    let (rating, reviews) = rating_label
        .as_deref()
        .map(parse_rating_label)
        .unwrap_or_default();

    let mut detail_lines = Vec::new();
    if let Ok(lines) = card.find_elements(DETAIL_LINE_SELECTOR).await {
        for line in &lines {
            if let Ok(Some(text)) = line.inner_text().await {
                let text = text.trim().to_string();
                if !text.is_empty() {
                    detail_lines.push(text);
                }
            }
        }
    }
    let details = parse_detail_lines(&detail_lines);

    let website = attribute_of(card, WEBSITE_SELECTOR, "href").await;
    let maps_url = attribute_of(card, "a", "href").await;

    PlaceRecord {
        name,
        rating: rating.unwrap_or_else(fallback),
        reviews: reviews.unwrap_or_else(fallback),
        category: details.category.unwrap_or_else(fallback),
        address: details.address.unwrap_or_else(fallback),
        phone: details.phone.unwrap_or_else(fallback),
        website: website.unwrap_or_else(fallback),
        maps_url: maps_url.unwrap_or_else(fallback),
    }
}

async fn text_of(card: &Element, selector: &str) -> Option<String> {
    let element = card.find_element(selector).await.ok()?;
    element
        .inner_text()
        .await
        .ok()
        .flatten()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

async fn attribute_of(card: &Element, selector: &str, attribute: &str) -> Option<String> {
    let element = card.find_element(selector).await.ok()?;
    element
        .attribute(attribute)
        .await
        .ok()
        .flatten()
        .filter(|value| !value.is_empty())
}

async fn at_end_of_feed(page: &Page) -> bool {
    let script =
        "document.body ? document.body.innerText.includes(\"end of the list\") : false";
    match page.evaluate(script).await {
        Ok(result) => result.into_value::<bool>().unwrap_or(false),
        Err(_) => false,
    }
}

async fn scroll_feed(page: &Page) -> Result<(), ScrapeError> {
    let script = format!(
        "const feed = document.querySelector(\"{RESULT_FEED_SELECTOR}\"); \
         if (feed) {{ feed.scrollBy(0, feed.clientHeight * 2); }}"
    );
    page.evaluate(script.as_str())
        .await
        .map_err(|err| ScrapeError::Script(err.to_string()))?;
    Ok(())
}
