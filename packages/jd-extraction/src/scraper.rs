//! Job board scraper - collects (id, text) pairs from the LinkedIn guest
//! API.
//!
//! Sequential fetching with a fixed inter-request delay; no scheduling or
//! backoff policy. HTML fields are pulled with regexes and rendered to
//! plain text. An optional raw-text cache (flat JSON array of [id, text]
//! pairs) lets a run reuse previously fetched postings or skip live
//! fetching entirely.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{ScrapeError, ScrapeResult};
use crate::types::RawJob;

const SEARCH_URL: &str =
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";
const POSTING_URL: &str = "https://www.linkedin.com/jobs-guest/jobs/api/jobPosting";

/// Scrape parameters.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Job title to search for
    pub title: String,

    /// Location to search in
    pub location: String,

    /// Pagination bound for the search listing
    pub max_pages: usize,

    /// Delay between requests
    pub delay: Duration,

    /// Jobs per pipeline batch
    pub batch_size: usize,

    /// Raw-text cache file, if any
    pub raw_cache_path: Option<PathBuf>,

    /// Serve everything from the raw-text cache, skipping live fetches
    pub load_from_cache: bool,
}

impl ScrapeConfig {
    /// Create a config for a title/location search with defaults.
    pub fn new(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            max_pages: 1,
            delay: Duration::from_secs(1),
            batch_size: 5,
            raw_cache_path: None,
            load_from_cache: false,
        }
    }

    /// Set the pagination bound.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the inter-request delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the raw-text cache file.
    pub fn with_raw_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw_cache_path = Some(path.into());
        self
    }

    /// Serve from the raw-text cache only.
    pub fn load_from_cache(mut self, load: bool) -> Self {
        self.load_from_cache = load;
        self
    }
}

/// Scrapes job postings and yields them in pipeline-sized batches.
pub struct JobBoardScraper {
    client: reqwest::Client,
    config: ScrapeConfig,
    job_pairs: Vec<RawJob>,
}

impl JobBoardScraper {
    /// Create a scraper with the given config.
    pub fn new(config: ScrapeConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            config,
            job_pairs: Vec::new(),
        }
    }

    /// Number of postings collected.
    pub fn len(&self) -> usize {
        self.job_pairs.len()
    }

    /// Whether anything was collected.
    pub fn is_empty(&self) -> bool {
        self.job_pairs.is_empty()
    }

    /// The collected postings chunked into batches of at most
    /// `batch_size`, in collection order.
    pub fn batches(&self) -> Vec<Vec<RawJob>> {
        self.job_pairs
            .chunks(self.config.batch_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    /// Collect job postings, live or from the raw-text cache.
    pub async fn collect(&mut self) -> ScrapeResult<()> {
        if self.config.load_from_cache {
            if let Some(path) = self.config.raw_cache_path.clone() {
                if path.exists() {
                    match load_raw_cache(&path) {
                        Ok(pairs) => {
                            info!(path = %path.display(), jobs = pairs.len(),
                                "loaded job texts from raw cache, skipping live fetch");
                            self.job_pairs = pairs;
                            return Ok(());
                        }
                        Err(e) => {
                            warn!(error = %e, "failed to parse raw cache; scraping live");
                        }
                    }
                }
            }
        }

        // Existing cache entries are reused individually during a live run.
        let mut cached: HashMap<String, String> = HashMap::new();
        if let Some(path) = &self.config.raw_cache_path {
            if path.exists() {
                match load_raw_cache(path) {
                    Ok(pairs) => {
                        info!(path = %path.display(), "reusing raw cache entries");
                        cached = pairs.into_iter().map(|job| (job.id, job.text)).collect();
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to parse raw cache; proceeding without reuse");
                    }
                }
            }
        }

        info!("starting live scrape: retrieving job ids");
        let job_ids = self.fetch_job_ids().await?;
        info!(jobs = job_ids.len(), "retrieved job ids, fetching descriptions");

        self.job_pairs.clear();
        for job_id in job_ids {
            if let Some(text) = cached.get(&job_id) {
                info!(job_id = %job_id, "reusing cached posting text");
                self.job_pairs.push(RawJob::new(job_id, text.clone()));
                continue;
            }

            match self.fetch_job_description(&job_id).await {
                Ok(Some(text)) => self.job_pairs.push(RawJob::new(job_id, text)),
                Ok(None) => warn!(job_id = %job_id, "posting has no description; skipped"),
                Err(e) => warn!(job_id = %job_id, error = %e, "failed to fetch posting; skipped"),
            }

            tokio::time::sleep(self.config.delay).await;
        }

        if let Some(path) = &self.config.raw_cache_path {
            save_raw_cache(path, &self.job_pairs)?;
        }

        Ok(())
    }

    /// Page through the search listing accumulating job ids.
    async fn fetch_job_ids(&self) -> ScrapeResult<Vec<String>> {
        let mut job_ids = Vec::new();
        let mut start = 0usize;

        for page in 0..self.config.max_pages {
            info!(page, start, "fetching job listing page");
            let start_param = start.to_string();
            let html = self
                .client
                .get(SEARCH_URL)
                .query(&[
                    ("keywords", self.config.title.as_str()),
                    ("location", self.config.location.as_str()),
                    ("start", start_param.as_str()),
                ])
                .send()
                .await
                .map_err(|e| ScrapeError::Http(Box::new(e)))?
                .text()
                .await
                .map_err(|e| ScrapeError::Http(Box::new(e)))?;

            let listings = count_listings(&html);
            if listings == 0 {
                // End of results; the listing endpoint pads no further
                break;
            }

            job_ids.extend(parse_job_ids(&html));
            tokio::time::sleep(self.config.delay).await;
            start += listings;
        }

        info!(jobs = job_ids.len(), "found job ids");
        Ok(job_ids)
    }

    /// Fetch one posting and render it to text.
    ///
    /// Returns None when the posting page carries no description markup.
    async fn fetch_job_description(&self, job_id: &str) -> ScrapeResult<Option<String>> {
        let url = format!("{}/{}", POSTING_URL, job_id);
        let html = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScrapeError::Http(Box::new(e)))?
            .text()
            .await
            .map_err(|e| ScrapeError::Http(Box::new(e)))?;

        Ok(parse_job_posting(&html))
    }
}

fn load_raw_cache(path: &Path) -> ScrapeResult<Vec<RawJob>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn save_raw_cache(path: &Path, pairs: &[RawJob]) -> ScrapeResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let data = serde_json::to_string_pretty(pairs)?;
    std::fs::write(path, data)?;
    info!(path = %path.display(), jobs = pairs.len(), "wrote raw cache");
    Ok(())
}

/// Pull job posting ids out of a search listing page.
pub fn parse_job_ids(html: &str) -> Vec<String> {
    let urn_pattern = regex::Regex::new(r#"data-entity-urn="urn:li:jobPosting:(\d+)""#).unwrap();
    urn_pattern
        .captures_iter(html)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Count result entries on a search listing page.
///
/// Matches only `<li>` elements; a bare substring scan would also count
/// `<link>` and `<line>` tags and skew the pagination offset.
fn count_listings(html: &str) -> usize {
    let li_tag = regex::Regex::new(r"<li[\s>/]").unwrap();
    li_tag.find_iter(html).count()
}

/// Render a posting page to the combined salary + description text.
pub fn parse_job_posting(html: &str) -> Option<String> {
    let salary_pattern =
        regex::Regex::new(r#"(?s)<div[^>]*class="[^"]*salary[^"]*"[^>]*>(.*?)</div>"#).unwrap();
    let salary = salary_pattern
        .captures(html)
        .map(|cap| html_to_text(&cap[1]))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Not specified".to_string());

    let desc_pattern = regex::Regex::new(
        r#"(?s)<div[^>]*class="[^"]*show-more-less-html__markup[^"]*"[^>]*>(.*?)</div>"#,
    )
    .unwrap();
    let desc = html_to_text(&desc_pattern.captures(html)?[1]);
    if desc.is_empty() {
        return None;
    }

    Some(format!("Salary: {}.\n\nDescription:\n{}", salary, desc))
}

/// Convert an HTML fragment to formatted plain text.
///
/// Preserves paragraph breaks, turns list items into `- ` bullets, and
/// collapses runs of blank lines.
pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();

    // Structure-preserving replacements before tag stripping
    let li_pattern = regex::Regex::new(r"(?s)<li[^>]*>(.*?)</li>").unwrap();
    text = li_pattern.replace_all(&text, "\n- $1").to_string();

    let p_pattern = regex::Regex::new(r"(?s)<p[^>]*>(.*?)</p>").unwrap();
    text = p_pattern.replace_all(&text, "\n$1\n").to_string();

    let br_pattern = regex::Regex::new(r"<br\s*/?>").unwrap();
    text = br_pattern.replace_all(&text, "\n").to_string();

    // Remove remaining tags
    let tag_pattern = regex::Regex::new(r"<[^>]+>").unwrap();
    text = tag_pattern.replace_all(&text, "").to_string();

    // Decode common HTML entities
    text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    // Collapse intra-line whitespace and blank-line runs
    let lines: Vec<String> = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    let mut cleaned: Vec<&str> = Vec::new();
    let mut prev_blank = false;
    for line in &lines {
        if line.is_empty() {
            if !prev_blank && !cleaned.is_empty() {
                cleaned.push("");
            }
            prev_blank = true;
        } else {
            cleaned.push(line);
            prev_blank = false;
        }
    }

    cleaned.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_ids() {
        let html = r#"
            <li><div class="base-card" data-entity-urn="urn:li:jobPosting:4001"></div></li>
            <li><div class="base-card" data-entity-urn="urn:li:jobPosting:4002"></div></li>
            <li><div class="base-card"></div></li>
        "#;

        assert_eq!(parse_job_ids(html), vec!["4001", "4002"]);
        assert_eq!(count_listings(html), 3);
    }

    #[test]
    fn test_count_listings_matches_li_elements_only() {
        let html = r#"
            <head><link rel="stylesheet" href="base.css"></head>
            <svg><line x1="0" y1="0" x2="1" y2="1"/></svg>
            <ul><li class="result">one</li><li>two</li></ul>
        "#;

        assert_eq!(count_listings(html), 2);
        assert_eq!(count_listings("<link><line/>"), 0);
    }

    #[test]
    fn test_parse_job_posting_with_salary() {
        let html = r#"
            <div class="salary compensation">€50,000 - €70,000</div>
            <div class="show-more-less-html__markup">
                <p>Build data pipelines.</p>
                <ul><li>Python</li><li>SQL</li></ul>
            </div>
        "#;

        let text = parse_job_posting(html).unwrap();
        assert!(text.starts_with("Salary: €50,000 - €70,000."));
        assert!(text.contains("Description:\nBuild data pipelines."));
        assert!(text.contains("- Python"));
        assert!(text.contains("- SQL"));
    }

    #[test]
    fn test_parse_job_posting_salary_fallback() {
        let html = r#"<div class="show-more-less-html__markup"><p>Role text.</p></div>"#;

        let text = parse_job_posting(html).unwrap();
        assert!(text.starts_with("Salary: Not specified."));
    }

    #[test]
    fn test_parse_job_posting_without_description() {
        let html = r#"<div class="top-card">No markup div here</div>"#;
        assert!(parse_job_posting(html).is_none());
    }

    #[test]
    fn test_html_to_text_structure() {
        let html = "<p>Intro line</p><ul><li>one</li><li>two</li></ul><p>After<br>break</p>";
        let text = html_to_text(html);

        assert_eq!(text, "Intro line\n\n- one\n- two\nAfter\nbreak");
    }

    #[test]
    fn test_html_to_text_decodes_entities() {
        assert_eq!(html_to_text("R&amp;D &nbsp; team"), "R&D team");
    }

    #[test]
    fn test_batches_chunking() {
        let mut scraper =
            JobBoardScraper::new(ScrapeConfig::new("Engineer", "Paris").with_batch_size(2));
        scraper.job_pairs = (0..5)
            .map(|i| RawJob::new(i.to_string(), "text"))
            .collect();

        let batches = scraper.batches();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[2].len(), 1);
        assert_eq!(batches[2][0].id, "4");
    }

    #[tokio::test]
    async fn test_collect_from_raw_cache_skips_live_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        let pairs = vec![RawJob::new("1", "first"), RawJob::new("2", "second")];
        std::fs::write(&path, serde_json::to_string(&pairs).unwrap()).unwrap();

        let config = ScrapeConfig::new("Engineer", "Paris")
            .with_raw_cache(&path)
            .load_from_cache(true);
        let mut scraper = JobBoardScraper::new(config);
        scraper.collect().await.unwrap();

        assert_eq!(scraper.len(), 2);
        assert_eq!(scraper.batches()[0][0].text, "first");
    }
}
