use crate::error::{Result, ScanError};
use crate::record::PageRecord;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Anchors inside these regions are treated as site navigation. Heuristic,
/// not guaranteed complete.
const NAV_SELECTOR: &str = "nav a[href], #sidebar a[href], .main-menu a[href], .navbar a[href]";

/// Paths under these prefixes are never offered as categories.
const EXCLUDED_PREFIXES: [&str; 3] = ["/login", "/logout", "/signout"];

#[derive(Debug)]
pub struct SiteScanner {
    client: Client,
    base: Url,
    max_pages: usize,
}

impl SiteScanner {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, 10)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.host_str().is_none() {
            return Err(ScanError::InvalidUrl(format!("{}: missing host", base_url)));
        }

        let client = Client::builder()
            .user_agent("Websift/0.2 (https://github.com/trapdoorsec/websift)")
            .cookie_store(true)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            base,
            max_pages: 100,
        })
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Establish a scanner and issue the warm-up request to the base URL.
    ///
    /// The warm-up primes the cookie store and proves the host is reachable.
    /// A non-2xx response is tolerated here; only a transport-level failure
    /// fails the connect.
    pub async fn connect(
        base_url: &str,
        fetch_timeout_secs: u64,
        probe_timeout_secs: u64,
    ) -> Result<Self> {
        let scanner = Self::with_timeout(base_url, fetch_timeout_secs)?;
        scanner.probe(probe_timeout_secs).await?;
        Ok(scanner)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn probe(&self, timeout_secs: u64) -> Result<()> {
        debug!("Probing {}", self.base);
        self.client
            .get(self.base.clone())
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await
            .map_err(|e| ScanError::Connection(format!("{}: {}", self.base, e)))?;
        Ok(())
    }

    /// Discover the site's top-level sections from its navigation regions.
    ///
    /// Returns normalized path prefixes (leading slash, no trailing slash),
    /// deduplicated and lexicographically sorted. An empty list means no
    /// categories were found, which is a valid outcome rather than an error.
    pub async fn analyze(&self) -> Result<Vec<String>> {
        info!("Analyzing site structure of {}", self.base);

        let response = self
            .client
            .get(self.base.clone())
            .send()
            .await
            .map_err(|e| ScanError::Connection(format!("{}: {}", self.base, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Connection(format!(
                "{} answered {}",
                self.base, status
            )));
        }

        let body = response.text().await?;
        let categories = self.extract_categories(&body)?;
        info!("Found {} categories", categories.len());
        Ok(categories)
    }

    fn extract_categories(&self, html: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(NAV_SELECTOR)
            .map_err(|e| ScanError::Parse(format!("navigation selector: {}", e)))?;

        let base_path = self.base.path().trim_end_matches('/');
        let mut paths = BTreeSet::new();

        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(resolved) = resolve_url(&self.base, href) else {
                continue;
            };
            let Ok(parsed) = Url::parse(&resolved) else {
                continue;
            };
            if parsed.host_str() != self.base.host_str() {
                continue;
            }
            let Some(path) = category_path(&parsed) else {
                continue;
            };
            if path != base_path {
                paths.insert(path.to_string());
            }
        }

        Ok(paths.into_iter().collect())
    }

    /// Breadth-first crawl of the pages under one category path.
    ///
    /// The queue is strictly FIFO with a single request in flight, capped at
    /// `max_pages` collected records. Pages that fail to fetch or answer
    /// non-200 are skipped without contributing a record or links; the crawl
    /// itself never fails.
    pub async fn crawl_section(
        &self,
        category: &str,
        progress: Option<ProgressCallback>,
    ) -> Vec<PageRecord> {
        let start = match self.base.join(category) {
            Ok(url) => url,
            Err(e) => {
                debug!("Cannot resolve category {} against {}: {}", category, self.base, e);
                return Vec::new();
            }
        };

        info!("Crawling section {} of {}", category, self.base);

        let mut queue: VecDeque<String> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(start.to_string());
        queue.push_back(start.to_string());

        let mut records: Vec<PageRecord> = Vec::new();

        while records.len() < self.max_pages {
            let Some(current) = queue.pop_front() else {
                break;
            };

            if let Some(ref callback) = progress {
                callback(records.len(), current.clone());
            }

            let response = match self.client.get(&current).send().await {
                Ok(response) => response,
                Err(e) => {
                    debug!("Skipping {}: {}", current, e);
                    continue;
                }
            };

            let status = response.status();
            if status != reqwest::StatusCode::OK {
                debug!("Skipping {}: status {}", current, status);
                continue;
            }

            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Skipping {}: {}", current, e);
                    continue;
                }
            };

            let Ok(page_url) = Url::parse(&current) else {
                continue;
            };

            let page = extract_page(&body, &page_url);
            records.push(PageRecord::new(
                current,
                page.title,
                page.main_heading,
                status.as_u16(),
            ));

            for link in page.links {
                if visited.contains(&link) {
                    continue;
                }
                let Ok(parsed) = Url::parse(&link) else {
                    continue;
                };
                if parsed.host_str() != self.base.host_str() {
                    continue;
                }
                // Literal prefix test, not a segment match: "/cat" also
                // admits "/category2".
                if !parsed.path().starts_with(category) {
                    continue;
                }
                visited.insert(link.clone());
                queue.push_back(link);
            }
        }

        info!(
            "Section crawl complete: {} pages under {}",
            records.len(),
            category
        );
        records
    }
}

struct ExtractedPage {
    title: String,
    main_heading: String,
    links: Vec<String>,
}

/// Pull the title, first H1 and outgoing links from one page. Links are
/// resolved against the page's own URL, not the crawl base.
fn extract_page(html: &str, page_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title").unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| "No Title".to_string());

    let h1_selector = Selector::parse("h1").unwrap();
    let main_heading = document
        .select(&h1_selector)
        .next()
        .map(|element| truncate_chars(element.text().collect::<String>().trim(), 50))
        .unwrap_or_else(|| "N/A".to_string());

    let link_selector = Selector::parse("a[href]").unwrap();
    let links = document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(page_url, href))
        .collect();

    ExtractedPage {
        title,
        main_heading,
        links,
    }
}

/// Resolve an href against a base, skipping pseudo-links and dropping
/// fragments so the visited set treats `/page` and `/page#top` as one URL.
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);
    Some(resolved.to_string())
}

/// Normalize a same-host link into a category path, or reject it.
///
/// Rejected: login/logout/signout paths (case-insensitive), paths whose
/// final segment contains a dot (a file target, not a section page), and
/// the empty path. Accepted paths lose their trailing slash.
fn category_path(url: &Url) -> Option<&str> {
    let path = url.path();
    let lowered = path.to_ascii_lowercase();
    if EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return None;
    }
    if path.rsplit('/').next().is_some_and(|segment| segment.contains('.')) {
        return None;
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
