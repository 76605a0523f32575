//! Live Mercari Japan listing source over HTTP.
//!
//! Fetches search-result and item pages with `reqwest` and extracts
//! listings with `scraper` selectors. The site's markup changes without
//! notice, so every selector has a fallback and extraction failures on a
//! single card skip that card rather than failing the batch.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SourceError, SourceResult};
use crate::source::ListingSource;
use crate::types::{Listing, ListingDetail, SearchQuery};

const BASE_URL: &str = "https://jp.mercari.com";

/// Desktop user agent; the mobile site has entirely different markup.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the live source.
#[derive(Debug, Clone)]
pub struct MercariSourceConfig {
    /// Per-request timeout. The fetch is the pipeline's only suspension
    /// point; it must fail rather than hang the conversation.
    pub timeout: Duration,
}

impl Default for MercariSourceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
        }
    }
}

/// HTTP-backed listing source for Mercari Japan.
pub struct MercariSource {
    http_client: reqwest::Client,
}

impl MercariSource {
    /// Create a source with the given configuration.
    pub fn new(config: MercariSourceConfig) -> SourceResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(Self { http_client })
    }

    /// Build the search URL for a query.
    fn search_url(query: &SearchQuery) -> SourceResult<Url> {
        let mut url = Url::parse(&format!("{BASE_URL}/search"))
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        {
            let mut params = url.query_pairs_mut();
            params.append_pair("keyword", &query.keyword);
            params.append_pair("sort", query.sort.as_query_param());
            if let Some(min) = query.min_price {
                params.append_pair("price_min", &min.to_string());
            }
            if let Some(max) = query.max_price {
                params.append_pair("price_max", &max.to_string());
            }
        }
        Ok(url)
    }

    async fn fetch_page(&self, url: &str) -> SourceResult<String> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout {
                    url: url.to_string(),
                }
            } else {
                SourceError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!(
                "{url} returned HTTP {status}"
            )));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout {
                    url: url.to_string(),
                }
            } else {
                SourceError::Unavailable(e.to_string())
            }
        })
    }
}

#[async_trait]
impl ListingSource for MercariSource {
    async fn search(&self, query: &SearchQuery) -> SourceResult<Vec<Listing>> {
        let url = Self::search_url(query)?;
        info!(url = %url, keyword = %query.keyword, "Fetching search results");

        let html = self.fetch_page(url.as_str()).await?;
        let listings = extract_listings(&html, query.max_results)?;

        info!(
            keyword = %query.keyword,
            found = listings.len(),
            "Search complete"
        );
        Ok(listings)
    }

    async fn detail(&self, url: &str) -> SourceResult<ListingDetail> {
        info!(url = %url, "Fetching listing detail");
        let html = self.fetch_page(url).await?;
        extract_detail(&html, url)
    }
}

fn selector(css: &str) -> SourceResult<Selector> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("bad selector '{css}': {e}")))
}

/// Extract listings from a search-results page.
///
/// Returns an empty vec (not an error) when no item cards are found. A
/// zero-result search renders no grid at all, so an absent grid is
/// indistinguishable from an empty one and is treated the same way.
pub fn extract_listings(html: &str, max_results: usize) -> SourceResult<Vec<Listing>> {
    let document = Html::parse_document(html);

    // Current markup first, older custom-element markup as fallback.
    let cell_selectors = [
        selector(r#"li[data-testid="item-cell"]"#)?,
        selector("mer-item-thumbnail")?,
    ];

    let cells: Vec<ElementRef> = cell_selectors
        .iter()
        .map(|sel| document.select(sel).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    let mut listings = Vec::new();
    for cell in cells.into_iter().take(max_results) {
        match extract_listing(&cell) {
            Ok(Some(listing)) => listings.push(listing),
            Ok(None) => debug!("Skipping card without an item link"),
            Err(e) => warn!(error = %e, "Skipping malformed item card"),
        }
    }

    Ok(listings)
}

/// Extract one listing from an item card. `Ok(None)` means the card has no
/// usable item link and should be skipped.
fn extract_listing(cell: &ElementRef) -> SourceResult<Option<Listing>> {
    let link_selector = selector(r#"a[href*="/item/"]"#)?;

    let Some(href) = cell
        .select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
    else {
        return Ok(None);
    };

    let url = if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{BASE_URL}{href}")
    };
    let id = href
        .split("/item/")
        .nth(1)
        .map(|rest| rest.split('?').next().unwrap_or(rest).to_string());

    let title_selector = selector(r#"span[data-testid="thumbnail-title"]"#)?;
    let img_selector = selector("img")?;
    let title = cell
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            // Grid titles are often truncated away; the thumbnail alt text
            // usually carries the full name.
            cell.select(&img_selector)
                .next()
                .and_then(|img| img.value().attr("alt"))
                .map(|alt| alt.trim().to_string())
        })
        .unwrap_or_default();

    let price_selector = selector(r#"span[data-testid="thumbnail-price"]"#)?;
    let mer_price_selector = selector("mer-price")?;
    let price_text = cell
        .select(&price_selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .or_else(|| {
            cell.select(&mer_price_selector).next().map(|el| {
                let text = el.text().collect::<String>();
                if text.trim().is_empty() {
                    el.value().attr("value").unwrap_or_default().to_string()
                } else {
                    text
                }
            })
        });
    let price = price_text.as_deref().and_then(parse_price);

    let sold_selector = selector(r#"div[aria-label="売り切れ"]"#)?;
    let sold_out = cell.select(&sold_selector).next().is_some()
        || cell.text().any(|t| t.trim() == "SOLD");

    Ok(Some(Listing {
        id,
        title,
        price,
        url,
        // The results grid hides condition; it is fetched per item on
        // demand via `detail`.
        condition: None,
        sold_out,
    }))
}

/// Extract full attributes from an item page.
pub fn extract_detail(html: &str, url: &str) -> SourceResult<ListingDetail> {
    let document = Html::parse_document(html);

    let title = first_text(&document, &[r#"h1[data-testid="name"]"#, "h1"])?
        .ok_or_else(|| SourceError::Parse(format!("no title found on {url}")))?;

    let price = first_text(&document, &[r#"div[data-testid="price"]"#, "mer-price"])?
        .as_deref()
        .and_then(parse_price);

    let condition = first_text(
        &document,
        &[
            r#"span[data-testid="商品の状態"]"#,
            r#"span[data-testid="item-detail-condition"]"#,
        ],
    )?;

    let description = first_text(&document, &[r#"pre[data-testid="description"]"#])?;
    let seller = first_text(&document, &[r#"a[data-testid="seller-link"]"#])?;
    let shipping = first_text(&document, &[r#"span[data-testid="配送の方法"]"#])?;

    Ok(ListingDetail {
        url: url.to_string(),
        title,
        price,
        condition,
        description,
        seller,
        shipping,
    })
}

/// First non-empty text match across a selector fallback chain.
fn first_text(document: &Html, selectors: &[&str]) -> SourceResult<Option<String>> {
    for css in selectors {
        let sel = selector(css)?;
        if let Some(text) = document
            .select(&sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
        {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Pull the digits out of a price string like "¥24,800".
fn parse_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortOrder;

    const SEARCH_FIXTURE: &str = r#"
        <html><body><ul>
          <li data-testid="item-cell">
            <a href="/item/m111?ref=search">
              <img src="x.jpg" alt="Sony WH-1000XM4 Headphones" />
              <span data-testid="thumbnail-title">Sony WH-1000XM4</span>
              <span data-testid="thumbnail-price">¥24,800</span>
            </a>
          </li>
          <li data-testid="item-cell">
            <a href="https://jp.mercari.com/item/m222">
              <img src="y.jpg" alt="Bose QC35" />
              <span data-testid="thumbnail-price">¥12,000</span>
              <div aria-label="売り切れ"></div>
            </a>
          </li>
          <li data-testid="item-cell">
            <div>no link here</div>
          </li>
        </ul></body></html>
    "#;

    #[test]
    fn extracts_listings_from_search_page() {
        let listings = extract_listings(SEARCH_FIXTURE, 20).unwrap();
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.id.as_deref(), Some("m111"));
        assert_eq!(first.url, "https://jp.mercari.com/item/m111?ref=search");
        assert_eq!(first.title, "Sony WH-1000XM4");
        assert_eq!(first.price, Some(24800));
        assert!(!first.sold_out);
        assert!(first.condition.is_none());

        let second = &listings[1];
        assert_eq!(second.id.as_deref(), Some("m222"));
        assert_eq!(second.title, "Bose QC35"); // from the img alt fallback
        assert!(second.sold_out);
    }

    #[test]
    fn max_results_limits_extraction() {
        let listings = extract_listings(SEARCH_FIXTURE, 1).unwrap();
        assert_eq!(listings.len(), 1);
    }

    #[test]
    fn page_without_cells_yields_empty_not_error() {
        let listings = extract_listings("<html><body></body></html>", 20).unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn extracts_detail_page() {
        let html = r#"
            <html><body>
              <h1 data-testid="name">Sony WH-1000XM4</h1>
              <div data-testid="price">¥24,800</div>
              <span data-testid="商品の状態">目立った傷や汚れなし</span>
              <pre data-testid="description">Barely used, includes case.</pre>
              <a data-testid="seller-link">audio_seller_jp</a>
            </body></html>
        "#;
        let detail = extract_detail(html, "https://jp.mercari.com/item/m111").unwrap();
        assert_eq!(detail.title, "Sony WH-1000XM4");
        assert_eq!(detail.price, Some(24800));
        assert_eq!(detail.condition.as_deref(), Some("目立った傷や汚れなし"));
        assert_eq!(
            detail.description.as_deref(),
            Some("Barely used, includes case.")
        );
        assert_eq!(detail.seller.as_deref(), Some("audio_seller_jp"));
        assert!(detail.shipping.is_none());
    }

    #[test]
    fn detail_without_title_is_parse_failure() {
        let err = extract_detail("<html><body></body></html>", "u").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn search_url_carries_filters() {
        let query = SearchQuery::new(
            "ヘッドホン",
            Some(5000),
            Some(30000),
            Some(10),
            Some(SortOrder::PriceAsc),
        )
        .unwrap();
        let url = MercariSource::search_url(&query).unwrap();
        let query_string = url.query().unwrap();
        assert!(url.as_str().starts_with("https://jp.mercari.com/search?"));
        assert!(query_string.contains("price_min=5000"));
        assert!(query_string.contains("price_max=30000"));
        assert!(query_string.contains("sort=price_asc"));
    }

    #[test]
    fn price_parsing_strips_currency_formatting() {
        assert_eq!(parse_price("¥24,800"), Some(24800));
        assert_eq!(parse_price("12000"), Some(12000));
        assert_eq!(parse_price("N/A"), None);
    }
}
