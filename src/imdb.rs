//! IMDb scraping: the top chart list and per-title plot text.
//!
//! The chart page embeds its data as a Next.js `__NEXT_DATA__` JSON blob, so the
//! list comes from JSON rather than markup. Title pages are read from the HTML.

use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, info};

use crate::ai::Generator;
use crate::error::{AppError, Result};

pub const TITLE_BASE_URL: &str = "https://www.imdb.com/title/";
pub const TOP_N: usize = 10;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Returned when a title page carries no plot text at all.
pub const NO_DESCRIPTION: &str = "N/A";

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";

// Short synopsis first, extended one as fallback.
const PLOT_TEST_IDS: [&str; 2] = ["plot-l", "plot-xl"];

static NEXT_DATA_SELECTOR: Lazy<Option<Selector>> =
    Lazy::new(|| Selector::parse(r#"script#__NEXT_DATA__[type="application/json"]"#).ok());

static PLOT_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    PLOT_TEST_IDS
        .iter()
        .filter_map(|id| Selector::parse(&format!(r#"span[data-testid="{id}"]"#)).ok())
        .collect()
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilmSummary {
    /// 1-based chart position.
    pub rank: usize,
    pub title: String,
    pub detail_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilmDetail {
    pub title: String,
    pub detail_url: String,
    pub description: String,
    pub storyline: String,
}

/// Where the chart and plot text come from. The app only talks to this seam.
pub trait FilmSource: Send + Sync {
    fn fetch_top_films(&self) -> Result<Vec<FilmSummary>>;
    fn fetch_film_description(&self, url: &str) -> Result<String>;
}

pub struct ImdbScraper {
    client: Client,
    chart_url: String,
}

impl ImdbScraper {
    pub fn new(chart_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            chart_url: chart_url.into(),
        })
    }

    fn get_text(&self, url: &str) -> Result<String> {
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        debug!("GET {url}: {} bytes", body.len());
        Ok(body)
    }
}

impl FilmSource for ImdbScraper {
    fn fetch_top_films(&self) -> Result<Vec<FilmSummary>> {
        let html = self.get_text(&self.chart_url)?;
        let films = parse_top_films(&html)?;
        info!("Chart loaded: {} films", films.len());
        Ok(films)
    }

    fn fetch_film_description(&self, url: &str) -> Result<String> {
        let html = self.get_text(url)?;
        Ok(parse_film_description(&html))
    }
}

/// Storyline text is not scraped; it comes from the generator's lookup.
pub fn fetch_storyline(generator: &dyn Generator, title: &str) -> Result<String> {
    generator.storyline(title).map_err(|e| match e {
        AppError::Generation(_) => e,
        other => AppError::Generation(other.to_string()),
    })
}

pub fn title_url(id: &str) -> String {
    format!("{TITLE_BASE_URL}{id}/")
}

fn is_title_id(id: &str) -> bool {
    id.strip_prefix("tt")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

// ---- chart payload ----

#[derive(Deserialize)]
struct NextData {
    props: Props,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Props {
    page_props: PageProps,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageProps {
    page_data: PageData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageData {
    chart_titles: ChartTitles,
}

// Edges stay untyped so only the ones we keep have to be well formed.
#[derive(Deserialize)]
struct ChartTitles {
    edges: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct Edge {
    node: Node,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    id: String,
    title_text: TitleText,
}

#[derive(Deserialize)]
struct TitleText {
    text: String,
}

/// Extract the first ten chart entries, in chart order. All-or-nothing: any
/// structural problem is a `Parse` error and no films are returned.
pub fn parse_top_films(html: &str) -> Result<Vec<FilmSummary>> {
    let doc = Html::parse_document(html);
    let selector = NEXT_DATA_SELECTOR
        .as_ref()
        .ok_or_else(|| AppError::Parse("invalid chart selector".into()))?;
    let script = doc
        .select(selector)
        .next()
        .ok_or_else(|| AppError::Parse("no __NEXT_DATA__ script on chart page".into()))?;
    let json: String = script.text().collect();

    let data: NextData = serde_json::from_str(&json)?;
    data.props
        .page_props
        .page_data
        .chart_titles
        .edges
        .into_iter()
        .take(TOP_N)
        .enumerate()
        .map(|(i, raw)| {
            let edge: Edge = serde_json::from_value(raw)
                .map_err(|e| AppError::Parse(format!("chart entry {}: {e}", i + 1)))?;
            if !is_title_id(&edge.node.id) {
                return Err(AppError::Parse(format!(
                    "chart entry {}: unexpected title id `{}`",
                    i + 1,
                    edge.node.id
                )));
            }
            Ok(FilmSummary {
                rank: i + 1,
                title: edge.node.title_text.text,
                detail_url: title_url(&edge.node.id),
            })
        })
        .collect()
}

/// Plot text from a title page, or [`NO_DESCRIPTION`] when neither plot span exists.
pub fn parse_film_description(html: &str) -> String {
    let doc = Html::parse_document(html);
    PLOT_SELECTORS
        .iter()
        .find_map(|sel| doc.select(sel).next())
        .map(|el| el.text().map(str::trim).collect::<String>())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}
