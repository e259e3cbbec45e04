use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, instrument};

/// Column order of the uploaded table
pub const EXPORT_HEADER: [&str; 5] = [
    "Date",
    "HighTemp",
    "LowTemp",
    "PrecipChance_%",
    "PrecipAmount_mm",
];

const PRECIP_CHANCE_LABEL: &str = "Probability of Precipitation";
const PRECIP_AMOUNT_LABEL: &str = "Precipitation";

static DATE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".subnav-pagination > div").expect("static selector"));
static CARD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.half-day-card").expect("static selector"));
static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("static selector"));
static TEMPERATURE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".temperature").expect("static selector"));
static PANEL_ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".panel-item").expect("static selector"));
static VALUE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".value").expect("static selector"));

/// One forecast day as uploaded to Creator.
///
/// Every field is always present; a field the page did not provide is an
/// empty string. An empty `date` marks a page that could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForecastRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "HighTemp")]
    pub high_temp: String,
    #[serde(rename = "LowTemp")]
    pub low_temp: String,
    #[serde(rename = "PrecipChance_%")]
    pub precip_chance_pct: String,
    #[serde(rename = "PrecipAmount_mm")]
    pub precip_amount_mm: String,
}

impl ForecastRecord {
    pub fn has_date(&self) -> bool {
        !self.date.is_empty()
    }
}

/// Extract a single day's forecast from a daily forecast page.
///
/// Missing nodes never fail the extraction, they degrade the dependent
/// fields to empty strings.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn extract(html: &str) -> ForecastRecord {
    let document = Html::parse_document(html);

    let date = document
        .select(&DATE_SELECTOR)
        .next()
        .map(stripped_text)
        .unwrap_or_default();
    debug!("Parsed date: '{}'", date);

    let cards: Vec<ElementRef> = document.select(&CARD_SELECTOR).collect();
    debug!("Found {} half-day cards", cards.len());

    let day_card = find_card(&cards, "Day");
    let night_card = find_card(&cards, "Night");
    debug!(
        "day_card: {}, night_card: {}",
        day_card.is_some(),
        night_card.is_some()
    );

    let record = ForecastRecord {
        date,
        high_temp: day_card.map(temperature).unwrap_or_default(),
        low_temp: night_card.map(temperature).unwrap_or_default(),
        precip_chance_pct: day_card
            .and_then(|card| panel_value(card, PRECIP_CHANCE_LABEL))
            .map(|v| strip_percent(&v))
            .unwrap_or_default(),
        precip_amount_mm: day_card
            .and_then(|card| panel_value(card, PRECIP_AMOUNT_LABEL))
            .map(|v| strip_mm(&v))
            .unwrap_or_default(),
    };
    debug!("Extracted record: {:?}", record);

    record
}

/// Remove the degree glyph from a temperature reading
pub fn strip_degree(text: &str) -> String {
    text.replace('°', "")
}

/// Remove the percent glyph from a probability reading
pub fn strip_percent(text: &str) -> String {
    text.replace('%', "")
}

/// Remove the " mm" unit suffix from a precipitation amount
pub fn strip_mm(text: &str) -> String {
    text.replace(" mm", "")
}

// Heading match is a case-sensitive substring test, first card in document order wins
fn find_card<'a>(cards: &[ElementRef<'a>], needle: &str) -> Option<ElementRef<'a>> {
    cards.iter().copied().find(|card| {
        card.select(&HEADING_SELECTOR)
            .next()
            .map(|heading| heading.text().collect::<String>().contains(needle))
            .unwrap_or(false)
    })
}

fn temperature(card: ElementRef) -> String {
    card.select(&TEMPERATURE_SELECTOR)
        .next()
        .map(|t| strip_degree(&stripped_text(t)))
        .unwrap_or_default()
}

/// Value of the first panel item whose own label text equals `label`.
///
/// `None` when no item carries the label; an item with the label but no
/// value node yields an empty string.
fn panel_value(card: ElementRef, label: &str) -> Option<String> {
    card.select(&PANEL_ITEM_SELECTOR)
        .find(|item| direct_label(*item).is_some_and(|l| l.trim() == label))
        .map(|item| {
            item.select(&VALUE_SELECTOR)
                .next()
                .map(stripped_text)
                .unwrap_or_default()
        })
}

/// First text node that is a direct child of the element
fn direct_label(element: ElementRef) -> Option<String> {
    element
        .children()
        .find_map(|node| node.value().as_text().map(|t| t.to_string()))
}

/// Concatenate all descendant text nodes, each trimmed
fn stripped_text(element: ElementRef) -> String {
    element.text().map(str::trim).collect()
}
