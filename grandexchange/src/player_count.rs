use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::errors::{CollectorError, Result};

const HOMEPAGE_TIMEOUT: Duration = Duration::from_secs(10);
const PLAYER_COUNT_CLASS: &str = "player-count";

static GROUPED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}(?:,\d{3})*)").expect("number pattern is valid"));

/// Extract the player count from the homepage's first `p.player-count` element
pub fn parse_player_count(html: &str) -> Result<u64> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| CollectorError::Html(format!("{:?}", e)))?;
    let parser = dom.parser();

    let element = dom
        .nodes()
        .iter()
        .filter_map(|node| node.as_tag())
        .find(|tag| {
            tag.name().as_utf8_str().eq_ignore_ascii_case("p")
                && tag.attributes().class().map_or(false, |class| {
                    class
                        .as_utf8_str()
                        .split_ascii_whitespace()
                        .any(|c| c == PLAYER_COUNT_CLASS)
                })
        })
        .ok_or(CollectorError::PlayerCountNotFound)?;
    let text = element.inner_text(parser);

    GROUPED_NUMBER
        .captures(&text)
        .and_then(|caps| caps[1].replace(',', "").parse::<u64>().ok())
        .ok_or_else(|| CollectorError::PlayerCountUnparsable(text.trim().to_string()))
}

/// Current player count, or `None` when the homepage can't be read or parsed
pub async fn fetch_player_count(client: &Client, homepage_url: &str) -> Option<u64> {
    let result: Result<u64> = async {
        let html = client
            .get(homepage_url)
            .timeout(HOMEPAGE_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_player_count(&html)
    }
    .await;

    match result {
        Ok(count) => {
            tracing::info!("Current player count: {}", count);
            Some(count)
        }
        Err(
            e @ (CollectorError::PlayerCountNotFound | CollectorError::PlayerCountUnparsable(_)),
        ) => {
            tracing::warn!("{}", e);
            None
        }
        Err(e) => {
            tracing::error!("Error fetching player count: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grouped_count() {
        let html = r#"<div class="header"><p class='player-count'>There are currently 112,347 people playing!</p></div>"#;
        assert_eq!(parse_player_count(html).unwrap(), 112_347);
    }

    #[test]
    fn test_parse_count_with_nested_markup_and_extra_classes() {
        let html = "<p id=\"pc\" class=\"hero player-count\">\n  There are currently <span>1,203,456</span> people playing!\n</p>";
        assert_eq!(parse_player_count(html).unwrap(), 1_203_456);
    }

    #[test]
    fn test_parse_small_count() {
        let html = r#"<p class="player-count">There are currently 87 people playing!</p>"#;
        assert_eq!(parse_player_count(html).unwrap(), 87);
    }

    #[test]
    fn test_missing_element() {
        let html = r#"<p class="player-counter">123 people</p><p>99,000</p>"#;
        assert!(matches!(
            parse_player_count(html),
            Err(CollectorError::PlayerCountNotFound)
        ));
    }

    #[test]
    fn test_element_without_number() {
        let html = r#"<p class="player-count">The game is currently offline.</p>"#;
        match parse_player_count(html) {
            Err(CollectorError::PlayerCountUnparsable(text)) => {
                assert_eq!(text, "The game is currently offline.")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_class_must_match_exactly() {
        let html = r#"<p class="player-count-label">Players online</p>
            <p class="player-count">There are currently 112,347 people playing!</p>"#;
        assert_eq!(parse_player_count(html).unwrap(), 112_347);
    }

    #[test]
    fn test_ignores_data_class_attribute() {
        let html = r#"<p data-class="player-count" class="x">1,111 bots</p>
            <p class="player-count">There are currently 87 people playing!</p>"#;
        assert_eq!(parse_player_count(html).unwrap(), 87);
    }
}
