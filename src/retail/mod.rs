use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

use crate::{auth::jwt::AuthUser, error::AppError, state::AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retailer {
    Tesco,
    Sainsburys,
}

impl FromStr for Retailer {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tesco" => Ok(Retailer::Tesco),
            "sainsburys" => Ok(Retailer::Sainsburys),
            other => Err(AppError::Validation(format!("Invalid retailer: {other}"))),
        }
    }
}

/// Pure mapping from (retailer, query) to a URL-encoded search URL carrying
/// the affiliate tracking tag.
pub fn build_search_url(retailer: Retailer, query: &str, tag: &str) -> String {
    let encoded = urlencoding::encode(query);
    match retailer {
        Retailer::Tesco => format!(
            "https://www.tesco.com/groceries/en-GB/search?query={encoded}&aff={tag}"
        ),
        Retailer::Sainsburys => format!(
            "https://www.sainsburys.co.uk/gol-ui/SearchResults/{encoded}?aff={tag}"
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct AffiliateLinkRequest {
    pub retailer: String,
    pub search_query: String,
}

#[derive(Debug, Serialize)]
pub struct AffiliateLinkResponse {
    pub url: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/affiliate-link", post(affiliate_link))
}

#[instrument(skip(state))]
pub async fn affiliate_link(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<AffiliateLinkRequest>,
) -> Result<Json<AffiliateLinkResponse>, AppError> {
    let query = payload.search_query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("search_query is required".into()));
    }
    let retailer: Retailer = payload.retailer.parse()?;
    let url = build_search_url(retailer, query, &state.config.affiliate_tag);
    Ok(Json(AffiliateLinkResponse { url }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tesco_url_encodes_the_query() {
        let url = build_search_url(Retailer::Tesco, "free range eggs", "pw1");
        assert_eq!(
            url,
            "https://www.tesco.com/groceries/en-GB/search?query=free%20range%20eggs&aff=pw1"
        );
    }

    #[test]
    fn sainsburys_url_carries_the_tag() {
        let url = build_search_url(Retailer::Sainsburys, "milk", "pw1");
        assert_eq!(
            url,
            "https://www.sainsburys.co.uk/gol-ui/SearchResults/milk?aff=pw1"
        );
    }

    #[test]
    fn retailer_parsing_is_case_insensitive() {
        assert_eq!("Tesco".parse::<Retailer>().unwrap(), Retailer::Tesco);
        assert_eq!(
            " sainsburys ".parse::<Retailer>().unwrap(),
            Retailer::Sainsburys
        );
    }

    #[test]
    fn unknown_retailer_is_a_validation_error() {
        let err = "aldi".parse::<Retailer>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn ampersand_in_query_does_not_break_the_url() {
        let url = build_search_url(Retailer::Tesco, "salt & pepper", "pw1");
        assert!(url.contains("salt%20%26%20pepper"));
        assert!(!url.contains("salt & pepper"));
    }
}
