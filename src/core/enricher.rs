use crate::config::toml_config::Settings;
use crate::domain::model::{Enrichment, Listing};
use crate::utils::error::Result;
use reqwest::header::{ORIGIN, REFERER};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Number};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct DetailResponse {
    data: Option<DetailData>,
}

#[derive(Debug, Deserialize)]
struct DetailData {
    property: Option<PropertyDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyDetail {
    last_sold_price: Option<Number>,
    tax_assessed_value: Option<Number>,
    tax_assessed_year: Option<Number>,
    mortgage_rates: Option<MortgageRates>,
    property_tax_rate: Option<Number>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MortgageRates {
    thirty_year_fixed_rate: Option<Number>,
}

impl From<PropertyDetail> for Enrichment {
    fn from(detail: PropertyDetail) -> Self {
        Self {
            last_sold_price: detail.last_sold_price,
            tax_assessed_value: detail.tax_assessed_value,
            tax_assessed_year: detail.tax_assessed_year,
            mortgage_rate: detail.mortgage_rates.and_then(|r| r.thirty_year_fixed_rate),
            property_tax_rate: detail.property_tax_rate,
        }
    }
}

/// Fetches sale history and tax fields for one listing.
///
/// A transport error, a non-200 answer, or a body without `data.property`
/// yields an empty enrichment instead of an error and returns at once. Only
/// a lookup that produced a property sleeps for `enrichment.delay_ms`.
pub async fn fetch_enrichment(
    client: &Client,
    settings: &Settings,
    listing: &Listing,
) -> Result<Enrichment> {
    let config = &settings.enrichment;
    let body = json!({
        "operationName": config.operation_name,
        "variables": {
            "zpid": listing.zpid,
            "contactFormRenderParameter": {
                "zpid": listing.zpid,
                "platform": "desktop",
                "isDoubleScroll": "true"
            }
        },
        "clientVersion": config.client_version,
        "queryId": config.query_id
    });

    let mut request = client
        .post(&settings.endpoints.detail)
        .query(&[
            ("zpid", listing.zpid.as_str()),
            ("queryId", config.query_id.as_str()),
            ("operationName", config.operation_name.as_str()),
        ])
        .header(REFERER, listing.detail_url.as_str())
        .header("sec-fetch-site", "same-origin")
        .json(&body);
    if let Ok(endpoint) = Url::parse(&settings.endpoints.detail) {
        request = request.header(ORIGIN, endpoint.origin().ascii_serialization());
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Detail request for {} failed: {}", listing.zpid, e);
            return Ok(Enrichment::default());
        }
    };
    tracing::info!("POST {}", response.url());

    let status = response.status();
    if status != StatusCode::OK {
        let text = response.text().await.unwrap_or_default();
        tracing::warn!(
            "Failed to obtain additional data for {} ({}): {}",
            listing.zpid,
            status,
            text
        );
        return Ok(Enrichment::default());
    }

    let payload: DetailResponse = match response.json().await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Unreadable detail response for {}: {}", listing.zpid, e);
            return Ok(Enrichment::default());
        }
    };

    let enrichment = match payload.data.and_then(|d| d.property) {
        Some(property) => Enrichment::from(property),
        None => {
            tracing::warn!("Detail response for {} has no property", listing.zpid);
            return Ok(Enrichment::default());
        }
    };

    let delay = Duration::from_millis(config.delay_ms);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    Ok(enrichment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn listing() -> Listing {
        serde_json::from_value(json!({
            "zpid": "48749425",
            "id": "48749425",
            "address": "1 Main St, Seattle, WA 98101",
            "beds": 3,
            "baths": 2,
            "area": 1800,
            "statusText": "House for sale",
            "detailUrl": "https://www.zillow.com/homedetails/48749425_zpid/"
        }))
        .unwrap()
    }

    fn settings(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.endpoints.detail = server.url("/graphql/");
        settings.enrichment.delay_ms = 0;
        settings
    }

    #[tokio::test]
    async fn test_enrichment_extracts_property_fields() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/graphql/")
                .query_param("zpid", "48749425")
                .query_param("queryId", "4f7d72d05b119ce8d8cc87dc6f5c6cc2")
                .query_param("operationName", "ForSaleDoubleScrollFullRenderQuery")
                .header("referer", "https://www.zillow.com/homedetails/48749425_zpid/")
                .json_body_partial(
                    r#"{"variables": {"zpid": "48749425", "contactFormRenderParameter": {"platform": "desktop"}}}"#,
                );
            then.status(200).json_body(json!({
                "data": {
                    "property": {
                        "lastSoldPrice": 640000,
                        "taxAssessedValue": 702000,
                        "taxAssessedYear": 2019,
                        "mortgageRates": { "thirtyYearFixedRate": 3.79 },
                        "propertyTaxRate": 0.92
                    }
                }
            }));
        });

        let enrichment = fetch_enrichment(&Client::new(), &settings(&server), &listing())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(enrichment.last_sold_price.unwrap().to_string(), "640000");
        assert_eq!(enrichment.tax_assessed_value.unwrap().to_string(), "702000");
        assert_eq!(enrichment.tax_assessed_year.unwrap().to_string(), "2019");
        assert_eq!(enrichment.mortgage_rate.unwrap().to_string(), "3.79");
        assert_eq!(enrichment.property_tax_rate.unwrap().to_string(), "0.92");
    }

    #[tokio::test]
    async fn test_enrichment_without_mortgage_rates() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql/");
            then.status(200).json_body(json!({
                "data": { "property": { "lastSoldPrice": 500000, "propertyTaxRate": 1.1 } }
            }));
        });

        let enrichment = fetch_enrichment(&Client::new(), &settings(&server), &listing())
            .await
            .unwrap();

        assert!(enrichment.mortgage_rate.is_none());
        assert!(enrichment.tax_assessed_year.is_none());
        assert_eq!(enrichment.last_sold_price.unwrap().to_string(), "500000");
    }

    #[tokio::test]
    async fn test_enrichment_failure_is_recovered() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/graphql/");
            then.status(403).body("denied");
        });

        let enrichment = fetch_enrichment(&Client::new(), &settings(&server), &listing())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(enrichment, Enrichment::default());
    }

    #[tokio::test]
    async fn test_enrichment_missing_property_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql/");
            then.status(200).json_body(json!({ "data": { "property": null } }));
        });

        let enrichment = fetch_enrichment(&Client::new(), &settings(&server), &listing())
            .await
            .unwrap();

        assert_eq!(enrichment, Enrichment::default());
    }

    #[tokio::test]
    async fn test_enrichment_waits_after_success() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql/");
            then.status(200).json_body(json!({ "data": { "property": {} } }));
        });

        let mut settings = settings(&server);
        settings.enrichment.delay_ms = 50;

        let started = std::time::Instant::now();
        fetch_enrichment(&Client::new(), &settings, &listing())
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_enrichment_unreachable_endpoint_is_recovered() {
        let mut settings = Settings::default();
        settings.endpoints.detail = "http://127.0.0.1:1/graphql/".to_string();
        settings.enrichment.delay_ms = 0;

        let enrichment = fetch_enrichment(&Client::new(), &settings, &listing())
            .await
            .unwrap();

        assert_eq!(enrichment, Enrichment::default());
    }

    #[tokio::test]
    async fn test_enrichment_missing_property_skips_delay() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql/");
            then.status(200).json_body(json!({ "data": null }));
        });

        let mut settings = settings(&server);
        settings.enrichment.delay_ms = 5_000;

        let started = std::time::Instant::now();
        let enrichment = fetch_enrichment(&Client::new(), &settings, &listing())
            .await
            .unwrap();

        assert_eq!(enrichment, Enrichment::default());
        assert!(started.elapsed() < Duration::from_millis(5_000));
    }
}
