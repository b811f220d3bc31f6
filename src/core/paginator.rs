use crate::config::toml_config::{FilterConfig, Settings};
use crate::core::http::ensure_ok;
use crate::domain::model::{Listing, SearchPage};
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, Url};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Bounding box covering the continental US. The search endpoint insists on
/// map bounds; the region selection does the actual narrowing.
pub const MAP_BOUNDS_WEST: f64 = -124.848974;
pub const MAP_BOUNDS_EAST: f64 = -66.885444;
pub const MAP_BOUNDS_SOUTH: f64 = 24.396308;
pub const MAP_BOUNDS_NORTH: f64 = 49.384358;

const REGION_TYPE_CITY: u32 = 6;

/// Query parameters for one search page. `searchQueryState` and `wants`
/// are JSON documents passed as url-encoded strings.
pub fn build_search_query(
    region_id: &str,
    page: u64,
    filters: &FilterConfig,
) -> Vec<(&'static str, String)> {
    let region: Value = region_id
        .parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(region_id));

    let search_query_state = json!({
        "pagination": { "currentPage": page },
        "mapBounds": {
            "west": MAP_BOUNDS_WEST,
            "east": MAP_BOUNDS_EAST,
            "south": MAP_BOUNDS_SOUTH,
            "north": MAP_BOUNDS_NORTH
        },
        "regionSelection": [{ "regionId": region, "regionType": REGION_TYPE_CITY }],
        "isMapVisible": false,
        "filterState": {
            "beds": { "min": filters.beds_min },
            "baths": { "min": filters.baths_min },
            "isMultiFamily": { "value": false },
            "isApartmentOrCondo": { "value": false },
            "isApartment": { "value": false },
            "isCondo": { "value": false },
            "isLotLand": { "value": false },
            "isManufactured": { "value": false },
            "price": { "min": filters.price_min, "max": filters.price_max }
        },
        "isListVisible": true
    });

    let wants = json!({ "cat1": ["listResults"], "cat2": ["total"] });

    vec![
        ("searchQueryState", search_query_state.to_string()),
        ("wants", wants.to_string()),
        ("requestId", page.to_string()),
    ]
}

/// Number of pages needed to cover `total` results.
pub fn page_count(total: u64, page_size: usize) -> u64 {
    total.div_ceil(page_size.max(1) as u64)
}

pub async fn fetch_page(
    client: &Client,
    settings: &Settings,
    region_id: &str,
    page: u64,
) -> Result<SearchPage> {
    let url = Url::parse_with_params(
        &settings.endpoints.search,
        build_search_query(region_id, page, &settings.filters),
    )
    .map_err(|e| EtlError::ConfigError {
        message: format!("invalid search endpoint: {}", e),
    })?;
    tracing::info!("GET {}", url);

    let response = ensure_ok(client.get(url).send().await?).await?;
    let body = response.bytes().await?;

    Ok(serde_json::from_slice(&body)?)
}

/// Fetches every page for the region and returns the listings deduplicated
/// by zpid.
///
/// Page 1 reports the total result count; together with the page size it
/// fixes how many further pages are requested. An empty page ends the loop
/// early.
pub async fn fetch_all(client: &Client, settings: &Settings, region_id: &str) -> Result<Vec<Listing>> {
    let first = fetch_page(client, settings, region_id, 1).await?;
    let total = first.cat1.search_list.total_result_count;
    let pages = page_count(total, settings.paging.page_size);
    tracing::debug!("{} results reported across {} pages", total, pages);
    if let Some(reported) = first.cat1.search_list.total_pages {
        if reported != pages {
            tracing::debug!("Upstream reports {} pages, following the result count", reported);
        }
    }

    let mut listings = first.cat1.search_results.list_results;

    for page in 2..=pages {
        let data = fetch_page(client, settings, region_id, page).await?;
        let results = data.cat1.search_results.list_results;
        if results.is_empty() {
            tracing::warn!("Page {} of {} came back empty, stopping", page, pages);
            break;
        }
        listings.extend(results);
    }

    tracing::debug!("Fetched {} listings before dedup", listings.len());
    Ok(dedup_by_zpid(listings))
}

/// Keeps one listing per zpid. The last occurrence wins; output keeps the
/// order in which each zpid was first seen.
pub fn dedup_by_zpid(listings: Vec<Listing>) -> Vec<Listing> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Listing> = Vec::with_capacity(listings.len());

    for listing in listings {
        match positions.get(&listing.zpid) {
            Some(&index) => unique[index] = listing,
            None => {
                positions.insert(listing.zpid.clone(), unique.len());
                unique.push(listing);
            }
        }
    }

    unique
}
