use crate::config::toml_config::Settings;
use crate::core::http::ensure_ok;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use roxmltree::{Document, Node};

/// Looks up the region id for a city. The endpoint answers in XML; the id
/// is the first `response > region > id` element.
pub async fn resolve_region(
    client: &Client,
    settings: &Settings,
    state: &str,
    city: &str,
) -> Result<String> {
    tracing::info!("Resolving region for {}, {}", city, state);

    let response = client
        .get(&settings.endpoints.region_lookup)
        .query(&[
            ("zws-id", settings.http.zws_id.as_str()),
            ("city", city),
            ("state", state),
        ])
        .send()
        .await?;
    tracing::info!("GET {}", response.url());

    let body = ensure_ok(response).await?.text().await?;

    parse_region_id(&body).ok_or_else(|| EtlError::RegionNotFound {
        state: state.to_string(),
        city: city.to_string(),
    })
}

/// Text of the first `region > id` under the document's `response` element.
/// Malformed XML counts as a missing region.
pub fn parse_region_id(xml: &str) -> Option<String> {
    let document = match Document::parse(xml) {
        Ok(document) => document,
        Err(e) => {
            tracing::debug!("Region lookup body is not XML: {}", e);
            return None;
        }
    };

    let root = document.root_element();
    let response = if root.tag_name().name() == "response" {
        root
    } else {
        child_element(root, "response")?
    };
    let region = child_element(response, "region")?;
    let id = child_element(region, "id")?;

    let text: String = id
        .descendants()
        .filter(|node| node.is_text())
        .filter_map(|node| node.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Matches on local names, so namespace prefixes do not matter.
fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
}
