use crate::domain::model::{Enrichment, FlatRecord, Listing};
use serde_json::Number;

fn number(value: Option<&Number>) -> Option<String> {
    value.map(Number::to_string)
}

/// Maps a listing (and its enrichment, when the run enriches) to a flat
/// record. Optional nested fields that are missing become empty cells.
///
/// The enrichment columns sit after `price` and are only emitted when
/// `enrichment` is `Some`, so every record of one run has the same fields.
pub fn flatten(listing: &Listing, enrichment: Option<&Enrichment>) -> FlatRecord {
    let home = listing.home_info();
    let variable = listing.variable_data.as_ref();

    let mut fields: Vec<(&'static str, Option<String>)> = vec![
        ("address", Some(listing.address.clone())),
        ("zipcode", home.and_then(|h| h.zipcode.clone())),
        ("type", home.and_then(|h| h.home_type.clone())),
        ("status", home.and_then(|h| h.home_status.clone())),
        ("other_status", Some(listing.status_text.clone())),
        ("price", number(home.and_then(|h| h.price.as_ref()))),
    ];

    if let Some(extra) = enrichment {
        fields.extend([
            ("last_sold_price", number(extra.last_sold_price.as_ref())),
            ("tax_assessed_value", number(extra.tax_assessed_value.as_ref())),
            ("tax_assessed_year", number(extra.tax_assessed_year.as_ref())),
            ("mortgage_rate", number(extra.mortgage_rate.as_ref())),
            ("property_tax_rate", number(extra.property_tax_rate.as_ref())),
        ]);
    }

    fields.extend([
        ("zestimate", number(home.and_then(|h| h.zestimate.as_ref()))),
        ("festimate", number(home.and_then(|h| h.festimate.as_ref()))),
        ("rent_zestimate", number(home.and_then(|h| h.rent_zestimate.as_ref()))),
        ("beds", Some(listing.beds.to_string())),
        ("baths", Some(listing.baths.to_string())),
        ("area", Some(listing.area.to_string())),
        ("year", number(home.and_then(|h| h.year_built.as_ref()))),
        ("price_reduction", home.and_then(|h| h.price_reduction.clone())),
        ("price_increase", number(home.and_then(|h| h.price_change.as_ref()))),
        ("days_on_zillow", number(home.and_then(|h| h.days_on_zillow.as_ref()))),
        ("extra_info", variable.and_then(|v| v.text.clone())),
        ("extra_info_type", variable.and_then(|v| v.kind.clone())),
        ("zpid", Some(listing.zpid.clone())),
        ("id", Some(listing.id.clone())),
        ("link", Some(listing.detail_url.clone())),
    ]);

    FlatRecord::new(fields)
}
