use serde::{Deserialize, Deserializer};
use serde_json::Number;

/// One search result as returned in `cat1.searchResults.listResults`.
///
/// The identity, address, size and link fields are required; a listing
/// without them fails to deserialize and aborts the run. Everything under
/// `hdpData` and `variableData` is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(deserialize_with = "string_or_number")]
    pub zpid: String,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub address: String,
    pub beds: Number,
    pub baths: Number,
    pub area: Number,
    pub status_text: String,
    pub detail_url: String,
    #[serde(default)]
    pub hdp_data: Option<HdpData>,
    #[serde(default)]
    pub variable_data: Option<VariableData>,
}

impl Listing {
    pub fn home_info(&self) -> Option<&HomeInfo> {
        self.hdp_data.as_ref().and_then(|d| d.home_info.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdpData {
    #[serde(default)]
    pub home_info: Option<HomeInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeInfo {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub home_type: Option<String>,
    #[serde(default)]
    pub home_status: Option<String>,
    #[serde(default)]
    pub price: Option<Number>,
    #[serde(default)]
    pub zestimate: Option<Number>,
    #[serde(default)]
    pub festimate: Option<Number>,
    #[serde(default)]
    pub rent_zestimate: Option<Number>,
    #[serde(default)]
    pub year_built: Option<Number>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub price_reduction: Option<String>,
    #[serde(default)]
    pub price_change: Option<Number>,
    #[serde(default)]
    pub days_on_zillow: Option<Number>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariableData {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Envelope of one search page.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    pub cat1: SearchCategory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCategory {
    pub search_list: SearchList,
    pub search_results: SearchResults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchList {
    pub total_result_count: u64,
    #[serde(default)]
    pub total_pages: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub list_results: Vec<Listing>,
}

/// Supplementary financial fields from the detail endpoint. All absent when
/// the lookup failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub last_sold_price: Option<Number>,
    pub tax_assessed_value: Option<Number>,
    pub tax_assessed_year: Option<Number>,
    pub mortgage_rate: Option<Number>,
    pub property_tax_rate: Option<Number>,
}

/// Output of the extract stage.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub region_id: String,
    pub listings: Vec<Listing>,
}

/// A single-level record ready for tabular export.
///
/// Fields keep a fixed order; the first record of a file provides the header.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    fields: Vec<(&'static str, Option<String>)>,
}

impl FlatRecord {
    pub fn new(fields: Vec<(&'static str, Option<String>)>) -> Self {
        Self { fields }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(name, _)| *name).collect()
    }

    /// Cell values in header order, absent values as empty strings.
    pub fn values(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|(_, value)| value.as_deref().unwrap_or(""))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub region_id: String,
    pub records: Vec<FlatRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Num(Number),
}

impl From<StringOrNumber> for String {
    fn from(raw: StringOrNumber) -> Self {
        match raw {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Num(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}
