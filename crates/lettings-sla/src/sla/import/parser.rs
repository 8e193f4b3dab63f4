use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct IssueRow {
    #[serde(rename = "Issue ID")]
    pub(crate) id: String,
    #[serde(rename = "Priority")]
    pub(crate) priority: String,
    #[serde(rename = "Raised At")]
    pub(crate) raised_at: String,
    #[serde(
        rename = "Acknowledged At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) acknowledged_at: Option<String>,
    #[serde(
        rename = "Resolved At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) resolved_at: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<IssueRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<IssueRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
