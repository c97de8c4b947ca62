use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Odds cell as delivered by the scraper: a JSON number, the raw cell text,
/// or any other JSON value, which never yields a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OddsField {
    Number(f64),
    Text(String),
    Other(Value),
}

impl OddsField {
    /// Decimal odds value, if the cell holds a finite number.
    /// Text cells tolerate surrounding whitespace and a comma decimal separator.
    pub fn as_decimal(&self) -> Option<f64> {
        let v = match self {
            OddsField::Number(n) => *n,
            OddsField::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
            OddsField::Other(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for OddsField {
    fn from(v: f64) -> Self {
        OddsField::Number(v)
    }
}

impl From<&str> for OddsField {
    fn from(s: &str) -> Self {
        OddsField::Text(s.to_string())
    }
}

/// Text form of a loosely typed JSON value. Numbers and booleans are
/// stringified; `null`, arrays and objects carry no text.
pub(crate) fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Accept any JSON value for a free-text field instead of failing the whole
/// payload on one odd cell.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(value_as_text(&Value::deserialize(deserializer)?))
}

/// Dates may arrive as text or as a structured value. Objects are searched
/// for a `date` or `value` member; anything else that is not text is kept
/// in its JSON form so the validator rejects it as a bad date.
fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Null => None,
        Value::Object(map) => ["date", "Date", "value"]
            .iter()
            .find_map(|k| map.get(*k).and_then(value_as_text))
            .or_else(|| Some(value.to_string())),
        Value::Array(_) => Some(value.to_string()),
        other => value_as_text(other),
    })
}

/// One head-to-head row from the acquisition collaborator, untrusted.
///
/// `win` is the host-win price, `loss` the guest-win price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMatchRecord {
    #[serde(default, alias = "Date", deserialize_with = "lenient_date")]
    pub date: Option<String>,
    #[serde(default, alias = "Win")]
    pub win: Option<OddsField>,
    #[serde(default, alias = "Draw")]
    pub draw: Option<OddsField>,
    #[serde(default, alias = "Loss")]
    pub loss: Option<OddsField>,
    #[serde(
        default,
        alias = "Tournament",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub tournament: Option<String>,
    #[serde(
        default,
        alias = "Team1",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub host: Option<String>,
    #[serde(
        default,
        alias = "Team2",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub guest: Option<String>,
}

/// Decode a loosely typed record list. Elements that are not records become
/// empty records, which the validator rejects like any other bad row.
pub fn records_from_values(values: Vec<Value>) -> Vec<RawMatchRecord> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .collect()
}

#[cfg(test)]
impl RawMatchRecord {
    pub fn new(
        date: &str,
        win: impl Into<OddsField>,
        draw: impl Into<OddsField>,
        loss: impl Into<OddsField>,
    ) -> Self {
        RawMatchRecord {
            date: Some(date.to_string()),
            win: Some(win.into()),
            draw: Some(draw.into()),
            loss: Some(loss.into()),
            ..Default::default()
        }
    }
}

/// A record that passed validation: parsed date, three strictly positive odds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub host_win_odds: f64,
    pub draw_odds: f64,
    pub guest_win_odds: f64,
}

/// Day-first formats tried before ISO dates. Two-digit years go first since
/// `%Y` would otherwise read `23` as the year 23.
const DAY_FIRST_FORMATS: [&str; 6] = [
    "%d.%m.%y", "%d/%m/%y", "%d-%m-%y", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y",
];

/// Parse a match date, preferring day-first layouts (`31.12.2023`).
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DAY_FIRST_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
