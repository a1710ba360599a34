use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Business unit a tender can be assigned to.
///
/// Variant order is the declaration order used for every per-unit listing
/// (scores, matched keywords, report rows). `Other` sorts last and is never
/// scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Unit {
    IoT,
    Experience,
    Marine,
    Target,
    #[serde(rename = "Bisan_Emira")]
    BisanEmira,
    Other,
}

impl Unit {
    /// The five units that carry keyword lists, in declaration order.
    pub const SCORABLE: [Unit; 5] = [
        Unit::IoT,
        Unit::Experience,
        Unit::Marine,
        Unit::Target,
        Unit::BisanEmira,
    ];

    /// Last-resort tie-break order, highest priority first.
    pub const TIE_BREAK_PRIORITY: [Unit; 5] = [
        Unit::Target,
        Unit::Marine,
        Unit::IoT,
        Unit::BisanEmira,
        Unit::Experience,
    ];

    /// Lowercase key used by the tender API (`iot`, `bisan_emira`, ...).
    pub fn api_key(self) -> &'static str {
        match self {
            Unit::IoT => "iot",
            Unit::Experience => "experience",
            Unit::Marine => "marine",
            Unit::Target => "target",
            Unit::BisanEmira => "bisan_emira",
            Unit::Other => "other",
        }
    }

    pub fn is_scorable(self) -> bool {
        self != Unit::Other
    }

    /// Position in [`Unit::TIE_BREAK_PRIORITY`]; `Other` ranks after everything.
    pub fn priority_rank(self) -> usize {
        Self::TIE_BREAK_PRIORITY
            .iter()
            .position(|u| *u == self)
            .unwrap_or(Self::TIE_BREAK_PRIORITY.len())
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::IoT => write!(f, "IoT"),
            Unit::Experience => write!(f, "Experience"),
            Unit::Marine => write!(f, "Marine"),
            Unit::Target => write!(f, "Target"),
            Unit::BisanEmira => write!(f, "Bisan_Emira"),
            Unit::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    /// Accepts display names and API keys, case-insensitively.
    /// `bisan-emira` and `bisan emira` are tolerated as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "iot" => Ok(Unit::IoT),
            "experience" => Ok(Unit::Experience),
            "marine" => Ok(Unit::Marine),
            "target" => Ok(Unit::Target),
            "bisan_emira" | "bisanemira" => Ok(Unit::BisanEmira),
            "other" => Ok(Unit::Other),
            _ => Err(format!("unknown business unit '{}'", s.trim())),
        }
    }
}

impl TryFrom<String> for Unit {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Keywords for one unit, either as a list or as a single string delimited by
/// commas, pipes or newlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordSpec {
    List(Vec<String>),
    Delimited(String),
}

impl From<&str> for KeywordSpec {
    fn from(raw: &str) -> Self {
        KeywordSpec::Delimited(raw.to_string())
    }
}

/// Text and custom keywords for one classification run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Custom keywords per unit, added in front of the built-in lists.
    #[serde(default)]
    pub keywords: BTreeMap<Unit, KeywordSpec>,
}

impl ClassificationInput {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            keywords: BTreeMap::new(),
        }
    }

    pub fn with_keywords(mut self, unit: Unit, spec: impl Into<KeywordSpec>) -> Self {
        self.keywords.insert(unit, spec.into());
        self
    }
}

/// Outcome of a single classification, with the evidence behind it.
///
/// `scores` and `matched` always hold every scorable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub unit: Unit,
    pub scores: BTreeMap<Unit, u32>,
    pub matched: BTreeMap<Unit, Vec<String>>,
}

impl ClassificationResult {
    pub fn score(&self, unit: Unit) -> u32 {
        self.scores.get(&unit).copied().unwrap_or(0)
    }

    pub fn matched(&self, unit: Unit) -> &[String] {
        self.matched.get(&unit).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A tender notice as served by `GET /tenders`.
///
/// Every field may be missing or `null` on the wire; both decode to the
/// field's empty value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tender {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// ISO-8601 date or date-time.
    #[serde(deserialize_with = "null_as_default")]
    pub deadline: String,
    /// Unit assigned server-side; raw string since servers may send anything.
    #[serde(alias = "businessUnit", deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Tender {
    /// Text handed to the classifier: the summary, or the description when
    /// the summary is blank.
    pub fn classification_text(&self) -> &str {
        if self.summary.trim().is_empty() {
            &self.description
        } else {
            &self.summary
        }
    }

    pub fn server_unit(&self) -> Option<Unit> {
        self.unit.parse().ok()
    }
}

/// A tender paired with the local classification of its text.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedTender {
    #[serde(flatten)]
    pub tender: Tender,
    pub classification: ClassificationResult,
}

impl ClassifiedTender {
    /// True when the server assigned a different unit than the local
    /// classifier. Tenders without a recognizable server unit never mismatch.
    pub fn is_mismatch(&self) -> bool {
        match self.tender.server_unit() {
            Some(unit) => unit != self.classification.unit,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parse_accepts_display_and_api_keys() {
        assert_eq!("Bisan_Emira".parse::<Unit>(), Ok(Unit::BisanEmira));
        assert_eq!("bisan_emira".parse::<Unit>(), Ok(Unit::BisanEmira));
        assert_eq!("IOT".parse::<Unit>(), Ok(Unit::IoT));
        assert_eq!(" marine ".parse::<Unit>(), Ok(Unit::Marine));
        assert!("sales".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_serializes_display_name() {
        assert_eq!(serde_json::to_string(&Unit::BisanEmira).unwrap(), "\"Bisan_Emira\"");
        let unit: Unit = serde_json::from_str("\"target\"").unwrap();
        assert_eq!(unit, Unit::Target);
    }

    #[test]
    fn test_priority_rank() {
        assert_eq!(Unit::Target.priority_rank(), 0);
        assert_eq!(Unit::Experience.priority_rank(), 4);
        assert_eq!(Unit::Other.priority_rank(), 5);
    }

    #[test]
    fn test_tender_accepts_business_unit_alias() {
        let json = r#"{
  "id": "t-1",
  "title": "Harbour sensors",
  "deadline": "2026-11-01T00:00:00Z",
  "businessUnit": "Marine",
  "score": 72,
  "createdAt": "2026-10-01T08:00:00Z"
}"#;
        let tender: Tender = serde_json::from_str(json).unwrap();
        assert_eq!(tender.unit, "Marine");
        assert_eq!(tender.server_unit(), Some(Unit::Marine));
        assert_eq!(tender.created_at, "2026-10-01T08:00:00Z");
        assert!(tender.summary.is_empty());
    }

    #[test]
    fn test_tender_null_fields_decode_as_empty() {
        let json = r#"{
  "id": "1",
  "title": "Drone",
  "summary": null,
  "score": null,
  "businessUnit": null,
  "deadline": null
}"#;
        let tender: Tender = serde_json::from_str(json).unwrap();
        assert_eq!(tender.id, "1");
        assert_eq!(tender.title, "Drone");
        assert!(tender.summary.is_empty());
        assert_eq!(tender.score, 0.0);
        assert!(tender.unit.is_empty());
        assert!(tender.deadline.is_empty());
    }

    #[test]
    fn test_classification_text_falls_back_to_description() {
        let tender = Tender {
            description: "Vessel maintenance contract".to_string(),
            summary: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(tender.classification_text(), "Vessel maintenance contract");
    }

    #[test]
    fn test_mismatch_detection() {
        let classification = ClassificationResult {
            unit: Unit::Marine,
            scores: BTreeMap::new(),
            matched: BTreeMap::new(),
        };
        let mut row = ClassifiedTender {
            tender: Tender {
                unit: "marine".to_string(),
                ..Default::default()
            },
            classification,
        };
        assert!(!row.is_mismatch());
        row.tender.unit = "Target".to_string();
        assert!(row.is_mismatch());
        row.tender.unit = String::new();
        assert!(!row.is_mismatch());
    }

    #[test]
    fn test_keyword_spec_shapes() {
        let list: KeywordSpec = serde_json::from_str(r#"["boat", "harbour"]"#).unwrap();
        assert_eq!(list, KeywordSpec::List(vec!["boat".into(), "harbour".into()]));
        let raw: KeywordSpec = serde_json::from_str(r#""boat, harbour""#).unwrap();
        assert_eq!(raw, KeywordSpec::Delimited("boat, harbour".into()));
    }
}
