use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub type PersonId = i64;

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    /// `DD.MM.YYYY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    /// `DD.MM.YYYY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
}

impl Person {
    pub fn new(id: PersonId, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            patronymic: None,
            birth_date: None,
            sex: None,
            death_date: None,
        }
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn with_birth_date(mut self, date: &str) -> Self {
        self.birth_date = Some(date.to_string());
        self
    }

    pub fn with_patronymic(mut self, patronymic: &str) -> Self {
        self.patronymic = Some(patronymic.to_string());
        self
    }

    /// Birth date when present and well formed; malformed text reads as unknown.
    pub fn born_on(&self) -> Option<NaiveDate> {
        self.birth_date.as_deref().and_then(parse_date)
    }

    pub fn died_on(&self) -> Option<NaiveDate> {
        self.death_date.as_deref().and_then(parse_date)
    }

    pub fn display_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in [
            self.first_name.as_str(),
            self.patronymic.as_deref().unwrap_or(""),
            self.last_name.as_str(),
        ] {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
        if parts.is_empty() {
            format!("#{}", self.id)
        } else {
            parts.join(" ")
        }
    }
}

/// Parses a `DD.MM.YYYY` date. Anything else, including impossible calendar
/// dates like `31.02.2000`, yields `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let caps = DATE_RE.captures(text.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Edge {
    Spouse { a: PersonId, b: PersonId },
    Parent { parent: PersonId, child: PersonId },
}

impl Edge {
    pub fn spouse(a: PersonId, b: PersonId) -> Self {
        Self::Spouse { a, b }
    }

    pub fn parent(parent: PersonId, child: PersonId) -> Self {
        Self::Parent { parent, child }
    }

    pub fn kind(&self) -> EdgeKind {
        match self {
            Self::Spouse { .. } => EdgeKind::Spouse,
            Self::Parent { .. } => EdgeKind::Parent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Spouse,
    Parent,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spouse => f.write_str("spouse"),
            Self::Parent => f.write_str("parent"),
        }
    }
}

/// A dataset as loaded from disk: people plus the edges between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyData {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl FamilyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_person(&mut self, person: Person) {
        self.people.push(person);
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_dates() {
        assert_eq!(parse_date("25.03.1991"), NaiveDate::from_ymd_opt(1991, 3, 25));
        assert_eq!(parse_date(" 01.11.1944 "), NaiveDate::from_ymd_opt(1944, 11, 1));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_date("1991-03-25"), None);
        assert_eq!(parse_date("5.3.1991"), None);
        assert_eq!(parse_date("31.02.2000"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn edges_use_tagged_json() {
        let edges: Vec<Edge> = serde_json::from_str(
            r#"[{"type":"spouse","a":1,"b":2},{"type":"parent","parent":6,"child":1}]"#,
        )
        .unwrap();
        assert_eq!(edges, vec![Edge::spouse(1, 2), Edge::parent(6, 1)]);
    }

    #[test]
    fn person_reads_camel_case_fields() {
        let person: Person = serde_json::from_str(
            r#"{"id":7,"lastName":"Beda","firstName":"Irina","birthDate":"09.01.1971","sex":"female"}"#,
        )
        .unwrap();
        assert_eq!(person.sex, Some(Sex::Female));
        assert_eq!(person.born_on(), NaiveDate::from_ymd_opt(1971, 1, 9));
        assert_eq!(person.display_name(), "Irina Beda");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(Person::new(12, "", " ").display_name(), "#12");
    }
}
