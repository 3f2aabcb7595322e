use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmergencyStatus {
    Critical,
    Stable,
    EnRoute,
}

impl EmergencyStatus {
    pub const ALL: [EmergencyStatus; 3] = [
        EmergencyStatus::Critical,
        EmergencyStatus::Stable,
        EmergencyStatus::EnRoute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmergencyStatus::Critical => "critical",
            EmergencyStatus::Stable => "stable",
            EmergencyStatus::EnRoute => "en-route",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmergencySeverity {
    High,
    Medium,
    Low,
}

impl EmergencySeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            EmergencySeverity::High => "High",
            EmergencySeverity::Medium => "Medium",
            EmergencySeverity::Low => "Low",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emergency {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub status: EmergencyStatus,
    pub time_reported: String,
    pub assigned_hospital: Option<String>,
    pub assigned_ambulance: Option<String>,
    pub description: String,
    pub eta: Option<String>,
    pub severity: EmergencySeverity,
    /// Response progress in percent.
    pub progress: u8,
}

impl Record for Emergency {
    const KIND: &'static str = "emergency";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.kind, &self.location]
    }
}

pub fn status_filter(status: Option<EmergencyStatus>) -> impl Fn(&Emergency) -> bool {
    move |e| status.map_or(true, |s| e.status == s)
}

/// Emergencies with `High` severity that are not yet stable.
pub fn active_high_priority(records: &[Emergency]) -> usize {
    records
        .iter()
        .filter(|e| e.severity == EmergencySeverity::High && e.status != EmergencyStatus::Stable)
        .count()
}

pub fn fixture() -> Vec<Emergency> {
    vec![
        Emergency {
            id: 1,
            kind: "Traffic Accident".into(),
            location: "Interstate 95, Mile Marker 42".into(),
            status: EmergencyStatus::Critical,
            time_reported: "10:30 AM".into(),
            assigned_hospital: Some("Central Hospital".into()),
            assigned_ambulance: Some("Unit 7".into()),
            description: "Multi-vehicle collision, multiple injuries reported".into(),
            eta: Some("5 mins".into()),
            severity: EmergencySeverity::High,
            progress: 75,
        },
        Emergency {
            id: 2,
            kind: "Cardiac Emergency".into(),
            location: "234 Pine Street".into(),
            status: EmergencyStatus::EnRoute,
            time_reported: "10:45 AM".into(),
            assigned_hospital: Some("St. Mary's Medical Center".into()),
            assigned_ambulance: Some("Unit 3".into()),
            description: "Possible heart attack, elderly patient".into(),
            eta: Some("8 mins".into()),
            severity: EmergencySeverity::High,
            progress: 45,
        },
        Emergency {
            id: 3,
            kind: "Workplace Injury".into(),
            location: "Construction Site, 567 Main St".into(),
            status: EmergencyStatus::Stable,
            time_reported: "11:15 AM".into(),
            assigned_hospital: Some("Community Health Center".into()),
            assigned_ambulance: Some("Unit 5".into()),
            description: "Fall from height, conscious but injured".into(),
            eta: Some("12 mins".into()),
            severity: EmergencySeverity::Medium,
            progress: 30,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{PageRequest, RecordStore};

    #[test]
    fn search_covers_type_and_location() {
        let store = RecordStore::new(fixture());
        assert_eq!(store.search("cardiac").len(), 1);
        assert_eq!(store.search("main st").len(), 1);
        assert_eq!(store.search("unit 7").len(), 0);
    }

    #[test]
    fn status_filter_is_exact() {
        let store = RecordStore::new(fixture());
        let en_route = store.query(
            "",
            status_filter(EmergencyStatus::parse("en-route")),
            PageRequest::everything(),
        );
        assert_eq!(en_route.total, 1);
        assert_eq!(en_route.items[0].kind, "Cardiac Emergency");
        assert_eq!(
            store
                .query("", status_filter(None), PageRequest::everything())
                .total,
            3
        );
    }

    #[test]
    fn counts_high_priority() {
        assert_eq!(active_high_priority(&fixture()), 2);
    }
}
