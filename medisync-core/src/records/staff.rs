use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyStatus {
    OnDuty,
    OffDuty,
    OnCall,
}

impl DutyStatus {
    pub const ALL: [DutyStatus; 3] = [DutyStatus::OnDuty, DutyStatus::OffDuty, DutyStatus::OnCall];

    pub fn as_str(self) -> &'static str {
        match self {
            DutyStatus::OnDuty => "on-duty",
            DutyStatus::OffDuty => "off-duty",
            DutyStatus::OnCall => "on-call",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    /// Minutes.
    pub response_time: f32,
    pub cases_handled: u32,
    pub success_rate: f32,
    pub rating: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub date: String,
    pub time: String,
    pub hospital: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub status: DutyStatus,
    pub location: String,
    pub hospital: String,
    pub phone: String,
    pub email: String,
    pub shift: String,
    pub specialty: Option<String>,
    pub experience: String,
    pub certifications: Vec<String>,
    pub performance: Performance,
    pub upcoming_shifts: Vec<Shift>,
    pub last_active: Option<String>,
}

impl StaffMember {
    /// Avatar letters, e.g. "SJ" for "Dr. Sarah Johnson".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter(|w| !w.ends_with('.'))
            .filter_map(|w| w.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

impl Record for StaffMember {
    const KIND: &'static str = "staff";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.role]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaffFilter {
    pub role: Option<String>,
    pub status: Option<DutyStatus>,
}

impl StaffFilter {
    pub fn matches(&self, member: &StaffMember) -> bool {
        self.role.as_deref().map_or(true, |r| member.role == r)
            && self.status.map_or(true, |s| member.status == s)
    }
}

pub fn on_duty_count(members: &[StaffMember]) -> usize {
    members
        .iter()
        .filter(|m| m.status == DutyStatus::OnDuty)
        .count()
}

/// Distinct roles in fixture order, for the role select.
pub fn roles(members: &[StaffMember]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in members {
        if !out.contains(&m.role) {
            out.push(m.role.clone());
        }
    }
    out
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

pub fn fixture() -> Vec<StaffMember> {
    vec![
        StaffMember {
            id: 1,
            name: "Dr. Sarah Johnson".into(),
            role: "Emergency Physician".into(),
            status: DutyStatus::OnDuty,
            location: "ER Wing".into(),
            hospital: "Central Hospital".into(),
            phone: "(555) 123-4567".into(),
            email: "sarah.johnson@medisync.com".into(),
            shift: "7:00 AM - 7:00 PM".into(),
            specialty: Some("Trauma Care".into()),
            experience: "10 years".into(),
            certifications: strings(&["ABEM", "ACLS", "ATLS"]),
            performance: Performance {
                response_time: 4.2,
                cases_handled: 127,
                success_rate: 95.5,
                rating: Some(4.8),
            },
            upcoming_shifts: vec![
                Shift {
                    date: "2024-03-16".into(),
                    time: "7:00 AM - 7:00 PM".into(),
                    hospital: "Central Hospital".into(),
                },
                Shift {
                    date: "2024-03-17".into(),
                    time: "7:00 AM - 7:00 PM".into(),
                    hospital: "Central Hospital".into(),
                },
            ],
            last_active: Some("2 minutes ago".into()),
        },
        StaffMember {
            id: 2,
            name: "Emma Thompson".into(),
            role: "ICU Nurse".into(),
            status: DutyStatus::OnCall,
            location: "ICU Department".into(),
            hospital: "Central Hospital".into(),
            phone: "(555) 234-5678".into(),
            email: "emma.thompson@medisync.com".into(),
            shift: "7:00 PM - 7:00 AM".into(),
            specialty: Some("Critical Care".into()),
            experience: "6 years".into(),
            certifications: strings(&["CCRN", "BLS"]),
            performance: Performance {
                response_time: 3.1,
                cases_handled: 98,
                success_rate: 97.0,
                rating: Some(4.9),
            },
            upcoming_shifts: Vec::new(),
            last_active: Some("1 hour ago".into()),
        },
        StaffMember {
            id: 3,
            name: "James Wilson".into(),
            role: "Paramedic".into(),
            status: DutyStatus::OffDuty,
            location: "Ambulance Station".into(),
            hospital: "Metropolitan General".into(),
            phone: "(555) 345-6789".into(),
            email: "james.wilson@medisync.com".into(),
            shift: "6:00 AM - 6:00 PM".into(),
            specialty: None,
            experience: "4 years".into(),
            certifications: strings(&["NREMT-P", "PHTLS"]),
            performance: Performance {
                response_time: 6.8,
                cases_handled: 212,
                success_rate: 92.3,
                rating: None,
            },
            upcoming_shifts: Vec::new(),
            last_active: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{PageRequest, RecordStore};

    #[test]
    fn search_by_name_or_role() {
        let store = RecordStore::new(fixture());
        assert_eq!(store.search("johnson").len(), 1);
        assert_eq!(store.search("nurse").len(), 1);
        assert_eq!(store.search("ER Wing").len(), 0);
    }

    #[test]
    fn role_and_status_filters() {
        let store = RecordStore::new(fixture());
        let filter = StaffFilter {
            role: Some("Paramedic".into()),
            status: DutyStatus::parse("off-duty"),
        };
        let page = store.query("", |m| filter.matches(m), PageRequest::everything());
        assert_eq!(page.total, 1);

        let filter = StaffFilter {
            role: Some("Paramedic".into()),
            status: Some(DutyStatus::OnDuty),
        };
        assert_eq!(
            store
                .query("", |m| filter.matches(m), PageRequest::everything())
                .total,
            0
        );
    }

    #[test]
    fn helpers() {
        let members = fixture();
        assert_eq!(on_duty_count(&members), 1);
        assert_eq!(roles(&members).len(), 3);
        assert_eq!(members[0].initials(), "SJ");
    }
}
