use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HospitalStatus {
    Active,
    Full,
    Limited,
}

impl HospitalStatus {
    pub const ALL: [HospitalStatus; 3] = [
        HospitalStatus::Active,
        HospitalStatus::Full,
        HospitalStatus::Limited,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HospitalStatus::Active => "active",
            HospitalStatus::Full => "full",
            HospitalStatus::Limited => "limited",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartmentStatus {
    Critical,
    Stable,
    Moderate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    pub total_beds: u32,
    pub available_beds: u32,
    pub status: DepartmentStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub total_beds: u32,
    pub available_beds: u32,
    pub occupancy_rate: u8,
    pub emergency_capacity: bool,
    pub specialties: Vec<String>,
    pub staff_count: u32,
    pub status: HospitalStatus,
    pub last_updated: String,
    pub departments: Vec<Department>,
}

impl Record for Hospital {
    const KIND: &'static str = "hospital";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.location]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HospitalFilter {
    pub status: Option<HospitalStatus>,
    pub emergency_only: bool,
}

impl HospitalFilter {
    pub fn matches(&self, hospital: &Hospital) -> bool {
        self.status.map_or(true, |s| hospital.status == s)
            && (!self.emergency_only || hospital.emergency_capacity)
    }
}

/// Header totals shown above the hospital grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySummary {
    pub hospitals: usize,
    pub total_beds: u32,
    pub available_beds: u32,
    pub emergency_ready: usize,
}

pub fn capacity_summary(hospitals: &[Hospital]) -> CapacitySummary {
    hospitals
        .iter()
        .fold(CapacitySummary::default(), |mut acc, h| {
            acc.hospitals += 1;
            acc.total_beds += h.total_beds;
            acc.available_beds += h.available_beds;
            if h.emergency_capacity {
                acc.emergency_ready += 1;
            }
            acc
        })
}

fn departments(specs: [(&str, u32, u32, DepartmentStatus); 3]) -> Vec<Department> {
    specs
        .into_iter()
        .map(|(name, total_beds, available_beds, status)| Department {
            name: name.to_owned(),
            total_beds,
            available_beds,
            status,
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

pub fn fixture() -> Vec<Hospital> {
    use DepartmentStatus::{Critical, Stable};
    vec![
        Hospital {
            id: 1,
            name: "Central Medical Center".into(),
            location: "123 Healthcare Ave, Medical District".into(),
            phone: "+1 (555) 123-4567".into(),
            email: "info@centralmed.com".into(),
            total_beds: 500,
            available_beds: 125,
            occupancy_rate: 75,
            emergency_capacity: true,
            specialties: strings(&["Emergency Care", "Trauma", "ICU", "Surgery"]),
            staff_count: 350,
            status: HospitalStatus::Active,
            last_updated: "5 minutes ago".into(),
            departments: departments([
                ("Emergency", 50, 10, Critical),
                ("ICU", 30, 5, Critical),
                ("General", 100, 45, Stable),
            ]),
        },
        Hospital {
            id: 2,
            name: "Metropolitan Hospital".into(),
            location: "456 Medical Park, Downtown".into(),
            phone: "+1 (555) 987-6543".into(),
            email: "contact@metrohospital.com".into(),
            total_beds: 300,
            available_beds: 45,
            occupancy_rate: 85,
            emergency_capacity: true,
            specialties: strings(&["Emergency Care", "Cardiology", "Neurology"]),
            staff_count: 250,
            status: HospitalStatus::Limited,
            last_updated: "10 minutes ago".into(),
            departments: departments([
                ("Emergency", 50, 10, Critical),
                ("Cardiology", 30, 5, Critical),
                ("Neurology", 100, 45, Stable),
            ]),
        },
        Hospital {
            id: 3,
            name: "Community Health Center".into(),
            location: "789 Wellness Road, Suburbs".into(),
            phone: "+1 (555) 456-7890".into(),
            email: "info@commhealth.com".into(),
            total_beds: 200,
            available_beds: 10,
            occupancy_rate: 95,
            emergency_capacity: false,
            specialties: strings(&["Primary Care", "Pediatrics", "Emergency Care"]),
            staff_count: 150,
            status: HospitalStatus::Full,
            last_updated: "15 minutes ago".into(),
            departments: departments([
                ("Emergency", 50, 10, Critical),
                ("Pediatrics", 30, 5, Critical),
                ("Primary Care", 100, 45, Stable),
            ]),
        },
    ]
}
