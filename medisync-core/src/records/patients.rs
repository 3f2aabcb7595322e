use super::Record;
use crate::validation::FieldErrors;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    Admitted,
    #[serde(rename = "In Treatment")]
    InTreatment,
    Discharged,
    Transfer,
}

impl PatientStatus {
    pub const ALL: [PatientStatus; 4] = [
        PatientStatus::Admitted,
        PatientStatus::InTreatment,
        PatientStatus::Discharged,
        PatientStatus::Transfer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Admitted => "Admitted",
            PatientStatus::InTreatment => "In Treatment",
            PatientStatus::Discharged => "Discharged",
            PatientStatus::Transfer => "Transfer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientSeverity {
    Critical,
    Moderate,
    Stable,
}

impl PatientSeverity {
    pub const ALL: [PatientSeverity; 3] = [
        PatientSeverity::Critical,
        PatientSeverity::Moderate,
        PatientSeverity::Stable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PatientSeverity::Critical => "Critical",
            PatientSeverity::Moderate => "Moderate",
            PatientSeverity::Stable => "Stable",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: u32,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub blood_type: String,
    pub condition: String,
    pub severity: PatientSeverity,
    pub admission_date: String,
    pub assigned_doctor: String,
    pub assigned_hospital: String,
    pub room_number: String,
    pub status: PatientStatus,
    pub medical_history: Vec<String>,
    pub current_medications: Vec<String>,
    pub allergies: Vec<String>,
    pub last_update: String,
}

impl Record for Patient {
    const KIND: &'static str = "patient";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.condition]
    }
}

pub fn status_filter(status: Option<PatientStatus>) -> impl Fn(&Patient) -> bool {
    move |p| status.map_or(true, |s| p.status == s)
}

/// The add/edit dialog. Every field is raw text except the two selects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub blood_type: String,
    pub condition: String,
    pub severity: PatientSeverity,
    pub admission_date: String,
    pub assigned_doctor: String,
    pub assigned_hospital: String,
    pub room_number: String,
    pub status: PatientStatus,
}

impl PatientForm {
    pub fn blank(today: &str) -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            gender: String::new(),
            blood_type: String::new(),
            condition: String::new(),
            severity: PatientSeverity::Stable,
            admission_date: today.to_owned(),
            assigned_doctor: String::new(),
            assigned_hospital: String::new(),
            room_number: String::new(),
            status: PatientStatus::Admitted,
        }
    }

    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            age: patient.age.to_string(),
            gender: patient.gender.clone(),
            blood_type: patient.blood_type.clone(),
            condition: patient.condition.clone(),
            severity: patient.severity,
            admission_date: patient.admission_date.clone(),
            assigned_doctor: patient.assigned_doctor.clone(),
            assigned_hospital: patient.assigned_hospital.clone(),
            room_number: patient.room_number.clone(),
            status: patient.status,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required");
        }
        if self.age.trim().parse::<u32>().is_err() {
            errors.insert("age", "Age must be a whole number");
        }
        errors
    }

    /// Applies the form over `base`, keeping history, medications and
    /// allergies. A fresh record starts with those lists empty.
    pub fn apply(&self, base: Option<&Patient>) -> Result<Patient, FieldErrors> {
        self.validate().into_result()?;
        let age = self.age.trim().parse().unwrap_or_default();
        let (id, history, medications, allergies) = match base {
            Some(p) => (
                p.id,
                p.medical_history.clone(),
                p.current_medications.clone(),
                p.allergies.clone(),
            ),
            None => (0, Vec::new(), Vec::new(), Vec::new()),
        };
        Ok(Patient {
            id,
            name: self.name.trim().to_owned(),
            age,
            gender: self.gender.clone(),
            blood_type: self.blood_type.clone(),
            condition: self.condition.clone(),
            severity: self.severity,
            admission_date: self.admission_date.clone(),
            assigned_doctor: self.assigned_doctor.clone(),
            assigned_hospital: self.assigned_hospital.clone(),
            room_number: self.room_number.clone(),
            status: self.status,
            medical_history: history,
            current_medications: medications,
            allergies,
            last_update: "Just now".to_owned(),
        })
    }

    /// The limited edit an `edit_patients_partial` holder may make: only
    /// status and room move over from the form.
    pub fn apply_partial(&self, base: &Patient) -> Patient {
        Patient {
            status: self.status,
            room_number: self.room_number.trim().to_owned(),
            last_update: "Just now".to_owned(),
            ..base.clone()
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

pub fn fixture() -> Vec<Patient> {
    vec![
        Patient {
            id: 1,
            name: "John Smith".into(),
            age: 45,
            gender: "Male".into(),
            blood_type: "A+".into(),
            condition: "Cardiac Arrest".into(),
            severity: PatientSeverity::Critical,
            admission_date: "2024-03-15".into(),
            assigned_doctor: "Dr. Sarah Johnson".into(),
            assigned_hospital: "Central Hospital".into(),
            room_number: "ICU-101".into(),
            status: PatientStatus::Admitted,
            medical_history: strings(&["Hypertension", "Diabetes Type 2"]),
            current_medications: strings(&["Aspirin", "Metformin"]),
            allergies: strings(&["Penicillin"]),
            last_update: "10 minutes ago".into(),
        },
        Patient {
            id: 2,
            name: "Emma Davis".into(),
            age: 28,
            gender: "Female".into(),
            blood_type: "O-".into(),
            condition: "Multiple Trauma".into(),
            severity: PatientSeverity::Critical,
            admission_date: "2024-03-15".into(),
            assigned_doctor: "Dr. Michael Chen".into(),
            assigned_hospital: "Central Hospital".into(),
            room_number: "ER-205".into(),
            status: PatientStatus::InTreatment,
            medical_history: strings(&["None"]),
            current_medications: strings(&["Morphine", "Antibiotics"]),
            allergies: Vec::new(),
            last_update: "5 minutes ago".into(),
        },
        Patient {
            id: 3,
            name: "Robert Brown".into(),
            age: 67,
            gender: "Male".into(),
            blood_type: "B+".into(),
            condition: "Pneumonia".into(),
            severity: PatientSeverity::Moderate,
            admission_date: "2024-03-12".into(),
            assigned_doctor: "Dr. Sarah Johnson".into(),
            assigned_hospital: "Metropolitan Hospital".into(),
            room_number: "W-312".into(),
            status: PatientStatus::Discharged,
            medical_history: strings(&["COPD"]),
            current_medications: strings(&["Amoxicillin"]),
            allergies: strings(&["Sulfa drugs"]),
            last_update: "2 hours ago".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{PageRequest, RecordStore};

    #[test]
    fn search_by_name_or_condition() {
        let store = RecordStore::new(fixture());
        assert_eq!(store.search("smith").len(), 1);
        assert_eq!(store.search("trauma").len(), 1);
        assert_eq!(store.search("ICU").len(), 0);
    }

    #[test]
    fn status_serializes_with_space() {
        let json = serde_json::to_value(PatientStatus::InTreatment).expect("serialize");
        assert_eq!(json, "In Treatment");
        assert_eq!(PatientStatus::parse("In Treatment"), Some(PatientStatus::InTreatment));

        let store = RecordStore::new(fixture());
        let page = store.query(
            "",
            status_filter(Some(PatientStatus::InTreatment)),
            PageRequest::everything(),
        );
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Emma Davis");
    }

    #[test]
    fn edit_keeps_lists_and_add_starts_empty() {
        let mut store = RecordStore::new(fixture());
        let john = store.get(1).cloned().expect("fixture");
        let mut form = PatientForm::from_patient(&john);
        form.status = PatientStatus::InTreatment;
        let edited = form.apply(Some(&john)).expect("valid");
        assert_eq!(edited.allergies, john.allergies);
        assert_eq!(edited.last_update, "Just now");
        store.update(1, edited).expect("update");
        assert_eq!(store.get(1).map(|p| p.status), Some(PatientStatus::InTreatment));

        let mut form = PatientForm::blank("2024-03-20");
        form.name = "New Patient".into();
        form.age = "30".into();
        let created = store.create(form.apply(None).expect("valid"));
        assert_eq!(created.id, 4);
        assert!(created.medical_history.is_empty());
    }

    #[test]
    fn partial_edit_touches_only_status_and_room() {
        let john = RecordStore::new(fixture()).get(1).cloned().expect("fixture");
        let mut form = PatientForm::from_patient(&john);
        form.name = String::new();
        form.age = "not a number".into();
        form.condition = "Something else".into();
        form.severity = PatientSeverity::Stable;
        form.status = PatientStatus::Transfer;
        form.room_number = " 305 ".into();

        let edited = form.apply_partial(&john);
        assert_eq!(edited.status, PatientStatus::Transfer);
        assert_eq!(edited.room_number, "305");
        assert_eq!(edited.last_update, "Just now");
        assert_eq!(edited.name, john.name);
        assert_eq!(edited.age, john.age);
        assert_eq!(edited.condition, john.condition);
        assert_eq!(edited.severity, john.severity);
        assert_eq!(edited.medical_history, john.medical_history);
    }

    #[test]
    fn form_rejects_bad_age() {
        let mut form = PatientForm::blank("2024-03-20");
        form.name = "X".into();
        form.age = "forty".into();
        let errors = form.apply(None).expect_err("invalid");
        assert_eq!(errors.get("age"), Some("Age must be a whole number"));
    }
}
