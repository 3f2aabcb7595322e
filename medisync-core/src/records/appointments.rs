use super::Record;
use serde::{Deserialize, Serialize};

pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no-show",
        }
    }
}

/// The four tabs above the appointments table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppointmentTab {
    #[default]
    All,
    Upcoming,
    Completed,
    Cancelled,
}

impl AppointmentTab {
    pub const ALL: [AppointmentTab; 4] = [
        AppointmentTab::All,
        AppointmentTab::Upcoming,
        AppointmentTab::Completed,
        AppointmentTab::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AppointmentTab::All => "All Appointments",
            AppointmentTab::Upcoming => "Upcoming",
            AppointmentTab::Completed => "Completed",
            AppointmentTab::Cancelled => "Cancelled/No-Show",
        }
    }

    pub fn admits(self, status: AppointmentStatus) -> bool {
        match self {
            AppointmentTab::All => true,
            AppointmentTab::Upcoming => status == AppointmentStatus::Scheduled,
            AppointmentTab::Completed => status == AppointmentStatus::Completed,
            AppointmentTab::Cancelled => matches!(
                status,
                AppointmentStatus::Cancelled | AppointmentStatus::NoShow
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: u32,
    pub patient_name: String,
    pub patient_id: String,
    pub doctor_name: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: Option<String>,
}

impl Record for Appointment {
    const KIND: &'static str = "appointment";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.patient_name, &self.doctor_name, &self.kind]
    }
}

/// Counts for the four summary cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub scheduled: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub no_show: usize,
}

pub fn status_counts(appointments: &[Appointment]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for a in appointments {
        match a.status {
            AppointmentStatus::Scheduled => counts.scheduled += 1,
            AppointmentStatus::Completed => counts.completed += 1,
            AppointmentStatus::Cancelled => counts.cancelled += 1,
            AppointmentStatus::NoShow => counts.no_show += 1,
        }
    }
    counts
}

#[allow(clippy::too_many_arguments)]
fn appointment(
    id: u32,
    patient: (&str, &str),
    doctor: (&str, &str),
    date: &str,
    time: &str,
    status: AppointmentStatus,
    kind: &str,
    notes: &str,
) -> Appointment {
    Appointment {
        id,
        patient_name: patient.0.to_owned(),
        patient_id: patient.1.to_owned(),
        doctor_name: doctor.0.to_owned(),
        doctor_id: doctor.1.to_owned(),
        date: date.to_owned(),
        time: time.to_owned(),
        status,
        kind: kind.to_owned(),
        notes: Some(notes.to_owned()),
    }
}

pub fn fixture() -> Vec<Appointment> {
    use AppointmentStatus::*;
    const CHEN: (&str, &str) = ("Dr. Alice Chen", "201");
    const WILSON: (&str, &str) = ("Dr. Robert Wilson", "202");
    const SMITH: (&str, &str) = ("Dr. John Smith", "203");
    vec![
        appointment(
            1,
            ("Sarah Johnson", "101"),
            CHEN,
            "2023-07-10",
            "10:30 AM",
            Scheduled,
            "Consultation",
            "Follow-up on diabetes management",
        ),
        appointment(
            2,
            ("Michael Davis", "102"),
            WILSON,
            "2023-07-10",
            "11:45 AM",
            Scheduled,
            "Checkup",
            "Annual physical examination",
        ),
        appointment(
            3,
            ("Emily Thompson", "103"),
            CHEN,
            "2023-07-10",
            "2:15 PM",
            Scheduled,
            "Consultation",
            "Initial consultation for chronic pain management",
        ),
        appointment(
            4,
            ("David Wilson", "104"),
            SMITH,
            "2023-07-09",
            "9:00 AM",
            Completed,
            "Procedure",
            "Suture removal from previous procedure",
        ),
        appointment(
            5,
            ("Jennifer Brown", "105"),
            WILSON,
            "2023-07-09",
            "3:30 PM",
            Cancelled,
            "Consultation",
            "Patient requested cancellation",
        ),
        appointment(
            6,
            ("Brian Miller", "106"),
            SMITH,
            "2023-07-08",
            "11:00 AM",
            NoShow,
            "Checkup",
            "Patient did not show up for appointment",
        ),
        appointment(
            7,
            ("Lisa Taylor", "107"),
            CHEN,
            "2023-07-11",
            "10:00 AM",
            Scheduled,
            "Consultation",
            "New patient consultation",
        ),
        appointment(
            8,
            ("Robert Jones", "108"),
            WILSON,
            "2023-07-11",
            "1:30 PM",
            Scheduled,
            "Checkup",
            "Follow-up after medication change",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{PageRequest, RecordStore};

    #[test]
    fn tabs_partition_statuses() {
        let store = RecordStore::new(fixture());
        let total = |tab: AppointmentTab| {
            store
                .query("", |a| tab.admits(a.status), PageRequest::everything())
                .total
        };
        assert_eq!(total(AppointmentTab::All), 8);
        assert_eq!(total(AppointmentTab::Upcoming), 5);
        assert_eq!(total(AppointmentTab::Completed), 1);
        assert_eq!(total(AppointmentTab::Cancelled), 2);
    }

    #[test]
    fn search_spans_patient_doctor_and_type() {
        let store = RecordStore::new(fixture());
        assert_eq!(store.search("alice chen").len(), 3);
        assert_eq!(store.search("procedure").len(), 1);
        assert_eq!(store.search("lisa").len(), 1);
        assert_eq!(store.search("diabetes").len(), 0);
    }

    #[test]
    fn paginates_five_per_page() {
        let store = RecordStore::new(fixture());
        let first = store.query("", |_| true, PageRequest::new(0, ROWS_PER_PAGE_OPTIONS[0]));
        let second = store.query("", |_| true, PageRequest::new(1, ROWS_PER_PAGE_OPTIONS[0]));
        assert_eq!(first.items.len(), 5);
        assert_eq!(second.items.len(), 3);
        assert_eq!(second.items[0].id, 6);
        assert_eq!(first.page_count(), 2);

        let upcoming = store.query(
            "checkup",
            |a| AppointmentTab::Upcoming.admits(a.status),
            PageRequest::new(0, 5),
        );
        assert_eq!(upcoming.total, 2);
    }

    #[test]
    fn counts_cards() {
        let counts = status_counts(&fixture());
        assert_eq!(
            counts,
            StatusCounts {
                scheduled: 5,
                completed: 1,
                cancelled: 1,
                no_show: 1
            }
        );
    }
}
