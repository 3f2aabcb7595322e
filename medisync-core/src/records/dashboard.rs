//! Dashboard headline numbers, recent alerts and the on-shift team.

use crate::delay::Delay;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_emergencies: u32,
    pub available_teams: u32,
    /// Minutes, one decimal.
    pub avg_response_time: f32,
    /// Percent in `0..=100`.
    pub success_rate: u32,
    pub total_patients: u32,
    pub critical_cases: u32,
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            active_emergencies: 12,
            available_teams: 8,
            avg_response_time: 4.5,
            success_rate: 94,
            total_patients: 156,
            critical_cases: 23,
        }
    }
}

fn nudge(value: u32, rng: &mut impl Rng, low: i64, high: i64) -> u32 {
    let moved = i64::from(value) + rng.gen_range(low..=high);
    u32::try_from(moved.max(0)).unwrap_or(u32::MAX)
}

impl DashboardStats {
    /// Small random walk applied on every refresh. Counts never go below
    /// zero, the success rate stays a percentage and patients only grow.
    pub fn drift(&self, rng: &mut impl Rng) -> Self {
        let response = self.avg_response_time + rng.gen_range(-0.2f32..=0.2);
        Self {
            active_emergencies: nudge(self.active_emergencies, rng, -1, 1),
            available_teams: nudge(self.available_teams, rng, -1, 0),
            avg_response_time: ((response * 10.0).round() / 10.0).max(0.0),
            success_rate: nudge(self.success_rate, rng, -1, 1).min(100),
            total_patients: nudge(self.total_patients, rng, 0, 4),
            critical_cases: nudge(self.critical_cases, rng, -1, 1),
        }
    }
}

/// Simulated reload of the headline numbers.
pub async fn refresh(
    delay: &impl Delay,
    after: Duration,
    current: DashboardStats,
    rng: &mut impl Rng,
) -> DashboardStats {
    delay.sleep(after).await;
    let next = current.drift(rng);
    debug!(
        active = next.active_emergencies,
        critical = next.critical_cases,
        "dashboard refreshed"
    );
    next
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Moderate,
    Stable,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyAlert {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub timestamp: String,
    pub severity: AlertSeverity,
    pub status: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    Active,
    Standby,
    Offline,
}

impl TeamStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamStatus::Active => "active",
            TeamStatus::Standby => "standby",
            TeamStatus::Offline => "offline",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub status: TeamStatus,
}

pub fn alerts() -> Vec<EmergencyAlert> {
    let alert = |id, kind: &str, location: &str, timestamp: &str, severity, status: &str| {
        EmergencyAlert {
            id,
            kind: kind.to_owned(),
            location: location.to_owned(),
            timestamp: timestamp.to_owned(),
            severity,
            status: status.to_owned(),
        }
    };
    vec![
        alert(
            1,
            "Cardiac Emergency",
            "Central Hospital, Floor 3",
            "2 mins ago",
            AlertSeverity::Critical,
            "Active Response",
        ),
        alert(
            2,
            "Traffic Accident",
            "Main St & 5th Ave",
            "5 mins ago",
            AlertSeverity::Moderate,
            "En Route",
        ),
        alert(
            3,
            "Medical Emergency",
            "Downtown Clinic",
            "10 mins ago",
            AlertSeverity::Stable,
            "Resolved",
        ),
    ]
}

pub fn team_members() -> Vec<TeamMember> {
    let member = |id, name: &str, role: &str, status| TeamMember {
        id,
        name: name.to_owned(),
        role: role.to_owned(),
        status,
    };
    vec![
        member(1, "Dr. Sarah Johnson", "Emergency Physician", TeamStatus::Active),
        member(2, "James Wilson", "Paramedic", TeamStatus::Active),
        member(3, "Emma Thompson", "Emergency Nurse", TeamStatus::Standby),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::NoDelay;
    use futures::executor::block_on;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn defaults_match_headline() {
        let stats = DashboardStats::default();
        assert_eq!(stats.active_emergencies, 12);
        assert_eq!(stats.total_patients, 156);
        assert_eq!(stats.success_rate, 94);
    }

    #[test]
    fn drift_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut stats = DashboardStats {
            active_emergencies: 0,
            available_teams: 0,
            avg_response_time: 0.1,
            success_rate: 100,
            total_patients: 10,
            critical_cases: 0,
        };
        for _ in 0..200 {
            let next = stats.drift(&mut rng);
            assert!(next.success_rate <= 100);
            assert!(next.avg_response_time >= 0.0);
            assert!(next.total_patients >= stats.total_patients);
            assert!(next.total_patients <= stats.total_patients + 4);
            assert!(next.available_teams <= stats.available_teams);
            assert!(next.active_emergencies.abs_diff(stats.active_emergencies) <= 1);
            stats = next;
        }
    }

    #[test]
    fn refresh_drifts_after_delay() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = DashboardStats::default();
        let next = block_on(refresh(&NoDelay, Duration::from_secs(1), start, &mut rng));
        assert!(next.total_patients >= start.total_patients);
        assert!((next.avg_response_time - start.avg_response_time).abs() <= 0.25);
    }

    #[test]
    fn fixtures() {
        assert_eq!(alerts().len(), 3);
        assert_eq!(alerts()[0].severity, AlertSeverity::Critical);
        let team = team_members();
        assert_eq!(
            team.iter().filter(|m| m.status == TeamStatus::Active).count(),
            2
        );
    }
}
