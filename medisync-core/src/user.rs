use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Doctor,
    Nurse,
    Paramedic,
    Dispatcher,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Admin,
        UserRole::Doctor,
        UserRole::Nurse,
        UserRole::Paramedic,
        UserRole::Dispatcher,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Doctor => "doctor",
            UserRole::Nurse => "nurse",
            UserRole::Paramedic => "paramedic",
            UserRole::Dispatcher => "dispatcher",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Doctor => "Doctor",
            UserRole::Nurse => "Nurse",
            UserRole::Paramedic => "Paramedic",
            UserRole::Dispatcher => "Dispatcher",
        }
    }

    /// Fixed role → permission table. A user's permission set is copied from
    /// here when the user is created and never recomputed.
    pub fn permissions(self) -> &'static [Permission] {
        use Permission::*;
        match self {
            UserRole::Admin => &[
                ViewPatients,
                EditPatients,
                ViewAppointments,
                ManageAppointments,
                ViewHospitals,
                ManageHospitals,
                ViewStaff,
                ManageStaff,
                ViewEmergencies,
                ManageEmergencies,
                ManageUsers,
                ManageSettings,
            ],
            UserRole::Doctor => &[
                ViewPatients,
                EditPatients,
                ViewAppointments,
                ManageAppointments,
                ViewEmergencies,
            ],
            UserRole::Nurse => &[ViewPatients, EditPatientsPartial],
            UserRole::Paramedic => &[ViewEmergencies, UpdateEmergencies, ViewHospitals],
            UserRole::Dispatcher => &[
                ViewEmergencies,
                ManageEmergencies,
                ViewHospitals,
                ViewStaff,
            ],
        }
    }

    /// Departments offered by the registration form for this role.
    pub fn departments(self) -> &'static [&'static str] {
        match self {
            UserRole::Admin => &["Administration", "IT", "Management"],
            UserRole::Doctor => &["Emergency", "Surgery", "Cardiology", "Neurology", "Pediatrics"],
            UserRole::Nurse => &["Emergency", "ICU", "General", "Pediatrics", "Surgery"],
            UserRole::Paramedic => &["Ambulance", "First Response", "Critical Care Transport"],
            UserRole::Dispatcher => &["Dispatch Center", "Command Center", "Coordination"],
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewPatients,
    EditPatients,
    EditPatientsPartial,
    ViewAppointments,
    ManageAppointments,
    ViewHospitals,
    ManageHospitals,
    ViewStaff,
    ManageStaff,
    ViewEmergencies,
    UpdateEmergencies,
    ManageEmergencies,
    ManageUsers,
    ManageSettings,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewPatients => "view_patients",
            Permission::EditPatients => "edit_patients",
            Permission::EditPatientsPartial => "edit_patients_partial",
            Permission::ViewAppointments => "view_appointments",
            Permission::ManageAppointments => "manage_appointments",
            Permission::ViewHospitals => "view_hospitals",
            Permission::ManageHospitals => "manage_hospitals",
            Permission::ViewStaff => "view_staff",
            Permission::ManageStaff => "manage_staff",
            Permission::ViewEmergencies => "view_emergencies",
            Permission::UpdateEmergencies => "update_emergencies",
            Permission::ManageEmergencies => "manage_emergencies",
            Permission::ManageUsers => "manage_users",
            Permission::ManageSettings => "manage_settings",
        }
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| format!("unknown permission '{s}'"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .collect::<String>()
            .to_uppercase()
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Applies every `Some` field of `update`. Identity, role and
    /// permissions are not editable through a profile update.
    pub fn merge(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            first_name,
            last_name,
            email,
            avatar,
            hospital,
            department,
        } = update;
        if let Some(v) = first_name {
            self.first_name = v;
        }
        if let Some(v) = last_name {
            self.last_name = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = avatar {
            self.avatar = Some(v);
        }
        if let Some(v) = hospital {
            self.hospital = Some(v);
        }
        if let Some(v) = department {
            self.department = Some(v);
        }
    }
}

/// Partial profile fields accepted by the session's profile update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub hospital: Option<String>,
    pub department: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nurse_has_exactly_partial_patient_access() {
        assert_eq!(
            UserRole::Nurse.permissions(),
            &[Permission::ViewPatients, Permission::EditPatientsPartial]
        );
    }

    #[test]
    fn only_admin_manages_users() {
        for role in UserRole::ALL {
            let manages = role.permissions().contains(&Permission::ManageUsers);
            assert_eq!(manages, role == UserRole::Admin, "{role}");
        }
    }

    #[test]
    fn permission_names_match_serde() {
        for p in UserRole::Admin
            .permissions()
            .iter()
            .chain(UserRole::Nurse.permissions())
            .chain(UserRole::Paramedic.permissions())
        {
            assert_eq!(p.as_str().parse::<Permission>(), Ok(*p));
            assert_eq!(
                serde_json::to_value(p).expect("serialize"),
                serde_json::json!(p.as_str())
            );
        }
        assert!("launch_missiles".parse::<Permission>().is_err());
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!("Dispatcher".parse::<UserRole>(), Ok(UserRole::Dispatcher));
        assert!("janitor".parse::<UserRole>().is_err());
    }

    #[test]
    fn user_json_uses_camel_case() {
        let user = User {
            id: "7".into(),
            username: "jdoe".into(),
            email: "j@medisync.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            role: UserRole::Doctor,
            avatar: None,
            permissions: UserRole::Doctor.permissions().to_vec(),
            hospital: Some("Central Hospital".into()),
            department: None,
            last_login: None,
        };
        let json = serde_json::to_value(&user).expect("serialize");
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["role"], "doctor");
        assert!(json.get("department").is_none());
        assert_eq!(user.initials(), "JD");
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let mut user = User {
            id: "1".into(),
            username: "admin".into(),
            email: "admin@medisync.com".into(),
            first_name: "Admin".into(),
            last_name: "User".into(),
            role: UserRole::Admin,
            avatar: None,
            permissions: UserRole::Admin.permissions().to_vec(),
            hospital: None,
            department: Some("Administration".into()),
            last_login: None,
        };
        user.merge(ProfileUpdate {
            first_name: Some("Alex".into()),
            hospital: Some("Central Hospital".into()),
            ..ProfileUpdate::default()
        });
        assert_eq!(user.first_name, "Alex");
        assert_eq!(user.last_name, "User");
        assert_eq!(user.hospital.as_deref(), Some("Central Hospital"));
        assert_eq!(user.department.as_deref(), Some("Administration"));
        assert_eq!(user.role, UserRole::Admin);
    }
}
