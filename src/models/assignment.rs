use serde::{Serialize, Serializer};

use super::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shift {
    #[default]
    Night,
    Day,
}

impl Shift {
    /// The form toggle is "on" for the night shift.
    pub fn from_toggle(night: bool) -> Self {
        if night {
            Shift::Night
        } else {
            Shift::Day
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shift::Night => "Night",
            Shift::Day => "Day",
        }
    }
}

impl Serialize for Shift {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Which half of the assignment form applies to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormBranch {
    Mixture,
    OperatorHelper,
}

impl FormBranch {
    pub fn for_role(role: &Role) -> Self {
        if *role == Role::Mixture {
            FormBranch::Mixture
        } else {
            FormBranch::OperatorHelper
        }
    }

    pub fn shows_operator_fields(self) -> bool {
        self == FormBranch::OperatorHelper
    }

    pub fn requires_mixture_name(self) -> bool {
        self == FormBranch::Mixture
    }

    pub fn machine_numbers(self) -> std::ops::RangeInclusive<u32> {
        match self {
            FormBranch::Mixture => 1..=3,
            FormBranch::OperatorHelper => 1..=9,
        }
    }
}

/// Body of `POST /api/assign-machine`. Mixture assignments send `null` for
/// the operator, helper, model and packing fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineAssignment {
    pub role: Role,
    pub mixture_name: Option<String>,
    pub operator_name: Option<String>,
    pub helper_name: Option<String>,
    pub machine_no: String,
    pub model_no: Option<String>,
    pub date: String,
    pub shift: Shift,
    pub packing_entry: Option<String>,
    pub assigned_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_defaults_to_night_and_flips_with_toggle() {
        assert_eq!(Shift::default(), Shift::Night);
        assert_eq!(Shift::from_toggle(true).label(), "Night");
        assert_eq!(Shift::from_toggle(false).label(), "Day");
    }

    #[test]
    fn mixture_branch_hides_operator_fields() {
        let branch = FormBranch::for_role(&Role::Mixture);
        assert!(!branch.shows_operator_fields());
        assert!(branch.requires_mixture_name());
        assert_eq!(branch.machine_numbers().count(), 3);

        for role in [Role::Operator, Role::Helper, Role::Manager, Role::Other("X".to_string())] {
            let branch = FormBranch::for_role(&role);
            assert!(branch.shows_operator_fields());
            assert!(!branch.requires_mixture_name());
            assert_eq!(branch.machine_numbers().count(), 9);
        }
    }

    #[test]
    fn mixture_payload_nulls_operator_fields() {
        let body = serde_json::to_value(MachineAssignment {
            role: Role::Mixture,
            mixture_name: Some("Mixer One".to_string()),
            operator_name: None,
            helper_name: None,
            machine_no: "2".to_string(),
            model_no: None,
            date: "2024-05-01".to_string(),
            shift: Shift::Day,
            packing_entry: None,
            assigned_by: "Priya".to_string(),
        })
        .unwrap();

        assert_eq!(body["role"], "Mixture");
        assert_eq!(body["shift"], "Day");
        assert!(body["operatorName"].is_null());
        assert!(body["packingEntry"].is_null());
        assert_eq!(body["assignedBy"], "Priya");
    }
}
