use axum::{
    extract::{Form, Query, State},
    response::Redirect,
};
use askama::Template;
use chrono::Utc;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    error::ValidationError,
    flash::{self, Flash},
    handlers::{render, require_manager, PageResult},
    models::{FormBranch, MachineAssignment, Role, Shift, StaffMember},
    state::AppState,
    view::Loadable,
};

const ROLE_CHOICES: [Role; 2] = [Role::Operator, Role::Mixture];

#[derive(Template)]
#[template(path = "assign_machine.html")]
struct AssignMachineTemplate {
    role: String,
    role_choices: Vec<String>,
    show_operator_fields: bool,
    mixtures: Loadable<StaffMember>,
    operators: Loadable<StaffMember>,
    helpers: Loadable<StaffMember>,
    machine_numbers: Vec<u32>,
    today: String,
    flash: Option<Flash>,
}

#[derive(Deserialize)]
pub struct RoleQuery {
    role: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignmentForm {
    #[serde(default)]
    role: String,
    #[serde(default)]
    mixture_name: String,
    #[serde(default)]
    operator_name: String,
    #[serde(default)]
    helper_name: String,
    #[serde(default)]
    machine_no: String,
    #[serde(default)]
    model_no: String,
    #[serde(default)]
    date: String,
    // HTML checkboxes send "on" or nothing
    shift: Option<String>,
    #[serde(default)]
    packing_entry: String,
}

fn required(value: &str, label: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new(format!("{} is required.", label)));
    }
    Ok(value.to_string())
}

impl AssignmentForm {
    /// Build the payload for the selected role. Fields that do not belong to
    /// the role's half of the form are sent as `null`.
    pub fn into_assignment(self, assigned_by: &str) -> Result<MachineAssignment, ValidationError> {
        let role = Role::parse(&self.role);
        let branch = FormBranch::for_role(&role);

        let machine_no = required(&self.machine_no, "Machine No")?;
        let date = required(&self.date, "Date")?;
        let shift = Shift::from_toggle(self.shift.is_some());
        let assigned_by = if assigned_by.trim().is_empty() {
            "Unknown Manager".to_string()
        } else {
            assigned_by.to_string()
        };

        let assignment = if branch.requires_mixture_name() {
            MachineAssignment {
                role,
                mixture_name: Some(required(&self.mixture_name, "Mixture Name")?),
                operator_name: None,
                helper_name: None,
                machine_no,
                model_no: None,
                date,
                shift,
                packing_entry: None,
                assigned_by,
            }
        } else {
            MachineAssignment {
                role,
                mixture_name: None,
                operator_name: Some(required(&self.operator_name, "Operator Name")?),
                helper_name: Some(required(&self.helper_name, "Helper Name")?),
                machine_no,
                model_no: Some(required(&self.model_no, "Model No")?),
                date,
                shift,
                packing_entry: Some(required(&self.packing_entry, "Packing Entry")?),
                assigned_by,
            }
        };
        Ok(assignment)
    }
}

fn form_url(role: &str) -> String {
    format!("/assign-inventory?role={}", urlencoding::encode(role))
}

pub async fn assign_form(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<RoleQuery>,
) -> PageResult {
    require_manager(&cookies, &state)?;

    let role = query
        .role
        .as_deref()
        .map(Role::parse)
        .unwrap_or(Role::Operator);
    let branch = FormBranch::for_role(&role);

    // dropping this future (client gone) cancels every pending fetch
    let (mixtures, operators, helpers) = match branch {
        FormBranch::Mixture => {
            let mixtures = state.api.staff_by_role(&Role::Mixture).await;
            (Loadable::from_result(mixtures, "Mixtures"), Loadable::Empty, Loadable::Empty)
        }
        FormBranch::OperatorHelper => {
            let (operators, helpers) = tokio::join!(
                state.api.staff_by_role(&Role::Operator),
                state.api.staff_by_role(&Role::Helper),
            );
            (
                Loadable::Empty,
                Loadable::from_result(operators, "Operators"),
                Loadable::from_result(helpers, "Helpers"),
            )
        }
    };

    let template = AssignMachineTemplate {
        role: role.to_string(),
        role_choices: ROLE_CHOICES.iter().map(Role::to_string).collect(),
        show_operator_fields: branch.shows_operator_fields(),
        mixtures,
        operators,
        helpers,
        machine_numbers: branch.machine_numbers().collect(),
        today: Utc::now().format("%Y-%m-%d").to_string(),
        flash: flash::take(&cookies),
    };
    render(&template)
}

pub async fn assign_machine(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<AssignmentForm>,
) -> PageResult<Redirect> {
    let manager = require_manager(&cookies, &state)?;
    let back = form_url(&Role::parse(&form.role).to_string());

    let assignment = match form.into_assignment(&manager.name) {
        Ok(assignment) => assignment,
        Err(e) => {
            flash::set(&cookies, Flash::error(e.to_string()));
            return Ok(Redirect::to(&back));
        }
    };

    match state.api.assign_machine(&assignment).await {
        Ok(message) => {
            log::info!(
                "{} assigned machine {} ({} shift) for {}",
                assignment.assigned_by,
                assignment.machine_no,
                assignment.shift.label(),
                assignment.role
            );
            flash::set(&cookies, Flash::success(message));
        }
        Err(e) => {
            log::warn!("machine assignment failed: {}", e);
            flash::set(&cookies, Flash::error(e.user_message("Submission failed")));
        }
    }
    Ok(Redirect::to(&back))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(role: &str) -> AssignmentForm {
        AssignmentForm {
            role: role.to_string(),
            mixture_name: "Mixer One".to_string(),
            operator_name: "Asha".to_string(),
            helper_name: "Ravi".to_string(),
            machine_no: "4".to_string(),
            model_no: "M-200".to_string(),
            date: "2024-05-01".to_string(),
            shift: Some("on".to_string()),
            packing_entry: "80-90-100".to_string(),
        }
    }

    fn template(role: Role) -> AssignMachineTemplate {
        let branch = FormBranch::for_role(&role);
        AssignMachineTemplate {
            role: role.to_string(),
            role_choices: ROLE_CHOICES.iter().map(Role::to_string).collect(),
            show_operator_fields: branch.shows_operator_fields(),
            mixtures: Loadable::Ready(vec![StaffMember {
                id: "s1".to_string(),
                full_name: "Mixer One".to_string(),
                role: Role::Mixture,
            }]),
            operators: Loadable::Empty,
            helpers: Loadable::Failed("Could not fetch Helpers.".to_string()),
            machine_numbers: branch.machine_numbers().collect(),
            today: "2024-05-01".to_string(),
            flash: None,
        }
    }

    #[test]
    fn mixture_payload_keeps_only_mixture_fields() {
        let assignment = form("Mixture").into_assignment("Priya").unwrap();
        assert_eq!(assignment.mixture_name.as_deref(), Some("Mixer One"));
        assert!(assignment.operator_name.is_none());
        assert!(assignment.helper_name.is_none());
        assert!(assignment.model_no.is_none());
        assert!(assignment.packing_entry.is_none());
        assert_eq!(assignment.shift, Shift::Night);
    }

    #[test]
    fn operator_payload_keeps_operator_fields() {
        let mut input = form("Operator");
        input.shift = None;
        let assignment = input.into_assignment("").unwrap();
        assert!(assignment.mixture_name.is_none());
        assert_eq!(assignment.operator_name.as_deref(), Some("Asha"));
        assert_eq!(assignment.packing_entry.as_deref(), Some("80-90-100"));
        assert_eq!(assignment.shift.label(), "Day");
        assert_eq!(assignment.assigned_by, "Unknown Manager");
    }

    #[test]
    fn each_branch_checks_its_own_required_fields() {
        let mut mixture = form("Mixture");
        mixture.mixture_name.clear();
        mixture.operator_name.clear();
        assert_eq!(
            mixture.into_assignment("Priya").unwrap_err().to_string(),
            "Mixture Name is required."
        );

        let mut mixture = form("Mixture");
        mixture.operator_name.clear();
        mixture.model_no.clear();
        assert!(mixture.into_assignment("Priya").is_ok());

        let mut operator = form("Operator");
        operator.packing_entry = "  ".to_string();
        assert_eq!(
            operator.into_assignment("Priya").unwrap_err().to_string(),
            "Packing Entry is required."
        );
    }

    #[test]
    fn mixture_form_hides_operator_fields() {
        let html = template(Role::Mixture).render().unwrap();
        assert!(html.contains(r#"name="mixture_name" required"#));
        assert!(!html.contains(r#"name="operator_name""#));
        assert!(!html.contains(r#"name="helper_name""#));
        assert!(!html.contains(r#"name="model_no""#));
        assert!(!html.contains(r#"name="packing_entry""#));
        assert!(html.contains(r#"<option value="3">3</option>"#));
        assert!(!html.contains(r#"<option value="4">4</option>"#));
    }

    #[test]
    fn operator_form_requires_operator_fields() {
        let html = template(Role::Operator).render().unwrap();
        assert!(!html.contains(r#"name="mixture_name""#));
        assert!(html.contains(r#"name="operator_name" required"#));
        assert!(html.contains(r#"name="helper_name" required"#));
        assert!(html.contains(r#"name="model_no" required"#));
        assert!(html.contains(r#"name="packing_entry" required"#));
        assert!(html.contains(r#"<option value="9">9</option>"#));
        assert!(html.contains("Could not fetch Helpers."));
    }

    #[test]
    fn shift_toggle_starts_on_night() {
        let html = template(Role::Operator).render().unwrap();
        assert!(html.contains(r#"name="shift" checked"#));
    }
}
