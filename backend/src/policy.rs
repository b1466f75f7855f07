//! Authorization policy for complaint data.
//!
//! These functions are the only access-control surface for complaints. They
//! are pure: no store, no request, no rendering. Every read or write path
//! evaluates the relevant predicate before touching data.

use crate::models::{
    complaint::{Complaint, ComplaintScope, ComplaintStatus},
    user::{User, UserRole},
};

/// The user submitted the complaint.
pub fn is_complainant(user: &User, complaint: &Complaint) -> bool {
    user.id == complaint.complainant_id
}

/// The user is an officer of the department the complaint is assigned to.
/// Officers without a department are never assigned officers, including for
/// complaints that have no department: two missing departments do not match,
/// so unrouted complaints stay with the complainant and admins.
pub fn is_assigned_officer(user: &User, complaint: &Complaint) -> bool {
    user.role == UserRole::DeptOfficer
        && user.department_id.is_some()
        && user.department_id == complaint.assigned_dept_id
}

pub fn can_view(user: &User, complaint: &Complaint) -> bool {
    is_complainant(user, complaint) || is_assigned_officer(user, complaint) || user.is_admin()
}

/// Internal notes are for staff only; complainants never see them.
pub fn can_see_internal_notes(user: &User, complaint: &Complaint) -> bool {
    is_assigned_officer(user, complaint) || user.is_admin()
}

pub fn can_edit_status(user: &User, complaint: &Complaint) -> bool {
    is_assigned_officer(user, complaint) || user.is_admin()
}

/// Complainants may amend their own complaint until it is closed.
pub fn can_add_attachments(user: &User, complaint: &Complaint) -> bool {
    is_complainant(user, complaint) && complaint.status != ComplaintStatus::Closed
}

/// Whether `role` may move a complaint from `from` to `to`.
///
/// Escalated complaints are handled by admins only; closed complaints are final.
pub fn transition_allowed(role: UserRole, from: ComplaintStatus, to: ComplaintStatus) -> bool {
    use ComplaintStatus::*;

    let staff = matches!(role, UserRole::DeptOfficer | UserRole::Admin);
    let admin = role == UserRole::Admin;
    match (from, to) {
        (Submitted, InProgress | Escalated | Resolved) => staff,
        (InProgress, Escalated | Resolved) => staff,
        (Escalated, InProgress | Resolved) => admin,
        (Resolved, InProgress | Closed) => staff,
        _ => false,
    }
}

/// Statuses the user may move this complaint to right now.
pub fn allowed_transitions(user: &User, complaint: &Complaint) -> Vec<ComplaintStatus> {
    if !can_edit_status(user, complaint) {
        return Vec::new();
    }
    ComplaintStatus::ALL
        .into_iter()
        .filter(|to| transition_allowed(user.role, complaint.status, *to))
        .collect()
}

/// The narrowest store query that still covers every complaint the user may
/// view. Results are still passed through `can_view`.
pub fn listing_scope(user: &User) -> ComplaintScope {
    match (user.role, user.department_id) {
        (UserRole::Admin, _) => ComplaintScope::All,
        (UserRole::DeptOfficer, Some(dept_id)) => {
            ComplaintScope::SubmittedByOrAssignedTo(user.id, dept_id)
        }
        _ => ComplaintScope::SubmittedBy(user.id),
    }
}

/// Users allowed to open the admin user directory.
pub fn can_list_users(user: &User) -> bool {
    user.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DepartmentId, UserId};

    fn user(role: UserRole, department_id: Option<DepartmentId>) -> User {
        User::new(
            format!("{}@example.edu", UserId::new()),
            "hash".into(),
            "Someone".into(),
            role,
            department_id,
        )
    }

    fn complaint(complainant: &User, dept: Option<DepartmentId>, status: ComplaintStatus) -> Complaint {
        let mut complaint = Complaint::new(
            complainant.id,
            "Wi-Fi outage".into(),
            "No connectivity in the library since Monday.".into(),
            "IT".into(),
            dept,
        );
        complaint.status = status;
        complaint
    }

    #[test]
    fn complainant_views_but_never_sees_internal_notes() {
        let student = user(UserRole::Student, None);
        let c = complaint(&student, Some(DepartmentId::new()), ComplaintStatus::Submitted);
        assert!(can_view(&student, &c));
        assert!(!can_see_internal_notes(&student, &c));
        assert!(!can_edit_status(&student, &c));
    }

    #[test]
    fn officer_of_other_department_is_denied() {
        let d1 = DepartmentId::new();
        let d2 = DepartmentId::new();
        let student = user(UserRole::Student, None);
        let officer = user(UserRole::DeptOfficer, Some(d1));
        let c = complaint(&student, Some(d2), ComplaintStatus::Submitted);
        assert!(!can_view(&officer, &c));
        assert!(!can_see_internal_notes(&officer, &c));
        assert!(!can_edit_status(&officer, &c));
    }

    #[test]
    fn officer_without_department_is_not_assigned_to_unassigned_complaints() {
        let student = user(UserRole::Student, None);
        let officer = user(UserRole::DeptOfficer, None);
        let c = complaint(&student, None, ComplaintStatus::Submitted);
        assert!(!is_assigned_officer(&officer, &c));
        assert!(!can_view(&officer, &c));
    }

    #[test]
    fn admin_views_and_sees_notes_everywhere() {
        let student = user(UserRole::Student, None);
        let admin = user(UserRole::Admin, None);
        for dept in [None, Some(DepartmentId::new())] {
            let c = complaint(&student, dept, ComplaintStatus::Escalated);
            assert!(can_view(&admin, &c));
            assert!(can_see_internal_notes(&admin, &c));
            assert!(can_edit_status(&admin, &c));
        }
    }

    #[test]
    fn student_sharing_department_id_is_not_an_officer() {
        let dept = DepartmentId::new();
        let owner = user(UserRole::Student, None);
        let other_student = user(UserRole::Student, Some(dept));
        let c = complaint(&owner, Some(dept), ComplaintStatus::Submitted);
        assert!(!can_view(&other_student, &c));
    }

    #[test]
    fn transitions_follow_workflow_table() {
        use ComplaintStatus::*;
        let officer = UserRole::DeptOfficer;
        let admin = UserRole::Admin;

        assert!(transition_allowed(officer, Submitted, InProgress));
        assert!(transition_allowed(officer, InProgress, Resolved));
        assert!(transition_allowed(officer, Resolved, Closed));
        assert!(transition_allowed(officer, Resolved, InProgress));
        assert!(!transition_allowed(officer, Escalated, Resolved));
        assert!(transition_allowed(admin, Escalated, Resolved));

        for status in ComplaintStatus::ALL {
            assert!(!transition_allowed(admin, status, status));
            assert!(!transition_allowed(admin, Closed, status));
            assert!(!transition_allowed(admin, status, Submitted));
            for to in ComplaintStatus::ALL {
                assert!(!transition_allowed(UserRole::Student, status, to));
            }
        }
    }

    #[test]
    fn allowed_transitions_empty_for_non_editors() {
        let student = user(UserRole::Student, None);
        let c = complaint(&student, None, ComplaintStatus::Submitted);
        assert!(allowed_transitions(&student, &c).is_empty());

        let admin = user(UserRole::Admin, None);
        assert_eq!(
            allowed_transitions(&admin, &c),
            vec![
                ComplaintStatus::InProgress,
                ComplaintStatus::Escalated,
                ComplaintStatus::Resolved
            ]
        );
    }

    #[test]
    fn attachments_only_from_complainant_until_closed() {
        let student = user(UserRole::Student, None);
        let admin = user(UserRole::Admin, None);
        let open = complaint(&student, None, ComplaintStatus::Resolved);
        let closed = complaint(&student, None, ComplaintStatus::Closed);
        assert!(can_add_attachments(&student, &open));
        assert!(!can_add_attachments(&student, &closed));
        assert!(!can_add_attachments(&admin, &open));
    }

    #[test]
    fn listing_scope_narrows_by_role() {
        let dept = DepartmentId::new();
        let student = user(UserRole::Student, Some(dept));
        let officer = user(UserRole::DeptOfficer, Some(dept));
        let loose_officer = user(UserRole::DeptOfficer, None);
        let admin = user(UserRole::Admin, None);

        assert_eq!(listing_scope(&student), ComplaintScope::SubmittedBy(student.id));
        assert_eq!(
            listing_scope(&officer),
            ComplaintScope::SubmittedByOrAssignedTo(officer.id, dept)
        );
        assert_eq!(
            listing_scope(&loose_officer),
            ComplaintScope::SubmittedBy(loose_officer.id)
        );
        assert_eq!(listing_scope(&admin), ComplaintScope::All);
    }

    #[test]
    fn only_admins_list_users() {
        assert!(can_list_users(&user(UserRole::Admin, None)));
        assert!(!can_list_users(&user(UserRole::DeptOfficer, Some(DepartmentId::new()))));
        assert!(!can_list_users(&user(UserRole::Student, None)));
    }
}
