use uuid::Uuid;

use crate::models::ticketmodel::{Ticket, TicketStatus};
use crate::models::usermodel::{User, UserRole};

/// End users only see their own tickets; IT staff see everything.
pub fn can_view_ticket(actor: &User, ticket: &Ticket) -> bool {
    match actor.role {
        UserRole::ItAdmin | UserRole::ItUser => true,
        UserRole::EndUser => ticket.requester_id == actor.id,
    }
}

/// End users may only edit their own tickets, and only while still open.
pub fn can_edit_ticket(actor: &User, ticket: &Ticket) -> bool {
    match actor.role {
        UserRole::ItAdmin | UserRole::ItUser => true,
        UserRole::EndUser => {
            ticket.requester_id == actor.id && ticket.status == TicketStatus::Open
        }
    }
}

/// Status and assignee are staff-only fields. Requesters who send them
/// anyway have those fields dropped, not rejected.
pub fn can_edit_privileged_fields(actor: &User) -> bool {
    match actor.role {
        UserRole::ItAdmin | UserRole::ItUser => true,
        UserRole::EndUser => false,
    }
}

/// Admins assign anyone. IT users may only claim a ticket for
/// themselves (or unassign). End users never assign.
pub fn can_assign(actor: &User, target: Option<Uuid>) -> bool {
    match actor.role {
        UserRole::ItAdmin => true,
        UserRole::ItUser => match target {
            Some(id) => id == actor.id,
            None => true,
        },
        UserRole::EndUser => false,
    }
}

pub fn can_delete_ticket(actor: &User) -> bool {
    matches!(actor.role, UserRole::ItAdmin)
}

pub fn can_comment(actor: &User, ticket: &Ticket) -> bool {
    match actor.role {
        UserRole::ItAdmin | UserRole::ItUser => true,
        UserRole::EndUser => ticket.requester_id == actor.id,
    }
}

pub fn can_view_stats(actor: &User) -> bool {
    actor.role.is_it_staff()
}

pub fn can_manage_users(actor: &User) -> bool {
    matches!(actor.role, UserRole::ItAdmin)
}

/// Admins may not deactivate or delete their own account.
pub fn can_modify_account(actor: &User, target_id: Uuid) -> bool {
    can_manage_users(actor) && actor.id != target_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::ticketmodel::{TicketCategory, TicketPriority};

    fn make_user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            password: "hashed".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
            department: None,
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_ticket(requester_id: Uuid) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Uuid::new_v4(),
            title: "Broken laptop".to_string(),
            description: "The screen is cracked".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            category: TicketCategory::Hardware,
            requester_id,
            assigned_to: None,
            resolved_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn end_user_sees_only_own_tickets() {
        let alice = make_user(UserRole::EndUser);
        let own = make_ticket(alice.id);
        let other = make_ticket(Uuid::new_v4());

        assert!(can_view_ticket(&alice, &own));
        assert!(!can_view_ticket(&alice, &other));
    }

    #[test]
    fn requester_edits_only_while_open() {
        let mut alice = make_user(UserRole::EndUser);
        let mut own = make_ticket(Uuid::new_v4());
        alice.id = own.requester_id;

        assert!(can_edit_ticket(&alice, &own));

        own.status = TicketStatus::Resolved;
        assert!(!can_edit_ticket(&alice, &own));

        let tech = make_user(UserRole::ItUser);
        assert!(can_edit_ticket(&tech, &own));
    }

    #[test]
    fn it_staff_see_all_tickets() {
        let tech = make_user(UserRole::ItUser);
        let admin = make_user(UserRole::ItAdmin);
        let ticket = make_ticket(Uuid::new_v4());

        assert!(can_view_ticket(&tech, &ticket));
        assert!(can_view_ticket(&admin, &ticket));
    }

    #[test]
    fn privileged_fields_are_staff_only() {
        assert!(!can_edit_privileged_fields(&make_user(UserRole::EndUser)));
        assert!(can_edit_privileged_fields(&make_user(UserRole::ItUser)));
        assert!(can_edit_privileged_fields(&make_user(UserRole::ItAdmin)));
    }

    #[test]
    fn it_user_can_only_claim_for_self() {
        let tech = make_user(UserRole::ItUser);

        assert!(can_assign(&tech, Some(tech.id)));
        assert!(can_assign(&tech, None));
        assert!(!can_assign(&tech, Some(Uuid::new_v4())));
    }

    #[test]
    fn admin_assigns_anyone_end_user_never() {
        let admin = make_user(UserRole::ItAdmin);
        let requester = make_user(UserRole::EndUser);
        let target = Uuid::new_v4();

        assert!(can_assign(&admin, Some(target)));
        assert!(can_assign(&admin, None));
        assert!(!can_assign(&requester, Some(requester.id)));
        assert!(!can_assign(&requester, None));
    }

    #[test]
    fn only_admin_deletes_tickets() {
        assert!(!can_delete_ticket(&make_user(UserRole::EndUser)));
        assert!(!can_delete_ticket(&make_user(UserRole::ItUser)));
        assert!(can_delete_ticket(&make_user(UserRole::ItAdmin)));
    }

    #[test]
    fn stats_are_staff_only() {
        assert!(!can_view_stats(&make_user(UserRole::EndUser)));
        assert!(can_view_stats(&make_user(UserRole::ItUser)));
        assert!(can_view_stats(&make_user(UserRole::ItAdmin)));
    }

    #[test]
    fn admin_cannot_target_own_account() {
        let admin = make_user(UserRole::ItAdmin);
        assert!(!can_modify_account(&admin, admin.id));
        assert!(can_modify_account(&admin, Uuid::new_v4()));
    }
}
