use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dtos::ticketdtos::UpdateTicketDto;
use crate::models::ticketmodel::{Ticket, TicketStatus, UpdateType};
use crate::models::usermodel::User;

use super::policy;

/// One audit-worthy change produced by applying an update to a ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketChange {
    pub update_type: UpdateType,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Applies an update to a ticket, returning the new ticket state and the
/// audit entries the transition produced.
///
/// Privileged fields (status, assignee) sent by a requester are dropped
/// silently rather than rejected. The resolution and closure
/// timestamps are stamped once, on the first transition into the
/// corresponding status, and never overwritten afterwards.
pub fn apply_update(
    actor: &User,
    ticket: &Ticket,
    dto: &UpdateTicketDto,
    now: DateTime<Utc>,
) -> (Ticket, Vec<TicketChange>) {
    let mut updated = ticket.clone();
    let mut changes = Vec::new();

    if let Some(title) = &dto.title {
        updated.title = title.clone();
    }
    if let Some(description) = &dto.description {
        updated.description = description.clone();
    }
    if let Some(category) = dto.category {
        updated.category = category;
    }
    if let Some(priority) = dto.priority {
        if priority != ticket.priority {
            changes.push(TicketChange {
                update_type: UpdateType::PriorityChange,
                old_value: Some(ticket.priority.to_str().to_string()),
                new_value: Some(priority.to_str().to_string()),
            });
            updated.priority = priority;
        }
    }

    if policy::can_edit_privileged_fields(actor) {
        if let Some(status) = dto.status {
            if status != ticket.status {
                changes.push(TicketChange {
                    update_type: UpdateType::StatusChange,
                    old_value: Some(ticket.status.to_str().to_string()),
                    new_value: Some(status.to_str().to_string()),
                });
                updated.status = status;
                stamp_status_timestamps(&mut updated, now);
            }
        }

        if let Some(assigned_to) = dto.assigned_to {
            if assigned_to != ticket.assigned_to {
                changes.push(assignment_change(ticket.assigned_to, assigned_to));
                updated.assigned_to = assigned_to;
            }
        }
    }

    (updated, changes)
}

/// Applies an explicit (re)assignment, recording the audit entry.
pub fn apply_assignment(
    ticket: &Ticket,
    assigned_to: Option<Uuid>,
) -> (Ticket, Option<TicketChange>) {
    let mut updated = ticket.clone();
    if assigned_to == ticket.assigned_to {
        return (updated, None);
    }
    let change = assignment_change(ticket.assigned_to, assigned_to);
    updated.assigned_to = assigned_to;
    (updated, Some(change))
}

fn assignment_change(old: Option<Uuid>, new: Option<Uuid>) -> TicketChange {
    TicketChange {
        update_type: UpdateType::Assignment,
        old_value: old.map(|id| id.to_string()),
        new_value: new.map(|id| id.to_string()),
    }
}

fn stamp_status_timestamps(ticket: &mut Ticket, now: DateTime<Utc>) {
    match ticket.status {
        TicketStatus::Resolved if ticket.resolved_at.is_none() => {
            ticket.resolved_at = Some(now);
        }
        TicketStatus::Closed if ticket.closed_at.is_none() => {
            ticket.closed_at = Some(now);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ticketmodel::{TicketCategory, TicketPriority};
    use crate::models::usermodel::UserRole;

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

    fn make_ticket() -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Uuid::new_v4(),
            title: "VPN keeps dropping".to_string(),
            description: "Connection drops every few minutes".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            category: TicketCategory::Network,
            requester_id: Uuid::new_v4(),
            assigned_to: None,
            resolved_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn requester_privileged_fields_are_dropped_silently() {
        let mut actor = make_user(UserRole::EndUser);
        let ticket = make_ticket();
        actor.id = ticket.requester_id;

        let dto = UpdateTicketDto {
            title: Some("New title".to_string()),
            status: Some(TicketStatus::Closed),
            priority: Some(TicketPriority::Critical),
            assigned_to: Some(Some(Uuid::new_v4())),
            ..Default::default()
        };

        let (updated, changes) = apply_update(&actor, &ticket, &dto, Utc::now());

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.status, TicketStatus::Open);
        assert_eq!(updated.assigned_to, None);

        // Priority is not a staff-only field; it goes through with an
        // audit entry while status and assignee are dropped.
        assert_eq!(updated.priority, TicketPriority::Critical);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].update_type, UpdateType::PriorityChange);
    }

    #[test]
    fn each_changed_field_yields_one_audit_entry() {
        let tech = make_user(UserRole::ItUser);
        let ticket = make_ticket();

        let dto = UpdateTicketDto {
            status: Some(TicketStatus::InProgress),
            priority: Some(TicketPriority::High),
            ..Default::default()
        };

        let (updated, changes) = apply_update(&tech, &ticket, &dto, Utc::now());

        assert_eq!(updated.status, TicketStatus::InProgress);
        assert_eq!(updated.priority, TicketPriority::High);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].update_type, UpdateType::PriorityChange);
        assert_eq!(changes[1].update_type, UpdateType::StatusChange);
        assert_eq!(changes[1].old_value.as_deref(), Some("open"));
        assert_eq!(changes[1].new_value.as_deref(), Some("in_progress"));
    }

    #[test]
    fn it_user_can_reassign_to_a_colleague_via_update() {
        let tech = make_user(UserRole::ItUser);
        let ticket = make_ticket();
        let colleague = Uuid::new_v4();

        let dto = UpdateTicketDto {
            status: Some(TicketStatus::InProgress),
            assigned_to: Some(Some(colleague)),
            ..Default::default()
        };

        let (updated, changes) = apply_update(&tech, &ticket, &dto, Utc::now());

        // The self-only restriction applies to the assign endpoint, not
        // the general update path. Any IT staff may set the assignee here.
        assert_eq!(updated.assigned_to, Some(colleague));
        assert_eq!(updated.status, TicketStatus::InProgress);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].update_type, UpdateType::Assignment);
        assert_eq!(changes[1].new_value, Some(colleague.to_string()));
    }

    #[test]
    fn unchanged_values_produce_no_entries() {
        let tech = make_user(UserRole::ItUser);
        let ticket = make_ticket();

        let dto = UpdateTicketDto {
            status: Some(TicketStatus::Open),
            priority: Some(TicketPriority::Medium),
            ..Default::default()
        };

        let (_, changes) = apply_update(&tech, &ticket, &dto, Utc::now());
        assert!(changes.is_empty());
    }

    #[test]
    fn resolved_at_is_stamped_once() {
        let tech = make_user(UserRole::ItUser);
        let ticket = make_ticket();
        let first = Utc::now();

        let dto = UpdateTicketDto {
            status: Some(TicketStatus::Resolved),
            ..Default::default()
        };
        let (resolved, _) = apply_update(&tech, &ticket, &dto, first);
        assert_eq!(resolved.resolved_at, Some(first));

        // Reopen and resolve again. The original timestamp survives.
        let dto = UpdateTicketDto {
            status: Some(TicketStatus::Open),
            ..Default::default()
        };
        let (reopened, _) = apply_update(&tech, &resolved, &dto, Utc::now());
        assert_eq!(reopened.resolved_at, Some(first));

        let dto = UpdateTicketDto {
            status: Some(TicketStatus::Resolved),
            ..Default::default()
        };
        let (resolved_again, _) = apply_update(&tech, &reopened, &dto, Utc::now());
        assert_eq!(resolved_again.resolved_at, Some(first));
    }

    #[test]
    fn closed_at_is_stamped_on_first_close() {
        let tech = make_user(UserRole::ItAdmin);
        let ticket = make_ticket();
        let now = Utc::now();

        let dto = UpdateTicketDto {
            status: Some(TicketStatus::Closed),
            ..Default::default()
        };
        let (closed, _) = apply_update(&tech, &ticket, &dto, now);
        assert_eq!(closed.closed_at, Some(now));
        assert_eq!(closed.resolved_at, None);
    }

    #[test]
    fn explicit_null_unassigns() {
        let admin = make_user(UserRole::ItAdmin);
        let mut ticket = make_ticket();
        let assignee = Uuid::new_v4();
        ticket.assigned_to = Some(assignee);

        let dto = UpdateTicketDto {
            assigned_to: Some(None),
            ..Default::default()
        };
        let (updated, changes) = apply_update(&admin, &ticket, &dto, Utc::now());

        assert_eq!(updated.assigned_to, None);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_value, Some(assignee.to_string()));
        assert_eq!(changes[0].new_value, None);
    }

    #[test]
    fn assignment_to_same_target_is_a_no_op() {
        let mut ticket = make_ticket();
        let assignee = Uuid::new_v4();
        ticket.assigned_to = Some(assignee);

        let (updated, change) = apply_assignment(&ticket, Some(assignee));
        assert_eq!(updated.assigned_to, Some(assignee));
        assert!(change.is_none());
    }
}
