use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::db::db::DBClient;
use crate::db::ticketdb::TicketExt;
use crate::db::userdb::UserExt;
use crate::dtos::ticketdtos::{CommentDto, CreateTicketDto, TicketQueryDto, TicketStats, UpdateTicketDto};
use crate::mail::mails;
use crate::models::ticketmodel::{Ticket, TicketUpdateWithUser, TicketWithParties, UpdateType};
use crate::models::usermodel::{User, UserRole};

use super::error::ServiceError;
use super::lifecycle::{self, TicketChange};
use super::notification_service::NotificationDispatcher;
use super::policy;

/// Orchestrates ticket operations: authorization, lifecycle transitions,
/// the audit trail, and queueing of email notifications.
#[derive(Debug, Clone)]
pub struct TicketService {
    db_client: Arc<DBClient>,
    dispatcher: NotificationDispatcher,
}

impl TicketService {
    pub fn new(db_client: Arc<DBClient>, dispatcher: NotificationDispatcher) -> Self {
        TicketService {
            db_client,
            dispatcher,
        }
    }

    pub async fn create_ticket(
        &self,
        actor: &User,
        dto: CreateTicketDto,
    ) -> Result<TicketWithParties, ServiceError> {
        dto.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let ticket = self
            .db_client
            .save_ticket(
                actor.id,
                dto.title,
                dto.description,
                dto.category,
                dto.priority.unwrap_or_default(),
            )
            .await?;

        let (subject, body) = mails::ticket_created_email(&ticket, &actor.full_name());
        self.dispatcher
            .submit(ticket.id, &actor.email, &subject, &body)
            .await;

        self.ticket_with_parties(ticket.id).await
    }

    pub async fn get_ticket(
        &self,
        actor: &User,
        ticket_id: Uuid,
    ) -> Result<(TicketWithParties, Vec<TicketUpdateWithUser>), ServiceError> {
        let ticket = self.require_ticket(ticket_id).await?;

        if !policy::can_view_ticket(actor, &ticket) {
            return Err(ServiceError::Forbidden(
                "You do not have permission to view this ticket".to_string(),
            ));
        }

        let with_parties = self.ticket_with_parties(ticket_id).await?;
        let updates = self.db_client.get_ticket_updates(ticket_id).await?;

        Ok((with_parties, updates))
    }

    /// End users only ever see their own tickets, whatever filters they
    /// send. IT staff may scope by any requester.
    pub async fn list_tickets(
        &self,
        actor: &User,
        query: &TicketQueryDto,
        page: u32,
        limit: usize,
    ) -> Result<(Vec<TicketWithParties>, i64), ServiceError> {
        let requester_scope = match actor.role {
            UserRole::EndUser => Some(actor.id),
            UserRole::ItUser | UserRole::ItAdmin => query.requester_id,
        };

        let tickets = self
            .db_client
            .get_tickets(query, requester_scope, page, limit)
            .await?;
        let total = self.db_client.count_tickets(query, requester_scope).await?;

        Ok((tickets, total))
    }

    /// Authorization runs before payload validation so an outsider gets
    /// Forbidden even for a malformed body.
    pub async fn update_ticket(
        &self,
        actor: &User,
        ticket_id: Uuid,
        dto: UpdateTicketDto,
    ) -> Result<TicketWithParties, ServiceError> {
        let ticket = self.require_ticket(ticket_id).await?;

        if !policy::can_edit_ticket(actor, &ticket) {
            return Err(ServiceError::Forbidden(
                "You do not have permission to update this ticket".to_string(),
            ));
        }

        dto.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        if policy::can_edit_privileged_fields(actor) {
            if let Some(Some(assignee_id)) = dto.assigned_to {
                if Some(assignee_id) != ticket.assigned_to {
                    self.require_assignable(assignee_id).await?;
                }
            }
        }

        let (updated, changes) = lifecycle::apply_update(actor, &ticket, &dto, Utc::now());
        let updated = self.db_client.update_ticket_row(&updated).await?;

        for change in &changes {
            self.db_client
                .append_ticket_update(
                    ticket_id,
                    actor.id,
                    change.update_type,
                    change.old_value.clone(),
                    change.new_value.clone(),
                    None,
                )
                .await?;
        }

        let with_parties = self.ticket_with_parties(ticket_id).await?;
        self.notify_changes(actor, &ticket, &updated, &changes, &with_parties)
            .await;

        Ok(with_parties)
    }

    pub async fn assign_ticket(
        &self,
        actor: &User,
        ticket_id: Uuid,
        target: Option<Uuid>,
    ) -> Result<TicketWithParties, ServiceError> {
        let ticket = self.require_ticket(ticket_id).await?;

        if !policy::can_assign(actor, target) {
            let message = match actor.role {
                UserRole::ItUser => "IT users can only assign tickets to themselves",
                _ => "You do not have permission to assign tickets",
            };
            return Err(ServiceError::Forbidden(message.to_string()));
        }

        if let Some(assignee_id) = target {
            self.require_assignable(assignee_id).await?;
        }

        let (updated, change) = lifecycle::apply_assignment(&ticket, target);
        let Some(change) = change else {
            return self.ticket_with_parties(ticket_id).await;
        };

        let updated = self.db_client.update_ticket_row(&updated).await?;
        self.db_client
            .append_ticket_update(
                ticket_id,
                actor.id,
                change.update_type,
                change.old_value.clone(),
                change.new_value.clone(),
                None,
            )
            .await?;

        let with_parties = self.ticket_with_parties(ticket_id).await?;
        self.notify_assignment(&updated, &with_parties).await;

        Ok(with_parties)
    }

    pub async fn add_comment(
        &self,
        actor: &User,
        ticket_id: Uuid,
        dto: CommentDto,
    ) -> Result<TicketUpdateWithUser, ServiceError> {
        let ticket = self.require_ticket(ticket_id).await?;

        if !policy::can_comment(actor, &ticket) {
            return Err(ServiceError::Forbidden(
                "You do not have permission to comment on this ticket".to_string(),
            ));
        }

        dto.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let update = self
            .db_client
            .append_ticket_update(
                ticket_id,
                actor.id,
                UpdateType::Comment,
                None,
                None,
                Some(dto.comment.clone()),
            )
            .await?;

        let with_parties = self.ticket_with_parties(ticket_id).await?;
        self.notify_comment(actor, &ticket, &dto.comment, &with_parties)
            .await;

        let saved = self
            .db_client
            .get_ticket_update_with_user(update.id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;

        Ok(saved)
    }

    pub async fn delete_ticket(&self, actor: &User, ticket_id: Uuid) -> Result<(), ServiceError> {
        if !policy::can_delete_ticket(actor) {
            return Err(ServiceError::Forbidden(
                "Only administrators can delete tickets".to_string(),
            ));
        }

        let deleted = self.db_client.delete_ticket(ticket_id).await?;
        if deleted == 0 {
            return Err(ServiceError::TicketNotFound(ticket_id));
        }

        Ok(())
    }

    pub async fn get_stats(&self, actor: &User) -> Result<TicketStats, ServiceError> {
        if !policy::can_view_stats(actor) {
            return Err(ServiceError::Forbidden(
                "You do not have permission to view ticket statistics".to_string(),
            ));
        }

        Ok(self.db_client.ticket_stats(actor.id).await?)
    }

    async fn require_ticket(&self, ticket_id: Uuid) -> Result<Ticket, ServiceError> {
        self.db_client
            .get_ticket(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))
    }

    async fn ticket_with_parties(&self, ticket_id: Uuid) -> Result<TicketWithParties, ServiceError> {
        self.db_client
            .get_ticket_with_parties(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))
    }

    async fn require_assignable(&self, assignee_id: Uuid) -> Result<User, ServiceError> {
        let assignee = self
            .db_client
            .get_user(Some(assignee_id), None)
            .await?
            .ok_or(ServiceError::UserNotFound(assignee_id))?;

        if !assignee.role.is_it_staff() || !assignee.is_active {
            return Err(ServiceError::Validation(
                "Assignee must be an active IT staff member".to_string(),
            ));
        }

        Ok(assignee)
    }

    async fn notify_changes(
        &self,
        actor: &User,
        before: &Ticket,
        after: &Ticket,
        changes: &[TicketChange],
        parties: &TicketWithParties,
    ) {
        for change in changes {
            match change.update_type {
                UpdateType::StatusChange => {
                    let (subject, body) = mails::ticket_status_update_email(
                        after,
                        &parties.requester_name,
                        before.status,
                        after.status,
                        &actor.full_name(),
                    );
                    self.dispatcher
                        .submit(after.id, &parties.requester_email, &subject, &body)
                        .await;
                }
                UpdateType::Assignment => {
                    self.notify_assignment(after, parties).await;
                }
                UpdateType::PriorityChange | UpdateType::Comment => {}
            }
        }
    }

    /// Unassignment notifies nobody; a new assignee means two emails,
    /// one to each party.
    async fn notify_assignment(&self, ticket: &Ticket, parties: &TicketWithParties) {
        let (Some(assignee_name), Some(assignee_email)) =
            (&parties.assignee_name, &parties.assignee_email)
        else {
            return;
        };

        let (subject, body) =
            mails::ticket_assigned_requester_email(ticket, &parties.requester_name, assignee_name);
        self.dispatcher
            .submit(ticket.id, &parties.requester_email, &subject, &body)
            .await;

        let (subject, body) = mails::ticket_assigned_assignee_email(
            ticket,
            assignee_name,
            &parties.requester_name,
            &parties.requester_email,
        );
        self.dispatcher
            .submit(ticket.id, assignee_email, &subject, &body)
            .await;
    }

    async fn notify_comment(
        &self,
        actor: &User,
        ticket: &Ticket,
        comment: &str,
        parties: &TicketWithParties,
    ) {
        // Requesters are not told about their own comments.
        if ticket.requester_id == actor.id {
            return;
        }

        let (subject, body) = mails::ticket_comment_email(
            ticket,
            &parties.requester_name,
            &actor.full_name(),
            comment,
        );
        self.dispatcher
            .submit(ticket.id, &parties.requester_email, &subject, &body)
            .await;
    }
}
