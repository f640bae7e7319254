// db/ticketdb.rs
use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use super::db::DBClient;

use crate::{
    dtos::ticketdtos::{TicketQueryDto, TicketStats},
    models::ticketmodel::*,
};

const TICKET_COLUMNS: &str = r#"
    t.id, t.title, t.description, t.category, t.priority, t.status,
    t.requester_id, t.assigned_to, t.resolved_at, t.closed_at,
    t.created_at, t.updated_at,
    r.first_name || ' ' || r.last_name AS requester_name,
    r.email AS requester_email,
    a.first_name || ' ' || a.last_name AS assignee_name,
    a.email AS assignee_email
"#;

#[async_trait]
pub trait TicketExt {
    async fn save_ticket(
        &self,
        requester_id: Uuid,
        title: String,
        description: String,
        category: TicketCategory,
        priority: TicketPriority,
    ) -> Result<Ticket, sqlx::Error>;

    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Option<Ticket>, sqlx::Error>;

    async fn get_ticket_with_parties(
        &self,
        ticket_id: Uuid,
    ) -> Result<Option<TicketWithParties>, sqlx::Error>;

    async fn get_tickets(
        &self,
        query: &TicketQueryDto,
        requester_scope: Option<Uuid>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<TicketWithParties>, sqlx::Error>;

    async fn count_tickets(
        &self,
        query: &TicketQueryDto,
        requester_scope: Option<Uuid>,
    ) -> Result<i64, sqlx::Error>;

    /// Persist the mutable fields of a ticket row in one statement.
    async fn update_ticket_row(&self, ticket: &Ticket) -> Result<Ticket, sqlx::Error>;

    async fn delete_ticket(&self, ticket_id: Uuid) -> Result<u64, sqlx::Error>;

    async fn ticket_stats(&self, caller_id: Uuid) -> Result<TicketStats, sqlx::Error>;

    async fn append_ticket_update(
        &self,
        ticket_id: Uuid,
        updated_by: Uuid,
        update_type: UpdateType,
        old_value: Option<String>,
        new_value: Option<String>,
        comment: Option<String>,
    ) -> Result<TicketUpdate, sqlx::Error>;

    /// History for a ticket, oldest entry first, with the updater joined in.
    async fn get_ticket_updates(
        &self,
        ticket_id: Uuid,
    ) -> Result<Vec<TicketUpdateWithUser>, sqlx::Error>;

    async fn get_ticket_update_with_user(
        &self,
        update_id: Uuid,
    ) -> Result<Option<TicketUpdateWithUser>, sqlx::Error>;
}

#[async_trait]
impl TicketExt for DBClient {
    async fn save_ticket(
        &self,
        requester_id: Uuid,
        title: String,
        description: String,
        category: TicketCategory,
        priority: TicketPriority,
    ) -> Result<Ticket, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (requester_id, title, description, category, priority, status)
            VALUES ($1, $2, $3, $4, $5, 'open'::ticket_status)
            RETURNING id, title, description, category, priority, status,
                      requester_id, assigned_to, resolved_at, closed_at,
                      created_at, updated_at
            "#,
        )
        .bind(requester_id)
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(priority)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Option<Ticket>, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(
            r#"
            SELECT id, title, description, category, priority, status,
                   requester_id, assigned_to, resolved_at, closed_at,
                   created_at, updated_at
            FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_ticket_with_parties(
        &self,
        ticket_id: Uuid,
    ) -> Result<Option<TicketWithParties>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {TICKET_COLUMNS}
            FROM tickets t
            JOIN users r ON r.id = t.requester_id
            LEFT JOIN users a ON a.id = t.assigned_to
            WHERE t.id = $1
            "#
        );

        sqlx::query_as::<_, TicketWithParties>(&sql)
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_tickets(
        &self,
        query: &TicketQueryDto,
        requester_scope: Option<Uuid>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<TicketWithParties>, sqlx::Error> {
        let offset = (page - 1) as i64 * limit as i64;

        let sql = format!(
            r#"
            SELECT {TICKET_COLUMNS}
            FROM tickets t
            JOIN users r ON r.id = t.requester_id
            LEFT JOIN users a ON a.id = t.assigned_to
            WHERE ($1::uuid IS NULL OR t.requester_id = $1)
              AND ($2::ticket_status IS NULL OR t.status = $2)
              AND ($3::ticket_category IS NULL OR t.category = $3)
              AND ($4::ticket_priority IS NULL OR t.priority = $4)
              AND ($5::uuid IS NULL OR t.assigned_to = $5)
              AND ($6::varchar IS NULL
                   OR t.title ILIKE '%' || $6 || '%'
                   OR t.description ILIKE '%' || $6 || '%')
            ORDER BY t.created_at DESC
            LIMIT $7 OFFSET $8
            "#
        );

        sqlx::query_as::<_, TicketWithParties>(&sql)
            .bind(requester_scope)
            .bind(query.status)
            .bind(query.category)
            .bind(query.priority)
            .bind(query.assigned_to)
            .bind(query.search.as_deref())
            .bind(limit as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn count_tickets(
        &self,
        query: &TicketQueryDto,
        requester_scope: Option<Uuid>,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tickets t
            WHERE ($1::uuid IS NULL OR t.requester_id = $1)
              AND ($2::ticket_status IS NULL OR t.status = $2)
              AND ($3::ticket_category IS NULL OR t.category = $3)
              AND ($4::ticket_priority IS NULL OR t.priority = $4)
              AND ($5::uuid IS NULL OR t.assigned_to = $5)
              AND ($6::varchar IS NULL
                   OR t.title ILIKE '%' || $6 || '%'
                   OR t.description ILIKE '%' || $6 || '%')
            "#,
        )
        .bind(requester_scope)
        .bind(query.status)
        .bind(query.category)
        .bind(query.priority)
        .bind(query.assigned_to)
        .bind(query.search.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn update_ticket_row(&self, ticket: &Ticket) -> Result<Ticket, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET title = $2,
                description = $3,
                category = $4,
                priority = $5,
                status = $6,
                assigned_to = $7,
                resolved_at = $8,
                closed_at = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, category, priority, status,
                      requester_id, assigned_to, resolved_at, closed_at,
                      created_at, updated_at
            "#,
        )
        .bind(ticket.id)
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(ticket.category)
        .bind(ticket.priority)
        .bind(ticket.status)
        .bind(ticket.assigned_to)
        .bind(ticket.resolved_at)
        .bind(ticket.closed_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_ticket(&self, ticket_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(ticket_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ticket_stats(&self, caller_id: Uuid) -> Result<TicketStats, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'open') AS open,
                   COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                   COUNT(*) FILTER (WHERE status = 'resolved') AS resolved,
                   COUNT(*) FILTER (WHERE status = 'closed') AS closed,
                   COUNT(*) FILTER (
                       WHERE assigned_to IS NULL
                         AND status IN ('open', 'in_progress')
                   ) AS unassigned,
                   COUNT(*) FILTER (WHERE assigned_to = $1) AS assigned_to_me
            FROM tickets
            "#,
        )
        .bind(caller_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(TicketStats {
            total: row.try_get("total")?,
            open: row.try_get("open")?,
            in_progress: row.try_get("in_progress")?,
            resolved: row.try_get("resolved")?,
            closed: row.try_get("closed")?,
            unassigned: row.try_get("unassigned")?,
            assigned_to_me: row.try_get("assigned_to_me")?,
        })
    }

    async fn append_ticket_update(
        &self,
        ticket_id: Uuid,
        updated_by: Uuid,
        update_type: UpdateType,
        old_value: Option<String>,
        new_value: Option<String>,
        comment: Option<String>,
    ) -> Result<TicketUpdate, sqlx::Error> {
        sqlx::query_as::<_, TicketUpdate>(
            r#"
            INSERT INTO ticket_updates (ticket_id, updated_by, update_type, old_value, new_value, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, ticket_id, updated_by, update_type, old_value, new_value, comment, created_at
            "#,
        )
        .bind(ticket_id)
        .bind(updated_by)
        .bind(update_type)
        .bind(old_value)
        .bind(new_value)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_ticket_updates(
        &self,
        ticket_id: Uuid,
    ) -> Result<Vec<TicketUpdateWithUser>, sqlx::Error> {
        sqlx::query_as::<_, TicketUpdateWithUser>(
            r#"
            SELECT u.id, u.ticket_id, u.updated_by, u.update_type,
                   u.old_value, u.new_value, u.comment, u.created_at,
                   us.first_name || ' ' || us.last_name AS updater_name,
                   us.email AS updater_email
            FROM ticket_updates u
            JOIN users us ON us.id = u.updated_by
            WHERE u.ticket_id = $1
            ORDER BY u.created_at ASC
            "#,
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_ticket_update_with_user(
        &self,
        update_id: Uuid,
    ) -> Result<Option<TicketUpdateWithUser>, sqlx::Error> {
        sqlx::query_as::<_, TicketUpdateWithUser>(
            r#"
            SELECT u.id, u.ticket_id, u.updated_by, u.update_type,
                   u.old_value, u.new_value, u.comment, u.created_at,
                   us.first_name || ' ' || us.last_name AS updater_name,
                   us.email AS updater_email
            FROM ticket_updates u
            JOIN users us ON us.id = u.updated_by
            WHERE u.id = $1
            "#,
        )
        .bind(update_id)
        .fetch_optional(&self.pool)
        .await
    }
}
