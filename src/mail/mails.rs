// src/mail/mails.rs
//
// Subject/body builders for every helpdesk notification. These are pure
// string builders; queueing and delivery live in the notification
// dispatcher.
use crate::models::ticketmodel::{Ticket, TicketStatus};

fn ticket_panel(rows: &[(&str, String)]) -> String {
    let mut panel = String::from(
        "<div style=\"border: 1px solid #ddd; padding: 15px; margin: 15px 0; border-radius: 5px;\">",
    );
    for (label, value) in rows {
        panel.push_str(&format!("<p><strong>{}:</strong> {}</p>", label, value));
    }
    panel.push_str("</div>");
    panel
}

fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

fn footer() -> &'static str {
    "<p>You can view the full details by logging into the support portal.</p>\
     <p>Thank you,<br>IT Support Team</p>"
}

pub fn ticket_created_email(ticket: &Ticket, requester_name: &str) -> (String, String) {
    let subject = format!("New Support Ticket Created - #{}", ticket.id);
    let panel = ticket_panel(&[
        ("Title", ticket.title.clone()),
        ("Category", ticket.category.to_str().to_string()),
        ("Priority", ticket.priority.to_str().to_string()),
        ("Status", ticket.status.to_str().to_string()),
        ("Description", ticket.description.clone()),
    ]);
    let body = format!(
        "<h2>New Support Ticket Created</h2>\
         <p>Hello {},</p>\
         <p>Your support ticket has been successfully created. Here are the details:</p>\
         {}\
         <p>Our IT team will review your ticket and respond as soon as possible.</p>\
         {}",
        first_name(requester_name),
        panel,
        footer()
    );
    (subject, body)
}

pub fn ticket_status_update_email(
    ticket: &Ticket,
    requester_name: &str,
    old_status: TicketStatus,
    new_status: TicketStatus,
    updater_name: &str,
) -> (String, String) {
    let subject = format!(
        "Support Ticket #{} Status Updated - {}",
        ticket.id,
        new_status.to_str()
    );
    let panel = ticket_panel(&[
        ("Title", ticket.title.clone()),
        ("Previous Status", old_status.to_str().to_string()),
        ("New Status", new_status.to_str().to_string()),
        ("Updated by", updater_name.to_string()),
    ]);
    let body = format!(
        "<h2>Ticket Status Update</h2>\
         <p>Hello {},</p>\
         <p>The status of your support ticket has been updated:</p>\
         {}\
         {}",
        first_name(requester_name),
        panel,
        footer()
    );
    (subject, body)
}

/// Email to the requester when their ticket gets an assignee.
pub fn ticket_assigned_requester_email(
    ticket: &Ticket,
    requester_name: &str,
    assignee_name: &str,
) -> (String, String) {
    let subject = format!("Your Support Ticket #{} Has Been Assigned", ticket.id);
    let panel = ticket_panel(&[
        ("Title", ticket.title.clone()),
        ("Assigned to", assignee_name.to_string()),
        ("Status", ticket.status.to_str().to_string()),
    ]);
    let body = format!(
        "<h2>Ticket Assignment Update</h2>\
         <p>Hello {},</p>\
         <p>Your support ticket #{} has been assigned to {}.</p>\
         {}\
         <p>Our team member will be working on resolving your issue.</p>\
         {}",
        first_name(requester_name),
        ticket.id,
        assignee_name,
        panel,
        footer()
    );
    (subject, body)
}

/// Email to the IT member who just got the ticket.
pub fn ticket_assigned_assignee_email(
    ticket: &Ticket,
    assignee_name: &str,
    requester_name: &str,
    requester_email: &str,
) -> (String, String) {
    let subject = format!("Support Ticket #{} Assigned to You", ticket.id);
    let panel = ticket_panel(&[
        ("Title", ticket.title.clone()),
        (
            "Requester",
            format!("{} ({})", requester_name, requester_email),
        ),
        ("Category", ticket.category.to_str().to_string()),
        ("Priority", ticket.priority.to_str().to_string()),
        ("Description", ticket.description.clone()),
    ]);
    let body = format!(
        "<h2>New Ticket Assignment</h2>\
         <p>Hello {},</p>\
         <p>A support ticket has been assigned to you:</p>\
         {}\
         <p>Please log into the support portal to view full details and begin working on this ticket.</p>\
         <p>Thank you,<br>IT Support Team</p>",
        first_name(assignee_name), panel
    );
    (subject, body)
}

pub fn ticket_comment_email(
    ticket: &Ticket,
    requester_name: &str,
    commenter_name: &str,
    comment: &str,
) -> (String, String) {
    let subject = format!("New Comment on Support Ticket #{}", ticket.id);
    let panel = ticket_panel(&[
        ("Title", ticket.title.clone()),
        ("Comment by", commenter_name.to_string()),
        ("Comment", comment.to_string()),
    ]);
    let body = format!(
        "<h2>New Comment Added</h2>\
         <p>Hello {},</p>\
         <p>A new comment has been added to your support ticket:</p>\
         {}\
         <p>You can reply by logging into the support portal.</p>\
         <p>Thank you,<br>IT Support Team</p>",
        first_name(requester_name), panel
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ticketmodel::{TicketCategory, TicketPriority};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_ticket() -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            title: "Printer jam".to_string(),
            description: "The 3rd floor printer keeps jamming.".to_string(),
            category: TicketCategory::Hardware,
            priority: TicketPriority::Medium,
            status: TicketStatus::Open,
            requester_id: Uuid::new_v4(),
            assigned_to: None,
            resolved_at: None,
            closed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn subjects_carry_the_ticket_id() {
        let ticket = sample_ticket();
        let (subject, body) = ticket_created_email(&ticket, "Jane");
        assert!(subject.contains(&ticket.id.to_string()));
        assert!(body.contains("Printer jam"));
        assert!(body.contains("Hello Jane"));
    }

    #[test]
    fn greetings_use_the_first_name_only() {
        let ticket = sample_ticket();
        let (_, body) = ticket_created_email(&ticket, "Jane Doe");
        assert!(body.contains("Hello Jane,"));
        assert!(!body.contains("Hello Jane Doe"));

        let (_, body) = ticket_assigned_assignee_email(&ticket, "Ivan IT", "Jane Doe", "jane@example.com");
        assert!(body.contains("Hello Ivan,"));
        // The requester still shows in full in the details panel.
        assert!(body.contains("Jane Doe (jane@example.com)"));
    }

    #[test]
    fn status_email_shows_both_statuses() {
        let ticket = sample_ticket();
        let (_, body) = ticket_status_update_email(
            &ticket,
            "Jane",
            TicketStatus::Open,
            TicketStatus::Resolved,
            "Ada Admin",
        );
        assert!(body.contains("open"));
        assert!(body.contains("resolved"));
        assert!(body.contains("Ada Admin"));
    }

    #[test]
    fn comment_email_includes_the_comment_text() {
        let ticket = sample_ticket();
        let (_, body) = ticket_comment_email(&ticket, "Jane", "Ivan IT", "still broken");
        assert!(body.contains("still broken"));
    }
}
