// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use serde_json::json;
use yare::parameterized;

fn ticket(id: &str) -> Ticket {
    Ticket {
        id: id.to_string(),
        title: "Pump leaking".into(),
        description: Some("Seal worn on P-101".into()),
        status: TicketStatus::Open,
        priority: Priority::High,
        asset_id: Some("P-101".into()),
        location: Some("Plant 2".into()),
        assigned_to: Some("op-1".into()),
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        updated_at: None,
        extra: serde_json::Map::new(),
    }
}

#[parameterized(
    open = { "open", TicketStatus::Open },
    in_progress = { "in_progress", TicketStatus::InProgress },
    dashed = { "in-progress", TicketStatus::InProgress },
    on_hold = { "ON_HOLD", TicketStatus::OnHold },
    closed = { "closed", TicketStatus::Closed },
)]
fn status_parses(input: &str, expected: TicketStatus) {
    assert_eq!(input.parse::<TicketStatus>().unwrap(), expected);
}

#[test]
fn status_parse_rejects_unknown() {
    assert!("lost".parse::<TicketStatus>().is_err());
}

#[test]
fn priority_orders_by_urgency() {
    assert!(Priority::Urgent > Priority::High);
    assert!(Priority::High > Priority::Medium);
    assert!(Priority::Medium > Priority::Low);
}

#[test]
fn unknown_fields_are_preserved() {
    let raw = json!({
        "id": "t1",
        "title": "Check valve",
        "status": "assigned",
        "createdAt": "2026-03-01T08:00:00Z",
        "workOrderNumber": "WO-991"
    });
    let t: Ticket = serde_json::from_value(raw).unwrap();
    assert_eq!(t.priority, Priority::Medium);
    assert_eq!(t.extra["workOrderNumber"], "WO-991");

    let back = serde_json::to_value(&t).unwrap();
    assert_eq!(back["workOrderNumber"], "WO-991");
}

#[test]
fn merge_overwrites_present_fields() {
    let mut cached = ticket("t1");
    let mut patch = ticket("t1");
    patch.status = TicketStatus::InProgress;
    patch.description = None;
    patch.extra.insert("signature".into(), json!("sig-1"));

    cached.merge(patch);

    assert_eq!(cached.status, TicketStatus::InProgress);
    assert_eq!(cached.description.as_deref(), Some("Seal worn on P-101"));
    assert_eq!(cached.extra["signature"], "sig-1");
}

#[test]
fn corrective_from_ticket_copies_context() {
    let t = ticket("t7");
    let req = CorrectiveRequest::from_ticket(&t, "op-1", None);
    assert_eq!(req.ticket_id, "t7");
    assert_eq!(req.title, "Corrective: Pump leaking");
    assert_eq!(req.priority, Priority::High);
    assert_eq!(req.asset_id.as_deref(), Some("P-101"));
    assert_eq!(req.description.as_deref(), Some("Seal worn on P-101"));
    assert_eq!(req.requested_by, "op-1");
}

#[test]
fn corrective_note_replaces_description() {
    let t = ticket("t7");
    let req = CorrectiveRequest::from_ticket(&t, "op-1", Some("Replace seal kit".into()));
    assert_eq!(req.description.as_deref(), Some("Replace seal kit"));
}
