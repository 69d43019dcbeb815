// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fk_core::{
    CorrectiveRequest, JobKind, NewVacationRequest, Priority, QueuedJob, Ticket, TicketStatus,
    VacationRequestDto, VacationStatus, WorkOrderAck,
};

use super::remote::{Remote, RemoteError, RemoteFuture};

/// Fixed instant used as "now" in tests.
pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A vacation request payload whose client ref is `client_ref`.
pub fn make_vacation_request(client_ref: &str) -> NewVacationRequest {
    NewVacationRequest {
        client_ref: client_ref.to_string(),
        operator_id: "op-7".to_string(),
        start_date: date(2026, 4, 6),
        end_date: date(2026, 4, 10),
        reason: Some("family".to_string()),
    }
}

/// A queued vacation job with a recognizable client ref.
pub fn make_test_job(client_ref: &str) -> QueuedJob {
    QueuedJob::new(
        JobKind::CreateVacationRequest,
        &make_vacation_request(client_ref),
        test_time(),
    )
    .unwrap()
}

/// A ticket updated `age_hours` before [`test_time`].
pub fn make_ticket(id: &str, title: &str, age_hours: i64) -> Ticket {
    let at = test_time() - chrono::Duration::hours(age_hours);
    Ticket {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        status: TicketStatus::Open,
        priority: Priority::Medium,
        asset_id: Some(format!("asset-{id}")),
        location: None,
        assigned_to: Some("op-7".to_string()),
        created_at: at,
        updated_at: Some(at),
        extra: Default::default(),
    }
}

/// A call observed by [`MockRemote`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateCorrective(CorrectiveRequest),
    CreateVacation(NewVacationRequest),
    SetStatus(String, VacationStatus),
    ListTickets(String),
    Health,
}

/// Mock remote for testing without a server.
///
/// Records every call. Failures are scripted per client ref (creates) or
/// globally through the offline switch.
#[derive(Default)]
pub struct MockRemote {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<String, RemoteError>>,
    tickets: Mutex<Option<Result<Vec<Ticket>, RemoteError>>>,
    status_failure: Mutex<Option<RemoteError>>,
    offline: AtomicBool,
    delay: Mutex<Option<Duration>>,
    next_id: AtomicUsize,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call fails with a network error while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Creates carrying `client_ref` fail with `error` until cleared.
    pub fn fail_ref(&self, client_ref: &str, error: RemoteError) {
        self.failures
            .lock()
            .unwrap()
            .insert(client_ref.to_string(), error);
    }

    pub fn clear_failure(&self, client_ref: &str) {
        self.failures.lock().unwrap().remove(client_ref);
    }

    /// Status updates fail with `error` while set.
    pub fn fail_status(&self, error: Option<RemoteError>) {
        *self.status_failure.lock().unwrap() = error;
    }

    pub fn set_tickets(&self, tickets: Result<Vec<Ticket>, RemoteError>) {
        *self.tickets.lock().unwrap() = Some(tickets);
    }

    /// Each call sleeps this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Client refs of the create calls, in call order.
    pub fn created_refs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateCorrective(r) => Some(r.client_ref),
                Call::CreateVacation(r) => Some(r.client_ref),
                _ => None,
            })
            .collect()
    }

    async fn enter(&self, call: Call, client_ref: Option<&str>) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(call);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("connection refused".to_string()));
        }
        if let Some(r) = client_ref {
            if let Some(err) = self.failures.lock().unwrap().get(r) {
                return Err(err.clone());
            }
        }
        Ok(())
    }

    fn server_id(&self) -> String {
        format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Remote for MockRemote {
    fn create_corrective<'a>(
        &'a self,
        request: &'a CorrectiveRequest,
    ) -> RemoteFuture<'a, Option<WorkOrderAck>> {
        Box::pin(async move {
            self.enter(
                Call::CreateCorrective(request.clone()),
                Some(&request.client_ref),
            )
            .await?;
            Ok(Some(WorkOrderAck {
                id: self.server_id(),
            }))
        })
    }

    fn create_vacation_request<'a>(
        &'a self,
        request: &'a NewVacationRequest,
    ) -> RemoteFuture<'a, Option<VacationRequestDto>> {
        Box::pin(async move {
            self.enter(
                Call::CreateVacation(request.clone()),
                Some(&request.client_ref),
            )
            .await?;
            Ok(Some(VacationRequestDto {
                id: self.server_id(),
                operator_id: request.operator_id.clone(),
                start_date: request.start_date,
                end_date: request.end_date,
                reason: request.reason.clone(),
                status: VacationStatus::Pending,
            }))
        })
    }

    fn set_vacation_status<'a>(
        &'a self,
        id: &'a str,
        status: VacationStatus,
    ) -> RemoteFuture<'a, Option<VacationRequestDto>> {
        Box::pin(async move {
            self.enter(Call::SetStatus(id.to_string(), status), None)
                .await?;
            if let Some(err) = self.status_failure.lock().unwrap().clone() {
                return Err(err);
            }
            Ok(None)
        })
    }

    fn list_tickets<'a>(&'a self, operator_id: &'a str) -> RemoteFuture<'a, Vec<Ticket>> {
        Box::pin(async move {
            self.enter(Call::ListTickets(operator_id.to_string()), None)
                .await?;
            self.tickets
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Ok(Vec::new()))
        })
    }

    fn health(&self) -> RemoteFuture<'_, ()> {
        Box::pin(async move { self.enter(Call::Health, None).await })
    }
}
