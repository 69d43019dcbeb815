// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fk-core: Shared library for the fieldkit sync engine
//!
//! This crate provides the data model and pure logic behind offline-first
//! field operations: queued jobs, vacation requests, tickets, and the
//! normalized read cache they are projected into.

pub mod clock;
pub mod error;
pub mod job;
pub mod projection;
pub mod query;
pub mod ticket;
pub mod vacation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use job::{new_job_id, JobId, JobKind, QueuedJob};
pub use projection::{Entity, Projection};
pub use query::{TicketQuery, TicketSort};
pub use ticket::{CorrectiveRequest, Priority, Ticket, TicketStatus, WorkOrderAck};
pub use vacation::{
    NewVacationRequest, SyncStatus, VacationRequest, VacationRequestDto, VacationStatus,
};
