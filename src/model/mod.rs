// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Plain data types shared by every gateway component.

mod invocation;
mod worker;

pub use invocation::{
    ErrorKind, InvocationRequest, InvocationResponse, InvocationResult, Payload, ResponseStatus,
    WorkerOutput,
};
pub use worker::{WorkerDefinition, WorkerHandle, WorkerSummary};
