// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

pub mod dispatcher;

// Re-export use cases for convenience
pub use dispatcher::{ChatDispatcher, DispatchError};
