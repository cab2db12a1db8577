// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`nexis-core`)
//!
//! HTTP surface that translates external requests into dispatcher calls.
//! **No routing decisions live here**; all of them are made by
//! `crate::application::dispatcher`.
//!
//! | Module | Transport | Description |
//! |--------|-----------|-------------|
//! | [`api`] | HTTP (Axum) | `GET /`, `POST /chat`, `GET /models` |

pub mod api;
