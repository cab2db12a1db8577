// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

pub mod llm;
