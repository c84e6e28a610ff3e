// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod bridges;
pub mod definitions;
pub mod fetcher;
pub mod holders;
pub mod price_feed;
