// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

// =============================================================================
// LEDGER CONSTANTS
// =============================================================================

/// Reserved address the bridge registry uses for a chain's native coin.
pub const NATIVE_COIN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// First element of an on-ledger definition that marks an autonomous agent.
pub const AUTONOMOUS_AGENT_MARKER: &str = "autonomous agent";

pub const DEFAULT_SOURCE_NETWORK: &str = "Kava";
pub const DEFAULT_DESTINATION_NETWORK: &str = "Obyte";

// =============================================================================
// ENDPOINTS
// =============================================================================

pub const BRIDGE_REGISTRY_MAINNET: &str = "https://counterstake.org/api";
pub const BRIDGE_REGISTRY_TESTNET: &str = "https://testnet-bridge.counterstake.org/api";
pub const EXPLORER_MAINNET: &str = "https://explorer.obyte.org/api";
pub const EXPLORER_TESTNET: &str = "https://testnetexplorer.obyte.org/api";
pub const COINGECKO_API: &str = "https://api.coingecko.com/api/v3";

// =============================================================================
// PIPELINE TUNING
// =============================================================================

pub const FETCH_MAX_RETRIES: u32 = 6;
pub const FETCH_RETRY_DELAY_SECS: u64 = 30;
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Next-cycle delay windows, in minutes
pub const SUCCESS_DELAY_MIN_MINUTES: u64 = 0;
pub const SUCCESS_DELAY_MAX_MINUTES: u64 = 60;
pub const FAILURE_DELAY_MIN_MINUTES: u64 = 5;
pub const FAILURE_DELAY_MAX_MINUTES: u64 = 10;

// Rows per multi-row INSERT; keeps bind counts well under SQLite's variable limit.
pub const BULK_INSERT_CHUNK: usize = 500;

pub fn is_native_coin(token_address: &str) -> bool {
    token_address == NATIVE_COIN_ADDRESS
}
