//! Oracle-facing pieces of the randomness protocol.
//!
//! The program never verifies the randomness proof itself; that is the
//! oracle's job. The engine mints a request identifier when upkeep fires,
//! logs the request with the configured parameters, and accepts exactly one
//! fulfillment: a transaction signed by the configured oracle authority that
//! quotes the pending identifier back.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// Random words requested per round. One winner, one word.
pub const NUM_WORDS: u32 = 1;

/// Immutable oracle configuration, supplied once at initialization
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct VrfConfig {
    /// The only key whose signature is accepted on fulfillment
    pub oracle_authority: Pubkey,
    /// Gas-lane key the oracle serves the request on
    pub key_hash: [u8; 32],
    /// Billing subscription the request is charged to
    pub subscription_id: u64,
    /// Confirmation depth the oracle waits for before responding
    pub request_confirmations: u16,
    /// Gas budget for the oracle's callback transaction
    pub callback_gas_limit: u32,
}

impl VrfConfig {
    pub const LEN: usize = 32 + 32 + 8 + 2 + 4;
}

/// Winner slot for a round: uniform over entries via modulo.
///
/// Carries the known modulo bias when the random space is not a multiple of
/// the player count; acceptable for this domain.
pub fn winner_index(random_value: u64, total_players: u64) -> u64 {
    if total_players == 0 {
        return 0;
    }
    random_value % total_players
}
