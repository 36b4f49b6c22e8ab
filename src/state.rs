use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    borsh1::try_from_slice_unchecked, clock::UnixTimestamp, program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::vrf::VrfConfig;

/// Round state of the lottery
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LotteryState {
    /// Entries are accepted
    Open,
    /// A randomness request is in flight, entries are rejected
    Calculating,
}

/// Result of evaluating the upkeep predicate, one flag per conjunct
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub is_open: bool,
    pub interval_elapsed: bool,
    pub has_balance: bool,
    pub has_players: bool,
}

impl UpkeepCheck {
    pub fn needed(&self) -> bool {
        self.is_open && self.interval_elapsed && self.has_balance && self.has_players
    }
}

/// Lottery account data
///
/// A single account per lottery instance. The players list is dynamic, so the
/// account is allocated with capacity for `max_players` entries and the data
/// is borsh-encoded into that fixed buffer.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct Lottery {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Current round state
    pub state: LotteryState,
    /// Minimum payment per entry, in lamports
    pub entrance_fee: u64,
    /// Minimum seconds between round start and upkeep eligibility
    pub interval: i64,
    /// Round anchor: set at initialization and at every settlement
    pub last_timestamp: UnixTimestamp,
    /// Entrants of the current round, in insertion order, duplicates allowed
    pub players: Vec<Pubkey>,
    /// Capacity bound for `players`, fixed at initialization
    pub max_players: u32,
    /// Winner of the most recent settled round
    pub recent_winner: Option<Pubkey>,
    /// Identifier of the in-flight randomness request while calculating
    pub pending_request_id: Option<u64>,
    /// Monotonic counter the request identifiers are minted from
    pub request_counter: u64,
    /// Oracle configuration, fixed at initialization
    pub vrf: VrfConfig,
}

impl Lottery {
    /// Serialized size of a lottery account with room for `max_players`
    pub fn space(max_players: u32) -> usize {
        1 // is_initialized
            + 1 // state
            + 8 // entrance_fee
            + 8 // interval
            + 8 // last_timestamp
            + 4 + 32 * max_players as usize // players
            + 4 // max_players
            + 1 + 32 // recent_winner
            + 1 + 8 // pending_request_id
            + 8 // request_counter
            + VrfConfig::LEN
    }

    /// Evaluate the upkeep predicate. Pure: callers pass the current time and
    /// the prize pool (lamports above the rent floor).
    pub fn check_upkeep(&self, now: UnixTimestamp, prize_pool: u64) -> UpkeepCheck {
        UpkeepCheck {
            is_open: self.state == LotteryState::Open,
            interval_elapsed: now.saturating_sub(self.last_timestamp) >= self.interval,
            has_balance: prize_pool > 0,
            has_players: !self.players.is_empty(),
        }
    }

    /// Deserialize a lottery account, requiring it to be initialized
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let lottery = Self::unpack_unchecked(data)?;
        if !lottery.is_initialized {
            return Err(ProgramError::UninitializedAccount);
        }
        Ok(lottery)
    }

    /// Deserialize a lottery account without the initialization check
    pub fn unpack_unchecked(data: &[u8]) -> Result<Self, ProgramError> {
        try_from_slice_unchecked::<Lottery>(data).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Serialize into the account buffer, which may be larger than the data
    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        let mut writer = dst;
        self.serialize(&mut writer)
            .map_err(|_| ProgramError::AccountDataTooSmall)
    }
}
