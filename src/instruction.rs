use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::error::LotteryError;
use crate::vrf::VrfConfig;

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum LotteryInstruction {
    /// Initialize a lottery account
    ///
    /// Accounts expected:
    /// 0. `[signer]` The authority paying for and initializing the lottery
    /// 1. `[writable]` The lottery account, program-owned, sized with
    ///    `Lottery::space(max_players)`, not yet initialized
    Initialize {
        /// Minimum payment per entry in lamports
        entrance_fee: u64,
        /// Minimum seconds between round start and upkeep eligibility
        interval: i64,
        /// Capacity of the players list
        max_players: u32,
        /// Oracle configuration
        vrf: VrfConfig,
    },

    /// Enter the current round by paying at least the entrance fee
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The player, pays `amount` into the pool
    /// 1. `[writable]` The lottery account
    /// 2. `[]` The system program
    Enter {
        /// Lamports paid; the full amount joins the pool
        amount: u64,
    },

    /// Evaluate the upkeep predicate and log the result. Read-only; meant to
    /// be polled by an automation agent through transaction simulation.
    ///
    /// Accounts expected:
    /// 0. `[]` The lottery account
    CheckUpkeep,

    /// Close entries and request randomness (step 1 of round completion)
    ///
    /// Accounts expected:
    /// 0. `[signer]` Any caller; unauthorized calls are harmless because the
    ///    upkeep predicate is re-checked here
    /// 1. `[writable]` The lottery account
    PerformUpkeep,

    /// Deliver the random value and settle the round (step 2)
    ///
    /// Accounts expected:
    /// 0. `[signer]` The configured oracle authority
    /// 1. `[writable]` The lottery account
    /// 2. `[writable]` The winner, must match the drawn player
    FulfillRandomness {
        /// Identifier minted by the matching PerformUpkeep
        request_id: u64,
        /// The verifiable random value
        random_value: u64,
    },
}

impl LotteryInstruction {
    /// Unpacks a byte buffer into a LotteryInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| LotteryError::InvalidInstructionData.into())
    }

    /// Packs a LotteryInstruction into a byte buffer
    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        borsh::to_vec(self).map_err(|_| LotteryError::InvalidInstructionData.into())
    }
}

/// Create an initialize instruction
pub fn initialize(
    program_id: &Pubkey,
    authority: &Pubkey,
    lottery: &Pubkey,
    entrance_fee: u64,
    interval: i64,
    max_players: u32,
    vrf: VrfConfig,
) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::Initialize {
        entrance_fee,
        interval,
        max_players,
        vrf,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*authority, true),
        AccountMeta::new(*lottery, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create an enter instruction
pub fn enter(
    program_id: &Pubkey,
    player: &Pubkey,
    lottery: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::Enter { amount }.pack()?;

    let accounts = vec![
        AccountMeta::new(*player, true),
        AccountMeta::new(*lottery, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create a check_upkeep instruction
pub fn check_upkeep(program_id: &Pubkey, lottery: &Pubkey) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::CheckUpkeep.pack()?;

    let accounts = vec![AccountMeta::new_readonly(*lottery, false)];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create a perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    caller: &Pubkey,
    lottery: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::PerformUpkeep.pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*caller, true),
        AccountMeta::new(*lottery, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create a fulfill_randomness instruction
pub fn fulfill_randomness(
    program_id: &Pubkey,
    oracle_authority: &Pubkey,
    lottery: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_value: u64,
) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::FulfillRandomness {
        request_id,
        random_value,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*oracle_authority, true),
        AccountMeta::new(*lottery, false),
        AccountMeta::new(*winner, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
