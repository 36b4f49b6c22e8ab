use crate::error::LotteryError;
use crate::instruction::LotteryInstruction;
use crate::state::{Lottery, LotteryState};
use crate::vrf::{winner_index, VrfConfig, NUM_WORDS};

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

/// Lamports above the rent floor; the rent floor stays behind so the lottery
/// account survives across rounds.
fn prize_pool(lottery_info: &AccountInfo) -> Result<u64, ProgramError> {
    let rent_floor = Rent::get()?.minimum_balance(lottery_info.data_len());
    Ok(lottery_info.lamports().saturating_sub(rent_floor))
}

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = LotteryInstruction::unpack(instruction_data)?;

        match instruction {
            LotteryInstruction::Initialize {
                entrance_fee,
                interval,
                max_players,
                vrf,
            } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(accounts, entrance_fee, interval, max_players, vrf, program_id)
            }
            LotteryInstruction::Enter { amount } => {
                msg!("Instruction: Enter");
                Self::process_enter(accounts, amount, program_id)
            }
            LotteryInstruction::CheckUpkeep => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(accounts, program_id)
            }
            LotteryInstruction::PerformUpkeep => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(accounts, program_id)
            }
            LotteryInstruction::FulfillRandomness {
                request_id,
                random_value,
            } => {
                msg!("Instruction: Fulfill Randomness");
                Self::process_fulfill_randomness(accounts, request_id, random_value, program_id)
            }
        }
    }

    /// Process the Initialize instruction
    ///
    /// Writes the immutable configuration and opens the first round. The
    /// lottery account must be pre-created with program ownership and
    /// capacity for `max_players` entries.
    fn process_initialize(
        accounts: &[AccountInfo],
        entrance_fee: u64,
        interval: i64,
        max_players: u32,
        vrf: VrfConfig,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;

        if !authority_info.is_signer {
            msg!("Authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        if entrance_fee == 0 {
            msg!("Entrance fee must be greater than zero");
            return Err(ProgramError::InvalidArgument);
        }
        if interval <= 0 {
            msg!("Interval must be greater than zero");
            return Err(ProgramError::InvalidArgument);
        }
        if max_players == 0 {
            msg!("Max players must be greater than zero");
            return Err(ProgramError::InvalidArgument);
        }

        if lottery_info.data_len() < Lottery::space(max_players) {
            msg!(
                "Lottery account too small: need {} bytes for {} players",
                Lottery::space(max_players),
                max_players
            );
            return Err(ProgramError::AccountDataTooSmall);
        }

        let existing = Lottery::unpack_unchecked(&lottery_info.data.borrow())?;
        if existing.is_initialized {
            msg!("Lottery account is already initialized");
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        let clock = Clock::get()?;

        let lottery = Lottery {
            is_initialized: true,
            state: LotteryState::Open,
            entrance_fee,
            interval,
            last_timestamp: clock.unix_timestamp,
            players: Vec::new(),
            max_players,
            recent_winner: None,
            pending_request_id: None,
            request_counter: 0,
            vrf,
        };
        lottery.pack(&mut lottery_info.data.borrow_mut())?;

        msg!(
            "Lottery initialized: fee={} interval={}s max_players={} oracle={}",
            entrance_fee,
            interval,
            max_players,
            lottery.vrf.oracle_authority
        );
        Ok(())
    }

    /// Process the Enter instruction
    ///
    /// Admits one entry: the player pays `amount` (at least the entrance fee)
    /// into the pool and takes one slot in the current round. Every
    /// validation happens before the transfer.
    fn process_enter(accounts: &[AccountInfo], amount: u64, program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let player_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !player_info.is_signer {
            msg!("Player must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut lottery = Lottery::unpack(&lottery_info.data.borrow())?;

        if lottery.state != LotteryState::Open {
            msg!("Entries are not accepted while a round is calculating");
            return Err(LotteryError::LotteryNotOpen.into());
        }

        if amount < lottery.entrance_fee {
            msg!(
                "Payment of {} lamports is below the entrance fee of {}",
                amount,
                lottery.entrance_fee
            );
            return Err(LotteryError::InsufficientPayment.into());
        }

        if lottery.players.len() as u32 >= lottery.max_players {
            msg!("Round is full: {} players", lottery.max_players);
            return Err(LotteryError::LotteryFull.into());
        }

        // The full paid amount joins the pool, not just the fee.
        invoke(
            &system_instruction::transfer(player_info.key, lottery_info.key, amount),
            &[
                player_info.clone(),
                lottery_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        lottery.players.push(*player_info.key);
        let entries = lottery.players.len();
        let round_started_at = lottery.last_timestamp;
        lottery.pack(&mut lottery_info.data.borrow_mut())?;

        msg!(
            "EntryRecorded: player={} round_started_at={} entries={}",
            player_info.key,
            round_started_at,
            entries
        );
        Ok(())
    }

    /// Process the CheckUpkeep instruction
    ///
    /// Read-only: evaluates the predicate and logs each conjunct so an
    /// off-chain automation agent can poll it through simulation at any
    /// cadence.
    fn process_check_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let lottery_info = next_account_info(account_info_iter)?;

        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let lottery = Lottery::unpack(&lottery_info.data.borrow())?;
        let pool = prize_pool(lottery_info)?;
        let check = lottery.check_upkeep(Clock::get()?.unix_timestamp, pool);

        msg!(
            "Upkeep check: open={} interval_elapsed={} has_balance={} has_players={} needed={}",
            check.is_open,
            check.interval_elapsed,
            check.has_balance,
            check.has_players,
            check.needed()
        );
        Ok(())
    }

    /// Process the PerformUpkeep instruction (step 1 of round completion)
    ///
    /// Re-validates the upkeep predicate at call time, closes entries and
    /// mints the randomness request the oracle will answer. Callable by
    /// anyone: a call when upkeep is not due simply fails.
    fn process_perform_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let caller_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;

        if !caller_info.is_signer {
            msg!("Caller must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut lottery = Lottery::unpack(&lottery_info.data.borrow())?;
        let pool = prize_pool(lottery_info)?;

        // Time may have advanced and entries may have landed since any
        // earlier CheckUpkeep, so the predicate is re-evaluated here.
        let check = lottery.check_upkeep(Clock::get()?.unix_timestamp, pool);
        if !check.needed() {
            msg!(
                "Upkeep not needed: state={:?} players={} pool={}",
                lottery.state,
                lottery.players.len(),
                pool
            );
            return Err(LotteryError::UpkeepNotNeeded.into());
        }

        let request_id = lottery
            .request_counter
            .checked_add(1)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        lottery.request_counter = request_id;
        lottery.pending_request_id = Some(request_id);
        lottery.state = LotteryState::Calculating;
        lottery.pack(&mut lottery_info.data.borrow_mut())?;

        msg!(
            "RequestedRandomness: request_id={} key_hash={:?} subscription_id={} confirmations={} callback_gas_limit={} num_words={}",
            request_id,
            lottery.vrf.key_hash,
            lottery.vrf.subscription_id,
            lottery.vrf.request_confirmations,
            lottery.vrf.callback_gas_limit,
            NUM_WORDS
        );
        Ok(())
    }

    /// Process the FulfillRandomness instruction (step 2 of round completion)
    ///
    /// The oracle's callback: delivers the random value bound to the pending
    /// request, draws the winner, drains the pool to them and opens the next
    /// round. The runtime reverts every mutation if anything here fails, so
    /// settlement commits atomically or not at all.
    fn process_fulfill_randomness(
        accounts: &[AccountInfo],
        request_id: u64,
        random_value: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let oracle_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        if !oracle_info.is_signer {
            msg!("Oracle authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut lottery = Lottery::unpack(&lottery_info.data.borrow())?;

        if lottery.vrf.oracle_authority != *oracle_info.key {
            msg!("Only the configured oracle authority can fulfill randomness");
            return Err(ProgramError::InvalidAccountData);
        }

        // Rejects mismatched ids, stale callbacks and fulfillment attempted
        // before any request was issued.
        if lottery.pending_request_id != Some(request_id) {
            msg!(
                "Request {} does not match the pending request {:?}",
                request_id,
                lottery.pending_request_id
            );
            return Err(LotteryError::UnknownRequest.into());
        }

        if lottery.players.is_empty() {
            msg!("No players recorded for the pending request");
            return Err(ProgramError::InvalidAccountData);
        }

        let index = winner_index(random_value, lottery.players.len() as u64) as usize;
        let winner = lottery.players[index];
        msg!("Drawn winner index: {}", index);

        if *winner_info.key != winner {
            msg!("Expected winner account {}", winner);
            return Err(LotteryError::WinnerMismatch.into());
        }

        // Drain the pool; the rent floor keeps the lottery account alive.
        let rent_floor = Rent::get()?.minimum_balance(lottery_info.data_len());
        let prize = lottery_info
            .lamports()
            .checked_sub(rent_floor)
            .ok_or(LotteryError::TransferFailed)?;
        **lottery_info.lamports.borrow_mut() = rent_floor;
        **winner_info.lamports.borrow_mut() = winner_info
            .lamports()
            .checked_add(prize)
            .ok_or(LotteryError::TransferFailed)?;

        lottery.recent_winner = Some(winner);
        lottery.state = LotteryState::Open;
        lottery.players.clear();
        lottery.pending_request_id = None;
        lottery.last_timestamp = Clock::get()?.unix_timestamp;
        lottery.pack(&mut lottery_info.data.borrow_mut())?;

        msg!("WinnerPicked: winner={} prize={}", winner, prize);
        Ok(())
    }
}
