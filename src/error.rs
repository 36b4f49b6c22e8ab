use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError,
    program_error::ProgramError,
};
use thiserror::Error;

/// Errors that may be returned by the Solottery program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LotteryError {
    /// Invalid instruction data passed
    #[error("Invalid instruction data")]
    InvalidInstructionData,

    /// Payment below the entrance fee
    #[error("Payment is below the entrance fee")]
    InsufficientPayment,

    /// Entries are only accepted while the round is open
    #[error("Lottery round is not open")]
    LotteryNotOpen,

    /// The players list reached the account capacity
    #[error("Lottery round is full")]
    LotteryFull,

    /// Upkeep conditions are not met
    #[error("Upkeep is not needed")]
    UpkeepNotNeeded,

    /// Fulfillment does not match the pending randomness request
    #[error("Unknown randomness request")]
    UnknownRequest,

    /// The winner account passed to fulfillment is not the drawn player
    #[error("Winner account does not match the drawn player")]
    WinnerMismatch,

    /// The prize transfer could not be performed
    #[error("Prize transfer failed")]
    TransferFailed,
}

impl From<LotteryError> for ProgramError {
    fn from(e: LotteryError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for LotteryError {
    fn type_of() -> &'static str {
        "Lottery Error"
    }
}

impl PrintProgramError for LotteryError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
