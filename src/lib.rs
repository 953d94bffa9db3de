// drip: mnemonic-derived test accounts, funded from a faucet.

pub mod error;
pub mod config;
pub mod address;
pub mod keys;
pub mod faucet;
pub mod funder;
pub mod report;
pub mod cli;

pub use error::{DripError, DripResult};
pub use config::{DripConfig, EthereumConfig, FaucetMethod, IndexRange};
pub use address::EthAddress;
pub use keys::{derive_account, derivation_path, Account, KeyDeriver};
pub use faucet::{Faucet, FaucetReply, FaucetSettings, HttpFaucet, BUSY_BODY};
pub use funder::{
    pacing_delay, AddressFunding, FailureReason, Funder, FundingPolicy, FundingState, Sleeper,
    StopSignal, ThreadSleeper,
};
pub use report::{AddressOutcome, FundingReport};
pub use cli::{Cli, CliHandler, Commands};
