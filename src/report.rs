//! Outcome of a funding run

use crate::address::EthAddress;
use crate::funder::{AddressFunding, FundingState};
use crate::keys::Account;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;


#[derive(Debug, Clone, Serialize)]
pub struct AddressOutcome {
    pub index: u32,
    pub address: EthAddress,
    pub funded: bool,
    pub attempts: u32,
    pub busy_retries: u32,
    pub transport_failures: u32,
    pub failure: Option<String>,
}


#[derive(Debug, Clone)]
pub struct FundingReport {

    pub started_at: DateTime<Utc>,

    pub finished_at: Option<DateTime<Utc>>,

    pub elapsed: Duration,

    /// Terminal outcomes in the order they were reached.
    pub outcomes: Vec<AddressOutcome>,

    /// Accounts the faucet refused, keyed by index.
    pub unfunded: BTreeMap<u32, Account>,

    /// Indices that never reached a terminal state.
    pub pending: Vec<u32>,

    pub cancelled: bool,
}

impl FundingReport {

    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            elapsed: Duration::ZERO,
            outcomes: Vec::new(),
            unfunded: BTreeMap::new(),
            pending: Vec::new(),
            cancelled: false,
        }
    }

    /// Non-terminal progress is ignored.
    pub fn record(&mut self, account: &Account, funding: &AddressFunding) {
        if !funding.is_terminal() {
            return;
        }

        let failure = match &funding.state {
            FundingState::Failed(reason) => {
                self.unfunded.insert(account.index, account.clone());
                Some(reason.to_string())
            }
            _ => None,
        };

        self.outcomes.push(AddressOutcome {
            index: funding.index,
            address: funding.address,
            funded: failure.is_none(),
            attempts: funding.attempts,
            busy_retries: funding.busy_retries,
            transport_failures: funding.transport_failures,
            failure,
        });
    }

    pub fn mark_cancelled<I: IntoIterator<Item = u32>>(&mut self, pending: I) {
        self.cancelled = true;
        self.pending.extend(pending);
    }

    pub fn finish(&mut self, elapsed: Duration) {
        self.finished_at = Some(Utc::now());
        self.elapsed = elapsed;
    }

    pub fn outcome(&self, index: u32) -> Option<&AddressOutcome> {
        self.outcomes.iter().find(|o| o.index == index)
    }

    pub fn funded_indices(&self) -> Vec<u32> {
        self.outcomes.iter().filter(|o| o.funded).map(|o| o.index).collect()
    }

    pub fn funded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.funded).count()
    }

    pub fn terminal_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Ascending index order.
    pub fn unfunded_addresses(&self) -> Vec<(u32, EthAddress)> {
        self.unfunded.iter().map(|(index, account)| (*index, account.address)).collect()
    }

    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.pending.is_empty()
    }
}
