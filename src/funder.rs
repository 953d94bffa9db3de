//! Sequential faucet funding
//!
//! Each address is driven by an [`AddressFunding`] state machine until it is
//! either funded or failed. Busy replies and transport errors loop back to the
//! same address; only terminal states advance to the next one, and a pacing
//! delay separates consecutive addresses.

use crate::address::EthAddress;
use crate::config::{DripConfig, PacingConfig};
use crate::error::{DripError, DripResult};
use crate::faucet::{Faucet, FaucetReply, FaucetSettings, HttpFaucet};
use crate::keys::Account;
use crate::report::FundingReport;
use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};


/// Shared flag that stops a run at the next request or sleep slice.
///
/// The `drip` binary never raises it and relies on `deadline_secs` instead.
/// Callers embedding [`Funder`] hand a clone to another thread (a signal
/// handler, a supervisor) through [`Funder::with_stop_signal`] or
/// [`Funder::stop_signal`].
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}


pub trait Sleeper {
    /// Returns `Err(DripError::Cancelled)` if `stop` is raised before `duration` elapses.
    fn sleep(&mut self, duration: Duration, stop: &StopSignal) -> DripResult<()>;
}


pub struct ThreadSleeper {
    slice: Duration,
}

impl Default for ThreadSleeper {
    fn default() -> Self {
        Self { slice: Duration::from_millis(100) }
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration, stop: &StopSignal) -> DripResult<()> {
        // `None` when the wait runs past what `Instant` can represent.
        let until = Instant::now().checked_add(duration);
        loop {
            if stop.is_stopped() {
                return Err(DripError::Cancelled);
            }
            let now = Instant::now();
            let step = match until {
                Some(until) if now >= until => return Ok(()),
                Some(until) => (until - now).min(self.slice),
                None => self.slice,
            };
            std::thread::sleep(step);
        }
    }
}


/// `base + uniform(0, jitter)`; `base + fallback_jitter` if the RNG fails.
pub fn pacing_delay<R: RngCore>(pacing: &PacingConfig, rng: &mut R) -> Duration {
    let jitter = if pacing.jitter_ms == 0 {
        0
    } else {
        match StdRng::from_rng(rng) {
            Ok(mut seeded) => seeded.gen_range(0..pacing.jitter_ms),
            Err(e) => {
                warn!(error = %e, "random delay unavailable, using fixed pacing");
                pacing.fallback_jitter_ms
            }
        }
    };

    Duration::from_millis(pacing.base_delay_ms.saturating_add(jitter))
}


#[derive(Debug, Clone)]
pub struct FundingPolicy {

    /// Number of accounts to fund, taken in index order.
    pub count: u32,

    pub busy_delay: Duration,

    pub max_busy_retries: Option<u32>,

    pub backoff: ExponentialBuilder,

    pub pacing: PacingConfig,

    pub deadline: Option<Duration>,
}

impl FundingPolicy {
    pub fn from_config(config: &DripConfig) -> Self {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(config.retry.min_backoff_ms))
            .with_max_delay(Duration::from_millis(config.retry.max_backoff_ms))
            .with_max_times(config.retry.max_transport_retries);

        Self {
            count: config.ethereum.addresses_number,
            busy_delay: config.busy_delay(),
            max_busy_retries: config.retry.max_busy_retries,
            backoff,
            pacing: config.pacing.clone(),
            deadline: config.deadline(),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {

    Rejected { status: u16, reason: String },

    TransportExhausted { last_error: String },

    BusyExhausted { retries: u32 },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Rejected { status, reason } => write!(f, "HTTP {}: {}", status, reason),
            FailureReason::TransportExhausted { last_error } => {
                write!(f, "gave up after transport errors: {}", last_error)
            }
            FailureReason::BusyExhausted { retries } => {
                write!(f, "faucet still busy after {} retries", retries)
            }
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingState {

    Pending,

    /// Waiting out a busy faucet.
    Busy,

    /// Waiting out a transport failure.
    Backoff,

    Funded,

    Failed(FailureReason),
}


/// Funding progress of a single address.
pub struct AddressFunding {
    pub index: u32,
    pub address: EthAddress,
    pub state: FundingState,
    pub attempts: u32,
    pub busy_retries: u32,
    pub transport_failures: u32,
    backoff: ExponentialBackoff,
}

impl AddressFunding {
    pub fn new(account: &Account, policy: &FundingPolicy) -> Self {
        Self {
            index: account.index,
            address: account.address,
            state: FundingState::Pending,
            attempts: 0,
            busy_retries: 0,
            transport_failures: 0,
            backoff: policy.backoff.clone().build(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, FundingState::Funded | FundingState::Failed(_))
    }

    /// Applies one request outcome. Returns the wait before retrying, or
    /// `None` once the address is terminal.
    pub fn advance(&mut self, outcome: DripResult<FaucetReply>, policy: &FundingPolicy) -> Option<Duration> {
        self.attempts += 1;

        match outcome {
            Ok(FaucetReply::Funded) => {
                self.state = FundingState::Funded;
                None
            }
            Ok(FaucetReply::Rejected { status, reason }) => {
                self.state = FundingState::Failed(FailureReason::Rejected { status, reason });
                None
            }
            Ok(FaucetReply::Busy) => {
                if policy.max_busy_retries.is_some_and(|max| self.busy_retries >= max) {
                    self.state = FundingState::Failed(FailureReason::BusyExhausted {
                        retries: self.busy_retries,
                    });
                    return None;
                }
                self.busy_retries += 1;
                self.state = FundingState::Busy;
                Some(policy.busy_delay)
            }
            Err(e) => {
                self.transport_failures += 1;
                match self.backoff.next() {
                    Some(delay) => {
                        self.state = FundingState::Backoff;
                        Some(delay)
                    }
                    None => {
                        self.state = FundingState::Failed(FailureReason::TransportExhausted {
                            last_error: e.to_string(),
                        });
                        None
                    }
                }
            }
        }
    }
}


pub struct Funder<F: Faucet, S: Sleeper, R: RngCore> {
    faucet: F,
    sleeper: S,
    rng: R,
    policy: FundingPolicy,
    stop: StopSignal,
}

impl Funder<HttpFaucet, ThreadSleeper, OsRng> {
    pub fn from_config(config: &DripConfig) -> DripResult<Self> {
        let faucet = HttpFaucet::new(FaucetSettings::from_config(config))?;
        Ok(Self::new(faucet, ThreadSleeper::default(), OsRng, FundingPolicy::from_config(config)))
    }
}

impl<F: Faucet, S: Sleeper, R: RngCore> Funder<F, S, R> {
    pub fn new(faucet: F, sleeper: S, rng: R, policy: FundingPolicy) -> Self {
        Self {
            faucet,
            sleeper,
            rng,
            policy,
            stop: StopSignal::new(),
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn faucet(&self) -> &F {
        &self.faucet
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Funds the first `policy.count` accounts in index order.
    pub fn run(&mut self, accounts: &BTreeMap<u32, Account>) -> FundingReport {
        let targets: Vec<&Account> = accounts.values().take(self.policy.count as usize).collect();
        let started = Instant::now();
        let deadline_at = self.policy.deadline.and_then(|d| {
            let at = started.checked_add(d);
            if at.is_none() {
                warn!(deadline = ?d, "deadline out of range, running without one");
            }
            at
        });
        let mut report = FundingReport::start();

        info!(count = targets.len(), "start funding addresses");

        for (position, account) in targets.iter().enumerate() {
            match self.fund_one(account, deadline_at) {
                Ok(funding) => report.record(account, &funding),
                Err(e) => {
                    warn!(index = account.index, error = %e, "funding stopped");
                    report.mark_cancelled(targets[position..].iter().map(|a| a.index));
                    break;
                }
            }

            let is_last = position + 1 == targets.len();
            if !is_last {
                let delay = pacing_delay(&self.policy.pacing, &mut self.rng);
                debug!(delay_ms = delay.as_millis() as u64, "pacing before next address");
                if let Err(e) = self.pause(delay, deadline_at) {
                    warn!(error = %e, "funding stopped");
                    report.mark_cancelled(targets[position + 1..].iter().map(|a| a.index));
                    break;
                }
            }
        }

        report.finish(started.elapsed());
        info!(
            funded = report.funded_count(),
            unfunded = report.unfunded.len(),
            cancelled = report.cancelled,
            "finish funding addresses"
        );
        report
    }

    fn fund_one(&mut self, account: &Account, deadline_at: Option<Instant>) -> DripResult<AddressFunding> {
        let mut funding = AddressFunding::new(account, &self.policy);

        loop {
            self.check_stop(deadline_at)?;

            let outcome = self.faucet.request_funds(&account.address);
            if let Err(e) = &outcome {
                warn!(index = account.index, address = %account.address, error = %e, "faucet request failed");
            }

            match funding.advance(outcome, &self.policy) {
                Some(delay) => {
                    debug!(
                        index = account.index,
                        state = ?funding.state,
                        delay_ms = delay.as_millis() as u64,
                        "retrying address"
                    );
                    self.pause(delay, deadline_at)?;
                }
                None => break,
            }
        }

        match &funding.state {
            FundingState::Failed(reason) => {
                warn!(index = account.index, address = %account.address, %reason, "tokens not sent");
            }
            _ => {
                info!(index = account.index, address = %account.address, attempts = funding.attempts, "tokens sent");
            }
        }

        Ok(funding)
    }

    fn check_stop(&self, deadline_at: Option<Instant>) -> DripResult<()> {
        if self.stop.is_stopped() {
            return Err(DripError::Cancelled);
        }
        if deadline_at.is_some_and(|at| Instant::now() >= at) {
            return Err(DripError::Cancelled);
        }
        Ok(())
    }

    fn pause(&mut self, delay: Duration, deadline_at: Option<Instant>) -> DripResult<()> {
        let delay = match deadline_at {
            Some(at) => {
                let remaining = at.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(DripError::Cancelled);
                }
                delay.min(remaining)
            }
            None => delay,
        };

        self.sleeper.sleep(delay, &self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyDeriver;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    struct ScriptedFaucet {
        scripts: RefCell<HashMap<EthAddress, VecDeque<DripResult<FaucetReply>>>>,
        fallback: FaucetReply,
        calls: RefCell<Vec<EthAddress>>,
    }

    impl ScriptedFaucet {
        fn always(reply: FaucetReply) -> Self {
            Self {
                scripts: RefCell::new(HashMap::new()),
                fallback: reply,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn script(self, address: EthAddress, replies: Vec<DripResult<FaucetReply>>) -> Self {
            self.scripts.borrow_mut().insert(address, replies.into());
            self
        }

        fn calls_for(&self, address: &EthAddress) -> usize {
            self.calls.borrow().iter().filter(|a| *a == address).count()
        }
    }

    impl Faucet for ScriptedFaucet {
        fn request_funds(&self, address: &EthAddress) -> DripResult<FaucetReply> {
            self.calls.borrow_mut().push(*address);
            self.scripts
                .borrow_mut()
                .get_mut(address)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Ok(self.fallback.clone()))
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: Vec<Duration>,
        stop_after: Option<usize>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&mut self, duration: Duration, stop: &StopSignal) -> DripResult<()> {
            self.sleeps.push(duration);
            if self.stop_after.is_some_and(|n| self.sleeps.len() >= n) {
                stop.stop();
                return Err(DripError::Cancelled);
            }
            Ok(())
        }
    }

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(std::io::ErrorKind::Other, "entropy unavailable")))
        }
    }

    fn accounts(count: u32) -> BTreeMap<u32, Account> {
        KeyDeriver::new(TEST_MNEMONIC).unwrap().derive_range(0..count).unwrap()
    }

    fn policy(count: u32) -> FundingPolicy {
        let mut config = DripConfig::default();
        config.ethereum.addresses_number = count;
        config.retry.min_backoff_ms = 100;
        config.retry.max_backoff_ms = 400;
        config.retry.max_transport_retries = 3;
        FundingPolicy::from_config(&config)
    }

    fn funder(faucet: ScriptedFaucet, count: u32) -> Funder<ScriptedFaucet, RecordingSleeper, StdRng> {
        Funder::new(faucet, RecordingSleeper::default(), StdRng::seed_from_u64(7), policy(count))
    }

    fn rejected() -> FaucetReply {
        FaucetReply::Rejected { status: 400, reason: "limit reached".to_string() }
    }

    #[test]
    fn test_pacing_delay_bounds() {
        let pacing = PacingConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let delay = pacing_delay(&pacing, &mut rng);
            assert!(delay >= Duration::from_millis(3_000));
            assert!(delay <= Duration::from_millis(11_500));
        }
    }

    #[test]
    fn test_pacing_delay_fallback() {
        let delay = pacing_delay(&PacingConfig::default(), &mut FailingRng);
        assert_eq!(delay, Duration::from_millis(6_000));
    }

    #[test]
    fn test_pacing_without_jitter() {
        let pacing = PacingConfig { base_delay_ms: 10, jitter_ms: 0, fallback_jitter_ms: 3_000 };
        assert_eq!(pacing_delay(&pacing, &mut FailingRng), Duration::from_millis(10));
    }

    #[test]
    fn test_pacing_delay_saturates() {
        let pacing = PacingConfig { base_delay_ms: u64::MAX, jitter_ms: 8_500, fallback_jitter_ms: 3_000 };
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(pacing_delay(&pacing, &mut rng), Duration::from_millis(u64::MAX));
        assert_eq!(pacing_delay(&pacing, &mut FailingRng), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_all_funded() {
        let accounts = accounts(3);
        let mut funder = funder(ScriptedFaucet::always(FaucetReply::Funded), 3);

        let report = funder.run(&accounts);

        assert_eq!(report.funded_indices(), vec![0, 1, 2]);
        assert!(report.unfunded.is_empty());
        assert!(!report.cancelled);
        assert_eq!(report.terminal_count(), 3);
        // Pacing only between addresses.
        assert_eq!(funder.sleeper().sleeps.len(), 2);
        for delay in &funder.sleeper().sleeps {
            assert!(*delay >= Duration::from_millis(3_000) && *delay <= Duration::from_millis(11_500));
        }
    }

    #[test]
    fn test_all_rejected() {
        let accounts = accounts(4);
        let mut funder = funder(ScriptedFaucet::always(rejected()), 4);

        let report = funder.run(&accounts);

        assert!(report.funded_indices().is_empty());
        assert_eq!(report.unfunded.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(report.terminal_count(), 4);
        for account in accounts.values() {
            assert_eq!(funder.faucet().calls_for(&account.address), 1);
        }

        // Failed addresses are paced like funded ones.
        let sleeps = &funder.sleeper().sleeps;
        assert_eq!(sleeps.len(), 3);
        for delay in sleeps {
            assert!(*delay >= Duration::from_millis(3_000) && *delay <= Duration::from_millis(11_500));
        }
    }

    #[test]
    fn test_busy_retries_same_address() {
        let accounts = accounts(3);
        let busy_address = accounts[&1].address;
        let faucet = ScriptedFaucet::always(FaucetReply::Funded).script(
            busy_address,
            vec![Ok(FaucetReply::Busy), Ok(FaucetReply::Busy), Ok(FaucetReply::Busy)],
        );
        let mut policy = policy(3);
        policy.pacing = PacingConfig { base_delay_ms: 1, jitter_ms: 0, fallback_jitter_ms: 0 };
        let mut funder = Funder::new(faucet, RecordingSleeper::default(), StdRng::seed_from_u64(7), policy);

        let report = funder.run(&accounts);

        assert_eq!(report.funded_indices(), vec![0, 1, 2]);
        assert_eq!(funder.faucet().calls_for(&busy_address), 4);
        assert_eq!(funder.faucet().calls_for(&accounts[&0].address), 1);
        assert_eq!(funder.faucet().calls_for(&accounts[&2].address), 1);

        let busy_waits = funder
            .sleeper()
            .sleeps
            .iter()
            .filter(|d| **d == Duration::from_secs(5))
            .count();
        assert_eq!(busy_waits, 3);

        let outcome = report.outcome(1).unwrap();
        assert_eq!(outcome.busy_retries, 3);
        assert_eq!(outcome.attempts, 4);
    }

    #[test]
    fn test_busy_cap_marks_failed() {
        let accounts = accounts(1);
        let mut policy = policy(1);
        policy.max_busy_retries = Some(2);
        let mut funder = Funder::new(
            ScriptedFaucet::always(FaucetReply::Busy),
            RecordingSleeper::default(),
            StdRng::seed_from_u64(1),
            policy,
        );

        let report = funder.run(&accounts);

        assert_eq!(report.unfunded.len(), 1);
        assert_eq!(funder.faucet().calls_for(&accounts[&0].address), 3);
        assert_eq!(
            report.outcome(0).unwrap().failure.as_deref(),
            Some("faucet still busy after 2 retries")
        );
    }

    #[test]
    fn test_transport_errors_back_off_then_recover() {
        let accounts = accounts(1);
        let address = accounts[&0].address;
        let faucet = ScriptedFaucet::always(FaucetReply::Funded).script(
            address,
            vec![
                Err(DripError::Network("connection refused".to_string())),
                Err(DripError::Network("connection refused".to_string())),
            ],
        );
        let mut funder = funder(faucet, 1);

        let report = funder.run(&accounts);

        assert_eq!(report.funded_indices(), vec![0]);
        let sleeps = &funder.sleeper().sleeps;
        assert_eq!(sleeps.len(), 2);
        assert_eq!(sleeps[0], Duration::from_millis(100));
        assert!(sleeps[1] > sleeps[0]);
        assert_eq!(report.outcome(0).unwrap().transport_failures, 2);
    }

    #[test]
    fn test_transport_errors_exhaust_budget() {
        let accounts = accounts(2);
        let address = accounts[&0].address;
        let errors = (0..10)
            .map(|_| Err(DripError::Network("timed out".to_string())))
            .collect();
        let faucet = ScriptedFaucet::always(FaucetReply::Funded).script(address, errors);
        let mut funder = funder(faucet, 2);

        let report = funder.run(&accounts);

        // Three retries after the first failure.
        assert_eq!(funder.faucet().calls_for(&address), 4);
        assert_eq!(report.unfunded.keys().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(report.funded_indices(), vec![1]);
        let sleeps = &funder.sleeper().sleeps;
        assert_eq!(sleeps.len(), 4);
        for delay in &sleeps[..3] {
            assert!(*delay >= Duration::from_millis(100) && *delay <= Duration::from_millis(400));
        }
        // Pacing, not another backoff step, follows the failed address.
        assert!(sleeps[3] >= Duration::from_millis(3_000) && sleeps[3] <= Duration::from_millis(11_500));
    }

    #[test]
    fn test_funds_only_configured_count() {
        let accounts = accounts(5);
        let mut funder = funder(ScriptedFaucet::always(FaucetReply::Funded), 2);

        let report = funder.run(&accounts);

        assert_eq!(report.funded_indices(), vec![0, 1]);
        assert_eq!(funder.faucet().calls.borrow().len(), 2);
    }

    #[test]
    fn test_stop_signal_cancels_remaining() {
        let accounts = accounts(4);
        let sleeper = RecordingSleeper { sleeps: Vec::new(), stop_after: Some(1) };
        let mut funder = Funder::new(
            ScriptedFaucet::always(FaucetReply::Funded),
            sleeper,
            StdRng::seed_from_u64(3),
            policy(4),
        );

        let report = funder.run(&accounts);

        assert!(report.cancelled);
        assert_eq!(report.funded_indices(), vec![0]);
        assert_eq!(report.pending, vec![1, 2, 3]);
        assert!(funder.stop_signal().is_stopped());
    }

    #[test]
    fn test_pre_raised_stop_signal() {
        let accounts = accounts(2);
        let stop = StopSignal::new();
        stop.stop();
        let mut funder = funder(ScriptedFaucet::always(FaucetReply::Funded), 2).with_stop_signal(stop);

        let report = funder.run(&accounts);

        assert!(report.cancelled);
        assert_eq!(report.pending, vec![0, 1]);
        assert!(funder.faucet().calls.borrow().is_empty());
    }

    #[test]
    fn test_zero_deadline_cancels() {
        let accounts = accounts(2);
        let mut policy = policy(2);
        policy.deadline = Some(Duration::ZERO);
        let mut funder = Funder::new(
            ScriptedFaucet::always(FaucetReply::Funded),
            RecordingSleeper::default(),
            StdRng::seed_from_u64(3),
            policy,
        );

        let report = funder.run(&accounts);

        assert!(report.cancelled);
        assert_eq!(report.terminal_count(), 0);
    }

    #[test]
    fn test_unrepresentable_deadline_is_ignored() {
        let accounts = accounts(2);
        let mut policy = policy(2);
        policy.deadline = Some(Duration::MAX);
        let mut funder = Funder::new(
            ScriptedFaucet::always(FaucetReply::Funded),
            RecordingSleeper::default(),
            StdRng::seed_from_u64(3),
            policy,
        );

        let report = funder.run(&accounts);

        assert!(!report.cancelled);
        assert_eq!(report.funded_indices(), vec![0, 1]);
    }

    #[test]
    fn test_thread_sleeper_handles_unbounded_wait() {
        let stop = StopSignal::new();
        let mut sleeper = ThreadSleeper::default();
        let raiser = stop.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            raiser.stop();
        });

        assert_eq!(sleeper.sleep(Duration::MAX, &stop), Err(DripError::Cancelled));
        handle.join().unwrap();
    }

    #[test]
    fn test_thread_sleeper_honours_stop() {
        let stop = StopSignal::new();
        stop.stop();
        let mut sleeper = ThreadSleeper::default();
        assert_eq!(sleeper.sleep(Duration::from_secs(60), &stop), Err(DripError::Cancelled));

        let running = StopSignal::new();
        assert!(sleeper.sleep(Duration::from_millis(1), &running).is_ok());
    }
}
