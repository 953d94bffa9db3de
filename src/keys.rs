//! Deterministic account derivation from a BIP-39 mnemonic
//!
//! Accounts live at `m/44'/60'/0'/0/{index}`. The account-level key
//! (`m/44'/60'/0'/0`) is derived once per [`KeyDeriver`]; each index is then a
//! single non-hardened child step.

use crate::address::EthAddress;
use crate::error::{DripError, DripResult};
use bip32::{ChildNumber, DerivationPath, XPrv};
use bip39::Mnemonic;
use k256::ecdsa::{SigningKey, VerifyingKey};
use std::collections::BTreeMap;
use std::ops::Range;
use std::str::FromStr;


pub const ACCOUNT_PATH: &str = "m/44'/60'/0'/0";


pub fn derivation_path(index: u32) -> String {
    format!("{}/{}", ACCOUNT_PATH, index)
}


/// One derived identity. `balance` is never refreshed from chain.
#[derive(Debug, Clone)]
pub struct Account {

    pub index: u32,

    pub private_key: SigningKey,

    pub public_key: VerifyingKey,

    pub address: EthAddress,

    pub balance: u128,
}

impl Account {

    pub fn path(&self) -> String {
        derivation_path(self.index)
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key.to_bytes())
    }

    /// Uncompressed SEC1 encoding, 0x04 tag included.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.to_encoded_point(false).as_bytes())
    }
}


#[derive(Clone)]
pub struct KeyDeriver {
    account_key: XPrv,
}

impl KeyDeriver {

    pub fn new(mnemonic: &str) -> DripResult<Self> {
        // Validate seed phrase
        let mnemonic = Mnemonic::parse_normalized(mnemonic)?;

        // No passphrase
        let seed = mnemonic.to_seed("");

        // Master key uses the "Bitcoin seed" HMAC key
        let master_key = XPrv::new(seed)?;

        let path = DerivationPath::from_str(ACCOUNT_PATH)?;
        let mut account_key = master_key;
        for child_number in path.iter() {
            account_key = account_key.derive_child(child_number)?;
        }

        Ok(Self { account_key })
    }

    pub fn derive(&self, index: u32) -> DripResult<Account> {
        let child_number = ChildNumber::new(index, false)
            .map_err(|e| DripError::Derivation(format!("Invalid account index {}: {}", index, e)))?;
        let child = self.account_key.derive_child(child_number)?;

        let private_key = child.private_key().clone();
        let public_key = private_key.verifying_key().clone();
        let address = EthAddress::from_public_key(&public_key);

        Ok(Account {
            index,
            private_key,
            public_key,
            address,
            balance: 0,
        })
    }

    pub fn derive_range(&self, range: Range<u32>) -> DripResult<BTreeMap<u32, Account>> {
        let mut accounts = BTreeMap::new();
        for index in range {
            accounts.insert(index, self.derive(index)?);
        }
        Ok(accounts)
    }
}


pub fn derive_account(mnemonic: &str, index: u32) -> DripResult<Account> {
    KeyDeriver::new(mnemonic)?.derive(index)
}
