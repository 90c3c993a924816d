//! # Ledger Entities
//!
//! The two record types persisted in the state store.
//!
//! JSON field names (`Id`, `Amount`, `Owner`, `Issue`, `Expiry` and `Id`,
//! `Seller`, `Buyer`, `BondId`, `Time`, `IsMint`) are fixed so that existing
//! ledger data decodes unchanged.

use serde::{Deserialize, Serialize};

use super::keys::{BondId, TransactionId};

/// Unix timestamp in seconds since epoch.
pub type Timestamp = i64;

/// Counterparty recorded on both sides of a mint transaction.
pub const MINT_PARTY: &str = "none";

/// A fungible bond held by a single owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    #[serde(rename = "Id")]
    pub id: String,
    /// Face value.
    #[serde(rename = "Amount")]
    pub amount: i64,
    /// Current holder.
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Issue")]
    pub issue_time: Timestamp,
    #[serde(rename = "Expiry")]
    pub expiry_time: Timestamp,
}

impl Bond {
    pub fn new(
        id: &BondId,
        amount: i64,
        owner: impl Into<String>,
        issue_time: Timestamp,
        expiry_time: Timestamp,
    ) -> Self {
        Self {
            id: id.to_string(),
            amount,
            owner: owner.into(),
            issue_time,
            expiry_time,
        }
    }

    /// A bond is expired once its expiry lies strictly before `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiry_time < now
    }

    /// Hand the bond to `new_owner`, returning the previous owner.
    pub fn transfer_to(&mut self, new_owner: impl Into<String>) -> String {
        std::mem::replace(&mut self.owner, new_owner.into())
    }
}

/// An immutable entry in the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Seller")]
    pub seller: String,
    #[serde(rename = "Buyer")]
    pub buyer: String,
    /// Bond this transaction moved (non-owning reference).
    #[serde(rename = "BondId")]
    pub bond_id: String,
    #[serde(rename = "Time")]
    pub time: Timestamp,
    #[serde(rename = "IsMint")]
    pub is_mint: bool,
}

impl Transaction {
    /// Record the creation of `bond_id`.
    pub fn mint(id: &TransactionId, bond_id: &BondId, time: Timestamp) -> Self {
        Self {
            id: id.to_string(),
            seller: MINT_PARTY.to_string(),
            buyer: MINT_PARTY.to_string(),
            bond_id: bond_id.to_string(),
            time,
            is_mint: true,
        }
    }

    /// Record a change of ownership from `seller` to `buyer`.
    pub fn transfer(
        id: &TransactionId,
        bond_id: &BondId,
        seller: impl Into<String>,
        buyer: impl Into<String>,
        time: Timestamp,
    ) -> Self {
        Self {
            id: id.to_string(),
            seller: seller.into(),
            buyer: buyer.into(),
            bond_id: bond_id.to_string(),
            time,
            is_mint: false,
        }
    }
}

/// Snapshot of both ledger counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStatus {
    /// Bonds minted so far (`B_num`).
    pub bond_sequence: u64,
    /// Transactions recorded so far (`T_num`).
    pub transaction_sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bond_wire_format() {
        let bond = Bond::new(&BondId::new(7), 500, "Government", 1_000, 2_000);
        let json = serde_json::to_value(&bond).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "Id": "b_7",
                "Amount": 500,
                "Owner": "Government",
                "Issue": 1000,
                "Expiry": 2000
            })
        );
    }

    #[test]
    fn test_transaction_decodes_existing_record() {
        let raw = br#"{"Id":"t_3","Seller":"Brad","Buyer":"Alice","BondId":"b_2","Time":1700000000,"IsMint":false}"#;
        let tx: Transaction = serde_json::from_slice(raw).unwrap();

        assert_eq!(tx.id, "t_3");
        assert_eq!(tx.seller, "Brad");
        assert_eq!(tx.buyer, "Alice");
        assert_eq!(tx.bond_id, "b_2");
        assert!(!tx.is_mint);
    }

    #[test]
    fn test_mint_transaction_parties() {
        let tx = Transaction::mint(&TransactionId::Mint(8), &BondId::new(8), 42);
        assert_eq!(tx.id, "transaction8");
        assert_eq!(tx.seller, MINT_PARTY);
        assert_eq!(tx.buyer, MINT_PARTY);
        assert!(tx.is_mint);
    }

    #[test]
    fn test_expiry_boundary() {
        let bond = Bond::new(&BondId::new(1), 100, "Tomoko", 0, 1_000);
        assert!(!bond.is_expired_at(999));
        assert!(!bond.is_expired_at(1_000));
        assert!(bond.is_expired_at(1_001));
    }

    #[test]
    fn test_transfer_returns_previous_owner() {
        let mut bond = Bond::new(&BondId::new(1), 100, "Tomoko", 0, 1_000);
        let seller = bond.transfer_to("Alice");
        assert_eq!(seller, "Tomoko");
        assert_eq!(bond.owner, "Alice");
    }
}
