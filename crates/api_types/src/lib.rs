use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod donation {
    use super::*;

    /// Body of `POST /donate`.
    ///
    /// The donor is the authenticated user; it is never part of the body.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonateRequest {
        pub amount: f64,
        /// Charity id.
        pub to: String,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct Balance {
        pub cash_balance: f64,
        pub redeemable: f64,
    }
}

pub mod charity {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CharityView {
        pub id: String,
        pub name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub website: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CharityTotal {
        pub charity_id: String,
        pub total: f64,
        pub donors: u64,
    }
}

pub mod txn {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TxnList {
        pub limit: Option<u64>,
    }

    /// One ledger entry as exposed by `GET /txns`.
    ///
    /// Enum-like fields keep their ledger spelling (`CHARITY`, `USER`, `CASH`).
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct TxnView {
        pub id: Uuid,
        pub category: String,
        pub from_type: String,
        pub from_id: String,
        pub to_type: String,
        pub to_id: String,
        pub amount: f64,
        pub token: String,
        pub created_at: DateTime<Utc>,
    }
}
