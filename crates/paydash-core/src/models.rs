//! Core data models shared by the server and the client

use chrono::{DateTime, NaiveDate, Utc};
use paydash_utils::{format_amount, to_cents};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Currency, TransactionStatus, TransactionType};

/// Literal balance shown unless stats are derived from the list
pub const FIXED_TOTAL_BALANCE: &str = "1,250,400.00";
/// Literal deposits shown unless stats are derived from the list
pub const FIXED_TODAY_DEPOSITED: &str = "45,230.00";

/// Amounts travel as exact 2-decimal strings, never as JSON numbers.
pub mod amount {
    use super::*;
    use serde::de::Error;
    use serde::{Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_cents(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let text = String::deserialize(deserializer)?;
        let value = Decimal::from_str(text.trim())
            .map_err(|e| D::Error::custom(format!("invalid amount '{}': {}", text, e)))?;
        // Anything finer than cents would be rounded on the way back out.
        if value.scale() > 2 {
            return Err(D::Error::custom(format!("amount '{}' has more than 2 decimals", text)));
        }
        Ok(value)
    }
}

/// Gross, fee and net amounts of one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amounts {
    pub gross: Decimal,
    pub mdr: Decimal,
    pub net: Decimal,
}

impl Amounts {
    /// Split a gross amount into fee and net using the given rate (0.02 = 2%)
    pub fn from_gross(gross: Decimal, mdr_rate: Decimal) -> Self {
        let gross = to_cents(gross);
        let mdr = to_cents(gross * mdr_rate);
        Self {
            gross,
            mdr,
            net: gross - mdr,
        }
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Sequential identifier assigned by the store
    pub id: u64,
    /// Display name of the transacting party
    pub user: String,
    pub order_id: String,
    pub txn_ref: String,
    pub unique_ref: String,
    pub bank_ref: String,
    pub currency: Currency,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(with = "amount")]
    pub gross: Decimal,
    #[serde(with = "amount")]
    pub mdr: Decimal,
    #[serde(with = "amount")]
    pub net: Decimal,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Check whether the transaction happened on the given UTC day
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date.date_naive() == day
    }
}

/// Insert shape: every field except the store-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub user: String,
    pub order_id: String,
    pub txn_ref: String,
    pub unique_ref: String,
    pub bank_ref: String,
    #[serde(default)]
    pub currency: Currency,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(with = "amount")]
    pub gross: Decimal,
    #[serde(with = "amount")]
    pub mdr: Decimal,
    #[serde(with = "amount")]
    pub net: Decimal,
    pub status: TransactionStatus,
    /// Defaults to the creation time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl NewTransaction {
    /// Attach an id, filling in the creation time if no date was given
    pub fn into_transaction(self, id: u64, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            user: self.user,
            order_id: self.order_id,
            txn_ref: self.txn_ref,
            unique_ref: self.unique_ref,
            bank_ref: self.bank_ref,
            currency: self.currency,
            kind: self.kind,
            gross: self.gross,
            mdr: self.mdr,
            net: self.net,
            status: self.status,
            date: self.date.unwrap_or(now),
        }
    }
}

/// Summary figures shown on the dashboard cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_balance: String,
    pub today_deposited: String,
}

impl DashboardStats {
    /// The constant snapshot served by default
    pub fn fixed() -> Self {
        Self {
            total_balance: FIXED_TOTAL_BALANCE.to_string(),
            today_deposited: FIXED_TODAY_DEPOSITED.to_string(),
        }
    }

    /// Aggregate from the list: sum of `net` as balance, sum of `gross`
    /// over today's successful payins as deposits.
    pub fn derive_from(transactions: &[Transaction], today: NaiveDate) -> Self {
        let balance: Decimal = transactions.iter().map(|t| t.net).sum();
        let deposited: Decimal = transactions
            .iter()
            .filter(|t| t.kind == TransactionType::Payin)
            .filter(|t| t.status == TransactionStatus::Success)
            .filter(|t| t.is_on(today))
            .map(|t| t.gross)
            .sum();

        Self {
            total_balance: format_amount(balance),
            today_deposited: format_amount(deposited),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample(id: u64, kind: TransactionType, status: TransactionStatus, gross: &str, date: DateTime<Utc>) -> Transaction {
        let amounts = Amounts::from_gross(dec(gross), dec("0.02"));
        Transaction {
            id,
            user: format!("User {}", id),
            order_id: "ORD-123456".to_string(),
            txn_ref: "TXN-12345678".to_string(),
            unique_ref: "UNQ-AB12CD".to_string(),
            bank_ref: "UTR-1234567890".to_string(),
            currency: Currency::Usd,
            kind,
            gross: amounts.gross,
            mdr: amounts.mdr,
            net: amounts.net,
            status,
            date,
        }
    }

    #[test]
    fn test_amounts_from_gross() {
        let amounts = Amounts::from_gross(dec("100.25"), dec("0.02"));
        assert_eq!(amounts.gross.to_string(), "100.25");
        // 2.005 rounds away from zero
        assert_eq!(amounts.mdr.to_string(), "2.01");
        assert_eq!(amounts.net.to_string(), "98.24");
        assert_eq!(amounts.net, amounts.gross - amounts.mdr);
    }

    #[test]
    fn test_transaction_wire_shape() {
        let date = Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap();
        let tx = sample(7, TransactionType::Payout, TransactionStatus::Pending, "500", date);
        let value = serde_json::to_value(&tx).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["orderId"], "ORD-123456");
        assert_eq!(value["bankRef"], "UTR-1234567890");
        assert_eq!(value["type"], "Payout");
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["currency"], "USD");
        assert_eq!(value["gross"], "500.00");
        assert_eq!(value["mdr"], "10.00");
        assert_eq!(value["net"], "490.00");
        assert_eq!(value["date"], "2024-06-15T08:30:00Z");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_amount_rejects_numbers() {
        let date = Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap();
        let tx = sample(1, TransactionType::Payin, TransactionStatus::Success, "10", date);
        let mut value = serde_json::to_value(&tx).unwrap();
        value["gross"] = serde_json::json!(10.0);
        assert!(serde_json::from_value::<Transaction>(value).is_err());
    }

    #[test]
    fn test_new_transaction_defaults() {
        let json = serde_json::json!({
            "user": "Acme",
            "orderId": "ORD-1",
            "txnRef": "TXN-1",
            "uniqueRef": "UNQ-1",
            "bankRef": "UTR-1",
            "type": "Payin",
            "gross": "10.00",
            "mdr": "0.20",
            "net": "9.80",
            "status": "Success"
        });
        let new_tx: NewTransaction = serde_json::from_value(json).unwrap();
        assert_eq!(new_tx.currency, Currency::Usd);
        assert!(new_tx.date.is_none());

        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let tx = new_tx.into_transaction(42, now);
        assert_eq!(tx.id, 42);
        assert_eq!(tx.date, now);
    }

    #[test]
    fn test_fixed_stats() {
        let stats = DashboardStats::fixed();
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value, serde_json::json!({
            "totalBalance": "1,250,400.00",
            "todayDeposited": "45,230.00"
        }));
    }

    #[test]
    fn test_derived_stats() {
        let today = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0).unwrap();
        let transactions = vec![
            sample(1, TransactionType::Payin, TransactionStatus::Success, "1000", today),
            sample(2, TransactionType::Payin, TransactionStatus::Success, "500", yesterday),
            sample(3, TransactionType::Payin, TransactionStatus::Failed, "300", today),
            sample(4, TransactionType::Payout, TransactionStatus::Success, "200", today),
        ];

        let stats = DashboardStats::derive_from(&transactions, today.date_naive());
        // net: 980 + 490 + 294 + 196
        assert_eq!(stats.total_balance, "1,960.00");
        assert_eq!(stats.today_deposited, "1,000.00");
    }
}
