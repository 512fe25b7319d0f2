//! Normalized transaction records emitted by the statement importers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

/// Which statement family (and card, where known) a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "Visa-4581")]
    Visa4581,
    #[serde(rename = "Visa-3147")]
    Visa3147,
    #[serde(rename = "Visa-unknown")]
    VisaUnknown,
    #[serde(rename = "Mastercard-4045")]
    Mastercard4045,
    #[serde(rename = "Bank-Debit")]
    BankDebit,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Source::Visa4581 => "Visa-4581",
            Source::Visa3147 => "Visa-3147",
            Source::VisaUnknown => "Visa-unknown",
            Source::Mastercard4045 => "Mastercard-4045",
            Source::BankDebit => "Bank-Debit",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single normalized statement row. Importers only emit records with a
/// valid date, a non-empty name, and a strictly positive charged amount;
/// records are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub name: String,
    /// Charged amount in NIS, always positive.
    pub amount: f64,
    /// Pre-conversion/pre-fee amount; equals `amount` when the statement
    /// carries only one figure.
    pub orig_amount: f64,
    pub source: Source,
    /// Raw installment annotation from the statement, `""` if absent.
    pub installment: String,
    /// Issuer-supplied category (Mastercard statements only), `""` otherwise.
    pub category: String,
    /// Billing-period caption from the sheet header (Visa statements only).
    pub billing: String,
}

impl Transaction {
    /// Calendar month this record belongs to.
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

/// Coarse spending class assigned by the classifier. Not stored on the
/// record; always derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpendClass {
    #[serde(rename = "essential")]
    Essential,
    #[serde(rename = "subscription")]
    Subscription,
    #[serde(rename = "avoidable")]
    Avoidable,
    #[serde(rename = "other")]
    Other,
}

impl SpendClass {
    pub fn label(&self) -> &'static str {
        match self {
            SpendClass::Essential => "essential",
            SpendClass::Subscription => "subscription",
            SpendClass::Avoidable => "avoidable",
            SpendClass::Other => "other",
        }
    }
}
