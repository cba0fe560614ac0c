//! Expense splits, member balances and settlement suggestions

use crate::core::currency::{ConversionError, ConversionService};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use thiserror::Error;
use tracing::debug;

/// Custom splits may differ from the expense total by less than half a cent.
const SPLIT_TOLERANCE: f64 = 0.005;

/// Balances within a cent of zero are considered settled.
const SETTLED_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error("Expense {description:?}: amount {amount} must be positive and finite")]
    InvalidAmount { description: String, amount: f64 },
    #[error("Expense {0:?} has no participants")]
    NoParticipants(String),
    #[error(
        "Expense {description:?}: the sum of splits ({splits}) must equal the total expense amount ({total})"
    )]
    SplitMismatch {
        description: String,
        total: f64,
        splits: f64,
    },
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    #[default]
    Equal,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub participant: String,
    pub amount: f64,
}

/// A single expense paid by one member and shared among others.
///
/// `currency` defaults to the base currency of the rate table. Equal splits
/// use `participants`; custom splits use `splits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub payer: String,
    #[serde(default)]
    pub split_type: SplitType,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub splits: Vec<Share>,
}

impl Expense {
    /// Resolves the expense into per-participant shares in its own currency.
    ///
    /// Equal splits are computed in cents; leftover cents go to the first
    /// participants so the shares add up to the total.
    pub fn shares(&self) -> Result<Vec<Share>> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(SplitError::InvalidAmount {
                description: self.description.clone(),
                amount: self.amount,
            });
        }

        match self.split_type {
            SplitType::Equal => {
                if self.participants.is_empty() {
                    return Err(SplitError::NoParticipants(self.description.clone()));
                }
                let count = self.participants.len() as i64;
                let total_cents = (self.amount * 100.0).round() as i64;
                let (each, remainder) = (total_cents / count, total_cents % count);

                Ok(self
                    .participants
                    .iter()
                    .enumerate()
                    .map(|(i, participant)| {
                        let cents = each + i64::from((i as i64) < remainder);
                        Share {
                            participant: participant.clone(),
                            amount: cents as f64 / 100.0,
                        }
                    })
                    .collect())
            }
            SplitType::Custom => {
                if self.splits.is_empty() {
                    return Err(SplitError::NoParticipants(self.description.clone()));
                }
                let sum: f64 = self.splits.iter().map(|s| s.amount).sum();
                if (sum - self.amount).abs() >= SPLIT_TOLERANCE {
                    return Err(SplitError::SplitMismatch {
                        description: self.description.clone(),
                        total: self.amount,
                        splits: sum,
                    });
                }
                Ok(self.splits.clone())
            }
        }
    }
}

/// A suggested payment from a debtor to a creditor, in the base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub payer: String,
    pub receiver: String,
    pub amount: f64,
}

/// Net balance per member in the base currency: amount paid minus shares.
/// Positive means the member is owed money.
pub fn balances(
    service: &ConversionService,
    expenses: &[Expense],
) -> Result<BTreeMap<String, f64>> {
    let base = service.base_currency();
    let mut balances: BTreeMap<String, f64> = BTreeMap::new();

    for expense in expenses {
        let shares = expense.shares()?;
        let currency = expense.currency.as_deref().unwrap_or(base);
        let to_base = |amount: f64| -> Result<f64> {
            Ok(service.convert_between(amount, currency, base)?.value)
        };

        *balances.entry(expense.payer.clone()).or_default() += to_base(expense.amount)?;
        for share in &shares {
            *balances.entry(share.participant.clone()).or_default() -= to_base(share.amount)?;
        }
    }

    debug!(members = balances.len(), "Computed balances");
    Ok(balances)
}

/// Pairs the largest debtor with the largest creditor until every balance is
/// within a cent of zero.
pub fn settle(balances: &BTreeMap<String, f64>) -> Vec<Settlement> {
    let mut balances = balances.clone();
    let mut settlements = Vec::new();

    while balances.values().any(|b| b.abs() > SETTLED_THRESHOLD) {
        let Some((payer, payer_balance)) = extreme(&balances, |candidate, best| candidate < best)
        else {
            break;
        };
        let Some((receiver, receiver_balance)) =
            extreme(&balances, |candidate, best| candidate > best)
        else {
            break;
        };
        if payer_balance >= 0.0 || receiver_balance <= 0.0 {
            break;
        }

        let amount = payer_balance.abs().min(receiver_balance);
        debug!(%payer, %receiver, amount, "Settlement");

        if let Some(b) = balances.get_mut(&payer) {
            *b += amount;
        }
        if let Some(b) = balances.get_mut(&receiver) {
            *b -= amount;
        }
        settlements.push(Settlement {
            payer,
            receiver,
            amount,
        });
    }

    settlements
}

// First member whose balance beats every earlier one under `better`.
fn extreme(
    balances: &BTreeMap<String, f64>,
    better: impl Fn(f64, f64) -> bool,
) -> Option<(String, f64)> {
    balances
        .iter()
        .fold(None::<(&String, f64)>, |best, (member, &balance)| match best {
            Some((_, best_balance)) if !better(balance, best_balance) => best,
            _ => Some((member, balance)),
        })
        .map(|(member, balance)| (member.clone(), balance))
}

/// A list of group expenses loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSheet {
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl ExpenseSheet {
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let sheet_str = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read expenses file: {}", path.as_ref().display())
        })?;

        let sheet: Self = serde_yaml::from_str(&sheet_str).with_context(|| {
            format!("Failed to parse expenses file: {}", path.as_ref().display())
        })?;
        debug!(expenses = sheet.expenses.len(), "Loaded expenses");
        Ok(sheet)
    }
}
