//! Detection of ongoing commitments hiding in the transaction stream:
//! "k of n" installment plans and charges that recur month after month.

use std::collections::{BTreeSet, HashMap, HashSet};

use anyhow::Result;
use regex::Regex;
use spendlens_core::{MonthKey, Transaction};

/// An installment plan inferred from a "k of n" annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentPlan {
    pub name: String,
    pub amount: f64,
    pub current: u32,
    pub total: u32,
    /// Payments still to come, counting the one just seen.
    pub remaining: u32,
}

/// A charge seen in two or more distinct calendar months for the same
/// normalized merchant and amount.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringCharge {
    pub name: String,
    pub amount: f64,
    pub months: usize,
}

/// Annotation layouts that encode installment progress, tried in order.
fn installment_patterns() -> Result<Vec<Regex>> {
    Ok(vec![
        // "3 of 12", "payment 3/12"
        Regex::new(r"(?i)(\d+)\s*(?:of|/)\s*(\d+)")?,
        // "תשלום 3 מתוך 12"
        Regex::new(r"תשלום\s*(\d+)\s*מתוך\s*(\d+)")?,
        // "3/12 תשלומים"
        Regex::new(r"(\d+)\s*/\s*(\d+)\s*תשלומים")?,
        // bank shorthand "תש 03/12"
        Regex::new(r"תש\s*(\d+)/(\d+)")?,
    ])
}

fn match_installment<'a>(
    patterns: &'a [Regex],
    text: &str,
) -> Option<(&'a Regex, u32, u32)> {
    for pattern in patterns {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let current: u32 = caps[1].parse().ok()?;
        let total: u32 = caps[2].parse().ok()?;
        if current == 0 || total == 0 || current > total {
            continue;
        }
        return Some((pattern, current, total));
    }
    None
}

/// Find installment plans across all transactions, one entry per plan (the
/// same plan seen in several statements is reported once).
pub fn detect_installment_plans(txns: &[Transaction]) -> Result<Vec<InstallmentPlan>> {
    let patterns = installment_patterns()?;
    let mut seen = HashSet::new();
    let mut plans = Vec::new();

    for txn in txns {
        // The dedicated annotation wins; some statements embed the marker in
        // the description instead.
        let (matched, name) = match match_installment(&patterns, &txn.installment) {
            Some(m) => (Some(m), txn.name.clone()),
            None => match match_installment(&patterns, &txn.name) {
                Some((pattern, current, total)) => {
                    let cleaned = pattern.replace(&txn.name, "").trim().to_string();
                    let name = if cleaned.is_empty() {
                        txn.name.clone()
                    } else {
                        cleaned
                    };
                    (Some((pattern, current, total)), name)
                }
                None => (None, String::new()),
            },
        };
        let Some((_, current, total)) = matched else {
            continue;
        };

        let key = format!("{name}-{:.2}-{total}", txn.amount);
        if !seen.insert(key) {
            continue;
        }
        plans.push(InstallmentPlan {
            name,
            amount: txn.amount,
            current,
            total,
            remaining: total - current + 1,
        });
    }

    Ok(plans)
}

/// Group charges by normalized merchant name + amount and keep the ones
/// present in at least two distinct months.
pub fn detect_recurring(txns: &[Transaction]) -> Result<Vec<RecurringCharge>> {
    let digits = Regex::new(r"\d+")?;
    let symbols = Regex::new(r"[^\w\sא-ת]")?;

    struct Group {
        name: String,
        amount: f64,
        months: BTreeSet<MonthKey>,
    }

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Group> = HashMap::new();

    for txn in txns {
        let lowered = txn.name.to_lowercase();
        let no_digits = digits.replace_all(&lowered, "");
        let stripped = symbols.replace_all(&no_digits, "");
        let key = format!("{}|{:.2}", stripped.trim(), txn.amount);

        match groups.get_mut(&key) {
            Some(group) => {
                group.months.insert(txn.month());
            }
            None => {
                let mut months = BTreeSet::new();
                months.insert(txn.month());
                groups.insert(
                    key.clone(),
                    Group {
                        name: txn.name.clone(),
                        amount: txn.amount,
                        months,
                    },
                );
                order.push(key);
            }
        }
    }

    Ok(order
        .into_iter()
        .filter_map(|key| {
            let group = &groups[&key];
            (group.months.len() >= 2).then(|| RecurringCharge {
                name: group.name.clone(),
                amount: group.amount,
                months: group.months.len(),
            })
        })
        .collect())
}
