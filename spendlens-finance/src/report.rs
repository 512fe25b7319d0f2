//! Monthly breakdown report with savings estimates.
//!
//! Policy lives here: which months the primary report covers, and how much
//! of each spending class counts as realistically cuttable.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use anyhow::Result;
use spendlens_core::{money0, MonthKey, SpendClass, Transaction};

use crate::commitments::{detect_installment_plans, detect_recurring};
use crate::rules::{classify, Classification};

/// Months covered by the primary report, in order.
pub const TARGET_MONTHS: [MonthKey; 5] = [
    MonthKey::new(2025, 10),
    MonthKey::new(2025, 11),
    MonthKey::new(2025, 12),
    MonthKey::new(2026, 1),
    MonthKey::new(2026, 2),
];

/// Share of avoidable spending assumed cuttable.
pub const AVOIDABLE_CUT: f64 = 0.6;
/// Share of subscription spending assumed trimmable.
pub const SUBSCRIPTION_CUT: f64 = 0.3;

/// Largest transactions listed per category in the recommendations section.
const TOP_ITEMS_PER_CATEGORY: usize = 5;

pub fn potential_savings(avoidable_total: f64, subscription_total: f64) -> f64 {
    avoidable_total * AVOIDABLE_CUT + subscription_total * SUBSCRIPTION_CUT
}

/// Per-class spending totals for one group of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassTotals {
    pub total: f64,
    pub essential: f64,
    pub subscription: f64,
    pub avoidable: f64,
    pub other: f64,
}

impl ClassTotals {
    fn add(&mut self, class: SpendClass, amount: f64) {
        self.total += amount;
        match class {
            SpendClass::Essential => self.essential += amount,
            SpendClass::Subscription => self.subscription += amount,
            SpendClass::Avoidable => self.avoidable += amount,
            SpendClass::Other => self.other += amount,
        }
    }

    fn merge(&mut self, other: ClassTotals) {
        self.total += other.total;
        self.essential += other.essential;
        self.subscription += other.subscription;
        self.avoidable += other.avoidable;
        self.other += other.other;
    }
}

/// Classify and sum a group of transactions.
pub fn class_totals<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> ClassTotals {
    let mut totals = ClassTotals::default();
    for txn in txns {
        totals.add(classify(txn).class, txn.amount);
    }
    totals
}

pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Render the full analysis report.
pub fn render_report(txns: &[Transaction]) -> Result<String> {
    let mut by_month: BTreeMap<MonthKey, Vec<&Transaction>> = BTreeMap::new();
    for txn in txns {
        by_month.entry(txn.month()).or_default().push(txn);
    }

    let heavy = "=".repeat(90);
    let light = "─".repeat(80);
    let mut out = String::new();

    writeln!(out, "{heavy}")?;
    writeln!(
        out,
        "                    BANK SPENDING ANALYSIS - MONTHLY BREAKDOWN"
    )?;
    writeln!(out, "{heavy}")?;

    let mut grand = ClassTotals::default();

    for month in TARGET_MONTHS {
        let Some(month_txns) = by_month.get(&month) else {
            continue;
        };
        let totals = class_totals(month_txns.iter().copied());
        grand.merge(totals);

        writeln!(out)?;
        writeln!(out, "{heavy}")?;
        writeln!(out, "  {}", month.name())?;
        writeln!(out, "{heavy}")?;
        writeln!(out, "  TOTAL SPENT: {} NIS", money0(totals.total))?;
        writeln!(
            out,
            "  ├── Essentials/Installments: {} NIS",
            money0(totals.essential)
        )?;
        writeln!(
            out,
            "  ├── Subscriptions:           {} NIS",
            money0(totals.subscription)
        )?;
        writeln!(
            out,
            "  ├── Avoidable/Leisure:       {} NIS",
            money0(totals.avoidable)
        )?;
        writeln!(
            out,
            "  └── Other/Unclassified:      {} NIS",
            money0(totals.other)
        )?;

        let mut avoidable = classified_in(month_txns, SpendClass::Avoidable);
        if !avoidable.is_empty() {
            avoidable.sort_by(|a, b| b.0.amount.total_cmp(&a.0.amount));
            writeln!(out)?;
            writeln!(out, "  THINGS YOU DIDN'T HAVE TO BUY / COULD PAY LESS:")?;
            writeln!(out, "  {light}")?;
            for (txn, class) in &avoidable {
                writeln!(
                    out,
                    "    {}  {:>8} NIS  {:<55} [{}]",
                    txn.date.format("%d/%m"),
                    money0(txn.amount),
                    truncate(&txn.name, 55),
                    class.label
                )?;
            }
            writeln!(out, "  {light}")?;
            writeln!(
                out,
                "    SUBTOTAL AVOIDABLE: {} NIS",
                money0(totals.avoidable)
            )?;
        }

        let mut subscriptions = classified_in(month_txns, SpendClass::Subscription);
        if !subscriptions.is_empty() {
            subscriptions.sort_by(|a, b| b.0.amount.total_cmp(&a.0.amount));
            writeln!(out)?;
            writeln!(out, "  SUBSCRIPTIONS (review if needed):")?;
            writeln!(out, "  {light}")?;
            for (txn, class) in &subscriptions {
                let advice = class
                    .advice
                    .map(|a| format!(" -> {a}"))
                    .unwrap_or_default();
                writeln!(
                    out,
                    "    {}  {:>8} NIS  {:<45}{}",
                    txn.date.format("%d/%m"),
                    money0(txn.amount),
                    truncate(&txn.name, 45),
                    advice
                )?;
            }
            writeln!(out, "  {light}")?;
            writeln!(
                out,
                "    SUBTOTAL SUBSCRIPTIONS: {} NIS",
                money0(totals.subscription)
            )?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "  POTENTIAL MONTHLY SAVINGS: ~{} NIS",
            money0(potential_savings(totals.avoidable, totals.subscription))
        )?;
        writeln!(
            out,
            "    (Cutting {:.0}% of avoidable + {:.0}% of subscriptions)",
            AVOIDABLE_CUT * 100.0,
            SUBSCRIPTION_CUT * 100.0
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{heavy}")?;
    writeln!(
        out,
        "  GRAND SUMMARY ({} - {})",
        TARGET_MONTHS[0].name(),
        TARGET_MONTHS[TARGET_MONTHS.len() - 1].name()
    )?;
    writeln!(out, "{heavy}")?;
    writeln!(out, "  Total spent:                    {} NIS", money0(grand.total))?;
    writeln!(
        out,
        "  Total avoidable:                {} NIS",
        money0(grand.avoidable)
    )?;
    writeln!(
        out,
        "  Total subscriptions:            {} NIS",
        money0(grand.subscription)
    )?;
    writeln!(
        out,
        "  Combined avoidable+subs:        {} NIS",
        money0(grand.avoidable + grand.subscription)
    )?;
    writeln!(out)?;
    writeln!(out, "  REALISTIC SAVINGS POTENTIAL:")?;
    writeln!(
        out,
        "    If you cut {:.0}% of avoidable:  ~{} NIS",
        AVOIDABLE_CUT * 100.0,
        money0(grand.avoidable * AVOIDABLE_CUT)
    )?;
    writeln!(
        out,
        "    If you trim subscriptions:    ~{} NIS",
        money0(grand.subscription * SUBSCRIPTION_CUT)
    )?;
    let total_savings = potential_savings(grand.avoidable, grand.subscription);
    writeln!(
        out,
        "    TOTAL POTENTIAL SAVINGS:      ~{} NIS over {} months",
        money0(total_savings),
        TARGET_MONTHS.len()
    )?;
    // Average over the whole target window, not just the months with data.
    writeln!(
        out,
        "    AVG MONTHLY SAVINGS:          ~{} NIS/month",
        money0(total_savings / TARGET_MONTHS.len() as f64)
    )?;

    render_recommendations(&mut out, &by_month, &heavy)?;
    render_commitments(&mut out, txns, &heavy)?;

    Ok(out)
}

fn classified_in<'a>(
    txns: &[&'a Transaction],
    class: SpendClass,
) -> Vec<(&'a Transaction, Classification)> {
    txns.iter()
        .map(|t| (*t, classify(t)))
        .filter(|(_, c)| c.class == class)
        .collect()
}

/// Avoidable + subscription spending of the target months, grouped by
/// sub-label, largest categories first, top transactions under each.
fn render_recommendations(
    out: &mut String,
    by_month: &BTreeMap<MonthKey, Vec<&Transaction>>,
    heavy: &str,
) -> Result<()> {
    struct CategoryGroup<'a> {
        total: f64,
        items: Vec<&'a Transaction>,
    }

    let mut by_label: HashMap<&'static str, CategoryGroup> = HashMap::new();
    for month in TARGET_MONTHS {
        let Some(month_txns) = by_month.get(&month) else {
            continue;
        };
        for txn in month_txns {
            let class = classify(txn);
            if matches!(
                class.class,
                SpendClass::Avoidable | SpendClass::Subscription
            ) {
                let group = by_label.entry(class.label).or_insert(CategoryGroup {
                    total: 0.0,
                    items: Vec::new(),
                });
                group.total += txn.amount;
                group.items.push(txn);
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "{heavy}")?;
    writeln!(out, "  TOP SAVINGS RECOMMENDATIONS")?;
    writeln!(out, "{heavy}")?;

    let mut groups: Vec<_> = by_label.into_iter().collect();
    groups.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));

    for (label, mut group) in groups {
        writeln!(out)?;
        writeln!(
            out,
            "  {} - Total: {} NIS ({} transactions)",
            label.to_uppercase(),
            money0(group.total),
            group.items.len()
        )?;
        group.items.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        for txn in group.items.iter().take(TOP_ITEMS_PER_CATEGORY) {
            writeln!(
                out,
                "    {}  {:>8} NIS  {}",
                txn.date.format("%d/%m/%Y"),
                money0(txn.amount),
                truncate(&txn.name, 55)
            )?;
        }
    }
    Ok(())
}

/// Recurring charges and installment plans found across the whole stream.
fn render_commitments(out: &mut String, txns: &[Transaction], heavy: &str) -> Result<()> {
    let mut recurring = detect_recurring(txns)?;
    if !recurring.is_empty() {
        recurring.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        writeln!(out)?;
        writeln!(out, "{heavy}")?;
        writeln!(out, "  RECURRING CHARGES")?;
        writeln!(out, "{heavy}")?;
        for charge in &recurring {
            writeln!(
                out,
                "    {:>8} NIS/charge  seen in {} months  {}",
                money0(charge.amount),
                charge.months,
                truncate(&charge.name, 45)
            )?;
        }
    }

    let mut plans = detect_installment_plans(txns)?;
    if !plans.is_empty() {
        plans.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        writeln!(out)?;
        writeln!(out, "{heavy}")?;
        writeln!(out, "  ACTIVE INSTALLMENT PLANS")?;
        writeln!(out, "{heavy}")?;
        for plan in &plans {
            writeln!(
                out,
                "    {:>8} NIS  {:<45} payment {}/{}, {} remaining",
                money0(plan.amount),
                truncate(&plan.name, 45),
                plan.current,
                plan.total,
                plan.remaining
            )?;
        }
    }
    Ok(())
}
