//! Deterministic spending classification.
//!
//! Ordered rule tables matched case-insensitively against the transaction
//! name and the issuer-supplied category. First match wins, and the table
//! order is load-bearing: installment override, then subscriptions, then
//! avoidable keywords, then the issuer-category fallback. A name matching
//! several tables only ever hits the earliest one.

use spendlens_core::{SpendClass, Transaction};

/// Result of classifying one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub class: SpendClass,
    /// Finer label within the class, e.g. `delivery`, `music_sub`.
    pub label: &'static str,
    /// Human-readable suggestion; subscriptions only.
    pub advice: Option<&'static str>,
}

struct SubscriptionRule {
    keyword: &'static str,
    label: &'static str,
    advice: &'static str,
}

struct KeywordRule {
    keyword: &'static str,
    label: &'static str,
}

struct CategoryRule {
    keywords: &'static [&'static str],
    label: &'static str,
}

/// Markers that flag an installment annotation (loans, furniture, "k of n").
const INSTALLMENT_MARKERS: [&str; 3] = ["תשלום", "מתוך", " מ -"];

/// Known recurring services, matched against the name only.
const SUBSCRIPTION_RULES: &[SubscriptionRule] = &[
    SubscriptionRule {
        keyword: "spotify",
        label: "music_sub",
        advice: "Could downgrade to free tier",
    },
    SubscriptionRule {
        keyword: "amazon prime",
        label: "streaming_sub",
        advice: "Consider if you use it enough",
    },
    SubscriptionRule {
        keyword: "cursor",
        label: "dev_tool_sub",
        advice: "Dev tool - evaluate if needed",
    },
    SubscriptionRule {
        keyword: "claude.ai",
        label: "ai_sub",
        advice: "AI subscription",
    },
    SubscriptionRule {
        keyword: "anthropic",
        label: "ai_sub",
        advice: "AI API usage",
    },
    SubscriptionRule {
        keyword: "google one",
        label: "cloud_sub",
        advice: "Cloud storage - check if needed",
    },
    SubscriptionRule {
        keyword: "airalo",
        label: "esim_sub",
        advice: "Travel eSIM",
    },
];

/// Discretionary spending, matched against the name or the issuer category.
const AVOIDABLE_RULES: &[KeywordRule] = &[
    // Restaurants / eating out
    KeywordRule { keyword: "מסעד", label: "restaurant" },
    KeywordRule { keyword: "קפה", label: "cafe" },
    KeywordRule { keyword: "cafe", label: "cafe" },
    KeywordRule { keyword: "hong bao", label: "restaurant" },
    KeywordRule { keyword: "פיצריה", label: "pizza" },
    KeywordRule { keyword: "בורגר", label: "fastfood" },
    KeywordRule { keyword: "sheldon", label: "restaurant" },
    KeywordRule { keyword: "kisu", label: "restaurant" },
    KeywordRule { keyword: "ore -", label: "restaurant" },
    KeywordRule { keyword: "יהושע", label: "cafe" },
    KeywordRule { keyword: "קריאת", label: "cafe" },
    // Online shopping / impulse
    KeywordRule { keyword: "amazon mktpl", label: "online_shopping" },
    KeywordRule { keyword: "amazon mktplace", label: "online_shopping" },
    KeywordRule { keyword: "iherb", label: "online_shopping" },
    KeywordRule { keyword: "next online", label: "online_shopping" },
    KeywordRule { keyword: "hataco", label: "shopping" },
    // Leisure rentals
    KeywordRule { keyword: "lime", label: "scooter_rental" },
    // Alcohol / bars
    KeywordRule { keyword: "בירה", label: "alcohol" },
    KeywordRule { keyword: "אלכוהול", label: "alcohol" },
    // Takeout / delivery
    KeywordRule { keyword: "וולט", label: "delivery" },
    KeywordRule { keyword: "wolt", label: "delivery" },
    // Duty free
    KeywordRule { keyword: "duty free", label: "duty_free" },
    KeywordRule { keyword: "king power", label: "duty_free" },
    // Malls
    KeywordRule { keyword: "קניון", label: "shopping" },
];

/// Coarser fallback over the issuer category alone.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule { keywords: &["מסעד", "אוכל"], label: "restaurant" },
    CategoryRule { keywords: &["קניות", "קניון"], label: "shopping" },
    CategoryRule { keywords: &["בידור"], label: "entertainment" },
    CategoryRule { keywords: &["ביגוד", "אופנה"], label: "fashion" },
];

/// Classify one transaction. Pure: depends only on the record's fields.
pub fn classify(txn: &Transaction) -> Classification {
    let name = txn.name.to_lowercase();
    let category = txn.category.to_lowercase();

    // Installment annotations override everything else.
    if !txn.installment.is_empty()
        && INSTALLMENT_MARKERS.iter().any(|m| txn.installment.contains(m))
    {
        return Classification {
            class: SpendClass::Essential,
            label: "installment_payment",
            advice: None,
        };
    }

    for rule in SUBSCRIPTION_RULES {
        if name.contains(rule.keyword) {
            return Classification {
                class: SpendClass::Subscription,
                label: rule.label,
                advice: Some(rule.advice),
            };
        }
    }

    for rule in AVOIDABLE_RULES {
        if name.contains(rule.keyword) || category.contains(rule.keyword) {
            return Classification {
                class: SpendClass::Avoidable,
                label: rule.label,
                advice: None,
            };
        }
    }

    if !category.is_empty() {
        for rule in CATEGORY_RULES {
            if rule.keywords.iter().any(|k| category.contains(k)) {
                return Classification {
                    class: SpendClass::Avoidable,
                    label: rule.label,
                    advice: None,
                };
            }
        }
    }

    Classification {
        class: SpendClass::Other,
        label: "unclassified",
        advice: None,
    }
}
