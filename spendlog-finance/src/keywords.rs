//! Keyword tables shared by the parser, the category rules, the advisor and
//! subscription detection. Kept as data so tests can walk every entry.

use spendlog_core::Category;

/// Ordered keyword groups; the first group with a hit decides the category.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::FoodAndDrink,
        &[
            "coffee", "starbucks", "dunkin", "latte", "food", "burger", "pizza", "lunch",
            "dinner", "mcdonalds", "zomato", "swiggy", "zepto", "blinkit",
        ],
    ),
    (
        Category::Transport,
        &[
            "uber", "lyft", "ola", "rapido", "gas", "fuel", "parking", "train", "bus", "metro",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "netflix", "spotify", "hulu", "prime", "movie", "cinema", "game", "xbox", "ps5",
        ],
    ),
    (
        Category::Groceries,
        &["grocery", "walmart", "target", "whole", "trader", "market", "basket"],
    ),
    (
        Category::Health,
        &["gym", "fitness", "health", "doctor", "pharmacy", "cvs", "1mg"],
    ),
    (
        Category::Shopping,
        &["amazon", "shop", "clothing", "nike", "zara", "myntra", "flipkart"],
    ),
    (
        Category::Bills,
        &["rent", "internet", "wifi", "bill", "electric", "water"],
    ),
];

/// Delivery apps that always win over the general groups, applied in order.
pub const DELIVERY_OVERRIDES: &[(Category, &[&str])] = &[
    (Category::Groceries, &["zepto", "blinkit"]),
    (Category::FoodAndDrink, &["zomato", "swiggy"]),
];

/// Currency markers that may precede an amount
pub const CURRENCY_MARKERS: &[&str] = &["$", "Rs", "INR", "₹"];

/// Words that introduce a merchant phrase. Two-word forms come first so
/// "Paid to X" captures "X" rather than "to X".
pub const MERCHANT_INTRODUCERS: &[&str] = &["Paid to", "Paid at", "To", "At", "Paid"];

/// Words that end a merchant phrase
pub const MERCHANT_TERMINATORS: &[&str] = &[
    "on", "for", "via", "Ref", "UPI", "from", "Bank", "A/C", "Credit", "Debit", "Act", "Avbl",
];

/// Notification boilerplate removed by the fallback description strategy
pub const BOILERPLATE_TOKENS: &[&str] = &[
    "Paid to",
    "Debited from",
    "Sent to",
    "VPA",
    "Ref",
    "UPI",
    "Transaction",
    "on",
    "at",
    "for",
    "Rs.",
    "INR",
];

/// Bank names and account markers removed by the fallback strategy
pub const BANK_TOKENS: &[&str] = &["HDFC", "ICICI", "SBI", "AXIS", "Bank", "A/C"];

/// Topics the advisor can total ("how much have I spent on coffee")
pub const ADVISOR_TOPICS: &[&str] = &[
    "food",
    "coffee",
    "transport",
    "uber",
    "shopping",
    "entertainment",
    "bills",
];

/// Descriptions containing these are treated as recurring subscriptions
pub const SUBSCRIPTION_KEYWORDS: &[&str] = &[
    "netflix",
    "spotify",
    "apple",
    "icloud",
    "prime",
    "hulu",
    "disney",
    "gym",
    "fitness",
    "youtube",
    "adobe",
    "chatgpt",
    "playstation",
    "xbox",
];

/// Keywords for the all-time recurring charges listing. A separate set from
/// [`SUBSCRIPTION_KEYWORDS`]: it has "cloud" but no "disney" or "fitness".
pub const RECURRING_CHARGE_KEYWORDS: &[&str] = &[
    "netflix", "spotify", "hulu", "prime", "youtube", "apple", "gym", "cloud", "adobe", "chatgpt",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercase() {
        let tables = CATEGORY_KEYWORDS
            .iter()
            .chain(DELIVERY_OVERRIDES)
            .flat_map(|(_, kws)| kws.iter());
        let all = tables
            .chain(ADVISOR_TOPICS)
            .chain(SUBSCRIPTION_KEYWORDS)
            .chain(RECURRING_CHARGE_KEYWORDS);
        for kw in all {
            assert_eq!(*kw, kw.to_lowercase(), "keyword {kw:?} must be lowercase");
        }
    }

    #[test]
    fn test_every_category_except_default_has_a_group() {
        for c in Category::ALL {
            let has_group = CATEGORY_KEYWORDS.iter().any(|(cat, _)| *cat == c);
            assert_eq!(has_group, c != Category::Uncategorized, "{c}");
        }
    }
}
