use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// What a customer message is asking for. The enumeration is closed:
/// classification always lands on exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ProductQuery,
    OrderStatus,
    Recommendation,
    ReturnRequest,
    CartHelp,
    CheckoutHelp,
    GeneralInquiry,
}

impl Intent {
    pub const ALL: [Intent; 7] = [
        Intent::ProductQuery,
        Intent::OrderStatus,
        Intent::Recommendation,
        Intent::ReturnRequest,
        Intent::CartHelp,
        Intent::CheckoutHelp,
        Intent::GeneralInquiry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ProductQuery => "product_query",
            Intent::OrderStatus => "order_status",
            Intent::Recommendation => "recommendation",
            Intent::ReturnRequest => "return_request",
            Intent::CartHelp => "cart_help",
            Intent::CheckoutHelp => "checkout_help",
            Intent::GeneralInquiry => "general_inquiry",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification rules, evaluated top to bottom against the lowercased
/// message. The first row with any matching keyword wins, so a message
/// containing both "return" and "order" classifies as `OrderStatus`.
pub const INTENT_RULES: &[(Intent, &[&str])] = &[
    (
        Intent::OrderStatus,
        &["order", "track", "where is", "delivery", "shipping", "arrived"],
    ),
    (
        Intent::ReturnRequest,
        &["return", "refund", "exchange", "broken", "damaged", "wrong"],
    ),
    (
        Intent::CartHelp,
        &["cart", "checkout", "pay", "coupon", "discount", "promo"],
    ),
    (
        Intent::Recommendation,
        &["recommend", "suggest", "similar", "like this", "alternative"],
    ),
    (
        Intent::ProductQuery,
        &["have", "stock", "available", "price", "specs", "feature", "size", "color"],
    ),
];

/// Every classification reports this fixed confidence. A real score would
/// need an actual model behind it; the keyword rules have none.
pub const CLASSIFY_CONFIDENCE: f64 = 0.85;

/// Classify a customer message into an [`Intent`]. Total: unmatched input
/// falls through to `GeneralInquiry`.
pub fn classify(text: &str) -> Intent {
    let lowered = text.to_lowercase();
    for (intent, keywords) in INTENT_RULES {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *intent;
        }
    }
    Intent::GeneralInquiry
}

const COLORS: &[&str] = &["red", "blue", "green", "black", "white", "pink", "gold", "silver"];
const SIZES: &[&str] = &["small", "medium", "large", "xl", "xxl", "xs"];

static ORDER_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn order_id_regex() -> &'static Regex {
    ORDER_ID_REGEX.get_or_init(|| Regex::new(r"#(\d+)").expect("valid order id pattern"))
}

/// Entities pulled out of a customer message with simple pattern matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub order_id: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Extract order ids (`#12345`), colors, and sizes from a message.
pub fn extract_entities(message: &str) -> ExtractedEntities {
    let lowered = message.to_lowercase();

    let order_id = order_id_regex()
        .captures(message)
        .map(|caps| caps[1].to_string());

    let color = COLORS.iter().find(|c| lowered.contains(*c)).map(|c| (*c).to_string());
    let size = SIZES.iter().find(|s| lowered.contains(*s)).map(|s| (*s).to_string());

    ExtractedEntities { order_id, color, size }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_order_status() {
        assert_eq!(classify("Where is my order #12345?"), Intent::OrderStatus);
        assert_eq!(classify("Track my delivery"), Intent::OrderStatus);
        assert_eq!(classify("Has my package arrived?"), Intent::OrderStatus);
    }

    #[test]
    fn test_classify_return_request() {
        assert_eq!(classify("I want to return my recent purchase"), Intent::ReturnRequest);
        assert_eq!(classify("The item came damaged"), Intent::ReturnRequest);
    }

    #[test]
    fn test_classify_cart_and_recommendation() {
        assert_eq!(classify("Apply this coupon to my cart"), Intent::CartHelp);
        assert_eq!(classify("Can you recommend a phone?"), Intent::Recommendation);
        assert_eq!(classify("Show me something like this"), Intent::Recommendation);
    }

    #[test]
    fn test_classify_product_query() {
        assert_eq!(classify("Do you have this in stock?"), Intent::ProductQuery);
        assert_eq!(classify("What's the price?"), Intent::ProductQuery);
    }

    #[test]
    fn test_classify_fallback() {
        assert_eq!(classify("Hello there"), Intent::GeneralInquiry);
        assert_eq!(classify(""), Intent::GeneralInquiry);
    }

    #[test]
    fn test_rule_order_first_match_wins() {
        // "return my order" carries keywords for both rule 1 (order) and
        // rule 2 (return); rule 1 is checked first.
        assert_eq!(classify("I want to return my order"), Intent::OrderStatus);
        // Without an order_status keyword, the return rule fires.
        assert_eq!(classify("I want a refund"), Intent::ReturnRequest);
    }

    #[test]
    fn test_classify_is_total() {
        for text in ["", "xyzzy", "order return cart recommend have", "ORDER"] {
            let intent = classify(text);
            assert!(Intent::ALL.contains(&intent));
        }
    }

    #[test]
    fn test_classify_case_insensitive() {
        assert_eq!(classify("WHERE IS MY ORDER"), Intent::OrderStatus);
    }

    #[test]
    fn test_intent_serde_snake_case() {
        let json = serde_json::to_string(&Intent::OrderStatus).unwrap();
        assert_eq!(json, "\"order_status\"");
        let back: Intent = serde_json::from_str("\"return_request\"").unwrap();
        assert_eq!(back, Intent::ReturnRequest);
    }

    #[test]
    fn test_extract_order_id() {
        let entities = extract_entities("Where is my order #12345?");
        assert_eq!(entities.order_id.as_deref(), Some("12345"));
    }

    #[test]
    fn test_extract_color_and_size() {
        let entities = extract_entities("Do you have the blue shirt in large?");
        assert_eq!(entities.color.as_deref(), Some("blue"));
        assert_eq!(entities.size.as_deref(), Some("large"));
    }

    #[test]
    fn test_extract_nothing() {
        assert_eq!(extract_entities("hello"), ExtractedEntities::default());
    }
}
