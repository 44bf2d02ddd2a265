//! Display categories for parsed entries.
//!
//! Pure keyword heuristics over the description and the resolved sign,
//! used only for grouping in reports. First match wins.

fn has_word(upper: &str, word: &str) -> bool {
    upper
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|w| w == word)
}

/// Map a description and signed amount to a display label.
pub fn categorize(description: &str, amount: f64) -> &'static str {
    let upper = description.to_uppercase();

    if amount > 0.0 {
        if ["EBAY", "AMAZON", "PAYPAL", "ETSY", "STRIPE"]
            .iter()
            .any(|p| has_word(&upper, p))
            || upper.contains("PAYOUT")
        {
            return "Marketplace payout";
        }
        if upper.contains("INTEREST") {
            return "Interest";
        }
        if upper.contains("REFUND") || upper.contains("REVERSAL") {
            return "Refund";
        }
        if upper.contains("SALARY") || upper.contains("PAYROLL") || upper.contains("WAGES") {
            return "Salary";
        }
        if upper.contains("TRANSFER") || upper.contains("PAID IN") {
            return "Transfer in";
        }
        return "Other income";
    }

    if amount < 0.0 {
        if has_word(&upper, "DD") || upper.contains("DIRECT DEBIT") {
            return "Direct debit";
        }
        if has_word(&upper, "SO") || upper.contains("STANDING ORDER") {
            return "Standing order";
        }
        if has_word(&upper, "VISA")
            || has_word(&upper, "MASTERCARD")
            || has_word(&upper, "MAESTRO")
            || upper.contains("CARD PAYMENT")
        {
            return "Card purchase";
        }
        if has_word(&upper, "ATM") || upper.contains("CASH") {
            return "Cash withdrawal";
        }
        if upper.contains("CHARGE") || upper.contains("FEE") {
            return "Bank charges";
        }
        if has_word(&upper, "BP") || upper.contains("BILL PAYMENT") {
            return "Bill payment";
        }
        if upper.contains("TRANSFER") {
            return "Transfer out";
        }
        return "Other spending";
    }

    "Other"
}
