//! Payment method detection.

use super::lines::ReceiptLine;
use super::{LineRule, ScanState};

const PAYMENT_KEYWORDS: &[&str] = &["CASH", "CREDIT", "DEBIT", "VISA", "MASTERCARD", "AMEX"];

/// Records the full line naming a payment method. Later lines win.
pub const PAYMENT_RULE: LineRule = LineRule {
    name: "payment",
    applies: is_payment_line,
    apply: apply_payment,
};

pub fn is_payment_line(line: &ReceiptLine) -> bool {
    line.contains_any(PAYMENT_KEYWORDS)
}

fn apply_payment(line: &ReceiptLine, state: &mut ScanState) {
    state.payment_method = line.text.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_last_payment_line_wins() {
        let mut state = ScanState::new(Decimal::from(1000));

        for text in ["VISA ENDING 1234", "Burger 8.99", "Cash tendered 20.00"] {
            PAYMENT_RULE.run(&ReceiptLine::new(text), &mut state);
        }

        assert_eq!(state.payment_method, "Cash tendered 20.00");
    }

    #[test]
    fn test_keywords() {
        assert!(is_payment_line(&ReceiptLine::new("mastercard **** 9876")));
        assert!(is_payment_line(&ReceiptLine::new("DEBIT")));
        assert!(!is_payment_line(&ReceiptLine::new("Card")));
    }
}
