//! Confidence scoring for extracted receipts.

use rust_decimal::Decimal;

const BASE: f32 = 0.3;
const MERCHANT_BONUS: f32 = 0.2;
const DATE_BONUS: f32 = 0.2;
const TOTAL_BONUS: f32 = 0.2;
const ITEMS_BONUS: f32 = 0.1;
const AGREEMENT_BONUS: f32 = 0.1;

/// What the parser managed to identify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceSignals {
    pub has_merchant: bool,
    pub has_date: bool,
    pub item_count: usize,
    /// Total after backfill.
    pub total: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
}

impl ConfidenceSignals {
    /// Total within one cent of subtotal plus tax.
    ///
    /// Requires a non-zero total so that a receipt with no amounts at all
    /// does not earn the bonus from 0 = 0 + 0.
    pub fn amounts_agree(&self) -> bool {
        self.total > Decimal::ZERO
            && (self.total - (self.subtotal + self.tax)).abs() < Decimal::new(1, 2)
    }
}

/// Score in [0, 1]: 0.3 base plus one bonus per identified structure.
pub fn score_confidence(signals: &ConfidenceSignals) -> f32 {
    let bonuses = [
        (signals.has_merchant, MERCHANT_BONUS),
        (signals.has_date, DATE_BONUS),
        (signals.total > Decimal::ZERO, TOTAL_BONUS),
        (signals.item_count > 0, ITEMS_BONUS),
        (signals.amounts_agree(), AGREEMENT_BONUS),
    ];

    let score = bonuses
        .iter()
        .filter(|(hit, _)| *hit)
        .fold(BASE, |acc, (_, bonus)| acc + bonus);

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn empty() -> ConfidenceSignals {
        ConfidenceSignals {
            has_merchant: false,
            has_date: false,
            item_count: 0,
            total: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
        }
    }

    #[test]
    fn test_base_score() {
        assert!((score_confidence(&empty()) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_total_only() {
        let signals = ConfidenceSignals {
            total: dec("42.00"),
            ..empty()
        };
        assert!((score_confidence(&signals) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_everything_clamps_to_one() {
        let signals = ConfidenceSignals {
            has_merchant: true,
            has_date: true,
            item_count: 2,
            total: dec("17.27"),
            subtotal: dec("15.99"),
            tax: dec("1.28"),
        };
        assert_eq!(score_confidence(&signals), 1.0);
    }

    #[test]
    fn test_agreement_tolerance() {
        let mut signals = ConfidenceSignals {
            total: dec("10.00"),
            subtotal: dec("9.00"),
            tax: dec("0.995"),
            ..empty()
        };
        assert!(signals.amounts_agree());

        signals.tax = dec("0.99");
        assert!(!signals.amounts_agree());
    }
}
