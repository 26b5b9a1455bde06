//! Cost line-item aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{CostCategory, LineItem};

/// Totals across a list of line items.
///
/// Invariant: `investment_total + recurring_total` equals the sum of every
/// item's amount — each item lands in exactly one bucket, keyed off its
/// recurrence flag. `by_category` groups by category regardless of
/// recurrence; it exists for presentation only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub investment_total: f64,
    pub recurring_total: f64,
    pub by_category: BTreeMap<CostCategory, f64>,
}

/// Sum line items into one-time investment and recurring monthly buckets.
///
/// Zero-amount items are not dropped: they still register their category in
/// `by_category`, so a "considered but not costed" entry remains visible.
pub fn aggregate(items: &[LineItem]) -> CostBreakdown {
    let mut breakdown = CostBreakdown::default();
    for item in items {
        if item.is_recurring {
            breakdown.recurring_total += item.amount;
        } else {
            breakdown.investment_total += item.amount;
        }
        *breakdown.by_category.entry(item.category).or_insert(0.0) += item.amount;
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use crate::types::LineItemInput;

    fn item(category: CostCategory, name: &str, amount: f64) -> LineItem {
        normalize::line_item(&LineItemInput {
            category,
            name: name.into(),
            amount,
        })
    }

    #[test]
    fn partition_invariant_holds() {
        let items = vec![
            item(CostCategory::InitialInvestment, "Renovation", 45_000.0),
            item(CostCategory::InitialInvestment, "Equipment", 28_000.0),
            item(CostCategory::MonthlyFixed, "Rent", 7_500.0),
            item(CostCategory::MonthlyFixed, "Power", 1_200.0),
            item(CostCategory::MonthlyVariable, "Supplies", 950.0),
            item(CostCategory::Marketing, "Website", 800.0),
            item(CostCategory::HumanResources, "Teacher payroll", 12_000.0),
        ];
        let breakdown = aggregate(&items);

        let total: f64 = items.iter().map(|i| i.amount).sum();
        assert_eq!(
            breakdown.investment_total + breakdown.recurring_total,
            total
        );
        // Marketing and HR count as one-time per the category table.
        assert_eq!(breakdown.investment_total, 85_800.0);
        assert_eq!(breakdown.recurring_total, 9_650.0);
    }

    #[test]
    fn by_category_groups_regardless_of_recurrence() {
        let items = vec![
            item(CostCategory::MonthlyFixed, "Rent", 7_500.0),
            item(CostCategory::MonthlyFixed, "Internet", 300.0),
            item(CostCategory::Marketing, "Ads", 500.0),
        ];
        let breakdown = aggregate(&items);
        assert_eq!(
            breakdown.by_category.get(&CostCategory::MonthlyFixed),
            Some(&7_800.0)
        );
        assert_eq!(
            breakdown.by_category.get(&CostCategory::Marketing),
            Some(&500.0)
        );
    }

    #[test]
    fn zero_amount_item_is_counted_not_dropped() {
        let items = vec![item(CostCategory::Marketing, "Social media", 0.0)];
        let breakdown = aggregate(&items);
        assert_eq!(breakdown.investment_total, 0.0);
        assert_eq!(breakdown.recurring_total, 0.0);
        // The category still appears — the item existed.
        assert!(breakdown.by_category.contains_key(&CostCategory::Marketing));
    }

    #[test]
    fn empty_list_yields_zero_breakdown() {
        let breakdown = aggregate(&[]);
        assert_eq!(breakdown, CostBreakdown::default());
    }
}
