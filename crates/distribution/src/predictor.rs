// SPDX-License-Identifier: Apache-2.0

//! Months-to-target predictor (spec.md §4.3 "Months-to-target predictor").

use std::collections::BTreeMap;

use moneybox_primitives::{OVERFLOW_PRIORITY, OverflowMode};

use crate::engine::{self, MoneyboxSnapshot};

/// Simulates month-by-month distribution cycles starting from `boxes` and
/// reports, for every box with a positive `savings_target`, the 1-based
/// month its balance first reaches the target. Boxes that never receive
/// enough contribution within the simulation bound map to `-1`.
pub fn months_to_targets(
    boxes: &[MoneyboxSnapshot],
    budget: i64,
    mode: OverflowMode,
) -> BTreeMap<i64, i32> {
    let mut state: Vec<MoneyboxSnapshot> = boxes.to_vec();

    let mut result: BTreeMap<i64, i32> = boxes
        .iter()
        .filter(|b| b.priority != OVERFLOW_PRIORITY)
        .filter_map(|b| b.savings_target.filter(|&t| t > 0).map(|_| (b.id, -1)))
        .collect();

    if result.is_empty() {
        return result;
    }

    // spec.md §4.3: "Bound the simulation (e.g. 100×N cycles) to guarantee
    // termination."
    let bound = 100 * boxes.len().max(1);

    for month in 1..=bound {
        let plan = engine::compute_cycle(&state, budget, mode);
        if plan.movements.is_empty() {
            // Nothing moved this month and the inputs (budget, mode) are
            // static, so nothing will ever move again either.
            break;
        }
        apply_in_place(&mut state, &plan);

        for (id, month_reached) in result.iter_mut() {
            if *month_reached != -1 {
                continue;
            }
            if let Some(target) = boxes.iter().find(|b| b.id == *id).and_then(|b| b.savings_target) {
                if let Some(current) = state.iter().find(|b| b.id == *id) {
                    if current.balance >= target {
                        *month_reached = month as i32;
                    }
                }
            }
        }

        if result.values().all(|&v| v != -1) {
            break;
        }
    }

    result
}

fn apply_in_place(state: &mut [MoneyboxSnapshot], plan: &engine::CyclePlan) {
    for movement in &plan.movements {
        if let Some(box_) = state.iter_mut().find(|b| b.id == movement.moneybox_id) {
            box_.balance += movement.amount;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_target_in_expected_month() {
        let boxes = vec![
            MoneyboxSnapshot {
                id: 0,
                priority: 0,
                savings_amount: 0,
                savings_target: None,
                balance: 0,
            },
            MoneyboxSnapshot {
                id: 1,
                priority: 1,
                savings_amount: 10,
                savings_target: Some(30),
                balance: 0,
            },
        ];

        let months = months_to_targets(&boxes, 10, OverflowMode::Collect);
        assert_eq!(months.get(&1), Some(&3));
    }

    #[test]
    fn unreachable_target_reports_negative_one() {
        let boxes = vec![
            MoneyboxSnapshot {
                id: 0,
                priority: 0,
                savings_amount: 0,
                savings_target: None,
                balance: 0,
            },
            MoneyboxSnapshot {
                id: 1,
                priority: 1,
                savings_amount: 0,
                savings_target: Some(30),
                balance: 0,
            },
        ];

        let months = months_to_targets(&boxes, 10, OverflowMode::Collect);
        assert_eq!(months.get(&1), Some(&-1));
    }
}
