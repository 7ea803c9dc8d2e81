// SPDX-License-Identifier: Apache-2.0

//! The four automated-savings strategies (spec.md §4.3), expressed as a pure
//! fold over a snapshot producing an ordered list of signed movements. No
//! mutation-by-side-effect and no reversed-list-in-place tricks the way
//! `original_source/src/savings_distribution/automated_savings_distribution.py`
//! does it — the RATIO pass is a plain iteration building a result vector.

use std::collections::BTreeMap;

use moneybox_primitives::OVERFLOW_PRIORITY;
use moneybox_primitives::OverflowMode;

/// A read-only view of one moneybox, as the engine needs it. Deliberately
/// decoupled from `moneybox_store::models::MoneyboxRow` so the engine stays
/// a pure function with no knowledge of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyboxSnapshot {
    pub id: i64,
    /// `0` marks the Overflow Moneybox.
    pub priority: i32,
    pub savings_amount: i64,
    pub savings_target: Option<i64>,
    pub balance: i64,
}

/// One signed movement against a single moneybox. Positive is a deposit,
/// negative a withdrawal. Movements are in the order they must be applied
/// and logged — reordering them changes the resulting transaction log even
/// though final balances would be the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub moneybox_id: i64,
    pub amount: i64,
}

/// The output of one distribution cycle: the ordered movements to apply and
/// the budget actually used (after any ADD pre-adjustment).
#[derive(Debug, Clone, Default)]
pub struct CyclePlan {
    pub movements: Vec<Movement>,
    pub effective_budget: i64,
}

/// Computes one distribution cycle. `boxes` must contain exactly one entry
/// with `priority == 0` (the overflow box); the rest must be in ascending
/// priority order, matching what `MoneyboxService::list_moneyboxes` returns.
pub fn compute_cycle(boxes: &[MoneyboxSnapshot], budget: i64, mode: OverflowMode) -> CyclePlan {
    let overflow = boxes
        .iter()
        .find(|b| b.priority == OVERFLOW_PRIORITY)
        .expect("snapshot must contain the overflow moneybox");
    let non_overflow: Vec<&MoneyboxSnapshot> =
        boxes.iter().filter(|b| b.priority != OVERFLOW_PRIORITY).collect();

    let mut movements = Vec::new();
    let mut effective_budget = budget;
    let mut overflow_balance = overflow.balance;

    if mode == OverflowMode::AddToAutomatedSavingsAmount {
        if overflow_balance > 0 {
            movements.push(Movement {
                moneybox_id: overflow.id,
                amount: -overflow_balance,
            });
            effective_budget += overflow_balance;
            overflow_balance = 0;
        }
    } else if mode == OverflowMode::Collect && effective_budget <= 0 {
        // spec.md §4.3 tie-break: "budget ≤ 0 with no overflow adjustment →
        // no-op, return snapshot unchanged". FILL and RATIO still run their
        // overflow-balance second pass even when the base budget is zero.
        return CyclePlan {
            movements,
            effective_budget,
        };
    }

    let (collect_movements, mut balances_after_collect, residual) =
        collect_pass(&non_overflow, effective_budget);
    movements.extend(collect_movements);

    if residual > 0 {
        movements.push(Movement {
            moneybox_id: overflow.id,
            amount: residual,
        });
    }
    overflow_balance += residual;

    match mode {
        OverflowMode::Collect | OverflowMode::AddToAutomatedSavingsAmount => {}
        OverflowMode::FillUpLimitedMoneyboxes => {
            if overflow_balance > 0 {
                let withdrawn = overflow_balance;
                movements.push(Movement {
                    moneybox_id: overflow.id,
                    amount: -withdrawn,
                });

                let mut remaining = withdrawn;
                for m in &non_overflow {
                    let Some(target) = m.savings_target else {
                        continue;
                    };
                    let bal = *balances_after_collect.get(&m.id).unwrap_or(&m.balance);
                    let take = remaining.min((target - bal).max(0));
                    if take > 0 {
                        movements.push(Movement {
                            moneybox_id: m.id,
                            amount: take,
                        });
                        remaining -= take;
                        *balances_after_collect.entry(m.id).or_insert(bal) = bal + take;
                    }
                }

                if remaining > 0 {
                    movements.push(Movement {
                        moneybox_id: overflow.id,
                        amount: remaining,
                    });
                }
            }
        }
        OverflowMode::Ratio => {
            if overflow_balance > 0 {
                let r = overflow_balance;
                movements.push(Movement {
                    moneybox_id: overflow.id,
                    amount: -r,
                });

                let total_sa: i64 = non_overflow.iter().map(|m| m.savings_amount).sum();
                if total_sa <= 0 {
                    movements.push(Movement {
                        moneybox_id: overflow.id,
                        amount: r,
                    });
                } else {
                    let mut taken = 0i64;
                    // Reversed traversal: the lowest-priority boxes are
                    // processed first so rounding residue accumulates
                    // toward the overflow deterministically (spec.md §4.3).
                    for m in non_overflow.iter().rev() {
                        let ratio_pct = m.savings_amount * 100 / total_sa;
                        let base = r / 100 * ratio_pct;
                        let bal = *balances_after_collect.get(&m.id).unwrap_or(&m.balance);
                        let take = match m.savings_target {
                            Some(target) => base.min((target - bal).max(0)),
                            None => base,
                        };
                        if take > 0 {
                            movements.push(Movement {
                                moneybox_id: m.id,
                                amount: take,
                            });
                            taken += take;
                        }
                    }

                    let leftover = r - taken;
                    if leftover > 0 {
                        movements.push(Movement {
                            moneybox_id: overflow.id,
                            amount: leftover,
                        });
                    }
                }
            }
        }
    }

    CyclePlan {
        movements,
        effective_budget,
    }
}

/// The COLLECT pass: walks boxes in priority order, allocating as much of
/// `budget` as each box's `savings_amount`/`savings_target` gap allows.
/// Returns the movements produced, each box's balance after the pass, and
/// the unallocated residual.
fn collect_pass(
    non_overflow: &[&MoneyboxSnapshot],
    budget: i64,
) -> (Vec<Movement>, BTreeMap<i64, i64>, i64) {
    let mut movements = Vec::new();
    let mut balances = BTreeMap::new();
    let mut remaining = budget.max(0);

    for m in non_overflow {
        let gap = match m.savings_target {
            Some(target) => (target - m.balance).max(0),
            None => m.savings_amount,
        };
        let take = m.savings_amount.min(remaining).min(gap);

        balances.insert(m.id, m.balance + take.max(0));
        if take > 0 {
            movements.push(Movement {
                moneybox_id: m.id,
                amount: take,
            });
            remaining -= take;
        }
    }

    (movements, balances, remaining)
}
