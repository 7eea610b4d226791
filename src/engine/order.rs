//! Order key allocation.
//!
//! # Algorithm
//!
//! - No neighbours: `1.00`.
//! - Only a successor: `next - 1.00`, floored at `0.00`.
//! - Only a predecessor: `prev + 1.00`.
//! - Both: midpoint rounded half-up to two decimals.
//!
//! When rounding lands on a neighbour there is no room left between the
//! two keys and allocation fails with [`OrderKeyError::Exhausted`]; the
//! caller renumbers the location and retries.

use crate::error::OrderKeyError;
use crate::models::{OrderKey, TaskList};

/// Allocates a key strictly between `prev` and `next`.
///
/// # Examples
///
/// ```
/// use u_sequence::engine::allocate;
/// use u_sequence::models::OrderKey;
///
/// let key = allocate(Some(OrderKey::from_units(1)), Some(OrderKey::from_units(2))).unwrap();
/// assert_eq!(key.to_string(), "1.50");
/// assert!(allocate(Some(OrderKey::from_hundredths(100)), Some(OrderKey::from_hundredths(101))).is_err());
/// ```
pub fn allocate(prev: Option<OrderKey>, next: Option<OrderKey>) -> Result<OrderKey, OrderKeyError> {
    match (prev, next) {
        (None, None) => Ok(OrderKey::ONE),
        (None, Some(next)) => {
            let key = next
                .checked_sub(OrderKey::ONE)
                .ok_or(OrderKeyError::Overflow)?
                .max(OrderKey::ZERO);
            if key >= next {
                return Err(OrderKeyError::Exhausted {
                    prev: OrderKey::ZERO,
                    next,
                });
            }
            Ok(key)
        }
        (Some(prev), None) => prev.checked_add(OrderKey::ONE).ok_or(OrderKeyError::Overflow),
        (Some(prev), Some(next)) => {
            if prev >= next {
                return Err(OrderKeyError::OutOfSequence { prev, next });
            }
            let key = prev.midpoint(next);
            if key <= prev || key >= next {
                return Err(OrderKeyError::Exhausted { prev, next });
            }
            Ok(key)
        }
    }
}

/// Reassigns keys `step, 2·step, …` in the current order.
///
/// Returns the number of tasks whose key changed.
pub fn renumber(list: &mut TaskList, step: OrderKey) -> Result<usize, OrderKeyError> {
    let mut changed = 0;
    for (i, task) in list.iter_mut().enumerate() {
        let key = step
            .checked_mul(i as i64 + 1)
            .ok_or(OrderKeyError::Overflow)?;
        if task.order != key {
            task.order = key;
            changed += 1;
        }
    }
    Ok(changed)
}
