//! Pure optimistic transitions over the cart snapshot.
//!
//! The reducer runs before the corresponding remote call has been
//! confirmed, so line totals are recomputed locally from the stored unit
//! price. Unknown ids and zero quantities are identity transitions, not
//! errors.

use std::collections::HashSet;

use ongil_core::CartId;

use crate::cart::types::{CartLine, CartSnapshot};

/// An optimistic mutation of the cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Replace a line's quantity, recomputing its total.
    SetQuantity { id: CartId, quantity: u32 },
    /// Replace a line's selected variant options.
    ChangeOptions {
        id: CartId,
        color: String,
        size: String,
    },
    /// Drop a single line.
    Remove { id: CartId },
    /// Drop every listed line; remaining order is unchanged.
    RemoveMany { ids: Vec<CartId> },
}

/// Apply an action to a snapshot, producing the next snapshot.
///
/// Pure and total: no I/O, no panics, and an action that does not apply
/// (unknown id, zero quantity) returns the input unchanged.
#[must_use]
pub fn reduce(snapshot: CartSnapshot, action: &CartAction) -> CartSnapshot {
    match action {
        CartAction::SetQuantity { id, quantity } => {
            if *quantity == 0 {
                return snapshot;
            }
            map_line(snapshot, *id, |line| {
                line.quantity = *quantity;
                // The server has not answered yet, so the total must come
                // from the stored unit price
                line.total_price = line.unit_price.times(*quantity);
            })
        }
        CartAction::ChangeOptions { id, color, size } => map_line(snapshot, *id, |line| {
            line.selected_color.clone_from(color);
            line.selected_size.clone_from(size);
        }),
        CartAction::Remove { id } => CartSnapshot::new(
            snapshot
                .into_lines()
                .into_iter()
                .filter(|line| line.id != *id)
                .collect(),
        ),
        CartAction::RemoveMany { ids } => {
            let doomed: HashSet<CartId> = ids.iter().copied().collect();
            CartSnapshot::new(
                snapshot
                    .into_lines()
                    .into_iter()
                    .filter(|line| !doomed.contains(&line.id))
                    .collect(),
            )
        }
    }
}

fn map_line(snapshot: CartSnapshot, id: CartId, f: impl FnOnce(&mut CartLine)) -> CartSnapshot {
    let mut lines = snapshot.into_lines();
    if let Some(line) = lines.iter_mut().find(|line| line.id == id) {
        f(line);
    }
    CartSnapshot::new(lines)
}
