use crate::repos::store::InventoryRow;

/// Σ cost_per_item × quantity.
pub fn total_cost(items: &[InventoryRow]) -> f64 {
    items
        .iter()
        .map(|item| item.cost_per_item * f64::from(item.quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32, cost_per_item: f64) -> InventoryRow {
        InventoryRow {
            id: 1,
            user_id: 1,
            item_name: "shirt".into(),
            quantity,
            category: "shirts".into(),
            cost_per_item,
        }
    }

    #[test]
    fn empty_inventory_costs_nothing() {
        assert_eq!(total_cost(&[]), 0.0);
    }

    #[test]
    fn sums_quantity_times_unit_cost() {
        let items = [item(2, 10.0), item(3, 1.5)];
        assert_eq!(total_cost(&items), 24.5);
    }
}
