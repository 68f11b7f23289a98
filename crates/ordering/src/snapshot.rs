//! Price snapshots.

use common::MenuItem;
use order_store::NewOrderItem;

use crate::LineItem;

/// Captures the current price of a validated menu item into an order line.
///
/// The returned line owns a copy of the price. Later changes to the menu
/// item do not reach it.
pub fn snapshot_price(line: &LineItem, item: &MenuItem) -> NewOrderItem {
    NewOrderItem::new(line.menu_item_id, line.quantity, item.price)
}
