//! The create-order command.

use common::{MenuItemId, UserId};

use crate::OrderError;

/// One requested line: which menu item, and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(menu_item_id: impl Into<MenuItemId>, quantity: u32) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            quantity,
        }
    }
}

/// Command to create an order for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub user_id: UserId,
    pub items: Vec<LineItem>,
}

impl CreateOrder {
    pub fn new(user_id: impl Into<UserId>, items: Vec<LineItem>) -> Self {
        Self {
            user_id: user_id.into(),
            items,
        }
    }

    /// Checks the request shape before any collaborator is contacted.
    pub fn validate(&self) -> Result<(), OrderError> {
        if !self.user_id.is_valid() {
            return Err(OrderError::Validation(format!(
                "user_id must be a positive integer, got {}",
                self.user_id
            )));
        }

        if self.items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }

        for (index, line) in self.items.iter().enumerate() {
            if !line.menu_item_id.is_valid() {
                return Err(OrderError::Validation(format!(
                    "items[{index}]: menu_item_id must be a positive integer, got {}",
                    line.menu_item_id
                )));
            }
            if line.quantity == 0 {
                return Err(OrderError::Validation(format!(
                    "items[{index}]: quantity must be at least 1"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_command_is_valid() {
        let cmd = CreateOrder::new(1, vec![LineItem::new(1, 2), LineItem::new(2, 1)]);
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn duplicate_menu_items_are_allowed() {
        let cmd = CreateOrder::new(1, vec![LineItem::new(1, 1), LineItem::new(1, 3)]);
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_user() {
        let err = CreateOrder::new(0, vec![LineItem::new(1, 1)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(ref m) if m.contains("user_id")));
    }

    #[test]
    fn rejects_empty_items() {
        let err = CreateOrder::new(1, vec![]).validate().unwrap_err();
        assert!(matches!(err, OrderError::Validation(ref m) if m.contains("at least one item")));
    }

    #[test]
    fn rejects_zero_quantity_with_position() {
        let err = CreateOrder::new(1, vec![LineItem::new(1, 1), LineItem::new(2, 0)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(ref m) if m.starts_with("items[1]")));
    }

    #[test]
    fn rejects_non_positive_menu_item() {
        let err = CreateOrder::new(1, vec![LineItem::new(-4, 1)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(ref m) if m.contains("menu_item_id")));
    }
}
