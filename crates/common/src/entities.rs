//! Read-only views of entities owned by remote collaborators.

use serde::{Deserialize, Serialize};

use crate::{MenuItemId, Money, UserId};

/// A user as published by the user collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_cafe_owner: bool,
}

/// A menu item as published by the menu collaborator.
///
/// `price` is the item's current price. It may change at any time; orders
/// copy it when they are created and never look at it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub price: Money,
}

impl MenuItem {
    pub fn new(id: MenuItemId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            is_cafe_owner: false,
        }
    }
}
