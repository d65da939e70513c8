#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn is_ascending(&self) -> bool {
        matches!(self, Direction::Asc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// Ordered list of sort orders, most significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(order: Order) -> Self {
        Self {
            orders: vec![order],
        }
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::by(Order::asc(property))
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::by(Order::desc(property))
    }

    pub fn then(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Appends `other`'s orders after this sort's.
    pub fn and(mut self, other: &Sort) -> Self {
        self.orders.extend(other.orders.iter().cloned());
        self
    }

    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
}
