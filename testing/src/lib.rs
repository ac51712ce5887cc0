//! # Stockroom Testing
//!
//! Deterministic clock and fixture builders shared by the integration and
//! web test suites.

use chrono::{DateTime, TimeZone, Utc};
use stockroom_core::environment::Clock;
use stockroom_core::order::{Customer, ShippingAddress};
use stockroom_core::orders::NewOrder;
use stockroom_core::product::Product;
use stockroom_core::types::{Money, ProductId};

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, TimeZone, Utc};

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making trailing-window computations
    /// reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// A fixed clock at a known instant (2025-08-29 12:00:00 UTC).
    ///
    /// # Panics
    ///
    /// Never panics; the timestamp is a valid constant.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Constant timestamp is always valid
    pub fn test_clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2025, 8, 29, 12, 0, 0).unwrap())
    }
}

pub use mocks::{FixedClock, test_clock};

/// A catalog product fixture.
#[must_use]
pub fn product_fixture(sku: &str, quantity: u32, reorder_point: u32) -> Product {
    let now = test_clock().now();
    Product {
        id: ProductId::new(),
        sku: sku.to_string(),
        name: format!("Product {sku}"),
        category: "general".to_string(),
        price: Money::from_dollars(10),
        cost: Money::from_dollars(4),
        quantity,
        reorder_point,
        location: "A-01".to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// A valid order-creation fixture for the given lines.
#[must_use]
pub fn new_order_fixture(lines: Vec<stockroom_core::LineRequest>) -> NewOrder {
    NewOrder {
        customer: Customer {
            name: "Ada Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: None,
        },
        shipping_address: ShippingAddress {
            street: "1 Analytical Way".to_string(),
            city: Some("London".to_string()),
            state: None,
            zip_code: None,
            country: Some("UK".to_string()),
        },
        lines,
        notes: None,
    }
}
