//! Order line entity.

use common::{AllocationId, OrderId, OrderLineId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FreightError, Result, checked_mul};

use super::ShipmentAllocation;

/// One product entry within an order.
///
/// The ordered quantity bounds everything shipped against the line: the sum
/// of all allocation quantities never exceeds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    id: OrderLineId,
    order_id: OrderId,
    product_id: ProductId,
    ordered_quantity: Decimal,
    unit_price: Decimal,
    discount_percent: Decimal,
    shipments: Vec<ShipmentAllocation>,
}

impl OrderLine {
    /// Creates a line with no shipments.
    ///
    /// `discount_percent` comes from the external pricing segmentation and is
    /// only validated here.
    pub fn new(
        order_id: OrderId,
        product_id: impl Into<ProductId>,
        ordered_quantity: Decimal,
        unit_price: Decimal,
        discount_percent: Decimal,
    ) -> Result<Self> {
        if ordered_quantity <= Decimal::ZERO {
            return Err(FreightError::invalid(format!(
                "ordered quantity must be greater than 0, got {ordered_quantity}"
            )));
        }

        if unit_price < Decimal::ZERO {
            return Err(FreightError::invalid(format!(
                "unit price must not be negative, got {unit_price}"
            )));
        }

        if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
            return Err(FreightError::invalid(format!(
                "discount must be between 0 and 100 percent, got {discount_percent}"
            )));
        }

        Ok(Self {
            id: OrderLineId::new(),
            order_id,
            product_id: product_id.into(),
            ordered_quantity,
            unit_price,
            discount_percent,
            shipments: Vec::new(),
        })
    }

    pub fn id(&self) -> OrderLineId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn ordered_quantity(&self) -> Decimal {
        self.ordered_quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent
    }

    /// All allocations scheduled against this line, in creation order.
    pub fn shipments(&self) -> &[ShipmentAllocation] {
        &self.shipments
    }

    /// Returns true if at least one allocation exists.
    pub fn has_shipments(&self) -> bool {
        !self.shipments.is_empty()
    }

    pub fn allocation(&self, allocation_id: AllocationId) -> Option<&ShipmentAllocation> {
        self.shipments.iter().find(|a| a.id() == allocation_id)
    }

    /// Mutable access for ledger operations on an existing allocation.
    pub fn allocation_mut(&mut self, allocation_id: AllocationId) -> Option<&mut ShipmentAllocation> {
        self.shipments.iter_mut().find(|a| a.id() == allocation_id)
    }

    /// Quantity already committed to shipments.
    pub fn allocated_quantity(&self) -> Decimal {
        self.shipments.iter().map(|a| a.quantity()).sum()
    }

    /// Price before discount.
    pub fn gross_total(&self) -> Result<Decimal> {
        checked_mul("line total", self.unit_price, self.ordered_quantity)
    }

    /// Price after the line discount.
    pub fn net_total(&self) -> Result<Decimal> {
        let gross = self.gross_total()?;
        let discount = checked_mul("line discount", gross, self.discount_percent)?;
        Ok(gross - discount / Decimal::ONE_HUNDRED)
    }

    pub(crate) fn push_allocation(&mut self, allocation: ShipmentAllocation) {
        self.shipments.push(allocation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_line_has_no_shipments() {
        let line = OrderLine::new(OrderId::new(), "SEED-SOY", dec!(100), dec!(12.5), dec!(0)).unwrap();
        assert!(!line.has_shipments());
        assert_eq!(line.allocated_quantity(), Decimal::ZERO);
        assert_eq!(line.product_id().as_str(), "SEED-SOY");
    }

    #[test]
    fn test_totals_apply_discount() {
        let line = OrderLine::new(OrderId::new(), "FERT", dec!(40), dec!(25), dec!(10)).unwrap();
        assert_eq!(line.gross_total().unwrap(), dec!(1000));
        assert_eq!(line.net_total().unwrap(), dec!(900));
    }

    #[test]
    fn test_totals_report_overflow() {
        let line = OrderLine::new(OrderId::new(), "FERT", Decimal::MAX, dec!(2), dec!(0)).unwrap();
        assert_eq!(
            line.gross_total().unwrap_err(),
            FreightError::invalid("line total out of range")
        );
        assert!(line.net_total().is_err());
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let err = OrderLine::new(OrderId::new(), "FERT", dec!(0), dec!(25), dec!(0)).unwrap_err();
        assert!(matches!(err, FreightError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_negative_price() {
        assert!(OrderLine::new(OrderId::new(), "FERT", dec!(1), dec!(-1), dec!(0)).is_err());
    }

    #[test]
    fn test_rejects_discount_out_of_range() {
        assert!(OrderLine::new(OrderId::new(), "FERT", dec!(1), dec!(1), dec!(100.5)).is_err());
        assert!(OrderLine::new(OrderId::new(), "FERT", dec!(1), dec!(1), dec!(-0.1)).is_err());
        assert!(OrderLine::new(OrderId::new(), "FERT", dec!(1), dec!(1), dec!(100)).is_ok());
    }
}
