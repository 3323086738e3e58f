//! Service catalog: categories and the services clients can book.
//!
//! A booking may combine several services; its duration is the sum of the
//! selected durations and its `service_name` joins their names. Services
//! hidden from booking stay in the catalog for the admin but never count
//! toward a client selection.

use serde::{Deserialize, Serialize};

/// A group of services ("Hair", "Beard", ...), ordered by `sort_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCategory {
    /// Database primary key, `None` until stored
    pub id: Option<i64>,
    pub name: String,
    pub sort_order: i32,
}

impl ServiceCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            sort_order: 0,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Category name cannot be empty".to_string());
        }
        Ok(())
    }
}

/// One bookable service of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: Option<i64>,
    pub category_id: i64,
    pub name: String,
    pub notes: String,
    pub price: f64,
    /// Price is a starting price ("from 80")
    pub price_is_min: bool,
    pub duration_minutes: u32,
    pub hidden_from_booking: bool,
    /// Position inside its category
    pub sort_order: i32,
}

impl ServiceItem {
    pub fn new(category_id: i64, name: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id: None,
            category_id,
            name: name.into(),
            notes: String::new(),
            price: 0.0,
            price_is_min: false,
            duration_minutes,
            hidden_from_booking: false,
            sort_order: 0,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Keep the service in the catalog but out of client booking.
    pub fn hidden(mut self) -> Self {
        self.hidden_from_booking = true;
        self
    }

    pub fn is_bookable(&self) -> bool {
        !self.hidden_from_booking
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Service name cannot be empty".to_string());
        }
        if self.duration_minutes == 0 {
            return Err("Service duration must be positive".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Service price cannot be negative".to_string());
        }
        Ok(())
    }
}

/// Bookable services of `catalog` among `selected_ids`, in selection order.
///
/// Unknown and hidden ids are skipped.
pub fn selected_services<'a>(catalog: &'a [ServiceItem], selected_ids: &[i64]) -> Vec<&'a ServiceItem> {
    selected_ids
        .iter()
        .filter_map(|id| catalog.iter().find(|item| item.id == Some(*id)))
        .filter(|item| item.is_bookable())
        .collect()
}

/// Total duration of a multi-service booking.
pub fn total_duration(catalog: &[ServiceItem], selected_ids: &[i64]) -> u32 {
    selected_services(catalog, selected_ids)
        .iter()
        .map(|item| item.duration_minutes)
        .sum()
}

/// Label stored in `service_name` for a multi-service booking.
pub fn combined_name(catalog: &[ServiceItem], selected_ids: &[i64]) -> String {
    selected_services(catalog, selected_ids)
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(" + ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: i64, name: &str, minutes: u32) -> ServiceItem {
        ServiceItem {
            id: Some(id),
            ..ServiceItem::new(1, name, minutes)
        }
    }

    fn catalog() -> Vec<ServiceItem> {
        vec![
            stored(1, "Haircut", 20).with_price(70.0),
            stored(2, "Beard trim", 10),
            stored(3, "Laser hair removal", 45).hidden(),
        ]
    }

    #[test]
    fn test_total_duration_sums_selection() {
        assert_eq!(total_duration(&catalog(), &[1, 2]), 30);
    }

    #[test]
    fn test_unknown_and_hidden_ids_are_skipped() {
        assert_eq!(total_duration(&catalog(), &[1, 99]), 20);
        assert_eq!(total_duration(&catalog(), &[1, 3]), 20);
        assert_eq!(total_duration(&catalog(), &[]), 0);
        assert_eq!(combined_name(&catalog(), &[3, 2]), "Beard trim");
    }

    #[test]
    fn test_combined_name_keeps_selection_order() {
        assert_eq!(combined_name(&catalog(), &[2, 1]), "Beard trim + Haircut");
    }

    #[test]
    fn test_validate() {
        assert!(ServiceItem::new(1, "Haircut", 20).validate().is_ok());
        assert!(ServiceItem::new(1, " ", 20).validate().is_err());
        assert!(ServiceItem::new(1, "Haircut", 0).validate().is_err());
        assert!(ServiceItem::new(1, "Haircut", 20).with_price(-5.0).validate().is_err());
        assert!(ServiceCategory::new("").validate().is_err());
    }
}
