//! Service catalog stored in the `categories` and `services` tables.

use anyhow::{anyhow, Context, Result};
use rusqlite::{self, params, Connection, Row};

use crate::models::service_item::{ServiceCategory, ServiceItem};

const SERVICE_COLUMNS: &str = "id, category_id, name, notes, price, price_is_min,
     duration_minutes, hidden_from_booking, sort_order";

pub struct ServiceCatalogService<'a> {
    conn: &'a Connection,
}

impl<'a> ServiceCatalogService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn list_categories(&self) -> Result<Vec<ServiceCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, sort_order FROM categories ORDER BY sort_order ASC, id ASC",
        )?;

        let categories = stmt
            .query_map([], |row| {
                Ok(ServiceCategory {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    sort_order: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to load categories")?;

        Ok(categories)
    }

    /// Store a category after the last one.
    pub fn create_category(&self, category: &ServiceCategory) -> Result<ServiceCategory> {
        category.validate().map_err(|e| anyhow!(e))?;

        let next: i32 = self.conn.query_row(
            "SELECT COALESCE(MAX(sort_order), 0) + 1 FROM categories",
            [],
            |row| row.get(0),
        )?;
        self.conn
            .execute(
                "INSERT INTO categories (name, sort_order) VALUES (?1, ?2)",
                params![category.name.trim(), next],
            )
            .context("Failed to insert category")?;

        Ok(ServiceCategory {
            id: Some(self.conn.last_insert_rowid()),
            name: category.name.trim().to_string(),
            sort_order: next,
        })
    }

    /// Every service, grouped by category and ordered inside it.
    pub fn list_services(&self) -> Result<Vec<ServiceItem>> {
        self.query_services(&format!(
            "SELECT {} FROM services ORDER BY category_id ASC, sort_order ASC, id ASC",
            SERVICE_COLUMNS
        ))
    }

    /// The part of the catalog offered to clients.
    pub fn bookable_services(&self) -> Result<Vec<ServiceItem>> {
        self.query_services(&format!(
            "SELECT {} FROM services WHERE hidden_from_booking = 0
             ORDER BY category_id ASC, sort_order ASC, id ASC",
            SERVICE_COLUMNS
        ))
    }

    pub fn get_service(&self, id: i64) -> Result<Option<ServiceItem>> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM services WHERE id = ?1", SERVICE_COLUMNS),
            [id],
            map_service_row,
        );

        match result {
            Ok(service) => Ok(Some(service)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store a service at the end of its category.
    pub fn create_service(&self, service: &ServiceItem) -> Result<ServiceItem> {
        service.validate().map_err(|e| anyhow!(e))?;
        self.ensure_category(service.category_id)?;

        let next: i32 = self.conn.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM services WHERE category_id = ?1",
            [service.category_id],
            |row| row.get(0),
        )?;

        self.conn
            .execute(
                "INSERT INTO services (category_id, name, notes, price, price_is_min,
                    duration_minutes, hidden_from_booking, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    service.category_id,
                    service.name.trim(),
                    service.notes,
                    service.price,
                    service.price_is_min as i32,
                    service.duration_minutes,
                    service.hidden_from_booking as i32,
                    next,
                ],
            )
            .context("Failed to insert service")?;

        let id = self.conn.last_insert_rowid();
        log::info!("Added service {} ({} min)", service.name.trim(), service.duration_minutes);
        self.get_service(id)?
            .ok_or_else(|| anyhow!("Service {} vanished after insert", id))
    }

    /// Save the editable fields of a service; its position is kept.
    pub fn update_service(&self, service: &ServiceItem) -> Result<()> {
        service.validate().map_err(|e| anyhow!(e))?;
        let id = service
            .id
            .ok_or_else(|| anyhow!("Service ID is required for update"))?;
        self.ensure_category(service.category_id)?;

        let rows = self
            .conn
            .execute(
                "UPDATE services SET category_id = ?1, name = ?2, notes = ?3, price = ?4,
                    price_is_min = ?5, duration_minutes = ?6, hidden_from_booking = ?7
                 WHERE id = ?8",
                params![
                    service.category_id,
                    service.name.trim(),
                    service.notes,
                    service.price,
                    service.price_is_min as i32,
                    service.duration_minutes,
                    service.hidden_from_booking as i32,
                    id,
                ],
            )
            .with_context(|| format!("Failed to update service {}", id))?;

        if rows == 0 {
            return Err(anyhow!("Service with id {} not found", id));
        }
        Ok(())
    }

    pub fn delete_service(&self, id: i64) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM services WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete service {}", id))?;

        if rows == 0 {
            return Err(anyhow!("Service with id {} not found", id));
        }
        Ok(())
    }

    /// Move `dragged_id` to the position of `target_id` inside their shared
    /// category and renumber the category from zero.
    pub fn reorder_service(&self, dragged_id: i64, target_id: i64) -> Result<()> {
        let dragged = self
            .get_service(dragged_id)?
            .ok_or_else(|| anyhow!("Service with id {} not found", dragged_id))?;
        let target = self
            .get_service(target_id)?
            .ok_or_else(|| anyhow!("Service with id {} not found", target_id))?;

        if dragged.category_id != target.category_id {
            return Err(anyhow!("Services can only be reordered within one category"));
        }
        if dragged_id == target_id {
            return Ok(());
        }

        let mut ids: Vec<i64> = self
            .list_services()?
            .into_iter()
            .filter(|s| s.category_id == dragged.category_id)
            .filter_map(|s| s.id)
            .collect();
        let from = ids.iter().position(|id| *id == dragged_id);
        let to = ids.iter().position(|id| *id == target_id);
        let (Some(from), Some(to)) = (from, to) else {
            return Err(anyhow!("Service order changed while reordering"));
        };
        let moved = ids.remove(from);
        ids.insert(to, moved);

        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to start reorder")?;
        for (position, id) in ids.iter().enumerate() {
            tx.execute(
                "UPDATE services SET sort_order = ?1 WHERE id = ?2",
                params![position as i32, id],
            )?;
        }
        tx.commit().context("Failed to save service order")?;

        log::debug!("Service {} moved to position {}", dragged_id, to);
        Ok(())
    }

    fn ensure_category(&self, id: i64) -> Result<()> {
        let exists: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE id = ?1",
            [id],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(anyhow!("Category with id {} not found", id));
        }
        Ok(())
    }

    fn query_services(&self, sql: &str) -> Result<Vec<ServiceItem>> {
        let mut stmt = self.conn.prepare(sql)?;
        let services = stmt
            .query_map([], map_service_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to load services")?;
        Ok(services)
    }
}

fn map_service_row(row: &Row<'_>) -> rusqlite::Result<ServiceItem> {
    Ok(ServiceItem {
        id: Some(row.get(0)?),
        category_id: row.get(1)?,
        name: row.get(2)?,
        notes: row.get(3)?,
        price: row.get(4)?,
        price_is_min: row.get::<_, i32>(5)? != 0,
        duration_minutes: row.get(6)?,
        hidden_from_booking: row.get::<_, i32>(7)? != 0,
        sort_order: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;
    use pretty_assertions::assert_eq;

    fn setup_test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn names(services: &[ServiceItem]) -> Vec<&str> {
        services.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_categories_append_in_order() {
        let db = setup_test_db();
        let catalog = ServiceCatalogService::new(db.connection());

        let hair = catalog.create_category(&ServiceCategory::new("Hair")).unwrap();
        let beard = catalog.create_category(&ServiceCategory::new(" Beard ")).unwrap();

        assert_eq!(hair.sort_order, 1);
        assert_eq!(beard.sort_order, 2);
        assert_eq!(beard.name, "Beard");
        assert_eq!(catalog.list_categories().unwrap(), vec![hair, beard]);
        assert!(catalog.create_category(&ServiceCategory::new("")).is_err());
    }

    #[test]
    fn test_create_and_get_service() {
        let db = setup_test_db();
        let catalog = ServiceCatalogService::new(db.connection());
        let hair = catalog.create_category(&ServiceCategory::new("Hair")).unwrap();
        let hair_id = hair.id.unwrap();

        let cut = catalog
            .create_service(&ServiceItem::new(hair_id, "Haircut", 20).with_price(70.0))
            .unwrap();
        let kids = catalog
            .create_service(&ServiceItem::new(hair_id, "Kids cut", 15))
            .unwrap();

        assert_eq!(cut.sort_order, 0);
        assert_eq!(kids.sort_order, 1);
        assert_eq!(catalog.get_service(cut.id.unwrap()).unwrap(), Some(cut));
        assert_eq!(catalog.get_service(999).unwrap(), None);
    }

    #[test]
    fn test_create_service_needs_known_category() {
        let db = setup_test_db();
        let catalog = ServiceCatalogService::new(db.connection());

        assert!(catalog.create_service(&ServiceItem::new(42, "Haircut", 20)).is_err());
    }

    #[test]
    fn test_hidden_services_are_not_bookable() {
        let db = setup_test_db();
        let catalog = ServiceCatalogService::new(db.connection());
        let hair_id = catalog.create_category(&ServiceCategory::new("Hair")).unwrap().id.unwrap();

        catalog.create_service(&ServiceItem::new(hair_id, "Haircut", 20)).unwrap();
        catalog
            .create_service(&ServiceItem::new(hair_id, "Perm", 90).hidden())
            .unwrap();

        assert_eq!(names(&catalog.list_services().unwrap()), vec!["Haircut", "Perm"]);
        assert_eq!(names(&catalog.bookable_services().unwrap()), vec!["Haircut"]);
    }

    #[test]
    fn test_update_keeps_position() {
        let db = setup_test_db();
        let catalog = ServiceCatalogService::new(db.connection());
        let hair_id = catalog.create_category(&ServiceCategory::new("Hair")).unwrap().id.unwrap();
        catalog.create_service(&ServiceItem::new(hair_id, "Haircut", 20)).unwrap();
        let mut beard = catalog
            .create_service(&ServiceItem::new(hair_id, "Beard", 10))
            .unwrap();

        beard.duration_minutes = 15;
        beard.price_is_min = true;
        beard.sort_order = 7;
        catalog.update_service(&beard).unwrap();

        let stored = catalog.get_service(beard.id.unwrap()).unwrap().unwrap();
        assert_eq!(stored.duration_minutes, 15);
        assert!(stored.price_is_min);
        assert_eq!(stored.sort_order, 1);
    }

    #[test]
    fn test_update_and_delete_missing_service() {
        let db = setup_test_db();
        let catalog = ServiceCatalogService::new(db.connection());
        let hair_id = catalog.create_category(&ServiceCategory::new("Hair")).unwrap().id.unwrap();

        let ghost = ServiceItem {
            id: Some(77),
            ..ServiceItem::new(hair_id, "Ghost", 10)
        };
        assert!(catalog.update_service(&ghost).is_err());
        assert!(catalog.update_service(&ServiceItem::new(hair_id, "No id", 10)).is_err());
        assert!(catalog.delete_service(77).is_err());
    }

    #[test]
    fn test_delete_service() {
        let db = setup_test_db();
        let catalog = ServiceCatalogService::new(db.connection());
        let hair_id = catalog.create_category(&ServiceCategory::new("Hair")).unwrap().id.unwrap();
        let cut = catalog.create_service(&ServiceItem::new(hair_id, "Haircut", 20)).unwrap();

        catalog.delete_service(cut.id.unwrap()).unwrap();
        assert!(catalog.list_services().unwrap().is_empty());
    }

    #[test]
    fn test_reorder_within_category() {
        let db = setup_test_db();
        let catalog = ServiceCatalogService::new(db.connection());
        let hair_id = catalog.create_category(&ServiceCategory::new("Hair")).unwrap().id.unwrap();
        let a = catalog.create_service(&ServiceItem::new(hair_id, "A", 10)).unwrap();
        catalog.create_service(&ServiceItem::new(hair_id, "B", 10)).unwrap();
        let c = catalog.create_service(&ServiceItem::new(hair_id, "C", 10)).unwrap();

        catalog.reorder_service(c.id.unwrap(), a.id.unwrap()).unwrap();

        let services = catalog.list_services().unwrap();
        assert_eq!(names(&services), vec!["C", "A", "B"]);
        let orders: Vec<i32> = services.iter().map(|s| s.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_across_categories_is_refused() {
        let db = setup_test_db();
        let catalog = ServiceCatalogService::new(db.connection());
        let hair_id = catalog.create_category(&ServiceCategory::new("Hair")).unwrap().id.unwrap();
        let beard_id = catalog.create_category(&ServiceCategory::new("Beard")).unwrap().id.unwrap();
        let cut = catalog.create_service(&ServiceItem::new(hair_id, "Haircut", 20)).unwrap();
        let trim = catalog.create_service(&ServiceItem::new(beard_id, "Trim", 10)).unwrap();

        assert!(catalog.reorder_service(cut.id.unwrap(), trim.id.unwrap()).is_err());
    }
}
