//! # Catalog Commands
//!
//! Product and staff management. Listing is open; every change needs the
//! admin gate.
//!
//! Collections are read and written whole, so a save is
//! read → replace-or-append → write. New entries without an id get a UUID.

use tally_core::validation::{validate_product, validate_staff_roster};
use tally_core::{Product, Staff, DEFAULT_IMAGE_URL};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{AdminGate, StoreState};

// =============================================================================
// Products
// =============================================================================

pub async fn list_products(store: &StoreState) -> Vec<Product> {
    debug!("list_products command");
    store.inner().catalog().products().await
}

/// Creates or replaces a product.
///
/// ## Validation
/// - Name required, price > 0
/// - Every addon category named, with at least one option
pub async fn save_product(
    store: &StoreState,
    admin: &AdminGate,
    mut product: Product,
) -> Result<Product, ApiError> {
    debug!(product_id = %product.id, "save_product command");
    admin.require()?;

    if product.id.trim().is_empty() {
        product.id = Uuid::new_v4().to_string();
    }
    if product.image_url.trim().is_empty() {
        product.image_url = DEFAULT_IMAGE_URL.to_string();
    }
    validate_product(&product)?;

    let catalog = store.inner().catalog();
    let mut products = catalog.products().await;
    match products.iter_mut().find(|p| p.id == product.id) {
        Some(existing) => *existing = product.clone(),
        None => products.push(product.clone()),
    }

    if !catalog.set_products(&products).await.is_persisted() {
        warn!(product_id = %product.id, "Product change was not persisted; kept for this session");
    }

    info!(product_id = %product.id, name = %product.name, "Product saved");
    Ok(product)
}

pub async fn delete_product(store: &StoreState, admin: &AdminGate, product_id: &str) -> Result<(), ApiError> {
    debug!(product_id = %product_id, "delete_product command");
    admin.require()?;

    let catalog = store.inner().catalog();
    let mut products = catalog.products().await;
    let before = products.len();
    products.retain(|p| p.id != product_id);
    if products.len() == before {
        return Err(ApiError::not_found("Product", product_id));
    }

    if !catalog.set_products(&products).await.is_persisted() {
        warn!(product_id = %product_id, "Product removal was not persisted");
    }

    info!(product_id = %product_id, "Product deleted");
    Ok(())
}

// =============================================================================
// Staff
// =============================================================================

pub async fn list_staff(store: &StoreState) -> Vec<Staff> {
    debug!("list_staff command");
    store.inner().catalog().staff().await
}

/// Creates or replaces a staff member. Access codes must stay unique.
pub async fn save_staff(store: &StoreState, admin: &AdminGate, mut staff: Staff) -> Result<Staff, ApiError> {
    debug!(staff_id = %staff.id, "save_staff command");
    admin.require()?;

    if staff.id.trim().is_empty() {
        staff.id = Uuid::new_v4().to_string();
    }

    let catalog = store.inner().catalog();
    let mut roster = catalog.staff().await;
    match roster.iter_mut().find(|s| s.id == staff.id) {
        Some(existing) => *existing = staff.clone(),
        None => roster.push(staff.clone()),
    }
    validate_staff_roster(&roster)?;

    if !catalog.set_staff(&roster).await.is_persisted() {
        warn!(staff_id = %staff.id, "Staff change was not persisted; kept for this session");
    }

    info!(staff_id = %staff.id, name = %staff.name, "Staff saved");
    Ok(staff)
}

pub async fn delete_staff(store: &StoreState, admin: &AdminGate, staff_id: &str) -> Result<(), ApiError> {
    debug!(staff_id = %staff_id, "delete_staff command");
    admin.require()?;

    let catalog = store.inner().catalog();
    let mut roster = catalog.staff().await;
    let before = roster.len();
    roster.retain(|s| s.id != staff_id);
    if roster.len() == before {
        return Err(ApiError::not_found("Staff", staff_id));
    }

    if !catalog.set_staff(&roster).await.is_persisted() {
        warn!(staff_id = %staff_id, "Staff removal was not persisted");
    }

    info!(staff_id = %staff_id, "Staff deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
