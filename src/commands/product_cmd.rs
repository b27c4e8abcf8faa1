//! Commands for Product operations
//!
//! Create/update/delete flows of the product form, plus photo access.

use crate::domain::{CategoryLink, DomainError, DomainResult, ImageRef, Product, ProductDraft};
use crate::repository::Repository;
use crate::AppState;

/// Create a new product from a filled-in form
pub async fn create_product(state: &AppState, draft: ProductDraft) -> DomainResult<Product> {
    draft.validate()?;

    let category = resolve_category(state, draft.category_id).await?;

    let _images = state.images.lock().await;
    let image = match &draft.image {
        Some(bytes) => Some(state.images.save(bytes).await?),
        None => None,
    };

    let product = Product {
        item_name: draft.item_name,
        brand_name: draft.brand_name,
        description: non_blank(draft.description),
        notes: non_blank(draft.notes),
        image,
        category,
        ..Product::new(0, String::new(), String::new())
    };

    match state.products.create(&product).await {
        Ok(created) => Ok(created),
        Err(e) => {
            release_image(state, product.image).await;
            Err(e)
        }
    }
}

/// Update a product
///
/// The stored photo is replaced only when the draft carries new bytes.
pub async fn update_product(state: &AppState, id: u32, draft: ProductDraft) -> DomainResult<Product> {
    draft.validate()?;
    let _images = state.images.lock().await;
    let existing = get_product(state, id).await?;

    let category = resolve_category(state, draft.category_id).await?;
    let image = match &draft.image {
        Some(bytes) => Some(state.images.save(bytes).await?),
        None => existing.image.clone(),
    };

    let product = Product {
        id,
        item_name: draft.item_name,
        brand_name: draft.brand_name,
        description: non_blank(draft.description),
        notes: non_blank(draft.notes),
        image,
        category,
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };

    let updated = match state.products.update(&product).await {
        Ok(updated) => updated,
        Err(e) => {
            if product.image != existing.image {
                release_image(state, product.image).await;
            }
            return Err(e);
        }
    };
    if existing.image != updated.image {
        release_image(state, existing.image).await;
    }
    Ok(updated)
}

/// Delete a product and its photo if nothing else uses it
pub async fn delete_product(state: &AppState, id: u32) -> DomainResult<()> {
    let _images = state.images.lock().await;
    let existing = get_product(state, id).await?;
    state.products.delete(id).await?;
    release_image(state, existing.image).await;
    Ok(())
}

pub async fn get_product(state: &AppState, id: u32) -> DomainResult<Product> {
    state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Product {}", id)))
}

/// All products in creation order
pub async fn list_products(state: &AppState) -> DomainResult<Vec<Product>> {
    state.products.list().await
}

pub async fn remove_product_image(state: &AppState, id: u32) -> DomainResult<Product> {
    let _images = state.images.lock().await;
    let mut product = get_product(state, id).await?;
    let Some(image) = product.image.take() else {
        return Ok(product);
    };

    let updated = state.products.update(&product).await?;
    release_image(state, Some(image)).await;
    Ok(updated)
}

/// Photo bytes of a product, `None` when it has no photo
pub async fn load_product_image(state: &AppState, id: u32) -> DomainResult<Option<Vec<u8>>> {
    let product = get_product(state, id).await?;
    match &product.image {
        Some(image) => Ok(Some(state.images.load(image).await?)),
        None => Ok(None),
    }
}

async fn resolve_category(state: &AppState, category_id: Option<u32>) -> DomainResult<Option<CategoryLink>> {
    let Some(id) = category_id else {
        return Ok(None);
    };
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Category {}", id)))?;
    Ok(Some(CategoryLink {
        id: category.id,
        name: category.name,
    }))
}

/// Drop an image file once no product references it
///
/// Callers hold the image lock so no other write can pick the file up
/// between the check and the removal. Failures are logged only; anything
/// left behind is swept the next time the store opens.
async fn release_image(state: &AppState, image: Option<ImageRef>) {
    let Some(image) = image else {
        return;
    };
    match state.products.referenced_images().await {
        Ok(referenced) if referenced.contains(image.as_str()) => {}
        Ok(_) => {
            if let Err(e) = state.images.remove(&image).await {
                log::warn!("Failed to remove image {}: {}", image.as_str(), e);
            }
        }
        Err(e) => log::warn!("Failed to check image references: {}", e),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
