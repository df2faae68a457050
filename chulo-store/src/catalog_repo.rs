use async_trait::async_trait;
use chulo_catalog::{CatalogError, Product, ProductCatalog};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory product catalog, optionally seeded from a JSON menu file
pub struct InMemoryCatalogRepo {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryCatalogRepo {
    pub fn new(products: Vec<Product>) -> Self {
        let products = products.into_iter().map(|p| (p.id, p)).collect();
        Self { products: RwLock::new(products) }
    }

    /// Load a JSON array of products
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Seed(format!("{}: {}", path.display(), e)))?;
        let products: Vec<Product> = serde_json::from_str(&raw)
            .map_err(|e| CatalogError::Seed(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Loaded {} products from {}", products.len(), path.display());
        Ok(Self::new(products))
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalogRepo {
    async fn get_product(&self, id: Uuid) -> Result<Product, CatalogError> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chulo_catalog::SpoilageRisk;

    #[tokio::test]
    async fn test_get_and_list() {
        let momo = Product::new("Chicken Momo", "Momo", 250.0, 50, SpoilageRisk::High);
        let thali = Product::new("Nepali Thali Set", "Thali", 550.0, 3, SpoilageRisk::Low);
        let chowmein = Product::new("Buff Chowmein", "Noodles", 220.0, 12, SpoilageRisk::Medium);
        let momo_id = momo.id;

        let repo = InMemoryCatalogRepo::new(vec![thali, momo, chowmein]);

        assert_eq!(repo.get_product(momo_id).await.unwrap().name, "Chicken Momo");

        let names: Vec<String> = repo.list_products().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Chicken Momo", "Buff Chowmein", "Nepali Thali Set"]);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let repo = InMemoryCatalogRepo::new(vec![]);
        let id = Uuid::new_v4();
        assert!(matches!(repo.get_product(id).await, Err(CatalogError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn test_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        std::fs::write(
            &path,
            r#"[{"id":"6b0f8a52-3c1e-4e8e-8a57-1d2f3a4b5c6d","name":"Sel Roti","category":"Snacks",
                "price":60,"stockQty":30,"popularityScore":6,"spoilageRisk":"medium"}]"#,
        )
        .unwrap();

        let repo = InMemoryCatalogRepo::from_seed_file(&path).unwrap();
        let products = repo.products.try_read().unwrap();
        assert_eq!(products.len(), 1);

        let bad = dir.path().join("broken.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(matches!(InMemoryCatalogRepo::from_seed_file(&bad), Err(CatalogError::Seed(_))));
    }
}
