//! 記憶體內資料來源
//!
//! 測試與示範用的參考實作；生產環境由持久層以相同介面供應快照。

use std::collections::HashMap;

use crate::{
    Material, MaterialId, MaterialProvider, ProductId, ProductProvider, ProductRef, Recipe,
    RecipeProvider, Result,
};

/// 記憶體內資料來源
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    products: HashMap<ProductId, ProductRef>,
    recipes: Vec<Recipe>,
    materials: HashMap<MaterialId, Material>,
}

impl InMemoryDataSource {
    /// 創建空的資料來源
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：添加產品
    pub fn with_product(mut self, product: ProductRef) -> Self {
        self.add_product(product);
        self
    }

    /// 建構器模式：添加配方
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.add_recipe(recipe);
        self
    }

    /// 建構器模式：添加物料
    pub fn with_material(mut self, material: Material) -> Self {
        self.add_material(material);
        self
    }

    /// 添加產品
    pub fn add_product(&mut self, product: ProductRef) {
        self.products.insert(product.id, product);
    }

    /// 添加配方
    pub fn add_recipe(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    /// 添加物料
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.id, material);
    }

    /// 調整物料庫存（測試場景用）
    pub fn set_stock(&mut self, material_id: MaterialId, stock_quantity: rust_decimal::Decimal) {
        if let Some(material) = self.materials.get_mut(&material_id) {
            material.stock_quantity = stock_quantity;
        }
    }
}

impl RecipeProvider for InMemoryDataSource {
    fn active_recipe(&self, product_id: ProductId) -> Result<Option<Recipe>> {
        Ok(self
            .recipes
            .iter()
            .find(|recipe| recipe.product_id == product_id && recipe.is_active)
            .cloned())
    }
}

impl MaterialProvider for InMemoryDataSource {
    fn material(&self, material_id: MaterialId) -> Result<Option<Material>> {
        Ok(self.materials.get(&material_id).cloned())
    }
}

impl ProductProvider for InMemoryDataSource {
    fn product(&self, product_id: ProductId) -> Result<Option<ProductRef>> {
        Ok(self.products.get(&product_id).cloned())
    }
}
