//! 資料提供介面
//!
//! 外部協作者（配方管理、庫存管理、產品目錄）以租戶範圍提供唯讀資料。
//! 實作本身即帶租戶範圍：`Err` 表示資料來源失敗（`DataUnavailable`），
//! `Ok(None)` 表示查無資料，由計算引擎對應為各自的 NotFound 錯誤。

use serde::{Deserialize, Serialize};

use crate::{Material, MaterialId, ProductId, Recipe, Result, TenantId};

/// 產品參照（存在性與租戶驗證用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    /// 產品ID
    pub id: ProductId,

    /// 產品名稱
    pub name: String,

    /// 租戶ID
    pub tenant_id: TenantId,
}

impl ProductRef {
    /// 創建新的產品參照
    pub fn new(id: ProductId, tenant_id: TenantId, name: String) -> Self {
        Self {
            id,
            name,
            tenant_id,
        }
    }
}

/// 配方提供者
pub trait RecipeProvider {
    /// 取得產品目前唯一啟用中的配方
    ///
    /// 「每產品恰一份啟用配方」由提供者維護，計算引擎不自行挑選。
    fn active_recipe(&self, product_id: ProductId) -> Result<Option<Recipe>>;
}

/// 物料庫存提供者
pub trait MaterialProvider {
    /// 取得物料目前的庫存記錄
    fn material(&self, material_id: MaterialId) -> Result<Option<Material>>;
}

/// 產品目錄提供者
pub trait ProductProvider {
    /// 取得產品參照
    fn product(&self, product_id: ProductId) -> Result<Option<ProductRef>>;
}

/// 彙總介面：計算引擎的完整資料來源
pub trait PlanDataSource: RecipeProvider + MaterialProvider + ProductProvider {}

impl<T: RecipeProvider + MaterialProvider + ProductProvider> PlanDataSource for T {}
