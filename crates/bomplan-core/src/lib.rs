//! # BomPlan Core
//!
//! 核心資料模型、資料提供介面與錯誤類型定義

pub mod material;
pub mod plan;
pub mod provider;
pub mod recipe;
pub mod snapshot;

// Re-export 主要類型
pub use material::Material;
pub use plan::{PlanItem, ProductionPlan};
pub use provider::{MaterialProvider, PlanDataSource, ProductProvider, ProductRef, RecipeProvider};
pub use recipe::{Component, Recipe, RequirementLine};
pub use snapshot::InMemoryDataSource;

/// 租戶ID
pub type TenantId = uuid::Uuid;
/// 產品ID
pub type ProductId = uuid::Uuid;
/// 物料ID
pub type MaterialId = uuid::Uuid;
/// 配方ID
pub type RecipeId = uuid::Uuid;

/// 計劃核心錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, thiserror::Error)]
pub enum PlanError {
    #[error("找不到產品: {0}")]
    ProductNotFound(ProductId),

    #[error("產品 {0} 的租戶不符")]
    TenantMismatch(ProductId),

    #[error("產品 {0} 沒有啟用中的配方")]
    NoActiveRecipe(ProductId),

    #[error("找不到物料: {0}")]
    MaterialNotFound(MaterialId),

    #[error("無效的數量: {0}")]
    InvalidQuantity(String),

    #[error("資料來源不可用: {0}")]
    DataUnavailable(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
