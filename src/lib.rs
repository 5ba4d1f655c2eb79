//! # BomPlan
//!
//! 多租戶零售後端的 BOM 受限生產計劃核心：
//! 單一產品的產能、批次需求與最適批量計算（`bomplan-calc`），
//! 以及多產品共用有限物料時的水位分配（`bomplan-alloc`）。
//!
//! 所有計算都是對提供者快照的純函數，不寫入庫存；
//! 結果是建議性的，投產流程須在提交時重新驗證。

// Re-export 主要類型
pub use bomplan_core::{
    Component, InMemoryDataSource, Material, MaterialId, MaterialProvider, PlanDataSource,
    PlanError, PlanItem, ProductId, ProductProvider, ProductRef, ProductionPlan, Recipe,
    RecipeId, RecipeProvider, RequirementLine, Result, TenantId,
};

pub use bomplan_calc::{
    AvailabilityReport, BatchRequirements, BulkAvailability, Capacity, CapacityCalculator,
    ComponentCapacity, InventoryCalculator, MaterialRequirement, OptimalBatch,
};

pub use bomplan_alloc::{
    BatchPlanner, MaterialUtilization, PlanFailure, PlanOutcome, ProductAllocation,
    ProductDemand, WaterFill,
};
