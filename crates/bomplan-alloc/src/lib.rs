//! # BomPlan 配置器
//!
//! 多產品共用有限物料時的公平分配（水位法 + 依序補量）

pub mod planner;
pub mod waterfill;

// Re-export 主要類型
pub use planner::BatchPlanner;
pub use waterfill::{ProductDemand, WaterFill};

use rust_decimal::Decimal;
use serde::Serialize;

use bomplan_core::{MaterialId, PlanError, ProductId};

/// 單一產品的分配結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductAllocation {
    /// 產品ID
    pub product_id: ProductId,

    /// 請求數量
    pub requested_quantity: u64,

    /// 實際分配數量（≤ 請求數量）
    pub allocated_quantity: u64,
}

impl ProductAllocation {
    /// 是否完全滿足請求
    pub fn is_fully_allocated(&self) -> bool {
        self.allocated_quantity == self.requested_quantity
    }
}

/// 單一物料的耗用情況
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialUtilization {
    /// 物料ID
    pub material_id: MaterialId,

    /// 最終分配下的總耗用
    pub consumed: Decimal,

    /// 現有庫存
    pub stock_quantity: Decimal,

    /// 耗用比率（耗用 / 庫存；庫存為零且有需求時視為 1）
    pub ratio: Decimal,
}

/// 單一產品的計劃失敗記錄
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanFailure {
    /// 產品ID
    pub product_id: ProductId,

    /// 失敗原因
    pub error: PlanError,
}

/// 多產品計劃結果
///
/// 部分失敗語意：單一產品的錯誤進入 `errors`，
/// 其餘產品照常參與分配。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutcome {
    /// 各產品分配（依計劃順序）
    pub allocations: Vec<ProductAllocation>,

    /// 各物料耗用（依計劃中首次被需求的順序）
    pub utilization: Vec<MaterialUtilization>,

    /// 耗用比率 ≥ 99% 的瓶頸物料
    pub bottleneck_materials: Vec<MaterialId>,

    /// 失敗的產品與原因
    pub errors: Vec<PlanFailure>,
}

impl PlanOutcome {
    /// 取得指定產品的分配數量
    pub fn allocation_for(&self, product_id: ProductId) -> Option<u64> {
        self.allocations
            .iter()
            .find(|a| a.product_id == product_id)
            .map(|a| a.allocated_quantity)
    }

    /// 取得指定產品的失敗原因
    pub fn error_for(&self, product_id: ProductId) -> Option<&PlanError> {
        self.errors
            .iter()
            .find(|f| f.product_id == product_id)
            .map(|f| &f.error)
    }

    /// 是否所有參與產品都被完全滿足
    pub fn is_fully_satisfied(&self) -> bool {
        self.allocations.iter().all(|a| a.is_fully_allocated())
    }
}
