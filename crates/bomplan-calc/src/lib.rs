//! # BomPlan 計算引擎
//!
//! 單一產品的產能、批次需求與最適批量計算

pub mod calculator;
pub mod capacity;

// Re-export 主要類型
pub use calculator::InventoryCalculator;
pub use capacity::CapacityCalculator;

use rust_decimal::Decimal;
use serde::Serialize;

use bomplan_core::{MaterialId, PlanError, ProductId};

/// 產能值
///
/// 無組成的配方沒有物料限制，以 `Unlimited` 哨兵值回報，
/// 與「計算過且為零」明確區分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capacity {
    /// 無上限（配方沒有任何組成）
    Unlimited,
    /// 有限產能（單位數）
    Finite(u64),
}

impl Capacity {
    /// 是否無上限
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Capacity::Unlimited)
    }

    /// 取得有限單位數
    pub fn units(&self) -> Option<u64> {
        match self {
            Capacity::Unlimited => None,
            Capacity::Finite(units) => Some(*units),
        }
    }
}

/// 單一物料行的產能明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentCapacity {
    /// 物料ID
    pub material_id: MaterialId,

    /// 每一產出單位的有效用量
    pub effective_quantity: Decimal,

    /// 現有庫存
    pub stock_quantity: Decimal,

    /// 此物料單獨可支撐的產量 = floor(庫存 / 有效用量)
    pub capacity: u64,

    /// 在可生產數量下的耗用比率（耗用 / 庫存）
    pub utilization: Decimal,
}

/// 可生產數量報告（§ 產能計算）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    /// 產品ID
    pub product_id: ProductId,

    /// 可生產數量
    pub achievable: Capacity,

    /// 限制性物料（瓶頸）；無上限時為 None，平手時取配方首行
    pub limiting_material_id: Option<MaterialId>,

    /// 各物料行明細
    pub per_component: Vec<ComponentCapacity>,
}

/// 單一物料的批次需求行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialRequirement {
    /// 物料ID
    pub material_id: MaterialId,

    /// 總需求量 = 有效用量 × 批次數量
    pub required: Decimal,

    /// 現有庫存
    pub stock_quantity: Decimal,

    /// 缺口 = max(0, 需求 − 庫存)
    pub shortage: Decimal,
}

/// 批次需求報告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequirements {
    /// 產品ID
    pub product_id: ProductId,

    /// 請求的批次數量
    pub quantity: u64,

    /// 各物料需求行
    pub lines: Vec<MaterialRequirement>,

    /// 所有物料缺口皆為零時可行
    pub feasible: bool,
}

/// 最適批量報告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimalBatch {
    /// 產品ID
    pub product_id: ProductId,

    /// 最適批量（達不到下限時保留截斷後的值，供呼叫端顯示缺額）
    pub optimal_quantity: Capacity,

    /// 是否滿足請求的下限
    pub feasible: bool,
}

/// 批次可生產數量查詢結果（部分失敗隔離）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAvailability {
    /// 成功計算的報告（依請求順序）
    pub reports: Vec<AvailabilityReport>,

    /// 失敗的產品與原因（依請求順序）
    pub errors: Vec<(ProductId, PlanError)>,
}

impl BulkAvailability {
    /// 取得指定產品的報告
    pub fn report_for(&self, product_id: ProductId) -> Option<&AvailabilityReport> {
        self.reports.iter().find(|r| r.product_id == product_id)
    }
}
