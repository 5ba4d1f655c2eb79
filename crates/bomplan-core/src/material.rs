//! 物料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MaterialId, TenantId};

/// 物料（原料）庫存記錄
///
/// 庫存僅由外部的進貨／調整流程異動，對計劃核心而言是唯讀快照。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// 物料ID
    pub id: MaterialId,

    /// 租戶ID
    pub tenant_id: TenantId,

    /// 物料名稱
    pub name: String,

    /// 現有庫存（非負）
    pub stock_quantity: Decimal,

    /// 計量單位
    pub unit: String,

    /// 單位成本
    pub unit_cost: Decimal,
}

impl Material {
    /// 創建新的物料記錄
    pub fn new(
        id: MaterialId,
        tenant_id: TenantId,
        name: String,
        stock_quantity: Decimal,
    ) -> Self {
        Self {
            id,
            tenant_id,
            name,
            stock_quantity,
            unit: "unit".to_string(),
            unit_cost: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置計量單位
    pub fn with_unit(mut self, unit: String) -> Self {
        self.unit = unit;
        self
    }

    /// 建構器模式：設置單位成本
    pub fn with_unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    /// 檢查是否有現貨
    pub fn has_stock(&self) -> bool {
        self.stock_quantity > Decimal::ZERO
    }
}
