//! 配方（BOM）模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MaterialId, PlanError, ProductId, RecipeId, TenantId};

/// 配方組成（單一物料行）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// 物料ID
    pub material_id: MaterialId,

    /// 每一產出單位的用量（> 0）
    pub quantity_required: Decimal,

    /// 損耗率（百分比，[0, 100)）
    pub waste_percentage: Decimal,
}

impl Component {
    /// 創建新的配方組成
    pub fn new(material_id: MaterialId, quantity_required: Decimal) -> Self {
        Self {
            material_id,
            quantity_required,
            waste_percentage: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置損耗率
    pub fn with_waste_percentage(mut self, waste_percentage: Decimal) -> Self {
        self.waste_percentage = waste_percentage;
        self
    }

    /// 有效用量 = 用量 × (1 + 損耗率/100)
    ///
    /// 永遠是導出值，不單獨儲存；恆 ≥ quantity_required。
    pub fn effective_quantity(&self) -> Decimal {
        self.quantity_required * (Decimal::ONE + self.waste_percentage / Decimal::ONE_HUNDRED)
    }
}

/// 彙總後的物料需求行（同一物料的有效用量加總）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementLine {
    /// 物料ID
    pub material_id: MaterialId,

    /// 每一產出單位的有效用量
    pub effective_quantity: Decimal,
}

/// 配方（產品的物料清單）
///
/// 每個產品同一時間恰有一份 `is_active` 的配方，
/// 此不變量由外部的配方管理元件維護，核心只讀取。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// 配方ID
    pub id: RecipeId,

    /// 產品ID
    pub product_id: ProductId,

    /// 租戶ID
    pub tenant_id: TenantId,

    /// 是否為啟用中的配方
    pub is_active: bool,

    /// 產出數量
    pub yield_quantity: Decimal,

    /// 產出單位
    pub yield_unit: String,

    /// 組成（順序有意義：平手時首行優先）
    pub components: Vec<Component>,
}

impl Recipe {
    /// 創建新的配方
    pub fn new(product_id: ProductId, tenant_id: TenantId) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            tenant_id,
            is_active: true,
            yield_quantity: Decimal::ONE,
            yield_unit: "unit".to_string(),
            components: Vec::new(),
        }
    }

    /// 建構器模式：設置產出數量與單位
    pub fn with_yield(mut self, yield_quantity: Decimal, yield_unit: String) -> Self {
        self.yield_quantity = yield_quantity;
        self.yield_unit = yield_unit;
        self
    }

    /// 建構器模式：添加組成
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// 無組成配方沒有物料限制（回報為「無上限」而非零）
    pub fn is_unconstrained(&self) -> bool {
        self.components.is_empty()
    }

    /// 依物料彙總有效用量
    ///
    /// 同一物料出現多行時加總，保留首次出現的順序（平手裁決依此順序）。
    pub fn requirement_lines(&self) -> Vec<RequirementLine> {
        let mut lines: Vec<RequirementLine> = Vec::new();

        for component in &self.components {
            match lines
                .iter_mut()
                .find(|line| line.material_id == component.material_id)
            {
                Some(line) => line.effective_quantity += component.effective_quantity(),
                None => lines.push(RequirementLine {
                    material_id: component.material_id,
                    effective_quantity: component.effective_quantity(),
                }),
            }
        }

        lines
    }

    /// 驗證配方不變量
    ///
    /// 提供者應交付已驗證的資料，此方法供邊界層使用。
    pub fn validate(&self) -> crate::Result<()> {
        if self.yield_quantity <= Decimal::ZERO {
            return Err(PlanError::InvalidQuantity(format!(
                "配方 {} 的產出數量必須為正",
                self.id
            )));
        }

        for component in &self.components {
            if component.quantity_required <= Decimal::ZERO {
                return Err(PlanError::InvalidQuantity(format!(
                    "物料 {} 的組成用量必須為正",
                    component.material_id
                )));
            }
            if component.waste_percentage < Decimal::ZERO
                || component.waste_percentage >= Decimal::ONE_HUNDRED
            {
                return Err(PlanError::InvalidQuantity(format!(
                    "物料 {} 的損耗率必須在 [0, 100) 範圍內",
                    component.material_id
                )));
            }
        }

        Ok(())
    }
}
