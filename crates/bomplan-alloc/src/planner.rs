//! 多產品批次計劃器
//!
//! 計劃開始時透過提供者讀取一次配方與庫存快照，之後全程在記憶體
//! 內計算；結果是建議性的，實際投產流程須在提交時重新驗證庫存。

use std::collections::HashMap;

use rust_decimal::Decimal;

use bomplan_core::{
    MaterialId, PlanDataSource, PlanError, PlanItem, ProductionPlan, Result, TenantId,
};

use crate::waterfill::{ProductDemand, WaterFill};
use crate::{MaterialUtilization, PlanFailure, PlanOutcome, ProductAllocation};

/// 瓶頸判定門檻：耗用比率 ≥ 99%
const BOTTLENECK_THRESHOLD: Decimal = Decimal::from_parts(99, 0, 0, false, 2);

/// 多產品批次計劃器
pub struct BatchPlanner<'a, D> {
    /// 資料來源
    source: &'a D,

    /// 請求的租戶
    tenant_id: TenantId,
}

impl<'a, D: PlanDataSource> BatchPlanner<'a, D> {
    /// 創建新的計劃器
    pub fn new(source: &'a D, tenant_id: TenantId) -> Self {
        Self { source, tenant_id }
    }

    /// 計劃多產品同時生產
    ///
    /// 單一產品的錯誤（無配方、查無產品等）被隔離進結果的 `errors`，
    /// 其餘產品照常分配；只有資料來源本身失敗（`DataUnavailable`）
    /// 才讓整個呼叫失敗。
    pub fn plan(&self, plan: &ProductionPlan) -> Result<PlanOutcome> {
        tracing::info!("開始多產品計劃：{} 項", plan.len());

        let mut demands: Vec<ProductDemand> = Vec::new();
        let mut stock: HashMap<MaterialId, Decimal> = HashMap::new();
        let mut errors: Vec<PlanFailure> = Vec::new();

        // 一次性載入快照；分配迴圈中不再讀取資料
        for item in plan.items() {
            match self.load_demand(item, &mut stock) {
                Ok(demand) => demands.push(demand),
                // 資料來源失敗：整體中止，由呼叫端重試
                Err(PlanError::DataUnavailable(message)) => {
                    return Err(PlanError::DataUnavailable(message));
                }
                Err(error) => {
                    tracing::debug!("產品 {} 排除於計劃外: {}", item.product_id, error);
                    errors.push(PlanFailure {
                        product_id: item.product_id,
                        error,
                    });
                }
            }
        }

        let allocations = WaterFill::allocate(&demands, &stock);
        let consumption = WaterFill::consumption(&demands, &allocations);

        // 物料依計劃中首次被需求的順序列出（結果可重現）
        let mut material_order: Vec<MaterialId> = Vec::new();
        for demand in &demands {
            for line in &demand.lines {
                if !material_order.contains(&line.material_id) {
                    material_order.push(line.material_id);
                }
            }
        }

        let mut utilization = Vec::with_capacity(material_order.len());
        let mut bottleneck_materials = Vec::new();

        for material_id in material_order {
            let consumed = consumption
                .get(&material_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let stock_quantity = stock.get(&material_id).copied().unwrap_or(Decimal::ZERO);

            // 零庫存但被需求的物料視為完全受限（封鎖 ≠ 未使用）
            let ratio = if stock_quantity > Decimal::ZERO {
                consumed / stock_quantity
            } else {
                Decimal::ONE
            };

            if ratio >= BOTTLENECK_THRESHOLD {
                bottleneck_materials.push(material_id);
            }

            utilization.push(MaterialUtilization {
                material_id,
                consumed,
                stock_quantity,
                ratio,
            });
        }

        let allocations: Vec<ProductAllocation> = demands
            .iter()
            .zip(&allocations)
            .map(|(demand, allocated)| ProductAllocation {
                product_id: demand.product_id,
                requested_quantity: demand.requested_quantity,
                allocated_quantity: *allocated,
            })
            .collect();

        tracing::info!(
            "多產品計劃完成：{} 項分配、{} 項失敗、{} 個瓶頸物料",
            allocations.len(),
            errors.len(),
            bottleneck_materials.len()
        );

        Ok(PlanOutcome {
            allocations,
            utilization,
            bottleneck_materials,
            errors,
        })
    }

    /// 載入單一產品的需求與其物料庫存
    fn load_demand(
        &self,
        item: &PlanItem,
        stock: &mut HashMap<MaterialId, Decimal>,
    ) -> Result<ProductDemand> {
        if item.requested_quantity == 0 {
            return Err(PlanError::InvalidQuantity(format!(
                "產品 {} 的請求數量必須為正整數",
                item.product_id
            )));
        }

        let product = self
            .source
            .product(item.product_id)?
            .ok_or(PlanError::ProductNotFound(item.product_id))?;

        if product.tenant_id != self.tenant_id {
            return Err(PlanError::TenantMismatch(item.product_id));
        }

        let recipe = self
            .source
            .active_recipe(item.product_id)?
            .ok_or(PlanError::NoActiveRecipe(item.product_id))?;

        if recipe.tenant_id != self.tenant_id {
            return Err(PlanError::TenantMismatch(item.product_id));
        }

        let lines = recipe.requirement_lines();

        for line in &lines {
            if stock.contains_key(&line.material_id) {
                continue;
            }
            let material = self
                .source
                .material(line.material_id)?
                .ok_or(PlanError::MaterialNotFound(line.material_id))?;
            stock.insert(line.material_id, material.stock_quantity);
        }

        Ok(ProductDemand {
            product_id: item.product_id,
            requested_quantity: item.requested_quantity,
            lines,
        })
    }
}
