//! 庫存產能計算器
//!
//! 對單一產品回答三個問題：目前庫存最多能做多少、做指定批量要耗用
//! 多少與缺多少、在上下限內最大可行批量是多少。
//! 所有計算都是對提供者快照的純函數，不寫入也不保留狀態。

use rayon::prelude::*;
use rust_decimal::Decimal;

use bomplan_core::{
    PlanDataSource, PlanError, ProductId, Recipe, RequirementLine, Result, TenantId,
};

use crate::{
    AvailabilityReport, BatchRequirements, BulkAvailability, Capacity, CapacityCalculator,
    OptimalBatch,
};

/// 庫存產能計算器
pub struct InventoryCalculator<'a, D> {
    /// 資料來源（配方、物料、產品）
    source: &'a D,

    /// 請求的租戶
    tenant_id: TenantId,
}

impl<'a, D: PlanDataSource> InventoryCalculator<'a, D> {
    /// 創建新的計算器
    pub fn new(source: &'a D, tenant_id: TenantId) -> Self {
        Self { source, tenant_id }
    }

    /// 計算可生產數量
    ///
    /// 每行產能 = floor(庫存 / 有效用量)，可生產數量取最小值；
    /// 無組成的配方回報 `Capacity::Unlimited` 哨兵值而非零。
    pub fn available_quantity(&self, product_id: ProductId) -> Result<AvailabilityReport> {
        tracing::debug!("計算可生產數量: 產品 {}", product_id);

        let recipe = self.load_recipe(product_id)?;
        let lines = recipe.requirement_lines();

        if lines.is_empty() {
            tracing::debug!("產品 {} 的配方無組成，產能無上限", product_id);
            return Ok(AvailabilityReport {
                product_id,
                achievable: Capacity::Unlimited,
                limiting_material_id: None,
                per_component: Vec::new(),
            });
        }

        let stocks = self.load_stocks(&lines)?;
        let (per_component, achievable, limiting_material_id) =
            CapacityCalculator::evaluate(&lines, &stocks);

        tracing::debug!(
            "產品 {} 可生產 {} 單位，限制性物料 {:?}",
            product_id,
            achievable,
            limiting_material_id
        );

        Ok(AvailabilityReport {
            product_id,
            achievable: Capacity::Finite(achievable),
            limiting_material_id,
            per_component,
        })
    }

    /// 計算指定批次數量的物料需求與缺口
    pub fn batch_requirements(
        &self,
        product_id: ProductId,
        quantity: u64,
    ) -> Result<BatchRequirements> {
        if quantity == 0 {
            return Err(PlanError::InvalidQuantity(
                "批次數量必須為正整數".to_string(),
            ));
        }

        tracing::debug!("計算批次需求: 產品 {} × {}", product_id, quantity);

        let recipe = self.load_recipe(product_id)?;
        let lines = recipe.requirement_lines();
        let stocks = self.load_stocks(&lines)?;

        let lines = CapacityCalculator::requirements(&lines, &stocks, quantity);
        let feasible = lines.iter().all(|line| line.shortage == Decimal::ZERO);

        Ok(BatchRequirements {
            product_id,
            quantity,
            lines,
            feasible,
        })
    }

    /// 計算上下限內的最適批量
    ///
    /// `optimal = min(可生產數量, 上限)`；低於下限時 `feasible = false`，
    /// 但保留截斷後的值供呼叫端顯示缺額。下限為 0 視同未設下限。
    pub fn optimal_batch_size(
        &self,
        product_id: ProductId,
        min_quantity: Option<u64>,
        max_quantity: Option<u64>,
    ) -> Result<OptimalBatch> {
        if let (Some(min), Some(max)) = (min_quantity, max_quantity) {
            if min > max {
                return Err(PlanError::InvalidQuantity(format!(
                    "批量下限 {} 大於上限 {}",
                    min, max
                )));
            }
        }

        let report = self.available_quantity(product_id)?;

        let optimal = match (report.achievable, max_quantity) {
            // 無上限產能：有上限取上限，否則維持無上限哨兵值
            (Capacity::Unlimited, Some(max)) => Capacity::Finite(max),
            (Capacity::Unlimited, None) => Capacity::Unlimited,
            (Capacity::Finite(achievable), max) => {
                Capacity::Finite(achievable.min(max.unwrap_or(achievable)))
            }
        };

        let feasible = match (optimal, min_quantity) {
            (Capacity::Unlimited, _) | (_, None) => true,
            (Capacity::Finite(units), Some(min)) => units >= min,
        };

        Ok(OptimalBatch {
            product_id,
            optimal_quantity: optimal,
            feasible,
        })
    }

    /// 批次查詢多產品可生產數量
    ///
    /// 逐產品隔離失敗：單一產品出錯不影響其他產品的結果，
    /// 回傳依請求順序排列。
    pub fn bulk_available(&self, product_ids: &[ProductId]) -> BulkAvailability
    where
        D: Sync,
    {
        tracing::info!("批次查詢可生產數量：{} 項", product_ids.len());

        let outcomes: Vec<(ProductId, Result<AvailabilityReport>)> = product_ids
            .par_iter()
            .map(|product_id| (*product_id, self.available_quantity(*product_id)))
            .collect();

        let mut reports = Vec::new();
        let mut errors = Vec::new();

        for (product_id, outcome) in outcomes {
            match outcome {
                Ok(report) => reports.push(report),
                Err(error) => {
                    tracing::debug!("產品 {} 查詢失敗: {}", product_id, error);
                    errors.push((product_id, error));
                }
            }
        }

        BulkAvailability { reports, errors }
    }

    /// 載入並驗證產品的啟用配方
    fn load_recipe(&self, product_id: ProductId) -> Result<Recipe> {
        let product = self
            .source
            .product(product_id)?
            .ok_or(PlanError::ProductNotFound(product_id))?;

        if product.tenant_id != self.tenant_id {
            return Err(PlanError::TenantMismatch(product_id));
        }

        let recipe = self
            .source
            .active_recipe(product_id)?
            .ok_or(PlanError::NoActiveRecipe(product_id))?;

        // 提供者已帶租戶範圍，此處為不變量的雙重檢查
        if recipe.tenant_id != self.tenant_id {
            return Err(PlanError::TenantMismatch(product_id));
        }

        Ok(recipe)
    }

    /// 載入需求行對應的庫存（與 lines 等長對齊）
    fn load_stocks(&self, lines: &[RequirementLine]) -> Result<Vec<Decimal>> {
        lines
            .iter()
            .map(|line| {
                self.source
                    .material(line.material_id)?
                    .map(|material| material.stock_quantity)
                    .ok_or(PlanError::MaterialNotFound(line.material_id))
            })
            .collect()
    }
}
