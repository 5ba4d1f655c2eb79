//! 產能純計算
//!
//! 對已彙總的物料需求行與庫存快照做純函數計算，無任何 I/O。

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use bomplan_core::{MaterialId, RequirementLine};

use crate::{ComponentCapacity, MaterialRequirement};

/// 產能計算器
pub struct CapacityCalculator;

impl CapacityCalculator {
    /// Decimal 向下取整為整數單位
    ///
    /// 只在整數單位邊界取整，物料量本身保持小數。
    /// 超出 u64 範圍視為實務上無上限。
    pub fn floor_units(value: Decimal) -> u64 {
        value.floor().to_u64().unwrap_or(u64::MAX)
    }

    /// 計算各物料行產能與整體可生產數量
    ///
    /// 回傳 (明細, 可生產數量, 限制性物料)。
    /// `capacity_i = floor(庫存_i / 有效用量_i)`，可生產數量取最小值；
    /// 平手時取配方首行（保證結果可重現）。
    ///
    /// 前置條件：`lines` 非空且與 `stocks` 等長對齊。
    pub fn evaluate(
        lines: &[RequirementLine],
        stocks: &[Decimal],
    ) -> (Vec<ComponentCapacity>, u64, Option<MaterialId>) {
        let mut table = Vec::with_capacity(lines.len());
        let mut achievable = u64::MAX;
        let mut limiting: Option<MaterialId> = None;

        for (line, stock) in lines.iter().zip(stocks) {
            let capacity = if line.effective_quantity > Decimal::ZERO {
                Self::floor_units(*stock / line.effective_quantity)
            } else {
                // 用量不為正的行不構成限制（提供者已驗證 > 0）
                u64::MAX
            };

            // 嚴格小於：平手時保留首見的物料
            if capacity < achievable {
                achievable = capacity;
                limiting = Some(line.material_id);
            }

            table.push(ComponentCapacity {
                material_id: line.material_id,
                effective_quantity: line.effective_quantity,
                stock_quantity: *stock,
                capacity,
                utilization: Decimal::ZERO,
            });
        }

        // 在可生產數量下的耗用比率
        for entry in &mut table {
            entry.utilization = if entry.stock_quantity > Decimal::ZERO {
                Decimal::from(achievable) * entry.effective_quantity / entry.stock_quantity
            } else {
                Decimal::ZERO
            };
        }

        (table, achievable, limiting)
    }

    /// 計算指定批次數量的物料需求與缺口
    ///
    /// `required = 有效用量 × 數量`，`shortage = max(0, required − 庫存)`。
    pub fn requirements(
        lines: &[RequirementLine],
        stocks: &[Decimal],
        quantity: u64,
    ) -> Vec<MaterialRequirement> {
        let quantity = Decimal::from(quantity);

        lines
            .iter()
            .zip(stocks)
            .map(|(line, stock)| {
                let required = line.effective_quantity * quantity;
                let shortage = (required - stock).max(Decimal::ZERO);

                MaterialRequirement {
                    material_id: line.material_id,
                    required,
                    stock_quantity: *stock,
                    shortage,
                }
            })
            .collect()
    }
}
