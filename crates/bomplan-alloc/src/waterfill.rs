//! 水位分配演算法
//!
//! 迭代式等比例縮減：所有產品先以請求量起算，對每個超耗物料求
//! 縮減係數，取最小係數套用到所有觸及超耗物料的產品，重複直到
//! 無物料超耗；再依計劃順序逐一補量，吃掉取整留下的餘裕。
//! 整個過程對庫存快照做純計算，迴圈內沒有任何 I/O。

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use bomplan_calc::CapacityCalculator;
use bomplan_core::{MaterialId, ProductId, RequirementLine};

/// 參與分配的產品需求（已彙總的有效用量）
#[derive(Debug, Clone)]
pub struct ProductDemand {
    /// 產品ID
    pub product_id: ProductId,

    /// 請求數量
    pub requested_quantity: u64,

    /// 每單位的物料需求行（無組成產品為空，不參與競爭）
    pub lines: Vec<RequirementLine>,
}

/// 水位分配計算器
pub struct WaterFill;

impl WaterFill {
    /// 執行分配
    ///
    /// 回傳與 `demands` 等長對齊的分配量。收斂後保證對每個物料
    /// `Σ 分配 × 有效用量 ≤ 庫存`。
    ///
    /// 終止性：每一輪或者讓至少一個分配量減少 ≥ 1，或者結束；
    /// 分配量有下界 0，補量階段單調遞增且有上界（請求量）。
    pub fn allocate(
        demands: &[ProductDemand],
        stock: &HashMap<MaterialId, Decimal>,
    ) -> Vec<u64> {
        // 樂觀起算：先假設全額可做
        let mut allocations: Vec<u64> =
            demands.iter().map(|d| d.requested_quantity).collect();

        let mut round = 0u32;
        loop {
            round += 1;
            let consumption = Self::consumption(demands, &allocations);

            // 超耗物料與其縮減係數
            let mut over_consumed: HashSet<MaterialId> = HashSet::new();
            let mut min_scale: Option<Decimal> = None;

            for (material_id, consumed) in &consumption {
                let available = stock.get(material_id).copied().unwrap_or(Decimal::ZERO);
                if *consumed > available {
                    over_consumed.insert(*material_id);
                    let scale = if *consumed > Decimal::ZERO {
                        available / *consumed
                    } else {
                        Decimal::ZERO
                    };
                    min_scale = Some(match min_scale {
                        Some(current) => current.min(scale),
                        None => scale,
                    });
                }
            }

            // 無超耗：收斂
            let Some(scale) = min_scale else {
                tracing::debug!("水位分配於第 {} 輪收斂", round);
                break;
            };

            tracing::debug!(
                "第 {} 輪：{} 個物料超耗，縮減係數 {}",
                round,
                over_consumed.len(),
                scale
            );

            // 只縮減觸及超耗物料的產品
            let mut changed = false;
            for (demand, allocation) in demands.iter().zip(allocations.iter_mut()) {
                if *allocation == 0 {
                    continue;
                }
                if demand
                    .lines
                    .iter()
                    .any(|line| over_consumed.contains(&line.material_id))
                {
                    let scaled =
                        CapacityCalculator::floor_units(Decimal::from(*allocation) * scale);
                    if scaled < *allocation {
                        *allocation = scaled;
                        changed = true;
                    }
                }
            }

            // 整輪無變化：取整已無法再縮，結束以保證終止
            if !changed {
                tracing::debug!("第 {} 輪無變化，結束縮減", round);
                break;
            }
        }

        Self::top_up(demands, stock, &mut allocations);

        allocations
    }

    /// 計算各物料的總耗用 `D_m = Σ 分配 × 有效用量`
    pub fn consumption(
        demands: &[ProductDemand],
        allocations: &[u64],
    ) -> HashMap<MaterialId, Decimal> {
        let mut consumption: HashMap<MaterialId, Decimal> = HashMap::new();

        for (demand, allocation) in demands.iter().zip(allocations) {
            let units = Decimal::from(*allocation);
            for line in &demand.lines {
                *consumption.entry(line.material_id).or_default() +=
                    units * line.effective_quantity;
            }
        }

        consumption
    }

    /// 補量階段
    ///
    /// 依計劃順序（首列產品優先）逐一嘗試 +1，只要不讓任何物料
    /// 超過庫存就收下；外層重複直到一整輪都加不進任何單位。
    fn top_up(
        demands: &[ProductDemand],
        stock: &HashMap<MaterialId, Decimal>,
        allocations: &mut [u64],
    ) {
        let mut consumption = Self::consumption(demands, allocations);
        let mut added = 0u64;

        loop {
            let mut changed = false;

            for (demand, allocation) in demands.iter().zip(allocations.iter_mut()) {
                while *allocation < demand.requested_quantity
                    && Self::fits_one_more(demand, stock, &consumption)
                {
                    for line in &demand.lines {
                        *consumption.entry(line.material_id).or_default() +=
                            line.effective_quantity;
                    }
                    *allocation += 1;
                    added += 1;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        if added > 0 {
            tracing::debug!("補量階段追加 {} 單位", added);
        }
    }

    /// 檢查再加一單位是否仍在所有物料的庫存內
    fn fits_one_more(
        demand: &ProductDemand,
        stock: &HashMap<MaterialId, Decimal>,
        consumption: &HashMap<MaterialId, Decimal>,
    ) -> bool {
        demand.lines.iter().all(|line| {
            let consumed = consumption
                .get(&line.material_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let available = stock.get(&line.material_id).copied().unwrap_or(Decimal::ZERO);
            consumed + line.effective_quantity <= available
        })
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    /// 產生小型隨機實例：固定三個物料位，產品以索引引用
    fn arb_instance() -> impl Strategy<
        Value = (
            Vec<(u64, Vec<(usize, u32)>)>, // 產品：(請求量, [(物料索引, 有效用量)])
            Vec<u32>,                      // 三個物料的庫存
        ),
    > {
        (
            prop::collection::vec(
                (
                    1u64..50,
                    prop::collection::vec((0usize..3, 1u32..5), 1..3),
                ),
                1..5,
            ),
            prop::collection::vec(0u32..200, 3),
        )
    }

    fn build(
        products: &[(u64, Vec<(usize, u32)>)],
        stocks: &[u32],
    ) -> (Vec<ProductDemand>, HashMap<MaterialId, Decimal>) {
        let materials: Vec<MaterialId> = (0..3).map(|_| Uuid::new_v4()).collect();

        let demands = products
            .iter()
            .map(|(requested, lines)| {
                // 同一物料索引重複時彙總，模擬 requirement_lines 的輸出
                let mut aggregated: Vec<RequirementLine> = Vec::new();
                for (index, effective) in lines {
                    let material_id = materials[*index];
                    match aggregated.iter_mut().find(|l| l.material_id == material_id) {
                        Some(line) => line.effective_quantity += Decimal::from(*effective),
                        None => aggregated.push(RequirementLine {
                            material_id,
                            effective_quantity: Decimal::from(*effective),
                        }),
                    }
                }
                ProductDemand {
                    product_id: Uuid::new_v4(),
                    requested_quantity: *requested,
                    lines: aggregated,
                }
            })
            .collect();

        let stock = materials
            .iter()
            .zip(stocks)
            .map(|(material_id, stock)| (*material_id, Decimal::from(*stock)))
            .collect();

        (demands, stock)
    }

    proptest! {
        /// 可行性不變量：收斂後任何物料都不超耗
        #[test]
        fn prop_never_exceeds_stock((products, stocks) in arb_instance()) {
            let (demands, stock) = build(&products, &stocks);
            let allocations = WaterFill::allocate(&demands, &stock);

            let consumption = WaterFill::consumption(&demands, &allocations);
            for (material_id, consumed) in &consumption {
                prop_assert!(*consumed <= stock[material_id]);
            }
        }

        /// 分配量永不超過請求量
        #[test]
        fn prop_bounded_by_request((products, stocks) in arb_instance()) {
            let (demands, stock) = build(&products, &stocks);
            let allocations = WaterFill::allocate(&demands, &stock);

            for (demand, allocation) in demands.iter().zip(&allocations) {
                prop_assert!(*allocation <= demand.requested_quantity);
            }
        }

        /// 相同輸入重複執行結果相同
        #[test]
        fn prop_idempotent((products, stocks) in arb_instance()) {
            let (demands, stock) = build(&products, &stocks);

            let first = WaterFill::allocate(&demands, &stock);
            let second = WaterFill::allocate(&demands, &stock);
            prop_assert_eq!(first, second);
        }
    }
}
