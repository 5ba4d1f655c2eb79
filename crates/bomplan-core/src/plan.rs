//! 生產計劃模型

use serde::{Deserialize, Serialize};

use crate::ProductId;

/// 計劃項目：產品與請求數量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    /// 產品ID
    pub product_id: ProductId,

    /// 請求生產數量（正整數）
    pub requested_quantity: u64,
}

/// 生產計劃：有序的「產品 → 請求數量」映射
///
/// 項目順序即請求時列出的順序，平手裁決與補量都依此順序進行，
/// 因此順序是結果可重現性的一部分。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionPlan {
    items: Vec<PlanItem>,
}

impl ProductionPlan {
    /// 創建空計劃
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// 建構器模式：添加產品請求
    pub fn with_product(mut self, product_id: ProductId, requested_quantity: u64) -> Self {
        self.request(product_id, requested_quantity);
        self
    }

    /// 添加或更新產品請求
    ///
    /// 重複的產品就地更新數量，保留原本的順位。
    pub fn request(&mut self, product_id: ProductId, requested_quantity: u64) {
        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            Some(item) => item.requested_quantity = requested_quantity,
            None => self.items.push(PlanItem {
                product_id,
                requested_quantity,
            }),
        }
    }

    /// 依序取得計劃項目
    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    /// 項目數
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 是否為空計劃
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
