//! 集成測試

use rust_decimal::Decimal;
use uuid::Uuid;

use bomplan::{
    BatchPlanner, Capacity, Component, InMemoryDataSource, InventoryCalculator, Material,
    PlanError, ProductRef, ProductionPlan, Recipe,
};

/// 烘焙場景：蛋糕（麵粉 + 糖）、餅乾（麵粉 + 奶油），共用麵粉
struct Bakery {
    source: InMemoryDataSource,
    tenant_id: Uuid,
    cake: Uuid,
    cookie: Uuid,
    flour: Uuid,
    sugar: Uuid,
    butter: Uuid,
}

fn bakery() -> Bakery {
    let tenant_id = Uuid::new_v4();
    let cake = Uuid::new_v4();
    let cookie = Uuid::new_v4();
    let flour = Uuid::new_v4();
    let sugar = Uuid::new_v4();
    let butter = Uuid::new_v4();

    let source = InMemoryDataSource::new()
        .with_product(ProductRef::new(cake, tenant_id, "蛋糕".to_string()))
        .with_product(ProductRef::new(cookie, tenant_id, "餅乾".to_string()))
        .with_material(
            Material::new(flour, tenant_id, "麵粉".to_string(), Decimal::from(100))
                .with_unit("kg".to_string()),
        )
        .with_material(
            Material::new(sugar, tenant_id, "糖".to_string(), Decimal::from(30))
                .with_unit("kg".to_string()),
        )
        .with_material(
            Material::new(butter, tenant_id, "奶油".to_string(), Decimal::from(20))
                .with_unit("kg".to_string()),
        )
        .with_recipe(
            Recipe::new(cake, tenant_id)
                .with_component(Component::new(flour, Decimal::new(5, 1))) // 0.5 kg
                .with_component(Component::new(sugar, Decimal::new(2, 1))), // 0.2 kg
        )
        .with_recipe(
            Recipe::new(cookie, tenant_id)
                .with_component(Component::new(flour, Decimal::new(2, 1))) // 0.2 kg
                .with_component(Component::new(butter, Decimal::new(1, 1))), // 0.1 kg
        );

    Bakery {
        source,
        tenant_id,
        cake,
        cookie,
        flour,
        sugar,
        butter,
    }
}

#[test]
fn test_available_quantity_end_to_end() {
    // 規格範例：麵粉 0.5kg/單位、庫存 100 → 200；糖 0.2kg/單位、庫存 30 → 150
    let bakery = bakery();
    let calculator = InventoryCalculator::new(&bakery.source, bakery.tenant_id);

    let report = calculator.available_quantity(bakery.cake).unwrap();

    assert_eq!(report.achievable, Capacity::Finite(150));
    assert_eq!(report.limiting_material_id, Some(bakery.sugar));
}

#[test]
fn test_waste_raises_effective_quantity() {
    // 損耗 25%：0.4kg/單位 → 有效 0.5kg/單位，產能隨之下降
    let bakery = bakery();
    let product = Uuid::new_v4();

    let mut source = bakery.source.clone();
    source.add_product(ProductRef::new(
        product,
        bakery.tenant_id,
        "麵包".to_string(),
    ));
    source.add_recipe(
        Recipe::new(product, bakery.tenant_id).with_component(
            Component::new(bakery.flour, Decimal::new(4, 1))
                .with_waste_percentage(Decimal::from(25)),
        ),
    );

    let calculator = InventoryCalculator::new(&source, bakery.tenant_id);
    let report = calculator.available_quantity(product).unwrap();

    // 100 / 0.5 = 200（而非 100 / 0.4 = 250）
    assert_eq!(report.achievable, Capacity::Finite(200));
}

#[test]
fn test_batch_requirements_shortage_identity() {
    let bakery = bakery();
    let calculator = InventoryCalculator::new(&bakery.source, bakery.tenant_id);

    // 蛋糕 × 180：麵粉需 90（足夠）、糖需 36（缺 6）
    let result = calculator.batch_requirements(bakery.cake, 180).unwrap();

    assert!(!result.feasible);
    let flour_line = result
        .lines
        .iter()
        .find(|l| l.material_id == bakery.flour)
        .unwrap();
    let sugar_line = result
        .lines
        .iter()
        .find(|l| l.material_id == bakery.sugar)
        .unwrap();
    assert_eq!(flour_line.required, Decimal::from(90));
    assert_eq!(flour_line.shortage, Decimal::ZERO);
    assert_eq!(sugar_line.required, Decimal::from(36));
    assert_eq!(sugar_line.shortage, Decimal::from(6));
}

#[test]
fn test_optimal_batch_bounds() {
    let bakery = bakery();
    let calculator = InventoryCalculator::new(&bakery.source, bakery.tenant_id);

    // 可生產 150：上限 120 → 120 可行
    let clamped = calculator
        .optimal_batch_size(bakery.cake, Some(50), Some(120))
        .unwrap();
    assert_eq!(clamped.optimal_quantity, Capacity::Finite(120));
    assert!(clamped.feasible);

    // 下限 160 超過可生產數量 → 不可行，保留 150
    let short = calculator
        .optimal_batch_size(bakery.cake, Some(160), None)
        .unwrap();
    assert_eq!(short.optimal_quantity, Capacity::Finite(150));
    assert!(!short.feasible);
}

#[test]
fn test_multi_product_shared_flour() {
    // 蛋糕與餅乾共用麵粉；糖與奶油各自獨立
    let bakery = bakery();
    let planner = BatchPlanner::new(&bakery.source, bakery.tenant_id);

    let plan = ProductionPlan::new()
        .with_product(bakery.cake, 150)
        .with_product(bakery.cookie, 150);

    let outcome = planner.plan(&plan).unwrap();

    // 麵粉需求 75 + 30 = 105 > 100 → 競爭；糖（30）與奶油（15）都足夠
    // 可行性不變量：每個物料耗用 ≤ 庫存
    for entry in &outcome.utilization {
        assert!(
            entry.consumed <= entry.stock_quantity,
            "物料 {} 超耗",
            entry.material_id
        );
    }

    // 兩個產品都被縮減過，但分配不為零
    let cake_alloc = outcome.allocation_for(bakery.cake).unwrap();
    let cookie_alloc = outcome.allocation_for(bakery.cookie).unwrap();
    assert!(cake_alloc > 0 && cake_alloc < 150);
    assert!(cookie_alloc > 0 && cookie_alloc <= 150);

    // 麵粉應列為瓶頸
    assert!(outcome.bottleneck_materials.contains(&bakery.flour));
}

#[test]
fn test_multi_product_worked_example() {
    // 規格演算範例：物料 X 庫存 100；A 耗 2/單位請求 30、B 耗 3/單位請求 20
    let tenant_id = Uuid::new_v4();
    let product_a = Uuid::new_v4();
    let product_b = Uuid::new_v4();
    let material_x = Uuid::new_v4();

    let source = InMemoryDataSource::new()
        .with_product(ProductRef::new(product_a, tenant_id, "A".to_string()))
        .with_product(ProductRef::new(product_b, tenant_id, "B".to_string()))
        .with_material(Material::new(
            material_x,
            tenant_id,
            "X".to_string(),
            Decimal::from(100),
        ))
        .with_recipe(
            Recipe::new(product_a, tenant_id)
                .with_component(Component::new(material_x, Decimal::from(2))),
        )
        .with_recipe(
            Recipe::new(product_b, tenant_id)
                .with_component(Component::new(material_x, Decimal::from(3))),
        );

    let planner = BatchPlanner::new(&source, tenant_id);
    let plan = ProductionPlan::new()
        .with_product(product_a, 30)
        .with_product(product_b, 20);

    let outcome = planner.plan(&plan).unwrap();

    // 縮減：24/16；補量（計劃順序 A 優先）：A=26、B=16；X 滿載
    assert_eq!(outcome.allocation_for(product_a), Some(26));
    assert_eq!(outcome.allocation_for(product_b), Some(16));
    assert_eq!(outcome.utilization[0].ratio, Decimal::ONE);
    assert_eq!(outcome.bottleneck_materials, vec![material_x]);
}

#[test]
fn test_plan_idempotence() {
    let bakery = bakery();
    let planner = BatchPlanner::new(&bakery.source, bakery.tenant_id);

    let plan = ProductionPlan::new()
        .with_product(bakery.cake, 140)
        .with_product(bakery.cookie, 260);

    // 相同快照下重複計劃，結果完全一致（平手裁決具確定性）
    let first = planner.plan(&plan).unwrap();
    let second = planner.plan(&plan).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_monotonic_in_bottleneck_stock() {
    // 提高瓶頸物料庫存，任何產品的分配都不應下降
    let bakery = bakery();
    let plan = ProductionPlan::new()
        .with_product(bakery.cake, 150)
        .with_product(bakery.cookie, 150);

    let planner = BatchPlanner::new(&bakery.source, bakery.tenant_id);
    let before = planner.plan(&plan).unwrap();

    let mut richer = bakery.source.clone();
    richer.set_stock(bakery.flour, Decimal::from(130));
    let planner = BatchPlanner::new(&richer, bakery.tenant_id);
    let after = planner.plan(&plan).unwrap();

    for allocation in &before.allocations {
        let improved = after.allocation_for(allocation.product_id).unwrap();
        assert!(
            improved >= allocation.allocated_quantity,
            "產品 {} 的分配下降: {} → {}",
            allocation.product_id,
            allocation.allocated_quantity,
            improved
        );
    }
}

#[test]
fn test_partial_failure_in_plan() {
    let bakery = bakery();
    let ghost = Uuid::new_v4(); // 不存在的產品

    let planner = BatchPlanner::new(&bakery.source, bakery.tenant_id);
    let plan = ProductionPlan::new()
        .with_product(bakery.cake, 50)
        .with_product(ghost, 10)
        .with_product(bakery.cookie, 50);

    let outcome = planner.plan(&plan).unwrap();

    // 單一壞產品不中止整個計劃
    assert_eq!(outcome.allocations.len(), 2);
    assert_eq!(outcome.allocation_for(bakery.cake), Some(50));
    assert_eq!(outcome.allocation_for(bakery.cookie), Some(50));
    assert_eq!(outcome.error_for(ghost), Some(&PlanError::ProductNotFound(ghost)));
}

#[test]
fn test_bulk_availability_partial_failure() {
    let bakery = bakery();
    let ghost = Uuid::new_v4();

    let calculator = InventoryCalculator::new(&bakery.source, bakery.tenant_id);
    let result = calculator.bulk_available(&[bakery.cake, ghost, bakery.cookie]);

    assert_eq!(result.reports.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0], (ghost, PlanError::ProductNotFound(ghost)));

    // 餅乾的瓶頸是麵粉（100/0.2 = 500 vs 奶油 20/0.1 = 200 → 奶油）
    let cookie_report = result.report_for(bakery.cookie).unwrap();
    assert_eq!(cookie_report.achievable, Capacity::Finite(200));
    assert_eq!(cookie_report.limiting_material_id, Some(bakery.butter));
}

#[test]
fn test_cross_tenant_isolation() {
    let bakery = bakery();
    let other_tenant = Uuid::new_v4();

    // 另一租戶的計算器看不到本租戶的產品
    let calculator = InventoryCalculator::new(&bakery.source, other_tenant);
    assert_eq!(
        calculator.available_quantity(bakery.cake).unwrap_err(),
        PlanError::TenantMismatch(bakery.cake)
    );

    let planner = BatchPlanner::new(&bakery.source, other_tenant);
    let outcome = planner
        .plan(&ProductionPlan::new().with_product(bakery.cake, 10))
        .unwrap();
    assert!(outcome.allocations.is_empty());
    assert_eq!(
        outcome.error_for(bakery.cake),
        Some(&PlanError::TenantMismatch(bakery.cake))
    );
}
