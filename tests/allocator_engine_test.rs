// ==========================================
// Allocator 引擎集成测试
// ==========================================
// 测试目标: 验证比例分配 + 人均上限 + 未分配行
// 覆盖范围: 典型场景、守恒、上限、无跨负责人影响、确定性
// ==========================================

use db_distributor::domain::{OrderRateTable, Product, RateCell, REMAINDER_LABEL};
use db_distributor::engine::{round_to_tenth, Allocator};

// ==========================================
// 测试辅助函数
// ==========================================

fn product_list(items: &[(&str, f64)]) -> Vec<Product> {
    items
        .iter()
        .map(|(name, qty)| Product::new(*name, *qty))
        .collect()
}

fn rate_table(products: &[Product], rows: Vec<(&str, Vec<Option<f64>>)>) -> OrderRateTable {
    let names: Vec<String> = products.iter().map(|p| p.name.clone()).collect();
    OrderRateTable::from_agent_rows(
        &names,
        rows.into_iter()
            .map(|(agent, cells)| {
                (
                    agent.to_string(),
                    cells.into_iter().map(RateCell::from).collect(),
                )
            })
            .collect(),
    )
}

/// 五个负责人、三个商品的混合数据
fn mixed_fixture() -> (Vec<Product>, OrderRateTable) {
    let products = product_list(&[("혈당", 137.0), ("쾌변", 58.0), ("메가", 0.0)]);
    let rates = rate_table(
        &products,
        vec![
            ("김", vec![Some(0.42), Some(0.1), Some(3.0)]),
            ("이", vec![Some(0.17), None, Some(1.0)]),
            ("박", vec![Some(0.33), Some(0.25), None]),
            ("최", vec![None, Some(0.05), Some(0.0)]),
            ("정", vec![Some(0.08), Some(0.6), Some(2.0)]),
        ],
    );
    (products, rates)
}

// ==========================================
// 场景测试
// ==========================================

#[test]
fn test_scenario_without_cap() {
    println!("\n=== 测试：无上限触发 ===");

    let products = product_list(&[("A", 100.0), ("B", 50.0)]);
    let rates = rate_table(
        &products,
        vec![
            ("X", vec![Some(3.0), Some(1.0)]),
            ("Y", vec![Some(1.0), Some(1.0)]),
        ],
    );

    let table = Allocator::new().allocate(&products, &rates, 1000.0).unwrap();

    assert_eq!(table.allocation("X", "A"), Some(75.0));
    assert_eq!(table.allocation("X", "B"), Some(25.0));
    assert_eq!(table.agent_total("X"), Some(100.0));
    assert_eq!(table.allocation("Y", "A"), Some(25.0));
    assert_eq!(table.allocation("Y", "B"), Some(25.0));
    assert_eq!(table.agent_total("Y"), Some(50.0));
    assert_eq!(table.remainder_for("A"), Some(0.0));
    assert_eq!(table.remainder_for("B"), Some(0.0));
}

#[test]
fn test_scenario_with_cap() {
    println!("\n=== 测试：上限触发缩放 ===");

    let products = product_list(&[("A", 100.0), ("B", 50.0)]);
    let rates = rate_table(
        &products,
        vec![
            ("X", vec![Some(3.0), Some(1.0)]),
            ("Y", vec![Some(1.0), Some(1.0)]),
        ],
    );

    let table = Allocator::new().allocate(&products, &rates, 80.0).unwrap();

    assert_eq!(table.allocation("X", "A"), Some(60.0));
    assert_eq!(table.allocation("X", "B"), Some(20.0));
    assert_eq!(table.agent_total("X"), Some(80.0));
    assert_eq!(table.allocation("Y", "A"), Some(25.0));
    assert_eq!(table.allocation("Y", "B"), Some(25.0));
    assert_eq!(table.agent_total("Y"), Some(50.0));
    assert_eq!(table.remainder_for("A"), Some(15.0));
    assert_eq!(table.remainder_for("B"), Some(5.0));
}

#[test]
fn test_scenario_all_missing_rates() {
    println!("\n=== 测试：商品订单率全部缺失 ===");

    let products = product_list(&[("A", 100.0), ("B", 30.0)]);
    let rates = rate_table(
        &products,
        vec![("X", vec![Some(1.0), None]), ("Y", vec![Some(2.0), None])],
    );

    let table = Allocator::new().allocate(&products, &rates, 1000.0).unwrap();

    for agent in ["X", "Y"] {
        assert_eq!(table.allocation(agent, "B"), Some(0.0));
    }
    assert_eq!(table.remainder_for("B"), Some(30.0));
}

// ==========================================
// 性质测试
// ==========================================

#[test]
fn test_conservation_without_cap() {
    let (products, rates) = mixed_fixture();
    let table = Allocator::new().allocate(&products, &rates, 10_000.0).unwrap();
    assert!(table.capped_agents().is_empty());

    let tolerance = 0.1 * table.agent_count() as f64 + 1e-9;
    for product in &products {
        let allocated = table.allocated_sum(&product.name).unwrap();
        let remainder = table.remainder_for(&product.name).unwrap();
        assert!(
            (allocated + remainder - product.total_quantity).abs() <= tolerance,
            "商品 {} 不守恒: {} + {} != {}",
            product.name,
            allocated,
            remainder,
            product.total_quantity
        );
    }
}

#[test]
fn test_zero_quantity_product_allocates_nothing() {
    let (products, rates) = mixed_fixture();
    let table = Allocator::new().allocate(&products, &rates, 10_000.0).unwrap();

    for row in table.rows() {
        assert_eq!(table.allocation(&row.agent, "메가"), Some(0.0));
    }
    assert_eq!(table.remainder_for("메가"), Some(0.0));
}

#[test]
fn test_cap_invariant_holds_for_every_agent() {
    let (products, rates) = mixed_fixture();

    for cap in [1.0, 7.5, 20.0, 40.0, 55.5, 1000.0] {
        let table = Allocator::new().allocate(&products, &rates, cap).unwrap();
        for row in table.rows() {
            assert!(
                row.total <= cap + 0.1 + 1e-9,
                "cap={} 负责人 {} 合计 {}",
                cap,
                row.agent,
                row.total
            );
        }
    }
}

#[test]
fn test_capping_does_not_leak_across_agents() {
    let (products, rates) = mixed_fixture();
    let allocator = Allocator::new();

    let uncapped = allocator.allocate(&products, &rates, 10_000.0).unwrap();
    let capped = allocator.allocate(&products, &rates, 30.0).unwrap();
    assert!(!capped.capped_agents().is_empty());

    for row in uncapped.rows() {
        if capped.capped_agents().contains(&row.agent) {
            assert!(row.total > 30.0);
            continue;
        }
        // 未触发上限的负责人各商品分配完全一致
        assert_eq!(capped.row(&row.agent).unwrap().quantities, row.quantities);
    }
}

#[test]
fn test_capped_quantity_moves_to_remainder() {
    let (products, rates) = mixed_fixture();
    let allocator = Allocator::new();

    let uncapped = allocator.allocate(&products, &rates, 10_000.0).unwrap();
    let capped = allocator.allocate(&products, &rates, 30.0).unwrap();

    for product in &products {
        let before = uncapped.remainder_for(&product.name).unwrap();
        let after = capped.remainder_for(&product.name).unwrap();
        assert!(after >= before);
        assert_eq!(
            after,
            round_to_tenth(product.total_quantity - capped.allocated_sum(&product.name).unwrap())
        );
    }
}

#[test]
fn test_identical_inputs_give_identical_tables() {
    let (products, rates) = mixed_fixture();
    let allocator = Allocator::new();

    let first = allocator.allocate(&products, &rates, 25.0).unwrap();
    let second = allocator.allocate(&products, &rates, 25.0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_remainder_record_is_last() {
    let (products, rates) = mixed_fixture();
    let table = Allocator::new().allocate(&products, &rates, 25.0).unwrap();

    let records = table.records();
    assert_eq!(records.len(), table.agent_count() + 1);
    assert_eq!(records.last().unwrap().label, REMAINDER_LABEL);
}
