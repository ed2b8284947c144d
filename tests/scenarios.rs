//! End-to-end flows as the back office drives them: edit a prescription,
//! re-price linked lenses, then reconcile to the insurer-approved total.

use optic_pricing::{
    subtotal, Eye, EyeReading, LineItem, MarkupCalculator, PriceReconciler, Prescription, PricingError,
    ReconcileFailure, ReconcileOutcome, ReconcileRequest, ReconciliationSession,
};
use rust_decimal::Decimal;

fn money(value: i64) -> Decimal {
    Decimal::from(value)
}

#[test]
fn prescription_edit_then_assurance_total() {
    let calc = MarkupCalculator::default();
    let reconciler = PriceReconciler::default();
    let mut session = ReconciliationSession::new();

    let mut items = vec![
        LineItem::lens(1, 1, money(200), Eye::Right),
        LineItem::lens(2, 1, money(200), Eye::Left),
        LineItem::new(3, 1, money(150)),
    ];

    let mut rx = Prescription::default();
    rx.right = EyeReading::parse("-4.00", "-0.75");
    rx.left = EyeReading::parse("-2.50", "-2.25");
    calc.reprice(&mut items, &rx);

    assert_eq!(items[0].unit_price, money(230));
    assert_eq!(items[1].unit_price, money(230));
    assert_eq!(subtotal(&items), money(610));

    // Insurer approves 600: difference -10 over 3 items → step 3, one extra
    let request = reconciler.request(items.clone(), money(600));
    let solution = reconciler
        .reconcile(&mut session, &request)
        .unwrap()
        .into_result()
        .unwrap();

    let prices: Vec<Decimal> = solution.items.iter().map(|item| item.unit_price).collect();
    assert_eq!(prices, vec![money(226), money(227), money(147)]);
    assert_eq!(solution.total, money(600));
    // markup bookkeeping is untouched by reconciliation
    assert_eq!(solution.items[0].applied_markup, Decimal::from(15));
}

#[test]
fn target_changes_reuse_the_same_baseline() {
    let reconciler = PriceReconciler::default();
    let mut session = ReconciliationSession::new();
    let items = vec![LineItem::new(1, 1, money(100)), LineItem::new(2, 1, money(100))];

    let first = reconciler
        .reconcile(&mut session, &reconciler.request(items, money(225)))
        .unwrap()
        .into_result()
        .unwrap();

    // User corrects the target; prices on screen are the adjusted ones
    let second = reconciler
        .reconcile(&mut session, &reconciler.request(first.items, money(190)))
        .unwrap()
        .into_result()
        .unwrap();

    let prices: Vec<Decimal> = second.items.iter().map(|item| item.unit_price).collect();
    assert_eq!(prices, vec![money(95), money(95)]);
}

#[test]
fn adding_an_item_recaptures_the_baseline() {
    let reconciler = PriceReconciler::default();
    let mut session = ReconciliationSession::new();

    let items = vec![LineItem::new(1, 1, money(100))];
    let first = reconciler
        .reconcile(&mut session, &reconciler.request(items, money(120)))
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(first.items[0].unit_price, money(120));

    let mut extended = first.items.clone();
    extended.push(LineItem::new(2, 1, money(30)));
    let second = reconciler
        .reconcile(&mut session, &reconciler.request(extended, money(160)))
        .unwrap()
        .into_result()
        .unwrap();

    // Baseline is now [120, 30]: +10 split evenly
    let prices: Vec<Decimal> = second.items.iter().map(|item| item.unit_price).collect();
    assert_eq!(prices, vec![money(125), money(35)]);
    assert_eq!(session.captures(), 2);
}

#[test]
fn unreachable_target_leaves_prices_to_caller() {
    let reconciler = PriceReconciler::default();
    let items = vec![LineItem::new(1, 2, money(50))];

    let outcome = reconciler
        .reconcile_once(&ReconcileRequest::new(items.clone(), money(50), 2000))
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Failed(ReconcileFailure::NoSolutionFound));
    assert_eq!(items[0].unit_price, money(50));
}

#[test]
fn empty_receipt_with_target_is_rejected() {
    let result = PriceReconciler::default().reconcile_once(&ReconcileRequest::new(vec![], money(80), 2000));
    assert!(matches!(result, Err(PricingError::InvalidInput { .. })));
}
