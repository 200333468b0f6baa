/// json view - render allocations the way the reporting layer reads them
use tuition_payments_rs::{AllocationConfig, AllocationEngine, AllocationView, InMemoryStore, StudentId};

const MONTHS: &str = r#"[
    { "_id": "m1", "name": "January", "monthNumber": 1, "courseId": "c1", "payment": 1000 },
    { "_id": "m2", "name": "February", "monthNumber": 2, "courseId": "c1", "payment": 1000 },
    { "_id": "m3", "name": "March", "monthNumber": 3, "courseId": "c1", "payment": 1000 }
]"#;

const PAYMENTS: &str = r#"[
    { "_id": "p1", "studentId": "s1", "months": ["m1", "m2", "m3"], "paidAmount": 2000,
      "createdAt": "2024-01-03T10:00:00Z" }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = InMemoryStore::new();
    store.load_month_records(MONTHS)?;
    store.load_payment_records(PAYMENTS)?;

    let config = AllocationConfig::default().with_display_decimal_places(2);
    config.validate()?;
    let engine = AllocationEngine::with_config(&store, &store, config);

    let allocations = engine.compute_month_allocations(&StudentId::from("s1"))?;
    let view = AllocationView::from_allocations(&allocations, engine.config().display_decimal_places);
    println!("{}", view.to_json_pretty()?);

    Ok(())
}
