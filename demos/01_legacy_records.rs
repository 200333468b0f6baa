/// legacy records - load stored documents and inspect allocation warnings
use tuition_payments_rs::{AllocationEngine, InMemoryStore, StudentId};

const MONTHS: &str = r#"[
    { "_id": "m1", "name": "January", "monthNumber": 1, "courseId": "c1", "payment": 800 },
    { "_id": "m2", "name": "February", "monthNumber": 2, "courseId": "c1", "payment": 800 }
]"#;

const PAYMENTS: &str = r#"[
    { "_id": "p1", "studentId": "s1", "months": ["m1", "m2"], "paidAmount": 1400,
      "discountAmount": 200, "discountType": "fixed", "discountApplicableMonths": ["m2"],
      "createdAt": "2024-01-03T10:00:00Z" },
    { "_id": "p2", "studentId": "s1", "months": [], "paidAmount": 300,
      "createdAt": "2024-01-04T10:00:00Z" },
    { "_id": "p3", "studentId": "s1", "months": ["m9"], "paidAmount": 300,
      "createdAt": "2024-01-05T10:00:00Z" }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let mut store = InMemoryStore::new();
    store.load_month_records(MONTHS)?;
    store.load_payment_records(PAYMENTS)?;

    let engine = AllocationEngine::new(&store, &store);
    let allocations = engine.compute_month_allocations(&StudentId::from("s1"))?;

    for (month_id, allocation) in &allocations {
        println!("{} -> paid {}, discount {}", month_id, allocation.total_paid, allocation.total_discount);
    }

    println!("\nwarnings:");
    for warning in allocations.warnings() {
        println!("  {}", warning);
    }

    Ok(())
}
