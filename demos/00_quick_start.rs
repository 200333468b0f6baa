/// quick start - record two payments and read back the month allocations
use tuition_payments_rs::chrono::{TimeZone, Utc};
use tuition_payments_rs::{
    AllocationEngine, CourseId, Discount, InMemoryStore, Month, MonthId, MonthPayment, Money, NewPayment,
    SafeTimeProvider, StudentId, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
    ));

    let mut store = InMemoryStore::new();
    for (n, name) in ["January", "February"].iter().enumerate() {
        store.insert_month(Month::new(
            MonthId::from(name.to_lowercase()),
            *name,
            n as u32 + 1,
            CourseId::from("physics"),
            Money::from_major(1_200),
        ));
    }

    let student = StudentId::from("stu-001");

    // old-style payment covering both months with a 10% discount
    store.record_payment(
        NewPayment::legacy(
            student.clone(),
            vec![MonthId::from("january"), MonthId::from("february")],
            Money::from_major(1_000),
        )
        .with_discount(Discount::percentage(Money::from_major(10))),
        &time,
    )?;

    // itemized top-up for february
    store.record_payment(
        NewPayment::itemized(
            student.clone(),
            vec![MonthPayment::new(MonthId::from("february"), Money::from_major(1_200), Money::from_major(580))],
        ),
        &time,
    )?;

    let engine = AllocationEngine::new(&store, &store);
    let allocations = engine.compute_month_allocations(&student)?;

    for (month_id, allocation) in &allocations {
        println!(
            "{}: paid {} discount {} fee {} outstanding {}",
            month_id,
            allocation.total_paid,
            allocation.total_discount,
            allocation.month_fee,
            allocation.outstanding()
        );
    }

    Ok(())
}
