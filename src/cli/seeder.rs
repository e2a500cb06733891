//! Database seeder for local development.
//!
//! Generates fake scholarships and inserts them in one batched statement.
//! Seeded rows are tagged through `posted_by` so they can be cleared
//! without touching real data.

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::address::en::{CityName, CountryName};
use fake::faker::company::en::{BsNoun, CompanyName};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use crate::modules::scholarships::model::{Degree, ScholarshipCategory};

/// `posted_by` marker for seeded rows.
pub const SEED_POSTED_BY: &str = "seeder@scholarstream.app";

struct ScholarshipSeed {
    name: String,
    university_name: String,
    university_country: String,
    university_city: String,
    university_rank: i32,
    subject_category: String,
    category: ScholarshipCategory,
    degree: Degree,
    tuition_fees: f64,
    application_fees: f64,
    service_charge: f64,
    deadline: chrono::DateTime<chrono::Utc>,
}

fn generate_scholarships(count: usize) -> Vec<ScholarshipSeed> {
    const CATEGORIES: [ScholarshipCategory; 3] = [
        ScholarshipCategory::FullFund,
        ScholarshipCategory::Partial,
        ScholarshipCategory::SelfFund,
    ];
    const DEGREES: [Degree; 3] = [Degree::Diploma, Degree::Bachelor, Degree::Masters];
    const SUBJECTS: [&str; 4] = ["Engineering", "Medicine", "Business", "Arts"];

    (0..count)
        .map(|i| {
            let university: String = CompanyName().fake();
            let noun: String = BsNoun().fake();
            ScholarshipSeed {
                name: format!("{noun} Excellence Scholarship"),
                university_name: format!("{university} University"),
                university_country: CountryName().fake(),
                university_city: CityName().fake(),
                university_rank: (1..500).fake(),
                subject_category: SUBJECTS[i % SUBJECTS.len()].to_string(),
                category: CATEGORIES[i % CATEGORIES.len()],
                degree: DEGREES[i % DEGREES.len()],
                tuition_fees: (1000.0..40000.0).fake::<f64>().round(),
                application_fees: (20.0..200.0).fake::<f64>().round(),
                service_charge: (5.0..30.0).fake::<f64>().round(),
                deadline: Utc::now() + Duration::days((30..365).fake::<i64>()),
            }
        })
        .collect()
}

pub async fn seed_scholarships(
    db: &PgPool,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    println!("🌱 Seeding {count} scholarships...");

    let seeds = generate_scholarships(count);

    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "INSERT INTO scholarships (
            name, university_name, university_country, university_city, university_rank,
            subject_category, category, degree, tuition_fees, application_fees,
            service_charge, application_deadline, posted_by
        ) ",
    );
    qb.push_values(&seeds, |mut row, seed| {
        row.push_bind(&seed.name)
            .push_bind(&seed.university_name)
            .push_bind(&seed.university_country)
            .push_bind(&seed.university_city)
            .push_bind(seed.university_rank)
            .push_bind(&seed.subject_category)
            .push_bind(seed.category)
            .push_bind(seed.degree)
            .push_bind(seed.tuition_fees)
            .push_bind(seed.application_fees)
            .push_bind(seed.service_charge)
            .push_bind(seed.deadline)
            .push_bind(SEED_POSTED_BY);
    });

    qb.build().execute(db).await?;

    println!("   ✓ Inserted {count} scholarships in {:?}", start.elapsed());

    Ok(())
}

/// Remove all rows previously created by [`seed_scholarships`].
pub async fn clear_seeded_data(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let result = sqlx::query("DELETE FROM scholarships WHERE posted_by = $1")
        .bind(SEED_POSTED_BY)
        .execute(db)
        .await?;

    println!("🧹 Removed {} seeded scholarships", result.rows_affected());

    Ok(())
}
