//! Demo catalog for fresh installations

use log::info;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set,
    TransactionTrait,
};

use super::entities::{accessory, car, insurance_option, location};

struct DemoBranch {
    city: &'static str,
    branch_name: &'static str,
    cars: &'static [(&'static str, i64)],
}

const BRANCHES: &[DemoBranch] = &[
    DemoBranch {
        city: "Berlin",
        branch_name: "Hauptbahnhof",
        cars: &[("Volkswagen Golf", 4500), ("BMW 3 Series", 7500)],
    },
    DemoBranch {
        city: "Munich",
        branch_name: "Airport",
        cars: &[("Toyota Corolla", 4000), ("Audi A4", 7000)],
    },
    DemoBranch {
        city: "Hamburg",
        branch_name: "Altona",
        cars: &[("Tesla Model 3", 9500)],
    },
];

const INSURANCE: &[(&str, i64)] = &[("Basic cover", 1000), ("Full cover", 2000)];

const ACCESSORIES: &[(&str, i64)] = &[
    ("GPS navigation", 500),
    ("Child seat", 700),
    ("Additional driver", 1500),
];

/// Insert the demo catalog unless locations already exist.
///
/// Returns whether anything was inserted.
pub async fn seed_demo_catalog(db: &DatabaseConnection) -> Result<bool, DbErr> {
    let existing = location::Entity::find().count(db).await?;
    if existing > 0 {
        info!("Catalog already has {} locations, skipping demo data", existing);
        return Ok(false);
    }

    let txn = db.begin().await?;

    for branch in BRANCHES {
        let saved = location::ActiveModel {
            city: Set(branch.city.to_string()),
            branch_name: Set(branch.branch_name.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (model, cents) in branch.cars {
            car::ActiveModel {
                location_id: Set(saved.id),
                model: Set(model.to_string()),
                daily_price_cents: Set(*cents),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    for (name, cents) in INSURANCE {
        insurance_option::ActiveModel {
            name: Set(name.to_string()),
            price_per_day_cents: Set(*cents),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for (name, cents) in ACCESSORIES {
        accessory::ActiveModel {
            name: Set(name.to_string()),
            price_flat_cents: Set(*cents),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(
        "Seeded demo catalog: {} locations, {} insurance options, {} accessories",
        BRANCHES.len(),
        INSURANCE.len(),
        ACCESSORIES.len()
    );
    Ok(true)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;

    #[tokio::test]
    async fn seeds_once() {
        let db = test_database().await;

        assert!(seed_demo_catalog(&db).await.unwrap());
        assert_eq!(location::Entity::find().count(&db).await.unwrap(), 3);
        assert_eq!(car::Entity::find().count(&db).await.unwrap(), 5);
        assert_eq!(accessory::Entity::find().count(&db).await.unwrap(), 3);

        assert!(!seed_demo_catalog(&db).await.unwrap());
        assert_eq!(location::Entity::find().count(&db).await.unwrap(), 3);
    }
}
