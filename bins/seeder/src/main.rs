//! Database seeder for Plantara development and testing.
//!
//! Seeds the staff roles, an administrator account and a starter plant
//! inventory. Safe to run repeatedly: existing rows are left alone.
//!
//! Usage: cargo run --bin seeder

use plantara_core::auth::hash_password;
use plantara_db::{
    InventoryRepository, RoleRepository, StaffRepository,
    repositories::{CreateInventoryInput, CreateStaffInput},
};
use sea_orm::DatabaseConnection;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@plantara.dev";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const ROLES: &[&str] = &["Admin", "Staff", "Field Officer"];

const INVENTORY: &[(&str, i32, &str)] = &[
    ("Agarwood seedling", 500, "plants"),
    ("Sandalwood seedling", 300, "plants"),
    ("Vanilla cutting", 1000, "cuttings"),
    ("Organic fertilizer", 200, "kg"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = plantara_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding roles...");
    seed_roles(&db).await;

    println!("Seeding admin account...");
    seed_admin(&db).await;

    println!("Seeding inventory...");
    seed_inventory(&db).await;

    println!("Seeding complete!");
}

async fn seed_roles(db: &DatabaseConnection) {
    let repo = RoleRepository::new(db.clone());
    for name in ROLES {
        let existing = repo.find_by_name(name).await.expect("Failed to look up role");
        if existing.is_some() {
            println!("  Role {name} already exists, skipping...");
            continue;
        }
        repo.create(name).await.expect("Failed to create role");
        println!("  Created role {name}");
    }
}

async fn seed_admin(db: &DatabaseConnection) {
    let staff = StaffRepository::new(db.clone());
    if staff
        .find_by_username(ADMIN_USERNAME)
        .await
        .expect("Failed to look up admin")
        .is_some()
    {
        println!("  Admin account already exists, skipping...");
        return;
    }

    let role = RoleRepository::new(db.clone())
        .find_by_name("Admin")
        .await
        .expect("Failed to look up Admin role")
        .expect("Admin role should have been seeded");

    let password = std::env::var("SEED_ADMIN_PASSWORD")
        .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
    let account = staff
        .create(CreateStaffInput {
            full_name: "System Administrator".to_string(),
            username: ADMIN_USERNAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(&password).expect("Failed to hash password"),
            role_id: role.id,
            phone: None,
        })
        .await
        .expect("Failed to create admin account");
    println!("  Created admin account {} ({})", account.staff.username, account.staff.id);
}

async fn seed_inventory(db: &DatabaseConnection) {
    let repo = InventoryRepository::new(db.clone());
    for (name, quantity, unit) in INVENTORY {
        if repo
            .find_by_name(name)
            .await
            .expect("Failed to look up item")
            .is_some()
        {
            println!("  {name} already stocked, skipping...");
            continue;
        }
        repo.create_or_merge(CreateInventoryInput {
            item_name: (*name).to_string(),
            quantity: *quantity,
            unit: Some((*unit).to_string()),
        })
        .await
        .expect("Failed to create inventory item");
        println!("  Stocked {quantity} {unit} of {name}");
    }
}
