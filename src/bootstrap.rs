use crate::model::{NewCustomer, NewUser, NewVehicle, UserRole, VehicleStatus};
use crate::schema::{customers, users, vehicles};
use anyhow::Context;
use diesel::prelude::*;
use diesel::sql_query;

// The desk application has no migration tooling; the schema is created in
// place on startup, and seeding is idempotent so restarts are harmless.

const DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL,
        first_name TEXT,
        last_name TEXT,
        phone TEXT,
        email TEXT,
        employee_id TEXT,
        address TEXT
    )",
    "CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        address TEXT NOT NULL,
        phone TEXT NOT NULL,
        license_number TEXT NOT NULL,
        insurance_company TEXT NOT NULL,
        policy_number TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS vehicles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        brand TEXT NOT NULL,
        model TEXT NOT NULL,
        year INTEGER NOT NULL,
        odometer_km INTEGER NOT NULL,
        rate_per_day REAL NOT NULL,
        rate_per_km REAL NOT NULL,
        vehicle_type TEXT NOT NULL,
        vehicle_class TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Available'
    )",
    "CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        confirmation TEXT NOT NULL UNIQUE,
        customer_name TEXT NOT NULL,
        vehicle_id INTEGER NOT NULL REFERENCES vehicles(id),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        rental_price REAL NOT NULL,
        status TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS feedback (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_name TEXT NOT NULL,
        message TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS action_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        action TEXT NOT NULL,
        detail TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS access_tokens (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        token BLOB NOT NULL,
        exp TEXT NOT NULL
    )",
];

pub fn init_schema(conn: &mut SqliteConnection) -> QueryResult<()> {
    for statement in DDL {
        sql_query(*statement).execute(conn)?;
    }
    Ok(())
}

pub fn run(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    init_schema(conn).context("creating tables")?;
    seed_default_manager(conn)?;
    seed_demo_customers(conn)?;
    seed_starter_fleet(conn)?;
    Ok(())
}

fn seed_default_manager(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    use crate::schema::users::dsl::*;
    let existing: i64 = users
        .filter(username.eq("manager"))
        .count()
        .get_result(conn)?;
    if existing > 0 {
        return Ok(());
    }
    let hashed = bcrypt::hash("man123", bcrypt::DEFAULT_COST).context("hashing manager password")?;
    diesel::insert_into(users)
        .values(&NewUser {
            username: String::from("manager"),
            password: hashed,
            role: UserRole::Manager,
            first_name: Some(String::from("Default")),
            last_name: Some(String::from("Manager")),
            phone: Some(String::from("1234567890")),
            email: Some(String::from("manager@example.com")),
            employee_id: Some(String::from("1000")),
            address: Some(String::from("123 Manager St")),
        })
        .execute(conn)?;
    log::info!("seeded default manager account");
    Ok(())
}

fn seed_demo_customers(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    let rows = vec![
        demo_customer("John Doe", "123 Elm Street", "555-1234", "LN12345", "ABC Insurance", "PN98765"),
        demo_customer("Jane Smith", "456 Oak Avenue", "555-5678", "LN67890", "XYZ Insurance", "PN54321"),
        demo_customer("Alice Johnson", "789 Pine Road", "555-9012", "LN11223", "DEF Insurance", "PN11223"),
    ];
    diesel::insert_or_ignore_into(customers::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

fn demo_customer(
    name: &str,
    address: &str,
    phone: &str,
    license_number: &str,
    insurance_company: &str,
    policy_number: &str,
) -> NewCustomer {
    NewCustomer {
        name: String::from(name),
        address: String::from(address),
        phone: String::from(phone),
        license_number: String::from(license_number),
        insurance_company: String::from(insurance_company),
        policy_number: String::from(policy_number),
    }
}

fn seed_starter_fleet(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    let fleet_size: i64 = vehicles::table.count().get_result(conn)?;
    if fleet_size > 0 {
        return Ok(());
    }
    let fleet = vec![
        starter_vehicle("Toyota", "Corolla", 2020, 41_200, 50.0, 0.2, "Compact Car"),
        starter_vehicle("Honda", "Civic", 2019, 58_400, 45.0, 0.18, "Compact Car"),
        starter_vehicle("Ford", "Focus", 2021, 23_900, 55.0, 0.25, "Standard Car"),
        starter_vehicle("Chevrolet", "Malibu", 2018, 77_300, 40.0, 0.15, "Intermediate Car"),
        starter_vehicle("Nissan", "Altima", 2020, 39_800, 50.0, 0.2, "Standard Car"),
        starter_vehicle("BMW", "3 Series", 2022, 12_500, 100.0, 0.3, "Luxury Car"),
        starter_vehicle("Audi", "A4", 2021, 18_700, 95.0, 0.28, "Premium Car"),
        starter_vehicle("Mercedes", "C-Class", 2022, 9_300, 110.0, 0.35, "Luxury Car"),
        starter_vehicle("Hyundai", "Elantra", 2019, 61_000, 45.0, 0.18, "Economy Car"),
        starter_vehicle("Kia", "Optima", 2020, 44_600, 50.0, 0.2, "Standard Car"),
    ];
    diesel::insert_into(vehicles::table)
        .values(&fleet)
        .execute(conn)?;
    log::info!("seeded starter fleet of {} vehicles", fleet.len());
    Ok(())
}

fn starter_vehicle(
    brand: &str,
    model: &str,
    year: i32,
    odometer_km: i32,
    rate_per_day: f64,
    rate_per_km: f64,
    vehicle_class: &str,
) -> NewVehicle {
    NewVehicle {
        brand: String::from(brand),
        model: String::from(model),
        year,
        odometer_km,
        rate_per_day,
        rate_per_km,
        vehicle_type: String::from("Car"),
        vehicle_class: String::from(vehicle_class),
        status: VehicleStatus::Available,
    }
}

#[cfg(test)]
pub fn test_connection() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    run(&mut conn).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, User, Vehicle};
    use diesel::result::{DatabaseErrorKind, Error};

    #[test]
    fn bootstrap_is_idempotent() {
        let mut conn = test_connection();
        run(&mut conn).unwrap();
        run(&mut conn).unwrap();

        let manager_count: i64 = users::table
            .filter(users::username.eq("manager"))
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(manager_count, 1);

        let fleet: Vec<Vehicle> = vehicles::table.load(&mut conn).unwrap();
        assert_eq!(fleet.len(), 10);
        assert!(fleet.iter().all(|v| v.status == VehicleStatus::Available));
    }

    #[test]
    fn default_manager_password_is_hashed() {
        let mut conn = test_connection();
        let manager: User = users::table
            .filter(users::username.eq("manager"))
            .first(&mut conn)
            .unwrap();
        assert_eq!(manager.role, UserRole::Manager);
        assert_ne!(manager.password, "man123");
        assert!(bcrypt::verify("man123", &manager.password).unwrap());
    }

    #[test]
    fn duplicate_customer_name_is_rejected() {
        let mut conn = test_connection();
        let demo: Customer = customers::table
            .filter(customers::name.eq("John Doe"))
            .first(&mut conn)
            .unwrap();
        assert_eq!(demo.license_number, "LN12345");

        let result = diesel::insert_into(customers::table)
            .values(&demo_customer("John Doe", "1 Other St", "555-0000", "LN0", "Z Insurance", "PN0"))
            .execute(&mut conn);
        assert!(matches!(
            result,
            Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        ));
    }
}
