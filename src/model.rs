use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

// Diesel requires us to define a custom mapping between the Rust enums
// and the database type. SQLite has no native enum type, so every enum
// is stored as TEXT.
use crate::schema::*;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use diesel::{AsExpression, FromSqlRow};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum UserRole {
    Manager,
    Employee,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum VehicleStatus {
    Available,
    Upcoming,
    Booked,
    Ongoing,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum ReservationStatus {
    Booked,
    Ongoing,
    Completed,
    Cancelled,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manager => "Manager",
            UserRole::Employee => "Employee",
        }
    }
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::Upcoming => "Upcoming",
            VehicleStatus::Booked => "Booked",
            VehicleStatus::Ongoing => "Ongoing",
        }
    }
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Booked => "Booked",
            ReservationStatus::Ongoing => "Ongoing",
            ReservationStatus::Completed => "Completed",
            ReservationStatus::Cancelled => "Cancelled",
        }
    }
}

impl ToSql<Text, Sqlite> for UserRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for UserRole {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        match <String as FromSql<Text, Sqlite>>::from_sql(bytes)?.as_str() {
            "Manager" => Ok(UserRole::Manager),
            "Employee" => Ok(UserRole::Employee),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ToSql<Text, Sqlite> for VehicleStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for VehicleStatus {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        match <String as FromSql<Text, Sqlite>>::from_sql(bytes)?.as_str() {
            "Available" => Ok(VehicleStatus::Available),
            "Upcoming" => Ok(VehicleStatus::Upcoming),
            "Booked" => Ok(VehicleStatus::Booked),
            "Ongoing" => Ok(VehicleStatus::Ongoing),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ToSql<Text, Sqlite> for ReservationStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for ReservationStatus {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        match <String as FromSql<Text, Sqlite>>::from_sql(bytes)?.as_str() {
            "Booked" => Ok(ReservationStatus::Booked),
            "Ongoing" => Ok(ReservationStatus::Ongoing),
            "Completed" => Ok(ReservationStatus::Completed),
            "Cancelled" => Ok(ReservationStatus::Cancelled),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = access_tokens)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccessToken {
    pub id: i32,
    pub user_id: i32,
    pub token: Vec<u8>,
    pub exp: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = access_tokens)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewAccessToken {
    pub user_id: i32,
    pub token: Vec<u8>,
    pub exp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAccessToken {
    pub user_id: i32,
    pub token: String,
    pub exp: DateTime<Utc>,
}

impl From<AccessToken> for PublishAccessToken {
    fn from(token: AccessToken) -> Self {
        PublishAccessToken {
            user_id: token.user_id,
            token: hex::encode(&token.token),
            exp: token.exp,
        }
    }
}

// The `auth` request header carries "<hex token>$<user id>".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
    pub user_id: i32,
    pub token: String,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String, // bcrypt hash, never the plaintext
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub address: Option<String>,
}

impl User {
    pub fn to_publish_user(&self) -> PublishUser {
        PublishUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            employee_id: self.employee_id.clone(),
            address: self.address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishUser {
    pub id: i32,
    pub username: String,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub address: Option<String>,
}

#[derive(Insertable, Debug, Clone, Deserialize, Serialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewUser {
    pub username: String,
    pub password: String, // Hash this before inserting!
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub address: Option<String>,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub license_number: String,
    pub insurance_company: String,
    pub policy_number: String,
}

impl Customer {
    pub fn to_publish_customer(&self) -> PublishCustomer {
        PublishCustomer {
            id: self.id,
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
        }
    }
}

// The list view withholds license and insurance details; the per-customer
// lookup returns the full row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishCustomer {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Insertable, Debug, Clone, Deserialize, Serialize)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewCustomer {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub license_number: String,
    pub insurance_company: String,
    pub policy_number: String,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Vehicle {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub odometer_km: i32,
    pub rate_per_day: f64,
    pub rate_per_km: f64,
    pub vehicle_type: String,
    pub vehicle_class: String,
    pub status: VehicleStatus,
}

#[derive(Insertable, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub odometer_km: i32,
    pub rate_per_day: f64,
    pub rate_per_km: f64,
    pub vehicle_type: String,
    pub vehicle_class: String,
    pub status: VehicleStatus,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Reservation {
    pub id: i32,
    pub confirmation: String,
    pub customer_name: String,
    pub vehicle_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rental_price: f64,
    pub status: ReservationStatus,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewReservation {
    pub confirmation: String,
    pub customer_name: String,
    pub vehicle_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rental_price: f64,
    pub status: ReservationStatus,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Feedback {
    pub id: i32,
    pub customer_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewFeedback {
    pub customer_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = action_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActionLog {
    pub id: i32,
    pub username: String,
    pub action: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = action_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewActionLog {
    pub username: String,
    pub action: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = settings)]
#[diesel(primary_key(key))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_user_strips_password() {
        let user = User {
            id: 1,
            username: String::from("manager"),
            password: String::from("$2b$12$abcdefghijklmnopqrstuv"),
            role: UserRole::Manager,
            first_name: Some(String::from("Default")),
            last_name: Some(String::from("Manager")),
            phone: Some(String::from("1234567890")),
            email: Some(String::from("manager@example.com")),
            employee_id: Some(String::from("1000")),
            address: Some(String::from("123 Manager St")),
        };
        let published = serde_json::to_value(user.to_publish_user()).unwrap();
        assert!(published.get("password").is_none());
        assert_eq!(published["username"], "manager");
        assert_eq!(published["role"], "Manager");
    }

    #[test]
    fn publish_customer_withholds_insurance_details() {
        let customer = Customer {
            id: 7,
            name: String::from("John Doe"),
            address: String::from("123 Elm Street"),
            phone: String::from("555-1234"),
            license_number: String::from("LN12345"),
            insurance_company: String::from("ABC Insurance"),
            policy_number: String::from("PN98765"),
        };
        let published = serde_json::to_value(customer.to_publish_customer()).unwrap();
        assert!(published.get("license_number").is_none());
        assert!(published.get("policy_number").is_none());
        assert_eq!(published["name"], "John Doe");
    }

    #[test]
    fn access_token_publishes_as_hex() {
        let token = AccessToken {
            id: 3,
            user_id: 1,
            token: vec![0xde, 0xad, 0xbe, 0xef],
            exp: Utc::now(),
        };
        let publish: PublishAccessToken = token.into();
        assert_eq!(publish.token, "deadbeef");
    }
}
