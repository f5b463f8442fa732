use serde_derive::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ErrorResponse {
    pub title: String,
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UsernameRequest {
    pub username: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CustomerNameRequest {
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CustomerNameQuery {
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct VehicleTypeQuery {
    pub vehicle_type: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ReservationIdRequest {
    pub reservation_id: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SettingKeyQuery {
    pub key: String,
}
