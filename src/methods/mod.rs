pub mod audit;
pub mod catalog;
pub mod reservation;
pub mod standard_replies;
pub mod tokens;
pub mod user;
