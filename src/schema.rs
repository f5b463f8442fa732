diesel::table! {
    access_tokens (id) {
        id -> Integer,
        user_id -> Integer,
        token -> Binary,
        exp -> TimestamptzSqlite,
    }
}

diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,
        password -> Text,
        role -> Text,
        first_name -> Nullable<Text>,
        last_name -> Nullable<Text>,
        phone -> Nullable<Text>,
        email -> Nullable<Text>,
        employee_id -> Nullable<Text>,
        address -> Nullable<Text>,
    }
}

diesel::table! {
    customers (id) {
        id -> Integer,
        name -> Text,
        address -> Text,
        phone -> Text,
        license_number -> Text,
        insurance_company -> Text,
        policy_number -> Text,
    }
}

diesel::table! {
    vehicles (id) {
        id -> Integer,
        brand -> Text,
        model -> Text,
        year -> Integer,
        odometer_km -> Integer,
        rate_per_day -> Double,
        rate_per_km -> Double,
        vehicle_type -> Text,
        vehicle_class -> Text,
        status -> Text,
    }
}

diesel::table! {
    reservations (id) {
        id -> Integer,
        confirmation -> Text,
        customer_name -> Text,
        vehicle_id -> Integer,
        start_date -> Date,
        end_date -> Date,
        rental_price -> Double,
        status -> Text,
    }
}

diesel::table! {
    feedback (id) {
        id -> Integer,
        customer_name -> Text,
        message -> Text,
        created_at -> TimestamptzSqlite,
    }
}

diesel::table! {
    action_logs (id) {
        id -> Integer,
        username -> Text,
        action -> Text,
        detail -> Nullable<Text>,
        created_at -> TimestamptzSqlite,
    }
}

diesel::table! {
    settings (key) {
        key -> Text,
        value -> Text,
    }
}

diesel::joinable!(access_tokens -> users (user_id));
diesel::joinable!(reservations -> vehicles (vehicle_id));

diesel::allow_tables_to_appear_in_same_query!(
    access_tokens,
    users,
    customers,
    vehicles,
    reservations,
    feedback,
    action_logs,
    settings,
);
