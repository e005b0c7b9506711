diesel::table! {
    users (id) {
        id -> Text,
        user_name -> Text,
        email -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    games (id) {
        id -> Text,
        name -> Text,
        user_id -> Text,
        status -> Integer,
        created_at -> Timestamp,
        completed_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    players (id) {
        id -> Text,
        name -> Text,
        user_id -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    game_players (id) {
        id -> Text,
        game_id -> Text,
        player_id -> Text,
        score -> Integer,
        joined_at -> Timestamp,
    }
}

diesel::joinable!(games -> users (user_id));
diesel::joinable!(players -> users (user_id));
diesel::joinable!(game_players -> games (game_id));
diesel::joinable!(game_players -> players (player_id));

diesel::allow_tables_to_appear_in_same_query!(game_players, games, players, users,);
