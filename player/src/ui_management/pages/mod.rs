pub mod connect_page;
pub mod game_page;
