pub mod game_objects_repository;
pub mod levels_repository;
pub mod players_repository;
