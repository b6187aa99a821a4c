pub mod catalog;
pub mod db;
pub mod dto;
pub mod repository;
pub mod service;
