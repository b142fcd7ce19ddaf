pub mod reading_repository;
