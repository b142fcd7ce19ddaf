pub mod reading;
pub mod reading_payload;
