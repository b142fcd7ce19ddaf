pub mod reading_response;
pub mod readings;
