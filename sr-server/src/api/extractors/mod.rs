pub mod client_ip;
pub mod ingest_key;
