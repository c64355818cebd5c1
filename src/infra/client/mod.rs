pub mod http_record_store;
