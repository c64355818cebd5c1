pub mod local_record_store;
