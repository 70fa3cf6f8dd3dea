pub mod location;
pub mod protocol_entry;
pub mod record_type;
pub mod session;
pub mod today_summary;
pub mod user;
pub mod work_status;
