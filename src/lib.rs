pub mod appsettings;
pub mod notify;
pub mod reminder;
pub mod scheduling;
pub mod service;
pub mod storage;
