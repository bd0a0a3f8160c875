pub mod activities;
pub mod admin;
pub mod backup;
pub mod core;
pub mod gallery;
pub mod imports;
pub mod participants;
pub mod reports;
pub mod storage;
pub mod students;
pub mod winners;
