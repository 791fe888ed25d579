pub mod chat;
pub mod clients;
pub mod datastore;
pub mod documents;
pub mod health;
pub mod storage;
