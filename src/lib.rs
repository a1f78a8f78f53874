pub mod client;
pub mod game;
pub mod realtime;
pub mod session;
pub mod sync;
pub mod table;
pub mod view;

#[cfg(test)]
pub mod test_utils;
