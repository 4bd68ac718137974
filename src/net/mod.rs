pub mod inspect;
pub mod server;
pub mod udp;
