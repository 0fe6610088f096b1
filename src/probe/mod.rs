pub mod socket;
pub mod udp;

pub use socket::*;
pub use udp::*;
