pub mod chunked_server;
pub mod socket_guard;
