//! TCP server for the wire protocol: one task per connection.

mod connection;

pub use connection::{run_server, run_server_on_listener, serve_with_shutdown};
