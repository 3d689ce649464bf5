pub mod reflect_server;
