//! JSON-lines request handling: read a request per line, run it, write a
//! response envelope per line.

pub mod handler;
pub mod request_reader;
pub mod response_writer;
