//! Clients for the services pushnote talks to over HTTP

pub mod client;
pub mod google;
