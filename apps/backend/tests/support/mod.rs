#![allow(dead_code)]

pub mod mailbox;
pub mod server;
