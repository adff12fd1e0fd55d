mod common;
mod users;
mod workflow;
