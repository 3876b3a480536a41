mod common;
mod conversation;
