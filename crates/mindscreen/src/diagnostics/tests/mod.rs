mod common;
mod modules;
