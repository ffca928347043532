pub mod cli;
pub mod commands;
pub mod configs;
pub mod domain;
pub mod editor;
pub mod format;
pub mod output;
pub mod storage;
pub mod workflow;
